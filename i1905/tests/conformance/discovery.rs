//
// Copyright (c) The i1905 Contributors
//
// SPDX-License-Identifier: MIT
//

use bytes::Bytes;
use i1905::network::MulticastAddr;
use i1905::packet::cmdu::Cmdu;
use i1905::packet::consts::{ETHER_TYPE_LLDP, MessageType};
use i1905::packet::lldp::{Lldpdu, TimeToLiveTlv};
use i1905::packet::tlv::{
    AlMacAddressTlv, DeviceBridgingCapabilityTlv, DeviceInformationTlv,
    LocalInterface, MacAddressTlv, NeighborDeviceListTlv, NeighborEntry, Tlv,
};
use i1905::tasks::messages::input::{DiscoveryIntervalMsg, ProtocolMsg};
use i1905_utils::mac_addr::MacAddr;

use super::{
    ADDR_AL, ADDR_AL_PEER0, ADDR_MAC0, ADDR_MAC_PEER0, decode_frame,
    mock_instance, peer_discovery_frame, push_frame,
};

// A discovery tick must multicast a topology discovery CMDU carrying the AL
// MAC address TLV and the interface MAC address TLV, in that order, plus an
// LLDP bridge discovery frame.
#[tokio::test]
async fn discovery_tick() {
    let (mut instance, mut net_tx) = mock_instance(None);
    instance
        .process_msg(ProtocolMsg::DiscoveryInterval(DiscoveryIntervalMsg {}));

    // Topology discovery CMDU.
    let msg = net_tx.try_recv().unwrap();
    let (hdr, cmdu) = decode_frame(&msg.frame);
    assert_eq!(hdr.dst_addr, MulticastAddr::Cmdu.mac());
    assert_eq!(hdr.src_addr, MacAddr::from(ADDR_MAC0));
    assert_eq!(cmdu.message_type, MessageType::TopologyDiscovery as u16);
    assert!(!cmdu.relay);
    assert_eq!(
        cmdu.tlvs,
        vec![
            Tlv::AlMacAddress(AlMacAddressTlv::new(ADDR_AL.into())),
            Tlv::MacAddress(MacAddressTlv::new(ADDR_MAC0.into())),
        ]
    );

    // LLDP bridge discovery frame, on the same tick.
    let msg = net_tx.try_recv().unwrap();
    let frame = msg.frame;
    assert_eq!(frame[0..6], MulticastAddr::Lldp.as_bytes());
    assert_eq!(frame[6..12], ADDR_MAC0);
    assert_eq!(u16::from_be_bytes([frame[12], frame[13]]), ETHER_TYPE_LLDP);
    let lldpdu = Lldpdu::decode(frame.slice(14..)).unwrap();
    assert_eq!(lldpdu.chassis_id.mac, MacAddr::from(ADDR_AL));
    assert_eq!(lldpdu.port_id.mac, MacAddr::from(ADDR_MAC0));
    assert_eq!(lldpdu.ttl.ttl, TimeToLiveTlv::DEFAULT);

    assert!(net_tx.try_recv().is_err());
}

// A received topology discovery records the advertised neighbor on the
// receiving interface.
#[tokio::test]
async fn record_discovered_neighbor() {
    let (mut instance, _net_tx) = mock_instance(None);
    push_frame(&mut instance, peer_discovery_frame());

    let peer: MacAddr = ADDR_AL_PEER0.into();
    let neighbor = instance.interfaces[0].neighbors.get(&peer).unwrap();
    assert_eq!(neighbor.iface_mac, MacAddr::from(ADDR_MAC_PEER0));
}

#[tokio::test]
async fn topology_query_response() {
    let (mut instance, mut net_tx) = mock_instance(None);
    push_frame(&mut instance, peer_discovery_frame());

    let query = Cmdu::new(MessageType::TopologyQuery, 0x4321);
    let frames = query
        .encode(&ADDR_MAC_PEER0.into(), &ADDR_MAC0.into(), 1500)
        .unwrap();
    push_frame(&mut instance, frames[0].clone());

    let msg = net_tx.try_recv().unwrap();
    let (hdr, response) = decode_frame(&msg.frame);
    assert_eq!(hdr.dst_addr, MacAddr::from(ADDR_MAC_PEER0));
    assert_eq!(response.message_type, MessageType::TopologyResponse as u16);
    // The response echoes the message id of the query.
    assert_eq!(response.message_id, 0x4321);
    assert_eq!(
        response.tlvs,
        vec![
            Tlv::DeviceInformation(DeviceInformationTlv {
                al_mac: ADDR_AL.into(),
                interfaces: vec![LocalInterface::new(
                    ADDR_MAC0.into(),
                    0x0001,
                    Bytes::new(),
                )],
            }),
            Tlv::DeviceBridgingCapability(DeviceBridgingCapabilityTlv {
                bridging_tuples: vec![],
            }),
            Tlv::NeighborDeviceList(NeighborDeviceListTlv {
                local_mac: ADDR_MAC0.into(),
                neighbors: vec![NeighborEntry::new(
                    ADDR_AL_PEER0.into(),
                    false,
                )],
            }),
        ]
    );
}
