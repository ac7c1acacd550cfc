//
// Copyright (c) The i1905 Contributors
//
// SPDX-License-Identifier: MIT
//

mod autoconfig;
mod discovery;
mod metrics;

use bytes::{Buf, Bytes};
use i1905::instance::{Config, Instance, RegistrarConfig};
use i1905::interface::Interface;
use i1905::network::MulticastAddr;
use i1905::packet::CmduHeader;
use i1905::packet::cmdu::Cmdu;
use i1905::packet::consts::MessageType;
use i1905::packet::tlv::{AlMacAddressTlv, MacAddressTlv, Tlv};
use i1905::tasks::messages::input::{NetRxFrameMsg, ProtocolMsg};
use i1905::tasks::messages::output::NetTxFrameMsg;
use tokio::sync::mpsc::UnboundedReceiver;

//
// Test addresses.
//

pub const ADDR_AL: [u8; 6] = [0x02, 0xee, 0xff, 0x33, 0x44, 0x00];
pub const ADDR_MAC0: [u8; 6] = [0x00, 0xee, 0xff, 0x33, 0x44, 0x00];
pub const ADDR_AL_PEER0: [u8; 6] = [0x02, 0xaa, 0xbb, 0x33, 0x44, 0x00];
pub const ADDR_MAC_PEER0: [u8; 6] = [0x00, 0xee, 0xff, 0x33, 0x44, 0x01];

//
// Helper functions.
//

// Builds an instance with one mock interface, returning the receive end of
// the interface Tx queue.
pub fn mock_instance(
    registrar: Option<RegistrarConfig>,
) -> (Instance, UnboundedReceiver<NetTxFrameMsg>) {
    let mut config = Config::default();
    config.al_mac = ADDR_AL.into();
    config.registrar = registrar;

    let mut instance = Instance::new(config);
    let (iface, net_tx_framec) = Interface::mock("eth0", ADDR_MAC0.into());
    instance.interfaces.push(iface);
    (instance, net_tx_framec)
}

// Feeds one received frame into the instance.
pub fn push_frame(instance: &mut Instance, frame: Bytes) {
    let msg = ProtocolMsg::NetRxFrame(NetRxFrameMsg {
        ifname: "eth0".to_owned(),
        bytes: frame,
    });
    instance.process_msg(msg);
}

// Splits an outgoing frame into its header and decoded CMDU.
pub fn decode_frame(frame: &Bytes) -> (CmduHeader, Cmdu) {
    let mut buf = frame.clone();
    let hdr = CmduHeader::decode(&mut buf).unwrap();
    let payload = buf.copy_to_bytes(buf.remaining());
    let cmdu = Cmdu::decode(&hdr, &[payload]).unwrap();
    (hdr, cmdu)
}

// Forges the topology discovery CMDU a peer AL would multicast.
pub fn peer_discovery_frame() -> Bytes {
    let mut cmdu = Cmdu::new(MessageType::TopologyDiscovery, 0x0001);
    cmdu.add_tlv(Tlv::AlMacAddress(AlMacAddressTlv::new(
        ADDR_AL_PEER0.into(),
    )))
    .unwrap();
    cmdu.add_tlv(Tlv::MacAddress(MacAddressTlv::new(ADDR_MAC_PEER0.into())))
        .unwrap();
    let mut frames = cmdu
        .encode(&ADDR_MAC_PEER0.into(), &MulticastAddr::Cmdu.mac(), 1500)
        .unwrap();
    frames.remove(0)
}
