//
// Copyright (c) The i1905 Contributors
//
// SPDX-License-Identifier: MIT
//

use bytes::{Buf, Bytes};
use i1905_utils::mac_addr::MacAddr;

use crate::debug::Debug;
use crate::error::Error;
use crate::instance::Instance;
use crate::packet::CmduHeader;
use crate::packet::cmdu::Cmdu;
use crate::packet::consts::{
    LinkMetricDestination, LinkMetricResultCode, LinkMetricScope,
    MessageType, Role, ServiceType,
};
use crate::packet::tlv::{
    DeviceBridgingCapabilityTlv, DeviceInformationTlv,
    LinkMetricResultCodeTlv, LocalInterface, NeighborDeviceListTlv,
    NeighborEntry, ReceiverLinkMetricTlv, RxLinkMetric, SupportedFreqBandTlv,
    SupportedRoleTlv, SupportedServiceTlv, Tlv, TransmitterLinkMetricTlv,
    TxLinkMetric,
};

// Media type for IEEE 802.3ab gigabit ethernet interfaces.
const MEDIA_TYPE_IEEE_802_3AB: u16 = 0x0001;

// ===== 1905.1 frame receive =====

pub(crate) fn process_frame(
    instance: &mut Instance,
    ifname: String,
    bytes: Bytes,
) {
    let Some(iface_idx) = instance
        .interfaces
        .iter()
        .position(|iface| iface.name == ifname)
    else {
        return;
    };

    // Decode frame header.
    let mut buf = bytes;
    let hdr = match CmduHeader::decode(&mut buf) {
        Ok(hdr) => hdr,
        Err(error) => {
            Error::CmduInputError(ifname, MacAddr::default(), error).log();
            return;
        }
    };

    // Accept only frames addressed to this node or to the 1905.1 multicast
    // group.
    let iface = &instance.interfaces[iface_idx];
    if hdr.dst_addr != iface.mac
        && hdr.dst_addr != instance.config.al_mac
        && !hdr.dst_addr.is_multicast()
    {
        return;
    }
    // Ignore our own relayed multicasts.
    if hdr.src_addr == instance.config.al_mac {
        return;
    }

    // Reassemble and decode the CMDU.
    let payload = buf.copy_to_bytes(buf.remaining());
    let Some((first_hdr, fragments)) =
        instance.defragmenter.push(&hdr, payload)
    else {
        return;
    };
    let cmdu = match Cmdu::decode(&first_hdr, &fragments) {
        Ok(cmdu) => cmdu,
        Err(error) => {
            Error::CmduInputError(ifname, hdr.src_addr, error).log();
            return;
        }
    };

    Debug::CmduRx(&instance.interfaces[iface_idx].name, &hdr.src_addr, &cmdu)
        .log();

    let Some(message_type) = cmdu.message_type() else {
        // CMDUs of unknown types are discarded without a response.
        return;
    };
    match message_type {
        MessageType::TopologyDiscovery => {
            process_topology_discovery(instance, iface_idx, &cmdu);
        }
        MessageType::TopologyQuery => {
            process_topology_query(instance, iface_idx, &hdr, &cmdu);
        }
        MessageType::LinkMetricQuery => {
            process_link_metric_query(instance, iface_idx, &hdr, &cmdu);
        }
        MessageType::ApAutoconfigSearch => {
            process_autoconfig_search(instance, iface_idx, &hdr, &cmdu);
        }
        _ => (),
    }
}

// ===== message handlers =====

// Records the advertised AL and interface MAC addresses as a neighbor.
fn process_topology_discovery(
    instance: &mut Instance,
    iface_idx: usize,
    cmdu: &Cmdu,
) {
    let al_mac = cmdu.tlvs.iter().find_map(|tlv| tlv.as_al_mac_address());
    let iface_mac = cmdu.tlvs.iter().find_map(|tlv| tlv.as_mac_address());
    if let (Some(al_mac), Some(iface_mac)) = (al_mac, iface_mac) {
        instance.interfaces[iface_idx]
            .update_neighbor(al_mac.al_mac, iface_mac.mac);
    }
}

// Answers a topology query with this node's device information.
fn process_topology_query(
    instance: &mut Instance,
    iface_idx: usize,
    hdr: &CmduHeader,
    cmdu: &Cmdu,
) {
    let mut response = Cmdu::new(MessageType::TopologyResponse, cmdu.message_id);

    let interfaces = instance
        .interfaces
        .iter()
        .map(|iface| LocalInterface {
            mac: iface.mac,
            media_type: MEDIA_TYPE_IEEE_802_3AB,
            media_specific: Bytes::new(),
        })
        .collect();
    let _ = response.add_tlv(Tlv::DeviceInformation(DeviceInformationTlv {
        al_mac: instance.config.al_mac,
        interfaces,
    }));
    let _ = response.add_tlv(Tlv::DeviceBridgingCapability(
        DeviceBridgingCapabilityTlv {
            bridging_tuples: vec![],
        },
    ));
    for iface in &instance.interfaces {
        if iface.neighbors.is_empty() {
            continue;
        }
        let neighbors = iface
            .neighbors
            .values()
            .map(|neighbor| NeighborEntry {
                al_mac: neighbor.al_mac,
                intermediate_legacy_bridge: false,
            })
            .collect();
        let _ = response.add_tlv(Tlv::NeighborDeviceList(
            NeighborDeviceListTlv {
                local_mac: iface.mac,
                neighbors,
            },
        ));
    }

    send_response(instance, iface_idx, &hdr.src_addr, &response);
}

// Answers a link metric query with the requested metrics.
fn process_link_metric_query(
    instance: &mut Instance,
    iface_idx: usize,
    hdr: &CmduHeader,
    cmdu: &Cmdu,
) {
    let Some(query) =
        cmdu.tlvs.iter().find_map(|tlv| tlv.as_link_metric_query())
    else {
        return;
    };

    let mut response =
        Cmdu::new(MessageType::LinkMetricResponse, cmdu.message_id);

    // Collect the queried neighbors.
    let neighbors: Vec<_> = instance
        .interfaces
        .iter()
        .flat_map(|iface| {
            iface
                .neighbors
                .values()
                .map(move |neighbor| (iface.mac, *neighbor))
        })
        .filter(|(_, neighbor)| match query.destination {
            LinkMetricDestination::AllNeighbors => true,
            LinkMetricDestination::SpecificNeighbor => {
                neighbor.al_mac == query.neighbor
            }
        })
        .collect();

    if query.destination == LinkMetricDestination::SpecificNeighbor
        && neighbors.is_empty()
    {
        let _ = response.add_tlv(Tlv::LinkMetricResultCode(
            LinkMetricResultCodeTlv {
                code: LinkMetricResultCode::InvalidNeighbor,
            },
        ));
        send_response(instance, iface_idx, &hdr.src_addr, &response);
        return;
    }

    // Counters are not collected from the underlying drivers; metrics are
    // reported as zero.
    for (local_mac, neighbor) in neighbors {
        if matches!(
            query.scope,
            LinkMetricScope::Tx | LinkMetricScope::Both
        ) {
            let _ = response.add_tlv(Tlv::TransmitterLinkMetric(
                TransmitterLinkMetricTlv {
                    local_al_mac: instance.config.al_mac,
                    neighbor_al_mac: neighbor.al_mac,
                    links: vec![TxLinkMetric {
                        local_interface: local_mac,
                        neighbor_interface: neighbor.iface_mac,
                        intf_type: MEDIA_TYPE_IEEE_802_3AB,
                        bridge_flag: false,
                        packet_errors: 0,
                        transmitted_packets: 0,
                        mac_throughput_capacity: 0,
                        link_availability: 0,
                        phy_rate: 0,
                    }],
                },
            ));
        }
        if matches!(
            query.scope,
            LinkMetricScope::Rx | LinkMetricScope::Both
        ) {
            let _ = response.add_tlv(Tlv::ReceiverLinkMetric(
                ReceiverLinkMetricTlv {
                    local_al_mac: instance.config.al_mac,
                    neighbor_al_mac: neighbor.al_mac,
                    links: vec![RxLinkMetric {
                        local_interface: local_mac,
                        neighbor_interface: neighbor.iface_mac,
                        intf_type: MEDIA_TYPE_IEEE_802_3AB,
                        packet_errors: 0,
                        received_packets: 0,
                        rssi: 0,
                    }],
                },
            ));
        }
    }

    send_response(instance, iface_idx, &hdr.src_addr, &response);
}

// Answers an AP autoconfiguration search when acting as the registrar for
// the searched band.
fn process_autoconfig_search(
    instance: &mut Instance,
    iface_idx: usize,
    hdr: &CmduHeader,
    cmdu: &Cmdu,
) {
    let Some(registrar) = &instance.config.registrar else {
        return;
    };
    let Some(searched_role) =
        cmdu.tlvs.iter().find_map(|tlv| tlv.as_searched_role())
    else {
        return;
    };
    let Some(freq_band) =
        cmdu.tlvs.iter().find_map(|tlv| tlv.as_autoconfig_freq_band())
    else {
        return;
    };
    if searched_role.role != Role::Registrar
        || freq_band.band != registrar.band
    {
        return;
    }

    let mut response =
        Cmdu::new(MessageType::ApAutoconfigResponse, cmdu.message_id);
    let _ = response.add_tlv(Tlv::SupportedRole(SupportedRoleTlv {
        role: Role::Registrar,
    }));
    let _ = response.add_tlv(Tlv::SupportedFreqBand(SupportedFreqBandTlv {
        band: registrar.band,
    }));
    // A service search elicits the services this node provides.
    if cmdu
        .tlvs
        .iter()
        .any(|tlv| tlv.as_searched_service().is_some())
    {
        let _ = response.add_tlv(Tlv::SupportedService(SupportedServiceTlv {
            services: vec![ServiceType::Controller, ServiceType::Agent],
        }));
    }

    send_response(instance, iface_idx, &hdr.src_addr, &response);
}

// ===== helper functions =====

fn send_response(
    instance: &Instance,
    iface_idx: usize,
    dst: &MacAddr,
    response: &Cmdu,
) {
    let iface = &instance.interfaces[iface_idx];
    if let Err(error) =
        iface.send_cmdu(response, dst, instance.config.max_segment_size)
    {
        error.log();
    }
}
