//
// Copyright (c) The i1905 Contributors
//
// SPDX-License-Identifier: MIT
//

//! Diagnostic printer for CMDUs and TLV lists.
//!
//! All formatting happens here; callers provide any `fmt::Write` sink. The
//! same traversal backs log output and test oracles.

use std::fmt::Write;

use num_traits::FromPrimitive;

use crate::packet::cmdu::Cmdu;
use crate::packet::consts::TlvType;
use crate::packet::lldp::Lldpdu;
use crate::packet::tlv::Tlv;

// Byte arrays are elided past this line width.
const MAX_LINE_WIDTH: usize = 200;

/// Prints a CMDU, one field per line, each prefixed with `prefix`.
pub fn print_cmdu<W: Write>(
    w: &mut W,
    cmdu: &Cmdu,
    prefix: &str,
) -> std::fmt::Result {
    writeln!(w, "{prefix}message_version: {}", cmdu.message_version as u8)?;
    writeln!(w, "{prefix}message_type: {:#06x}", cmdu.message_type)?;
    writeln!(w, "{prefix}message_id: {:#06x}", cmdu.message_id)?;
    writeln!(w, "{prefix}relay: {}", cmdu.relay as u8)?;
    for tlv in &cmdu.tlvs {
        print_tlv(w, tlv, prefix)?;
    }
    Ok(())
}

/// Prints a single TLV, one field per line.
pub fn print_tlv<W: Write>(
    w: &mut W,
    tlv: &Tlv,
    prefix: &str,
) -> std::fmt::Result {
    let name = match TlvType::from_u8(tlv.tlv_type()) {
        Some(tlv_type) => format!("{tlv_type:?}"),
        None => format!("Unknown:{:#04x}", tlv.tlv_type()),
    };
    let p = format!("{prefix}TLV({name})->");

    match tlv {
        Tlv::AlMacAddress(tlv) => {
            writeln!(w, "{p}al_mac: {}", tlv.al_mac)?;
        }
        Tlv::MacAddress(tlv) => {
            writeln!(w, "{p}mac: {}", tlv.mac)?;
        }
        Tlv::DeviceInformation(tlv) => {
            writeln!(w, "{p}al_mac: {}", tlv.al_mac)?;
            for (i, entry) in tlv.interfaces.iter().enumerate() {
                writeln!(w, "{p}interface[{i}].mac: {}", entry.mac)?;
                writeln!(
                    w,
                    "{p}interface[{i}].media_type: {:#06x}",
                    entry.media_type
                )?;
                writeln!(
                    w,
                    "{p}interface[{i}].media_specific: {}",
                    fmt_bytes(&entry.media_specific)
                )?;
            }
        }
        Tlv::DeviceBridgingCapability(tlv) => {
            for (i, tuple) in tlv.bridging_tuples.iter().enumerate() {
                for (j, mac) in tuple.interfaces.iter().enumerate() {
                    writeln!(w, "{p}tuple[{i}].mac[{j}]: {mac}")?;
                }
            }
        }
        Tlv::Non1905NeighborDeviceList(tlv) => {
            writeln!(w, "{p}local_mac: {}", tlv.local_mac)?;
            for (i, mac) in tlv.neighbors.iter().enumerate() {
                writeln!(w, "{p}neighbor[{i}]: {mac}")?;
            }
        }
        Tlv::NeighborDeviceList(tlv) => {
            writeln!(w, "{p}local_mac: {}", tlv.local_mac)?;
            for (i, neighbor) in tlv.neighbors.iter().enumerate() {
                writeln!(
                    w,
                    "{p}neighbor[{i}]: {} bridge: {}",
                    neighbor.al_mac,
                    neighbor.intermediate_legacy_bridge as u8
                )?;
            }
        }
        Tlv::LinkMetricQuery(tlv) => {
            writeln!(w, "{p}destination: {:?}", tlv.destination)?;
            writeln!(w, "{p}neighbor: {}", tlv.neighbor)?;
            writeln!(w, "{p}scope: {:?}", tlv.scope)?;
        }
        Tlv::TransmitterLinkMetric(tlv) => {
            writeln!(w, "{p}local_al_mac: {}", tlv.local_al_mac)?;
            writeln!(w, "{p}neighbor_al_mac: {}", tlv.neighbor_al_mac)?;
            for (i, link) in tlv.links.iter().enumerate() {
                writeln!(
                    w,
                    "{p}link[{i}]: {} -> {} errors: {} packets: {} \
                     capacity: {} availability: {} phy_rate: {}",
                    link.local_interface,
                    link.neighbor_interface,
                    link.packet_errors,
                    link.transmitted_packets,
                    link.mac_throughput_capacity,
                    link.link_availability,
                    link.phy_rate
                )?;
            }
        }
        Tlv::ReceiverLinkMetric(tlv) => {
            writeln!(w, "{p}local_al_mac: {}", tlv.local_al_mac)?;
            writeln!(w, "{p}neighbor_al_mac: {}", tlv.neighbor_al_mac)?;
            for (i, link) in tlv.links.iter().enumerate() {
                writeln!(
                    w,
                    "{p}link[{i}]: {} -> {} errors: {} packets: {} rssi: {}",
                    link.local_interface,
                    link.neighbor_interface,
                    link.packet_errors,
                    link.received_packets,
                    link.rssi
                )?;
            }
        }
        Tlv::VendorSpecific(tlv) => {
            writeln!(
                w,
                "{p}oui: {:02x}:{:02x}:{:02x}",
                tlv.oui[0], tlv.oui[1], tlv.oui[2]
            )?;
            writeln!(w, "{p}payload: {}", fmt_bytes(&tlv.payload))?;
        }
        Tlv::LinkMetricResultCode(tlv) => {
            writeln!(w, "{p}code: {:?}", tlv.code)?;
        }
        Tlv::SearchedRole(tlv) => {
            writeln!(w, "{p}role: {:?}", tlv.role)?;
        }
        Tlv::AutoconfigFreqBand(tlv) => {
            writeln!(w, "{p}band: {:?}", tlv.band)?;
        }
        Tlv::SupportedRole(tlv) => {
            writeln!(w, "{p}role: {:?}", tlv.role)?;
        }
        Tlv::SupportedFreqBand(tlv) => {
            writeln!(w, "{p}band: {:?}", tlv.band)?;
        }
        Tlv::Wsc(tlv) => {
            writeln!(w, "{p}payload: {}", fmt_bytes(&tlv.payload))?;
        }
        Tlv::PushButtonEventNotification(tlv) => {
            for (i, entry) in tlv.media.iter().enumerate() {
                writeln!(
                    w,
                    "{p}media[{i}].media_type: {:#06x}",
                    entry.media_type
                )?;
                writeln!(
                    w,
                    "{p}media[{i}].media_specific: {}",
                    fmt_bytes(&entry.media_specific)
                )?;
            }
        }
        Tlv::PushButtonJoinNotification(tlv) => {
            writeln!(w, "{p}al_mac: {}", tlv.al_mac)?;
            writeln!(w, "{p}message_id: {:#06x}", tlv.message_id)?;
            writeln!(w, "{p}transmitter_mac: {}", tlv.transmitter_mac)?;
            writeln!(w, "{p}new_mac: {}", tlv.new_mac)?;
        }
        Tlv::GenericPhyDeviceInformation(tlv) => {
            writeln!(w, "{p}al_mac: {}", tlv.al_mac)?;
            for (i, entry) in tlv.interfaces.iter().enumerate() {
                writeln!(w, "{p}interface[{i}].mac: {}", entry.mac)?;
                writeln!(
                    w,
                    "{p}interface[{i}].variant: {} ({})",
                    entry.variant_index, entry.variant_name
                )?;
                writeln!(w, "{p}interface[{i}].url: \"\"\"{}\"\"\"", entry.url)?;
            }
        }
        Tlv::DeviceIdentification(tlv) => {
            writeln!(w, "{p}friendly_name: \"\"\"{}\"\"\"", tlv.friendly_name)?;
            writeln!(
                w,
                "{p}manufacturer_name: \"\"\"{}\"\"\"",
                tlv.manufacturer_name
            )?;
            writeln!(
                w,
                "{p}manufacturer_model: \"\"\"{}\"\"\"",
                tlv.manufacturer_model
            )?;
        }
        Tlv::ControlUrl(tlv) => {
            writeln!(w, "{p}url: \"\"\"{}\"\"\"", tlv.url)?;
        }
        Tlv::Ipv4(tlv) => {
            for (i, iface) in tlv.interfaces.iter().enumerate() {
                writeln!(w, "{p}interface[{i}].mac: {}", iface.mac)?;
                for (j, entry) in iface.entries.iter().enumerate() {
                    writeln!(
                        w,
                        "{p}interface[{i}].entry[{j}]: {} ({:?}) dhcp: {}",
                        entry.address, entry.addr_type, entry.dhcp_server
                    )?;
                }
            }
        }
        Tlv::Ipv6(tlv) => {
            for (i, iface) in tlv.interfaces.iter().enumerate() {
                writeln!(w, "{p}interface[{i}].mac: {}", iface.mac)?;
                writeln!(
                    w,
                    "{p}interface[{i}].link_local: {}",
                    iface.link_local
                )?;
                for (j, entry) in iface.entries.iter().enumerate() {
                    writeln!(
                        w,
                        "{p}interface[{i}].entry[{j}]: {} ({:?}) origin: {}",
                        entry.address, entry.addr_type, entry.origin
                    )?;
                }
            }
        }
        Tlv::PushButtonGenericPhyEventNotification(tlv) => {
            for (i, entry) in tlv.media.iter().enumerate() {
                writeln!(
                    w,
                    "{p}media[{i}]: oui {:02x}:{:02x}:{:02x} variant {} \
                     specific: {}",
                    entry.oui[0],
                    entry.oui[1],
                    entry.oui[2],
                    entry.variant_index,
                    fmt_bytes(&entry.media_specific)
                )?;
            }
        }
        Tlv::ProfileVersion(tlv) => {
            writeln!(w, "{p}version: {:?}", tlv.version)?;
        }
        Tlv::PowerOffInterface(tlv) => {
            for (i, entry) in tlv.interfaces.iter().enumerate() {
                writeln!(
                    w,
                    "{p}interface[{i}]: {} media_type: {:#06x}",
                    entry.mac, entry.media_type
                )?;
            }
        }
        Tlv::InterfacePowerChangeInformation(tlv) => {
            for (i, entry) in tlv.interfaces.iter().enumerate() {
                writeln!(
                    w,
                    "{p}interface[{i}]: {} state: {:?}",
                    entry.mac, entry.state
                )?;
            }
        }
        Tlv::InterfacePowerChangeStatus(tlv) => {
            for (i, entry) in tlv.interfaces.iter().enumerate() {
                writeln!(
                    w,
                    "{p}interface[{i}]: {} status: {:?}",
                    entry.mac, entry.status
                )?;
            }
        }
        Tlv::SupportedService(tlv) => {
            for (i, service) in tlv.services.iter().enumerate() {
                writeln!(w, "{p}service[{i}]: {service:?}")?;
            }
        }
        Tlv::SearchedService(tlv) => {
            for (i, service) in tlv.services.iter().enumerate() {
                writeln!(w, "{p}service[{i}]: {service:?}")?;
            }
        }
        Tlv::Unknown(tlv) => {
            writeln!(w, "{p}length: {}", tlv.length)?;
            writeln!(w, "{p}value: {}", fmt_bytes(&tlv.value))?;
        }
    }
    Ok(())
}

/// Prints an LLDPDU, one field per line.
pub fn print_lldpdu<W: Write>(
    w: &mut W,
    lldpdu: &Lldpdu,
    prefix: &str,
) -> std::fmt::Result {
    writeln!(w, "{prefix}TLV(ChassisId)->mac: {}", lldpdu.chassis_id.mac)?;
    writeln!(w, "{prefix}TLV(PortId)->mac: {}", lldpdu.port_id.mac)?;
    writeln!(w, "{prefix}TLV(TimeToLive)->ttl: {}", lldpdu.ttl.ttl)?;
    for tlv in &lldpdu.optional {
        writeln!(
            w,
            "{prefix}TLV(Unknown:{:#04x})->value: {}",
            tlv.tlv_type,
            fmt_bytes(&tlv.value)
        )?;
    }
    Ok(())
}

/// Hex-dumps a buffer, wrapping at 80 columns, indenting every line.
pub fn dump_bytes<W: Write>(
    w: &mut W,
    buf: &[u8],
    indent: &str,
) -> std::fmt::Result {
    let mut bytes_per_line = (80 - 1 - indent.len()) / 3;
    // If the indent is too long, just print 8 bytes per line.
    if bytes_per_line < 8 {
        bytes_per_line = 8;
    }

    for chunk in buf.chunks(bytes_per_line) {
        write!(w, "{indent}")?;
        for byte in chunk {
            write!(w, " {byte:02x}")?;
        }
        writeln!(w)?;
    }
    Ok(())
}

// Formats a byte array as hex values on a single width-capped line.
fn fmt_bytes(bytes: &[u8]) -> String {
    let mut out = String::new();
    for (i, byte) in bytes.iter().enumerate() {
        if out.len() + 6 > MAX_LINE_WIDTH {
            out.push_str("...");
            break;
        }
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{byte:02x}");
    }
    out
}
