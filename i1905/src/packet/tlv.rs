//
// Copyright (c) The i1905 Contributors
//
// SPDX-License-Identifier: MIT
//

#![allow(clippy::len_without_is_empty)]

use std::net::{Ipv4Addr, Ipv6Addr};

use bytes::{Buf, BufMut, Bytes, BytesMut};
use derive_new::new;
use enum_as_inner::EnumAsInner;
use i1905_utils::bytes::{BytesExt, BytesMutExt};
use i1905_utils::mac_addr::MacAddr;
use num_traits::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};

use crate::packet::consts::{
    FreqBand, Ipv4AddrType, Ipv6AddrType, LinkMetricDestination,
    LinkMetricResultCode, LinkMetricScope, PowerChangeStatus, PowerState,
    ProfileVersion, Role, ServiceType, TlvType,
};
use crate::packet::error::{
    DecodeError, DecodeResult, TlvDecodeError, TlvDecodeResult,
};

// TLV header size (type + 16-bit length).
pub const TLV_HDR_SIZE: usize = 3;

// 1905.1 TLV.
//
// Concrete TLVs are dispatched through this sum type; any type without a
// definition is preserved as-is in the `Unknown` variant.
#[derive(Clone, Debug, PartialEq)]
#[derive(EnumAsInner)]
#[derive(Deserialize, Serialize)]
pub enum Tlv {
    AlMacAddress(AlMacAddressTlv),
    MacAddress(MacAddressTlv),
    DeviceInformation(DeviceInformationTlv),
    DeviceBridgingCapability(DeviceBridgingCapabilityTlv),
    Non1905NeighborDeviceList(Non1905NeighborDeviceListTlv),
    NeighborDeviceList(NeighborDeviceListTlv),
    LinkMetricQuery(LinkMetricQueryTlv),
    TransmitterLinkMetric(TransmitterLinkMetricTlv),
    ReceiverLinkMetric(ReceiverLinkMetricTlv),
    VendorSpecific(VendorSpecificTlv),
    LinkMetricResultCode(LinkMetricResultCodeTlv),
    SearchedRole(SearchedRoleTlv),
    AutoconfigFreqBand(AutoconfigFreqBandTlv),
    SupportedRole(SupportedRoleTlv),
    SupportedFreqBand(SupportedFreqBandTlv),
    Wsc(WscTlv),
    PushButtonEventNotification(PushButtonEventNotificationTlv),
    PushButtonJoinNotification(PushButtonJoinNotificationTlv),
    GenericPhyDeviceInformation(GenericPhyDeviceInformationTlv),
    DeviceIdentification(DeviceIdentificationTlv),
    ControlUrl(ControlUrlTlv),
    Ipv4(Ipv4Tlv),
    Ipv6(Ipv6Tlv),
    PushButtonGenericPhyEventNotification(
        PushButtonGenericPhyEventNotificationTlv,
    ),
    ProfileVersion(ProfileVersionTlv),
    PowerOffInterface(PowerOffInterfaceTlv),
    InterfacePowerChangeInformation(InterfacePowerChangeInformationTlv),
    InterfacePowerChangeStatus(InterfacePowerChangeStatusTlv),
    SupportedService(SupportedServiceTlv),
    SearchedService(SearchedServiceTlv),
    Unknown(UnknownTlv),
}

#[derive(Clone, Debug, PartialEq)]
#[derive(new)]
#[derive(Deserialize, Serialize)]
pub struct AlMacAddressTlv {
    pub al_mac: MacAddr,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(new)]
#[derive(Deserialize, Serialize)]
pub struct MacAddressTlv {
    pub mac: MacAddr,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct DeviceInformationTlv {
    pub al_mac: MacAddr,
    pub interfaces: Vec<LocalInterface>,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(new)]
#[derive(Deserialize, Serialize)]
pub struct LocalInterface {
    pub mac: MacAddr,
    pub media_type: u16,
    pub media_specific: Bytes,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct DeviceBridgingCapabilityTlv {
    pub bridging_tuples: Vec<BridgingTuple>,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct BridgingTuple {
    pub interfaces: Vec<MacAddr>,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct Non1905NeighborDeviceListTlv {
    pub local_mac: MacAddr,
    pub neighbors: Vec<MacAddr>,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct NeighborDeviceListTlv {
    pub local_mac: MacAddr,
    pub neighbors: Vec<NeighborEntry>,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(new)]
#[derive(Deserialize, Serialize)]
pub struct NeighborEntry {
    pub al_mac: MacAddr,
    pub intermediate_legacy_bridge: bool,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(new)]
#[derive(Deserialize, Serialize)]
pub struct LinkMetricQueryTlv {
    pub destination: LinkMetricDestination,
    pub neighbor: MacAddr,
    pub scope: LinkMetricScope,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct TransmitterLinkMetricTlv {
    pub local_al_mac: MacAddr,
    pub neighbor_al_mac: MacAddr,
    pub links: Vec<TxLinkMetric>,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct TxLinkMetric {
    pub local_interface: MacAddr,
    pub neighbor_interface: MacAddr,
    pub intf_type: u16,
    pub bridge_flag: bool,
    pub packet_errors: u32,
    pub transmitted_packets: u32,
    pub mac_throughput_capacity: u16,
    pub link_availability: u16,
    pub phy_rate: u16,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct ReceiverLinkMetricTlv {
    pub local_al_mac: MacAddr,
    pub neighbor_al_mac: MacAddr,
    pub links: Vec<RxLinkMetric>,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct RxLinkMetric {
    pub local_interface: MacAddr,
    pub neighbor_interface: MacAddr,
    pub intf_type: u16,
    pub packet_errors: u32,
    pub received_packets: u32,
    pub rssi: u8,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(new)]
#[derive(Deserialize, Serialize)]
pub struct VendorSpecificTlv {
    pub oui: [u8; 3],
    pub payload: Bytes,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(new)]
#[derive(Deserialize, Serialize)]
pub struct LinkMetricResultCodeTlv {
    pub code: LinkMetricResultCode,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(new)]
#[derive(Deserialize, Serialize)]
pub struct SearchedRoleTlv {
    pub role: Role,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(new)]
#[derive(Deserialize, Serialize)]
pub struct AutoconfigFreqBandTlv {
    pub band: FreqBand,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(new)]
#[derive(Deserialize, Serialize)]
pub struct SupportedRoleTlv {
    pub role: Role,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(new)]
#[derive(Deserialize, Serialize)]
pub struct SupportedFreqBandTlv {
    pub band: FreqBand,
}

// The WSC registration payload (M1/M2) is carried opaquely; its inner
// cryptography belongs to the WSC layer.
#[derive(Clone, Debug, PartialEq)]
#[derive(new)]
#[derive(Deserialize, Serialize)]
pub struct WscTlv {
    pub payload: Bytes,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct PushButtonEventNotificationTlv {
    pub media: Vec<MediaEntry>,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(new)]
#[derive(Deserialize, Serialize)]
pub struct MediaEntry {
    pub media_type: u16,
    pub media_specific: Bytes,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(new)]
#[derive(Deserialize, Serialize)]
pub struct PushButtonJoinNotificationTlv {
    pub al_mac: MacAddr,
    pub message_id: u16,
    pub transmitter_mac: MacAddr,
    pub new_mac: MacAddr,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct GenericPhyDeviceInformationTlv {
    pub al_mac: MacAddr,
    pub interfaces: Vec<GenericPhyInterface>,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct GenericPhyInterface {
    pub mac: MacAddr,
    pub oui: [u8; 3],
    pub variant_index: u8,
    pub variant_name: String,
    pub url: String,
    pub media_specific: Bytes,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(new)]
#[derive(Deserialize, Serialize)]
pub struct DeviceIdentificationTlv {
    pub friendly_name: String,
    pub manufacturer_name: String,
    pub manufacturer_model: String,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(new)]
#[derive(Deserialize, Serialize)]
pub struct ControlUrlTlv {
    pub url: String,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct Ipv4Tlv {
    pub interfaces: Vec<Ipv4Interface>,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct Ipv4Interface {
    pub mac: MacAddr,
    pub entries: Vec<Ipv4Entry>,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(new)]
#[derive(Deserialize, Serialize)]
pub struct Ipv4Entry {
    pub addr_type: Ipv4AddrType,
    pub address: Ipv4Addr,
    pub dhcp_server: Ipv4Addr,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct Ipv6Tlv {
    pub interfaces: Vec<Ipv6Interface>,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct Ipv6Interface {
    pub mac: MacAddr,
    pub link_local: Ipv6Addr,
    pub entries: Vec<Ipv6Entry>,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(new)]
#[derive(Deserialize, Serialize)]
pub struct Ipv6Entry {
    pub addr_type: Ipv6AddrType,
    pub address: Ipv6Addr,
    pub origin: Ipv6Addr,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct PushButtonGenericPhyEventNotificationTlv {
    pub media: Vec<GenericPhyMedia>,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(new)]
#[derive(Deserialize, Serialize)]
pub struct GenericPhyMedia {
    pub oui: [u8; 3],
    pub variant_index: u8,
    pub media_specific: Bytes,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(new)]
#[derive(Deserialize, Serialize)]
pub struct ProfileVersionTlv {
    pub version: ProfileVersion,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct PowerOffInterfaceTlv {
    pub interfaces: Vec<PowerOffEntry>,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(new)]
#[derive(Deserialize, Serialize)]
pub struct PowerOffEntry {
    pub mac: MacAddr,
    pub media_type: u16,
    pub generic_phy: GenericPhyMedia,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct InterfacePowerChangeInformationTlv {
    pub interfaces: Vec<PowerChangeEntry>,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(new)]
#[derive(Deserialize, Serialize)]
pub struct PowerChangeEntry {
    pub mac: MacAddr,
    pub state: PowerState,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct InterfacePowerChangeStatusTlv {
    pub interfaces: Vec<PowerStatusEntry>,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(new)]
#[derive(Deserialize, Serialize)]
pub struct PowerStatusEntry {
    pub mac: MacAddr,
    pub status: PowerChangeStatus,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct SupportedServiceTlv {
    pub services: Vec<ServiceType>,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct SearchedServiceTlv {
    pub services: Vec<ServiceType>,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(new)]
#[derive(Deserialize, Serialize)]
pub struct UnknownTlv {
    pub tlv_type: u8,
    pub length: u16,
    pub value: Bytes,
}

// ===== impl Tlv =====

impl Tlv {
    // Decodes a stream of TLVs.
    //
    // Parsing stops at the end-of-message TLV (discarding any bytes past it)
    // or when the buffer is exhausted; the returned flag tells whether the
    // terminator was seen. Each TLV must fit within the buffer in full.
    pub fn decode_list(buf: &mut Bytes) -> DecodeResult<(Vec<Tlv>, bool)> {
        let mut tlvs = vec![];

        while buf.remaining() > 0 {
            // Parse TLV type.
            let tlv_type = buf.try_get_u8()?;

            // Parse and validate TLV length.
            let tlv_len = buf.try_get_u16()?;
            if tlv_len as usize > buf.remaining() {
                return Err(DecodeError::InvalidTlvLength(tlv_len));
            }

            // The end-of-message TLV terminates the stream.
            if tlv_type == TlvType::EndOfMessage as u8 {
                if tlv_len != 0 {
                    return Err(DecodeError::InvalidTlvLength(tlv_len));
                }
                return Ok((tlvs, true));
            }

            // Parse TLV value.
            let mut buf_tlv = buf.copy_to_bytes(tlv_len as usize);
            let tlv = Tlv::decode(tlv_type, tlv_len, &mut buf_tlv)?;
            tlvs.push(tlv);
        }

        Ok((tlvs, false))
    }

    // Decodes a single TLV value of the given type.
    fn decode(
        tlv_type: u8,
        tlv_len: u16,
        buf: &mut Bytes,
    ) -> DecodeResult<Tlv> {
        match TlvType::from_u8(tlv_type) {
            Some(TlvType::AlMacAddress) => {
                AlMacAddressTlv::decode(tlv_len, buf).map(Tlv::AlMacAddress)
            }
            Some(TlvType::MacAddress) => {
                MacAddressTlv::decode(tlv_len, buf).map(Tlv::MacAddress)
            }
            Some(TlvType::DeviceInformation) => {
                DeviceInformationTlv::decode(tlv_len, buf)
                    .map(Tlv::DeviceInformation)
            }
            Some(TlvType::DeviceBridgingCapability) => {
                DeviceBridgingCapabilityTlv::decode(tlv_len, buf)
                    .map(Tlv::DeviceBridgingCapability)
            }
            Some(TlvType::Non1905NeighborDeviceList) => {
                Non1905NeighborDeviceListTlv::decode(tlv_len, buf)
                    .map(Tlv::Non1905NeighborDeviceList)
            }
            Some(TlvType::NeighborDeviceList) => {
                NeighborDeviceListTlv::decode(tlv_len, buf)
                    .map(Tlv::NeighborDeviceList)
            }
            Some(TlvType::LinkMetricQuery) => {
                LinkMetricQueryTlv::decode(tlv_len, buf)
                    .map(Tlv::LinkMetricQuery)
            }
            Some(TlvType::TransmitterLinkMetric) => {
                TransmitterLinkMetricTlv::decode(tlv_len, buf)
                    .map(Tlv::TransmitterLinkMetric)
            }
            Some(TlvType::ReceiverLinkMetric) => {
                ReceiverLinkMetricTlv::decode(tlv_len, buf)
                    .map(Tlv::ReceiverLinkMetric)
            }
            Some(TlvType::VendorSpecific) => {
                VendorSpecificTlv::decode(tlv_len, buf)
                    .map(Tlv::VendorSpecific)
            }
            Some(TlvType::LinkMetricResultCode) => {
                LinkMetricResultCodeTlv::decode(tlv_len, buf)
                    .map(Tlv::LinkMetricResultCode)
            }
            Some(TlvType::SearchedRole) => {
                SearchedRoleTlv::decode(tlv_len, buf).map(Tlv::SearchedRole)
            }
            Some(TlvType::AutoconfigFreqBand) => {
                AutoconfigFreqBandTlv::decode(tlv_len, buf)
                    .map(Tlv::AutoconfigFreqBand)
            }
            Some(TlvType::SupportedRole) => {
                SupportedRoleTlv::decode(tlv_len, buf).map(Tlv::SupportedRole)
            }
            Some(TlvType::SupportedFreqBand) => {
                SupportedFreqBandTlv::decode(tlv_len, buf)
                    .map(Tlv::SupportedFreqBand)
            }
            Some(TlvType::Wsc) => {
                WscTlv::decode(tlv_len, buf).map(Tlv::Wsc)
            }
            Some(TlvType::PushButtonEventNotification) => {
                PushButtonEventNotificationTlv::decode(tlv_len, buf)
                    .map(Tlv::PushButtonEventNotification)
            }
            Some(TlvType::PushButtonJoinNotification) => {
                PushButtonJoinNotificationTlv::decode(tlv_len, buf)
                    .map(Tlv::PushButtonJoinNotification)
            }
            Some(TlvType::GenericPhyDeviceInformation) => {
                GenericPhyDeviceInformationTlv::decode(tlv_len, buf)
                    .map(Tlv::GenericPhyDeviceInformation)
            }
            Some(TlvType::DeviceIdentification) => {
                DeviceIdentificationTlv::decode(tlv_len, buf)
                    .map(Tlv::DeviceIdentification)
            }
            Some(TlvType::ControlUrl) => {
                ControlUrlTlv::decode(tlv_len, buf).map(Tlv::ControlUrl)
            }
            Some(TlvType::Ipv4) => {
                Ipv4Tlv::decode(tlv_len, buf).map(Tlv::Ipv4)
            }
            Some(TlvType::Ipv6) => {
                Ipv6Tlv::decode(tlv_len, buf).map(Tlv::Ipv6)
            }
            Some(TlvType::PushButtonGenericPhyEventNotification) => {
                PushButtonGenericPhyEventNotificationTlv::decode(tlv_len, buf)
                    .map(Tlv::PushButtonGenericPhyEventNotification)
            }
            Some(TlvType::ProfileVersion) => {
                ProfileVersionTlv::decode(tlv_len, buf)
                    .map(Tlv::ProfileVersion)
            }
            Some(TlvType::PowerOffInterface) => {
                PowerOffInterfaceTlv::decode(tlv_len, buf)
                    .map(Tlv::PowerOffInterface)
            }
            Some(TlvType::InterfacePowerChangeInformation) => {
                InterfacePowerChangeInformationTlv::decode(tlv_len, buf)
                    .map(Tlv::InterfacePowerChangeInformation)
            }
            Some(TlvType::InterfacePowerChangeStatus) => {
                InterfacePowerChangeStatusTlv::decode(tlv_len, buf)
                    .map(Tlv::InterfacePowerChangeStatus)
            }
            Some(TlvType::SupportedService) => {
                SupportedServiceTlv::decode(tlv_len, buf)
                    .map(Tlv::SupportedService)
            }
            Some(TlvType::SearchedService) => {
                SearchedServiceTlv::decode(tlv_len, buf)
                    .map(Tlv::SearchedService)
            }
            // The end-of-message TLV is consumed by `decode_list`.
            Some(TlvType::EndOfMessage) => unreachable!(),
            // Save unknown TLV.
            None => {
                let value = buf.copy_to_bytes(buf.remaining());
                Ok(Tlv::Unknown(UnknownTlv::new(tlv_type, tlv_len, value)))
            }
        }
        .map_err(|error| DecodeError::BadTlv(tlv_type, error))
    }

    // Encodes the TLV, including its type and length header.
    pub fn encode(&self, buf: &mut BytesMut) {
        match self {
            Tlv::AlMacAddress(tlv) => tlv.encode(buf),
            Tlv::MacAddress(tlv) => tlv.encode(buf),
            Tlv::DeviceInformation(tlv) => tlv.encode(buf),
            Tlv::DeviceBridgingCapability(tlv) => tlv.encode(buf),
            Tlv::Non1905NeighborDeviceList(tlv) => tlv.encode(buf),
            Tlv::NeighborDeviceList(tlv) => tlv.encode(buf),
            Tlv::LinkMetricQuery(tlv) => tlv.encode(buf),
            Tlv::TransmitterLinkMetric(tlv) => tlv.encode(buf),
            Tlv::ReceiverLinkMetric(tlv) => tlv.encode(buf),
            Tlv::VendorSpecific(tlv) => tlv.encode(buf),
            Tlv::LinkMetricResultCode(tlv) => tlv.encode(buf),
            Tlv::SearchedRole(tlv) => tlv.encode(buf),
            Tlv::AutoconfigFreqBand(tlv) => tlv.encode(buf),
            Tlv::SupportedRole(tlv) => tlv.encode(buf),
            Tlv::SupportedFreqBand(tlv) => tlv.encode(buf),
            Tlv::Wsc(tlv) => tlv.encode(buf),
            Tlv::PushButtonEventNotification(tlv) => tlv.encode(buf),
            Tlv::PushButtonJoinNotification(tlv) => tlv.encode(buf),
            Tlv::GenericPhyDeviceInformation(tlv) => tlv.encode(buf),
            Tlv::DeviceIdentification(tlv) => tlv.encode(buf),
            Tlv::ControlUrl(tlv) => tlv.encode(buf),
            Tlv::Ipv4(tlv) => tlv.encode(buf),
            Tlv::Ipv6(tlv) => tlv.encode(buf),
            Tlv::PushButtonGenericPhyEventNotification(tlv) => {
                tlv.encode(buf)
            }
            Tlv::ProfileVersion(tlv) => tlv.encode(buf),
            Tlv::PowerOffInterface(tlv) => tlv.encode(buf),
            Tlv::InterfacePowerChangeInformation(tlv) => tlv.encode(buf),
            Tlv::InterfacePowerChangeStatus(tlv) => tlv.encode(buf),
            Tlv::SupportedService(tlv) => tlv.encode(buf),
            Tlv::SearchedService(tlv) => tlv.encode(buf),
            Tlv::Unknown(tlv) => tlv.encode(buf),
        }
    }

    // Returns the TLV type octet.
    pub fn tlv_type(&self) -> u8 {
        match self {
            Tlv::AlMacAddress(_) => TlvType::AlMacAddress as u8,
            Tlv::MacAddress(_) => TlvType::MacAddress as u8,
            Tlv::DeviceInformation(_) => TlvType::DeviceInformation as u8,
            Tlv::DeviceBridgingCapability(_) => {
                TlvType::DeviceBridgingCapability as u8
            }
            Tlv::Non1905NeighborDeviceList(_) => {
                TlvType::Non1905NeighborDeviceList as u8
            }
            Tlv::NeighborDeviceList(_) => TlvType::NeighborDeviceList as u8,
            Tlv::LinkMetricQuery(_) => TlvType::LinkMetricQuery as u8,
            Tlv::TransmitterLinkMetric(_) => {
                TlvType::TransmitterLinkMetric as u8
            }
            Tlv::ReceiverLinkMetric(_) => TlvType::ReceiverLinkMetric as u8,
            Tlv::VendorSpecific(_) => TlvType::VendorSpecific as u8,
            Tlv::LinkMetricResultCode(_) => {
                TlvType::LinkMetricResultCode as u8
            }
            Tlv::SearchedRole(_) => TlvType::SearchedRole as u8,
            Tlv::AutoconfigFreqBand(_) => TlvType::AutoconfigFreqBand as u8,
            Tlv::SupportedRole(_) => TlvType::SupportedRole as u8,
            Tlv::SupportedFreqBand(_) => TlvType::SupportedFreqBand as u8,
            Tlv::Wsc(_) => TlvType::Wsc as u8,
            Tlv::PushButtonEventNotification(_) => {
                TlvType::PushButtonEventNotification as u8
            }
            Tlv::PushButtonJoinNotification(_) => {
                TlvType::PushButtonJoinNotification as u8
            }
            Tlv::GenericPhyDeviceInformation(_) => {
                TlvType::GenericPhyDeviceInformation as u8
            }
            Tlv::DeviceIdentification(_) => {
                TlvType::DeviceIdentification as u8
            }
            Tlv::ControlUrl(_) => TlvType::ControlUrl as u8,
            Tlv::Ipv4(_) => TlvType::Ipv4 as u8,
            Tlv::Ipv6(_) => TlvType::Ipv6 as u8,
            Tlv::PushButtonGenericPhyEventNotification(_) => {
                TlvType::PushButtonGenericPhyEventNotification as u8
            }
            Tlv::ProfileVersion(_) => TlvType::ProfileVersion as u8,
            Tlv::PowerOffInterface(_) => TlvType::PowerOffInterface as u8,
            Tlv::InterfacePowerChangeInformation(_) => {
                TlvType::InterfacePowerChangeInformation as u8
            }
            Tlv::InterfacePowerChangeStatus(_) => {
                TlvType::InterfacePowerChangeStatus as u8
            }
            Tlv::SupportedService(_) => TlvType::SupportedService as u8,
            Tlv::SearchedService(_) => TlvType::SearchedService as u8,
            Tlv::Unknown(tlv) => tlv.tlv_type,
        }
    }

    // Returns the full on-wire size of the TLV, header included.
    pub fn len(&self) -> usize {
        let value_len = match self {
            Tlv::AlMacAddress(_) | Tlv::MacAddress(_) => MacAddr::LENGTH,
            Tlv::DeviceInformation(tlv) => tlv.value_len(),
            Tlv::DeviceBridgingCapability(tlv) => tlv.value_len(),
            Tlv::Non1905NeighborDeviceList(tlv) => {
                MacAddr::LENGTH + tlv.neighbors.len() * MacAddr::LENGTH
            }
            Tlv::NeighborDeviceList(tlv) => {
                MacAddr::LENGTH
                    + tlv.neighbors.len() * NeighborDeviceListTlv::ENTRY_SIZE
            }
            Tlv::LinkMetricQuery(_) => LinkMetricQueryTlv::SIZE,
            Tlv::TransmitterLinkMetric(tlv) => {
                2 * MacAddr::LENGTH
                    + tlv.links.len() * TransmitterLinkMetricTlv::ENTRY_SIZE
            }
            Tlv::ReceiverLinkMetric(tlv) => {
                2 * MacAddr::LENGTH
                    + tlv.links.len() * ReceiverLinkMetricTlv::ENTRY_SIZE
            }
            Tlv::VendorSpecific(tlv) => 3 + tlv.payload.len(),
            Tlv::LinkMetricResultCode(_)
            | Tlv::SearchedRole(_)
            | Tlv::AutoconfigFreqBand(_)
            | Tlv::SupportedRole(_)
            | Tlv::SupportedFreqBand(_)
            | Tlv::ProfileVersion(_) => 1,
            Tlv::Wsc(tlv) => tlv.payload.len(),
            Tlv::PushButtonEventNotification(tlv) => tlv.value_len(),
            Tlv::PushButtonJoinNotification(_) => {
                PushButtonJoinNotificationTlv::SIZE
            }
            Tlv::GenericPhyDeviceInformation(tlv) => tlv.value_len(),
            Tlv::DeviceIdentification(_) => DeviceIdentificationTlv::SIZE,
            Tlv::ControlUrl(tlv) => tlv.url.len(),
            Tlv::Ipv4(tlv) => tlv.value_len(),
            Tlv::Ipv6(tlv) => tlv.value_len(),
            Tlv::PushButtonGenericPhyEventNotification(tlv) => {
                tlv.value_len()
            }
            Tlv::PowerOffInterface(tlv) => tlv.value_len(),
            Tlv::InterfacePowerChangeInformation(tlv) => {
                1 + tlv.interfaces.len() * 7
            }
            Tlv::InterfacePowerChangeStatus(tlv) => {
                1 + tlv.interfaces.len() * 7
            }
            Tlv::SupportedService(tlv) => 1 + tlv.services.len(),
            Tlv::SearchedService(tlv) => 1 + tlv.services.len(),
            Tlv::Unknown(tlv) => tlv.value.len(),
        };
        TLV_HDR_SIZE + value_len
    }
}

// ===== impl AlMacAddressTlv =====

impl AlMacAddressTlv {
    pub(crate) fn decode(
        tlv_len: u16,
        buf: &mut Bytes,
    ) -> TlvDecodeResult<Self> {
        // Validate the TLV length.
        if tlv_len as usize != MacAddr::LENGTH {
            return Err(TlvDecodeError::InvalidLength(tlv_len));
        }

        let al_mac = buf.try_get_mac()?;

        Ok(AlMacAddressTlv { al_mac })
    }

    pub(crate) fn encode(&self, buf: &mut BytesMut) {
        let start_pos = tlv_encode_start(buf, TlvType::AlMacAddress);
        buf.put_mac(&self.al_mac);
        tlv_encode_end(buf, start_pos);
    }
}

// ===== impl MacAddressTlv =====

impl MacAddressTlv {
    pub(crate) fn decode(
        tlv_len: u16,
        buf: &mut Bytes,
    ) -> TlvDecodeResult<Self> {
        // Validate the TLV length.
        if tlv_len as usize != MacAddr::LENGTH {
            return Err(TlvDecodeError::InvalidLength(tlv_len));
        }

        let mac = buf.try_get_mac()?;

        Ok(MacAddressTlv { mac })
    }

    pub(crate) fn encode(&self, buf: &mut BytesMut) {
        let start_pos = tlv_encode_start(buf, TlvType::MacAddress);
        buf.put_mac(&self.mac);
        tlv_encode_end(buf, start_pos);
    }
}

// ===== impl DeviceInformationTlv =====

impl DeviceInformationTlv {
    pub(crate) fn decode(
        tlv_len: u16,
        buf: &mut Bytes,
    ) -> TlvDecodeResult<Self> {
        let al_mac = buf.try_get_mac()?;

        // Parse local interface list.
        let count = buf.try_get_u8()?;
        let mut interfaces = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let mac = buf.try_get_mac()?;
            let media_type = buf.try_get_u16()?;

            // Parse media-specific information.
            let specific_len = buf.try_get_u8()?;
            if specific_len as usize > buf.remaining() {
                return Err(TlvDecodeError::InvalidLength(tlv_len));
            }
            let media_specific = buf.copy_to_bytes(specific_len as usize);

            interfaces.push(LocalInterface {
                mac,
                media_type,
                media_specific,
            });
        }
        if buf.remaining() != 0 {
            return Err(TlvDecodeError::InvalidLength(tlv_len));
        }

        Ok(DeviceInformationTlv { al_mac, interfaces })
    }

    pub(crate) fn encode(&self, buf: &mut BytesMut) {
        let start_pos = tlv_encode_start(buf, TlvType::DeviceInformation);
        buf.put_mac(&self.al_mac);
        buf.put_u8(self.interfaces.len() as u8);
        for entry in &self.interfaces {
            buf.put_mac(&entry.mac);
            buf.put_u16(entry.media_type);
            buf.put_u8(entry.media_specific.len() as u8);
            buf.put_slice(&entry.media_specific);
        }
        tlv_encode_end(buf, start_pos);
    }

    fn value_len(&self) -> usize {
        MacAddr::LENGTH
            + 1
            + self
                .interfaces
                .iter()
                .map(|entry| 9 + entry.media_specific.len())
                .sum::<usize>()
    }
}

// ===== impl DeviceBridgingCapabilityTlv =====

impl DeviceBridgingCapabilityTlv {
    pub(crate) fn decode(
        tlv_len: u16,
        buf: &mut Bytes,
    ) -> TlvDecodeResult<Self> {
        // Parse bridging tuple list.
        let count = buf.try_get_u8()?;
        let mut bridging_tuples = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let mac_count = buf.try_get_u8()?;
            let mut interfaces = Vec::with_capacity(mac_count as usize);
            for _ in 0..mac_count {
                interfaces.push(buf.try_get_mac()?);
            }
            bridging_tuples.push(BridgingTuple { interfaces });
        }
        if buf.remaining() != 0 {
            return Err(TlvDecodeError::InvalidLength(tlv_len));
        }

        Ok(DeviceBridgingCapabilityTlv { bridging_tuples })
    }

    pub(crate) fn encode(&self, buf: &mut BytesMut) {
        let start_pos =
            tlv_encode_start(buf, TlvType::DeviceBridgingCapability);
        buf.put_u8(self.bridging_tuples.len() as u8);
        for tuple in &self.bridging_tuples {
            buf.put_u8(tuple.interfaces.len() as u8);
            for mac in &tuple.interfaces {
                buf.put_mac(mac);
            }
        }
        tlv_encode_end(buf, start_pos);
    }

    fn value_len(&self) -> usize {
        1 + self
            .bridging_tuples
            .iter()
            .map(|tuple| 1 + tuple.interfaces.len() * MacAddr::LENGTH)
            .sum::<usize>()
    }
}

// ===== impl Non1905NeighborDeviceListTlv =====

impl Non1905NeighborDeviceListTlv {
    pub(crate) fn decode(
        tlv_len: u16,
        buf: &mut Bytes,
    ) -> TlvDecodeResult<Self> {
        // Validate the TLV length.
        if (tlv_len as usize) < MacAddr::LENGTH
            || (tlv_len as usize - MacAddr::LENGTH) % MacAddr::LENGTH != 0
        {
            return Err(TlvDecodeError::InvalidLength(tlv_len));
        }

        let local_mac = buf.try_get_mac()?;

        let mut neighbors = vec![];
        while buf.remaining() >= MacAddr::LENGTH {
            neighbors.push(buf.try_get_mac()?);
        }

        Ok(Non1905NeighborDeviceListTlv {
            local_mac,
            neighbors,
        })
    }

    pub(crate) fn encode(&self, buf: &mut BytesMut) {
        let start_pos =
            tlv_encode_start(buf, TlvType::Non1905NeighborDeviceList);
        buf.put_mac(&self.local_mac);
        for neighbor in &self.neighbors {
            buf.put_mac(neighbor);
        }
        tlv_encode_end(buf, start_pos);
    }
}

// ===== impl NeighborDeviceListTlv =====

impl NeighborDeviceListTlv {
    pub const ENTRY_SIZE: usize = 7;
    const FLAG_BRIDGE: u8 = 0x80;

    pub(crate) fn decode(
        tlv_len: u16,
        buf: &mut Bytes,
    ) -> TlvDecodeResult<Self> {
        // Validate the TLV length.
        if (tlv_len as usize) < MacAddr::LENGTH
            || (tlv_len as usize - MacAddr::LENGTH) % Self::ENTRY_SIZE != 0
        {
            return Err(TlvDecodeError::InvalidLength(tlv_len));
        }

        let local_mac = buf.try_get_mac()?;

        let mut neighbors = vec![];
        while buf.remaining() >= Self::ENTRY_SIZE {
            let al_mac = buf.try_get_mac()?;
            let flags = buf.try_get_u8()?;
            neighbors.push(NeighborEntry {
                al_mac,
                intermediate_legacy_bridge: flags & Self::FLAG_BRIDGE != 0,
            });
        }

        Ok(NeighborDeviceListTlv {
            local_mac,
            neighbors,
        })
    }

    pub(crate) fn encode(&self, buf: &mut BytesMut) {
        let start_pos = tlv_encode_start(buf, TlvType::NeighborDeviceList);
        buf.put_mac(&self.local_mac);
        for neighbor in &self.neighbors {
            buf.put_mac(&neighbor.al_mac);
            let mut flags = 0;
            if neighbor.intermediate_legacy_bridge {
                flags |= Self::FLAG_BRIDGE;
            }
            buf.put_u8(flags);
        }
        tlv_encode_end(buf, start_pos);
    }
}

// ===== impl LinkMetricQueryTlv =====

impl LinkMetricQueryTlv {
    pub const SIZE: usize = 8;

    pub(crate) fn decode(
        tlv_len: u16,
        buf: &mut Bytes,
    ) -> TlvDecodeResult<Self> {
        // Validate the TLV length.
        if tlv_len as usize != Self::SIZE {
            return Err(TlvDecodeError::InvalidLength(tlv_len));
        }

        let destination = buf.try_get_u8()?;
        let Some(destination) = LinkMetricDestination::from_u8(destination)
        else {
            return Err(TlvDecodeError::InvalidDestination(destination));
        };

        // The neighbor field is carried even for all-neighbor queries.
        let neighbor = buf.try_get_mac()?;

        let scope = buf.try_get_u8()?;
        let Some(scope) = LinkMetricScope::from_u8(scope) else {
            return Err(TlvDecodeError::InvalidLinkMetricScope(scope));
        };

        Ok(LinkMetricQueryTlv {
            destination,
            neighbor,
            scope,
        })
    }

    pub(crate) fn encode(&self, buf: &mut BytesMut) {
        let start_pos = tlv_encode_start(buf, TlvType::LinkMetricQuery);
        buf.put_u8(self.destination as u8);
        buf.put_mac(&self.neighbor);
        buf.put_u8(self.scope as u8);
        tlv_encode_end(buf, start_pos);
    }
}

// ===== impl TransmitterLinkMetricTlv =====

impl TransmitterLinkMetricTlv {
    pub const ENTRY_SIZE: usize = 29;

    pub(crate) fn decode(
        tlv_len: u16,
        buf: &mut Bytes,
    ) -> TlvDecodeResult<Self> {
        // Validate the TLV length.
        if (tlv_len as usize) < 2 * MacAddr::LENGTH
            || (tlv_len as usize - 2 * MacAddr::LENGTH) % Self::ENTRY_SIZE
                != 0
        {
            return Err(TlvDecodeError::InvalidLength(tlv_len));
        }

        let local_al_mac = buf.try_get_mac()?;
        let neighbor_al_mac = buf.try_get_mac()?;

        let mut links = vec![];
        while buf.remaining() >= Self::ENTRY_SIZE {
            links.push(TxLinkMetric {
                local_interface: buf.try_get_mac()?,
                neighbor_interface: buf.try_get_mac()?,
                intf_type: buf.try_get_u16()?,
                bridge_flag: buf.try_get_u8()? != 0,
                packet_errors: buf.try_get_u32()?,
                transmitted_packets: buf.try_get_u32()?,
                mac_throughput_capacity: buf.try_get_u16()?,
                link_availability: buf.try_get_u16()?,
                phy_rate: buf.try_get_u16()?,
            });
        }

        Ok(TransmitterLinkMetricTlv {
            local_al_mac,
            neighbor_al_mac,
            links,
        })
    }

    pub(crate) fn encode(&self, buf: &mut BytesMut) {
        let start_pos = tlv_encode_start(buf, TlvType::TransmitterLinkMetric);
        buf.put_mac(&self.local_al_mac);
        buf.put_mac(&self.neighbor_al_mac);
        for link in &self.links {
            buf.put_mac(&link.local_interface);
            buf.put_mac(&link.neighbor_interface);
            buf.put_u16(link.intf_type);
            buf.put_u8(link.bridge_flag as u8);
            buf.put_u32(link.packet_errors);
            buf.put_u32(link.transmitted_packets);
            buf.put_u16(link.mac_throughput_capacity);
            buf.put_u16(link.link_availability);
            buf.put_u16(link.phy_rate);
        }
        tlv_encode_end(buf, start_pos);
    }
}

// ===== impl ReceiverLinkMetricTlv =====

impl ReceiverLinkMetricTlv {
    pub const ENTRY_SIZE: usize = 23;

    pub(crate) fn decode(
        tlv_len: u16,
        buf: &mut Bytes,
    ) -> TlvDecodeResult<Self> {
        // Validate the TLV length.
        if (tlv_len as usize) < 2 * MacAddr::LENGTH
            || (tlv_len as usize - 2 * MacAddr::LENGTH) % Self::ENTRY_SIZE
                != 0
        {
            return Err(TlvDecodeError::InvalidLength(tlv_len));
        }

        let local_al_mac = buf.try_get_mac()?;
        let neighbor_al_mac = buf.try_get_mac()?;

        let mut links = vec![];
        while buf.remaining() >= Self::ENTRY_SIZE {
            links.push(RxLinkMetric {
                local_interface: buf.try_get_mac()?,
                neighbor_interface: buf.try_get_mac()?,
                intf_type: buf.try_get_u16()?,
                packet_errors: buf.try_get_u32()?,
                received_packets: buf.try_get_u32()?,
                rssi: buf.try_get_u8()?,
            });
        }

        Ok(ReceiverLinkMetricTlv {
            local_al_mac,
            neighbor_al_mac,
            links,
        })
    }

    pub(crate) fn encode(&self, buf: &mut BytesMut) {
        let start_pos = tlv_encode_start(buf, TlvType::ReceiverLinkMetric);
        buf.put_mac(&self.local_al_mac);
        buf.put_mac(&self.neighbor_al_mac);
        for link in &self.links {
            buf.put_mac(&link.local_interface);
            buf.put_mac(&link.neighbor_interface);
            buf.put_u16(link.intf_type);
            buf.put_u32(link.packet_errors);
            buf.put_u32(link.received_packets);
            buf.put_u8(link.rssi);
        }
        tlv_encode_end(buf, start_pos);
    }
}

// ===== impl VendorSpecificTlv =====

impl VendorSpecificTlv {
    pub(crate) fn decode(
        tlv_len: u16,
        buf: &mut Bytes,
    ) -> TlvDecodeResult<Self> {
        // Validate the TLV length.
        if (tlv_len as usize) < 3 {
            return Err(TlvDecodeError::InvalidLength(tlv_len));
        }

        let mut oui = [0; 3];
        buf.try_copy_to_slice(&mut oui)?;
        let payload = buf.copy_to_bytes(buf.remaining());

        Ok(VendorSpecificTlv { oui, payload })
    }

    pub(crate) fn encode(&self, buf: &mut BytesMut) {
        let start_pos = tlv_encode_start(buf, TlvType::VendorSpecific);
        buf.put_slice(&self.oui);
        buf.put_slice(&self.payload);
        tlv_encode_end(buf, start_pos);
    }
}

// ===== impl LinkMetricResultCodeTlv =====

impl LinkMetricResultCodeTlv {
    pub(crate) fn decode(
        tlv_len: u16,
        buf: &mut Bytes,
    ) -> TlvDecodeResult<Self> {
        // Validate the TLV length.
        if tlv_len != 1 {
            return Err(TlvDecodeError::InvalidLength(tlv_len));
        }

        let code = buf.try_get_u8()?;
        let Some(code) = LinkMetricResultCode::from_u8(code) else {
            return Err(TlvDecodeError::InvalidResultCode(code));
        };

        Ok(LinkMetricResultCodeTlv { code })
    }

    pub(crate) fn encode(&self, buf: &mut BytesMut) {
        let start_pos = tlv_encode_start(buf, TlvType::LinkMetricResultCode);
        buf.put_u8(self.code as u8);
        tlv_encode_end(buf, start_pos);
    }
}

// ===== impl SearchedRoleTlv =====

impl SearchedRoleTlv {
    pub(crate) fn decode(
        tlv_len: u16,
        buf: &mut Bytes,
    ) -> TlvDecodeResult<Self> {
        // Validate the TLV length.
        if tlv_len != 1 {
            return Err(TlvDecodeError::InvalidLength(tlv_len));
        }

        let role = buf.try_get_u8()?;
        let Some(role) = Role::from_u8(role) else {
            return Err(TlvDecodeError::InvalidRole(role));
        };

        Ok(SearchedRoleTlv { role })
    }

    pub(crate) fn encode(&self, buf: &mut BytesMut) {
        let start_pos = tlv_encode_start(buf, TlvType::SearchedRole);
        buf.put_u8(self.role as u8);
        tlv_encode_end(buf, start_pos);
    }
}

// ===== impl AutoconfigFreqBandTlv =====

impl AutoconfigFreqBandTlv {
    pub(crate) fn decode(
        tlv_len: u16,
        buf: &mut Bytes,
    ) -> TlvDecodeResult<Self> {
        // Validate the TLV length.
        if tlv_len != 1 {
            return Err(TlvDecodeError::InvalidLength(tlv_len));
        }

        let band = buf.try_get_u8()?;
        let Some(band) = FreqBand::from_u8(band) else {
            return Err(TlvDecodeError::InvalidFreqBand(band));
        };

        Ok(AutoconfigFreqBandTlv { band })
    }

    pub(crate) fn encode(&self, buf: &mut BytesMut) {
        let start_pos = tlv_encode_start(buf, TlvType::AutoconfigFreqBand);
        buf.put_u8(self.band as u8);
        tlv_encode_end(buf, start_pos);
    }
}

// ===== impl SupportedRoleTlv =====

impl SupportedRoleTlv {
    pub(crate) fn decode(
        tlv_len: u16,
        buf: &mut Bytes,
    ) -> TlvDecodeResult<Self> {
        // Validate the TLV length.
        if tlv_len != 1 {
            return Err(TlvDecodeError::InvalidLength(tlv_len));
        }

        let role = buf.try_get_u8()?;
        let Some(role) = Role::from_u8(role) else {
            return Err(TlvDecodeError::InvalidRole(role));
        };

        Ok(SupportedRoleTlv { role })
    }

    pub(crate) fn encode(&self, buf: &mut BytesMut) {
        let start_pos = tlv_encode_start(buf, TlvType::SupportedRole);
        buf.put_u8(self.role as u8);
        tlv_encode_end(buf, start_pos);
    }
}

// ===== impl SupportedFreqBandTlv =====

impl SupportedFreqBandTlv {
    pub(crate) fn decode(
        tlv_len: u16,
        buf: &mut Bytes,
    ) -> TlvDecodeResult<Self> {
        // Validate the TLV length.
        if tlv_len != 1 {
            return Err(TlvDecodeError::InvalidLength(tlv_len));
        }

        let band = buf.try_get_u8()?;
        let Some(band) = FreqBand::from_u8(band) else {
            return Err(TlvDecodeError::InvalidFreqBand(band));
        };

        Ok(SupportedFreqBandTlv { band })
    }

    pub(crate) fn encode(&self, buf: &mut BytesMut) {
        let start_pos = tlv_encode_start(buf, TlvType::SupportedFreqBand);
        buf.put_u8(self.band as u8);
        tlv_encode_end(buf, start_pos);
    }
}

// ===== impl WscTlv =====

impl WscTlv {
    pub(crate) fn decode(
        _tlv_len: u16,
        buf: &mut Bytes,
    ) -> TlvDecodeResult<Self> {
        let payload = buf.copy_to_bytes(buf.remaining());

        Ok(WscTlv { payload })
    }

    pub(crate) fn encode(&self, buf: &mut BytesMut) {
        let start_pos = tlv_encode_start(buf, TlvType::Wsc);
        buf.put_slice(&self.payload);
        tlv_encode_end(buf, start_pos);
    }
}

// ===== impl PushButtonEventNotificationTlv =====

impl PushButtonEventNotificationTlv {
    pub(crate) fn decode(
        tlv_len: u16,
        buf: &mut Bytes,
    ) -> TlvDecodeResult<Self> {
        // Parse media type list.
        let count = buf.try_get_u8()?;
        let mut media = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let media_type = buf.try_get_u16()?;
            let specific_len = buf.try_get_u8()?;
            if specific_len as usize > buf.remaining() {
                return Err(TlvDecodeError::InvalidLength(tlv_len));
            }
            let media_specific = buf.copy_to_bytes(specific_len as usize);
            media.push(MediaEntry {
                media_type,
                media_specific,
            });
        }
        if buf.remaining() != 0 {
            return Err(TlvDecodeError::InvalidLength(tlv_len));
        }

        Ok(PushButtonEventNotificationTlv { media })
    }

    pub(crate) fn encode(&self, buf: &mut BytesMut) {
        let start_pos =
            tlv_encode_start(buf, TlvType::PushButtonEventNotification);
        buf.put_u8(self.media.len() as u8);
        for entry in &self.media {
            buf.put_u16(entry.media_type);
            buf.put_u8(entry.media_specific.len() as u8);
            buf.put_slice(&entry.media_specific);
        }
        tlv_encode_end(buf, start_pos);
    }

    fn value_len(&self) -> usize {
        1 + self
            .media
            .iter()
            .map(|entry| 3 + entry.media_specific.len())
            .sum::<usize>()
    }
}

// ===== impl PushButtonJoinNotificationTlv =====

impl PushButtonJoinNotificationTlv {
    pub const SIZE: usize = 20;

    pub(crate) fn decode(
        tlv_len: u16,
        buf: &mut Bytes,
    ) -> TlvDecodeResult<Self> {
        // Validate the TLV length.
        if tlv_len as usize != Self::SIZE {
            return Err(TlvDecodeError::InvalidLength(tlv_len));
        }

        let al_mac = buf.try_get_mac()?;
        let message_id = buf.try_get_u16()?;
        let transmitter_mac = buf.try_get_mac()?;
        let new_mac = buf.try_get_mac()?;

        Ok(PushButtonJoinNotificationTlv {
            al_mac,
            message_id,
            transmitter_mac,
            new_mac,
        })
    }

    pub(crate) fn encode(&self, buf: &mut BytesMut) {
        let start_pos =
            tlv_encode_start(buf, TlvType::PushButtonJoinNotification);
        buf.put_mac(&self.al_mac);
        buf.put_u16(self.message_id);
        buf.put_mac(&self.transmitter_mac);
        buf.put_mac(&self.new_mac);
        tlv_encode_end(buf, start_pos);
    }
}

// ===== impl GenericPhyDeviceInformationTlv =====

impl GenericPhyDeviceInformationTlv {
    const VARIANT_NAME_SIZE: usize = 32;

    pub(crate) fn decode(
        tlv_len: u16,
        buf: &mut Bytes,
    ) -> TlvDecodeResult<Self> {
        let al_mac = buf.try_get_mac()?;

        // Parse generic PHY interface list.
        let count = buf.try_get_u8()?;
        let mut interfaces = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let mac = buf.try_get_mac()?;
            let mut oui = [0; 3];
            buf.try_copy_to_slice(&mut oui)?;
            let variant_index = buf.try_get_u8()?;
            let variant_name =
                get_fixed_str(buf, Self::VARIANT_NAME_SIZE)?;
            let url_len = buf.try_get_u8()?;
            let specific_len = buf.try_get_u8()?;
            if url_len as usize + specific_len as usize > buf.remaining() {
                return Err(TlvDecodeError::InvalidLength(tlv_len));
            }
            let url = buf.copy_to_bytes(url_len as usize);
            let url = String::from_utf8(url.to_vec())
                .map_err(|_| TlvDecodeError::InvalidUtf8)?;
            let media_specific = buf.copy_to_bytes(specific_len as usize);

            interfaces.push(GenericPhyInterface {
                mac,
                oui,
                variant_index,
                variant_name,
                url,
                media_specific,
            });
        }
        if buf.remaining() != 0 {
            return Err(TlvDecodeError::InvalidLength(tlv_len));
        }

        Ok(GenericPhyDeviceInformationTlv { al_mac, interfaces })
    }

    pub(crate) fn encode(&self, buf: &mut BytesMut) {
        let start_pos =
            tlv_encode_start(buf, TlvType::GenericPhyDeviceInformation);
        buf.put_mac(&self.al_mac);
        buf.put_u8(self.interfaces.len() as u8);
        for entry in &self.interfaces {
            buf.put_mac(&entry.mac);
            buf.put_slice(&entry.oui);
            buf.put_u8(entry.variant_index);
            put_fixed_str(buf, &entry.variant_name, Self::VARIANT_NAME_SIZE);
            buf.put_u8(entry.url.len() as u8);
            buf.put_u8(entry.media_specific.len() as u8);
            buf.put_slice(entry.url.as_bytes());
            buf.put_slice(&entry.media_specific);
        }
        tlv_encode_end(buf, start_pos);
    }

    fn value_len(&self) -> usize {
        MacAddr::LENGTH
            + 1
            + self
                .interfaces
                .iter()
                .map(|entry| {
                    MacAddr::LENGTH
                        + 3
                        + 1
                        + Self::VARIANT_NAME_SIZE
                        + 2
                        + entry.url.len()
                        + entry.media_specific.len()
                })
                .sum::<usize>()
    }
}

// ===== impl DeviceIdentificationTlv =====

impl DeviceIdentificationTlv {
    const FIELD_SIZE: usize = 64;
    pub const SIZE: usize = 3 * Self::FIELD_SIZE;

    pub(crate) fn decode(
        tlv_len: u16,
        buf: &mut Bytes,
    ) -> TlvDecodeResult<Self> {
        // Validate the TLV length.
        if tlv_len as usize != Self::SIZE {
            return Err(TlvDecodeError::InvalidLength(tlv_len));
        }

        let friendly_name = get_fixed_str(buf, Self::FIELD_SIZE)?;
        let manufacturer_name = get_fixed_str(buf, Self::FIELD_SIZE)?;
        let manufacturer_model = get_fixed_str(buf, Self::FIELD_SIZE)?;

        Ok(DeviceIdentificationTlv {
            friendly_name,
            manufacturer_name,
            manufacturer_model,
        })
    }

    pub(crate) fn encode(&self, buf: &mut BytesMut) {
        let start_pos = tlv_encode_start(buf, TlvType::DeviceIdentification);
        put_fixed_str(buf, &self.friendly_name, Self::FIELD_SIZE);
        put_fixed_str(buf, &self.manufacturer_name, Self::FIELD_SIZE);
        put_fixed_str(buf, &self.manufacturer_model, Self::FIELD_SIZE);
        tlv_encode_end(buf, start_pos);
    }
}

// ===== impl ControlUrlTlv =====

impl ControlUrlTlv {
    pub(crate) fn decode(
        _tlv_len: u16,
        buf: &mut Bytes,
    ) -> TlvDecodeResult<Self> {
        let url = buf.copy_to_bytes(buf.remaining());
        let url = String::from_utf8(url.to_vec())
            .map_err(|_| TlvDecodeError::InvalidUtf8)?;

        Ok(ControlUrlTlv { url })
    }

    pub(crate) fn encode(&self, buf: &mut BytesMut) {
        let start_pos = tlv_encode_start(buf, TlvType::ControlUrl);
        buf.put_slice(self.url.as_bytes());
        tlv_encode_end(buf, start_pos);
    }
}

// ===== impl Ipv4Tlv =====

impl Ipv4Tlv {
    const ENTRY_SIZE: usize = 9;

    pub(crate) fn decode(
        tlv_len: u16,
        buf: &mut Bytes,
    ) -> TlvDecodeResult<Self> {
        // Parse interface list.
        let count = buf.try_get_u8()?;
        let mut interfaces = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let mac = buf.try_get_mac()?;
            let entry_count = buf.try_get_u8()?;
            let mut entries = Vec::with_capacity(entry_count as usize);
            for _ in 0..entry_count {
                let addr_type = buf.try_get_u8()?;
                let Some(addr_type) = Ipv4AddrType::from_u8(addr_type) else {
                    return Err(TlvDecodeError::InvalidAddrType(addr_type));
                };
                let address = buf.try_get_ipv4()?;
                let dhcp_server = buf.try_get_ipv4()?;
                entries.push(Ipv4Entry {
                    addr_type,
                    address,
                    dhcp_server,
                });
            }
            interfaces.push(Ipv4Interface { mac, entries });
        }
        if buf.remaining() != 0 {
            return Err(TlvDecodeError::InvalidLength(tlv_len));
        }

        Ok(Ipv4Tlv { interfaces })
    }

    pub(crate) fn encode(&self, buf: &mut BytesMut) {
        let start_pos = tlv_encode_start(buf, TlvType::Ipv4);
        buf.put_u8(self.interfaces.len() as u8);
        for iface in &self.interfaces {
            buf.put_mac(&iface.mac);
            buf.put_u8(iface.entries.len() as u8);
            for entry in &iface.entries {
                buf.put_u8(entry.addr_type as u8);
                buf.put_ipv4(&entry.address);
                buf.put_ipv4(&entry.dhcp_server);
            }
        }
        tlv_encode_end(buf, start_pos);
    }

    fn value_len(&self) -> usize {
        1 + self
            .interfaces
            .iter()
            .map(|iface| 7 + iface.entries.len() * Self::ENTRY_SIZE)
            .sum::<usize>()
    }
}

// ===== impl Ipv6Tlv =====

impl Ipv6Tlv {
    const ENTRY_SIZE: usize = 33;

    pub(crate) fn decode(
        tlv_len: u16,
        buf: &mut Bytes,
    ) -> TlvDecodeResult<Self> {
        // Parse interface list.
        let count = buf.try_get_u8()?;
        let mut interfaces = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let mac = buf.try_get_mac()?;
            let link_local = buf.try_get_ipv6()?;
            let entry_count = buf.try_get_u8()?;
            let mut entries = Vec::with_capacity(entry_count as usize);
            for _ in 0..entry_count {
                let addr_type = buf.try_get_u8()?;
                let Some(addr_type) = Ipv6AddrType::from_u8(addr_type) else {
                    return Err(TlvDecodeError::InvalidAddrType(addr_type));
                };
                let address = buf.try_get_ipv6()?;
                let origin = buf.try_get_ipv6()?;
                entries.push(Ipv6Entry {
                    addr_type,
                    address,
                    origin,
                });
            }
            interfaces.push(Ipv6Interface {
                mac,
                link_local,
                entries,
            });
        }
        if buf.remaining() != 0 {
            return Err(TlvDecodeError::InvalidLength(tlv_len));
        }

        Ok(Ipv6Tlv { interfaces })
    }

    pub(crate) fn encode(&self, buf: &mut BytesMut) {
        let start_pos = tlv_encode_start(buf, TlvType::Ipv6);
        buf.put_u8(self.interfaces.len() as u8);
        for iface in &self.interfaces {
            buf.put_mac(&iface.mac);
            buf.put_ipv6(&iface.link_local);
            buf.put_u8(iface.entries.len() as u8);
            for entry in &iface.entries {
                buf.put_u8(entry.addr_type as u8);
                buf.put_ipv6(&entry.address);
                buf.put_ipv6(&entry.origin);
            }
        }
        tlv_encode_end(buf, start_pos);
    }

    fn value_len(&self) -> usize {
        1 + self
            .interfaces
            .iter()
            .map(|iface| 23 + iface.entries.len() * Self::ENTRY_SIZE)
            .sum::<usize>()
    }
}

// ===== impl PushButtonGenericPhyEventNotificationTlv =====

impl PushButtonGenericPhyEventNotificationTlv {
    pub(crate) fn decode(
        tlv_len: u16,
        buf: &mut Bytes,
    ) -> TlvDecodeResult<Self> {
        // Parse generic PHY media list.
        let count = buf.try_get_u8()?;
        let mut media = Vec::with_capacity(count as usize);
        for _ in 0..count {
            media.push(GenericPhyMedia::decode(tlv_len, buf)?);
        }
        if buf.remaining() != 0 {
            return Err(TlvDecodeError::InvalidLength(tlv_len));
        }

        Ok(PushButtonGenericPhyEventNotificationTlv { media })
    }

    pub(crate) fn encode(&self, buf: &mut BytesMut) {
        let start_pos = tlv_encode_start(
            buf,
            TlvType::PushButtonGenericPhyEventNotification,
        );
        buf.put_u8(self.media.len() as u8);
        for entry in &self.media {
            entry.encode(buf);
        }
        tlv_encode_end(buf, start_pos);
    }

    fn value_len(&self) -> usize {
        1 + self.media.iter().map(GenericPhyMedia::len).sum::<usize>()
    }
}

// ===== impl GenericPhyMedia =====

impl GenericPhyMedia {
    fn decode(tlv_len: u16, buf: &mut Bytes) -> TlvDecodeResult<Self> {
        let mut oui = [0; 3];
        buf.try_copy_to_slice(&mut oui)?;
        let variant_index = buf.try_get_u8()?;
        let specific_len = buf.try_get_u8()?;
        if specific_len as usize > buf.remaining() {
            return Err(TlvDecodeError::InvalidLength(tlv_len));
        }
        let media_specific = buf.copy_to_bytes(specific_len as usize);

        Ok(GenericPhyMedia {
            oui,
            variant_index,
            media_specific,
        })
    }

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_slice(&self.oui);
        buf.put_u8(self.variant_index);
        buf.put_u8(self.media_specific.len() as u8);
        buf.put_slice(&self.media_specific);
    }

    fn len(&self) -> usize {
        5 + self.media_specific.len()
    }
}

// ===== impl ProfileVersionTlv =====

impl ProfileVersionTlv {
    pub(crate) fn decode(
        tlv_len: u16,
        buf: &mut Bytes,
    ) -> TlvDecodeResult<Self> {
        // Validate the TLV length.
        if tlv_len != 1 {
            return Err(TlvDecodeError::InvalidLength(tlv_len));
        }

        let version = buf.try_get_u8()?;
        let Some(version) = ProfileVersion::from_u8(version) else {
            return Err(TlvDecodeError::InvalidProfileVersion(version));
        };

        Ok(ProfileVersionTlv { version })
    }

    pub(crate) fn encode(&self, buf: &mut BytesMut) {
        let start_pos = tlv_encode_start(buf, TlvType::ProfileVersion);
        buf.put_u8(self.version as u8);
        tlv_encode_end(buf, start_pos);
    }
}

// ===== impl PowerOffInterfaceTlv =====

impl PowerOffInterfaceTlv {
    pub(crate) fn decode(
        tlv_len: u16,
        buf: &mut Bytes,
    ) -> TlvDecodeResult<Self> {
        // Parse powered-off interface list.
        let count = buf.try_get_u8()?;
        let mut interfaces = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let mac = buf.try_get_mac()?;
            let media_type = buf.try_get_u16()?;
            let generic_phy = GenericPhyMedia::decode(tlv_len, buf)?;
            interfaces.push(PowerOffEntry {
                mac,
                media_type,
                generic_phy,
            });
        }
        if buf.remaining() != 0 {
            return Err(TlvDecodeError::InvalidLength(tlv_len));
        }

        Ok(PowerOffInterfaceTlv { interfaces })
    }

    pub(crate) fn encode(&self, buf: &mut BytesMut) {
        let start_pos = tlv_encode_start(buf, TlvType::PowerOffInterface);
        buf.put_u8(self.interfaces.len() as u8);
        for entry in &self.interfaces {
            buf.put_mac(&entry.mac);
            buf.put_u16(entry.media_type);
            entry.generic_phy.encode(buf);
        }
        tlv_encode_end(buf, start_pos);
    }

    fn value_len(&self) -> usize {
        1 + self
            .interfaces
            .iter()
            .map(|entry| 8 + entry.generic_phy.len())
            .sum::<usize>()
    }
}

// ===== impl InterfacePowerChangeInformationTlv =====

impl InterfacePowerChangeInformationTlv {
    pub(crate) fn decode(
        tlv_len: u16,
        buf: &mut Bytes,
    ) -> TlvDecodeResult<Self> {
        // Parse power change list.
        let count = buf.try_get_u8()?;
        let mut interfaces = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let mac = buf.try_get_mac()?;
            let state = buf.try_get_u8()?;
            let Some(state) = PowerState::from_u8(state) else {
                return Err(TlvDecodeError::InvalidPowerState(state));
            };
            interfaces.push(PowerChangeEntry { mac, state });
        }
        if buf.remaining() != 0 {
            return Err(TlvDecodeError::InvalidLength(tlv_len));
        }

        Ok(InterfacePowerChangeInformationTlv { interfaces })
    }

    pub(crate) fn encode(&self, buf: &mut BytesMut) {
        let start_pos =
            tlv_encode_start(buf, TlvType::InterfacePowerChangeInformation);
        buf.put_u8(self.interfaces.len() as u8);
        for entry in &self.interfaces {
            buf.put_mac(&entry.mac);
            buf.put_u8(entry.state as u8);
        }
        tlv_encode_end(buf, start_pos);
    }
}

// ===== impl InterfacePowerChangeStatusTlv =====

impl InterfacePowerChangeStatusTlv {
    pub(crate) fn decode(
        tlv_len: u16,
        buf: &mut Bytes,
    ) -> TlvDecodeResult<Self> {
        // Parse power change status list.
        let count = buf.try_get_u8()?;
        let mut interfaces = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let mac = buf.try_get_mac()?;
            let status = buf.try_get_u8()?;
            let Some(status) = PowerChangeStatus::from_u8(status) else {
                return Err(TlvDecodeError::InvalidPowerChangeStatus(status));
            };
            interfaces.push(PowerStatusEntry { mac, status });
        }
        if buf.remaining() != 0 {
            return Err(TlvDecodeError::InvalidLength(tlv_len));
        }

        Ok(InterfacePowerChangeStatusTlv { interfaces })
    }

    pub(crate) fn encode(&self, buf: &mut BytesMut) {
        let start_pos =
            tlv_encode_start(buf, TlvType::InterfacePowerChangeStatus);
        buf.put_u8(self.interfaces.len() as u8);
        for entry in &self.interfaces {
            buf.put_mac(&entry.mac);
            buf.put_u8(entry.status as u8);
        }
        tlv_encode_end(buf, start_pos);
    }
}

// ===== impl SupportedServiceTlv =====

impl SupportedServiceTlv {
    pub(crate) fn decode(
        tlv_len: u16,
        buf: &mut Bytes,
    ) -> TlvDecodeResult<Self> {
        let services = decode_service_list(tlv_len, buf)?;

        Ok(SupportedServiceTlv { services })
    }

    pub(crate) fn encode(&self, buf: &mut BytesMut) {
        let start_pos = tlv_encode_start(buf, TlvType::SupportedService);
        encode_service_list(buf, &self.services);
        tlv_encode_end(buf, start_pos);
    }
}

// ===== impl SearchedServiceTlv =====

impl SearchedServiceTlv {
    pub(crate) fn decode(
        tlv_len: u16,
        buf: &mut Bytes,
    ) -> TlvDecodeResult<Self> {
        let services = decode_service_list(tlv_len, buf)?;

        Ok(SearchedServiceTlv { services })
    }

    pub(crate) fn encode(&self, buf: &mut BytesMut) {
        let start_pos = tlv_encode_start(buf, TlvType::SearchedService);
        encode_service_list(buf, &self.services);
        tlv_encode_end(buf, start_pos);
    }
}

// ===== impl UnknownTlv =====

impl UnknownTlv {
    pub(crate) fn encode(&self, buf: &mut BytesMut) {
        let start_pos = tlv_encode_start(buf, self.tlv_type);
        buf.put_slice(&self.value);
        tlv_encode_end(buf, start_pos);
    }
}

// ===== helper functions =====

// Writes the TLV header, leaving the length to be rewritten later.
pub(crate) fn tlv_encode_start(
    buf: &mut BytesMut,
    tlv_type: impl ToPrimitive,
) -> usize {
    let start_pos = buf.len();
    buf.put_u8(tlv_type.to_u8().unwrap());
    // The TLV length will be rewritten later.
    buf.put_u16(0);
    start_pos
}

// Rewrites the TLV length.
pub(crate) fn tlv_encode_end(buf: &mut BytesMut, start_pos: usize) {
    let tlv_len = (buf.len() - start_pos - TLV_HDR_SIZE) as u16;
    buf[start_pos + 1..start_pos + TLV_HDR_SIZE]
        .copy_from_slice(&tlv_len.to_be_bytes());
}

// Reads a fixed-size NUL-padded string field.
fn get_fixed_str(buf: &mut Bytes, size: usize) -> TlvDecodeResult<String> {
    let mut raw = vec![0; size];
    buf.try_copy_to_slice(&mut raw)?;
    let end = raw.iter().position(|&b| b == 0).unwrap_or(size);
    raw.truncate(end);
    String::from_utf8(raw).map_err(|_| TlvDecodeError::InvalidUtf8)
}

// Writes a fixed-size NUL-padded string field, truncating if needed.
fn put_fixed_str(buf: &mut BytesMut, s: &str, size: usize) {
    let bytes = s.as_bytes();
    let len = bytes.len().min(size);
    buf.put_slice(&bytes[..len]);
    buf.put_bytes(0, size - len);
}

fn decode_service_list(
    tlv_len: u16,
    buf: &mut Bytes,
) -> TlvDecodeResult<Vec<ServiceType>> {
    let count = buf.try_get_u8()?;
    if count as usize != buf.remaining() {
        return Err(TlvDecodeError::InvalidLength(tlv_len));
    }
    let mut services = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let service = buf.try_get_u8()?;
        let Some(service) = ServiceType::from_u8(service) else {
            return Err(TlvDecodeError::InvalidServiceType(service));
        };
        services.push(service);
    }
    Ok(services)
}

fn encode_service_list(buf: &mut BytesMut, services: &[ServiceType]) {
    buf.put_u8(services.len() as u8);
    for service in services {
        buf.put_u8(*service as u8);
    }
}
