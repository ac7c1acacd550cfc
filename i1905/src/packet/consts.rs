//
// Copyright (c) The i1905 Contributors
//
// SPDX-License-Identifier: MIT
//

use num_derive::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};

// EtherType reserved for 1905.1 CMDUs.
pub const ETHER_TYPE_1905: u16 = 0x893A;
// EtherType reserved for LLDP.
pub const ETHER_TYPE_LLDP: u16 = 0x88CC;

// CMDU message versions.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[derive(FromPrimitive, ToPrimitive)]
#[derive(Deserialize, Serialize)]
pub enum MessageVersion {
    // IEEE 1905.1-2013.
    V2013 = 0x00,
    // IEEE 1905.1a-2014.
    V2014 = 0x01,
}

// CMDU message types.
//
// IEEE 1905.1a-2014, Table 6-3.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[derive(FromPrimitive, ToPrimitive)]
#[derive(Deserialize, Serialize)]
pub enum MessageType {
    TopologyDiscovery = 0x0000,
    TopologyNotification = 0x0001,
    TopologyQuery = 0x0002,
    TopologyResponse = 0x0003,
    VendorSpecific = 0x0004,
    LinkMetricQuery = 0x0005,
    LinkMetricResponse = 0x0006,
    ApAutoconfigSearch = 0x0007,
    ApAutoconfigResponse = 0x0008,
    ApAutoconfigWsc = 0x0009,
    ApAutoconfigRenew = 0x000A,
    PushButtonEventNotification = 0x000B,
    PushButtonJoinNotification = 0x000C,
    HigherLayerQuery = 0x000D,
    HigherLayerResponse = 0x000E,
    InterfacePowerChangeRequest = 0x000F,
    InterfacePowerChangeResponse = 0x0010,
    GenericPhyQuery = 0x0011,
    GenericPhyResponse = 0x0012,
}

// ===== impl MessageType =====

impl MessageType {
    // Returns whether CMDUs of this type are sent as relayed multicast.
    //
    // IEEE 1905.1a-2014, Table 6-1.
    pub const fn is_relayed_multicast(&self) -> bool {
        matches!(
            self,
            MessageType::TopologyNotification
                | MessageType::ApAutoconfigSearch
                | MessageType::ApAutoconfigRenew
                | MessageType::PushButtonEventNotification
                | MessageType::PushButtonJoinNotification
        )
    }
}

// 1905.1 TLV types.
//
// IEEE 1905.1a-2014, Table 6-7, plus the Multi-AP service TLVs.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[derive(FromPrimitive, ToPrimitive)]
#[derive(Deserialize, Serialize)]
pub enum TlvType {
    EndOfMessage = 0x00,
    AlMacAddress = 0x01,
    MacAddress = 0x02,
    DeviceInformation = 0x03,
    DeviceBridgingCapability = 0x04,
    Non1905NeighborDeviceList = 0x06,
    NeighborDeviceList = 0x07,
    LinkMetricQuery = 0x08,
    TransmitterLinkMetric = 0x09,
    ReceiverLinkMetric = 0x0A,
    VendorSpecific = 0x0B,
    LinkMetricResultCode = 0x0C,
    SearchedRole = 0x0D,
    AutoconfigFreqBand = 0x0E,
    SupportedRole = 0x0F,
    SupportedFreqBand = 0x10,
    Wsc = 0x11,
    PushButtonEventNotification = 0x12,
    PushButtonJoinNotification = 0x13,
    GenericPhyDeviceInformation = 0x14,
    DeviceIdentification = 0x15,
    ControlUrl = 0x16,
    Ipv4 = 0x17,
    Ipv6 = 0x18,
    PushButtonGenericPhyEventNotification = 0x19,
    ProfileVersion = 0x1A,
    PowerOffInterface = 0x1B,
    InterfacePowerChangeInformation = 0x1C,
    InterfacePowerChangeStatus = 0x1D,
    SupportedService = 0x80,
    SearchedService = 0x81,
}

// LLDP TLV types.
//
// IEEE 802.1AB-2009, Table 8-1.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[derive(FromPrimitive, ToPrimitive)]
#[derive(Deserialize, Serialize)]
pub enum LldpTlvType {
    EndOfLldpdu = 0,
    ChassisId = 1,
    PortId = 2,
    TimeToLive = 3,
}

// Link metric query destination field.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[derive(FromPrimitive, ToPrimitive)]
#[derive(Deserialize, Serialize)]
pub enum LinkMetricDestination {
    AllNeighbors = 0x00,
    SpecificNeighbor = 0x01,
}

// Link metric query "metrics requested" field.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[derive(FromPrimitive, ToPrimitive)]
#[derive(Deserialize, Serialize)]
pub enum LinkMetricScope {
    Tx = 0x00,
    Rx = 0x01,
    Both = 0x02,
}

// Link metric result codes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[derive(FromPrimitive, ToPrimitive)]
#[derive(Deserialize, Serialize)]
pub enum LinkMetricResultCode {
    InvalidNeighbor = 0x00,
}

// WSC registrar/enrollee roles.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[derive(FromPrimitive, ToPrimitive)]
#[derive(Deserialize, Serialize)]
pub enum Role {
    Registrar = 0x00,
}

// Autoconfiguration frequency bands.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[derive(FromPrimitive, ToPrimitive)]
#[derive(Deserialize, Serialize)]
pub enum FreqBand {
    Band2_4GHz = 0x00,
    Band5GHz = 0x01,
    Band60GHz = 0x02,
}

// Multi-AP service types.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[derive(FromPrimitive, ToPrimitive)]
#[derive(Deserialize, Serialize)]
pub enum ServiceType {
    Controller = 0x00,
    Agent = 0x01,
}

// Interface power states.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[derive(FromPrimitive, ToPrimitive)]
#[derive(Deserialize, Serialize)]
pub enum PowerState {
    Off = 0x00,
    On = 0x01,
    Save = 0x02,
}

// Interface power change status codes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[derive(FromPrimitive, ToPrimitive)]
#[derive(Deserialize, Serialize)]
pub enum PowerChangeStatus {
    Completed = 0x00,
    NoChange = 0x01,
    AlternativeChange = 0x02,
}

// 1905 profile versions.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[derive(FromPrimitive, ToPrimitive)]
#[derive(Deserialize, Serialize)]
pub enum ProfileVersion {
    V1905_1 = 0x00,
    V1905_1A = 0x01,
}

// IPv4 address provisioning types.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[derive(FromPrimitive, ToPrimitive)]
#[derive(Deserialize, Serialize)]
pub enum Ipv4AddrType {
    Unknown = 0x00,
    Dhcp = 0x01,
    Static = 0x02,
    AutoIp = 0x03,
}

// IPv6 address provisioning types.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[derive(FromPrimitive, ToPrimitive)]
#[derive(Deserialize, Serialize)]
pub enum Ipv6AddrType {
    Unknown = 0x00,
    Dhcp = 0x01,
    Static = 0x02,
    Slaac = 0x03,
}
