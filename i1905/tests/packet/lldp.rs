//
// Copyright (c) The i1905 Contributors
//
// SPDX-License-Identifier: MIT
//

use std::sync::LazyLock as Lazy;

use bytes::Bytes;
use i1905::packet::consts::LldpTlvType;
use i1905::packet::error::DecodeError;
use i1905::packet::lldp::{
    ChassisIdTlv, Lldpdu, PortIdTlv, TimeToLiveTlv,
};
use i1905::packet::tlv::UnknownTlv;

use super::assert_eq_hex;

const ADDR_AL: [u8; 6] = [0x02, 0xee, 0xff, 0x33, 0x44, 0x00];
const ADDR_MAC0: [u8; 6] = [0x00, 0xee, 0xff, 0x33, 0x44, 0x00];

//
// Test packets.
//

static BRIDGE_DISCOVERY1: Lazy<(Vec<u8>, Lldpdu)> = Lazy::new(|| {
    (
        vec![
            // Chassis ID TLV (subtype 4, MAC address).
            0x02, 0x07, 0x04, 0x02, 0xee, 0xff, 0x33, 0x44, 0x00,
            // Port ID TLV (subtype 3, MAC address).
            0x04, 0x07, 0x03, 0x00, 0xee, 0xff, 0x33, 0x44, 0x00,
            // Time to live TLV.
            0x06, 0x02, 0x00, 0xb4,
            // End of LLDPDU TLV.
            0x00, 0x00,
        ],
        Lldpdu {
            chassis_id: ChassisIdTlv {
                mac: ADDR_AL.into(),
            },
            port_id: PortIdTlv {
                mac: ADDR_MAC0.into(),
            },
            ttl: TimeToLiveTlv {
                ttl: TimeToLiveTlv::DEFAULT,
            },
            optional: vec![],
        },
    )
});

// LLDPDU carrying an optional TLV (System Name) after the mandatory set.
static BRIDGE_DISCOVERY2: Lazy<(Vec<u8>, Lldpdu)> = Lazy::new(|| {
    (
        vec![
            // Chassis ID TLV (subtype 4, MAC address).
            0x02, 0x07, 0x04, 0x02, 0xee, 0xff, 0x33, 0x44, 0x00,
            // Port ID TLV (subtype 3, MAC address).
            0x04, 0x07, 0x03, 0x00, 0xee, 0xff, 0x33, 0x44, 0x00,
            // Time to live TLV.
            0x06, 0x02, 0x00, 0xb4,
            // System Name TLV.
            0x0a, 0x04, 0x74, 0x65, 0x73, 0x74,
            // End of LLDPDU TLV.
            0x00, 0x00,
        ],
        Lldpdu {
            chassis_id: ChassisIdTlv {
                mac: ADDR_AL.into(),
            },
            port_id: PortIdTlv {
                mac: ADDR_MAC0.into(),
            },
            ttl: TimeToLiveTlv {
                ttl: TimeToLiveTlv::DEFAULT,
            },
            optional: vec![UnknownTlv::new(
                5,
                4,
                Bytes::from_static(b"test"),
            )],
        },
    )
});

//
// Tests.
//

#[test]
fn decode_bridge_discovery1() {
    let (ref bytes, ref lldpdu) = *BRIDGE_DISCOVERY1;
    let actual = Lldpdu::decode(Bytes::copy_from_slice(bytes)).unwrap();
    assert_eq!(*lldpdu, actual);
}

#[test]
fn encode_bridge_discovery1() {
    let (ref bytes, ref lldpdu) = *BRIDGE_DISCOVERY1;
    assert_eq_hex(bytes, &lldpdu.encode());
}

#[test]
fn decode_bridge_discovery2() {
    let (ref bytes, ref lldpdu) = *BRIDGE_DISCOVERY2;
    let actual = Lldpdu::decode(Bytes::copy_from_slice(bytes)).unwrap();
    assert_eq!(*lldpdu, actual);
}

#[test]
fn encode_bridge_discovery2() {
    let (ref bytes, ref lldpdu) = *BRIDGE_DISCOVERY2;
    assert_eq_hex(bytes, &lldpdu.encode());
}

// The payload must carry exactly one of each mandatory TLV.
#[test]
fn decode_missing_ttl() {
    let bytes = [
        0x02, 0x07, 0x04, 0x02, 0xee, 0xff, 0x33, 0x44, 0x00, // chassis
        0x04, 0x07, 0x03, 0x00, 0xee, 0xff, 0x33, 0x44, 0x00, // port
        0x00, 0x00, // end
    ];
    assert!(matches!(
        Lldpdu::decode(Bytes::copy_from_slice(&bytes)),
        Err(DecodeError::MissingMandatoryTlv(LldpTlvType::TimeToLive))
    ));
}

#[test]
fn decode_duplicate_chassis_id() {
    let bytes = [
        0x02, 0x07, 0x04, 0x02, 0xee, 0xff, 0x33, 0x44, 0x00, // chassis
        0x02, 0x07, 0x04, 0x02, 0xee, 0xff, 0x33, 0x44, 0x01, // chassis
        0x04, 0x07, 0x03, 0x00, 0xee, 0xff, 0x33, 0x44, 0x00, // port
        0x06, 0x02, 0x00, 0xb4, // ttl
        0x00, 0x00, // end
    ];
    assert!(matches!(
        Lldpdu::decode(Bytes::copy_from_slice(&bytes)),
        Err(DecodeError::DuplicateMandatoryTlv(LldpTlvType::ChassisId))
    ));
}

// A payload that runs out before the end-of-LLDPDU TLV is rejected.
#[test]
fn decode_unterminated() {
    let bytes = [
        0x02, 0x07, 0x04, 0x02, 0xee, 0xff, 0x33, 0x44, 0x00, // chassis
        0x04, 0x07, 0x03, 0x00, 0xee, 0xff, 0x33, 0x44, 0x00, // port
        0x06, 0x02, 0x00, 0xb4, // ttl
    ];
    assert!(matches!(
        Lldpdu::decode(Bytes::copy_from_slice(&bytes)),
        Err(DecodeError::ReadOutOfBounds)
    ));
}

// A chassis ID that is not a MAC address is unsupported.
#[test]
fn decode_bad_chassis_id_subtype() {
    let bytes = [
        0x02, 0x07, 0x07, 0x02, 0xee, 0xff, 0x33, 0x44, 0x00, // chassis
        0x04, 0x07, 0x03, 0x00, 0xee, 0xff, 0x33, 0x44, 0x00, // port
        0x06, 0x02, 0x00, 0xb4, // ttl
        0x00, 0x00, // end
    ];
    assert!(matches!(
        Lldpdu::decode(Bytes::copy_from_slice(&bytes)),
        Err(DecodeError::BadTlv(1, _))
    ));
}
