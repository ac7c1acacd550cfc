//
// Copyright (c) The i1905 Contributors
//
// SPDX-License-Identifier: MIT
//

use std::sync::LazyLock as Lazy;

use bytes::Bytes;
use i1905::packet::cmdu::Cmdu;
use i1905::packet::consts::{
    LinkMetricDestination, LinkMetricScope, MessageVersion,
};
use i1905::packet::error::{AddTlvError, DecodeError};
use i1905::packet::tlv::{
    AlMacAddressTlv, LinkMetricQueryTlv, MacAddressTlv,
    Non1905NeighborDeviceListTlv, Tlv, UnknownTlv,
};
use i1905::packet::{CmduHeader, masked_eq};

use super::{test_decode_cmdu, test_encode_cmdu};

//
// Test addresses.
//

const ADDR_AL: [u8; 6] = [0x02, 0xee, 0xff, 0x33, 0x44, 0x00];
const ADDR_MAC0: [u8; 6] = [0x00, 0xee, 0xff, 0x33, 0x44, 0x00];
const ADDR_AL_PEER0: [u8; 6] = [0x02, 0xaa, 0xbb, 0x33, 0x44, 0x00];
const ADDR_MCAST_1905: [u8; 6] = [0x01, 0x80, 0xc2, 0x00, 0x00, 0x13];

//
// Test packets.
//

static LINK_METRIC_QUERY1: Lazy<(Vec<Vec<u8>>, Cmdu)> = Lazy::new(|| {
    (
        vec![vec![
            // Ethernet header.
            0x02, 0xee, 0xff, 0x33, 0x44, 0x00, // dst
            0x02, 0xaa, 0xbb, 0x33, 0x44, 0x00, // src
            0x89, 0x3a, // EtherType
            // CMDU header.
            0x00, 0x00, // version + reserved
            0x00, 0x05, // message type
            0x12, 0x34, // message id
            0x00, // fragment id
            0x80, // flags (last fragment)
            // Link metric query TLV.
            0x08, 0x00, 0x08, 0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66,
            0x00,
            // End-of-message TLV.
            0x00, 0x00, 0x00,
        ]],
        Cmdu {
            message_version: MessageVersion::V2013,
            message_type: 0x0005,
            message_id: 0x1234,
            relay: false,
            tlvs: vec![Tlv::LinkMetricQuery(LinkMetricQueryTlv {
                destination: LinkMetricDestination::AllNeighbors,
                neighbor: [0x11, 0x22, 0x33, 0x44, 0x55, 0x66].into(),
                scope: LinkMetricScope::Tx,
            })],
        },
    )
});

static TOPOLOGY_DISCOVERY1: Lazy<(Vec<Vec<u8>>, Cmdu)> = Lazy::new(|| {
    (
        vec![vec![
            // Ethernet header.
            0x01, 0x80, 0xc2, 0x00, 0x00, 0x13, // dst
            0x00, 0xee, 0xff, 0x33, 0x44, 0x00, // src
            0x89, 0x3a, // EtherType
            // CMDU header.
            0x00, 0x00, // version + reserved
            0x00, 0x00, // message type
            0x00, 0x42, // message id
            0x00, // fragment id
            0x80, // flags (last fragment)
            // AL MAC address TLV.
            0x01, 0x00, 0x06, 0x02, 0xee, 0xff, 0x33, 0x44, 0x00,
            // MAC address TLV.
            0x02, 0x00, 0x06, 0x00, 0xee, 0xff, 0x33, 0x44, 0x00,
            // End-of-message TLV.
            0x00, 0x00, 0x00,
        ]],
        Cmdu {
            message_version: MessageVersion::V2013,
            message_type: 0x0000,
            message_id: 0x0042,
            relay: false,
            tlvs: vec![
                Tlv::AlMacAddress(AlMacAddressTlv::new(ADDR_AL.into())),
                Tlv::MacAddress(MacAddressTlv::new(ADDR_MAC0.into())),
            ],
        },
    )
});

// CMDU of an undefined message type carrying an undefined TLV.
static UNKNOWN_TLV1: Lazy<(Vec<Vec<u8>>, Cmdu)> = Lazy::new(|| {
    (
        vec![vec![
            // Ethernet header.
            0x02, 0xee, 0xff, 0x33, 0x44, 0x00, // dst
            0x02, 0xaa, 0xbb, 0x33, 0x44, 0x00, // src
            0x89, 0x3a, // EtherType
            // CMDU header.
            0x00, 0x00, // version + reserved
            0x08, 0x07, // message type
            0xbe, 0xef, // message id
            0x00, // fragment id
            0x80, // flags (last fragment)
            // Undefined TLV.
            0xf7, 0x00, 0x04, 0xde, 0xad, 0xbe, 0xef,
            // End-of-message TLV.
            0x00, 0x00, 0x00,
        ]],
        Cmdu {
            message_version: MessageVersion::V2013,
            message_type: 0x0807,
            message_id: 0xbeef,
            relay: false,
            tlvs: vec![Tlv::Unknown(UnknownTlv::new(
                0xf7,
                4,
                Bytes::from_static(&[0xde, 0xad, 0xbe, 0xef]),
            ))],
        },
    )
});

//
// Tests.
//

#[test]
fn decode_link_metric_query1() {
    let (ref frames, ref cmdu) = *LINK_METRIC_QUERY1;
    test_decode_cmdu(frames, cmdu);
}

#[test]
fn encode_link_metric_query1() {
    let (ref frames, ref cmdu) = *LINK_METRIC_QUERY1;
    test_encode_cmdu(frames, cmdu, ADDR_AL_PEER0, ADDR_AL, 1500);
}

#[test]
fn decode_topology_discovery1() {
    let (ref frames, ref cmdu) = *TOPOLOGY_DISCOVERY1;
    test_decode_cmdu(frames, cmdu);

    // TLV order is observable on the wire: the AL MAC address TLV must come
    // first.
    assert!(matches!(cmdu.tlvs[0], Tlv::AlMacAddress(_)));
    assert!(matches!(cmdu.tlvs[1], Tlv::MacAddress(_)));
}

#[test]
fn encode_topology_discovery1() {
    let (ref frames, ref cmdu) = *TOPOLOGY_DISCOVERY1;
    test_encode_cmdu(frames, cmdu, ADDR_MAC0, ADDR_MCAST_1905, 1500);
}

#[test]
fn decode_unknown_tlv1() {
    let (ref frames, ref cmdu) = *UNKNOWN_TLV1;
    test_decode_cmdu(frames, cmdu);

    // The message type has no definition, but the raw value is preserved.
    assert_eq!(cmdu.message_type(), None);
}

// Parsing an undefined TLV and forging it back must reproduce the exact
// byte sequence.
#[test]
fn encode_unknown_tlv1() {
    let (ref frames, ref cmdu) = *UNKNOWN_TLV1;
    test_encode_cmdu(frames, cmdu, ADDR_AL_PEER0, ADDR_AL, 1500);
}

#[test]
fn decode_header_last_fragment() {
    let (ref frames, _) = *LINK_METRIC_QUERY1;
    let mut buf = Bytes::copy_from_slice(&frames[0]);
    let hdr = CmduHeader::decode(&mut buf).unwrap();
    assert_eq!(
        hdr,
        CmduHeader {
            dst_addr: ADDR_AL.into(),
            src_addr: ADDR_AL_PEER0.into(),
            message_version: 0,
            message_type: 0x0005,
            message_id: 0x1234,
            fragment_id: 0,
            last_fragment: true,
            relay: false,
        }
    );
}

#[test]
fn decode_header_not_last_fragment() {
    let (ref frames, _) = *LINK_METRIC_QUERY1;
    let mut frame = frames[0].clone();
    frame[20] = 0x01;
    frame[21] = 0x00;
    let mut buf = Bytes::copy_from_slice(&frame);
    let hdr = CmduHeader::decode(&mut buf).unwrap();
    assert_eq!(hdr.fragment_id, 1);
    assert!(!hdr.last_fragment);
    assert!(!hdr.relay);
}

#[test]
fn decode_header_wrong_ether_type() {
    let (ref frames, _) = *LINK_METRIC_QUERY1;
    let mut frame = frames[0].clone();
    frame[12] = 0x08;
    frame[13] = 0x00;
    let mut buf = Bytes::copy_from_slice(&frame);
    assert!(matches!(
        CmduHeader::decode(&mut buf),
        Err(DecodeError::BadEtherType(0x0800))
    ));
}

#[test]
fn decode_header_too_short() {
    let (ref frames, _) = *LINK_METRIC_QUERY1;
    let mut buf = Bytes::copy_from_slice(&frames[0][..21]);
    assert!(matches!(
        CmduHeader::decode(&mut buf),
        Err(DecodeError::IncompleteFrame)
    ));
}

#[test]
fn decode_unknown_message_version() {
    let hdr = CmduHeader {
        dst_addr: ADDR_AL.into(),
        src_addr: ADDR_AL_PEER0.into(),
        message_version: 2,
        message_type: 0x0000,
        message_id: 1,
        fragment_id: 0,
        last_fragment: true,
        relay: false,
    };
    let fragments = [Bytes::from_static(&[0x00, 0x00, 0x00])];
    assert!(matches!(
        Cmdu::decode(&hdr, &fragments),
        Err(DecodeError::UnknownMessageVersion(2))
    ));
}

#[test]
fn decode_misplaced_end_of_message() {
    let hdr = CmduHeader {
        dst_addr: ADDR_AL.into(),
        src_addr: ADDR_AL_PEER0.into(),
        message_version: 0,
        message_type: 0x0000,
        message_id: 1,
        fragment_id: 0,
        last_fragment: false,
        relay: false,
    };
    // The first fragment is terminated even though another one follows.
    let fragments = [
        Bytes::from_static(&[
            0x01, 0x00, 0x06, 0x02, 0xee, 0xff, 0x33, 0x44, 0x00, 0x00,
            0x00, 0x00,
        ]),
        Bytes::from_static(&[
            0x02, 0x00, 0x06, 0x00, 0xee, 0xff, 0x33, 0x44, 0x00, 0x00,
            0x00, 0x00,
        ]),
    ];
    assert!(matches!(
        Cmdu::decode(&hdr, &fragments),
        Err(DecodeError::MisplacedEndOfMessage(0))
    ));
}

#[test]
fn decode_missing_end_of_message() {
    let hdr = CmduHeader {
        dst_addr: ADDR_AL.into(),
        src_addr: ADDR_AL_PEER0.into(),
        message_version: 0,
        message_type: 0x0000,
        message_id: 1,
        fragment_id: 0,
        last_fragment: true,
        relay: false,
    };
    let fragments = [Bytes::from_static(&[
        0x01, 0x00, 0x06, 0x02, 0xee, 0xff, 0x33, 0x44, 0x00,
    ])];
    assert!(matches!(
        Cmdu::decode(&hdr, &fragments),
        Err(DecodeError::MissingEndOfMessage)
    ));
}

// A TLV whose declared length overruns its fragment is rejected: TLVs never
// straddle fragment boundaries.
#[test]
fn decode_truncated_tlv() {
    let hdr = CmduHeader {
        dst_addr: ADDR_AL.into(),
        src_addr: ADDR_AL_PEER0.into(),
        message_version: 0,
        message_type: 0x0000,
        message_id: 1,
        fragment_id: 0,
        last_fragment: true,
        relay: false,
    };
    let fragments =
        [Bytes::from_static(&[0x01, 0x00, 0x06, 0x02, 0xee, 0xff])];
    assert!(matches!(
        Cmdu::decode(&hdr, &fragments),
        Err(DecodeError::InvalidTlvLength(6))
    ));
}

#[test]
fn add_tlv_duplicate() {
    let mut cmdu = Cmdu {
        message_version: MessageVersion::V2014,
        message_type: 0x0000,
        message_id: 1,
        relay: false,
        tlvs: vec![],
    };
    cmdu.add_tlv(Tlv::AlMacAddress(AlMacAddressTlv::new(ADDR_AL.into())))
        .unwrap();
    assert!(matches!(
        cmdu.add_tlv(Tlv::AlMacAddress(AlMacAddressTlv::new(
            ADDR_AL.into()
        ))),
        Err(AddTlvError::DuplicateTlv(0x01))
    ));
}

#[test]
fn add_tlv_aggregate_neighbor_lists() {
    let mut cmdu = Cmdu {
        message_version: MessageVersion::V2014,
        message_type: 0x0003,
        message_id: 1,
        relay: false,
        tlvs: vec![],
    };
    // Two lists for the same local interface concatenate...
    cmdu.add_tlv(Tlv::Non1905NeighborDeviceList(
        Non1905NeighborDeviceListTlv {
            local_mac: ADDR_MAC0.into(),
            neighbors: vec![[0x00, 0x11, 0x22, 0x33, 0x44, 0x55].into()],
        },
    ))
    .unwrap();
    cmdu.add_tlv(Tlv::Non1905NeighborDeviceList(
        Non1905NeighborDeviceListTlv {
            local_mac: ADDR_MAC0.into(),
            neighbors: vec![[0x00, 0x11, 0x22, 0x33, 0x44, 0x66].into()],
        },
    ))
    .unwrap();
    // ...while a list for another interface is kept separate.
    cmdu.add_tlv(Tlv::Non1905NeighborDeviceList(
        Non1905NeighborDeviceListTlv {
            local_mac: [0x00, 0xee, 0xff, 0x33, 0x44, 0x10].into(),
            neighbors: vec![[0x00, 0x11, 0x22, 0x33, 0x44, 0x77].into()],
        },
    ))
    .unwrap();

    assert_eq!(cmdu.tlvs.len(), 2);
    let Tlv::Non1905NeighborDeviceList(tlv) = &cmdu.tlvs[0] else {
        panic!("unexpected TLV");
    };
    assert_eq!(tlv.neighbors.len(), 2);
}

#[test]
fn masked_compare() {
    // The middle byte is fully wildcarded.
    let expected = [0x0100, 0xFFAA, 0x0002];
    assert!(masked_eq(&[0x01, 0xAA, 0x02], &expected));
    assert!(masked_eq(&[0x01, 0x55, 0x02], &expected));
    assert!(!masked_eq(&[0x01, 0xAA, 0x03], &expected));

    // Trailing bytes beyond the expected length must be zero.
    assert!(masked_eq(&[0x01, 0xAA, 0x02, 0x00, 0x00], &expected));
    assert!(!masked_eq(&[0x01, 0xAA, 0x02, 0x00, 0x01], &expected));

    // A short observed sequence never matches.
    assert!(!masked_eq(&[0x01, 0xAA], &expected));
}

// The round-trip law: parsing a forged CMDU yields the original structure.
#[test]
fn round_trip() {
    let (_, ref cmdu) = *TOPOLOGY_DISCOVERY1;
    let frames = cmdu
        .encode(&ADDR_MAC0.into(), &ADDR_MCAST_1905.into(), 1500)
        .unwrap();
    let frames: Vec<_> = frames.iter().map(|frame| frame.to_vec()).collect();
    test_decode_cmdu(&frames, cmdu);
}
