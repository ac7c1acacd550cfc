//
// Copyright (c) The i1905 Contributors
//
// SPDX-License-Identifier: MIT
//

use std::time::{Duration, Instant};

use bytes::Bytes;
use i1905::fragmentation::Defragmenter;
use i1905::packet::CmduHeader;
use i1905::packet::cmdu::Cmdu;
use i1905::packet::consts::MessageVersion;
use i1905::packet::tlv::{Tlv, WscTlv};

use super::decode_cmdu_frames;

const ADDR_AL: [u8; 6] = [0x02, 0xee, 0xff, 0x33, 0x44, 0x00];
const ADDR_AL_PEER0: [u8; 6] = [0x02, 0xaa, 0xbb, 0x33, 0x44, 0x00];
const ADDR_AL_PEER1: [u8; 6] = [0x02, 0xaa, 0xbb, 0x33, 0x44, 0x10];

//
// Helper functions.
//

fn fragment_hdr(
    src: [u8; 6],
    message_id: u16,
    fragment_id: u8,
    last_fragment: bool,
) -> CmduHeader {
    CmduHeader {
        dst_addr: ADDR_AL.into(),
        src_addr: src.into(),
        message_version: 0,
        message_type: 0x0009,
        message_id,
        fragment_id,
        last_fragment,
        relay: false,
    }
}

fn payload(bytes: &'static [u8]) -> Bytes {
    Bytes::from_static(bytes)
}

// Builds a CMDU whose TLVs do not fit in a single 1500-byte segment.
fn big_cmdu() -> Cmdu {
    Cmdu {
        message_version: MessageVersion::V2014,
        message_type: 0x0009,
        message_id: 0x4242,
        relay: false,
        tlvs: vec![
            Tlv::Wsc(WscTlv::new(Bytes::from(vec![0xaa; 1399]))),
            Tlv::Wsc(WscTlv::new(Bytes::from(vec![0xbb; 1399]))),
        ],
    }
}

//
// Tests.
//

// Forging a CMDU bigger than the segment size must split it into fragments
// with sequential ids and the last-fragment flag on the final one only, and
// reassembly must restore the original TLV list.
#[test]
fn fragmented_round_trip() {
    let cmdu = big_cmdu();
    let frames = cmdu
        .encode(&ADDR_AL_PEER0.into(), &ADDR_AL.into(), 1500)
        .unwrap();
    assert_eq!(frames.len(), 2);
    for (fragment_id, frame) in frames.iter().enumerate() {
        assert!(frame.len() <= 1500);
        assert_eq!(frame[20], fragment_id as u8);
        let last = fragment_id == frames.len() - 1;
        assert_eq!(frame[21] & 0x80 != 0, last);
    }

    let frames: Vec<_> = frames.iter().map(|frame| frame.to_vec()).collect();
    let (_, reassembled) = decode_cmdu_frames(&frames);
    assert_eq!(cmdu, reassembled);
}

// Reassembling the same CMDU forged under different segment sizes must
// yield the same structure.
#[test]
fn fragmentation_idempotence() {
    let cmdu = big_cmdu();

    let frames1 = cmdu
        .encode(&ADDR_AL_PEER0.into(), &ADDR_AL.into(), 1500)
        .unwrap();
    let frames2 = cmdu
        .encode(&ADDR_AL_PEER0.into(), &ADDR_AL.into(), 3000)
        .unwrap();
    assert_eq!(frames1.len(), 2);
    assert_eq!(frames2.len(), 1);

    let frames1: Vec<_> =
        frames1.iter().map(|frame| frame.to_vec()).collect();
    let frames2: Vec<_> =
        frames2.iter().map(|frame| frame.to_vec()).collect();
    let (_, reassembled1) = decode_cmdu_frames(&frames1);
    let (_, reassembled2) = decode_cmdu_frames(&frames2);
    assert_eq!(reassembled1, reassembled2);
}

#[test]
fn in_order_delivery() {
    let mut defragmenter = Defragmenter::new(Duration::from_secs(10), false);

    let hdr0 = fragment_hdr(ADDR_AL_PEER0, 1, 0, false);
    let hdr1 = fragment_hdr(ADDR_AL_PEER0, 1, 1, false);
    let hdr2 = fragment_hdr(ADDR_AL_PEER0, 1, 2, true);

    assert!(defragmenter.push(&hdr0, payload(&[0x01])).is_none());
    assert!(defragmenter.push(&hdr1, payload(&[0x02])).is_none());
    let (hdr, fragments) =
        defragmenter.push(&hdr2, payload(&[0x03])).unwrap();

    // The first-fragment header identifies the reassembled message.
    assert_eq!(hdr.fragment_id, 0);
    assert_eq!(
        fragments,
        vec![payload(&[0x01]), payload(&[0x02]), payload(&[0x03])]
    );
    assert!(defragmenter.is_empty());
}

// Fragments of interleaved messages reassemble independently.
#[test]
fn interleaved_sources() {
    let mut defragmenter = Defragmenter::new(Duration::from_secs(10), false);

    let a0 = fragment_hdr(ADDR_AL_PEER0, 1, 0, false);
    let a1 = fragment_hdr(ADDR_AL_PEER0, 1, 1, true);
    let b0 = fragment_hdr(ADDR_AL_PEER1, 1, 0, false);
    let b1 = fragment_hdr(ADDR_AL_PEER1, 1, 1, true);

    assert!(defragmenter.push(&a0, payload(&[0xa0])).is_none());
    assert!(defragmenter.push(&b0, payload(&[0xb0])).is_none());
    assert_eq!(defragmenter.len(), 2);

    let (hdr_b, fragments_b) =
        defragmenter.push(&b1, payload(&[0xb1])).unwrap();
    let (hdr_a, fragments_a) =
        defragmenter.push(&a1, payload(&[0xa1])).unwrap();
    assert_eq!(hdr_a.src_addr, ADDR_AL_PEER0.into());
    assert_eq!(hdr_b.src_addr, ADDR_AL_PEER1.into());
    assert_eq!(fragments_a, vec![payload(&[0xa0]), payload(&[0xa1])]);
    assert_eq!(fragments_b, vec![payload(&[0xb0]), payload(&[0xb1])]);
}

// Duplicate fragments are idempotent.
#[test]
fn duplicate_fragment() {
    let mut defragmenter = Defragmenter::new(Duration::from_secs(10), false);

    let hdr0 = fragment_hdr(ADDR_AL_PEER0, 1, 0, false);
    let hdr1 = fragment_hdr(ADDR_AL_PEER0, 1, 1, true);

    assert!(defragmenter.push(&hdr0, payload(&[0x01])).is_none());
    assert!(defragmenter.push(&hdr0, payload(&[0x01])).is_none());
    let (_, fragments) = defragmenter.push(&hdr1, payload(&[0x02])).unwrap();
    assert_eq!(fragments, vec![payload(&[0x01]), payload(&[0x02])]);
}

// A fragment-id gap drops the fragment but keeps the context.
#[test]
fn fragment_gap() {
    let mut defragmenter = Defragmenter::new(Duration::from_secs(10), false);

    let hdr0 = fragment_hdr(ADDR_AL_PEER0, 1, 0, false);
    let hdr1 = fragment_hdr(ADDR_AL_PEER0, 1, 1, false);
    let hdr2 = fragment_hdr(ADDR_AL_PEER0, 1, 2, true);

    assert!(defragmenter.push(&hdr0, payload(&[0x01])).is_none());
    assert!(defragmenter.push(&hdr2, payload(&[0x03])).is_none());
    assert_eq!(defragmenter.len(), 1);

    assert!(defragmenter.push(&hdr1, payload(&[0x02])).is_none());
    let (_, fragments) = defragmenter.push(&hdr2, payload(&[0x03])).unwrap();
    assert_eq!(
        fragments,
        vec![payload(&[0x01]), payload(&[0x02]), payload(&[0x03])]
    );
}

// In strict mode a gap discards the whole context.
#[test]
fn fragment_gap_strict() {
    let mut defragmenter = Defragmenter::new(Duration::from_secs(10), true);

    let hdr0 = fragment_hdr(ADDR_AL_PEER0, 1, 0, false);
    let hdr2 = fragment_hdr(ADDR_AL_PEER0, 1, 2, true);

    assert!(defragmenter.push(&hdr0, payload(&[0x01])).is_none());
    assert!(defragmenter.push(&hdr2, payload(&[0x03])).is_none());
    assert!(defragmenter.is_empty());
}

// A non-initial fragment without a context is dropped.
#[test]
fn orphan_fragment() {
    let mut defragmenter = Defragmenter::new(Duration::from_secs(10), false);

    let hdr1 = fragment_hdr(ADDR_AL_PEER0, 1, 1, true);
    assert!(defragmenter.push(&hdr1, payload(&[0x02])).is_none());
    assert!(defragmenter.is_empty());
}

// Expired contexts are purged; a later retransmission starts over.
#[test]
fn reassembly_timeout() {
    let mut defragmenter = Defragmenter::new(Duration::ZERO, false);

    let hdr0 = fragment_hdr(ADDR_AL_PEER0, 1, 0, false);
    assert!(defragmenter.push(&hdr0, payload(&[0x01])).is_none());
    assert_eq!(defragmenter.len(), 1);

    defragmenter.purge_expired(Instant::now() + Duration::from_millis(1));
    assert!(defragmenter.is_empty());
}

// An unfragmented message bypasses the registry entirely.
#[test]
fn single_fragment_fast_path() {
    let mut defragmenter = Defragmenter::new(Duration::from_secs(10), false);

    let hdr = fragment_hdr(ADDR_AL_PEER0, 1, 0, true);
    let (_, fragments) = defragmenter.push(&hdr, payload(&[0x01])).unwrap();
    assert_eq!(fragments, vec![payload(&[0x01])]);
    assert!(defragmenter.is_empty());
}
