//
// Copyright (c) The i1905 Contributors
//
// SPDX-License-Identifier: MIT
//

mod cmdu;
mod lldp;
mod reassembly;

use std::time::Duration;

use bytes::Bytes;
use i1905::fragmentation::Defragmenter;
use i1905::packet::CmduHeader;
use i1905::packet::cmdu::Cmdu;
use i1905::packet::print::dump_bytes;

//
// Helper functions.
//

pub fn assert_eq_hex(expected: &[u8], actual: &[u8]) {
    if expected != actual {
        let mut msg = String::new();
        msg.push_str("expected:\n");
        dump_bytes(&mut msg, expected, "  ").unwrap();
        msg.push_str("actual:\n");
        dump_bytes(&mut msg, actual, "  ").unwrap();
        panic!("byte streams differ\n{msg}");
    }
}

// Runs received frames through header parsing and reassembly, returning the
// decoded CMDU once the last fragment is consumed.
pub fn decode_cmdu_frames(frames: &[Vec<u8>]) -> (CmduHeader, Cmdu) {
    let mut defragmenter = Defragmenter::new(Duration::from_secs(10), false);
    let mut complete = None;
    for frame in frames {
        let mut buf = Bytes::copy_from_slice(frame);
        let hdr = CmduHeader::decode(&mut buf).unwrap();
        complete = defragmenter.push(&hdr, buf);
    }
    let (hdr, fragments) = complete.expect("CMDU is incomplete");
    let cmdu = Cmdu::decode(&hdr, &fragments).unwrap();
    (hdr, cmdu)
}

pub fn test_encode_cmdu(
    frames_expected: &[Vec<u8>],
    cmdu: &Cmdu,
    src: [u8; 6],
    dst: [u8; 6],
    max_segment_size: u16,
) {
    let frames_actual = cmdu
        .encode(&src.into(), &dst.into(), max_segment_size)
        .unwrap();
    assert_eq!(frames_expected.len(), frames_actual.len());
    for (expected, actual) in frames_expected.iter().zip(&frames_actual) {
        assert_eq_hex(expected, actual);
    }
}

pub fn test_decode_cmdu(frames: &[Vec<u8>], cmdu_expected: &Cmdu) {
    let (_, cmdu_actual) = decode_cmdu_frames(frames);
    assert_eq!(*cmdu_expected, cmdu_actual);
}
