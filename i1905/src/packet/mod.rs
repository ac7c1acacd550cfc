//
// Copyright (c) The i1905 Contributors
//
// SPDX-License-Identifier: MIT
//

pub mod cmdu;
pub mod consts;
pub mod error;
pub mod lldp;
pub mod print;
pub mod tlv;

use bytes::{Buf, BufMut, Bytes, BytesMut};
use i1905_utils::bytes::{BytesExt, BytesMutExt};
use i1905_utils::mac_addr::MacAddr;
use serde::{Deserialize, Serialize};

use crate::packet::consts::ETHER_TYPE_1905;
use crate::packet::error::{DecodeError, DecodeResult};

// Ethernet header size (dst + src + EtherType).
pub const ETH_HDR_SIZE: usize = 14;
// CMDU-specific header size.
pub const CMDU_HDR_SIZE: usize = 8;
// Full frame header size.
pub const FRAME_HDR_SIZE: usize = ETH_HDR_SIZE + CMDU_HDR_SIZE;

// Per-fragment CMDU header, including the enclosing Ethernet header.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct CmduHeader {
    pub dst_addr: MacAddr,
    pub src_addr: MacAddr,
    pub message_version: u8,
    pub message_type: u16,
    pub message_id: u16,
    pub fragment_id: u8,
    pub last_fragment: bool,
    pub relay: bool,
}

// ===== impl CmduHeader =====

impl CmduHeader {
    const FLAG_LAST_FRAGMENT: u8 = 0x80;
    const FLAG_RELAY: u8 = 0x40;

    // Decodes the header of a CMDU frame.
    //
    // The message version is carried through unvalidated so that frames of
    // future protocol versions can still be identified and logged.
    pub fn decode(buf: &mut Bytes) -> DecodeResult<Self> {
        // Ensure the frame has enough data for the fixed headers.
        if buf.remaining() < FRAME_HDR_SIZE {
            return Err(DecodeError::IncompleteFrame);
        }

        // Parse Ethernet header.
        let dst_addr = buf.try_get_mac()?;
        let src_addr = buf.try_get_mac()?;
        let ether_type = buf.try_get_u16()?;
        if ether_type != ETHER_TYPE_1905 {
            return Err(DecodeError::BadEtherType(ether_type));
        }

        // Parse CMDU header.
        let message_version = buf.try_get_u8()?;
        let _reserved = buf.try_get_u8()?;
        let message_type = buf.try_get_u16()?;
        let message_id = buf.try_get_u16()?;
        let fragment_id = buf.try_get_u8()?;
        let flags = buf.try_get_u8()?;

        Ok(CmduHeader {
            dst_addr,
            src_addr,
            message_version,
            message_type,
            message_id,
            fragment_id,
            last_fragment: flags & Self::FLAG_LAST_FRAGMENT != 0,
            relay: flags & Self::FLAG_RELAY != 0,
        })
    }

    // Encodes the header of a CMDU frame.
    pub fn encode(&self, buf: &mut BytesMut) {
        // Encode Ethernet header.
        buf.put_mac(&self.dst_addr);
        buf.put_mac(&self.src_addr);
        buf.put_u16(ETHER_TYPE_1905);

        // Encode CMDU header.
        buf.put_u8(self.message_version);
        buf.put_u8(0);
        buf.put_u16(self.message_type);
        buf.put_u16(self.message_id);
        buf.put_u8(self.fragment_id);
        let mut flags = 0;
        if self.last_fragment {
            flags |= Self::FLAG_LAST_FRAGMENT;
        }
        if self.relay {
            flags |= Self::FLAG_RELAY;
        }
        buf.put_u8(flags);
    }
}

// ===== global functions =====

/// Compares an observed byte sequence against a masked reference.
///
/// Each expected word encodes the complement of the mask in its high byte and
/// the reference value in its low byte, so `0xFF42` matches any observed byte
/// while `0x0042` requires exactly `0x42`. The sequences compare equal when
/// every masked position matches and every observed byte beyond the expected
/// length is zero.
pub fn masked_eq(observed: &[u8], expected: &[u16]) -> bool {
    if observed.len() < expected.len() {
        return false;
    }
    for (&byte, &word) in observed.iter().zip(expected.iter()) {
        let mask = !((word >> 8) as u8);
        let reference = word as u8;
        if byte & mask != reference & mask {
            return false;
        }
    }
    observed[expected.len()..].iter().all(|&byte| byte == 0)
}
