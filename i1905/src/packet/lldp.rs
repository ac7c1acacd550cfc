//
// Copyright (c) The i1905 Contributors
//
// SPDX-License-Identifier: MIT
//

use bytes::{Buf, BufMut, Bytes, BytesMut};
use i1905_utils::bytes::{BytesExt, BytesMutExt, TLS_BUF};
use i1905_utils::mac_addr::MacAddr;
use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};

use crate::packet::consts::LldpTlvType;
use crate::packet::error::{
    DecodeError, DecodeResult, TlvDecodeError, TlvDecodeResult,
};
use crate::packet::tlv::UnknownTlv;

// LLDP TLV header size (7-bit type + 9-bit length).
pub const LLDP_TLV_HDR_SIZE: usize = 2;
// Upper bound on the TLV list of a single LLDPDU.
pub const MAX_LLDP_TLVS: usize = 16;

// LLDP data unit, as used for 1905.1 neighbor discovery.
//
// Exactly one of each mandatory TLV is accepted; optional TLVs are carried
// uninterpreted.
#[derive(Clone, Debug, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct Lldpdu {
    pub chassis_id: ChassisIdTlv,
    pub port_id: PortIdTlv,
    pub ttl: TimeToLiveTlv,
    pub optional: Vec<UnknownTlv>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct ChassisIdTlv {
    pub mac: MacAddr,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct PortIdTlv {
    pub mac: MacAddr,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct TimeToLiveTlv {
    pub ttl: u16,
}

// ===== impl Lldpdu =====

impl Lldpdu {
    // Decodes an LLDPDU payload.
    pub fn decode(mut buf: Bytes) -> DecodeResult<Self> {
        let mut chassis_id = None;
        let mut port_id = None;
        let mut ttl = None;
        let mut optional = vec![];
        let mut count = 0;

        loop {
            // Parse TLV header.
            let tlv_hdr = buf.try_get_u16()?;
            let tlv_type = (tlv_hdr >> 9) as u8;
            let tlv_len = tlv_hdr & 0x01ff;
            if tlv_len as usize > buf.remaining() {
                return Err(DecodeError::InvalidTlvLength(tlv_len));
            }

            // The end-of-LLDPDU TLV terminates the stream.
            if tlv_type == LldpTlvType::EndOfLldpdu as u8 {
                if tlv_len != 0 {
                    return Err(DecodeError::InvalidTlvLength(tlv_len));
                }
                break;
            }

            count += 1;
            if count > MAX_LLDP_TLVS {
                return Err(DecodeError::TooManyLldpTlvs);
            }

            // Parse TLV value.
            let mut buf_tlv = buf.copy_to_bytes(tlv_len as usize);
            match LldpTlvType::from_u8(tlv_type) {
                Some(LldpTlvType::ChassisId) => {
                    if chassis_id.is_some() {
                        return Err(DecodeError::DuplicateMandatoryTlv(
                            LldpTlvType::ChassisId,
                        ));
                    }
                    let tlv = ChassisIdTlv::decode(tlv_len, &mut buf_tlv)
                        .map_err(|error| {
                            DecodeError::BadTlv(tlv_type, error)
                        })?;
                    chassis_id = Some(tlv);
                }
                Some(LldpTlvType::PortId) => {
                    if port_id.is_some() {
                        return Err(DecodeError::DuplicateMandatoryTlv(
                            LldpTlvType::PortId,
                        ));
                    }
                    let tlv = PortIdTlv::decode(tlv_len, &mut buf_tlv)
                        .map_err(|error| {
                            DecodeError::BadTlv(tlv_type, error)
                        })?;
                    port_id = Some(tlv);
                }
                Some(LldpTlvType::TimeToLive) => {
                    if ttl.is_some() {
                        return Err(DecodeError::DuplicateMandatoryTlv(
                            LldpTlvType::TimeToLive,
                        ));
                    }
                    let tlv = TimeToLiveTlv::decode(tlv_len, &mut buf_tlv)
                        .map_err(|error| {
                            DecodeError::BadTlv(tlv_type, error)
                        })?;
                    ttl = Some(tlv);
                }
                // Save optional TLV.
                _ => {
                    optional.push(UnknownTlv::new(
                        tlv_type, tlv_len, buf_tlv,
                    ));
                }
            }
        }

        // All three mandatory TLVs must be present.
        let Some(chassis_id) = chassis_id else {
            return Err(DecodeError::MissingMandatoryTlv(
                LldpTlvType::ChassisId,
            ));
        };
        let Some(port_id) = port_id else {
            return Err(DecodeError::MissingMandatoryTlv(LldpTlvType::PortId));
        };
        let Some(ttl) = ttl else {
            return Err(DecodeError::MissingMandatoryTlv(
                LldpTlvType::TimeToLive,
            ));
        };

        Ok(Lldpdu {
            chassis_id,
            port_id,
            ttl,
            optional,
        })
    }

    // Encodes the LLDPDU payload.
    //
    // Mandatory TLVs are written first, in the order the standard requires.
    pub fn encode(&self) -> Bytes {
        TLS_BUF.with(|buf| {
            let mut buf = buf.borrow_mut();
            buf.clear();
            self.chassis_id.encode(&mut buf);
            self.port_id.encode(&mut buf);
            self.ttl.encode(&mut buf);
            for tlv in &self.optional {
                put_lldp_hdr(&mut buf, tlv.tlv_type, tlv.value.len() as u16);
                buf.put_slice(&tlv.value);
            }
            put_lldp_hdr(&mut buf, LldpTlvType::EndOfLldpdu as u8, 0);
            Bytes::copy_from_slice(&buf)
        })
    }
}

// ===== impl ChassisIdTlv =====

impl ChassisIdTlv {
    // Chassis ID subtype designating a MAC address.
    const SUBTYPE_MAC: u8 = 4;
    const SIZE: usize = 7;

    pub(crate) fn decode(
        tlv_len: u16,
        buf: &mut Bytes,
    ) -> TlvDecodeResult<Self> {
        // Validate the TLV length.
        if tlv_len as usize != Self::SIZE {
            return Err(TlvDecodeError::InvalidLength(tlv_len));
        }

        let subtype = buf.try_get_u8()?;
        if subtype != Self::SUBTYPE_MAC {
            return Err(TlvDecodeError::InvalidChassisIdSubtype(subtype));
        }
        let mac = buf.try_get_mac()?;

        Ok(ChassisIdTlv { mac })
    }

    pub(crate) fn encode(&self, buf: &mut BytesMut) {
        put_lldp_hdr(buf, LldpTlvType::ChassisId as u8, Self::SIZE as u16);
        buf.put_u8(Self::SUBTYPE_MAC);
        buf.put_mac(&self.mac);
    }
}

// ===== impl PortIdTlv =====

impl PortIdTlv {
    // Port ID subtype designating a MAC address.
    const SUBTYPE_MAC: u8 = 3;
    const SIZE: usize = 7;

    pub(crate) fn decode(
        tlv_len: u16,
        buf: &mut Bytes,
    ) -> TlvDecodeResult<Self> {
        // Validate the TLV length.
        if tlv_len as usize != Self::SIZE {
            return Err(TlvDecodeError::InvalidLength(tlv_len));
        }

        let subtype = buf.try_get_u8()?;
        if subtype != Self::SUBTYPE_MAC {
            return Err(TlvDecodeError::InvalidPortIdSubtype(subtype));
        }
        let mac = buf.try_get_mac()?;

        Ok(PortIdTlv { mac })
    }

    pub(crate) fn encode(&self, buf: &mut BytesMut) {
        put_lldp_hdr(buf, LldpTlvType::PortId as u8, Self::SIZE as u16);
        buf.put_u8(Self::SUBTYPE_MAC);
        buf.put_mac(&self.mac);
    }
}

// ===== impl TimeToLiveTlv =====

impl TimeToLiveTlv {
    const SIZE: usize = 2;
    // TTL advertised by the 1905 bridge discovery tick.
    pub const DEFAULT: u16 = 180;

    pub(crate) fn decode(
        tlv_len: u16,
        buf: &mut Bytes,
    ) -> TlvDecodeResult<Self> {
        // Validate the TLV length.
        if tlv_len as usize != Self::SIZE {
            return Err(TlvDecodeError::InvalidLength(tlv_len));
        }

        let ttl = buf.try_get_u16()?;

        Ok(TimeToLiveTlv { ttl })
    }

    pub(crate) fn encode(&self, buf: &mut BytesMut) {
        put_lldp_hdr(buf, LldpTlvType::TimeToLive as u8, Self::SIZE as u16);
        buf.put_u16(self.ttl);
    }
}

// ===== helper functions =====

// Writes a packed LLDP TLV header.
fn put_lldp_hdr(buf: &mut BytesMut, tlv_type: u8, tlv_len: u16) {
    buf.put_u16(((tlv_type as u16) << 9) | (tlv_len & 0x01ff));
}
