//
// Copyright (c) The i1905 Contributors
//
// SPDX-License-Identifier: MIT
//

use bytes::{BufMut, Bytes, BytesMut};
use i1905_utils::bytes::TLS_BUF;
use i1905_utils::mac_addr::MacAddr;
use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};

use crate::packet::consts::{MessageType, MessageVersion, TlvType};
use crate::packet::error::{
    AddTlvError, DecodeError, DecodeResult, EncodeError, EncodeResult,
};
use crate::packet::tlv::{TLV_HDR_SIZE, Tlv};
use crate::packet::{CmduHeader, FRAME_HDR_SIZE};

// 1905.1 Control Message Data Unit.
//
// The TLV list preserves on-the-wire order; the end-of-message terminator is
// implicit and never stored.
#[derive(Clone, Debug, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct Cmdu {
    pub message_version: MessageVersion,
    pub message_type: u16,
    pub message_id: u16,
    pub relay: bool,
    pub tlvs: Vec<Tlv>,
}

// ===== impl Cmdu =====

impl Cmdu {
    pub fn new(message_type: MessageType, message_id: u16) -> Self {
        Cmdu {
            message_version: MessageVersion::V2014,
            message_type: message_type as u16,
            message_id,
            relay: message_type.is_relayed_multicast(),
            tlvs: vec![],
        }
    }

    // Decodes a CMDU from its reassembled fragment payloads.
    //
    // Fragments are TLV streams in fragment-id order, already stripped of
    // their Ethernet and CMDU headers. Every fragment must contain whole
    // TLVs only, and the end-of-message terminator must be consumed in the
    // last fragment and nowhere else.
    pub fn decode(
        hdr: &CmduHeader,
        fragments: &[Bytes],
    ) -> DecodeResult<Self> {
        let Some(message_version) =
            MessageVersion::from_u8(hdr.message_version)
        else {
            return Err(DecodeError::UnknownMessageVersion(
                hdr.message_version,
            ));
        };

        let Some(last) = fragments.len().checked_sub(1) else {
            return Err(DecodeError::MissingEndOfMessage);
        };

        let mut tlvs = vec![];
        for (index, fragment) in fragments.iter().enumerate() {
            let mut buf = fragment.clone();
            let (mut fragment_tlvs, terminated) =
                Tlv::decode_list(&mut buf)?;
            if terminated && index != last {
                return Err(DecodeError::MisplacedEndOfMessage(index));
            }
            if !terminated && index == last {
                return Err(DecodeError::MissingEndOfMessage);
            }
            tlvs.append(&mut fragment_tlvs);
        }

        Ok(Cmdu {
            message_version,
            message_type: hdr.message_type,
            message_id: hdr.message_id,
            relay: hdr.relay,
            tlvs,
        })
    }

    // Encodes the CMDU into one or more Ethernet frames.
    //
    // TLVs never straddle a fragment boundary: when the next TLV does not
    // fit, the current fragment is closed and a new one is started. The
    // end-of-message terminator goes in the last fragment only.
    pub fn encode(
        &self,
        src_addr: &MacAddr,
        dst_addr: &MacAddr,
        max_segment_size: u16,
    ) -> EncodeResult<Vec<Bytes>> {
        let capacity =
            (max_segment_size as usize).saturating_sub(FRAME_HDR_SIZE);
        if capacity < TLV_HDR_SIZE {
            return Err(EncodeError::SegmentSizeTooSmall(max_segment_size));
        }

        // Pack whole TLVs into fragment payloads.
        let mut payloads = vec![];
        let mut fragment = BytesMut::new();
        for tlv in &self.tlvs {
            let tlv_len = tlv.len();
            if tlv_len > capacity {
                return Err(EncodeError::TlvTooBig(tlv.tlv_type(), tlv_len));
            }
            if fragment.len() + tlv_len > capacity {
                payloads.push(fragment.split().freeze());
            }
            tlv.encode(&mut fragment);
        }

        // Append the end-of-message terminator.
        if fragment.len() + TLV_HDR_SIZE > capacity {
            payloads.push(fragment.split().freeze());
        }
        fragment.put_u8(TlvType::EndOfMessage as u8);
        fragment.put_u16(0);
        payloads.push(fragment.freeze());

        // Prepend the Ethernet and CMDU headers to each payload.
        let last = payloads.len() - 1;
        let frames = payloads
            .into_iter()
            .enumerate()
            .map(|(fragment_id, payload)| {
                let hdr = CmduHeader {
                    dst_addr: *dst_addr,
                    src_addr: *src_addr,
                    message_version: self.message_version as u8,
                    message_type: self.message_type,
                    message_id: self.message_id,
                    fragment_id: fragment_id as u8,
                    last_fragment: fragment_id == last,
                    relay: self.relay,
                };
                TLS_BUF.with(|buf| {
                    let mut buf = buf.borrow_mut();
                    buf.clear();
                    hdr.encode(&mut buf);
                    buf.put_slice(&payload);
                    Bytes::copy_from_slice(&buf)
                })
            })
            .collect();

        Ok(frames)
    }

    // Appends a TLV, aggregating entry-based TLVs where the protocol allows
    // it and rejecting duplicates everywhere else.
    pub fn add_tlv(&mut self, tlv: Tlv) -> Result<(), AddTlvError> {
        match tlv {
            // These types may freely repeat.
            Tlv::VendorSpecific(_)
            | Tlv::Unknown(_)
            | Tlv::TransmitterLinkMetric(_)
            | Tlv::ReceiverLinkMetric(_) => {
                self.tlvs.push(tlv);
                Ok(())
            }
            // Per-interface neighbor lists aggregate by local interface.
            Tlv::Non1905NeighborDeviceList(new) => {
                if let Some(existing) =
                    self.tlvs.iter_mut().find_map(|tlv| match tlv {
                        Tlv::Non1905NeighborDeviceList(existing)
                            if existing.local_mac == new.local_mac =>
                        {
                            Some(existing)
                        }
                        _ => None,
                    })
                {
                    existing.neighbors.extend(new.neighbors);
                } else {
                    self.tlvs.push(Tlv::Non1905NeighborDeviceList(new));
                }
                Ok(())
            }
            Tlv::NeighborDeviceList(new) => {
                if let Some(existing) =
                    self.tlvs.iter_mut().find_map(|tlv| match tlv {
                        Tlv::NeighborDeviceList(existing)
                            if existing.local_mac == new.local_mac =>
                        {
                            Some(existing)
                        }
                        _ => None,
                    })
                {
                    existing.neighbors.extend(new.neighbors);
                } else {
                    self.tlvs.push(Tlv::NeighborDeviceList(new));
                }
                Ok(())
            }
            // Service lists concatenate.
            Tlv::SupportedService(new) => {
                if let Some(existing) =
                    self.tlvs.iter_mut().find_map(|tlv| match tlv {
                        Tlv::SupportedService(existing) => Some(existing),
                        _ => None,
                    })
                {
                    existing.services.extend(new.services);
                } else {
                    self.tlvs.push(Tlv::SupportedService(new));
                }
                Ok(())
            }
            Tlv::SearchedService(new) => {
                if let Some(existing) =
                    self.tlvs.iter_mut().find_map(|tlv| match tlv {
                        Tlv::SearchedService(existing) => Some(existing),
                        _ => None,
                    })
                {
                    existing.services.extend(new.services);
                } else {
                    self.tlvs.push(Tlv::SearchedService(new));
                }
                Ok(())
            }
            tlv => {
                let tlv_type = tlv.tlv_type();
                if self
                    .tlvs
                    .iter()
                    .any(|existing| existing.tlv_type() == tlv_type)
                {
                    return Err(AddTlvError::DuplicateTlv(tlv_type));
                }
                self.tlvs.push(tlv);
                Ok(())
            }
        }
    }

    // Returns the known message type, if any.
    pub fn message_type(&self) -> Option<MessageType> {
        MessageType::from_u16(self.message_type)
    }
}
