//
// Copyright (c) The i1905 Contributors
//
// SPDX-License-Identifier: MIT
//

use bytes::TryGetError;
use serde::{Deserialize, Serialize};

use crate::packet::consts::LldpTlvType;

// Type aliases.
pub type DecodeResult<T> = Result<T, DecodeError>;
pub type TlvDecodeResult<T> = Result<T, TlvDecodeError>;
pub type EncodeResult<T> = Result<T, EncodeError>;

// CMDU and LLDPDU decoding errors.
#[derive(Debug)]
#[derive(Deserialize, Serialize)]
pub enum DecodeError {
    ReadOutOfBounds,
    IncompleteFrame,
    BadEtherType(u16),
    UnknownMessageVersion(u8),
    InvalidTlvLength(u16),
    BadTlv(u8, TlvDecodeError),
    MissingEndOfMessage,
    MisplacedEndOfMessage(usize),
    // LLDP
    MissingMandatoryTlv(LldpTlvType),
    DuplicateMandatoryTlv(LldpTlvType),
    TooManyLldpTlvs,
}

// TLV decoding errors.
#[derive(Debug)]
#[derive(Deserialize, Serialize)]
pub enum TlvDecodeError {
    ReadOutOfBounds,
    InvalidLength(u16),
    InvalidDestination(u8),
    InvalidLinkMetricScope(u8),
    InvalidResultCode(u8),
    InvalidRole(u8),
    InvalidFreqBand(u8),
    InvalidServiceType(u8),
    InvalidPowerState(u8),
    InvalidPowerChangeStatus(u8),
    InvalidProfileVersion(u8),
    InvalidAddrType(u8),
    InvalidUtf8,
    InvalidChassisIdSubtype(u8),
    InvalidPortIdSubtype(u8),
}

// CMDU encoding errors.
#[derive(Debug)]
#[derive(Deserialize, Serialize)]
pub enum EncodeError {
    SegmentSizeTooSmall(u16),
    TlvTooBig(u8, usize),
}

// Errors when appending a TLV to a CMDU under construction.
#[derive(Debug)]
#[derive(Deserialize, Serialize)]
pub enum AddTlvError {
    DuplicateTlv(u8),
}

// ===== impl DecodeError =====

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::ReadOutOfBounds => {
                write!(f, "attempt to read out of bounds")
            }
            DecodeError::IncompleteFrame => {
                write!(f, "incomplete frame")
            }
            DecodeError::BadEtherType(ether_type) => {
                write!(f, "unexpected EtherType: {ether_type:#06x}")
            }
            DecodeError::UnknownMessageVersion(version) => {
                write!(f, "unknown message version: {version}")
            }
            DecodeError::InvalidTlvLength(tlv_len) => {
                write!(f, "invalid TLV length: {tlv_len}")
            }
            DecodeError::BadTlv(tlv_type, error) => {
                write!(f, "malformed TLV (type {tlv_type}): {error}")
            }
            DecodeError::MissingEndOfMessage => {
                write!(f, "missing end-of-message TLV")
            }
            DecodeError::MisplacedEndOfMessage(fragment) => {
                write!(
                    f,
                    "end-of-message TLV in non-final fragment {fragment}"
                )
            }
            DecodeError::MissingMandatoryTlv(tlv_type) => {
                write!(f, "missing mandatory LLDP TLV: {tlv_type:?}")
            }
            DecodeError::DuplicateMandatoryTlv(tlv_type) => {
                write!(f, "duplicate mandatory LLDP TLV: {tlv_type:?}")
            }
            DecodeError::TooManyLldpTlvs => {
                write!(f, "too many LLDP TLVs")
            }
        }
    }
}

impl std::error::Error for DecodeError {}

impl From<TryGetError> for DecodeError {
    fn from(_error: TryGetError) -> DecodeError {
        DecodeError::ReadOutOfBounds
    }
}

// ===== impl TlvDecodeError =====

impl std::fmt::Display for TlvDecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TlvDecodeError::ReadOutOfBounds => {
                write!(f, "attempt to read out of bounds")
            }
            TlvDecodeError::InvalidLength(tlv_len) => {
                write!(f, "invalid length: {tlv_len}")
            }
            TlvDecodeError::InvalidDestination(destination) => {
                write!(f, "invalid link metric destination: {destination}")
            }
            TlvDecodeError::InvalidLinkMetricScope(scope) => {
                write!(f, "invalid link metrics requested: {scope}")
            }
            TlvDecodeError::InvalidResultCode(code) => {
                write!(f, "invalid link metric result code: {code}")
            }
            TlvDecodeError::InvalidRole(role) => {
                write!(f, "invalid role: {role}")
            }
            TlvDecodeError::InvalidFreqBand(band) => {
                write!(f, "invalid frequency band: {band}")
            }
            TlvDecodeError::InvalidServiceType(service) => {
                write!(f, "invalid service type: {service}")
            }
            TlvDecodeError::InvalidPowerState(state) => {
                write!(f, "invalid power state: {state}")
            }
            TlvDecodeError::InvalidPowerChangeStatus(status) => {
                write!(f, "invalid power change status: {status}")
            }
            TlvDecodeError::InvalidProfileVersion(version) => {
                write!(f, "invalid profile version: {version}")
            }
            TlvDecodeError::InvalidAddrType(addr_type) => {
                write!(f, "invalid address type: {addr_type}")
            }
            TlvDecodeError::InvalidUtf8 => {
                write!(f, "invalid UTF-8 string")
            }
            TlvDecodeError::InvalidChassisIdSubtype(subtype) => {
                write!(f, "unsupported chassis ID subtype: {subtype}")
            }
            TlvDecodeError::InvalidPortIdSubtype(subtype) => {
                write!(f, "unsupported port ID subtype: {subtype}")
            }
        }
    }
}

impl std::error::Error for TlvDecodeError {}

impl From<TryGetError> for TlvDecodeError {
    fn from(_error: TryGetError) -> TlvDecodeError {
        TlvDecodeError::ReadOutOfBounds
    }
}

// ===== impl EncodeError =====

impl std::fmt::Display for EncodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EncodeError::SegmentSizeTooSmall(size) => {
                write!(f, "maximum segment size too small: {size}")
            }
            EncodeError::TlvTooBig(tlv_type, len) => {
                write!(
                    f,
                    "TLV (type {tlv_type}) of {len} bytes exceeds the \
                     maximum segment size"
                )
            }
        }
    }
}

impl std::error::Error for EncodeError {}

// ===== impl AddTlvError =====

impl std::fmt::Display for AddTlvError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AddTlvError::DuplicateTlv(tlv_type) => {
                write!(f, "duplicate non-aggregatable TLV: {tlv_type}")
            }
        }
    }
}

impl std::error::Error for AddTlvError {}
