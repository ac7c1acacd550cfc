//
// Copyright (c) The i1905 Contributors
//
// SPDX-License-Identifier: MIT
//

use i1905_utils::mac_addr::MacAddr;
use tracing::{error, info, warn};

use crate::packet::error::{DecodeError, EncodeError};

// AL instance errors.
#[derive(Debug)]
pub enum Error {
    // I/O errors
    IoError(IoError),
    // CMDU input
    CmduInputError(String, MacAddr, DecodeError),
    // CMDU output
    CmduOutputError(EncodeError),
    // Other
    InterfaceStartError(String, Box<Error>),
    InstanceStartError(Box<Error>),
}

// AL I/O errors.
#[derive(Debug)]
pub enum IoError {
    SocketError(std::io::Error),
    MulticastJoinError(std::io::Error),
    InterfaceNotFound(String),
    MissingMacAddr(String),
    RecvError(std::io::Error),
    SendError(std::io::Error),
}

// ===== impl Error =====

impl Error {
    pub(crate) fn log(&self) {
        match self {
            Error::IoError(error) => {
                error.log();
            }
            Error::CmduInputError(ifname, source, error) => {
                // Malformed incoming frames are dropped, never fatal.
                info!(%ifname, %source, %error, "{}", self);
            }
            Error::CmduOutputError(error) => {
                warn!(%error, "{}", self);
            }
            Error::InterfaceStartError(name, error) => {
                error!(%name, error = %with_source(error), "{}", self);
            }
            Error::InstanceStartError(error) => {
                error!(error = %with_source(error), "{}", self);
            }
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::IoError(error) => error.fmt(f),
            Error::CmduInputError(..) => {
                write!(f, "discarding received CMDU")
            }
            Error::CmduOutputError(..) => {
                write!(f, "failed to forge CMDU")
            }
            Error::InterfaceStartError(..) => {
                write!(f, "failed to start interface")
            }
            Error::InstanceStartError(..) => {
                write!(f, "failed to start instance")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(error) => Some(error),
            Error::CmduInputError(_, _, error) => Some(error),
            Error::CmduOutputError(error) => Some(error),
            Error::InterfaceStartError(_, error) => Some(error),
            Error::InstanceStartError(error) => Some(error),
        }
    }
}

impl From<IoError> for Error {
    fn from(error: IoError) -> Error {
        Error::IoError(error)
    }
}

// ===== impl IoError =====

impl IoError {
    pub(crate) fn log(&self) {
        warn!("{}", self);
    }
}

impl std::fmt::Display for IoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IoError::SocketError(error) => {
                write!(f, "failed to create raw socket: {error}")
            }
            IoError::MulticastJoinError(error) => {
                write!(f, "failed to join multicast group: {error}")
            }
            IoError::InterfaceNotFound(name) => {
                write!(f, "interface not found: {name}")
            }
            IoError::MissingMacAddr(name) => {
                write!(f, "interface has no MAC address: {name}")
            }
            IoError::RecvError(error) => {
                write!(f, "failed to receive frame: {error}")
            }
            IoError::SendError(error) => {
                write!(f, "failed to send frame: {error}")
            }
        }
    }
}

impl std::error::Error for IoError {}

// ===== helper functions =====

fn with_source(error: &Error) -> String {
    match std::error::Error::source(error) {
        Some(source) => format!("{error}: {source}"),
        None => error.to_string(),
    }
}
