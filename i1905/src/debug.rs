//
// Copyright (c) The i1905 Contributors
//
// SPDX-License-Identifier: MIT
//

use i1905_utils::mac_addr::MacAddr;
use tracing::{debug, debug_span};

use crate::packet::cmdu::Cmdu;

// AL debug messages.
#[derive(Debug)]
pub enum Debug<'a> {
    // Instances
    InstanceStart,
    InstanceStop,
    // Interfaces
    InterfaceStart(&'a str),
    InterfaceStop(&'a str),
    // Network
    CmduRx(&'a str, &'a MacAddr, &'a Cmdu),
    CmduTx(&'a str, &'a MacAddr, &'a Cmdu),
    LldpTx(&'a str),
    // Topology
    NeighborAdd(&'a str, &'a MacAddr),
    NeighborRefresh(&'a str, &'a MacAddr),
}

// ===== impl Debug =====

impl Debug<'_> {
    // Log debug message using the tracing API.
    pub(crate) fn log(&self) {
        match self {
            Debug::InstanceStart | Debug::InstanceStop => {
                debug!("{}", self);
            }
            Debug::InterfaceStart(name) | Debug::InterfaceStop(name) => {
                debug!(%name, "{}", self);
            }
            Debug::CmduRx(ifname, source, cmdu) => {
                debug_span!("network").in_scope(|| {
                    debug_span!("input").in_scope(|| {
                        let data = serde_json::to_string(&cmdu).unwrap();
                        debug!(%ifname, %source, %data, "{}", self);
                    })
                });
            }
            Debug::CmduTx(ifname, dst, cmdu) => {
                debug_span!("network").in_scope(|| {
                    debug_span!("output").in_scope(|| {
                        let data = serde_json::to_string(&cmdu).unwrap();
                        debug!(%ifname, %dst, %data, "{}", self);
                    })
                });
            }
            Debug::LldpTx(ifname) => {
                debug_span!("network").in_scope(|| {
                    debug_span!("output").in_scope(|| {
                        debug!(%ifname, "{}", self);
                    })
                });
            }
            Debug::NeighborAdd(ifname, al_mac)
            | Debug::NeighborRefresh(ifname, al_mac) => {
                debug!(%ifname, %al_mac, "{}", self);
            }
        }
    }
}

impl std::fmt::Display for Debug<'_> {
    // Display debug message.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Debug::InstanceStart => {
                write!(f, "instance starting")
            }
            Debug::InstanceStop => {
                write!(f, "instance stopping")
            }
            Debug::InterfaceStart(..) => {
                write!(f, "interface starting")
            }
            Debug::InterfaceStop(..) => {
                write!(f, "interface stopping")
            }
            Debug::CmduRx(..) => {
                write!(f, "CMDU received")
            }
            Debug::CmduTx(..) => {
                write!(f, "CMDU sent")
            }
            Debug::LldpTx(..) => {
                write!(f, "bridge discovery sent")
            }
            Debug::NeighborAdd(..) => {
                write!(f, "new 1905.1 neighbor")
            }
            Debug::NeighborRefresh(..) => {
                write!(f, "1905.1 neighbor refreshed")
            }
        }
    }
}
