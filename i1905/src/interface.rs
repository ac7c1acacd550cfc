//
// Copyright (c) The i1905 Contributors
//
// SPDX-License-Identifier: MIT
//

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use i1905_utils::mac_addr::MacAddr;
use i1905_utils::socket::{AsyncFd, Socket};
use i1905_utils::task::Task;
use tokio::sync::mpsc;
#[cfg(feature = "testing")]
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::{Sender, UnboundedSender};

use crate::debug::Debug;
use crate::error::{Error, IoError};
use crate::network;
use crate::packet::cmdu::Cmdu;
use crate::tasks;
use crate::tasks::messages::input::ProtocolMsg;
use crate::tasks::messages::output::NetTxFrameMsg;

// Network interface attached to the AL.
#[derive(Debug)]
pub struct Interface {
    pub name: String,
    pub ifindex: u32,
    pub mac: MacAddr,
    // 1905.1 neighbors heard on this interface, keyed by AL MAC address.
    pub neighbors: BTreeMap<MacAddr, Neighbor>,
    pub net: InterfaceNet,
}

// Interface socket and its tasks.
#[derive(Debug)]
pub struct InterfaceNet {
    #[allow(dead_code)]
    socket: Arc<AsyncFd<Socket>>,
    net_tx_framep: UnboundedSender<NetTxFrameMsg>,
    _net_tx_task: Task<()>,
    _net_rx_task: Task<()>,
}

// 1905.1 neighbor.
#[derive(Clone, Copy, Debug)]
pub struct Neighbor {
    pub al_mac: MacAddr,
    pub iface_mac: MacAddr,
    pub last_seen: Instant,
}

// ===== impl Interface =====

impl Interface {
    // Opens the interface socket and starts its Rx/Tx tasks.
    pub(crate) fn start(
        name: &str,
        net_frame_rxp: &Sender<ProtocolMsg>,
    ) -> Result<Interface, Error> {
        let (ifindex, mac) = network::ifinfo(name)?;

        let socket = network::socket(ifindex)
            .map_err(IoError::SocketError)
            .and_then(|socket| {
                AsyncFd::new(socket).map_err(IoError::SocketError)
            })
            .map(Arc::new)?;

        let (net_tx_framep, net_tx_framec) = mpsc::unbounded_channel();
        let net_tx_task = tasks::net_tx(
            socket.clone(),
            name.to_owned(),
            ifindex,
            net_tx_framec,
        );
        let net_rx_task =
            tasks::net_rx(socket.clone(), name.to_owned(), net_frame_rxp);

        Debug::InterfaceStart(name).log();

        Ok(Interface {
            name: name.to_owned(),
            ifindex,
            mac,
            neighbors: Default::default(),
            net: InterfaceNet {
                socket,
                net_tx_framep,
                _net_tx_task: net_tx_task,
                _net_rx_task: net_rx_task,
            },
        })
    }

    // Creates an interface backed by the mock socket, returning the receive
    // end of its Tx queue so tests can inspect outgoing frames.
    #[cfg(feature = "testing")]
    pub fn mock(
        name: &str,
        mac: MacAddr,
    ) -> (Interface, UnboundedReceiver<NetTxFrameMsg>) {
        let socket = Arc::new(AsyncFd::new(Socket::default()).unwrap());
        let (net_tx_framep, net_tx_framec) = mpsc::unbounded_channel();
        let iface = Interface {
            name: name.to_owned(),
            ifindex: 0,
            mac,
            neighbors: Default::default(),
            net: InterfaceNet {
                socket,
                net_tx_framep,
                _net_tx_task: Task::spawn(async {
                    std::future::pending().await
                }),
                _net_rx_task: Task::spawn(async {
                    std::future::pending().await
                }),
            },
        };
        (iface, net_tx_framec)
    }

    // Enqueues a raw ethernet frame for transmission.
    pub(crate) fn send_frame(&self, frame: Bytes) {
        let _ = self.net.net_tx_framep.send(NetTxFrameMsg { frame });
    }

    // Forges a CMDU and enqueues its fragments for transmission.
    pub(crate) fn send_cmdu(
        &self,
        cmdu: &Cmdu,
        dst: &MacAddr,
        max_segment_size: u16,
    ) -> Result<(), Error> {
        Debug::CmduTx(&self.name, dst, cmdu).log();
        let frames = cmdu
            .encode(&self.mac, dst, max_segment_size)
            .map_err(Error::CmduOutputError)?;
        for frame in frames {
            self.send_frame(frame);
        }
        Ok(())
    }

    // Records or refreshes a 1905.1 neighbor.
    pub(crate) fn update_neighbor(
        &mut self,
        al_mac: MacAddr,
        iface_mac: MacAddr,
    ) {
        let neighbor = Neighbor {
            al_mac,
            iface_mac,
            last_seen: Instant::now(),
        };
        match self.neighbors.insert(al_mac, neighbor) {
            None => Debug::NeighborAdd(&self.name, &al_mac).log(),
            Some(_) => Debug::NeighborRefresh(&self.name, &al_mac).log(),
        }
    }
}
