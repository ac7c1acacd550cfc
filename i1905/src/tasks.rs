//
// Copyright (c) The i1905 Contributors
//
// SPDX-License-Identifier: MIT
//

use std::sync::Arc;
use std::time::Duration;

use i1905_utils::socket::{AsyncFd, Socket};
use i1905_utils::task::{IntervalTask, Task};
use tokio::sync::mpsc::{Sender, UnboundedReceiver, UnboundedSender};
use tracing::{Instrument, debug_span};

use crate::network;

//
// AL tasks diagram:
//
//                                 +--------------+
//                  net_rx (Nx) -> |              | -> (Nx) net_tx
//      discovery_interval (1x) -> |   instance   |
//                                 |              |
//                                 +--------------+
//

// AL inter-task message types.
pub mod messages {
    use bytes::Bytes;
    use serde::{Deserialize, Serialize};

    // Type aliases.
    pub type ProtocolInputMsg = input::ProtocolMsg;

    // Input messages (child task -> main task).
    pub mod input {
        use super::*;

        #[derive(Debug)]
        #[derive(Deserialize, Serialize)]
        pub enum ProtocolMsg {
            NetRxFrame(NetRxFrameMsg),
            DiscoveryInterval(DiscoveryIntervalMsg),
        }

        #[derive(Debug)]
        #[derive(Deserialize, Serialize)]
        pub struct NetRxFrameMsg {
            pub ifname: String,
            pub bytes: Bytes,
        }

        #[derive(Debug)]
        #[derive(Deserialize, Serialize)]
        pub struct DiscoveryIntervalMsg {}
    }

    // Output messages (main task -> child task).
    pub mod output {
        use super::*;

        #[derive(Debug)]
        #[derive(Deserialize, Serialize)]
        pub struct NetTxFrameMsg {
            pub frame: Bytes,
        }
    }
}

// ===== AL tasks =====

// Network Rx task.
pub(crate) fn net_rx(
    socket: Arc<AsyncFd<Socket>>,
    ifname: String,
    net_frame_rxp: &Sender<messages::input::ProtocolMsg>,
) -> Task<()> {
    #[cfg(not(feature = "testing"))]
    {
        let net_frame_rxp = net_frame_rxp.clone();
        Task::spawn_supervised(move || {
            let span = debug_span!("network", ifname = %ifname);
            network::read_loop(
                socket.clone(),
                ifname.clone(),
                net_frame_rxp.clone(),
            )
            .instrument(span)
        })
    }
    #[cfg(feature = "testing")]
    {
        Task::spawn(async move { std::future::pending().await })
    }
}

// Network Tx task.
pub(crate) fn net_tx(
    socket: Arc<AsyncFd<Socket>>,
    ifname: String,
    ifindex: u32,
    net_tx_framec: UnboundedReceiver<messages::output::NetTxFrameMsg>,
) -> Task<()> {
    #[cfg(not(feature = "testing"))]
    {
        let span = debug_span!("network", %ifname);
        Task::spawn(
            async move {
                network::write_loop(socket, ifindex, net_tx_framec).await;
            }
            .instrument(span),
        )
    }
    #[cfg(feature = "testing")]
    {
        Task::spawn(async move { std::future::pending().await })
    }
}

// Periodic topology discovery task.
pub(crate) fn discovery_interval(
    interval: Duration,
    instance_txp: &UnboundedSender<messages::input::ProtocolMsg>,
) -> IntervalTask {
    #[cfg(not(feature = "testing"))]
    {
        let instance_txp = instance_txp.clone();
        IntervalTask::new(interval, true, move || {
            let instance_txp = instance_txp.clone();
            async move {
                let msg = messages::input::ProtocolMsg::DiscoveryInterval(
                    messages::input::DiscoveryIntervalMsg {},
                );
                let _ = instance_txp.send(msg);
            }
        })
    }
    #[cfg(feature = "testing")]
    {
        IntervalTask {}
    }
}
