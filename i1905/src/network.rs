//
// Copyright (c) The i1905 Contributors
//
// SPDX-License-Identifier: MIT
//

use std::io::IoSlice;
use std::os::fd::AsRawFd;
use std::sync::Arc;

use bytes::Bytes;
use i1905_utils::capabilities;
use i1905_utils::mac_addr::MacAddr;
use i1905_utils::socket::{AsyncFd, LinkAddrExt, PacketSocketExt, Socket};
use nix::sys::socket;
use nix::sys::socket::LinkAddr;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::error::SendError;
use tokio::sync::mpsc::{Sender, UnboundedReceiver};

use crate::error::IoError;
use crate::packet::consts::ETHER_TYPE_1905;
use crate::tasks::messages::input::{NetRxFrameMsg, ProtocolMsg};
use crate::tasks::messages::output::NetTxFrameMsg;

// 1905.1 ethernet multicast addresses.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[derive(Deserialize, Serialize)]
pub enum MulticastAddr {
    // 1905.1 topology discovery (01:80:c2:00:00:13).
    Cmdu,
    // LLDP nearest bridge (01:80:c2:00:00:0e).
    Lldp,
}

// ===== impl MulticastAddr =====

impl MulticastAddr {
    pub const fn as_bytes(&self) -> [u8; 6] {
        match self {
            MulticastAddr::Cmdu => [0x01, 0x80, 0xC2, 0x00, 0x00, 0x13],
            MulticastAddr::Lldp => [0x01, 0x80, 0xC2, 0x00, 0x00, 0x0E],
        }
    }

    pub fn mac(&self) -> MacAddr {
        MacAddr::from(self.as_bytes())
    }
}

// ===== global functions =====

pub(crate) fn socket(ifindex: u32) -> Result<Socket, std::io::Error> {
    #[cfg(not(feature = "testing"))]
    {
        use socket2::{Domain, Protocol, Type};

        // Create raw socket.
        let socket = capabilities::raise(|| {
            Socket::new(
                Domain::PACKET,
                Type::RAW,
                Some(Protocol::from(libc::ETH_P_ALL)),
            )
        })?;
        socket.set_nonblocking(true)?;

        // Bind to the 1905.1 EtherType on the local interface.
        let sockaddr = LinkAddr::new(ETHER_TYPE_1905, ifindex, None);
        socket::bind(socket.as_raw_fd(), &sockaddr)?;

        // Subscribe to the discovery multicast groups.
        socket.join_packet_multicast(
            MulticastAddr::Cmdu.as_bytes(),
            ifindex,
        )?;
        socket.join_packet_multicast(
            MulticastAddr::Lldp.as_bytes(),
            ifindex,
        )?;

        Ok(socket)
    }
    #[cfg(feature = "testing")]
    {
        Ok(Socket {})
    }
}

#[cfg(not(feature = "testing"))]
pub(crate) async fn write_loop(
    socket: Arc<AsyncFd<Socket>>,
    ifindex: u32,
    mut net_tx_framec: UnboundedReceiver<NetTxFrameMsg>,
) {
    while let Some(NetTxFrameMsg { frame }) = net_tx_framec.recv().await {
        if let Err(error) = send_frame(&socket, ifindex, &frame).await {
            error.log();
        }
    }
}

#[cfg(not(feature = "testing"))]
pub(crate) async fn read_loop(
    socket: Arc<AsyncFd<Socket>>,
    ifname: String,
    net_frame_rxp: Sender<ProtocolMsg>,
) -> Result<(), SendError<ProtocolMsg>> {
    let mut buf = [0; 16384];

    loop {
        // Receive ethernet frame.
        match socket
            .async_io(tokio::io::Interest::READABLE, |socket| {
                use std::io::IoSliceMut;

                let mut iov = [IoSliceMut::new(&mut buf)];
                match socket::recvmsg::<LinkAddr>(
                    socket.as_raw_fd(),
                    &mut iov,
                    None,
                    socket::MsgFlags::empty(),
                ) {
                    Ok(msg) => Ok(msg.bytes),
                    Err(errno) => Err(errno.into()),
                }
            })
            .await
        {
            Ok(bytes) => {
                let bytes = Bytes::copy_from_slice(&buf[..bytes]);
                let msg = ProtocolMsg::NetRxFrame(NetRxFrameMsg {
                    ifname: ifname.clone(),
                    bytes,
                });
                net_frame_rxp.send(msg).await?;
            }
            Err(error) if error.kind() == std::io::ErrorKind::Interrupted => {
                // Retry if the syscall was interrupted (EINTR).
                continue;
            }
            Err(error) => {
                IoError::RecvError(error).log();
            }
        }
    }
}

// Returns the interface index and MAC address of the given interface.
pub(crate) fn ifinfo(ifname: &str) -> Result<(u32, MacAddr), IoError> {
    #[cfg(not(feature = "testing"))]
    {
        let ifindex = nix::net::if_::if_nametoindex(ifname)
            .map_err(|_| IoError::InterfaceNotFound(ifname.to_owned()))?;

        let mac = nix::ifaddrs::getifaddrs()
            .map_err(|errno| IoError::SocketError(errno.into()))?
            .filter(|ifaddr| ifaddr.interface_name == ifname)
            .find_map(|ifaddr| {
                let addr = ifaddr.address?;
                let link = addr.as_link_addr()?;
                link.addr().map(MacAddr::from)
            })
            .ok_or_else(|| IoError::MissingMacAddr(ifname.to_owned()))?;

        Ok((ifindex, mac))
    }
    #[cfg(feature = "testing")]
    {
        Ok((1, MacAddr::default()))
    }
}

// ===== helper functions =====

#[cfg(not(feature = "testing"))]
async fn send_frame(
    socket: &AsyncFd<Socket>,
    ifindex: u32,
    frame: &Bytes,
) -> Result<usize, IoError> {
    // The frame already carries its ethernet header; the link address only
    // selects the outgoing interface.
    let mut dst = [0; 6];
    dst.copy_from_slice(&frame[0..6]);
    let protocol = u16::from_be_bytes([frame[12], frame[13]]);

    socket
        .async_io(tokio::io::Interest::WRITABLE, |socket| {
            let iov = [IoSlice::new(frame)];
            let sockaddr = LinkAddr::new(protocol, ifindex, Some(dst));
            socket::sendmsg(
                socket.as_raw_fd(),
                &iov,
                &[],
                socket::MsgFlags::empty(),
                Some(&sockaddr),
            )
            .map_err(|errno| errno.into())
        })
        .await
        .map_err(IoError::SendError)
}
