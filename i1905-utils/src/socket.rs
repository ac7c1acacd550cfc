//
// Copyright (c) The i1905 Contributors
//
// SPDX-License-Identifier: MIT
//

use std::os::raw::{c_int, c_void};
use std::os::unix::io::AsRawFd;

use libc::packet_mreq;
use nix::sys::socket::{LinkAddr, SockaddrLike};
// Normal build: re-export standard socket types.
#[cfg(not(feature = "testing"))]
pub use {socket2::Socket, tokio::io::unix::AsyncFd};

// Test build: export mock sockets.
#[cfg(feature = "testing")]
pub use crate::socket::mock::{AsyncFd, Socket};

// Useful type definition.
type Result<T> = std::io::Result<T>;

// Extension methods for packet sockets.
pub trait PacketSocketExt: Sized + AsRawFd {
    // Subscribes the interface to the given link-layer multicast address.
    fn join_packet_multicast(
        &self,
        addr: [u8; 6],
        ifindex: u32,
    ) -> Result<()> {
        let optval = multicast_mreq(addr, ifindex);

        setsockopt(
            self,
            libc::SOL_PACKET,
            libc::PACKET_ADD_MEMBERSHIP,
            &optval as *const _ as *const c_void,
            std::mem::size_of::<packet_mreq>() as libc::socklen_t,
        )
    }

    // Unsubscribes the interface from the given link-layer multicast address.
    fn leave_packet_multicast(
        &self,
        addr: [u8; 6],
        ifindex: u32,
    ) -> Result<()> {
        let optval = multicast_mreq(addr, ifindex);

        setsockopt(
            self,
            libc::SOL_PACKET,
            libc::PACKET_DROP_MEMBERSHIP,
            &optval as *const _ as *const c_void,
            std::mem::size_of::<packet_mreq>() as libc::socklen_t,
        )
    }
}

// Extension methods for LinkAddr.
pub trait LinkAddrExt {
    // Creates a new `LinkAddr` using the given protocol number, interface
    // index, and an optional MAC address.
    fn new(protocol: u16, ifindex: u32, addr: Option<[u8; 6]>) -> Self;
}

// ===== impl LinkAddr =====

impl LinkAddrExt for LinkAddr {
    fn new(protocol: u16, ifindex: u32, addr: Option<[u8; 6]>) -> Self {
        let mut sll = libc::sockaddr_ll {
            sll_family: libc::AF_PACKET as u16,
            sll_protocol: protocol.to_be(),
            sll_ifindex: ifindex as _,
            sll_halen: 0,
            sll_hatype: 0,
            sll_pkttype: 0,
            sll_addr: [0; 8],
        };
        if let Some(addr) = addr {
            sll.sll_halen = 6;
            sll.sll_addr[..6].copy_from_slice(&addr);
        }
        let sll_len = size_of_val(&sll) as libc::socklen_t;
        unsafe {
            LinkAddr::from_raw(&sll as *const _ as *const _, Some(sll_len))
        }
        .unwrap()
    }
}

// ===== impl Socket =====

#[cfg(not(feature = "testing"))]
impl PacketSocketExt for Socket {}

// ===== Mock sockets for unit testing =====

pub mod mock {
    #[derive(Debug, Default)]
    pub struct AsyncFd<T>(T);

    #[derive(Debug, Default)]
    pub struct Socket();

    impl<T> AsyncFd<T> {
        pub fn new(inner: T) -> std::io::Result<Self> {
            Ok(Self(inner))
        }

        pub fn get_ref(&self) -> &T {
            &self.0
        }
    }
}

// ===== global functions =====

fn multicast_mreq(addr: [u8; 6], ifindex: u32) -> packet_mreq {
    let mut mreq = packet_mreq {
        mr_ifindex: ifindex as c_int,
        mr_type: libc::PACKET_MR_MULTICAST as u16,
        mr_alen: 6,
        mr_address: [0; 8],
    };
    mreq.mr_address[..6].copy_from_slice(&addr);
    mreq
}

fn setsockopt<F: AsRawFd>(
    sock: &F,
    level: c_int,
    optname: c_int,
    optval: *const c_void,
    optlen: libc::socklen_t,
) -> Result<()> {
    let ret = unsafe {
        libc::setsockopt(sock.as_raw_fd(), level, optname, optval, optlen)
    };
    if ret == -1 {
        return Err(std::io::Error::last_os_error());
    }

    Ok(())
}
