//
// Copyright (c) The i1905 Contributors
//
// SPDX-License-Identifier: MIT
//

use std::time::Duration;

use bytes::{BufMut, Bytes, BytesMut};
use i1905_utils::bytes::BytesMutExt;
use i1905_utils::mac_addr::MacAddr;
use tokio::sync::mpsc;

use crate::debug::Debug;
use crate::error::Error;
use crate::events;
use crate::fragmentation::Defragmenter;
use crate::interface::Interface;
use crate::network::MulticastAddr;
use crate::packet::ETH_HDR_SIZE;
use crate::packet::cmdu::Cmdu;
use crate::packet::consts::{ETHER_TYPE_LLDP, FreqBand, MessageType};
use crate::packet::lldp::{
    ChassisIdTlv, Lldpdu, PortIdTlv, TimeToLiveTlv,
};
use crate::packet::tlv::{AlMacAddressTlv, MacAddressTlv, Tlv};
use crate::tasks;
use crate::tasks::messages::input::ProtocolMsg;

// AL instance configuration.
#[derive(Clone, Debug)]
pub struct Config {
    // AL MAC address identifying this node.
    pub al_mac: MacAddr,
    // Names of the interfaces attached to the AL.
    pub interfaces: Vec<String>,
    // Upper bound on any forged fragment, ethernet header included.
    pub max_segment_size: u16,
    // Deadline for discarding partially reassembled messages.
    pub reassembly_timeout: Duration,
    // Whether a fragment-id gap discards the whole reassembly context.
    pub strict_reassembly: bool,
    // Topology discovery period.
    pub discovery_interval: Duration,
    // Registrar role, when this node acts as one.
    pub registrar: Option<RegistrarConfig>,
}

#[derive(Clone, Copy, Debug)]
pub struct RegistrarConfig {
    pub band: FreqBand,
}

// AL instance.
#[derive(Debug)]
pub struct Instance {
    pub config: Config,
    pub interfaces: Vec<Interface>,
    pub(crate) defragmenter: Defragmenter,
    next_message_id: u16,
}

// ===== impl Config =====

impl Default for Config {
    fn default() -> Config {
        Config {
            al_mac: MacAddr::default(),
            interfaces: vec![],
            max_segment_size: 1500,
            reassembly_timeout: Duration::from_millis(10000),
            strict_reassembly: false,
            discovery_interval: Duration::from_secs(60),
            registrar: None,
        }
    }
}

// ===== impl Instance =====

impl Instance {
    pub fn new(config: Config) -> Instance {
        let defragmenter = Defragmenter::new(
            config.reassembly_timeout,
            config.strict_reassembly,
        );
        Instance {
            config,
            interfaces: vec![],
            defragmenter,
            next_message_id: rand::random(),
        }
    }

    // Starts the interfaces and timers, then serves protocol events until
    // every input channel is closed.
    pub async fn run(mut self) -> Result<(), Error> {
        Debug::InstanceStart.log();

        let (net_frame_rxp, mut net_frame_rxc) = mpsc::channel(64);
        let (proto_txp, mut proto_txc) = mpsc::unbounded_channel();

        // Start interfaces.
        for name in self.config.interfaces.clone() {
            let iface = Interface::start(&name, &net_frame_rxp)
                .map_err(|error| {
                    Error::InterfaceStartError(name, Box::new(error))
                })?;
            self.interfaces.push(iface);
        }

        // Start periodic topology discovery, ticking immediately.
        let _discovery_task = tasks::discovery_interval(
            self.config.discovery_interval,
            &proto_txp,
        );

        loop {
            let msg = tokio::select! {
                msg = net_frame_rxc.recv() => msg,
                msg = proto_txc.recv() => msg,
            };
            match msg {
                Some(msg) => self.process_msg(msg),
                None => break,
            }
        }

        Debug::InstanceStop.log();
        Ok(())
    }

    // Processes one protocol input message.
    //
    // Public so tests can drive the instance without live sockets.
    pub fn process_msg(&mut self, msg: ProtocolMsg) {
        match msg {
            ProtocolMsg::NetRxFrame(msg) => {
                events::process_frame(self, msg.ifname, msg.bytes);
            }
            ProtocolMsg::DiscoveryInterval(_) => {
                self.send_discovery();
            }
        }
    }

    // Multicasts a topology discovery CMDU and an LLDP bridge discovery
    // frame on every interface.
    fn send_discovery(&mut self) {
        let al_mac = self.config.al_mac;
        let message_id = self.next_message_id();

        for iface in &self.interfaces {
            let mut cmdu =
                Cmdu::new(MessageType::TopologyDiscovery, message_id);
            let _ = cmdu
                .add_tlv(Tlv::AlMacAddress(AlMacAddressTlv::new(al_mac)));
            let _ =
                cmdu.add_tlv(Tlv::MacAddress(MacAddressTlv::new(iface.mac)));
            if let Err(error) = iface.send_cmdu(
                &cmdu,
                &MulticastAddr::Cmdu.mac(),
                self.config.max_segment_size,
            ) {
                error.log();
            }

            let lldpdu = Lldpdu {
                chassis_id: ChassisIdTlv { mac: al_mac },
                port_id: PortIdTlv { mac: iface.mac },
                ttl: TimeToLiveTlv {
                    ttl: TimeToLiveTlv::DEFAULT,
                },
                optional: vec![],
            };
            iface.send_frame(lldp_frame(&iface.mac, &lldpdu.encode()));
            Debug::LldpTx(&iface.name).log();
        }
    }

    pub(crate) fn next_message_id(&mut self) -> u16 {
        self.next_message_id = self.next_message_id.wrapping_add(1);
        self.next_message_id
    }
}

// ===== helper functions =====

// Wraps an LLDPDU payload in an ethernet frame to the nearest-bridge group.
fn lldp_frame(src: &MacAddr, payload: &Bytes) -> Bytes {
    let mut buf = BytesMut::with_capacity(ETH_HDR_SIZE + payload.len());
    buf.put_slice(&MulticastAddr::Lldp.as_bytes());
    buf.put_mac(src);
    buf.put_u16(ETHER_TYPE_LLDP);
    buf.put_slice(payload);
    buf.freeze()
}
