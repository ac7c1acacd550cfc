//
// Copyright (c) The i1905 Contributors
//
// SPDX-License-Identifier: MIT
//

use bytes::Bytes;
use i1905::instance::RegistrarConfig;
use i1905::network::MulticastAddr;
use i1905::packet::cmdu::Cmdu;
use i1905::packet::consts::{FreqBand, MessageType, Role, ServiceType};
use i1905::packet::tlv::{
    AlMacAddressTlv, AutoconfigFreqBandTlv, SearchedRoleTlv,
    SearchedServiceTlv, SupportedFreqBandTlv, SupportedRoleTlv,
    SupportedServiceTlv, Tlv,
};
use i1905_utils::mac_addr::MacAddr;

use super::{
    ADDR_AL_PEER0, ADDR_MAC_PEER0, decode_frame, mock_instance, push_frame,
};

//
// Helper functions.
//

// Forges an AP autoconfiguration search for a registrar on the given band.
fn search_frame(band: FreqBand, message_id: u16) -> Bytes {
    let mut search = Cmdu::new(MessageType::ApAutoconfigSearch, message_id);
    search
        .add_tlv(Tlv::AlMacAddress(AlMacAddressTlv::new(
            ADDR_AL_PEER0.into(),
        )))
        .unwrap();
    search
        .add_tlv(Tlv::SearchedRole(SearchedRoleTlv::new(Role::Registrar)))
        .unwrap();
    search
        .add_tlv(Tlv::AutoconfigFreqBand(AutoconfigFreqBandTlv::new(band)))
        .unwrap();
    search
        .add_tlv(Tlv::SearchedService(SearchedServiceTlv {
            services: vec![ServiceType::Controller],
        }))
        .unwrap();
    let mut frames = search
        .encode(&ADDR_MAC_PEER0.into(), &MulticastAddr::Cmdu.mac(), 1500)
        .unwrap();
    frames.remove(0)
}

//
// Tests.
//

// A registrar answers a matching search with its supported role, band and
// services, echoing the message id of the search.
#[tokio::test]
async fn registrar_response() {
    let (mut instance, mut net_tx) = mock_instance(Some(RegistrarConfig {
        band: FreqBand::Band2_4GHz,
    }));
    push_frame(&mut instance, search_frame(FreqBand::Band2_4GHz, 0x6789));

    let msg = net_tx.try_recv().unwrap();
    let (hdr, response) = decode_frame(&msg.frame);
    assert_eq!(hdr.dst_addr, MacAddr::from(ADDR_MAC_PEER0));
    assert_eq!(
        response.message_type,
        MessageType::ApAutoconfigResponse as u16
    );
    assert_eq!(response.message_id, 0x6789);
    assert_eq!(
        response.tlvs,
        vec![
            Tlv::SupportedRole(SupportedRoleTlv::new(Role::Registrar)),
            Tlv::SupportedFreqBand(SupportedFreqBandTlv::new(
                FreqBand::Band2_4GHz
            )),
            Tlv::SupportedService(SupportedServiceTlv {
                services: vec![ServiceType::Controller, ServiceType::Agent],
            }),
        ]
    );
}

// A search for a band the registrar does not serve elicits no response.
#[tokio::test]
async fn band_mismatch_is_ignored() {
    let (mut instance, mut net_tx) = mock_instance(Some(RegistrarConfig {
        band: FreqBand::Band2_4GHz,
    }));
    push_frame(&mut instance, search_frame(FreqBand::Band5GHz, 0x6789));

    assert!(net_tx.try_recv().is_err());
}

// A node not configured as registrar stays silent.
#[tokio::test]
async fn non_registrar_is_silent() {
    let (mut instance, mut net_tx) = mock_instance(None);
    push_frame(&mut instance, search_frame(FreqBand::Band2_4GHz, 0x6789));

    assert!(net_tx.try_recv().is_err());
}
