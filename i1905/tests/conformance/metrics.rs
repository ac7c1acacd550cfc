//
// Copyright (c) The i1905 Contributors
//
// SPDX-License-Identifier: MIT
//

use bytes::Bytes;
use i1905::packet::cmdu::Cmdu;
use i1905::packet::consts::{
    LinkMetricDestination, LinkMetricResultCode, LinkMetricScope,
    MessageType,
};
use i1905::packet::tlv::{
    LinkMetricQueryTlv, LinkMetricResultCodeTlv, Tlv,
};
use i1905_utils::mac_addr::MacAddr;

use super::{
    ADDR_AL, ADDR_AL_PEER0, ADDR_MAC0, ADDR_MAC_PEER0, decode_frame,
    mock_instance, peer_discovery_frame, push_frame,
};

//
// Helper functions.
//

fn query_frame(
    destination: LinkMetricDestination,
    neighbor: MacAddr,
    scope: LinkMetricScope,
    message_id: u16,
) -> Bytes {
    let mut query = Cmdu::new(MessageType::LinkMetricQuery, message_id);
    query
        .add_tlv(Tlv::LinkMetricQuery(LinkMetricQueryTlv::new(
            destination,
            neighbor,
            scope,
        )))
        .unwrap();
    let mut frames = query
        .encode(&ADDR_MAC_PEER0.into(), &ADDR_MAC0.into(), 1500)
        .unwrap();
    frames.remove(0)
}

//
// Tests.
//

#[tokio::test]
async fn query_all_neighbors() {
    let (mut instance, mut net_tx) = mock_instance(None);
    push_frame(&mut instance, peer_discovery_frame());

    push_frame(
        &mut instance,
        query_frame(
            LinkMetricDestination::AllNeighbors,
            MacAddr::default(),
            LinkMetricScope::Both,
            0x2222,
        ),
    );

    let msg = net_tx.try_recv().unwrap();
    let (_, response) = decode_frame(&msg.frame);
    assert_eq!(response.message_type, MessageType::LinkMetricResponse as u16);
    // The response echoes the message id of the query.
    assert_eq!(response.message_id, 0x2222);

    // Both directions were requested.
    assert_eq!(response.tlvs.len(), 2);
    let tx = response.tlvs[0].as_transmitter_link_metric().unwrap();
    assert_eq!(tx.local_al_mac, MacAddr::from(ADDR_AL));
    assert_eq!(tx.neighbor_al_mac, MacAddr::from(ADDR_AL_PEER0));
    assert_eq!(tx.links[0].local_interface, MacAddr::from(ADDR_MAC0));
    assert_eq!(
        tx.links[0].neighbor_interface,
        MacAddr::from(ADDR_MAC_PEER0)
    );
    let rx = response.tlvs[1].as_receiver_link_metric().unwrap();
    assert_eq!(rx.neighbor_al_mac, MacAddr::from(ADDR_AL_PEER0));
}

// A query for an unknown specific neighbor is answered with a link metric
// result code.
#[tokio::test]
async fn query_unknown_neighbor() {
    let (mut instance, mut net_tx) = mock_instance(None);
    push_frame(
        &mut instance,
        query_frame(
            LinkMetricDestination::SpecificNeighbor,
            [0x02, 0x99, 0x99, 0x99, 0x99, 0x99].into(),
            LinkMetricScope::Both,
            0x2223,
        ),
    );

    let msg = net_tx.try_recv().unwrap();
    let (_, response) = decode_frame(&msg.frame);
    assert_eq!(response.message_id, 0x2223);
    assert_eq!(
        response.tlvs,
        vec![Tlv::LinkMetricResultCode(LinkMetricResultCodeTlv::new(
            LinkMetricResultCode::InvalidNeighbor
        ))]
    );
}
