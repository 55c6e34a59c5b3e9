use mirage_client::{ClientConfig, ClientError, SessionEvent, TransportError};
use mirage_core::{ConnectionState, SocketState};

use crate::integration::{create_negotiator_with, create_test_negotiator, init_tracing};
use crate::utils::{
    MockPeerConnector, MockTransportConnector, PeerCall, drain_events, establish_session,
};

#[tokio::test]
async fn test_dial_error_fails_attempt() {
    init_tracing();

    let (mut negotiator, mut harness) = create_negotiator_with(
        ClientConfig::default(),
        MockTransportConnector::failing(),
        MockPeerConnector::new(),
    );

    let result = negotiator.connect().await;
    assert!(matches!(
        result,
        Err(ClientError::Transport(TransportError::Connect(_)))
    ));
    assert_eq!(negotiator.state(), ConnectionState::Failed);
    assert_eq!(negotiator.session_id(), None);
    assert!(harness.peer.calls().is_empty());

    let events = drain_events(&mut harness.events);
    assert!(
        events
            .iter()
            .any(|e| matches!(e, SessionEvent::NegotiationFailed(_)))
    );
}

#[tokio::test]
async fn test_socket_closed_before_open_fails_attempt() {
    init_tracing();

    let (mut negotiator, harness) = create_negotiator_with(
        ClientConfig::default(),
        MockTransportConnector::manual(),
        MockPeerConnector::new(),
    );
    negotiator.connect().await.expect("connect failed");
    negotiator.pump().await;
    assert_eq!(negotiator.state(), ConnectionState::SocketConnecting);
    assert!(harness.transport.sent().is_empty());

    harness.transport.fail_dial("handshake rejected");
    negotiator.pump().await;

    assert_eq!(negotiator.state(), ConnectionState::Failed);
    assert!(harness.peer.calls().is_empty());
}

#[tokio::test]
async fn test_nothing_is_sent_until_socket_opens() {
    init_tracing();

    let (mut negotiator, mut harness) = create_negotiator_with(
        ClientConfig::default(),
        MockTransportConnector::manual(),
        MockPeerConnector::new(),
    );
    negotiator.connect().await.expect("connect failed");
    negotiator.pump().await;
    assert!(harness.transport.sent().is_empty());

    harness.transport.open_socket();
    negotiator.pump().await;

    assert_eq!(negotiator.state(), ConnectionState::AwaitingAnswer);
    assert_eq!(harness.transport.sent_of_type("initialize_session").len(), 1);
    assert!(
        drain_events(&mut harness.events)
            .contains(&SessionEvent::SocketStateChanged(SocketState::Open))
    );
}

#[tokio::test]
async fn test_peer_survives_socket_close_after_connect() {
    init_tracing();

    let (mut negotiator, harness) = create_test_negotiator(ClientConfig::default());
    establish_session(&mut negotiator, &harness.transport, &harness.peer).await;

    harness.transport.close_from_remote();
    negotiator.pump().await;

    assert_eq!(negotiator.state(), ConnectionState::Connected);
    assert!(negotiator.is_connected());
    assert_eq!(harness.peer.count(&PeerCall::Close), 0);
}

#[tokio::test]
async fn test_without_stun_peer_has_no_ice_servers() {
    init_tracing();

    let config = ClientConfig {
        stun_server: String::new(),
        ..ClientConfig::default()
    };
    let (mut negotiator, harness) = create_test_negotiator(config);
    negotiator.connect().await.expect("connect failed");
    negotiator.pump().await;

    assert_eq!(
        harness.peer.calls().first(),
        Some(&PeerCall::Connect {
            stun_server: None,
            ice_candidate_pool_size: 0,
        })
    );
}
