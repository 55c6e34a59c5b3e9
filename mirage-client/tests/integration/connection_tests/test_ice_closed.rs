use mirage_client::{ClientConfig, ClientError, SessionEvent};
use mirage_core::{ConnectionState, IceCandidate, IceConnectionState};

use crate::integration::{create_test_negotiator, init_tracing};
use crate::utils::{
    MOCK_ANSWER, PeerCall, answer_frame, count_events, drain_events, establish_session,
    remote_candidate_frame,
};

#[tokio::test]
async fn test_ice_closed_is_terminal() {
    init_tracing();

    let (mut negotiator, mut harness) = create_test_negotiator(ClientConfig::default());
    establish_session(&mut negotiator, &harness.transport, &harness.peer).await;
    assert_eq!(negotiator.state(), ConnectionState::Connected);
    drain_events(&mut harness.events);

    harness.peer.ice(IceConnectionState::Closed);
    negotiator.pump().await;

    assert_eq!(negotiator.state(), ConnectionState::Closed);
    assert!(!negotiator.is_connected());
    assert_eq!(negotiator.session_id(), None);
    assert_eq!(harness.peer.count(&PeerCall::Close), 1);
    assert_eq!(harness.transport.close_calls(), 1);

    let events = drain_events(&mut harness.events);
    assert_eq!(
        count_events(&events, &SessionEvent::StateChanged(ConnectionState::Closed)),
        1
    );
    assert!(
        !events
            .iter()
            .any(|e| matches!(e, SessionEvent::NegotiationFailed(_)))
    );
}

#[tokio::test]
async fn test_no_negotiation_after_ice_closed() {
    init_tracing();

    let (mut negotiator, mut harness) = create_test_negotiator(ClientConfig::default());
    establish_session(&mut negotiator, &harness.transport, &harness.peer).await;
    let answers_before = harness.peer.count(&PeerCall::SetRemoteAnswer(MOCK_ANSWER.to_owned()));
    let candidates_before = harness.peer.remote_candidates().len();

    harness.peer.ice(IceConnectionState::Closed);
    negotiator.pump().await;
    drain_events(&mut harness.events);

    // Frames on the released socket never reach the negotiator
    harness.transport.deliver(answer_frame(MOCK_ANSWER));
    harness
        .transport
        .deliver(remote_candidate_frame("candidate:7 1 udp 1 10.0.0.7 7 typ host", "0", 0));
    harness.peer.ice(IceConnectionState::Completed);
    assert_eq!(negotiator.pump().await, 0);

    let result = negotiator.apply_remote_answer(MOCK_ANSWER.to_owned()).await;
    assert!(matches!(
        result,
        Err(ClientError::InvalidState(ConnectionState::Closed))
    ));
    let result = negotiator
        .apply_remote_candidate(Some(IceCandidate {
            candidate: "candidate:8 1 udp 1 10.0.0.8 8 typ host".to_owned(),
            sdp_mid: Some("0".to_owned()),
            sdp_mline_index: Some(0),
        }))
        .await;
    assert!(matches!(result, Err(ClientError::InvalidState(_))));

    assert_eq!(negotiator.state(), ConnectionState::Closed);
    assert_eq!(
        harness.peer.count(&PeerCall::SetRemoteAnswer(MOCK_ANSWER.to_owned())),
        answers_before
    );
    assert_eq!(harness.peer.remote_candidates().len(), candidates_before);
    assert!(drain_events(&mut harness.events).is_empty());
}
