use mirage_client::ClientConfig;
use mirage_core::ConnectionState;

use crate::integration::{create_test_negotiator, init_tracing};
use crate::utils::{MOCK_ANSWER, PeerCall, answer_frame, drain_events, negotiate_until_offer};

#[tokio::test]
async fn test_malformed_frames_are_dropped() {
    init_tracing();

    let (mut negotiator, mut harness) = create_test_negotiator(ClientConfig::default());
    negotiate_until_offer(&mut negotiator).await;
    drain_events(&mut harness.events);

    for raw in [
        r#"{"type":"answer","sdp":"v=0"#,
        "not json at all",
        r#"{"sdp":"v=0\r\n"}"#,
        r#"{"type":"answer"}"#,
        r#"{"type":"ice-candidate","candidate":42}"#,
        r#"{"type":"error","message":"rate limited"}"#,
    ] {
        harness.transport.deliver(raw);
    }
    negotiator.pump().await;

    assert_eq!(negotiator.state(), ConnectionState::AwaitingAnswer);
    assert!(drain_events(&mut harness.events).is_empty());
    assert!(
        !harness
            .peer
            .calls()
            .iter()
            .any(|c| matches!(c, PeerCall::SetRemoteAnswer(_) | PeerCall::AddIceCandidate(_)))
    );

    // The session is still usable afterwards
    harness.transport.deliver(answer_frame(MOCK_ANSWER));
    negotiator.pump().await;
    assert_eq!(negotiator.state(), ConnectionState::IceChecking);
}
