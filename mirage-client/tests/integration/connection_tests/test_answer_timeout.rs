use std::time::Duration;

use mirage_client::{ClientConfig, RetryPolicy, SessionEvent};
use mirage_core::ConnectionState;

use crate::integration::{create_test_negotiator, init_tracing};
use crate::utils::{MOCK_ANSWER, answer_frame, drain_events, negotiate_until_offer};

fn config_with_timeout(ms: u64) -> ClientConfig {
    ClientConfig {
        retry: RetryPolicy {
            answer_timeout_ms: Some(ms),
            max_reconnect_attempts: 0,
        },
        ..ClientConfig::default()
    }
}

#[tokio::test(start_paused = true)]
async fn test_missing_answer_fails_attempt() {
    init_tracing();

    let (mut negotiator, mut harness) = create_test_negotiator(config_with_timeout(5_000));
    negotiate_until_offer(&mut negotiator).await;

    tokio::time::advance(Duration::from_millis(4_999)).await;
    negotiator.pump().await;
    assert_eq!(negotiator.state(), ConnectionState::AwaitingAnswer);

    tokio::time::advance(Duration::from_millis(1)).await;
    negotiator.pump().await;
    assert_eq!(negotiator.state(), ConnectionState::Failed);

    let events = drain_events(&mut harness.events);
    assert!(
        events
            .iter()
            .any(|e| matches!(e, SessionEvent::NegotiationFailed(reason) if reason.contains("no answer")))
    );
}

#[tokio::test(start_paused = true)]
async fn test_answer_in_time_clears_deadline() {
    init_tracing();

    let (mut negotiator, harness) = create_test_negotiator(config_with_timeout(5_000));
    negotiate_until_offer(&mut negotiator).await;

    tokio::time::advance(Duration::from_millis(2_000)).await;
    harness.transport.deliver(answer_frame(MOCK_ANSWER));
    negotiator.pump().await;

    tokio::time::advance(Duration::from_secs(60)).await;
    negotiator.pump().await;
    assert_eq!(negotiator.state(), ConnectionState::IceChecking);
}

#[tokio::test(start_paused = true)]
async fn test_no_timeout_by_default() {
    init_tracing();

    let (mut negotiator, _harness) = create_test_negotiator(ClientConfig::default());
    negotiate_until_offer(&mut negotiator).await;

    tokio::time::advance(Duration::from_secs(3_600)).await;
    negotiator.pump().await;
    assert_eq!(negotiator.state(), ConnectionState::AwaitingAnswer);
}
