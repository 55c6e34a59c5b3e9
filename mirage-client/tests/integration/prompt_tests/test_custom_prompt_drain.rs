use mirage_client::{ClientConfig, SessionEvent};
use mirage_core::IceConnectionState;

use crate::integration::{create_test_negotiator, init_tracing};
use crate::utils::{
    MOCK_ANSWER, answer_frame, drain_events, establish_session, negotiate_until_offer,
};

#[tokio::test]
async fn test_custom_prompt_waits_for_connection() {
    init_tracing();

    let (mut negotiator, mut harness) = create_test_negotiator(ClientConfig::default());
    assert!(negotiator.queue_custom_prompt("Anime World"));
    assert_eq!(negotiator.pending_prompts(), 1);

    negotiate_until_offer(&mut negotiator).await;
    harness.transport.deliver(answer_frame(MOCK_ANSWER));
    negotiator.pump().await;
    assert!(harness.transport.sent_of_type("prompt").is_empty());
    assert_eq!(negotiator.pending_prompts(), 1);

    harness.peer.ice(IceConnectionState::Completed);
    negotiator.pump().await;

    let prompts = harness.transport.sent_of_type("prompt");
    assert_eq!(prompts.len(), 1);
    assert_eq!(prompts[0]["prompt"], "Anime World");
    assert_eq!(prompts[0]["should_enrich"], true);
    assert_eq!(negotiator.pending_prompts(), 0);
    assert!(
        drain_events(&mut harness.events)
            .contains(&SessionEvent::PromptSent("Anime World".to_owned()))
    );
}

#[tokio::test]
async fn test_custom_prompts_drain_in_order_from_another_thread() {
    init_tracing();

    let (mut negotiator, harness) = create_test_negotiator(ClientConfig::default());
    establish_session(&mut negotiator, &harness.transport, &harness.peer).await;

    let sender = negotiator.prompt_sender();
    std::thread::spawn(move || {
        for text in ["Cyberpunk City", "Underwater Kingdom", "Desert Oasis"] {
            assert!(sender.queue_custom_prompt(text));
        }
        assert!(!sender.queue_custom_prompt("  "));
    })
    .join()
    .expect("producer thread panicked");

    // Nothing goes out until the next pump
    assert!(harness.transport.sent_of_type("prompt").is_empty());
    negotiator.pump().await;

    let sent: Vec<String> = harness
        .transport
        .sent_of_type("prompt")
        .iter()
        .map(|f| f["prompt"].as_str().unwrap_or_default().to_owned())
        .collect();
    assert_eq!(sent, vec!["Cyberpunk City", "Underwater Kingdom", "Desert Oasis"]);
}

#[tokio::test]
async fn test_prompts_stay_queued_after_disconnect() {
    init_tracing();

    let (mut negotiator, harness) = create_test_negotiator(ClientConfig::default());
    establish_session(&mut negotiator, &harness.transport, &harness.peer).await;
    negotiator.disconnect().await;

    negotiator.queue_custom_prompt("Neon Tokyo");
    negotiator.pump().await;

    assert!(harness.transport.sent_of_type("prompt").is_empty());
    assert_eq!(negotiator.pending_prompts(), 1);
}
