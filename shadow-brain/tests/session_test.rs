//! Session and registry behaviour

mod common;

use common::RecordingBackend;
use shadow_brain::{
    AvatarSession, BrainConfig, BrainError, BrainOptions, Language, MeetingType, Personality,
    SessionRegistry, MAX_INPUT_CHARS,
};
use std::sync::Arc;
use std::time::Duration;

fn config() -> BrainConfig {
    BrainConfig::new(
        Personality::Friendly,
        "Weekly sync",
        MeetingType::Casual,
        Language::En,
    )
}

fn session(backend: Arc<RecordingBackend>) -> AvatarSession {
    AvatarSession::new("meeting-1", config(), BrainOptions::default(), backend).unwrap()
}

#[tokio::test]
async fn test_empty_input_is_rejected() {
    let backend = Arc::new(RecordingBackend::new("ok"));
    let session = session(backend.clone());

    assert!(matches!(session.respond("", None).await, Err(BrainError::EmptyInput)));
    assert!(matches!(session.respond("  \n\t", None).await, Err(BrainError::EmptyInput)));
    assert_eq!(backend.request_count(), 0);
    assert!(session.history().await.is_empty());
}

#[tokio::test]
async fn test_oversized_input_is_rejected() {
    let backend = Arc::new(RecordingBackend::new("ok"));
    let session = session(backend.clone());

    let input = "a".repeat(MAX_INPUT_CHARS + 1);
    match session.respond(&input, None).await {
        Err(BrainError::InputTooLarge(len, max)) => {
            assert_eq!(len, MAX_INPUT_CHARS + 1);
            assert_eq!(max, MAX_INPUT_CHARS);
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert_eq!(backend.request_count(), 0);
}

#[tokio::test]
async fn test_respond_trims_input() {
    let backend = Arc::new(RecordingBackend::new("Great, yes"));
    let session = session(backend);

    let reply = session.respond("  hello  ", None).await.unwrap();
    assert_eq!(reply.response, "Great, yes");
    assert_eq!(session.history().await[0].content, "hello");
}

#[tokio::test]
async fn test_invalid_config_is_rejected() {
    let backend = Arc::new(RecordingBackend::new("ok"));
    let mut bad = config();
    bad.meeting_context = "x".repeat(1000);
    assert!(AvatarSession::new("m", bad, BrainOptions::default(), backend.clone()).is_err());
    assert!(AvatarSession::new(" ", config(), BrainOptions::default(), backend).is_err());
}

#[tokio::test]
async fn test_change_personality_resets_history() {
    let backend = Arc::new(RecordingBackend::new("ok"));
    let session = session(backend);

    session.respond("hello", None).await.unwrap();
    assert_eq!(session.history().await.len(), 2);
    let before = session.system_prompt().await;

    session.change_personality(Personality::Expert).await;

    assert!(session.history().await.is_empty());
    let config = session.config().await;
    assert_eq!(config.personality, Personality::Expert);
    assert_eq!(config.meeting_context, "Weekly sync");
    assert_ne!(session.system_prompt().await, before);
}

#[tokio::test]
async fn test_reset_and_summary() {
    let backend = Arc::new(RecordingBackend::with_replies(&["first"]));
    let session = session(backend);

    session.respond("hello", None).await.unwrap();
    assert_eq!(session.summarize().await, "ok");

    session.reset().await;
    assert!(session.history().await.is_empty());
}

#[tokio::test]
async fn test_concurrent_turns_are_serialized() {
    let backend =
        Arc::new(RecordingBackend::new("ok").with_delay(Duration::from_millis(20)));
    let session = Arc::new(session(backend));

    let mut handles = vec![];
    for i in 0..5 {
        let session = session.clone();
        handles.push(tokio::spawn(async move {
            session.respond(&format!("q{}", i), None).await
        }));
    }
    for handle in handles {
        assert!(handle.await.unwrap().is_ok());
    }

    // every user turn is directly followed by its own reply
    let history = session.history().await;
    assert_eq!(history.len(), 10);
    for pair in history.chunks(2) {
        assert!(pair[0].content.starts_with('q'));
        assert_eq!(pair[1].content, "ok");
    }
}

#[tokio::test]
async fn test_registry_open_is_idempotent() {
    let registry = SessionRegistry::new(
        Arc::new(RecordingBackend::new("ok")),
        BrainOptions::default(),
    );
    assert!(registry.is_empty());

    let a = registry.open("meeting-1", config()).unwrap();
    let b = registry.open("meeting-1", config()).unwrap();
    assert_eq!(a.id(), b.id());
    assert_eq!(registry.len(), 1);

    registry.open("meeting-2", config()).unwrap();
    let mut ids = registry.meeting_ids();
    ids.sort();
    assert_eq!(ids, vec!["meeting-1".to_string(), "meeting-2".to_string()]);
}

#[tokio::test]
async fn test_registry_close_returns_history() {
    let registry = SessionRegistry::new(
        Arc::new(RecordingBackend::new("ok")),
        BrainOptions::default(),
    );
    let session = registry.open("meeting-1", config()).unwrap();
    session.respond("hello", None).await.unwrap();

    let history = registry.close("meeting-1").await.unwrap();
    assert_eq!(history.len(), 2);
    assert!(registry.get("meeting-1").is_none());
    assert!(registry.close("meeting-1").await.is_none());
}

#[tokio::test]
async fn test_oversized_context_is_rejected() {
    let backend = Arc::new(RecordingBackend::new("ok"));
    let session = session(backend.clone());

    let context = "c".repeat(MAX_INPUT_CHARS);
    assert!(matches!(
        session.respond("hello", Some(&context)).await,
        Err(BrainError::InputTooLarge(_, MAX_INPUT_CHARS))
    ));
    assert_eq!(backend.request_count(), 0);
    assert!(session.history().await.is_empty());

    // a shorter context fits
    let context = "c".repeat(MAX_INPUT_CHARS / 2);
    assert!(session.respond("hello", Some(&context)).await.is_ok());
}
