mod support;

use std::sync::Arc;
use std::time::Duration;

use patsim_core::models::evaluation::EvaluationReport;
use patsim_core::models::message::Message;
use patsim_session::conversation::{ConversationState, Evaluation};
use patsim_session::error::SessionError;
use patsim_session::registry::SessionRegistry;
use patsim_session::session::Session;

use support::migraine;

fn evaluation(score: u8) -> Evaluation {
    Evaluation {
        raw: format!("Score: {score}/10"),
        report: EvaluationReport {
            score: Some(score),
            ..Default::default()
        },
        transcript_len: 0,
        evaluated_at: jiff::Timestamp::now(),
    }
}

#[test]
fn push_user_ignores_blank_content() {
    let mut state = ConversationState::default();

    assert!(!state.push_user(""));
    assert!(!state.push_user("  \n "));
    assert_eq!(state.revision(), 0);

    assert!(state.push_user("  Any allergies? "));
    assert_eq!(state.transcript(), &[Message::user("  Any allergies? ")]);
    assert_eq!(state.revision(), 1);
}

#[test]
fn reply_is_appended_verbatim() {
    let mut state = ConversationState::default();
    state.push_user("Hello");
    let revision = state.revision();

    state.append_reply(revision, "  Hi doctor.\n").unwrap();
    assert_eq!(state.transcript()[1], Message::assistant("  Hi doctor.\n"));
}

#[test]
fn reply_after_concurrent_append_is_rejected() {
    let mut state = ConversationState::default();
    state.push_user("First question");
    let revision = state.revision();
    state.push_user("Second question");

    match state.append_reply(revision, "late answer") {
        Err(SessionError::ConcurrentModification { expected, found }) => {
            assert_eq!(expected, 1);
            assert_eq!(found, 2);
        }
        other => panic!("expected ConcurrentModification, got {other:?}"),
    }
    assert_eq!(state.transcript().len(), 2);
}

#[test]
fn evaluation_is_replaced_not_merged() {
    let mut state = ConversationState::default();
    state.replace_evaluation(evaluation(2));
    state.replace_evaluation(evaluation(9));

    assert_eq!(state.last_evaluation().unwrap().report.score, Some(9));
}

#[test]
fn error_is_single_and_clearable() {
    let mut state = ConversationState::default();
    state.set_error("first");
    state.set_error("second");
    assert_eq!(state.error(), Some("second"));

    state.clear_error();
    assert_eq!(state.error(), None);
}

#[tokio::test]
async fn registry_tracks_independent_sessions() {
    let registry = SessionRegistry::new();
    let a = registry.insert(Session::new(migraine())).await;
    let b = registry.insert(Session::new(migraine())).await;

    assert_ne!(a, b);
    assert_eq!(registry.len().await, 2);

    let handle = registry.get(a).await.unwrap();
    assert_eq!(handle.lock().await.id(), a);

    registry.remove(a).await.unwrap();
    assert!(matches!(registry.get(a).await, Err(SessionError::UnknownSession(id)) if id == a));
    assert!(matches!(registry.remove(a).await, Err(SessionError::UnknownSession(_))));
    assert_eq!(registry.len().await, 1);
}

#[tokio::test]
async fn overlapping_requests_are_rejected_as_busy() {
    let registry = SessionRegistry::new();
    let id = registry.insert(Session::new(migraine())).await;
    let handle = registry.get(id).await.unwrap();

    let guard = SessionRegistry::lock_exclusive(&handle).unwrap();
    assert!(matches!(
        SessionRegistry::lock_exclusive(&handle),
        Err(SessionError::Busy)
    ));
    drop(guard);

    assert!(SessionRegistry::lock_exclusive(&Arc::clone(&handle)).is_ok());
}

fn later(by: Duration) -> jiff::Timestamp {
    let ms = i64::try_from(by.as_millis()).unwrap();
    jiff::Timestamp::from_millisecond(jiff::Timestamp::now().as_millisecond() + ms).unwrap()
}

#[tokio::test]
async fn idle_sessions_are_evicted() {
    let registry = SessionRegistry::new();
    let id = registry.insert(Session::new(migraine())).await;
    let ttl = Duration::from_secs(30 * 60);

    assert_eq!(registry.evict_idle_at(later(Duration::from_secs(60)), ttl).await, 0);
    assert_eq!(registry.len().await, 1);

    assert_eq!(registry.evict_idle_at(later(ttl * 2), ttl).await, 1);
    assert!(registry.is_empty().await);
    assert!(matches!(registry.get(id).await, Err(SessionError::UnknownSession(_))));
}

#[tokio::test]
async fn lookup_refreshes_activity() {
    let registry = SessionRegistry::new();
    let id = registry.insert(Session::new(migraine())).await;
    let handle = registry.get(id).await.unwrap();
    let first = handle.lock().await.last_active();

    tokio::time::sleep(Duration::from_millis(5)).await;
    registry.get(id).await.unwrap();

    assert!(handle.lock().await.last_active() > first);
}

#[tokio::test]
async fn sessions_mid_request_are_never_evicted() {
    let registry = SessionRegistry::new();
    let busy = registry.insert(Session::new(migraine())).await;
    let idle = registry.insert(Session::new(migraine())).await;
    let handle = registry.get(busy).await.unwrap();
    let _guard = SessionRegistry::lock_exclusive(&handle).unwrap();

    let ttl = Duration::from_secs(60);
    assert_eq!(registry.evict_idle_at(later(ttl * 10), ttl).await, 1);

    assert!(registry.get(busy).await.is_ok());
    assert!(registry.get(idle).await.is_err());
}
