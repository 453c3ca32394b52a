mod common;

use colloquy_persist::MessageCache;
use colloquy_session::SessionError;
use colloquy_types::{ChatMessage, PLACEHOLDER_NAME};
use common::{harness, harness_with_cache, record, Remote, Reply};
use std::sync::Arc;
use tokio::sync::Notify;

#[tokio::test]
async fn test_failed_trigger_creates_no_thread() {
    let h = harness(vec![], Some(3), true).await;
    h.agent.fail_triggers();

    assert!(h.session.ensure_thread_on_focus().await.is_none());

    assert!(h.registry().is_empty());
    assert!(h.registry().current().is_none());
    assert_eq!(h.agent.triggers(), 1);
}

#[tokio::test]
async fn test_focus_creates_selected_placeholder() {
    let h = harness(vec![record("1_a", "Old")], Some(3), true).await;

    let thread = h.session.ensure_thread_on_focus().await.unwrap();

    assert_eq!(thread.name, PLACEHOLDER_NAME);
    assert_eq!(h.ids()[0], thread.id);
    assert_eq!(h.registry().current(), Some(thread.id.clone()));
    assert!(h.session.view().shows(&thread.id));
    assert_eq!(h.store.write_count(), 0);
}

#[tokio::test]
async fn test_focus_with_selection_is_noop() {
    let h = harness(vec![record("1_a", "Old")], Some(3), true).await;
    h.session.switch_to(Some("1_a")).unwrap().await.unwrap();

    assert!(h.session.ensure_thread_on_focus().await.is_none());
    assert_eq!(h.agent.triggers(), 0);
}

#[tokio::test]
async fn test_focus_at_quota_is_noop() {
    let h = harness(vec![record("1_a", "Only")], None, true).await;

    assert!(h.session.ensure_thread_on_focus().await.is_none());
    assert_eq!(h.agent.triggers(), 0);
    assert_eq!(h.registry().len(), 1);
}

#[tokio::test]
async fn test_start_new_chat_refusals() {
    let full = harness(vec![record("1_a", "Only")], None, true).await;
    assert_eq!(
        full.session.start_new_chat().await,
        Err(SessionError::QuotaReached(1))
    );

    let offline = harness(vec![], Some(3), true).await;
    offline.agent.fail_triggers();
    assert_eq!(
        offline.session.start_new_chat().await,
        Err(SessionError::AgentUnavailable)
    );
    assert!(offline.registry().is_empty());
}

#[tokio::test]
async fn test_switch_renders_cache_before_history_arrives() {
    let cache = MessageCache::new();
    cache.set("2_a", vec![ChatMessage::user("cached question")]);
    let h = harness_with_cache(
        vec![record("1_a", "One"), record("2_a", "Two")],
        Some(3),
        true,
        cache,
    )
    .await;

    let remote = vec![
        ChatMessage::user("cached question"),
        ChatMessage::assistant("fresh answer"),
    ];
    h.agent.set_remote("2_a", Remote::Transcript(remote.clone()));
    let gate = Arc::new(Notify::new());
    *h.agent.history_gate.lock().unwrap() = Some(gate.clone());

    let handle = h.session.switch_to(Some("2_a")).unwrap();

    let view = h.session.view();
    assert!(view.shows("2_a"));
    assert_eq!(view.messages, vec![ChatMessage::user("cached question")]);

    gate.notify_one();
    handle.await.unwrap();

    assert_eq!(h.session.view().messages, remote);
    assert_eq!(h.session.cache().get("2_a"), remote);
    assert_eq!(h.ids(), vec!["1_a", "2_a"]);
}

#[tokio::test]
async fn test_switch_flushes_outgoing_thread() {
    let h = harness(vec![record("1_a", "One"), record("2_a", "Two")], Some(3), true).await;
    h.agent.set_remote("1_a", Remote::Unreachable);
    h.agent.set_remote("2_a", Remote::Unreachable);

    h.session.switch_to(Some("1_a")).unwrap().await.unwrap();
    h.session.send_message("live message").await.unwrap();
    h.session.cache().clear("1_a");

    h.session.switch_to(Some("2_a")).unwrap().await.unwrap();

    let flushed = h.session.cache().get("1_a");
    assert_eq!(flushed.len(), 2);
    assert_eq!(flushed[0], ChatMessage::user("live message"));
}

#[tokio::test]
async fn test_revalidation_keeps_cache_when_remote_missing() {
    let cache = MessageCache::new();
    cache.set("1_a", vec![ChatMessage::user("local only")]);
    let h = harness_with_cache(vec![record("1_a", "One")], Some(3), true, cache).await;
    h.agent.set_remote("1_a", Remote::Missing);

    h.session.switch_to(Some("1_a")).unwrap().await.unwrap();

    assert_eq!(h.session.view().messages, vec![ChatMessage::user("local only")]);
    assert_eq!(h.session.cache().get("1_a"), vec![ChatMessage::user("local only")]);
}

#[tokio::test]
async fn test_stale_revalidation_does_not_clobber_view() {
    let h = harness(vec![record("1_a", "One"), record("2_a", "Two")], Some(3), true).await;
    h.agent.set_remote("1_a", Remote::Transcript(vec![ChatMessage::user("from one")]));
    let gate = Arc::new(Notify::new());
    *h.agent.history_gate.lock().unwrap() = Some(gate.clone());

    let slow = h.session.switch_to(Some("1_a")).unwrap();
    let _ = h.session.switch_to(None);

    gate.notify_one();
    slow.await.unwrap();

    assert!(h.session.view().thread_id.is_none());
    assert_eq!(h.session.cache().get("1_a"), vec![ChatMessage::user("from one")]);
}

#[tokio::test]
async fn test_revalidation_leaves_turn_in_flight_alone() {
    let h = harness(vec![record("1_a", "One")], Some(3), true).await;
    h.agent.set_remote(
        "1_a",
        Remote::Transcript(vec![ChatMessage::user("old"), ChatMessage::assistant("old reply")]),
    );
    let history_gate = Arc::new(Notify::new());
    *h.agent.history_gate.lock().unwrap() = Some(history_gate.clone());
    let reply_gate = Arc::new(Notify::new());
    h.agent.set_reply(Reply::Stalled(reply_gate.clone()));

    let revalidation = h.session.switch_to(Some("1_a")).unwrap();

    let session = h.session.clone();
    let turn = tokio::spawn(async move { session.send_message("new question").await });

    let partial = vec![ChatMessage::user("new question"), ChatMessage::assistant("re: ")];
    for _ in 0..1000 {
        if h.session.cache().get("1_a") == partial {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert_eq!(h.session.cache().get("1_a"), partial);

    history_gate.notify_one();
    revalidation.await.unwrap();

    assert_eq!(h.session.cache().get("1_a"), partial);
    assert_eq!(h.session.view().messages, partial);

    reply_gate.notify_one();
    assert!(turn.await.unwrap().unwrap().is_completed());

    let done = vec![
        ChatMessage::user("new question"),
        ChatMessage::assistant("re: new question"),
    ];
    assert_eq!(h.session.cache().get("1_a"), done);
    assert_eq!(h.session.view().messages, done);
}

#[tokio::test]
async fn test_switch_to_none_enters_new_chat_mode() {
    let h = harness(vec![record("1_a", "One")], Some(3), true).await;
    h.agent.set_remote("1_a", Remote::Unreachable);
    h.session.switch_to(Some("1_a")).unwrap().await.unwrap();

    assert!(h.session.switch_to(None).is_none());

    assert!(h.registry().current().is_none());
    assert_eq!(h.session.view(), Default::default());
}

#[tokio::test]
async fn test_switch_to_unknown_thread() {
    let h = harness(vec![], Some(3), true).await;
    assert!(h.session.switch_to(Some("nope")).is_none());
}

#[tokio::test]
async fn test_delete_thread_mirrors_remotely() {
    let h = harness(vec![record("1_a", "One"), record("2_a", "Two")], Some(3), true).await;
    h.agent.set_remote("2_a", Remote::Unreachable);
    h.session.switch_to(Some("2_a")).unwrap().await.unwrap();

    let removed = h.session.delete_thread("2_a").await.unwrap();

    assert_eq!(removed.name, "Two");
    assert_eq!(h.ids(), vec!["1_a"]);
    assert_eq!(h.agent.cleared(), vec!["2_a".to_string()]);
    assert!(h.session.view().thread_id.is_none());

    assert_eq!(
        h.session.delete_thread("2_a").await,
        Err(SessionError::ThreadNotFound("2_a".to_string()))
    );
}

#[tokio::test]
async fn test_clear_current() {
    let h = harness(vec![record("1_a", "One")], Some(3), true).await;
    assert_eq!(h.session.clear_current().await, Err(SessionError::NoCurrentThread));

    h.agent.set_remote("1_a", Remote::Unreachable);
    h.session.switch_to(Some("1_a")).unwrap().await.unwrap();

    h.session.clear_current().await.unwrap();
    assert!(h.registry().is_empty());
    assert_eq!(h.agent.cleared(), vec!["1_a".to_string()]);
}
