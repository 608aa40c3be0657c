use serde_json::json;

use super::*;
use crate::util::storage::MemoryStorage;

fn reply(message: &str, session_id: Option<&str>, tool_results: Option<Vec<serde_json::Value>>) -> AiReply {
    AiReply { message: message.to_owned(), tool_results, session_id: session_id.map(str::to_owned) }
}

// =============================================================
// restore / clear
// =============================================================

#[test]
fn restore_picks_up_stored_session_id() {
    let storage = MemoryStorage::new();
    storage.set_item(SESSION_ID_KEY, "s-1").unwrap();
    let state = ChatState::restore(&storage);
    assert_eq!(state.session_id.as_deref(), Some("s-1"));
    assert!(state.turns.is_empty());
}

#[test]
fn restore_ignores_empty_session_id() {
    let storage = MemoryStorage::new();
    storage.set_item(SESSION_ID_KEY, "").unwrap();
    assert_eq!(ChatState::restore(&storage).session_id, None);
}

#[test]
fn clear_resets_transcript_and_forgets_session() {
    let storage = MemoryStorage::new();
    let mut state = ChatState::default();
    let pending = state.begin_prompt("hi").unwrap();
    state.record_reply(&pending, reply("hello", Some("s-1"), None), &storage);

    state.clear(&storage);
    assert!(state.turns.is_empty());
    assert_eq!(state.session_id, None);
    assert_eq!(storage.get_item(SESSION_ID_KEY), None);
}

// =============================================================
// prompts and replies
// =============================================================

#[test]
fn begin_prompt_trims_and_records_user_turn() {
    let mut state = ChatState::default();
    assert_eq!(state.begin_prompt("  spent 2h on Acme  ").map(|p| p.text).as_deref(), Some("spent 2h on Acme"));
    assert!(state.loading);
    assert_eq!(state.turns[0].role, ChatRole::User);
    assert_eq!(state.turns[0].content, "spent 2h on Acme");
}

#[test]
fn begin_prompt_rejects_blank_or_overlapping_prompts() {
    let mut state = ChatState::default();
    assert_eq!(state.begin_prompt("   "), None);
    state.begin_prompt("first");
    assert_eq!(state.begin_prompt("second"), None);
    assert_eq!(state.turns.len(), 1);
}

#[test]
fn reply_persists_new_session_id() {
    let storage = MemoryStorage::new();
    let mut state = ChatState::default();
    let pending = state.begin_prompt("hi").unwrap();
    let logged = state.record_reply(&pending, reply("hello", Some("s-9"), None), &storage);

    assert!(!logged);
    assert!(!state.loading);
    assert_eq!(state.session_id.as_deref(), Some("s-9"));
    assert_eq!(storage.get_item(SESSION_ID_KEY).as_deref(), Some("s-9"));
    assert_eq!(state.turns[1].role, ChatRole::Assistant);
    assert_eq!(state.turns[1].content, "hello");
}

#[test]
fn reply_with_tool_results_reports_logged_tasks() {
    let storage = MemoryStorage::new();
    let mut state = ChatState::default();
    let pending = state.begin_prompt("log it").unwrap();
    assert!(state.record_reply(&pending, reply("Logged.", None, Some(vec![json!({ "tool": "log_task" })])), &storage));
    assert_eq!(state.session_id, None);
}

#[test]
fn failure_appends_assistant_error_turn() {
    let mut state = ChatState::default();
    let pending = state.begin_prompt("hi").unwrap();
    state.record_failure(&pending, &ApiError::Transport("offline".to_owned()));

    assert!(!state.loading);
    assert_eq!(state.error.as_deref(), Some("network error: offline"));
    let last = state.turns.last().unwrap();
    assert_eq!(last.role, ChatRole::Assistant);
    assert!(last.content.starts_with("I encountered an error: network error: offline."));
}

#[test]
fn turn_ids_are_unique() {
    let storage = MemoryStorage::new();
    let mut state = ChatState::default();
    let pending = state.begin_prompt("a").unwrap();
    state.record_reply(&pending, reply("b", None, None), &storage);
    assert_ne!(state.turns[0].id, state.turns[1].id);
}

#[test]
fn reply_after_clear_is_ignored() {
    let storage = MemoryStorage::new();
    let mut state = ChatState::default();
    let pending = state.begin_prompt("spent 1h on Acme").unwrap();
    state.clear(&storage);

    let logged = state.record_reply(&pending, reply("Logged.", Some("s-old"), Some(vec![json!({})])), &storage);
    assert!(!logged);
    assert!(state.turns.is_empty());
    assert_eq!(state.session_id, None);
    assert_eq!(storage.get_item(SESSION_ID_KEY), None);
}

#[test]
fn failure_after_clear_is_ignored() {
    let storage = MemoryStorage::new();
    let mut state = ChatState::default();
    let pending = state.begin_prompt("hi").unwrap();
    state.clear(&storage);
    state.record_failure(&pending, &ApiError::Transport("offline".to_owned()));
    assert!(state.turns.is_empty());
    assert_eq!(state.error, None);
}

#[test]
fn prompt_after_clear_gets_its_reply() {
    let storage = MemoryStorage::new();
    let mut state = ChatState::default();
    let _stale = state.begin_prompt("old").unwrap();
    state.clear(&storage);
    let pending = state.begin_prompt("new").unwrap();
    state.record_reply(&pending, reply("done", Some("s-new"), None), &storage);
    assert_eq!(state.turns.len(), 2);
    assert_eq!(storage.get_item(SESSION_ID_KEY).as_deref(), Some("s-new"));
}
