use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use pretty_assertions::assert_eq;

use super::*;
use crate::testing::{Fixture, MemoryStore, until, until_awaiting};
use crate::{HighlightRequest, ReplaceRequest};

async fn next_notification(rx: &mut Notifications<WindowNotification>) -> WindowNotification {
	tokio::time::timeout(Duration::from_secs(5), rx.next())
		.await
		.unwrap_or_else(|_| panic!("no notification"))
		.unwrap_or_else(|| panic!("channel closed"))
}

#[tokio::test]
async fn new_window_starts_empty_and_clean() {
	let fixture = Fixture::new(None, MemoryStore::default());
	assert!(!fixture.window.is_initialized());
	assert!(matches!(fixture.window.edit_text("x"), Err(SessionError::NotReady)));

	fixture.window.run().await;
	let snapshot = fixture.window.snapshot();
	assert!(snapshot.is_initialized);
	assert!(!snapshot.is_changed);
	assert_eq!(snapshot.text, "");
	assert_eq!(snapshot.title, "unknown file - editor");
	assert_eq!(snapshot.active_prompt, None);
}

#[tokio::test]
async fn run_loads_file_content() {
	let fixture = Fixture::new(Some("notes.txt"), MemoryStore::default().with_file("notes.txt", "hello"));
	fixture.window.run().await;
	assert_eq!(fixture.window.text(), "hello");
	assert!(!fixture.window.is_changed());
	assert_eq!(fixture.window.title(), "notes.txt - editor");
}

#[tokio::test]
async fn read_failure_leaves_editable_placeholder() {
	let fixture = Fixture::new(Some("missing.txt"), MemoryStore::default());
	fixture.window.run().await;

	let snapshot = fixture.window.snapshot();
	assert!(snapshot.is_initialized);
	assert!(!snapshot.is_changed);
	assert_eq!(snapshot.path, None);
	assert_eq!(snapshot.text, "Could not read file: missing.txt");

	fixture.window.edit_text("fresh").unwrap();
	assert!(fixture.window.is_changed());
}

#[tokio::test]
async fn refused_read_uses_placeholder() {
	let store = MemoryStore::default().with_file("locked.txt", "secret");
	store.fail_reads();
	let fixture = Fixture::new(Some("locked.txt"), store);
	fixture.window.run().await;
	assert_eq!(fixture.window.text(), "Could not read file: locked.txt");
	assert_eq!(fixture.window.title(), "unknown file - editor");
}

#[tokio::test]
async fn run_twice_is_a_no_op() {
	let fixture = Fixture::dirty("kept").await;
	fixture.window.run().await;
	assert_eq!(fixture.window.text(), "kept");
	assert!(fixture.window.is_changed());
}

#[tokio::test]
async fn edits_mark_changed_and_title() {
	let fixture = Fixture::dirty("draft").await;
	assert!(fixture.window.is_changed());
	assert_eq!(fixture.window.title(), "*unknown file - editor");
}

#[tokio::test]
async fn clean_exit_skips_dialog() {
	let fixture = Fixture::ready().await;
	assert!(fixture.window.exit().await.unwrap());
	assert!(!fixture.window.prompts().exit.is_awaiting());
	assert_eq!(fixture.removed(), vec![WindowId(1)]);
}

#[tokio::test]
async fn dirty_exit_cancel_keeps_window() {
	let fixture = Fixture::dirty("draft").await;
	let window = Arc::clone(&fixture.window);
	let exit = tokio::spawn(async move { window.exit().await });

	until_awaiting(&fixture.window, PromptKind::Exit).await;
	assert_eq!(fixture.window.snapshot().active_prompt, Some(PromptKind::Exit));
	fixture.window.prompts().exit.answer(ExitChoice::Cancel).unwrap();

	assert!(!exit.await.unwrap().unwrap());
	assert!(fixture.removed().is_empty());
	assert!(fixture.window.is_changed());
}

#[tokio::test]
async fn dirty_exit_no_discards_without_writing() {
	let fixture = Fixture::dirty("draft").await;
	let window = Arc::clone(&fixture.window);
	let exit = tokio::spawn(async move { window.exit().await });

	until_awaiting(&fixture.window, PromptKind::Exit).await;
	fixture.window.prompts().exit.answer(ExitChoice::No).unwrap();

	assert!(exit.await.unwrap().unwrap());
	assert_eq!(fixture.removed(), vec![WindowId(1)]);
	assert_eq!(fixture.store.started_writes(), 0);
}

#[tokio::test]
async fn dirty_exit_yes_saves_once_then_exits() {
	let fixture = Fixture::dirty("draft").await;
	let mut rx = fixture.window.notifications();
	let window = Arc::clone(&fixture.window);
	let exit = tokio::spawn(async move { window.exit().await });

	until_awaiting(&fixture.window, PromptKind::Exit).await;
	fixture.window.prompts().exit.answer(ExitChoice::Yes).unwrap();
	until_awaiting(&fixture.window, PromptKind::Save).await;
	fixture.window.prompts().save.answer(Some(PathBuf::from("out.txt"))).unwrap();

	assert!(exit.await.unwrap().unwrap());
	assert_eq!(fixture.store.writes(), vec![(PathBuf::from("out.txt"), "draft".to_string())]);
	assert!(!fixture.window.is_changed());
	assert_eq!(fixture.window.path().as_deref(), Some(Path::new("out.txt")));
	assert_eq!(next_notification(&mut rx).await, WindowNotification::SaveSuccess(PathBuf::from("out.txt")));
	assert_eq!(fixture.removed(), vec![WindowId(1)]);
}

#[tokio::test]
async fn dirty_exit_yes_then_dismissed_save_dialog_stays_open() {
	let fixture = Fixture::dirty("draft").await;
	let window = Arc::clone(&fixture.window);
	let exit = tokio::spawn(async move { window.exit().await });

	until_awaiting(&fixture.window, PromptKind::Exit).await;
	fixture.window.prompts().exit.answer(ExitChoice::Yes).unwrap();
	until_awaiting(&fixture.window, PromptKind::Save).await;
	fixture.window.prompts().save.answer(None).unwrap();

	assert!(!exit.await.unwrap().unwrap());
	assert!(fixture.removed().is_empty());
	assert!(fixture.window.is_changed());
	assert_eq!(fixture.store.started_writes(), 0);
}

#[tokio::test]
async fn save_before_ready_is_rejected() {
	let fixture = Fixture::new(None, MemoryStore::default());
	assert!(matches!(fixture.window.save().await, Err(SessionError::NotReady)));
}

#[tokio::test]
async fn save_with_known_path_writes_directly() {
	let fixture = Fixture::new(Some("a.txt"), MemoryStore::default().with_file("a.txt", "one"));
	fixture.window.run().await;
	fixture.window.edit_text("two").unwrap();

	assert!(fixture.window.save().await.unwrap());
	assert!(!fixture.window.prompts().save.is_awaiting());
	assert_eq!(fixture.store.file(Path::new("a.txt")).as_deref(), Some("two"));
	assert!(!fixture.window.is_changed());
}

#[tokio::test]
async fn empty_save_path_is_a_cancel() {
	let fixture = Fixture::dirty("draft").await;
	let window = Arc::clone(&fixture.window);
	let save = tokio::spawn(async move { window.save().await });

	until_awaiting(&fixture.window, PromptKind::Save).await;
	fixture.window.prompts().save.answer(Some(PathBuf::new())).unwrap();

	assert!(!save.await.unwrap().unwrap());
	assert_eq!(fixture.store.started_writes(), 0);
}

#[tokio::test]
async fn failed_write_reports_error_and_stays_changed() {
	let store = MemoryStore::default().with_file("a.txt", "one");
	store.fail_writes();
	let fixture = Fixture::new(Some("a.txt"), store);
	fixture.window.run().await;
	fixture.window.edit_text("two").unwrap();
	let mut rx = fixture.window.notifications();

	assert!(fixture.window.save().await.unwrap());
	assert!(fixture.window.is_changed());
	assert_eq!(next_notification(&mut rx).await, WindowNotification::SaveError(PathBuf::from("a.txt")));
}

#[tokio::test]
async fn superseded_save_outcome_is_discarded() {
	let store = MemoryStore::default().with_file("a.txt", "one");
	store.gate_writes();
	let fixture = Fixture::new(Some("a.txt"), store);
	fixture.window.run().await;
	fixture.window.edit_text("first").unwrap();

	let window = Arc::clone(&fixture.window);
	let first = tokio::spawn(async move { window.save().await });
	until(|| fixture.store.started_writes() == 1).await;

	fixture.window.edit_text("second").unwrap();
	let window = Arc::clone(&fixture.window);
	let second = tokio::spawn(async move { window.save().await });
	until(|| fixture.store.started_writes() == 2).await;
	fixture.store.release_write();

	assert!(first.await.unwrap().unwrap());
	assert!(second.await.unwrap().unwrap());
	assert_eq!(fixture.store.writes(), vec![(PathBuf::from("a.txt"), "second".to_string())]);
	assert!(!fixture.window.is_changed());
}

#[tokio::test]
async fn open_discards_outcome_of_save_in_flight() {
	let store = MemoryStore::default().with_file("a.txt", "one").with_file("b.txt", "bee");
	store.gate_writes();
	store.fail_writes();
	let fixture = Fixture::new(Some("a.txt"), store);
	fixture.window.run().await;
	fixture.window.edit_text("two").unwrap();
	let mut rx = fixture.window.notifications();

	let window = Arc::clone(&fixture.window);
	let save = tokio::spawn(async move { window.save().await });
	until(|| fixture.store.started_writes() == 1).await;

	let window = Arc::clone(&fixture.window);
	let open = tokio::spawn(async move { window.open().await });
	until_awaiting(&fixture.window, PromptKind::Open).await;
	fixture.window.prompts().open.answer(Some(PathBuf::from("b.txt"))).unwrap();
	assert!(open.await.unwrap().unwrap());
	fixture.store.release_write();

	assert!(save.await.unwrap().unwrap());
	assert_eq!(fixture.window.text(), "bee");
	assert_eq!(fixture.window.path().as_deref(), Some(Path::new("b.txt")));
	assert!(!fixture.window.is_changed());
	assert!(tokio::time::timeout(Duration::from_millis(50), rx.next()).await.is_err());
}

#[tokio::test]
async fn exit_lets_save_in_flight_report() {
	let store = MemoryStore::default().with_file("a.txt", "one");
	store.gate_writes();
	store.fail_writes();
	let fixture = Fixture::new(Some("a.txt"), store);
	fixture.window.run().await;
	fixture.window.edit_text("two").unwrap();
	let mut rx = fixture.window.notifications();

	let window = Arc::clone(&fixture.window);
	let save = tokio::spawn(async move { window.save().await });
	until(|| fixture.store.started_writes() == 1).await;

	assert!(fixture.window.exit().await.unwrap());
	assert_eq!(fixture.removed(), vec![WindowId(1)]);
	fixture.store.release_write();

	assert!(save.await.unwrap().unwrap());
	assert_eq!(next_notification(&mut rx).await, WindowNotification::SaveError(PathBuf::from("a.txt")));
	assert!(fixture.window.is_changed());
}

#[tokio::test]
async fn open_replaces_document_after_ask_to_save() {
	let fixture = Fixture::new(None, MemoryStore::default().with_file("b.txt", "loaded"));
	fixture.window.run().await;
	fixture.window.edit_text("draft").unwrap();

	let window = Arc::clone(&fixture.window);
	let open = tokio::spawn(async move { window.open().await });
	until_awaiting(&fixture.window, PromptKind::Exit).await;
	fixture.window.prompts().exit.answer(ExitChoice::No).unwrap();
	until_awaiting(&fixture.window, PromptKind::Open).await;
	fixture.window.prompts().open.answer(Some(PathBuf::from("b.txt"))).unwrap();

	assert!(open.await.unwrap().unwrap());
	assert_eq!(fixture.window.text(), "loaded");
	assert!(!fixture.window.is_changed());
	assert_eq!(fixture.window.path().as_deref(), Some(Path::new("b.txt")));
}

#[tokio::test]
async fn dismissed_open_dialog_keeps_document() {
	let fixture = Fixture::ready().await;
	let window = Arc::clone(&fixture.window);
	let open = tokio::spawn(async move { window.open().await });
	until_awaiting(&fixture.window, PromptKind::Open).await;
	fixture.window.prompts().open.answer(None).unwrap();

	assert!(!open.await.unwrap().unwrap());
	assert!(fixture.window.is_initialized());
	assert_eq!(fixture.window.path(), None);
}

#[tokio::test]
async fn concurrent_exit_requests_fail_the_second() {
	let fixture = Fixture::dirty("draft").await;
	let window = Arc::clone(&fixture.window);
	let first = tokio::spawn(async move { window.exit().await });
	until_awaiting(&fixture.window, PromptKind::Exit).await;

	let second = fixture.window.exit().await;
	assert!(matches!(second, Err(SessionError::Prompt(inkpad_worker::PromptError::AlreadyAwaiting("exit")))));

	fixture.window.prompts().exit.answer(ExitChoice::Cancel).unwrap();
	assert!(!first.await.unwrap().unwrap());
}

#[tokio::test]
async fn search_and_replace_first_then_all() {
	let fixture = Fixture::dirty("one two one one").await;
	assert_eq!(fixture.window.search("one"), 3);
	assert_eq!(fixture.window.snapshot().search.match_offsets, vec![0, 8, 12]);

	assert_eq!(fixture.window.replace("1", false).unwrap(), 2);
	assert_eq!(fixture.window.text(), "1 two one one");
	assert_eq!(fixture.window.snapshot().search.match_offsets, vec![6, 10]);

	assert_eq!(fixture.window.replace("1", true).unwrap(), 0);
	assert_eq!(fixture.window.text(), "1 two 1 1");
}

#[tokio::test]
async fn edits_drop_search_results() {
	let fixture = Fixture::dirty("abc abc").await;
	fixture.window.search("abc");
	fixture.window.search_and_highlight("ABC", true);
	fixture.window.edit_text("x").unwrap();

	let search = fixture.window.snapshot().search;
	assert!(search.match_offsets.is_empty());
	assert!(search.highlights.is_empty());
}

#[tokio::test]
async fn highlight_respects_case_flag() {
	let fixture = Fixture::dirty("Hello hello").await;
	assert_eq!(fixture.window.search_and_highlight("hello", false), 1);
	assert_eq!(fixture.window.search_and_highlight("hello", true), 2);
	assert_eq!(fixture.window.match_count(), 2);
	fixture.window.clear_highlight();
	assert_eq!(fixture.window.match_count(), 0);
}

#[tokio::test]
async fn search_and_replace_flow() {
	let fixture = Fixture::dirty("cat cat").await;
	let window = Arc::clone(&fixture.window);
	let flow = tokio::spawn(async move { window.search_and_replace().await });

	until_awaiting(&fixture.window, PromptKind::Search).await;
	fixture.window.prompts().search.answer(Some("cat".to_string())).unwrap();
	until_awaiting(&fixture.window, PromptKind::Replace).await;
	fixture
		.window
		.prompts()
		.replace
		.answer(Some(ReplaceRequest {
			replacement: "dog".to_string(),
			all: false,
		}))
		.unwrap();

	assert_eq!(flow.await.unwrap().unwrap(), ReplaceOutcome::Replaced { remaining: 1 });
	assert_eq!(fixture.window.text(), "dog cat");
}

#[tokio::test]
async fn search_and_replace_without_matches_skips_replace_dialog() {
	let fixture = Fixture::dirty("cat").await;
	let window = Arc::clone(&fixture.window);
	let flow = tokio::spawn(async move { window.search_and_replace().await });

	until_awaiting(&fixture.window, PromptKind::Search).await;
	fixture.window.prompts().search.answer(Some("dog".to_string())).unwrap();

	assert_eq!(flow.await.unwrap().unwrap(), ReplaceOutcome::NoMatches);
	assert!(!fixture.window.prompts().replace.is_awaiting());
}

#[tokio::test]
async fn search_and_replace_dismissals() {
	let fixture = Fixture::dirty("cat").await;

	let window = Arc::clone(&fixture.window);
	let flow = tokio::spawn(async move { window.search_and_replace().await });
	until_awaiting(&fixture.window, PromptKind::Search).await;
	fixture.window.prompts().search.answer(None).unwrap();
	assert_eq!(flow.await.unwrap().unwrap(), ReplaceOutcome::Cancelled);

	let window = Arc::clone(&fixture.window);
	let flow = tokio::spawn(async move { window.search_and_replace().await });
	until_awaiting(&fixture.window, PromptKind::Search).await;
	fixture.window.prompts().search.answer(Some("cat".to_string())).unwrap();
	until_awaiting(&fixture.window, PromptKind::Replace).await;
	fixture.window.prompts().replace.answer(None).unwrap();
	assert_eq!(flow.await.unwrap().unwrap(), ReplaceOutcome::Declined);
	assert_eq!(fixture.window.text(), "cat");
}

#[tokio::test]
async fn request_highlight_shows_match_count() {
	let fixture = Fixture::dirty("a A a").await;
	let window = Arc::clone(&fixture.window);
	let flow = tokio::spawn(async move { window.request_highlight().await });

	until_awaiting(&fixture.window, PromptKind::Highlight).await;
	fixture
		.window
		.prompts()
		.highlight
		.answer(Some(HighlightRequest {
			query: "a".to_string(),
			ignore_case: true,
		}))
		.unwrap();

	assert_eq!(flow.await.unwrap().unwrap(), Some(3));
	assert!(fixture.window.is_match_count_visible());
	fixture.window.dismiss_match_count_dialog();
	assert!(!fixture.window.snapshot().match_count_visible);
}

#[tokio::test]
async fn changes_fire_on_edits() {
	let fixture = Fixture::ready().await;
	let mut changes = fixture.window.changes();
	fixture.window.edit_text("x").unwrap();
	assert!(changes.changed().await.is_some());
}

#[tokio::test]
async fn host_requests_go_through_weak_reference() {
	let fixture = Fixture::ready().await;
	fixture.window.new_window();
	fixture.window.send_notification(TrayNotification::new("t", "b", crate::Level::Info));
	assert_eq!(fixture.host.siblings.load(Ordering::SeqCst), 1);
	assert_eq!(fixture.host.forwarded.lock().len(), 1);
}

#[tokio::test]
async fn dropped_host_is_tolerated() {
	let fixture = Fixture::ready().await;
	let Fixture { host, window, .. } = fixture;
	drop(host);
	window.new_window();
	assert!(window.exit().await.unwrap());
}
