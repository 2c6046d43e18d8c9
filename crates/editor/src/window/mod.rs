//! Per-window state machine.
//!
//! A [`WindowSession`] owns one [`Document`], its [`SearchState`], the dialog
//! slots in [`WindowPrompts`], a notification channel for save outcomes, and
//! the handle of the in-flight save. Operations that need the user suspend on
//! a prompt slot; the presentation layer resumes them by answering it.
//!
//! # Locking
//!
//! Document and search state live behind one `parking_lot` mutex. The lock
//! is never held across an `.await`: every operation reads what it needs,
//! releases, suspends, and re-locks to publish. A save task publishes its
//! outcome under the same lock only if its generation was not superseded,
//! and superseding happens while that lock is held: by a newer save, or by a
//! load that replaces the document.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};

use inkpad_worker::{ChangeSignal, ChangeWatcher, NotificationChannel, Notifications, ReplaceableTask, TaskClass, TaskTicket};
use parking_lot::Mutex;

use crate::config::EditorConfig;
use crate::document::{Document, DocumentPhase};
use crate::notification::{TrayNotification, WindowNotification};
use crate::prompts::{ExitChoice, PromptKind, WindowPrompts};
use crate::search::SearchState;
use crate::store::FileStore;
use crate::{Result, SessionError};

mod search;

pub use search::ReplaceOutcome;

/// Identifier of a window within its application session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub u64);

impl std::fmt::Display for WindowId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// Services a window needs from the session that owns it.
pub trait WindowHost: Send + Sync {
	/// Opens a new empty window next to the caller.
	fn spawn_sibling(&self);
	/// Drops the window from the session.
	fn remove_window(&self, id: WindowId);
	/// Delivers a notification to the tray.
	fn forward_notification(&self, notification: TrayNotification);
}

/// Collaborators shared by every window of a session.
#[derive(Clone)]
pub struct WindowContext {
	pub host: Weak<dyn WindowHost>,
	pub store: Arc<dyn FileStore>,
	pub config: Arc<EditorConfig>,
}

#[derive(Debug, Default)]
struct WindowState {
	document: Document,
	search: SearchState,
	match_count_visible: bool,
}

/// Point-in-time view of a window for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSnapshot {
	pub id: WindowId,
	pub title: String,
	pub path: Option<PathBuf>,
	pub is_changed: bool,
	pub is_initialized: bool,
	pub text: String,
	pub search: SearchState,
	pub match_count_visible: bool,
	pub active_prompt: Option<PromptKind>,
}

/// One editor window.
pub struct WindowSession {
	id: WindowId,
	host: Weak<dyn WindowHost>,
	store: Arc<dyn FileStore>,
	config: Arc<EditorConfig>,
	state: Arc<Mutex<WindowState>>,
	prompts: WindowPrompts,
	notifications: Arc<NotificationChannel<WindowNotification>>,
	saves: ReplaceableTask,
	signal: ChangeSignal,
}

impl std::fmt::Debug for WindowSession {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("WindowSession")
			.field("id", &self.id)
			.field("state", &*self.state.lock())
			.field("prompts", &self.prompts)
			.field("saves", &self.saves)
			.finish_non_exhaustive()
	}
}

impl WindowSession {
	/// Creates an uninitialized window. Call [`Self::run`] to load or start it.
	pub fn new(id: WindowId, path: Option<PathBuf>, ctx: WindowContext) -> Self {
		let signal = ChangeSignal::new();
		Self {
			id,
			host: ctx.host,
			store: ctx.store,
			config: ctx.config,
			state: Arc::new(Mutex::new(WindowState {
				document: Document::new(path),
				..WindowState::default()
			})),
			prompts: WindowPrompts::new(&signal),
			notifications: Arc::new(NotificationChannel::new()),
			saves: ReplaceableTask::new("save"),
			signal,
		}
	}

	pub fn id(&self) -> WindowId {
		self.id
	}

	/// Dialog slots the presentation layer answers.
	pub fn prompts(&self) -> &WindowPrompts {
		&self.prompts
	}

	/// Watches for any observable change of this window.
	pub fn changes(&self) -> ChangeWatcher {
		self.signal.watch()
	}

	/// Save outcome stream.
	pub fn notifications(&self) -> Notifications<WindowNotification> {
		self.notifications.subscribe()
	}

	pub fn snapshot(&self) -> WindowSnapshot {
		let state = self.state.lock();
		WindowSnapshot {
			id: self.id,
			title: self.config.window_title(state.document.path(), state.document.is_changed()),
			path: state.document.path().map(Path::to_path_buf),
			is_changed: state.document.is_changed(),
			is_initialized: state.document.is_initialized(),
			text: state.document.text().to_string(),
			search: state.search.clone(),
			match_count_visible: state.match_count_visible,
			active_prompt: self.prompts.active(),
		}
	}

	pub fn title(&self) -> String {
		let state = self.state.lock();
		self.config.window_title(state.document.path(), state.document.is_changed())
	}

	pub fn path(&self) -> Option<PathBuf> {
		self.state.lock().document.path().map(Path::to_path_buf)
	}

	pub fn is_changed(&self) -> bool {
		self.state.lock().document.is_changed()
	}

	pub fn is_initialized(&self) -> bool {
		self.state.lock().document.is_initialized()
	}

	pub fn text(&self) -> String {
		self.state.lock().document.text().to_string()
	}

	/// Replaces the text as a user edit. Search results are dropped.
	pub fn edit_text(&self, text: impl Into<String>) -> Result<()> {
		{
			let mut state = self.state.lock();
			state.document.set_text(text)?;
			state.search.invalidate();
		}
		self.signal.notify();
		Ok(())
	}

	/// Brings the window to `Ready`, loading its file if it has a path.
	pub async fn run(&self) {
		let path = {
			let state = self.state.lock();
			if state.document.phase() != DocumentPhase::Uninitialized {
				tracing::debug!(window = %self.id, phase = ?state.document.phase(), "window.run_repeated");
				return;
			}
			state.document.path().map(Path::to_path_buf)
		};

		match path {
			Some(path) => self.load(path).await,
			None => {
				self.state.lock().document.init_empty();
				tracing::debug!(window = %self.id, "window.new_document");
				self.signal.notify();
			}
		}
	}

	/// Asks to save, then replaces the document with a file the user picks.
	///
	/// Returns `false` when the user cancels either dialog.
	pub async fn open(&self) -> Result<bool> {
		if !self.ask_to_save().await? {
			return Ok(false);
		}
		let Some(path) = self.prompts.open.request().await?.filter(|path| !path.as_os_str().is_empty()) else {
			tracing::debug!(window = %self.id, "window.open_cancelled");
			return Ok(false);
		};
		self.load(path).await;
		Ok(true)
	}

	/// Writes the document to its path, asking for one if it has none.
	///
	/// Returns `false` only when the save dialog is dismissed. A failed write
	/// still returns `true`; it is reported as [`WindowNotification::SaveError`]
	/// and leaves the document changed.
	pub async fn save(&self) -> Result<bool> {
		let known = {
			let state = self.state.lock();
			if !state.document.is_initialized() {
				return Err(SessionError::NotReady);
			}
			state.document.path().map(Path::to_path_buf)
		};

		let path = match known {
			Some(path) => path,
			None => match self.prompts.save.request().await?.filter(|path| !path.as_os_str().is_empty()) {
				Some(path) => path,
				None => {
					tracing::debug!(window = %self.id, "window.save_cancelled");
					return Ok(false);
				}
			},
		};

		let ticket = self.launch_save(path)?;
		let generation = ticket.generation();
		if !ticket.join().await {
			tracing::debug!(window = %self.id, generation, "window.save_not_completed");
		}
		Ok(true)
	}

	/// Asks to save, then removes the window from its host.
	///
	/// Returns `false` when the user cancels. An in-flight save keeps running
	/// and still reports its outcome.
	pub async fn exit(&self) -> Result<bool> {
		if !self.ask_to_save().await? {
			return Ok(false);
		}
		if self.saves.is_running() {
			tracing::debug!(window = %self.id, generation = ?self.saves.generation(), "window.exit_during_save");
		}
		match self.host.upgrade() {
			Some(host) => host.remove_window(self.id),
			None => tracing::debug!(window = %self.id, "window.exit_without_host"),
		}
		tracing::debug!(window = %self.id, "window.exited");
		Ok(true)
	}

	/// Asks the host for a new empty window.
	pub fn new_window(&self) {
		match self.host.upgrade() {
			Some(host) => host.spawn_sibling(),
			None => tracing::debug!(window = %self.id, "window.new_window_without_host"),
		}
	}

	/// Sends a notification to the tray through the host.
	pub fn send_notification(&self, notification: TrayNotification) {
		match self.host.upgrade() {
			Some(host) => host.forward_notification(notification),
			None => tracing::debug!(window = %self.id, title = %notification.title, "window.notification_without_host"),
		}
	}

	/// Gate run before discarding the document.
	///
	/// Clean documents pass without asking. Otherwise the exit dialog decides:
	/// `Yes` saves and passes unless the save dialog is dismissed, `No` passes,
	/// `Cancel` stops.
	async fn ask_to_save(&self) -> Result<bool> {
		if !self.is_changed() {
			return Ok(true);
		}
		let choice = self.prompts.exit.request().await?;
		tracing::debug!(window = %self.id, ?choice, "window.ask_to_save");
		match choice {
			ExitChoice::Yes => self.save().await,
			ExitChoice::No => Ok(true),
			ExitChoice::Cancel => Ok(false),
		}
	}

	async fn load(&self, path: PathBuf) {
		let superseded = {
			let mut state = self.state.lock();
			let superseded = self.saves.cancel();
			state.document.begin_load(path.clone());
			state.search.invalidate();
			state.match_count_visible = false;
			superseded
		};
		tracing::debug!(window = %self.id, path = %path.display(), superseded, "window.load_started");
		self.signal.notify();

		let result = self.store.read(&path).await;

		{
			let mut state = self.state.lock();
			if state.document.phase() != DocumentPhase::Loading || state.document.path() != Some(path.as_path()) {
				tracing::debug!(window = %self.id, path = %path.display(), "window.load_superseded");
				return;
			}
			match result {
				Ok(text) => {
					tracing::debug!(window = %self.id, path = %path.display(), len = text.len(), "window.load_finished");
					state.document.finish_load(text);
				}
				Err(e) => {
					tracing::warn!(window = %self.id, path = %path.display(), error = %e, "window.load_failed");
					state.document.fail_load(self.config.render_load_error(&path));
				}
			}
		}
		self.signal.notify();
	}

	/// Marks the document saved and launches the write, superseding any
	/// earlier save of this window.
	fn launch_save(&self, path: PathBuf) -> Result<TaskTicket> {
		let mut state = self.state.lock();
		if !state.document.is_initialized() {
			return Err(SessionError::NotReady);
		}
		state.document.mark_saved(path.clone());
		let text = state.document.text().to_string();

		let id = self.id;
		let store = Arc::clone(&self.store);
		let shared = Arc::clone(&self.state);
		let notifications = Arc::clone(&self.notifications);
		let signal = self.signal.clone();
		let ticket = self.saves.replace(TaskClass::Io, move |token| async move {
			let result = store.write(&path, &text).await;
			let notification = {
				let mut state = shared.lock();
				if token.is_cancelled() {
					tracing::debug!(window = %id, generation = token.generation(), "window.save_superseded");
					return;
				}
				match result {
					Ok(()) => {
						tracing::debug!(window = %id, path = %path.display(), "window.save_finished");
						WindowNotification::SaveSuccess(path)
					}
					Err(e) => {
						tracing::warn!(window = %id, path = %path.display(), error = %e, "window.save_failed");
						state.document.mark_unsaved();
						WindowNotification::SaveError(path)
					}
				}
			};
			notifications.send(notification);
			signal.notify();
		});
		drop(state);

		tracing::debug!(window = %self.id, generation = ticket.generation(), "window.save_launched");
		self.signal.notify();
		Ok(ticket)
	}
}

#[cfg(test)]
mod tests;
