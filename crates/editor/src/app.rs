use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use inkpad_worker::{ChangeSignal, ChangeWatcher, TaskClass};
use parking_lot::Mutex;
use tokio::task::JoinHandle;

use crate::config::EditorConfig;
use crate::notification::{NotificationSink, TrayNotification};
use crate::store::FileStore;
use crate::window::{WindowContext, WindowHost, WindowId, WindowSession};
use crate::Result;

/// Tray icon settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraySettings {
	pub tray_enabled: bool,
}

impl Default for TraySettings {
	fn default() -> Self {
		Self { tray_enabled: true }
	}
}

/// The set of open windows, in open order.
///
/// Windows hold a weak reference back to the session, so dropping the
/// session detaches them.
pub struct ApplicationSession {
	me: Weak<Self>,
	windows: Mutex<Vec<Arc<WindowSession>>>,
	tray: TraySettings,
	sink: Arc<dyn NotificationSink>,
	store: Arc<dyn FileStore>,
	config: Arc<EditorConfig>,
	next_id: AtomicU64,
	signal: ChangeSignal,
}

impl std::fmt::Debug for ApplicationSession {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ApplicationSession")
			.field("windows", &self.windows.lock().iter().map(|window| window.id()).collect::<Vec<_>>())
			.field("tray", &self.tray)
			.finish_non_exhaustive()
	}
}

impl ApplicationSession {
	pub fn new(config: EditorConfig, store: Arc<dyn FileStore>, sink: Arc<dyn NotificationSink>) -> Arc<Self> {
		let tray = TraySettings {
			tray_enabled: config.tray_enabled,
		};
		Arc::new_cyclic(|me| Self {
			me: me.clone(),
			windows: Mutex::new(Vec::new()),
			tray,
			sink,
			store,
			config: Arc::new(config),
			next_id: AtomicU64::new(1),
			signal: ChangeSignal::new(),
		})
	}

	/// Appends an empty window. The caller drives it with [`WindowSession::run`].
	pub fn new_window(&self) -> Arc<WindowSession> {
		self.add_window(None)
	}

	/// Appends a window for `path`; its [`WindowSession::run`] loads the file.
	pub fn open_window(&self, path: impl Into<PathBuf>) -> Arc<WindowSession> {
		self.add_window(Some(path.into()))
	}

	fn add_window(&self, path: Option<PathBuf>) -> Arc<WindowSession> {
		let id = WindowId(self.next_id.fetch_add(1, Ordering::Relaxed));
		let host: Weak<dyn WindowHost> = self.me.clone();
		let ctx = WindowContext {
			host,
			store: Arc::clone(&self.store),
			config: Arc::clone(&self.config),
		};
		let window = Arc::new(WindowSession::new(id, path, ctx));
		self.forward_notifications(&window);
		self.relay_changes(&window);

		let count = {
			let mut windows = self.windows.lock();
			windows.push(Arc::clone(&window));
			windows.len()
		};
		tracing::debug!(window = %id, count, "app.window_added");
		self.signal.notify();
		window
	}

	/// Forwards every save outcome of `window` to the tray.
	///
	/// Forwarding outlives the window's removal: a save still running when the
	/// window closes reports once it finishes. It stops when the window and
	/// its save are gone, or when the session is dropped.
	pub fn forward_notifications(&self, window: &Arc<WindowSession>) -> JoinHandle<()> {
		let id = window.id();
		let mut rx = window.notifications();
		let app = self.me.clone();
		inkpad_worker::spawn(TaskClass::Background, async move {
			while let Some(notification) = rx.next().await {
				let Some(app) = app.upgrade() else {
					break;
				};
				app.send_notification(notification.to_tray());
			}
			tracing::trace!(window = %id, "app.forwarding_stopped");
		})
	}

	/// Bumps [`Self::changes`] whenever `window` changes.
	fn relay_changes(&self, window: &WindowSession) {
		let id = window.id();
		let mut changes = window.changes();
		let signal = self.signal.clone();
		inkpad_worker::spawn(TaskClass::Background, async move {
			while changes.changed().await.is_some() {
				signal.notify();
			}
			tracing::trace!(window = %id, "app.relay_stopped");
		});
	}

	/// Open windows in open order.
	pub fn windows(&self) -> Vec<Arc<WindowSession>> {
		self.windows.lock().clone()
	}

	pub fn window(&self, id: WindowId) -> Option<Arc<WindowSession>> {
		self.windows.lock().iter().find(|window| window.id() == id).cloned()
	}

	pub fn window_count(&self) -> usize {
		self.windows.lock().len()
	}

	pub fn tray_settings(&self) -> TraySettings {
		self.tray
	}

	/// Whether the tray icon should be shown.
	pub fn tray_visible(&self) -> bool {
		self.tray.tray_enabled && self.window_count() > 0
	}

	pub fn config(&self) -> &EditorConfig {
		&self.config
	}

	/// Fires when windows are added or removed, and when any open window
	/// changes.
	pub fn changes(&self) -> ChangeWatcher {
		self.signal.watch()
	}

	/// Closes windows newest first, stopping at the first one that refuses.
	///
	/// Returns `true` when every window closed.
	pub async fn exit(&self) -> Result<bool> {
		let windows = self.windows();
		for window in windows.iter().rev() {
			if !window.exit().await? {
				tracing::debug!(window = %window.id(), remaining = self.window_count(), "app.exit_cancelled");
				return Ok(false);
			}
		}
		tracing::debug!("app.exit_complete");
		Ok(true)
	}

	pub fn send_notification(&self, notification: TrayNotification) {
		self.sink.send_notification(notification);
	}
}

impl WindowHost for ApplicationSession {
	fn spawn_sibling(&self) {
		let window = self.new_window();
		inkpad_worker::spawn(TaskClass::Interactive, async move { window.run().await });
	}

	fn remove_window(&self, id: WindowId) {
		let removed = {
			let mut windows = self.windows.lock();
			let before = windows.len();
			windows.retain(|window| window.id() != id);
			before != windows.len()
		};
		if removed {
			tracing::debug!(window = %id, "app.window_removed");
			self.signal.notify();
		}
	}

	fn forward_notification(&self, notification: TrayNotification) {
		self.send_notification(notification);
	}
}
