//! Test doubles shared by window and application tests.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::Mutex;
use tokio::sync::Semaphore;

use crate::notification::{NotificationSink, TrayNotification};
use crate::prompts::PromptKind;
use crate::store::FileStore;
use crate::window::{WindowContext, WindowHost, WindowId, WindowSession};
use crate::EditorConfig;

/// In-memory [`FileStore`] that records completed writes.
#[derive(Debug)]
pub(crate) struct MemoryStore {
	files: Mutex<HashMap<PathBuf, String>>,
	writes: Mutex<Vec<(PathBuf, String)>>,
	started: AtomicUsize,
	fail_reads: AtomicBool,
	fail_writes: AtomicBool,
	gated: AtomicBool,
	gate: Semaphore,
}

impl Default for MemoryStore {
	fn default() -> Self {
		Self {
			files: Mutex::default(),
			writes: Mutex::default(),
			started: AtomicUsize::new(0),
			fail_reads: AtomicBool::new(false),
			fail_writes: AtomicBool::new(false),
			gated: AtomicBool::new(false),
			gate: Semaphore::new(0),
		}
	}
}

impl MemoryStore {
	pub(crate) fn with_file(self, path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
		self.files.lock().insert(path.into(), text.into());
		self
	}

	pub(crate) fn fail_reads(&self) {
		self.fail_reads.store(true, Ordering::SeqCst);
	}

	pub(crate) fn fail_writes(&self) {
		self.fail_writes.store(true, Ordering::SeqCst);
	}

	/// Holds every write until [`Self::release_write`] is called.
	pub(crate) fn gate_writes(&self) {
		self.gated.store(true, Ordering::SeqCst);
	}

	pub(crate) fn release_write(&self) {
		self.gate.add_permits(1);
	}

	/// Writes entered, including ones still gated or later aborted.
	pub(crate) fn started_writes(&self) -> usize {
		self.started.load(Ordering::SeqCst)
	}

	pub(crate) fn writes(&self) -> Vec<(PathBuf, String)> {
		self.writes.lock().clone()
	}

	pub(crate) fn file(&self, path: &Path) -> Option<String> {
		self.files.lock().get(path).cloned()
	}
}

#[async_trait::async_trait]
impl FileStore for MemoryStore {
	async fn read(&self, path: &Path) -> io::Result<String> {
		tokio::task::yield_now().await;
		if self.fail_reads.load(Ordering::SeqCst) {
			return Err(io::Error::other("read refused"));
		}
		self.files
			.lock()
			.get(path)
			.cloned()
			.ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
	}

	async fn write(&self, path: &Path, text: &str) -> io::Result<()> {
		self.started.fetch_add(1, Ordering::SeqCst);
		if self.gated.load(Ordering::SeqCst) {
			self.gate.acquire().await.map_err(io::Error::other)?.forget();
		}
		if self.fail_writes.load(Ordering::SeqCst) {
			return Err(io::Error::from(io::ErrorKind::PermissionDenied));
		}
		self.files.lock().insert(path.to_path_buf(), text.to_string());
		self.writes.lock().push((path.to_path_buf(), text.to_string()));
		Ok(())
	}
}

/// [`WindowHost`] that records what windows asked of it.
#[derive(Debug, Default)]
pub(crate) struct RecordingHost {
	pub(crate) removed: Mutex<Vec<WindowId>>,
	pub(crate) siblings: AtomicUsize,
	pub(crate) forwarded: Mutex<Vec<TrayNotification>>,
}

impl WindowHost for RecordingHost {
	fn spawn_sibling(&self) {
		self.siblings.fetch_add(1, Ordering::SeqCst);
	}

	fn remove_window(&self, id: WindowId) {
		self.removed.lock().push(id);
	}

	fn forward_notification(&self, notification: TrayNotification) {
		self.forwarded.lock().push(notification);
	}
}

/// [`NotificationSink`] that keeps every delivered notification.
#[derive(Debug, Default)]
pub(crate) struct RecordingSink {
	pub(crate) delivered: Mutex<Vec<TrayNotification>>,
}

impl NotificationSink for RecordingSink {
	fn send_notification(&self, notification: TrayNotification) {
		self.delivered.lock().push(notification);
	}
}

/// One window wired to recording doubles.
pub(crate) struct Fixture {
	pub(crate) host: Arc<RecordingHost>,
	pub(crate) store: Arc<MemoryStore>,
	pub(crate) window: Arc<WindowSession>,
}

impl Fixture {
	pub(crate) fn new(path: Option<&str>, store: MemoryStore) -> Self {
		let host = Arc::new(RecordingHost::default());
		let store = Arc::new(store);
		let host_dyn: Arc<dyn WindowHost> = host.clone();
		let ctx = WindowContext {
			host: Arc::downgrade(&host_dyn),
			store: store.clone(),
			config: Arc::new(EditorConfig::default()),
		};
		let window = Arc::new(WindowSession::new(WindowId(1), path.map(PathBuf::from), ctx));
		Self { host, store, window }
	}

	/// Runs an empty window to `Ready`.
	pub(crate) async fn ready() -> Self {
		let fixture = Self::new(None, MemoryStore::default());
		fixture.window.run().await;
		fixture
	}

	/// Ready window whose text has been edited.
	pub(crate) async fn dirty(text: &str) -> Self {
		let fixture = Self::ready().await;
		fixture.window.edit_text(text).unwrap_or_else(|e| panic!("edit failed: {e}"));
		fixture
	}

	pub(crate) fn removed(&self) -> Vec<WindowId> {
		self.host.removed.lock().clone()
	}
}

/// Yields until `window` is waiting on `kind`.
pub(crate) async fn until_awaiting(window: &WindowSession, kind: PromptKind) {
	until(|| window.prompts().is_awaiting(kind)).await;
}

/// Yields until `cond` holds, failing the test if it never does.
pub(crate) async fn until(cond: impl Fn() -> bool) {
	for _ in 0..10_000 {
		if cond() {
			return;
		}
		tokio::task::yield_now().await;
	}
	panic!("condition not reached");
}
