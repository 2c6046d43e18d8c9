use std::sync::Arc;

use tokio::sync::watch;

/// Push-based change notification for observable state.
///
/// Every mutation of the observed state bumps a revision counter; observers
/// hold a [`ChangeWatcher`] and wake up whenever the revision moves. Bursts of
/// changes collapse into a single wakeup carrying the latest revision.
#[derive(Debug, Clone)]
pub struct ChangeSignal {
	tx: Arc<watch::Sender<u64>>,
}

impl Default for ChangeSignal {
	fn default() -> Self {
		Self::new()
	}
}

impl ChangeSignal {
	pub fn new() -> Self {
		let (tx, _rx) = watch::channel(0);
		Self { tx: Arc::new(tx) }
	}

	/// Records one state change and wakes every watcher.
	pub fn notify(&self) {
		self.tx.send_modify(|revision| *revision = revision.wrapping_add(1));
	}

	/// Creates a watcher that observes changes made after this call.
	pub fn watch(&self) -> ChangeWatcher {
		ChangeWatcher { rx: self.tx.subscribe() }
	}
}

/// Receiving side of a [`ChangeSignal`].
#[derive(Debug, Clone)]
pub struct ChangeWatcher {
	rx: watch::Receiver<u64>,
}

impl ChangeWatcher {
	/// Waits for the next change and returns the revision it observed.
	///
	/// Returns `None` once every [`ChangeSignal`] handle is dropped.
	pub async fn changed(&mut self) -> Option<u64> {
		self.rx.changed().await.ok()?;
		Some(*self.rx.borrow_and_update())
	}
}
