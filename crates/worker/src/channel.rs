use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

/// Fire-and-forget event channel.
///
/// `send` never blocks and never fails the producer: events sent while nobody
/// is subscribed are dropped, and each subscriber buffers at most one event.
/// A subscriber that falls behind skips straight to the newest event.
#[derive(Debug)]
pub struct NotificationChannel<T> {
	tx: broadcast::Sender<T>,
}

impl<T: Clone> Default for NotificationChannel<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T: Clone> NotificationChannel<T> {
	pub fn new() -> Self {
		let (tx, _rx) = broadcast::channel(1);
		Self { tx }
	}

	/// Publishes `event`. Returns whether at least one subscriber was attached.
	pub fn send(&self, event: T) -> bool {
		match self.tx.send(event) {
			Ok(receivers) => {
				tracing::trace!(receivers, "notification.sent");
				true
			}
			Err(_) => {
				tracing::trace!("notification.dropped_without_subscriber");
				false
			}
		}
	}

	/// Returns a lazy sequence of every event sent from now on.
	pub fn subscribe(&self) -> Notifications<T> {
		Notifications { rx: self.tx.subscribe() }
	}
}

/// Subscription to a [`NotificationChannel`].
#[derive(Debug)]
pub struct Notifications<T> {
	rx: broadcast::Receiver<T>,
}

impl<T: Clone> Notifications<T> {
	/// Waits for the next event. Returns `None` once the channel is dropped.
	pub async fn next(&mut self) -> Option<T> {
		loop {
			match self.rx.recv().await {
				Ok(event) => return Some(event),
				Err(RecvError::Lagged(skipped)) => {
					tracing::debug!(skipped, "notification.lagged");
				}
				Err(RecvError::Closed) => return None,
			}
		}
	}
}
