use std::sync::atomic::{AtomicU64, Ordering};

use tokio_util::sync::CancellationToken;

/// Hands out increasing generation numbers, starting at 1.
#[derive(Debug, Default)]
pub(crate) struct GenerationClock(AtomicU64);

impl GenerationClock {
	pub(crate) fn new() -> Self {
		Self::default()
	}

	pub(crate) fn next(&self) -> u64 {
		self.0.fetch_add(1, Ordering::AcqRel).wrapping_add(1)
	}
}

/// Cancellation flag of one launched generation.
///
/// The launching [`crate::ReplaceableTask`] keeps one copy and the task body
/// gets another. Once a newer generation starts, the body must see
/// [`Self::is_cancelled`] and drop its result.
#[derive(Debug, Clone)]
pub struct GenerationToken {
	generation: u64,
	cancel: CancellationToken,
}

impl GenerationToken {
	pub fn new(generation: u64) -> Self {
		Self {
			generation,
			cancel: CancellationToken::new(),
		}
	}

	pub const fn generation(&self) -> u64 {
		self.generation
	}

	pub fn is_cancelled(&self) -> bool {
		self.cancel.is_cancelled()
	}

	/// Marks this generation stale for every copy of the token.
	pub fn cancel(&self) {
		self.cancel.cancel();
	}
}
