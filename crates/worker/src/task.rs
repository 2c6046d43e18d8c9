use std::future::Future;

use parking_lot::Mutex;
use tokio::task::{AbortHandle, JoinHandle};

use crate::token::GenerationClock;
use crate::{GenerationToken, TaskClass, spawn};

struct Running {
	token: GenerationToken,
	abort: AbortHandle,
}

/// Owned handle to at most one live task, with cancel-and-replace semantics.
///
/// Launching a new generation cancels the token of the previous one and aborts
/// it at its next suspension point. Aborting is best-effort: a superseded task
/// may still be running blocking work, so it must check its token before
/// publishing any outcome.
pub struct ReplaceableTask {
	name: &'static str,
	clock: GenerationClock,
	current: Mutex<Option<Running>>,
}

impl std::fmt::Debug for ReplaceableTask {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ReplaceableTask")
			.field("name", &self.name)
			.field("generation", &self.generation())
			.finish()
	}
}

impl ReplaceableTask {
	pub fn new(name: &'static str) -> Self {
		Self {
			name,
			clock: GenerationClock::new(),
			current: Mutex::new(None),
		}
	}

	/// Cancels the current generation and spawns `make(token)` as the next one.
	pub fn replace<F, Fut>(&self, class: TaskClass, make: F) -> TaskTicket
	where
		F: FnOnce(GenerationToken) -> Fut,
		Fut: Future<Output = ()> + Send + 'static,
	{
		let token = GenerationToken::new(self.clock.next());
		let generation = token.generation();
		let fut = make(token.clone());

		let mut current = self.current.lock();
		if let Some(previous) = current.take() {
			tracing::debug!(task = self.name, superseded = previous.token.generation(), generation, "task.superseded");
			previous.token.cancel();
			previous.abort.abort();
		}
		let handle = spawn(class, fut);
		*current = Some(Running {
			token,
			abort: handle.abort_handle(),
		});
		tracing::trace!(task = self.name, generation, "task.launched");

		TaskTicket { generation, handle }
	}

	/// Cancels the current generation. Returns whether it was still running.
	pub fn cancel(&self) -> bool {
		let Some(previous) = self.current.lock().take() else {
			return false;
		};
		let live = !previous.abort.is_finished();
		tracing::debug!(task = self.name, generation = previous.token.generation(), live, "task.cancelled");
		previous.token.cancel();
		previous.abort.abort();
		live
	}

	/// Generation of the most recently launched task.
	pub fn generation(&self) -> Option<u64> {
		self.current.lock().as_ref().map(|running| running.token.generation())
	}

	/// Returns true while the most recently launched task has not finished.
	pub fn is_running(&self) -> bool {
		self.current.lock().as_ref().is_some_and(|running| !running.abort.is_finished())
	}
}

/// Join side of one launched generation.
#[derive(Debug)]
pub struct TaskTicket {
	generation: u64,
	handle: JoinHandle<()>,
}

impl TaskTicket {
	pub fn generation(&self) -> u64 {
		self.generation
	}

	/// Waits for the task. Returns `true` if it ran to completion, `false` if it
	/// was aborted or panicked.
	pub async fn join(self) -> bool {
		match self.handle.await {
			Ok(()) => true,
			Err(err) if err.is_cancelled() => {
				tracing::trace!(generation = self.generation, "task.join_cancelled");
				false
			}
			Err(err) => {
				tracing::error!(generation = self.generation, error = %err, "task.join_panicked");
				false
			}
		}
	}
}
