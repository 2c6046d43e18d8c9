//! Single-slot rendezvous between a suspended task and the presentation layer.
//!
//! A window operation calls [`PendingPrompt::request`] and suspends. The
//! presentation layer sees [`PendingPrompt::is_awaiting`] flip, renders the
//! matching dialog, and resumes the operation with [`PendingPrompt::answer`].
//!
//! # Invariants
//!
//! * At most one outstanding request per prompt.
//! * Every successful `answer` resumes exactly one `request`.
//! * Dropping a suspended `request` future returns the prompt to idle.

use std::fmt;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::oneshot;

use crate::ChangeSignal;

/// Protocol misuse of a [`PendingPrompt`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptError {
	/// `request` was called while another request is outstanding.
	#[error("prompt '{0}' is already awaiting an answer")]
	AlreadyAwaiting(&'static str),
	/// `answer` was called with no request outstanding.
	#[error("prompt '{0}' is not awaiting an answer")]
	NotAwaiting(&'static str),
	/// The other side went away before the rendezvous completed.
	#[error("prompt '{0}' was abandoned")]
	Abandoned(&'static str),
}

enum Slot<T> {
	Idle,
	Awaiting(oneshot::Sender<T>),
}

/// Awaitable choice supplied exactly once by an external actor.
pub struct PendingPrompt<T> {
	name: &'static str,
	slot: Mutex<Slot<T>>,
	signal: Option<ChangeSignal>,
}

impl<T> fmt::Debug for PendingPrompt<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PendingPrompt")
			.field("name", &self.name)
			.field("awaiting", &self.is_awaiting())
			.finish()
	}
}

impl<T> PendingPrompt<T> {
	/// Creates an idle prompt.
	pub fn new(name: &'static str) -> Self {
		Self {
			name,
			slot: Mutex::new(Slot::Idle),
			signal: None,
		}
	}

	/// Creates an idle prompt that bumps `signal` on every state transition.
	pub fn with_signal(name: &'static str, signal: ChangeSignal) -> Self {
		Self {
			name,
			slot: Mutex::new(Slot::Idle),
			signal: Some(signal),
		}
	}

	pub fn name(&self) -> &'static str {
		self.name
	}

	/// Returns true while a request is outstanding.
	pub fn is_awaiting(&self) -> bool {
		matches!(*self.slot.lock(), Slot::Awaiting(_))
	}

	/// Suspends until [`Self::answer`] supplies a value.
	pub async fn request(&self) -> Result<T, PromptError> {
		let rx = {
			let mut slot = self.slot.lock();
			if matches!(*slot, Slot::Awaiting(_)) {
				tracing::warn!(prompt = self.name, "prompt.request while already awaiting");
				return Err(PromptError::AlreadyAwaiting(self.name));
			}
			let (tx, rx) = oneshot::channel();
			*slot = Slot::Awaiting(tx);
			rx
		};
		tracing::debug!(prompt = self.name, "prompt.requested");
		self.changed();

		let mut waiter = Waiter { prompt: self, rx: Some(rx) };
		let Some(rx) = waiter.rx.as_mut() else {
			return Err(PromptError::Abandoned(self.name));
		};
		rx.await.map_err(|_| PromptError::Abandoned(self.name))
	}

	/// Resumes the outstanding request with `value`.
	pub fn answer(&self, value: T) -> Result<(), PromptError> {
		let tx = {
			let mut slot = self.slot.lock();
			match std::mem::replace(&mut *slot, Slot::Idle) {
				Slot::Awaiting(tx) => tx,
				Slot::Idle => {
					tracing::warn!(prompt = self.name, "prompt.answer while idle");
					return Err(PromptError::NotAwaiting(self.name));
				}
			}
		};
		tracing::debug!(prompt = self.name, "prompt.answered");
		self.changed();
		tx.send(value).map_err(|_| PromptError::Abandoned(self.name))
	}

	fn changed(&self) {
		if let Some(signal) = &self.signal {
			signal.notify();
		}
	}
}

/// Resets the slot when a suspended request is dropped before its answer.
struct Waiter<'a, T> {
	prompt: &'a PendingPrompt<T>,
	rx: Option<oneshot::Receiver<T>>,
}

impl<T> Drop for Waiter<'_, T> {
	fn drop(&mut self) {
		drop(self.rx.take());
		let reset = {
			let mut slot = self.prompt.slot.lock();
			// Only our own sender can be closed here; a newer request keeps its receiver alive.
			if let Slot::Awaiting(tx) = &*slot
				&& tx.is_closed()
			{
				*slot = Slot::Idle;
				true
			} else {
				false
			}
		};
		if reset {
			tracing::debug!(prompt = self.prompt.name, "prompt.abandoned");
			self.prompt.changed();
		}
	}
}
