//! Runtime primitives shared by the editor core.
//!
//! * [`PendingPrompt`] - single-slot rendezvous a task suspends on until the
//!   presentation layer answers.
//! * [`NotificationChannel`] - fire-and-forget event channel that never blocks
//!   the producer.
//! * [`ReplaceableTask`] - owned task handle with cancel-and-replace semantics.
//! * [`ChangeSignal`] - wakes observers when watched state moves.
//! * [`spawn`] - classified task spawning.

mod channel;
mod class;
mod prompt;
mod signal;
mod spawn;
mod task;
mod token;

pub use channel::{NotificationChannel, Notifications};
pub use class::TaskClass;
pub use prompt::{PendingPrompt, PromptError};
pub use signal::{ChangeSignal, ChangeWatcher};
pub use spawn::spawn;
pub use task::{ReplaceableTask, TaskTicket};
pub use token::GenerationToken;
