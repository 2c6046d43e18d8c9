#![cfg_attr(test, allow(unused_crate_dependencies))]
//! Editor core: per-window interaction state machines and the application
//! session that owns them.
//!
//! # Main Types
//!
//! - [`WindowSession`] - one editor window: document lifecycle, dirty
//!   tracking, dialog orchestration, and the save/open/exit protocols
//! - [`ApplicationSession`] - the ordered window collection, tray settings,
//!   and cross-window exit sequencing
//! - [`FileStore`] - async read/write boundary for document contents
//!
//! # Architecture
//!
//! ```text
//! ApplicationSession
//! ├── windows: Vec<Arc<WindowSession>>        // open order
//! ├── sink: Arc<dyn NotificationSink>         // tray delivery
//! └── WindowSession
//!     ├── Document + SearchState              // behind one state lock
//!     ├── WindowPrompts                       // six PendingPrompt slots
//!     ├── NotificationChannel<WindowNotification>
//!     └── ReplaceableTask                     // in-flight save
//! ```
//!
//! Window operations that need an answer from the user suspend on a
//! [`PendingPrompt`](inkpad_worker::PendingPrompt). The presentation layer
//! watches [`WindowSession::changes`], renders whatever
//! [`WindowPrompts::active`] reports, and resumes the operation by answering
//! that prompt.

/// Application-wide window collection and exit sequencing.
pub mod app;
/// Editor settings.
pub mod config;
pub mod document;
mod error;
/// Splits text into plain and highlighted runs for rendering.
pub mod highlight;
/// Save outcome notifications and tray delivery.
pub mod notification;
/// Dialog slots owned by each window.
pub mod prompts;
/// Pure text search and replace.
pub mod search;
/// File contents boundary.
pub mod store;
#[cfg(test)]
mod testing;
/// Per-window state machine.
pub mod window;

pub use app::{ApplicationSession, TraySettings};
pub use config::EditorConfig;
pub use document::{Document, DocumentPhase};
pub use error::{Result, SessionError};
pub use notification::{Level, NotificationSink, TracingSink, TrayNotification, WindowNotification};
pub use prompts::{ExitChoice, HighlightRequest, PromptKind, ReplaceRequest, WindowPrompts};
pub use search::{Case, SearchState};
pub use store::{FileStore, FsStore};
pub use window::{ReplaceOutcome, WindowContext, WindowHost, WindowId, WindowSession, WindowSnapshot};
