use inkpad_worker::PromptError;
use thiserror::Error;

/// Failures surfaced by window and application operations.
///
/// User cancellation is not an error: cancelled flows return `Ok(false)`.
/// File I/O failures are recovered inside the window and reported through
/// notifications instead.
#[derive(Error, Debug)]
pub enum SessionError {
	/// The document has not finished initializing, so its text is read-only.
	#[error("document is not ready for editing")]
	NotReady,

	/// A dialog slot was used out of protocol.
	#[error(transparent)]
	Prompt(#[from] PromptError),

	/// Editor settings could not be parsed.
	#[error("invalid configuration: {0}")]
	Config(#[from] toml::de::Error),
}

/// Convenience type alias for Results with SessionError
pub type Result<T> = std::result::Result<T, SessionError>;
