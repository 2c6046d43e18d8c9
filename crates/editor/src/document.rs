//! Document - the text content and file association of one window.
//!
//! A [`Document`] moves through `Uninitialized -> Loading -> Ready` when it is
//! backed by a file, or straight to `Ready` when it starts empty. Text can only
//! be replaced once the document is `Ready`, and every such replacement marks
//! it changed. Load and save bookkeeping go through crate-internal methods
//! that adjust the changed flag explicitly.

use std::path::{Path, PathBuf};

use crate::{Result, SessionError};

/// Lifecycle phase of a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentPhase {
	/// Nothing has been loaded yet.
	#[default]
	Uninitialized,
	/// A file read is in flight.
	Loading,
	/// Content is available and editable.
	Ready,
}

/// Text content of one window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
	path: Option<PathBuf>,
	text: String,
	changed: bool,
	phase: DocumentPhase,
}

impl Document {
	/// Creates an uninitialized document, optionally associated with `path`.
	pub fn new(path: Option<PathBuf>) -> Self {
		Self {
			path,
			..Self::default()
		}
	}

	pub fn path(&self) -> Option<&Path> {
		self.path.as_deref()
	}

	pub fn text(&self) -> &str {
		&self.text
	}

	/// Whether the document has edits not yet confirmed persisted.
	pub fn is_changed(&self) -> bool {
		self.changed
	}

	pub fn phase(&self) -> DocumentPhase {
		self.phase
	}

	pub fn is_initialized(&self) -> bool {
		self.phase == DocumentPhase::Ready
	}

	/// Replaces the text and marks the document changed.
	pub fn set_text(&mut self, text: impl Into<String>) -> Result<()> {
		if !self.is_initialized() {
			return Err(SessionError::NotReady);
		}
		self.text = text.into();
		self.changed = true;
		Ok(())
	}

	pub(crate) fn init_empty(&mut self) {
		self.text.clear();
		self.changed = false;
		self.phase = DocumentPhase::Ready;
	}

	pub(crate) fn begin_load(&mut self, path: PathBuf) {
		self.path = Some(path);
		self.changed = false;
		self.phase = DocumentPhase::Loading;
	}

	pub(crate) fn finish_load(&mut self, text: String) {
		self.text = text;
		self.changed = false;
		self.phase = DocumentPhase::Ready;
	}

	/// Becomes an editable placeholder that is no longer tied to the file.
	pub(crate) fn fail_load(&mut self, message: String) {
		self.path = None;
		self.text = message;
		self.changed = false;
		self.phase = DocumentPhase::Ready;
	}

	pub(crate) fn mark_saved(&mut self, path: PathBuf) {
		self.path = Some(path);
		self.changed = false;
	}

	pub(crate) fn mark_unsaved(&mut self) {
		self.changed = true;
	}
}
