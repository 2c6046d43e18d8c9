use std::path::PathBuf;

use inkpad_worker::{ChangeSignal, PendingPrompt};

/// Answer to the ask-to-save dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitChoice {
	/// Save first, then continue.
	Yes,
	/// Discard changes and continue.
	No,
	/// Abort the operation.
	Cancel,
}

/// Answer to the replace dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceRequest {
	pub replacement: String,
	/// Replace every occurrence instead of only the first.
	pub all: bool,
}

/// Answer to the highlight dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightRequest {
	pub query: String,
	pub ignore_case: bool,
}

/// Which dialog a window is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptKind {
	Open,
	Save,
	Exit,
	Search,
	Replace,
	Highlight,
}

/// The dialog slots of one window.
///
/// Each slot holds at most one outstanding request. The presentation layer
/// renders [`WindowPrompts::active`] and answers the matching slot; `None`
/// answers mean the dialog was dismissed.
#[derive(Debug)]
pub struct WindowPrompts {
	pub open: PendingPrompt<Option<PathBuf>>,
	pub save: PendingPrompt<Option<PathBuf>>,
	pub exit: PendingPrompt<ExitChoice>,
	pub search: PendingPrompt<Option<String>>,
	pub replace: PendingPrompt<Option<ReplaceRequest>>,
	pub highlight: PendingPrompt<Option<HighlightRequest>>,
}

impl WindowPrompts {
	/// Creates idle slots that bump `signal` on every request and answer.
	pub fn new(signal: &ChangeSignal) -> Self {
		Self {
			open: PendingPrompt::with_signal("open", signal.clone()),
			save: PendingPrompt::with_signal("save", signal.clone()),
			exit: PendingPrompt::with_signal("exit", signal.clone()),
			search: PendingPrompt::with_signal("search", signal.clone()),
			replace: PendingPrompt::with_signal("replace", signal.clone()),
			highlight: PendingPrompt::with_signal("highlight", signal.clone()),
		}
	}

	/// The dialog to show, if any.
	///
	/// When several are awaiting, the one reached first in open, save, exit,
	/// search, replace, highlight order wins.
	pub fn active(&self) -> Option<PromptKind> {
		[
			(PromptKind::Open, self.open.is_awaiting()),
			(PromptKind::Save, self.save.is_awaiting()),
			(PromptKind::Exit, self.exit.is_awaiting()),
			(PromptKind::Search, self.search.is_awaiting()),
			(PromptKind::Replace, self.replace.is_awaiting()),
			(PromptKind::Highlight, self.highlight.is_awaiting()),
		]
		.into_iter()
		.find_map(|(kind, awaiting)| awaiting.then_some(kind))
	}

	pub fn is_awaiting(&self, kind: PromptKind) -> bool {
		match kind {
			PromptKind::Open => self.open.is_awaiting(),
			PromptKind::Save => self.save.is_awaiting(),
			PromptKind::Exit => self.exit.is_awaiting(),
			PromptKind::Search => self.search.is_awaiting(),
			PromptKind::Replace => self.replace.is_awaiting(),
			PromptKind::Highlight => self.highlight.is_awaiting(),
		}
	}
}
