//! Parsing of console input lines.

use std::path::PathBuf;

use inkpad_editor::{ExitChoice, HighlightRequest, PromptKind, ReplaceRequest};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
	#[error("unknown command '{0}', try 'help'")]
	Unknown(String),
	#[error("'{0}' needs an argument")]
	MissingArgument(&'static str),
	#[error("'{0}' is not a window number")]
	BadWindow(String),
	#[error("answer with {0}")]
	BadAnswer(&'static str),
}

/// A command typed while no dialog is pending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
	New,
	Open,
	Save,
	Close,
	Quit,
	Edit(String),
	Append(String),
	Find,
	Replace,
	Show,
	Windows,
	Focus(u64),
	Help,
}

pub const HELP: &str = "\
commands:
  new              open an empty window
  open             open a file in the focused window
  save             save the focused window
  close            close the focused window
  quit             close every window, newest first
  edit <text>      replace the text
  append <text>    add a line to the text
  find             highlight a query
  replace          search and replace
  show             print the focused window
  windows          list windows
  focus <n>        focus window n";

impl Command {
	pub fn parse(line: &str) -> Result<Self, InputError> {
		let line = line.trim_end_matches(['\r', '\n']);
		let (word, rest) = match line.trim_start().split_once(' ') {
			Some((word, rest)) => (word, Some(rest)),
			None => (line.trim(), None),
		};
		let arg = |name| rest.map(str::to_string).ok_or(InputError::MissingArgument(name));
		Ok(match word {
			"new" => Self::New,
			"open" => Self::Open,
			"save" => Self::Save,
			"close" => Self::Close,
			"quit" | "exit" => Self::Quit,
			"edit" => Self::Edit(arg("edit")?),
			"append" => Self::Append(arg("append")?),
			"find" => Self::Find,
			"replace" => Self::Replace,
			"show" => Self::Show,
			"windows" => Self::Windows,
			"focus" => {
				let raw = arg("focus")?;
				let id = raw.trim().parse().map_err(|_| InputError::BadWindow(raw.trim().to_string()))?;
				Self::Focus(id)
			}
			"help" | "?" => Self::Help,
			other => return Err(InputError::Unknown(other.to_string())),
		})
	}
}

/// Question printed for a pending dialog.
pub fn prompt_text(kind: PromptKind) -> &'static str {
	match kind {
		PromptKind::Open => "open file (blank to cancel):",
		PromptKind::Save => "save as (blank to cancel):",
		PromptKind::Exit => "save changes? [y]es / [n]o / [c]ancel:",
		PromptKind::Search => "search for (blank to cancel):",
		PromptKind::Replace => "replace with: 'first <text>' or 'all <text>' (blank to cancel):",
		PromptKind::Highlight => "find (prefix '-i ' to ignore case, blank to cancel):",
	}
}

/// A parsed dialog answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
	Path(Option<PathBuf>),
	Exit(ExitChoice),
	Query(Option<String>),
	Replace(Option<ReplaceRequest>),
	Highlight(Option<HighlightRequest>),
}

pub fn parse_answer(kind: PromptKind, line: &str) -> Result<Answer, InputError> {
	let line = line.trim_end_matches(['\r', '\n']);
	let blank = line.trim().is_empty();
	Ok(match kind {
		PromptKind::Open | PromptKind::Save => Answer::Path((!blank).then(|| PathBuf::from(line.trim()))),
		PromptKind::Exit => Answer::Exit(match line.trim().to_ascii_lowercase().as_str() {
			"y" | "yes" => ExitChoice::Yes,
			"n" | "no" => ExitChoice::No,
			"c" | "cancel" | "" => ExitChoice::Cancel,
			_ => return Err(InputError::BadAnswer("y, n or c")),
		}),
		PromptKind::Search => Answer::Query((!blank).then(|| line.to_string())),
		PromptKind::Replace => {
			if blank {
				return Ok(Answer::Replace(None));
			}
			let (all, replacement) = if let Some(rest) = line.strip_prefix("all") {
				(true, rest)
			} else if let Some(rest) = line.strip_prefix("first") {
				(false, rest)
			} else {
				return Err(InputError::BadAnswer("'first <text>' or 'all <text>'"));
			};
			if !(replacement.is_empty() || replacement.starts_with(' ')) {
				return Err(InputError::BadAnswer("'first <text>' or 'all <text>'"));
			}
			Answer::Replace(Some(ReplaceRequest {
				replacement: replacement.strip_prefix(' ').unwrap_or(replacement).to_string(),
				all,
			}))
		}
		PromptKind::Highlight => {
			if blank {
				return Ok(Answer::Highlight(None));
			}
			let (ignore_case, query) = match line.strip_prefix("-i ") {
				Some(query) => (true, query),
				None => (false, line),
			};
			Answer::Highlight(Some(HighlightRequest {
				query: query.to_string(),
				ignore_case,
			}))
		}
	})
}
