use super::WindowSession;
use crate::Result;
use crate::search::{Case, find_all, find_all_spans, replace_all, replace_first};

/// How a search-and-replace flow ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceOutcome {
	/// The search dialog was dismissed or left empty.
	Cancelled,
	/// The query does not occur in the text.
	NoMatches,
	/// Matches were found but the replace dialog was dismissed.
	Declined,
	/// Text was replaced; `remaining` occurrences of the query are left.
	Replaced { remaining: usize },
}

impl WindowSession {
	/// Records `query` and the offsets of its occurrences. Returns the count.
	pub fn search(&self, query: &str) -> usize {
		let count = {
			let mut state = self.state.lock();
			let offsets = find_all(state.document.text(), query);
			state.search.query = query.to_string();
			state.search.match_offsets = offsets;
			state.search.match_offsets.len()
		};
		tracing::debug!(window = %self.id, count, "window.search");
		self.signal.notify();
		count
	}

	/// Replaces the first recorded match, or every occurrence when `all`.
	///
	/// Offsets are recomputed afterwards; returns how many occurrences of the
	/// query remain.
	pub fn replace(&self, replacement: &str, all: bool) -> Result<usize> {
		let remaining = {
			let mut state = self.state.lock();
			let query = state.search.query.clone();
			let text = state.document.text();
			let replaced = if all {
				replace_all(text, &query, replacement)
			} else {
				replace_first(text, &query, replacement, &state.search.match_offsets)
			};
			if replaced != state.document.text() {
				state.document.set_text(replaced)?;
				state.search.highlights.clear();
			}
			let offsets = find_all(state.document.text(), &query);
			state.search.match_offsets = offsets;
			state.search.match_offsets.len()
		};
		tracing::debug!(window = %self.id, all, remaining, "window.replace");
		self.signal.notify();
		Ok(remaining)
	}

	/// Highlights every occurrence of `query`. Returns the count.
	pub fn search_and_highlight(&self, query: &str, ignore_case: bool) -> usize {
		let count = {
			let mut state = self.state.lock();
			let spans = find_all_spans(state.document.text(), query, Case::ignore(ignore_case));
			state.search.query = query.to_string();
			state.search.highlights = spans;
			state.search.highlights.len()
		};
		tracing::debug!(window = %self.id, count, ignore_case, "window.highlight");
		self.signal.notify();
		count
	}

	pub fn clear_highlight(&self) {
		self.state.lock().search.highlights.clear();
		self.signal.notify();
	}

	/// Number of highlighted occurrences.
	pub fn match_count(&self) -> usize {
		self.state.lock().search.highlights.len()
	}

	pub fn show_match_count_dialog(&self) {
		self.state.lock().match_count_visible = true;
		self.signal.notify();
	}

	pub fn dismiss_match_count_dialog(&self) {
		self.state.lock().match_count_visible = false;
		self.signal.notify();
	}

	pub fn is_match_count_visible(&self) -> bool {
		self.state.lock().match_count_visible
	}

	/// Asks for a query, searches, and if anything matched asks for the
	/// replacement.
	pub async fn search_and_replace(&self) -> Result<ReplaceOutcome> {
		let Some(query) = self.prompts.search.request().await?.filter(|query| !query.is_empty()) else {
			return Ok(ReplaceOutcome::Cancelled);
		};
		if self.search(&query) == 0 {
			return Ok(ReplaceOutcome::NoMatches);
		}
		let Some(request) = self.prompts.replace.request().await? else {
			return Ok(ReplaceOutcome::Declined);
		};
		let remaining = self.replace(&request.replacement, request.all)?;
		Ok(ReplaceOutcome::Replaced { remaining })
	}

	/// Asks for a query, highlights it, and shows the match count.
	///
	/// Returns `None` when the dialog is dismissed.
	pub async fn request_highlight(&self) -> Result<Option<usize>> {
		let Some(request) = self.prompts.highlight.request().await? else {
			return Ok(None);
		};
		let count = self.search_and_highlight(&request.query, request.ignore_case);
		self.show_match_count_dialog();
		Ok(Some(count))
	}
}
