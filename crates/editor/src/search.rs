//! Literal text search and replace.
//!
//! All offsets are byte offsets into the text they were computed against.
//! Scanning restarts one character after each match start, so overlapping
//! occurrences are all reported.

use std::ops::Range;

use regex::RegexBuilder;

/// Case handling for [`find_all_spans`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Case {
	#[default]
	Sensitive,
	Insensitive,
}

impl Case {
	pub fn ignore(ignore_case: bool) -> Self {
		if ignore_case { Self::Insensitive } else { Self::Sensitive }
	}
}

/// Search results of one window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
	/// Last query passed to a search.
	pub query: String,
	/// Starts of `query` occurrences, used by replace.
	pub match_offsets: Vec<usize>,
	/// Spans shown by the find/highlight flow.
	pub highlights: Vec<Range<usize>>,
}

impl SearchState {
	/// Drops offsets and highlights that no longer describe the text.
	pub fn invalidate(&mut self) {
		self.match_offsets.clear();
		self.highlights.clear();
	}
}

/// Every start of `needle` in `haystack`, overlapping occurrences included.
///
/// `find_all("aaa", "aa") == [0, 1]`. An empty needle matches nothing.
pub fn find_all(haystack: &str, needle: &str) -> Vec<usize> {
	find_all_spans(haystack, needle, Case::Sensitive)
		.into_iter()
		.map(|span| span.start)
		.collect()
}

/// Spans of every occurrence of `needle`, valid against `haystack` as given.
///
/// Case-insensitive matches may differ in byte length from `needle`, so
/// callers that slice by span must use the returned end rather than
/// `start + needle.len()`.
pub fn find_all_spans(haystack: &str, needle: &str, case: Case) -> Vec<Range<usize>> {
	if needle.is_empty() {
		return Vec::new();
	}
	match case {
		Case::Sensitive => scan(haystack, |from| {
			haystack[from..]
				.find(needle)
				.map(|start| from + start..from + start + needle.len())
		}),
		Case::Insensitive => {
			let re = match RegexBuilder::new(&regex::escape(needle)).case_insensitive(true).build() {
				Ok(re) => re,
				Err(e) => {
					tracing::warn!(error = %e, needle_len = needle.len(), "search.pattern_rejected");
					return Vec::new();
				}
			};
			scan(haystack, |from| re.find_at(haystack, from).map(|m| m.range()))
		}
	}
}

fn scan(haystack: &str, mut next: impl FnMut(usize) -> Option<Range<usize>>) -> Vec<Range<usize>> {
	let mut spans = Vec::new();
	let mut from = 0;
	while from <= haystack.len() {
		let Some(span) = next(from) else {
			break;
		};
		let step = haystack[span.start..].chars().next().map_or(1, char::len_utf8);
		from = span.start + step;
		spans.push(span);
	}
	spans
}

/// Replaces every non-overlapping occurrence of `query`.
pub fn replace_all(text: &str, query: &str, replacement: &str) -> String {
	if query.is_empty() {
		return text.to_string();
	}
	text.replace(query, replacement)
}

/// Replaces the occurrence at `match_offsets[0]`.
///
/// Leaves the text unchanged when there are no offsets or when the first
/// offset no longer points at `query`.
pub fn replace_first(text: &str, query: &str, replacement: &str, match_offsets: &[usize]) -> String {
	let Some(&start) = match_offsets.first() else {
		return text.to_string();
	};
	let end = start + query.len();
	if query.is_empty() || text.get(start..end) != Some(query) {
		tracing::warn!(offset = start, "search.stale_offset");
		return text.to_string();
	}

	let mut out = String::with_capacity(text.len() - query.len() + replacement.len());
	out.push_str(&text[..start]);
	out.push_str(replacement);
	out.push_str(&text[end..]);
	out
}
