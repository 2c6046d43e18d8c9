use std::ops::Range;

/// One run of text for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
	Plain(&'a str),
	Highlighted(&'a str),
}

impl<'a> Segment<'a> {
	pub fn text(&self) -> &'a str {
		match self {
			Self::Plain(text) | Self::Highlighted(text) => text,
		}
	}

	pub fn is_highlighted(&self) -> bool {
		matches!(self, Self::Highlighted(_))
	}
}

/// Splits `text` into alternating plain and highlighted runs.
///
/// Spans are processed in start order. A span that is empty, out of range,
/// not on a character boundary, or overlapping an earlier span is skipped.
pub fn segments<'a>(text: &'a str, spans: &[Range<usize>]) -> Vec<Segment<'a>> {
	let mut sorted: Vec<&Range<usize>> = spans.iter().collect();
	sorted.sort_by_key(|span| (span.start, span.end));

	let mut out = Vec::with_capacity(sorted.len() * 2 + 1);
	let mut cursor = 0;
	for span in sorted {
		if span.start < cursor || span.is_empty() {
			continue;
		}
		let (Some(plain), Some(marked)) = (text.get(cursor..span.start), text.get(span.clone())) else {
			tracing::trace!(start = span.start, end = span.end, "highlight.span_skipped");
			continue;
		};
		if !plain.is_empty() {
			out.push(Segment::Plain(plain));
		}
		out.push(Segment::Highlighted(marked));
		cursor = span.end;
	}
	if cursor < text.len() {
		out.push(Segment::Plain(&text[cursor..]));
	}
	out
}
