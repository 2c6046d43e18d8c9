/// What a spawned task is doing, recorded in its spawn log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskClass {
	/// Window operations driven directly by user input (open, save, exit flows).
	Interactive,
	/// File reads and writes issued on behalf of a window.
	Io,
	/// Long-lived plumbing such as notification forwarding.
	Background,
}

impl TaskClass {
	pub(crate) const fn as_str(self) -> &'static str {
		match self {
			Self::Interactive => "interactive",
			Self::Io => "io",
			Self::Background => "background",
		}
	}
}
