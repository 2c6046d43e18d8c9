use std::sync::Arc;

use inkpad_editor::highlight;
use inkpad_editor::{ApplicationSession, PromptKind, ReplaceOutcome, WindowId, WindowSession};
use inkpad_worker::TaskClass;

use crate::command::{Answer, Command, HELP, InputError, parse_answer, prompt_text};

/// Whether the input loop keeps reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
	Continue,
	Stop,
}

/// Routes input lines to the focused window and prints pending dialogs.
pub struct Console {
	app: Arc<ApplicationSession>,
	focus: Option<WindowId>,
	shown_prompt: Option<(WindowId, PromptKind)>,
}

impl Console {
	pub fn new(app: Arc<ApplicationSession>) -> Self {
		Self {
			app,
			focus: None,
			shown_prompt: None,
		}
	}

	/// The focused window, falling back to the newest one.
	pub fn focused(&self) -> Option<Arc<WindowSession>> {
		self.focus
			.and_then(|id| self.app.window(id))
			.or_else(|| self.app.windows().last().cloned())
	}

	/// The window input answers go to: the focused one if it is asking,
	/// otherwise the newest window that is.
	pub fn prompting(&self) -> Option<(Arc<WindowSession>, PromptKind)> {
		self.focused()
			.into_iter()
			.chain(self.app.windows().into_iter().rev())
			.find_map(|window| window.prompts().active().map(|kind| (window, kind)))
	}

	/// Opens an empty window, starts it, and focuses it.
	pub fn open_empty(&mut self) {
		let window = self.app.new_window();
		self.focus = Some(window.id());
		inkpad_worker::spawn(TaskClass::Interactive, async move { window.run().await });
	}

	/// Handles one input line: a dialog answer if any window is waiting on
	/// one, a command for the focused window otherwise.
	pub fn handle_line(&mut self, line: &str) -> Flow {
		if let Some((window, kind)) = self.prompting() {
			if let Err(e) = answer(&window, kind, line) {
				println!("{e}");
				println!("{}", prompt_text(kind));
			}
			return Flow::Continue;
		}

		if line.trim().is_empty() {
			return Flow::Continue;
		}
		match Command::parse(line) {
			Ok(command) => self.run(command, self.focused()),
			Err(e) => {
				println!("{e}");
				Flow::Continue
			}
		}
	}

	fn run(&mut self, command: Command, window: Option<Arc<WindowSession>>) -> Flow {
		tracing::debug!(?command, "console.command");
		let window = match command {
			Command::New => {
				self.open_empty();
				return Flow::Continue;
			}
			Command::Help => {
				println!("{HELP}");
				return Flow::Continue;
			}
			Command::Windows => {
				self.list_windows();
				return Flow::Continue;
			}
			Command::Focus(n) => {
				match self.app.window(WindowId(n)) {
					Some(window) => {
						self.focus = Some(window.id());
						self.shown_prompt = None;
						println!("{}", window.title());
					}
					None => println!("no window {}", WindowId(n)),
				}
				return Flow::Continue;
			}
			Command::Quit => {
				if self.app.window_count() == 0 {
					return Flow::Stop;
				}
				let app = Arc::clone(&self.app);
				inkpad_worker::spawn(TaskClass::Interactive, async move {
					match app.exit().await {
						Ok(true) => {}
						Ok(false) => println!("quit cancelled"),
						Err(e) => tracing::warn!(error = %e, "console.quit_failed"),
					}
				});
				return Flow::Continue;
			}
			_ => match window {
				Some(window) => window,
				None => {
					println!("no window open, try 'new'");
					return Flow::Continue;
				}
			},
		};

		match command {
			Command::Open => launch(window, "open", |window| async move { window.open().await.map(|_| ()) }),
			Command::Save => launch(window, "save", |window| async move {
				if !window.save().await? {
					println!("save cancelled");
				}
				Ok(())
			}),
			Command::Close => launch(window, "close", |window| async move { window.exit().await.map(|_| ()) }),
			Command::Find => launch(window, "find", |window| async move { window.request_highlight().await.map(|_| ()) }),
			Command::Replace => launch(window, "replace", |window| async move {
				match window.search_and_replace().await? {
					ReplaceOutcome::NoMatches => println!("no matches"),
					ReplaceOutcome::Replaced { remaining } => println!("replaced, {remaining} left"),
					ReplaceOutcome::Cancelled | ReplaceOutcome::Declined => {}
				}
				Ok(())
			}),
			Command::Edit(text) => report(window.edit_text(text)),
			Command::Append(line) => {
				let mut text = window.text();
				if !text.is_empty() {
					text.push('\n');
				}
				text.push_str(&line);
				report(window.edit_text(text));
			}
			Command::Show => show(&window),
			Command::New | Command::Help | Command::Windows | Command::Focus(_) | Command::Quit => {}
		}
		Flow::Continue
	}

	/// Prints a pending dialog once, moving focus to the window that asks,
	/// and the focused window's match count when it is shown.
	pub fn render(&mut self) {
		let prompting = self.prompting();
		let shown = prompting.as_ref().map(|(window, kind)| (window.id(), *kind));
		if shown != self.shown_prompt {
			self.shown_prompt = shown;
			if let Some((window, kind)) = prompting {
				if self.focus != Some(window.id()) {
					tracing::debug!(window = %window.id(), ?kind, "console.focus_follows_prompt");
					self.focus = Some(window.id());
				}
				println!("{} {}", window.title(), prompt_text(kind));
			}
		}

		let Some(window) = self.focused() else {
			return;
		};
		let snapshot = window.snapshot();
		if snapshot.match_count_visible {
			println!("{} matches", snapshot.search.highlights.len());
			window.dismiss_match_count_dialog();
		}
	}

	pub fn focus_id(&self) -> Option<WindowId> {
		self.focused().map(|window| window.id())
	}

	fn list_windows(&self) {
		let focus = self.focus_id();
		for window in self.app.windows() {
			let mark = if Some(window.id()) == focus { ">" } else { " " };
			println!("{mark} {} {}", window.id().0, window.title());
		}
	}
}

fn answer(window: &WindowSession, kind: PromptKind, line: &str) -> Result<(), InputError> {
	let prompts = window.prompts();
	let result = match parse_answer(kind, line)? {
		Answer::Path(path) if kind == PromptKind::Open => prompts.open.answer(path),
		Answer::Path(path) => prompts.save.answer(path),
		Answer::Exit(choice) => prompts.exit.answer(choice),
		Answer::Query(query) => prompts.search.answer(query),
		Answer::Replace(request) => prompts.replace.answer(request),
		Answer::Highlight(request) => prompts.highlight.answer(request),
	};
	if let Err(e) = result {
		tracing::warn!(error = %e, "console.answer_dropped");
	}
	Ok(())
}

fn launch<F, Fut>(window: Arc<WindowSession>, op: &'static str, f: F)
where
	F: FnOnce(Arc<WindowSession>) -> Fut,
	Fut: Future<Output = inkpad_editor::Result<()>> + Send + 'static,
{
	let id = window.id();
	let fut = f(window);
	inkpad_worker::spawn(TaskClass::Interactive, async move {
		if let Err(e) = fut.await {
			tracing::warn!(window = %id, op, error = %e, "console.operation_failed");
			println!("{op} failed: {e}");
		}
	});
}

fn report(result: inkpad_editor::Result<()>) {
	if let Err(e) = result {
		println!("{e}");
	}
}

fn show(window: &WindowSession) {
	let snapshot = window.snapshot();
	println!("--- {} ---", snapshot.title);
	println!("{}", render_text(&snapshot.text, &snapshot.search.highlights));
}

/// Text with highlighted runs wrapped in brackets.
fn render_text(text: &str, spans: &[std::ops::Range<usize>]) -> String {
	highlight::segments(text, spans)
		.into_iter()
		.map(|segment| {
			if segment.is_highlighted() {
				format!("[{}]", segment.text())
			} else {
				segment.text().to_string()
			}
		})
		.collect()
}
