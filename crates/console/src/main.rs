//! Inkpad terminal frontend.
//!
//! Reads commands from stdin and drives the editor core. When a window opens
//! a dialog, its question is printed, focus moves to that window, and the
//! next input line is taken as the answer.

use std::sync::Arc;

use inkpad_editor::{ApplicationSession, EditorConfig, FsStore};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

mod command;
mod console;
mod sink;

use console::{Console, Flow};
use sink::ConsoleSink;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let config = EditorConfig::from_env()?;

	let subscriber = tracing_subscriber::fmt()
		.with_max_level(config.max_level())
		.with_writer(std::io::stderr)
		.finish();
	tracing::subscriber::set_global_default(subscriber)?;

	let app = ApplicationSession::new(config, Arc::new(FsStore), Arc::new(ConsoleSink));
	info!(
		title = %app.config().app_title,
		tray = app.tray_settings().tray_enabled,
		"Starting inkpad"
	);
	let mut app_changes = app.changes();
	let mut console = Console::new(Arc::clone(&app));
	console.open_empty();
	println!("type 'help' for commands");

	let mut lines = BufReader::new(tokio::io::stdin()).lines();

	loop {
		console.render();
		tokio::select! {
			line = lines.next_line() => {
				let Some(line) = line? else {
					info!("stdin closed");
					break;
				};
				if console.handle_line(&line) == Flow::Stop {
					break;
				}
			}
			_ = app_changes.changed() => {
				if app.window_count() == 0 {
					info!("all windows closed");
					break;
				}
			}
		}
	}

	Ok(())
}
