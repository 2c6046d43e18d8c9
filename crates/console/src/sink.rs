use inkpad_editor::{Level, NotificationSink, TracingSink, TrayNotification};

/// Prints tray notifications inline with the console output and logs them.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl NotificationSink for ConsoleSink {
	fn send_notification(&self, notification: TrayNotification) {
		println!("{}", render(&notification));
		TracingSink.send_notification(notification);
	}
}

fn render(notification: &TrayNotification) -> String {
	let tag = match notification.level {
		Level::Info => "info",
		Level::Error => "error",
	};
	format!("[{tag}] {}: {}", notification.title, notification.body)
}
