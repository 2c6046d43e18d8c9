use std::path::{Path, PathBuf};

/// Outcome of a save, published on the window's notification channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowNotification {
	SaveSuccess(PathBuf),
	SaveError(PathBuf),
}

impl WindowNotification {
	pub fn path(&self) -> &Path {
		match self {
			Self::SaveSuccess(path) | Self::SaveError(path) => path,
		}
	}

	/// Formats the notification for the system tray.
	pub fn to_tray(&self) -> TrayNotification {
		match self {
			Self::SaveSuccess(path) => TrayNotification::new("File saved", path.display().to_string(), Level::Info),
			Self::SaveError(path) => TrayNotification::new("File not saved", path.display().to_string(), Level::Error),
		}
	}
}

/// Severity of a tray notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Level {
	#[default]
	Info,
	Error,
}

/// A message for the system tray.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrayNotification {
	pub title: String,
	pub body: String,
	pub level: Level,
}

impl TrayNotification {
	pub fn new(title: impl Into<String>, body: impl Into<String>, level: Level) -> Self {
		Self {
			title: title.into(),
			body: body.into(),
			level,
		}
	}
}

/// Delivers tray notifications to the platform.
pub trait NotificationSink: Send + Sync {
	fn send_notification(&self, notification: TrayNotification);
}

/// Sink that writes notifications to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
	fn send_notification(&self, notification: TrayNotification) {
		match notification.level {
			Level::Info => tracing::info!(title = %notification.title, body = %notification.body, "tray.notification"),
			Level::Error => tracing::error!(title = %notification.title, body = %notification.body, "tray.notification"),
		}
	}
}
