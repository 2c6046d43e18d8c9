use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::Result;

/// Environment variable that overrides [`EditorConfig::log_level`].
pub const LOG_ENV: &str = "INKPAD_LOG";

/// Environment variable holding TOML settings text.
pub const CONFIG_ENV: &str = "INKPAD_CONFIG";

/// Editor settings.
///
/// Settings are read-only for the lifetime of the process: they come from
/// defaults, an embedder-supplied TOML string, and environment overrides, and
/// are never written back.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct EditorConfig {
	/// Suffix of every window title.
	pub app_title: String,
	/// Title text for windows without a file path.
	pub unknown_file_label: String,
	/// Whether the tray icon is shown while windows are open.
	pub tray_enabled: bool,
	/// Text placed in a window whose file could not be read. `{path}` is
	/// replaced with the file path.
	pub load_error_message: String,
	/// Maximum tracing level for the frontend subscriber.
	pub log_level: String,
}

impl Default for EditorConfig {
	fn default() -> Self {
		Self {
			app_title: "editor".to_string(),
			unknown_file_label: "unknown file".to_string(),
			tray_enabled: true,
			load_error_message: "Could not read file: {path}".to_string(),
			log_level: "info".to_string(),
		}
	}
}

impl EditorConfig {
	/// Parses settings from TOML. Missing keys keep their defaults.
	pub fn from_toml_str(source: &str) -> Result<Self> {
		Ok(toml::from_str(source)?)
	}

	/// Settings from the process environment.
	pub fn from_env() -> Result<Self> {
		Self::load(|key| std::env::var(key).ok())
	}

	/// Parses the TOML under [`CONFIG_ENV`], if any, then applies the
	/// single-value overrides. Both are looked up through `lookup`.
	pub fn load(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
		let config = match lookup(CONFIG_ENV) {
			Some(source) => Self::from_toml_str(&source)?,
			None => Self::default(),
		};
		Ok(config.with_overrides(lookup))
	}

	/// Applies overrides from `lookup`, keyed by environment variable name.
	pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
		if let Some(level) = lookup(LOG_ENV).filter(|level| !level.trim().is_empty()) {
			self.log_level = level.trim().to_string();
		}
		self
	}

	/// Parsed [`Self::log_level`], falling back to `INFO` when unrecognized.
	pub fn max_level(&self) -> tracing::Level {
		tracing::Level::from_str(&self.log_level).unwrap_or(tracing::Level::INFO)
	}

	/// Window title: `"<*><path or unknown label> - <app title>"`.
	pub fn window_title(&self, path: Option<&Path>, changed: bool) -> String {
		let mark = if changed { "*" } else { "" };
		match path {
			Some(path) => format!("{mark}{} - {}", path.display(), self.app_title),
			None => format!("{mark}{} - {}", self.unknown_file_label, self.app_title),
		}
	}

	/// Renders the placeholder text for an unreadable file.
	pub fn render_load_error(&self, path: &Path) -> String {
		self.load_error_message.replace("{path}", &path.display().to_string())
	}
}
