//! Configuration loading for Zenox.
//!
//! Configuration is written in TOML. Every section and field is optional;
//! absent values fall back to the defaults documented on each accessor.
//!
//! ```toml
//! [logging]
//! level = "info"
//! directory = "logs"
//! file_name = "application.log"
//! ansi = true
//!
//! [execution_log]
//! max_entries = 500
//!
//! [permissions]
//! granted = ["user", "maintainer"]
//! ```
//!
//! Layers are combined with [`Config::merge`]: fields set in the later layer
//! win, unset fields keep the earlier value.

pub mod error;

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use serde::Deserialize;
pub use error::{ConfigError, Result};
use zenox_permission::PermissionLevel;

/// Log file name used when `logging.file_name` is not set.
pub const DEFAULT_LOG_FILE: &str = "application.log";

/// Parsed configuration from a TOML file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	pub logging: LoggingConfig,
	pub execution_log: ExecutionLogConfig,
	pub permissions: PermissionsConfig,
}

/// `[logging]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
	pub level: Option<LogLevel>,
	/// Directory for the log file. The file sink is disabled when unset.
	pub directory: Option<PathBuf>,
	pub file_name: Option<String>,
	pub ansi: Option<bool>,
}

impl LoggingConfig {
	/// Minimum level, `info` by default.
	pub fn level(&self) -> LogLevel {
		self.level.unwrap_or_default()
	}

	/// Log file name, `application.log` by default.
	pub fn file_name(&self) -> &str {
		self.file_name.as_deref().unwrap_or(DEFAULT_LOG_FILE)
	}

	/// Whether the terminal sink uses ANSI colors, true by default.
	pub fn ansi(&self) -> bool {
		self.ansi.unwrap_or(true)
	}

	/// Full path of the log file, if file logging is enabled.
	pub fn file_path(&self) -> Option<PathBuf> {
		self.directory.as_ref().map(|dir| dir.join(self.file_name()))
	}

	fn merge(&mut self, other: LoggingConfig) {
		if other.level.is_some() {
			self.level = other.level;
		}
		if other.directory.is_some() {
			self.directory = other.directory;
		}
		if other.file_name.is_some() {
			self.file_name = other.file_name;
		}
		if other.ansi.is_some() {
			self.ansi = other.ansi;
		}
	}
}

/// Severity threshold for the log sinks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
	Trace,
	Debug,
	#[default]
	Info,
	Warn,
	Error,
}

impl LogLevel {
	/// Directive string understood by `tracing_subscriber::EnvFilter`.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Trace => "trace",
			Self::Debug => "debug",
			Self::Info => "info",
			Self::Warn => "warn",
			Self::Error => "error",
		}
	}
}

impl From<LogLevel> for tracing::Level {
	fn from(level: LogLevel) -> Self {
		match level {
			LogLevel::Trace => tracing::Level::TRACE,
			LogLevel::Debug => tracing::Level::DEBUG,
			LogLevel::Info => tracing::Level::INFO,
			LogLevel::Warn => tracing::Level::WARN,
			LogLevel::Error => tracing::Level::ERROR,
		}
	}
}

/// `[execution_log]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExecutionLogConfig {
	/// Retention bound. Unbounded when unset.
	pub max_entries: Option<usize>,
}

impl ExecutionLogConfig {
	/// Retention bound as a non-zero count. `None` when unbounded or invalid.
	pub fn retention(&self) -> Option<NonZeroUsize> {
		self.max_entries.and_then(NonZeroUsize::new)
	}
}

/// `[permissions]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PermissionsConfig {
	/// Levels granted at startup.
	pub granted: Option<Vec<PermissionLevel>>,
}

impl PermissionsConfig {
	/// Configured levels, empty when unset.
	pub fn granted(&self) -> &[PermissionLevel] {
		self.granted.as_deref().unwrap_or_default()
	}
}

impl Config {
	/// Parse a TOML string into a validated [`Config`].
	pub fn parse(input: &str) -> Result<Self> {
		let config: Config = toml::from_str(input)?;
		config.validate()?;
		Ok(config)
	}

	/// Load configuration from a file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
			path: path.to_path_buf(),
			error: e,
		})?;
		let config = Self::parse(&content)?;
		tracing::debug!(path = %path.display(), "loaded config");
		Ok(config)
	}

	/// Like [`Config::load`], but a missing file yields the defaults.
	///
	/// Other I/O errors and parse errors are still reported.
	pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		match Self::load(path) {
			Err(ConfigError::Io { error, .. }) if error.kind() == std::io::ErrorKind::NotFound => {
				tracing::debug!(path = %path.display(), "config file not found, using defaults");
				Ok(Self::default())
			}
			other => other,
		}
	}

	/// Merge another config into this one.
	///
	/// Values set in `other` override values in `self`.
	pub fn merge(&mut self, other: Config) {
		self.logging.merge(other.logging);
		if other.execution_log.max_entries.is_some() {
			self.execution_log.max_entries = other.execution_log.max_entries;
		}
		if other.permissions.granted.is_some() {
			self.permissions.granted = other.permissions.granted;
		}
	}

	/// Rejects values that parse but cannot be used.
	pub fn validate(&self) -> Result<()> {
		if self.execution_log.max_entries == Some(0) {
			return Err(ConfigError::InvalidValue {
				field: "execution_log.max_entries",
				reason: "must be greater than zero".to_string(),
			});
		}
		if let Some(name) = &self.logging.file_name
			&& name.trim().is_empty()
		{
			return Err(ConfigError::InvalidValue {
				field: "logging.file_name",
				reason: "must not be empty".to_string(),
			});
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests;
