use std::fs::OpenOptions;

use anyhow::Context;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;
use zenox_config::{LogLevel, LoggingConfig};

/// Default filter directive when `RUST_LOG` is unset.
pub fn default_directive(config: &LoggingConfig, verbose: bool) -> &'static str {
	if verbose && config.level() > LogLevel::Debug {
		LogLevel::Debug.as_str()
	} else {
		config.level().as_str()
	}
}

/// Installs the global subscriber: stderr always, plus an append-mode file
/// sink when `logging.directory` is set.
pub fn setup_tracing(config: &LoggingConfig, verbose: bool) -> anyhow::Result<()> {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(config, verbose)));

	let stderr_layer = tracing_subscriber::fmt::layer()
		.with_writer(std::io::stderr)
		.with_ansi(config.ansi())
		.with_target(false);

	let Some(log_path) = config.file_path() else {
		tracing_subscriber::registry().with(filter).with(stderr_layer).init();
		return Ok(());
	};

	if let Some(parent) = log_path.parent()
		&& !parent.as_os_str().is_empty()
	{
		std::fs::create_dir_all(parent).with_context(|| format!("creating log directory {}", parent.display()))?;
	}
	let file = OpenOptions::new()
		.create(true)
		.append(true)
		.open(&log_path)
		.with_context(|| format!("opening log file {}", log_path.display()))?;

	let file_layer = tracing_subscriber::fmt::layer()
		.with_writer(file)
		.with_ansi(false)
		.with_target(true);

	tracing_subscriber::registry()
		.with(filter)
		.with(stderr_layer)
		.with(file_layer)
		.init();

	tracing::info!(path = %log_path.display(), "file logging initialized");
	Ok(())
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn verbose_lowers_threshold_to_debug() {
		let config = LoggingConfig::default();
		assert_eq!(default_directive(&config, false), "info");
		assert_eq!(default_directive(&config, true), "debug");
	}

	#[test]
	fn verbose_keeps_trace() {
		let config = LoggingConfig {
			level: Some(LogLevel::Trace),
			..LoggingConfig::default()
		};
		assert_eq!(default_directive(&config, true), "trace");
	}
}
