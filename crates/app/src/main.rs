//! Zenox workbench binary.
//!
//! Loads configuration, installs logging, grants the configured permission
//! levels and runs the requested commands against a fresh document.

mod cli;
mod logging;
mod workbench;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use cli::Cli;
use workbench::Workbench;
use zenox_command::{CommandContext, ExecutionLog};
use zenox_config::Config;
use zenox_events::EventAggregator;
use zenox_permission::PermissionRegistry;

/// Config file consulted when `--config` is not given.
const DEFAULT_CONFIG: &str = "zenox.toml";

fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();

	let config = load_config(cli.config.as_deref())?;
	logging::setup_tracing(&config.logging, cli.verbose)?;

	let permissions = PermissionRegistry::from_levels(config.permissions.granted().iter().chain(&cli.grant).copied());
	let log = match config.execution_log.retention() {
		Some(max) => ExecutionLog::with_max_entries(max),
		None => ExecutionLog::new(),
	};
	let context = CommandContext::new(permissions, EventAggregator::new()).with_execution_log(log.clone());
	let workbench = Workbench::new(context).context("registering workbench commands")?;

	tracing::info!(granted = ?workbench.commands().permissions().granted(), commands = %workbench.commands(), "workbench ready");

	let mut failures = 0usize;
	for invocation in &cli.commands {
		match workbench.run(&invocation.key, invocation.argument.as_deref()) {
			Ok(true) => {}
			Ok(false) => println!("skipped {}: not available", invocation.key),
			Err(err) => {
				tracing::error!(key = %invocation.key, error = %err, "command failed");
				failures += 1;
			}
		}
	}

	for line in log.lines() {
		println!("{line}");
	}
	println!("state: {}", workbench.state());

	if failures > 0 {
		anyhow::bail!("{failures} command(s) failed");
	}
	Ok(())
}

fn load_config(explicit: Option<&Path>) -> anyhow::Result<Config> {
	match explicit {
		Some(path) => Config::load(path).with_context(|| format!("loading config {}", path.display())),
		None => Config::load_or_default(PathBuf::from(DEFAULT_CONFIG)).context("loading default config"),
	}
}
