use std::convert::Infallible;
use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;
use zenox_permission::PermissionLevel;

#[derive(Parser, Debug)]
#[command(name = "zenox")]
#[command(about = "Run workbench commands against a document workflow")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Commands to run in order, as `key` or `key=argument`
	#[arg(value_name = "COMMAND")]
	pub commands: Vec<CommandInvocation>,

	/// Configuration file (defaults to ./zenox.toml when present)
	#[arg(long, short = 'c', value_name = "PATH")]
	pub config: Option<PathBuf>,

	/// Verbose logging
	#[arg(long, short = 'v')]
	pub verbose: bool,

	/// Grant a permission level in addition to the configured ones
	#[arg(long, short = 'g', value_name = "LEVEL")]
	pub grant: Vec<PermissionLevel>,
}

/// A command key with an optional argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
	pub key: String,
	pub argument: Option<String>,
}

impl CommandInvocation {
	/// Parses `key` or `key=argument`. An empty argument counts as none.
	pub fn parse(s: &str) -> Self {
		match s.split_once('=') {
			Some((key, argument)) => Self {
				key: key.trim().to_string(),
				argument: (!argument.is_empty()).then(|| argument.to_string()),
			},
			None => Self {
				key: s.trim().to_string(),
				argument: None,
			},
		}
	}
}

impl FromStr for CommandInvocation {
	type Err = Infallible;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(Self::parse(s))
	}
}
