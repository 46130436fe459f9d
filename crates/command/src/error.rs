use zenox_permission::{PermissionDenied, PermissionLevel};

/// Boxed error returned by command actions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors reported by commands and the command registry.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
	/// A registry key was empty or whitespace only.
	#[error("invalid argument: {0}")]
	InvalidArgument(String),

	/// A command with this key is already registered.
	#[error("a command with key '{key}' already exists")]
	DuplicateKey { key: String },

	/// No command is registered under this key.
	#[error("no command registered under key '{key}'")]
	NotFound { key: String },

	/// The command requires a permission that is not held. The action did not run.
	#[error("command '{command}' denied: {denied}")]
	Unauthorized {
		command: String,
		#[source]
		denied: PermissionDenied,
	},

	/// The command action itself failed.
	#[error("command '{command}' failed: {source}")]
	ActionFailure {
		command: String,
		#[source]
		source: BoxError,
	},
}

impl CommandError {
	/// Permission level whose absence caused an `Unauthorized` error.
	pub fn required_permission(&self) -> Option<PermissionLevel> {
		match self {
			Self::Unauthorized { denied, .. } => Some(denied.required),
			_ => None,
		}
	}
}

/// Result type for command operations.
pub type Result<T> = std::result::Result<T, CommandError>;
