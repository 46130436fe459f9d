use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use zenox_permission::PermissionRegistry;

use crate::error::{BoxError, CommandError, Result};
use crate::{Command, CommandContext, CommandDef, ExecutionLog, ExecutionOutcome};

/// Keyed collection of commands sharing one [`CommandContext`].
///
/// Clones share the same commands. Lookups hand out `Arc<Command>` so the
/// map lock is never held while a command runs.
pub struct CommandRegistry<P: ?Sized = ()> {
	commands: Arc<RwLock<FxHashMap<Arc<str>, Arc<Command<P>>>>>,
	context: CommandContext,
}

impl<P: ?Sized> Clone for CommandRegistry<P> {
	fn clone(&self) -> Self {
		Self {
			commands: Arc::clone(&self.commands),
			context: self.context.clone(),
		}
	}
}

impl<P: ?Sized> Default for CommandRegistry<P> {
	fn default() -> Self {
		Self::new(CommandContext::default())
	}
}

impl<P: ?Sized> fmt::Debug for CommandRegistry<P> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CommandRegistry").field("keys", &self.keys()).finish_non_exhaustive()
	}
}

impl<P: ?Sized> fmt::Display for CommandRegistry<P> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let keys = self.keys();
		write!(f, "CommandRegistry (count={}): [{}]", keys.len(), keys.join(", "))
	}
}

fn validate_key(key: &str) -> Result<()> {
	if key.trim().is_empty() {
		return Err(CommandError::InvalidArgument("command key must not be empty or whitespace".to_string()));
	}
	Ok(())
}

impl<P: ?Sized> CommandRegistry<P> {
	/// Creates an empty registry binding commands to `context`.
	pub fn new(context: CommandContext) -> Self {
		Self {
			commands: Arc::new(RwLock::new(FxHashMap::default())),
			context,
		}
	}

	/// Context shared by every registered command.
	pub fn context(&self) -> &CommandContext {
		&self.context
	}

	/// Shorthand for `self.context().permissions()`.
	pub fn permissions(&self) -> &PermissionRegistry {
		self.context.permissions()
	}

	/// Shorthand for `self.context().execution_log()`.
	pub fn execution_log(&self) -> &ExecutionLog {
		self.context.execution_log()
	}

	/// Binds `def` to `key` and registers it.
	///
	/// Fails with [`CommandError::InvalidArgument`] for a blank key and with
	/// [`CommandError::DuplicateKey`] if `key` is taken; the existing command
	/// stays registered.
	pub fn add(&self, key: &str, def: CommandDef<P>) -> Result<Arc<Command<P>>>
	where
		P: 'static,
	{
		validate_key(key)?;
		let mut commands = self.commands.write();
		if commands.contains_key(key) {
			return Err(CommandError::DuplicateKey { key: key.to_string() });
		}
		let key: Arc<str> = Arc::from(key);
		let command = Arc::new(def.bind(Arc::clone(&key), &self.context));
		commands.insert(key, Arc::clone(&command));
		tracing::trace!(key = command.key(), "command registered");
		Ok(command)
	}

	/// Registers an ungated command running `action`.
	pub fn add_action(
		&self,
		key: &str,
		action: impl Fn(Option<&P>) -> std::result::Result<(), BoxError> + Send + Sync + 'static,
	) -> Result<Arc<Command<P>>>
	where
		P: 'static,
	{
		self.add(key, CommandDef::new(action))
	}

	/// Returns the command under `key` or [`CommandError::NotFound`].
	pub fn get(&self, key: &str) -> Result<Arc<Command<P>>> {
		self.try_get(key).ok_or_else(|| CommandError::NotFound { key: key.to_string() })
	}

	/// Non-failing lookup.
	pub fn try_get(&self, key: &str) -> Option<Arc<Command<P>>> {
		self.commands.read().get(key).cloned()
	}

	/// Returns true if a command is registered under `key`.
	pub fn contains(&self, key: &str) -> bool {
		self.commands.read().contains_key(key)
	}

	/// Removes the command under `key`. Returns false if it was absent.
	pub fn remove(&self, key: &str) -> bool {
		self.commands.write().remove(key).is_some()
	}

	/// Removes every command. The execution log is kept.
	pub fn clear(&self) {
		self.commands.write().clear();
	}

	/// Number of registered commands.
	pub fn len(&self) -> usize {
		self.commands.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.commands.read().is_empty()
	}

	/// Registered keys, sorted.
	pub fn keys(&self) -> Vec<String> {
		let mut keys: Vec<String> = self.commands.read().keys().map(|k| k.to_string()).collect();
		keys.sort();
		keys
	}

	/// Registered commands, sorted by key.
	pub fn values(&self) -> Vec<Arc<Command<P>>> {
		self.entries().into_iter().map(|(_, command)| command).collect()
	}

	/// Snapshot of `(key, command)` pairs, sorted by key.
	pub fn entries(&self) -> Vec<(String, Arc<Command<P>>)> {
		let mut entries: Vec<_> = self.commands.read().iter().map(|(k, c)| (k.to_string(), Arc::clone(c))).collect();
		entries.sort_by(|a, b| a.0.cmp(&b.0));
		entries
	}

	/// Executes the command under `key`.
	pub fn execute(&self, key: &str, parameter: Option<&P>) -> Result<()> {
		self.get(key)?.execute(parameter)
	}

	/// Executes the command under `key` if it exists and is currently executable.
	///
	/// Returns `Ok(false)` when the key is unknown or `can_execute` is false.
	/// Errors from the action itself still propagate.
	pub fn execute_if_exists(&self, key: &str, parameter: Option<&P>) -> Result<bool> {
		let Some(command) = self.try_get(key) else {
			tracing::debug!(key, "no command to execute");
			return Ok(false);
		};
		if !command.can_execute(parameter) {
			tracing::debug!(key, "command not executable");
			return Ok(false);
		}
		command.execute(parameter)?;
		Ok(true)
	}

	/// Appends a completed execution of `name` to the shared execution log.
	pub fn log_execution(&self, name: &str, elapsed: Duration) {
		self.execution_log().record(name, elapsed, ExecutionOutcome::Completed);
	}
}

impl<P: ?Sized> IntoIterator for &CommandRegistry<P> {
	type Item = (String, Arc<Command<P>>);
	type IntoIter = std::vec::IntoIter<Self::Item>;

	fn into_iter(self) -> Self::IntoIter {
		self.entries().into_iter()
	}
}
