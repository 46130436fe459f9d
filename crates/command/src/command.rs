use std::fmt;
use std::sync::Arc;

use zenox_events::SubscriptionId;
use zenox_permission::PermissionLevel;

use crate::error::{BoxError, CommandError, Result};
use crate::{CommandContext, ExecutionOutcome};

/// Command body. Receives the optional parameter passed to `execute`.
pub type Action<P> = Box<dyn Fn(Option<&P>) -> std::result::Result<(), BoxError> + Send + Sync>;

/// Enablement predicate over the same parameter.
pub type Predicate<P> = Box<dyn Fn(Option<&P>) -> bool + Send + Sync>;

/// Unbound command: an action plus its gating, waiting for a registry key.
pub struct CommandDef<P: ?Sized = ()> {
	action: Action<P>,
	can_execute: Option<Predicate<P>>,
	required_permission: Option<PermissionLevel>,
	name: Option<Arc<str>>,
}

impl<P: ?Sized + 'static> CommandDef<P> {
	/// Creates a definition running the fallible `action`.
	pub fn new(action: impl Fn(Option<&P>) -> std::result::Result<(), BoxError> + Send + Sync + 'static) -> Self {
		Self {
			action: Box::new(action),
			can_execute: None,
			required_permission: None,
			name: None,
		}
	}

	/// Wraps an infallible action.
	pub fn from_fn(action: impl Fn(Option<&P>) + Send + Sync + 'static) -> Self {
		Self::new(move |parameter| {
			action(parameter);
			Ok(())
		})
	}

	/// Only executable while `predicate` holds.
	pub fn when(mut self, predicate: impl Fn(Option<&P>) -> bool + Send + Sync + 'static) -> Self {
		self.can_execute = Some(Box::new(predicate));
		self
	}

	/// Requires `level` to be held. `PermissionLevel::None` means no requirement.
	pub fn requires(mut self, level: PermissionLevel) -> Self {
		self.required_permission = (level != PermissionLevel::None).then_some(level);
		self
	}

	/// Display name used in the execution log. Defaults to the registry key.
	pub fn named(mut self, name: impl Into<Arc<str>>) -> Self {
		self.name = Some(name.into());
		self
	}

	/// Binds the definition to `key` and the collaborators in `context`.
	pub fn bind(self, key: impl Into<Arc<str>>, context: &CommandContext) -> Command<P> {
		let key = key.into();
		Command {
			name: self.name.unwrap_or_else(|| Arc::clone(&key)),
			key,
			action: self.action,
			can_execute: self.can_execute,
			required_permission: self.required_permission,
			context: context.clone(),
		}
	}
}

/// A registered, permission-gated unit of work. Immutable once bound.
pub struct Command<P: ?Sized = ()> {
	key: Arc<str>,
	name: Arc<str>,
	action: Action<P>,
	can_execute: Option<Predicate<P>>,
	required_permission: Option<PermissionLevel>,
	context: CommandContext,
}

impl<P: ?Sized> fmt::Debug for Command<P> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Command")
			.field("key", &self.key)
			.field("name", &self.name)
			.field("required_permission", &self.required_permission)
			.field("has_predicate", &self.can_execute.is_some())
			.finish_non_exhaustive()
	}
}

impl<P: ?Sized> Command<P> {
	/// Registry key the command was bound to.
	pub fn key(&self) -> &str {
		&self.key
	}

	/// Name written to the execution log.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Level that must be held to execute, if any.
	pub fn required_permission(&self) -> Option<PermissionLevel> {
		self.required_permission
	}

	fn permission_held(&self) -> bool {
		self.required_permission.is_none_or(|level| self.context.permissions().has_permission(level))
	}

	/// True iff the required permission (if any) is held and the predicate (if any) passes.
	pub fn can_execute(&self, parameter: Option<&P>) -> bool {
		self.permission_held() && self.can_execute.as_ref().is_none_or(|predicate| predicate(parameter))
	}

	/// Runs the action and records its duration in the execution log.
	///
	/// The predicate is not consulted here; it only drives enablement. A missing
	/// permission fails with [`CommandError::Unauthorized`] before anything runs.
	/// The record is written exactly once, including when the action fails or
	/// panics; a panic keeps unwinding after the record is written.
	pub fn execute(&self, parameter: Option<&P>) -> Result<()> {
		if let Some(level) = self.required_permission
			&& let Err(denied) = self.context.permissions().require(level)
		{
			tracing::warn!(command = %self.name, required = %level, "command execution denied");
			return Err(CommandError::Unauthorized {
				command: self.name.to_string(),
				denied,
			});
		}

		let timer = self.context.execution_log().start_timer(Arc::clone(&self.name));
		match (self.action)(parameter) {
			Ok(()) => {
				timer.finish(ExecutionOutcome::Completed);
				Ok(())
			}
			Err(source) => {
				timer.finish(ExecutionOutcome::Failed);
				Err(CommandError::ActionFailure {
					command: self.name.to_string(),
					source,
				})
			}
		}
	}

	/// Registers `handler` to run whenever the requery signal is raised.
	pub fn subscribe_can_execute_changed(&self, handler: impl Fn() + Send + Sync + 'static) -> SubscriptionId {
		self.context.subscribe_requery(handler)
	}

	/// Removes a handler added by [`Command::subscribe_can_execute_changed`].
	pub fn unsubscribe_can_execute_changed(&self, subscription: SubscriptionId) -> bool {
		self.context.unsubscribe_requery(subscription)
	}
}
