use zenox_events::{EventAggregator, SubscriptionId};
use zenox_permission::PermissionRegistry;

use crate::ExecutionLog;

/// Broadcast when command enablement may have changed and `can_execute` should be polled again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequerySuggested;

/// Collaborators shared by every command bound to one registry.
#[derive(Debug, Clone, Default)]
pub struct CommandContext {
	permissions: PermissionRegistry,
	log: ExecutionLog,
	events: EventAggregator,
}

impl CommandContext {
	/// Creates a context with an empty, unbounded execution log.
	pub fn new(permissions: PermissionRegistry, events: EventAggregator) -> Self {
		Self {
			permissions,
			log: ExecutionLog::new(),
			events,
		}
	}

	/// Replaces the execution log, e.g. with a retention-bounded one.
	pub fn with_execution_log(mut self, log: ExecutionLog) -> Self {
		self.log = log;
		self
	}

	/// Permission registry consulted before every execution.
	pub fn permissions(&self) -> &PermissionRegistry {
		&self.permissions
	}

	/// Log shared by every command bound to this context.
	pub fn execution_log(&self) -> &ExecutionLog {
		&self.log
	}

	/// Event aggregator carrying the requery signal.
	pub fn events(&self) -> &EventAggregator {
		&self.events
	}

	/// Raises the requery signal. Returns the number of handlers notified.
	pub fn invalidate_requery_suggested(&self) -> usize {
		self.events.publish(&RequerySuggested)
	}

	pub(crate) fn subscribe_requery(&self, handler: impl Fn() + Send + Sync + 'static) -> SubscriptionId {
		self.events.subscribe::<RequerySuggested>(move |_| handler())
	}

	pub(crate) fn unsubscribe_requery(&self, subscription: SubscriptionId) -> bool {
		self.events.unsubscribe(subscription)
	}
}
