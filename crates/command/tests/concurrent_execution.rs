use std::sync::Arc;
use std::thread;

// Library dependencies are linked into this test crate but not used directly.
use chrono as _;
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use rstest as _;
use rustc_hash as _;
use thiserror as _;
use tracing as _;
use zenox_command::{CommandContext, CommandDef, CommandRegistry, ExecutionOutcome};
use zenox_events::EventAggregator;
use zenox_permission::PermissionRegistry;

const COMMANDS: usize = 100;

#[test]
fn concurrent_executions_lose_no_log_entries() {
	let registry: CommandRegistry = CommandRegistry::new(CommandContext::new(PermissionRegistry::new(), EventAggregator::new()));
	let counter = Arc::new(Mutex::new(0usize));

	for i in 0..COMMANDS {
		let counter = Arc::clone(&counter);
		registry
			.add(
				&format!("cmd-{i}"),
				CommandDef::from_fn(move |_| {
					*counter.lock() += 1;
				}),
			)
			.unwrap();
	}

	thread::scope(|scope| {
		for i in 0..COMMANDS {
			let registry = registry.clone();
			scope.spawn(move || {
				assert!(registry.execute_if_exists(&format!("cmd-{i}"), None).unwrap());
			});
		}
	});

	assert_eq!(*counter.lock(), COMMANDS);
	let log = registry.execution_log();
	assert_eq!(log.len(), COMMANDS);
	assert_eq!(log.total_recorded(), COMMANDS as u64);
	assert!(log.entries().iter().all(|r| r.outcome == ExecutionOutcome::Completed));

	let mut names: Vec<_> = log.entries().iter().map(|r| r.name.to_string()).collect();
	names.sort();
	names.dedup();
	assert_eq!(names.len(), COMMANDS);
}

#[test]
fn registration_while_iterating_from_another_thread() {
	let registry: CommandRegistry = CommandRegistry::default();
	thread::scope(|scope| {
		let writer = registry.clone();
		scope.spawn(move || {
			for i in 0..500 {
				writer.add_action(&format!("w-{i}"), |_| Ok(())).unwrap();
			}
		});
		let reader = registry.clone();
		scope.spawn(move || {
			for _ in 0..50 {
				for (key, command) in &reader {
					assert_eq!(key, command.key());
				}
			}
		});
	});
	assert_eq!(registry.len(), 500);
}
