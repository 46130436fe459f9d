use std::collections::VecDeque;
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

/// How one command execution ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionOutcome {
	Completed,
	Failed,
	Panicked,
}

impl ExecutionOutcome {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Completed => "completed",
			Self::Failed => "failed",
			Self::Panicked => "panicked",
		}
	}
}

/// One entry of the execution log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRecord {
	pub name: Arc<str>,
	pub elapsed: Duration,
	pub finished_at: DateTime<Utc>,
	pub outcome: ExecutionOutcome,
}

impl fmt::Display for ExecutionRecord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{} {} {:.3} ms ({})",
			self.finished_at.format("%Y-%m-%d %H:%M:%S%.3f"),
			self.name,
			self.elapsed.as_secs_f64() * 1000.0,
			self.outcome.as_str()
		)
	}
}

#[derive(Debug, Default)]
struct LogState {
	entries: VecDeque<ExecutionRecord>,
	max_entries: Option<NonZeroUsize>,
	total: u64,
}

/// Append-only log of command executions, shared by every command of a registry.
///
/// Writers are serialized; concurrent executions never lose records. With a
/// retention bound only the newest `max_entries` records are kept, while
/// [`ExecutionLog::total_recorded`] keeps counting.
#[derive(Debug, Clone, Default)]
pub struct ExecutionLog {
	state: Arc<Mutex<LogState>>,
}

impl ExecutionLog {
	/// Creates an unbounded log.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a log keeping at most `max_entries` records.
	pub fn with_max_entries(max_entries: NonZeroUsize) -> Self {
		Self {
			state: Arc::new(Mutex::new(LogState {
				entries: VecDeque::with_capacity(max_entries.get().min(1024)),
				max_entries: Some(max_entries),
				total: 0,
			})),
		}
	}

	/// Appends one record.
	pub fn record(&self, name: impl Into<Arc<str>>, elapsed: Duration, outcome: ExecutionOutcome) {
		let record = ExecutionRecord {
			name: name.into(),
			elapsed,
			finished_at: Utc::now(),
			outcome,
		};
		tracing::debug!(command = %record.name, elapsed_us = elapsed.as_micros() as u64, outcome = outcome.as_str(), "command executed");

		let mut state = self.state.lock();
		if let Some(max) = state.max_entries {
			while state.entries.len() >= max.get() {
				state.entries.pop_front();
			}
		}
		state.entries.push_back(record);
		state.total += 1;
	}

	/// Number of retained records.
	pub fn len(&self) -> usize {
		self.state.lock().entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Number of records ever appended, including those dropped by retention.
	pub fn total_recorded(&self) -> u64 {
		self.state.lock().total
	}

	/// Snapshot of the retained records, oldest first.
	pub fn entries(&self) -> Vec<ExecutionRecord> {
		self.state.lock().entries.iter().cloned().collect()
	}

	/// Retained records rendered one per line, oldest first.
	pub fn lines(&self) -> Vec<String> {
		self.state.lock().entries.iter().map(ToString::to_string).collect()
	}

	/// Starts timing one execution of `name`.
	pub(crate) fn start_timer(&self, name: Arc<str>) -> ExecutionTimer<'_> {
		ExecutionTimer {
			log: self,
			name,
			started: Instant::now(),
			outcome: None,
		}
	}
}

/// Scoped timer writing exactly one record when dropped.
///
/// A timer dropped without [`ExecutionTimer::finish`] is either unwinding
/// from a panic or was abandoned mid-execution; both are recorded.
pub(crate) struct ExecutionTimer<'a> {
	log: &'a ExecutionLog,
	name: Arc<str>,
	started: Instant,
	outcome: Option<ExecutionOutcome>,
}

impl ExecutionTimer<'_> {
	pub(crate) fn finish(mut self, outcome: ExecutionOutcome) {
		self.outcome = Some(outcome);
	}
}

impl Drop for ExecutionTimer<'_> {
	fn drop(&mut self) {
		let outcome = self.outcome.unwrap_or(if std::thread::panicking() {
			ExecutionOutcome::Panicked
		} else {
			ExecutionOutcome::Failed
		});
		self.log.record(Arc::clone(&self.name), self.started.elapsed(), outcome);
	}
}
