use std::fmt::Debug;
use std::hash::Hash;
use std::panic::{AssertUnwindSafe, catch_unwind};

use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{BoxError, CallbackPanic, CallbackPhase, TransitionError};

/// Enter/exit hook.
pub type Callback = Box<dyn FnMut() -> Result<(), BoxError> + Send>;

/// Transition-table state machine.
///
/// The machine is always in exactly one state. It only moves along edges
/// registered with [`StateMachine::add_transition`]; firing any other trigger
/// leaves the state untouched.
pub struct StateMachine<S, T> {
	label: String,
	initial: S,
	state: S,
	transitions: FxHashMap<S, FxHashMap<T, S>>,
	on_enter: FxHashMap<S, Callback>,
	on_exit: FxHashMap<S, Callback>,
}

impl<S: Debug, T: Debug> Debug for StateMachine<S, T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("StateMachine")
			.field("label", &self.label)
			.field("state", &self.state)
			.field("transitions", &self.transitions.values().map(FxHashMap::len).sum::<usize>())
			.finish_non_exhaustive()
	}
}

impl<S, T> StateMachine<S, T>
where
	S: Clone + Eq + Hash + Debug,
	T: Eq + Hash + Debug,
{
	/// Creates a machine resting in `initial`. No callback runs.
	pub fn new(initial: S) -> Self {
		Self {
			label: "state_machine".to_string(),
			state: initial.clone(),
			initial,
			transitions: FxHashMap::default(),
			on_enter: FxHashMap::default(),
			on_exit: FxHashMap::default(),
		}
	}

	/// Names the machine in log records.
	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = label.into();
		self
	}

	pub fn label(&self) -> &str {
		&self.label
	}

	/// Current state.
	pub fn state(&self) -> &S {
		&self.state
	}

	/// State the machine was created in.
	pub fn initial_state(&self) -> &S {
		&self.initial
	}

	/// Registers the edge `from --trigger--> to`, replacing any previous destination.
	pub fn add_transition(&mut self, from: S, trigger: T, to: S) -> Option<S> {
		self.transitions.entry(from).or_default().insert(trigger, to)
	}

	/// Sets the hook run after entering `state`. Replaces an earlier hook.
	pub fn on_enter_state(&mut self, state: S, callback: impl FnMut() -> Result<(), BoxError> + Send + 'static) {
		self.on_enter.insert(state, Box::new(callback));
	}

	/// Sets the hook run before leaving `state`. Replaces an earlier hook.
	pub fn on_exit_state(&mut self, state: S, callback: impl FnMut() -> Result<(), BoxError> + Send + 'static) {
		self.on_exit.insert(state, Box::new(callback));
	}

	/// True if `trigger` has an edge out of the current state.
	pub fn can_fire(&self, trigger: &T) -> bool {
		self.edges_from_current().is_some_and(|edges| edges.contains_key(trigger))
	}

	/// Triggers with an edge out of the current state.
	pub fn permitted_triggers(&self) -> Vec<&T> {
		self.edges_from_current().map(|edges| edges.keys().collect()).unwrap_or_default()
	}

	/// Every state the machine knows of: the initial state plus all states
	/// referenced by transitions or hooks.
	pub fn states(&self) -> FxHashSet<&S> {
		let mut states = FxHashSet::default();
		states.insert(&self.initial);
		states.insert(&self.state);
		for (from, edges) in &self.transitions {
			states.insert(from);
			states.extend(edges.values());
		}
		states.extend(self.on_enter.keys());
		states.extend(self.on_exit.keys());
		states
	}

	fn edges_from_current(&self) -> Option<&FxHashMap<T, S>> {
		self.transitions.get(&self.state)
	}

	/// Fires `trigger` and reports whether the transition completed.
	///
	/// Failures never propagate: a missing edge is logged as a warning, a
	/// failing or panicking hook as an error. There is no rollback. If the
	/// exit hook fails the state is unchanged; if the enter hook fails the
	/// machine stays in the new state.
	pub fn fire(&mut self, trigger: T) -> bool {
		match self.try_fire(&trigger) {
			Ok(previous) => {
				tracing::info!(machine = %self.label, from = ?previous, to = ?self.state, ?trigger, "state transition");
				true
			}
			Err(err @ TransitionError::NoTransition { .. }) => {
				tracing::warn!(machine = %self.label, state = ?self.state, ?trigger, "{err}");
				false
			}
			Err(err) => {
				tracing::error!(machine = %self.label, state = ?self.state, ?trigger, error = %err, "state transition failed");
				false
			}
		}
	}

	/// Performs one transition, returning the state that was left.
	pub(crate) fn try_fire(&mut self, trigger: &T) -> Result<S, TransitionError> {
		let next = self
			.edges_from_current()
			.and_then(|edges| edges.get(trigger))
			.cloned()
			.ok_or_else(|| TransitionError::NoTransition {
				state: format!("{:?}", self.state),
				trigger: format!("{trigger:?}"),
			})?;

		if let Some(exit) = self.on_exit.get_mut(&self.state) {
			run_callback(exit).map_err(|source| TransitionError::CallbackFailed {
				phase: CallbackPhase::Exit,
				state: format!("{:?}", self.state),
				source,
			})?;
		}

		let previous = std::mem::replace(&mut self.state, next);

		if let Some(enter) = self.on_enter.get_mut(&self.state) {
			run_callback(enter).map_err(|source| TransitionError::CallbackFailed {
				phase: CallbackPhase::Enter,
				state: format!("{:?}", self.state),
				source,
			})?;
		}

		Ok(previous)
	}
}

fn run_callback(callback: &mut Callback) -> Result<(), BoxError> {
	match catch_unwind(AssertUnwindSafe(|| callback())) {
		Ok(result) => result,
		Err(payload) => Err(Box::new(CallbackPanic::from_payload(payload))),
	}
}
