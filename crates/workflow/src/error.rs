use std::fmt;

/// Boxed error returned by enter/exit callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Which hook of a transition failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackPhase {
	/// Exit hook of the state being left. The state was not changed.
	Exit,
	/// Enter hook of the state being entered. The state had already changed.
	Enter,
}

impl fmt::Display for CallbackPhase {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Exit => "exit",
			Self::Enter => "enter",
		})
	}
}

/// Why a trigger did not complete a transition.
#[derive(Debug, thiserror::Error)]
pub enum TransitionError {
	/// No edge is registered for the current state and trigger.
	#[error("no transition from {state} on {trigger}")]
	NoTransition { state: String, trigger: String },

	/// An enter or exit callback returned an error or panicked.
	#[error("{phase} callback of {state} failed: {source}")]
	CallbackFailed {
		phase: CallbackPhase,
		state: String,
		#[source]
		source: BoxError,
	},
}

impl TransitionError {
	pub fn phase(&self) -> Option<CallbackPhase> {
		match self {
			Self::CallbackFailed { phase, .. } => Some(*phase),
			Self::NoTransition { .. } => None,
		}
	}
}

/// Error carrying the message of a panicking callback.
#[derive(Debug, thiserror::Error)]
#[error("callback panicked: {0}")]
pub struct CallbackPanic(pub String);

impl CallbackPanic {
	pub(crate) fn from_payload(payload: Box<dyn std::any::Any + Send>) -> Self {
		let message = match payload.downcast::<&'static str>() {
			Ok(msg) => (*msg).to_string(),
			Err(payload) => match payload.downcast::<String>() {
				Ok(msg) => *msg,
				Err(_) => "non-string panic payload".to_string(),
			},
		};
		Self(message)
	}
}
