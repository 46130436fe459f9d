//! Finite state machine over caller-defined state and trigger types.
//!
//! ```
//! use zenox_workflow::StateMachine;
//!
//! #[derive(Debug, Clone, PartialEq, Eq, Hash)]
//! enum Job { Idle, Running, Done }
//!
//! #[derive(Debug, Clone, PartialEq, Eq, Hash)]
//! enum Signal { Start, Finish }
//!
//! let mut machine = StateMachine::new(Job::Idle);
//! machine.add_transition(Job::Idle, Signal::Start, Job::Running);
//! machine.add_transition(Job::Running, Signal::Finish, Job::Done);
//!
//! assert!(!machine.fire(Signal::Finish));
//! assert!(machine.fire(Signal::Start));
//! assert_eq!(machine.state(), &Job::Running);
//! ```

mod error;
mod machine;

pub use error::{BoxError, CallbackPanic, CallbackPhase, TransitionError};
pub use machine::{Callback, StateMachine};
