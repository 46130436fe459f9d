//! Permission-gated commands and the keyed registry that owns them.
//!
//! A [`CommandDef`] describes a unit of work: an action over an optional
//! parameter, an optional enablement predicate and an optional required
//! [`PermissionLevel`](zenox_permission::PermissionLevel). Adding it to a
//! [`CommandRegistry`] binds it to a key and to the registry's
//! [`CommandContext`], producing an immutable [`Command`].
//!
//! Every execution is timed and appended to the registry's [`ExecutionLog`],
//! whether the action succeeds, fails or panics.
//!
//! ```
//! use zenox_command::{CommandDef, CommandRegistry};
//! use zenox_permission::PermissionLevel;
//!
//! let registry: CommandRegistry = CommandRegistry::default();
//! registry.add("greet", CommandDef::from_fn(|_| println!("hello"))).unwrap();
//! registry.add("purge", CommandDef::from_fn(|_| {}).requires(PermissionLevel::Admin)).unwrap();
//!
//! assert!(registry.execute_if_exists("greet", None).unwrap());
//! assert!(!registry.execute_if_exists("purge", None).unwrap());
//! assert!(!registry.execute_if_exists("missing", None).unwrap());
//! assert_eq!(registry.execution_log().len(), 1);
//! ```

mod command;
mod context;
mod error;
mod execution_log;
mod registry;

pub use command::{Action, Command, CommandDef, Predicate};
pub use context::{CommandContext, RequerySuggested};
pub use error::{BoxError, CommandError, Result};
pub use execution_log::{ExecutionLog, ExecutionOutcome, ExecutionRecord};
pub use registry::CommandRegistry;
