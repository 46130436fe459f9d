//! Document view model driving a workflow through registered commands.

use std::sync::Arc;

use parking_lot::Mutex;
use strum::Display;
use zenox_command::{BoxError, CommandContext, CommandDef, CommandRegistry, Result};
use zenox_permission::PermissionLevel;
use zenox_workflow::StateMachine;

/// Lifecycle of the open document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum DocumentState {
	Empty,
	Loading,
	Ready,
	Saving,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum DocumentTrigger {
	Load,
	Loaded,
	Save,
	Saved,
	Close,
	Reset,
}

/// Document name used by `load` without an argument.
pub const UNTITLED: &str = "untitled";

#[derive(Debug)]
struct Document {
	workflow: StateMachine<DocumentState, DocumentTrigger>,
	name: Option<String>,
	text: String,
	dirty: bool,
	saves: u32,
}

impl Document {
	fn new() -> Self {
		use DocumentState::*;
		use DocumentTrigger::*;

		let mut workflow = StateMachine::new(Empty).with_label("document");
		workflow.add_transition(Empty, Load, Loading);
		workflow.add_transition(Loading, Loaded, Ready);
		workflow.add_transition(Ready, Save, Saving);
		workflow.add_transition(Saving, Saved, Ready);
		workflow.add_transition(Ready, Close, Empty);
		for state in [Loading, Ready, Saving] {
			workflow.add_transition(state, Reset, Empty);
		}
		workflow.on_enter_state(Empty, || {
			tracing::debug!("document released");
			Ok(())
		});

		Self {
			workflow,
			name: None,
			text: String::new(),
			dirty: false,
			saves: 0,
		}
	}

	fn state(&self) -> DocumentState {
		*self.workflow.state()
	}

	fn fire(&mut self, trigger: DocumentTrigger) -> std::result::Result<(), BoxError> {
		let from = self.state();
		if self.workflow.fire(trigger) {
			Ok(())
		} else {
			Err(format!("cannot {trigger} while {from}").into())
		}
	}

	fn clear(&mut self) {
		self.name = None;
		self.text.clear();
		self.dirty = false;
	}
}

/// Owns the command registry and the document its commands act on.
///
/// Commands: `load[=name]`, `edit[=text]`, `save`, `close` and the
/// Admin-only `purge`. Predicates read the workflow state, and every state
/// change raises the requery signal.
#[derive(Debug, Clone)]
pub struct Workbench {
	commands: CommandRegistry<str>,
	document: Arc<Mutex<Document>>,
}

impl Workbench {
	/// Creates an empty document and registers its commands.
	pub fn new(context: CommandContext) -> Result<Self> {
		let workbench = Self {
			commands: CommandRegistry::new(context),
			document: Arc::new(Mutex::new(Document::new())),
		};
		workbench.register_commands()?;
		Ok(workbench)
	}

	pub fn commands(&self) -> &CommandRegistry<str> {
		&self.commands
	}

	/// Current workflow state of the document.
	pub fn state(&self) -> DocumentState {
		self.document.lock().state()
	}

	pub fn document_name(&self) -> Option<String> {
		self.document.lock().name.clone()
	}

	pub fn text(&self) -> String {
		self.document.lock().text.clone()
	}

	pub fn is_dirty(&self) -> bool {
		self.document.lock().dirty
	}

	/// Number of completed saves since the last purge.
	pub fn save_count(&self) -> u32 {
		self.document.lock().saves
	}

	/// Runs `key` if it exists and is enabled. See
	/// [`CommandRegistry::execute_if_exists`].
	pub fn run(&self, key: &str, argument: Option<&str>) -> Result<bool> {
		self.commands.execute_if_exists(key, argument)
	}

	fn command(&self, action: impl Fn(&mut Document, Option<&str>) -> std::result::Result<(), BoxError> + Send + Sync + 'static) -> CommandDef<str> {
		let document = Arc::clone(&self.document);
		let context = self.commands.context().clone();
		CommandDef::new(move |argument: Option<&str>| {
			let result = action(&mut *document.lock(), argument);
			// Handlers may query enablement, so the document lock must be released first.
			context.invalidate_requery_suggested();
			result
		})
	}

	fn in_state(&self, wanted: impl Fn(&Document) -> bool + Send + Sync + 'static) -> impl Fn(Option<&str>) -> bool + Send + Sync + 'static {
		let document = Arc::clone(&self.document);
		move |_: Option<&str>| wanted(&document.lock())
	}

	fn register_commands(&self) -> Result<()> {
		use DocumentState::*;
		use DocumentTrigger::*;

		self.commands.add(
			"load",
			self.command(|doc, name| {
				doc.fire(Load)?;
				doc.name = Some(name.unwrap_or(UNTITLED).to_string());
				doc.text.clear();
				doc.dirty = false;
				doc.fire(Loaded)
			})
			.when(self.in_state(|doc| doc.state() == Empty))
			.named("Load document"),
		)?;

		self.commands.add(
			"edit",
			self.command(|doc, text| {
				if doc.state() != Ready {
					return Err(format!("cannot edit while {}", doc.state()).into());
				}
				if let Some(text) = text {
					doc.text.push_str(text);
				}
				doc.dirty = true;
				Ok(())
			})
			.when(self.in_state(|doc| doc.state() == Ready))
			.named("Edit document"),
		)?;

		self.commands.add(
			"save",
			self.command(|doc, _| {
				doc.fire(Save)?;
				doc.dirty = false;
				doc.saves += 1;
				doc.fire(Saved)
			})
			.when(self.in_state(|doc| doc.state() == Ready && doc.dirty))
			.named("Save document"),
		)?;

		self.commands.add(
			"close",
			self.command(|doc, _| {
				doc.fire(Close)?;
				doc.clear();
				Ok(())
			})
			.when(self.in_state(|doc| doc.state() == Ready))
			.named("Close document"),
		)?;

		self.commands.add(
			"purge",
			self.command(|doc, _| {
				if doc.state() != Empty {
					doc.fire(Reset)?;
				}
				doc.clear();
				doc.saves = 0;
				Ok(())
			})
			.requires(PermissionLevel::Admin)
			.named("Purge document"),
		)?;

		Ok(())
	}
}
