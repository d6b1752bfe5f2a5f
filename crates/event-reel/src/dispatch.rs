use std::collections::HashMap;

use tracing::{debug, warn};

use crate::{Category, Event, EventHandle, Producer};

/// What a collaborator reports back for one effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
	Done,
	/// The effect ends the frame (e.g. a scene end); nothing after it runs this frame.
	///
	/// From `sample` this only completes the event on the final (`1.0`) sample.
	/// Earlier it stops the frame's scan and keeps the event resident.
	Halt,
	/// The collaborator has no capability for this operation
	Unsupported,
}

/// External subsystem that performs the effects of one category
pub trait Collaborator {
	/// Perform the event's instantaneous effect
	fn fire(&mut self, event: &Event, producer: &mut Producer) -> Handled;

	/// Apply the event's effect at completion `fraction` in `[0, 1]`
	fn sample(&mut self, event: &Event, fraction: f64, producer: &mut Producer) -> Handled {
		let _ = (event, fraction, producer);
		Handled::Unsupported
	}
}

/// Receives scheduler warnings that never interrupt the frame
pub trait Diagnostics {
	fn invalid_code(&mut self, event: &Event);

	fn starvation(&mut self, resident: usize, watermark: usize);

	/// A collaborator chained `event` onto `head`, which was gone by the time the request was applied
	fn orphaned_chain(&mut self, head: EventHandle, event: &Event);
}

/// Default diagnostics: one `tracing` warning per report
#[derive(Debug, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
	fn invalid_code(&mut self, event: &Event) {
		warn!(
			handle = %event.handle(),
			kind = ?event.kind(),
			action = ?event.action(),
			"Invalid event code, dropping event"
		);
	}

	fn starvation(&mut self, resident: usize, watermark: usize) {
		warn!(resident, watermark, "Event list exceeds watermark, likely a non-completing event");
	}

	fn orphaned_chain(&mut self, head: EventHandle, event: &Event) {
		warn!(%head, handle = %event.handle(), action = ?event.action(), "Chain head no longer resident, dropping chained event");
	}
}

/// Routes events to the collaborator registered for their category
pub struct Dispatcher {
	collaborators: HashMap<Category, Box<dyn Collaborator>>,
	diagnostics: Box<dyn Diagnostics>,
}

impl Dispatcher {
	pub fn new() -> Self {
		Self::with_diagnostics(Box::new(TracingDiagnostics))
	}

	pub fn with_diagnostics(diagnostics: Box<dyn Diagnostics>) -> Self {
		Self {
			collaborators: HashMap::new(),
			diagnostics,
		}
	}

	/// Register `collaborator` for `category`, returning the one it replaces
	pub fn register(&mut self, category: Category, collaborator: Box<dyn Collaborator>) -> Option<Box<dyn Collaborator>> {
		debug!(%category, "Registering collaborator");
		self.collaborators.insert(category, collaborator)
	}

	pub fn unregister(&mut self, category: Category) -> Option<Box<dyn Collaborator>> {
		self.collaborators.remove(&category)
	}

	pub fn is_registered(&self, category: Category) -> bool {
		self.collaborators.contains_key(&category)
	}

	pub(crate) fn fire(&mut self, event: &Event, producer: &mut Producer) -> Handled {
		match self.collaborators.get_mut(&event.action().category()) {
			Some(collaborator) => collaborator.fire(event, producer),
			None => Handled::Unsupported,
		}
	}

	pub(crate) fn sample(&mut self, event: &Event, fraction: f64, producer: &mut Producer) -> Handled {
		match self.collaborators.get_mut(&event.action().category()) {
			Some(collaborator) => collaborator.sample(event, fraction, producer),
			None => Handled::Unsupported,
		}
	}

	pub(crate) fn diagnostics(&mut self) -> &mut dyn Diagnostics {
		self.diagnostics.as_mut()
	}
}

impl Default for Dispatcher {
	fn default() -> Self {
		Self::new()
	}
}
