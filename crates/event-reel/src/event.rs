use std::any::Any;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::{ReelError, Result};
use crate::{Action, TimeMs};

/// Number of generic numeric parameters an event carries
pub const PARAM_COUNT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
	/// Fires one effect once its countdown elapses
	OneShot,
	/// Samples its effect at a completion fraction across its duration
	Continuous,
	/// Completes on first dispatch
	Interval,
	/// Like `Continuous`, but nothing after it runs until it completes
	Immediate,
}

impl EventKind {
	/// Kinds whose countdown also covers a duration
	pub fn uses_duration(&self) -> bool {
		matches!(self, EventKind::Continuous | EventKind::Immediate)
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventFlags {
	pub signaled: bool,
	pub no_destroy: bool,
}

/// Stable identity of a queued or chained event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventHandle(pub(crate) u64);

impl EventHandle {
	pub(crate) const UNASSIGNED: EventHandle = EventHandle(0);
}

impl fmt::Display for EventHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "event#{}", self.0)
	}
}

/// Opaque producer data attached to an event.
///
/// The producer keeps its own `Rc`; the queue only holds a shared reference and
/// never looks inside, so dropping an event never releases producer memory.
#[derive(Clone)]
pub struct Payload(Rc<dyn Any>);

impl Payload {
	pub fn share<T: Any>(value: &Rc<T>) -> Self {
		Self(Rc::clone(value) as Rc<dyn Any>)
	}

	pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
		self.0.downcast_ref::<T>()
	}
}

impl fmt::Debug for Payload {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("Payload(..)")
	}
}

/// One scheduled action plus its owned continuation
#[derive(Debug, Clone)]
pub struct Event {
	pub(crate) id: EventHandle,
	kind: EventKind,
	action: Action,
	pub(crate) flags: EventFlags,
	params: [i32; PARAM_COUNT],
	payload: Option<Payload>,
	pub(crate) time: TimeMs,
	duration: TimeMs,
	pub(crate) chain: Option<Box<Event>>,
}

impl Event {
	fn new(kind: EventKind, action: Action, delay: TimeMs, duration: TimeMs) -> Self {
		Self {
			id: EventHandle::UNASSIGNED,
			kind,
			action,
			flags: EventFlags::default(),
			params: [0; PARAM_COUNT],
			payload: None,
			time: delay,
			duration,
			chain: None,
		}
	}

	pub fn one_shot(action: Action, delay: TimeMs) -> Self {
		Self::new(EventKind::OneShot, action, delay, 0)
	}

	pub fn continuous(action: Action, delay: TimeMs, duration: TimeMs) -> Self {
		Self::new(EventKind::Continuous, action, delay, duration)
	}

	pub fn immediate(action: Action, delay: TimeMs, duration: TimeMs) -> Self {
		Self::new(EventKind::Immediate, action, delay, duration)
	}

	pub fn interval(action: Action, delay: TimeMs) -> Self {
		Self::new(EventKind::Interval, action, delay, 0)
	}

	pub fn with_params(mut self, params: [i32; PARAM_COUNT]) -> Self {
		self.params = params;
		self
	}

	/// Set a single parameter; indices past `PARAM_COUNT` are ignored
	pub fn with_param(mut self, index: usize, value: i32) -> Self {
		if let Some(slot) = self.params.get_mut(index) {
			*slot = value;
		}
		self
	}

	pub fn with_payload(mut self, payload: Payload) -> Self {
		self.payload = Some(payload);
		self
	}

	/// Survive `EventQueue::clear_list`
	pub fn no_destroy(mut self) -> Self {
		self.flags.no_destroy = true;
		self
	}

	pub fn handle(&self) -> EventHandle {
		self.id
	}

	pub fn kind(&self) -> EventKind {
		self.kind
	}

	pub fn action(&self) -> Action {
		self.action
	}

	pub fn flags(&self) -> EventFlags {
		self.flags
	}

	pub fn params(&self) -> &[i32; PARAM_COUNT] {
		&self.params
	}

	pub fn param(&self, index: usize) -> i32 {
		self.params.get(index).copied().unwrap_or(0)
	}

	pub fn payload(&self) -> Option<&Payload> {
		self.payload.as_ref()
	}

	/// Milliseconds left until the event is fully complete
	pub fn time(&self) -> TimeMs {
		self.time
	}

	pub fn duration(&self) -> TimeMs {
		self.duration
	}

	/// The successor that replaces this event when it completes
	pub fn next(&self) -> Option<&Event> {
		self.chain.as_deref()
	}

	/// This event followed by every chained successor
	pub fn links(&self) -> impl Iterator<Item = &Event> {
		std::iter::successors(Some(self), |event| event.next())
	}

	pub(crate) fn validate(&self) -> Result<()> {
		if self.kind.uses_duration() && self.duration < 0 {
			return Err(ReelError::NegativeDuration {
				kind: self.kind,
				duration: self.duration,
			});
		}
		Ok(())
	}

	/// Assign identity and fold the duration into the countdown
	pub(crate) fn arm(&mut self, id: EventHandle) {
		self.id = id;
		self.chain = None;
		if self.kind.uses_duration() {
			self.time += self.duration;
		}
	}

	pub(crate) fn tail_mut(&mut self) -> &mut Event {
		match self.chain {
			Some(ref mut next) => next.tail_mut(),
			None => self,
		}
	}

	pub(crate) fn find(&self, id: EventHandle) -> Option<&Event> {
		self.links().find(|event| event.id == id)
	}

	pub(crate) fn find_mut(&mut self, id: EventHandle) -> Option<&mut Event> {
		if self.id == id {
			return Some(self);
		}
		match self.chain {
			Some(ref mut next) => next.find_mut(id),
			None => None,
		}
	}
}
