use smallvec::SmallVec;

use crate::error::Result;
use crate::{Event, EventHandle};

/// Anything that accepts new timelines
pub trait Schedule {
	/// Append `event` to the back of the list
	fn queue(&mut self, event: Event) -> Result<EventHandle>;

	/// Attach `event` after the last link of the chain that contains `head`
	fn chain(&mut self, head: EventHandle, event: Event) -> Result<EventHandle>;
}

#[derive(Debug)]
pub(crate) enum Staged {
	Queue(Event),
	Chain { head: EventHandle, event: Event },
}

/// Scheduling handle given to collaborators while the queue is mid-dispatch.
///
/// Requests are staged and applied as soon as the collaborator returns, before
/// the dispatched event's status is processed. A queued handle is final immediately.
/// A chained handle is provisional: the head is only checked when the request is
/// applied, and a head that is gone by then drops the event and is reported
/// through `Diagnostics::orphaned_chain`.
#[derive(Debug)]
pub struct Producer {
	next_id: u64,
	staged: SmallVec<[Staged; 4]>,
}

impl Producer {
	pub(crate) fn new(next_id: u64) -> Self {
		Self {
			next_id,
			staged: SmallVec::new(),
		}
	}

	pub(crate) fn into_parts(self) -> (u64, SmallVec<[Staged; 4]>) {
		(self.next_id, self.staged)
	}

	pub fn is_empty(&self) -> bool {
		self.staged.is_empty()
	}

	fn arm(&mut self, mut event: Event) -> Result<Event> {
		event.validate()?;
		event.arm(EventHandle(self.next_id));
		self.next_id += 1;
		Ok(event)
	}
}

impl Schedule for Producer {
	fn queue(&mut self, event: Event) -> Result<EventHandle> {
		let event = self.arm(event)?;
		let handle = event.handle();
		self.staged.push(Staged::Queue(event));
		Ok(handle)
	}

	fn chain(&mut self, head: EventHandle, event: Event) -> Result<EventHandle> {
		let event = self.arm(event)?;
		let handle = event.handle();
		self.staged.push(Staged::Chain { head, event });
		Ok(handle)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::action::{Action, FadeOp, ScriptOp};
	use crate::ReelError;

	#[test]
	fn handles_are_allocated_in_order() {
		let mut producer = Producer::new(10);
		let first = producer.queue(Event::one_shot(Action::Script(ScriptOp::Wake), 0)).unwrap();
		let second = producer.chain(first, Event::one_shot(Action::Script(ScriptOp::Exec), 0)).unwrap();
		assert_eq!(first, EventHandle(10));
		assert_eq!(second, EventHandle(11));

		let (next_id, staged) = producer.into_parts();
		assert_eq!(next_id, 12);
		assert_eq!(staged.len(), 2);
	}

	#[test]
	fn negative_duration_is_not_staged() {
		let mut producer = Producer::new(1);
		let result = producer.queue(Event::continuous(Action::PaletteFade(FadeOp::PaletteToBlack), 0, -5));
		assert!(matches!(result, Err(ReelError::NegativeDuration { duration: -5, .. })));
		assert!(producer.is_empty());
	}
}
