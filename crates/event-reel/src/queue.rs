use tracing::{debug, info, trace};

use crate::behavior::{self, Status};
use crate::dispatch::{Dispatcher, Handled};
use crate::error::{ReelError, Result};
use crate::producer::Staged;
use crate::{Category, Event, EventHandle, EventKind, Producer, QueueConfig, Schedule, TimeMs};

/// Counts of resident events, for diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueSummary {
	pub one_shot: usize,
	pub continuous: usize,
	pub interval: usize,
	pub immediate: usize,
	/// Successors waiting behind a head
	pub chained: usize,
	pub no_destroy: usize,
}

/// Ordered list of pending events, advanced once per frame
#[derive(Debug)]
pub struct EventQueue {
	events: Vec<Event>,
	config: QueueConfig,
	next_id: u64,
}

impl EventQueue {
	pub fn new(config: QueueConfig) -> Result<Self> {
		config.validate()?;
		Ok(Self {
			events: Vec::new(),
			config,
			next_id: 1,
		})
	}

	pub fn config(&self) -> &QueueConfig {
		&self.config
	}

	/// Number of list slots (heads); chained successors are not counted
	pub fn len(&self) -> usize {
		self.events.len()
	}

	pub fn is_empty(&self) -> bool {
		self.events.is_empty()
	}

	pub fn heads(&self) -> impl Iterator<Item = &Event> {
		self.events.iter()
	}

	pub fn get(&self, handle: EventHandle) -> Option<&Event> {
		self.events.iter().find_map(|event| event.find(handle))
	}

	pub fn contains(&self, handle: EventHandle) -> bool {
		self.get(handle).is_some()
	}

	pub fn summary(&self) -> QueueSummary {
		let mut summary = QueueSummary::default();
		for head in &self.events {
			match head.kind() {
				EventKind::OneShot => summary.one_shot += 1,
				EventKind::Continuous => summary.continuous += 1,
				EventKind::Interval => summary.interval += 1,
				EventKind::Immediate => summary.immediate += 1,
			}
			if head.flags().no_destroy {
				summary.no_destroy += 1;
			}
			summary.chained += head.links().count() - 1;
		}
		summary
	}

	/// Advance every event by `elapsed` ms and dispatch whatever is due.
	///
	/// Called exactly once per rendered frame by the owning loop.
	pub fn handle_events(&mut self, elapsed: u32, dispatcher: &mut Dispatcher) {
		self.advance_time(elapsed, dispatcher);

		let mut index = 0;
		while index < self.events.len() {
			let mut producer = Producer::new(self.next_id);
			let status = behavior::step(&mut self.events[index], dispatcher, &mut producer);
			self.apply_staged(producer, dispatcher);

			match status {
				Status::Continue => index += 1,
				Status::Delete => self.complete(index),
				Status::InvalidCode => {
					dispatcher.diagnostics().invalid_code(&self.events[index]);
					self.complete(index);
				}
				Status::Break => break,
				Status::Halt => {
					self.complete(index);
					break;
				}
			}
		}
	}

	/// Subtract `elapsed` from each event up to and including the first Immediate
	fn advance_time(&mut self, elapsed: u32, dispatcher: &mut Dispatcher) {
		let watermark = self.config.starvation_watermark;
		let resident = self.events.len();
		let mut visited = 0;

		for event in &mut self.events {
			event.time -= TimeMs::from(elapsed);
			visited += 1;

			if visited == watermark + 1 {
				dispatcher.diagnostics().starvation(resident, watermark);
			}

			if event.kind() == EventKind::Immediate {
				break;
			}
		}
	}

	/// Remove the event at `index`, or replace it with its successor carrying the overshoot.
	///
	/// The index is left in place so a promoted successor is evaluated in the same pass.
	fn complete(&mut self, index: usize) {
		let finished = &mut self.events[index];
		match finished.chain.take() {
			Some(next) => {
				let overshoot = finished.time;
				let mut next = *next;
				next.time += overshoot;
				trace!(finished = %finished.handle(), promoted = %next.handle(), overshoot, "Promoting chained event");
				*finished = next;
			}
			None => {
				trace!(finished = %finished.handle(), "Event complete");
				self.events.remove(index);
			}
		}
	}

	fn apply_staged(&mut self, producer: Producer, dispatcher: &mut Dispatcher) {
		let (next_id, staged) = producer.into_parts();
		self.next_id = next_id;

		for request in staged {
			match request {
				Staged::Queue(event) => self.events.push(event),
				Staged::Chain { head, event } => match self.tail_of(head) {
					Some(tail) => tail.chain = Some(Box::new(event)),
					None => dispatcher.diagnostics().orphaned_chain(head, &event),
				},
			}
		}
	}

	/// Last link of the resident chain containing `head`
	fn tail_of(&mut self, head: EventHandle) -> Option<&mut Event> {
		self.events.iter_mut().find_map(|slot| slot.find_mut(head)).map(Event::tail_mut)
	}

	fn allocate(&mut self, mut event: Event) -> Result<Event> {
		event.validate()?;
		event.arm(EventHandle(self.next_id));
		self.next_id += 1;
		Ok(event)
	}

	/// Drop every event whose head is not marked `no_destroy`, chains included
	pub fn clear_list(&mut self) {
		let before = self.events.len();
		self.events.retain(|event| event.flags().no_destroy);
		info!(removed = before - self.events.len(), kept = self.events.len(), "Cleared event list");
	}

	/// Like `clear_list`, but every discarded head of `category` fires once first.
	///
	/// Keeps a pending change (e.g. queued music) from being lost when a scene ends mid-countdown.
	pub fn clear_list_flushing(&mut self, category: Category, dispatcher: &mut Dispatcher) {
		let events = std::mem::take(&mut self.events);
		let mut removed = 0;

		for event in events {
			if event.flags().no_destroy {
				self.events.push(event);
				continue;
			}
			if event.action().category() == category {
				let mut producer = Producer::new(self.next_id);
				debug!(handle = %event.handle(), %category, "Flushing event before clear");
				let handled = dispatcher.fire(&event, &mut producer);
				self.apply_staged(producer, dispatcher);
				if handled == Handled::Unsupported {
					dispatcher.diagnostics().invalid_code(&event);
				}
			}
			removed += 1;
		}

		info!(removed, kept = self.events.len(), %category, "Cleared event list with flush");
	}

	/// Drop everything, `no_destroy` included
	pub fn free_list(&mut self) {
		info!(removed = self.events.len(), "Freed event list");
		self.events.clear();
	}
}

impl Schedule for EventQueue {
	fn queue(&mut self, event: Event) -> Result<EventHandle> {
		let event = self.allocate(event)?;
		let handle = event.handle();
		debug!(%handle, kind = ?event.kind(), action = ?event.action(), time = event.time(), "Queued event");
		self.events.push(event);
		Ok(handle)
	}

	fn chain(&mut self, head: EventHandle, event: Event) -> Result<EventHandle> {
		if !self.contains(head) {
			return Err(ReelError::UnknownEvent(head));
		}
		let event = self.allocate(event)?;
		debug!(%head, handle = %event.handle(), kind = ?event.kind(), action = ?event.action(), "Chained event");
		let handle = event.handle();
		let tail = self.tail_of(head).ok_or(ReelError::UnknownEvent(head))?;
		tail.chain = Some(Box::new(event));
		Ok(handle)
	}
}

impl Default for EventQueue {
	fn default() -> Self {
		Self {
			events: Vec::new(),
			config: QueueConfig::default(),
			next_id: 1,
		}
	}
}
