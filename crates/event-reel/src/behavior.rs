use crate::dispatch::{Dispatcher, Handled};
use crate::{Event, EventKind, Producer, TimeMs};

/// Outcome of dispatching one event, consumed by the queue's loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
	/// Leave the event in place and move on
	Continue,
	/// The event is finished; remove it or promote its successor
	Delete,
	/// Stop scanning the list for this frame, keeping the event
	Break,
	/// Finished, and nothing after it may run this frame
	Halt,
	/// No capability for the event's action; handled like `Delete` and reported
	InvalidCode,
}

/// Run the kind-specific state machine for one event
pub(crate) fn step(event: &mut Event, dispatcher: &mut Dispatcher, producer: &mut Producer) -> Status {
	match event.kind() {
		EventKind::OneShot => one_shot(event, dispatcher, producer),
		EventKind::Continuous => continuous(event, dispatcher, producer),
		EventKind::Interval => Status::Delete,
		EventKind::Immediate => immediate(event, dispatcher, producer),
	}
}

/// Completion fraction in `[0, 1]`, or `None` while the event is not yet due.
///
/// A non-positive duration is complete on the first dispatch, whatever its countdown.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn completion(time: TimeMs, duration: TimeMs) -> Option<f64> {
	if duration <= 0 {
		return Some(1.0);
	}
	let fraction = (duration - time) as f64 / duration as f64;
	if fraction < 0.0 {
		None
	} else {
		Some(fraction.min(1.0))
	}
}

fn fired(handled: Handled) -> Status {
	match handled {
		Handled::Done => Status::Delete,
		Handled::Halt => Status::Halt,
		Handled::Unsupported => Status::InvalidCode,
	}
}

fn one_shot(event: &mut Event, dispatcher: &mut Dispatcher, producer: &mut Producer) -> Status {
	if event.time > 0 {
		return Status::Continue;
	}
	fired(dispatcher.fire(event, producer))
}

/// Deliver this call's samples. The first signalled call always starts from `0.0`.
fn deliver(event: &mut Event, fraction: f64, dispatcher: &mut Dispatcher, producer: &mut Producer) -> Handled {
	if !event.flags.signaled {
		event.flags.signaled = true;
		let handled = dispatcher.sample(event, 0.0, producer);
		if handled != Handled::Done || fraction <= 0.0 {
			return handled;
		}
	}
	dispatcher.sample(event, fraction, producer)
}

fn continuous(event: &mut Event, dispatcher: &mut Dispatcher, producer: &mut Producer) -> Status {
	let Some(fraction) = completion(event.time, event.duration()) else {
		return Status::Continue;
	};

	match deliver(event, fraction, dispatcher, producer) {
		Handled::Done if fraction >= 1.0 => Status::Delete,
		Handled::Done => Status::Continue,
		Handled::Halt if fraction >= 1.0 => Status::Halt,
		Handled::Halt => Status::Break,
		Handled::Unsupported => Status::InvalidCode,
	}
}

fn immediate(event: &mut Event, dispatcher: &mut Dispatcher, producer: &mut Producer) -> Status {
	let Some(fraction) = completion(event.time, event.duration()) else {
		return Status::Break;
	};

	// Instant actions hold the barrier for their whole duration, then fire once
	if !event.action().is_progressive() {
		event.flags.signaled = true;
		if fraction < 1.0 {
			return Status::Break;
		}
		return fired(dispatcher.fire(event, producer));
	}

	match deliver(event, fraction, dispatcher, producer) {
		Handled::Done if fraction >= 1.0 => Status::Delete,
		Handled::Halt if fraction >= 1.0 => Status::Halt,
		Handled::Done | Handled::Halt => Status::Break,
		Handled::Unsupported => Status::InvalidCode,
	}
}
