use std::cell::Cell;
use std::rc::Rc;

use event_reel::action::{ScriptOp, SceneOp};
use event_reel::{Action, Category, Collaborator, Dispatcher, Event, Handled, Producer, Schedule};
use tracing::{info, warn};

/// Stand-in for every presentation subsystem: logs each effect it is asked to perform
pub struct Stage {
	category: Category,
	effects: Rc<Cell<u64>>,
}

impl Stage {
	/// Dispatcher with a `Stage` registered for every category
	pub fn dispatcher(effects: &Rc<Cell<u64>>) -> Dispatcher {
		let mut dispatcher = Dispatcher::new();
		for category in Category::all() {
			dispatcher.register(
				category,
				Box::new(Stage {
					category,
					effects: Rc::clone(effects),
				}),
			);
		}
		dispatcher
	}

	fn caption(event: &Event) -> &str {
		event.payload().and_then(|payload| payload.downcast_ref::<String>()).map_or("", String::as_str)
	}
}

impl Collaborator for Stage {
	fn fire(&mut self, event: &Event, producer: &mut Producer) -> Handled {
		self.effects.set(self.effects.get() + 1);
		info!(
			category = %self.category,
			action = ?event.action(),
			params = ?event.params(),
			caption = Self::caption(event),
			"fire"
		);

		match event.action() {
			Action::Scene(SceneOp::End) => Handled::Halt,
			// Script threads that sleep ask to be woken again after `param 0` ms
			Action::Script(ScriptOp::Exec) if event.param(0) > 0 => {
				let wake = Event::one_shot(Action::Script(ScriptOp::Wake), i64::from(event.param(0)));
				if let Err(e) = producer.queue(wake) {
					warn!("Script wake not scheduled: {}", e);
				}
				Handled::Done
			}
			_ => Handled::Done,
		}
	}

	fn sample(&mut self, event: &Event, fraction: f64, _producer: &mut Producer) -> Handled {
		if !event.action().is_progressive() {
			return Handled::Unsupported;
		}
		self.effects.set(self.effects.get() + 1);
		info!(category = %self.category, action = ?event.action(), fraction, "sample");
		Handled::Done
	}
}
