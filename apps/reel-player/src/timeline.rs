use std::path::Path;
use std::rc::Rc;

use anyhow::{Context, Result};
use event_reel::{Action, Event, EventKind, Payload, QueueConfig, Schedule, TimeMs, PARAM_COUNT};
use serde::Deserialize;

/// Timeline file layout
#[derive(Debug, Clone, Deserialize)]
pub struct TimelineFile {
	#[serde(default)]
	pub config: QueueConfig,
	pub cues: Vec<CueSpec>,
}

/// One cue plus the cues that follow it on the same chain
#[derive(Debug, Clone, Deserialize)]
pub struct CueSpec {
	pub kind: EventKind,
	pub action: Action,
	#[serde(default)]
	pub delay: TimeMs,
	#[serde(default)]
	pub duration: TimeMs,
	#[serde(default)]
	pub params: [i32; PARAM_COUNT],
	/// Caption text handed to the collaborator as payload
	#[serde(default)]
	pub caption: Option<String>,
	/// Survives scene teardown
	#[serde(default)]
	pub permanent: bool,
	#[serde(default)]
	pub then: Vec<CueSpec>,
}

impl CueSpec {
	fn to_event(&self, captions: &mut Vec<Rc<String>>) -> Event {
		let mut event = match self.kind {
			EventKind::OneShot => Event::one_shot(self.action, self.delay),
			EventKind::Continuous => Event::continuous(self.action, self.delay, self.duration),
			EventKind::Interval => Event::interval(self.action, self.delay),
			EventKind::Immediate => Event::immediate(self.action, self.delay, self.duration),
		}
		.with_params(self.params);

		if let Some(text) = &self.caption {
			let text = Rc::new(text.clone());
			event = event.with_payload(Payload::share(&text));
			captions.push(text);
		}
		if self.permanent {
			event = event.no_destroy();
		}
		event
	}

	fn successors<'a>(&'a self, out: &mut Vec<&'a CueSpec>) {
		for next in &self.then {
			out.push(next);
			next.successors(out);
		}
	}
}

impl TimelineFile {
	pub fn load(path: &Path) -> Result<Self> {
		let raw = std::fs::read_to_string(path).with_context(|| format!("reading timeline {}", path.display()))?;
		serde_json::from_str(&raw).with_context(|| format!("parsing timeline {}", path.display()))
	}

	/// Queue every cue; nested `then` lists are flattened onto the head's chain.
	///
	/// Caption text is owned by `captions`, the queue only borrows it.
	pub fn install(&self, queue: &mut impl Schedule, captions: &mut Vec<Rc<String>>) -> Result<usize> {
		let mut installed = 0;
		for cue in &self.cues {
			let head = queue.queue(cue.to_event(captions))?;
			installed += 1;

			let mut chain = Vec::new();
			cue.successors(&mut chain);
			for next in chain {
				queue.chain(head, next.to_event(captions))?;
				installed += 1;
			}
		}
		Ok(installed)
	}
}
