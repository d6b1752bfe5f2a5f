use thiserror::Error;

use crate::{EventHandle, EventKind, TimeMs};

pub type Result<T> = std::result::Result<T, ReelError>;

#[derive(Debug, Error)]
pub enum ReelError {
	#[error("{kind:?} event has negative duration: {duration}ms")]
	NegativeDuration { kind: EventKind, duration: TimeMs },

	#[error("Event not resident in queue: {0}")]
	UnknownEvent(EventHandle),

	#[error("Invalid queue configuration: {0}")]
	InvalidConfig(String),
}

impl ReelError {
	/// A stale handle only means the head already completed; the caller can queue afresh
	pub fn is_recoverable(&self) -> bool {
		matches!(self, Self::UnknownEvent(_))
	}
}
