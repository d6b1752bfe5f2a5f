//! Frame-driven cooperative event scheduler.
//!
//! Producers build timelines with [`Schedule::queue`] and [`Schedule::chain`];
//! the frame loop calls [`EventQueue::handle_events`] once per rendered frame
//! with the elapsed milliseconds, and every due event is dispatched to the
//! [`Collaborator`] registered for its [`Category`].

pub mod action;
mod behavior;
mod config;
mod dispatch;
mod error;
mod event;
mod producer;
mod queue;

pub use action::{Action, Category};
pub use behavior::Status;
pub use config::QueueConfig;
pub use dispatch::{Collaborator, Diagnostics, Dispatcher, Handled, TracingDiagnostics};
pub use error::{ReelError, Result};
pub use event::{Event, EventFlags, EventHandle, EventKind, Payload, PARAM_COUNT};
pub use producer::{Producer, Schedule};
pub use queue::{EventQueue, QueueSummary};

/// Time in milliseconds
pub type TimeMs = i64;
