//! Core engine module - orchestrates counting, evaluation and serving

mod engine;
mod scheduler;
mod event_bus;

pub use engine::{Engine, ALARM_CHECK_TASK};
pub use scheduler::Scheduler;
pub use event_bus::{EventBus, Event, EventPayload};
