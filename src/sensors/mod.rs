//! Sensor module - particle classification and counting

mod counter;
mod particle;

pub use counter::{ParticleCounter, Snapshot};
pub use particle::{ParticleClass, DEFAULT_TARGET_LABEL, OTHER_LABEL};
