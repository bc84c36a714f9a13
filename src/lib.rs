// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Detector - Particle Detection Service
//!
//! Counts particle detections submitted over HTTP and raises an alarm when the
//! share of the monitored particle climbs above a fixed threshold:
//! - Lock-free atomic counters shared by every request handler
//! - Periodic ratio evaluation with deterministic fixed-point rounding
//! - Plain `key=value` operational log for lifecycle, checks and alarms
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │                    Detector Engine                    │
//! ├───────────────────────────────────────────────────────┤
//! │  ┌──────────┐   increment  ┌──────────┐   snapshot    │
//! │  │   API    │ ───────────→ │ Particle │ ←──────────┐  │
//! │  │  (axum)  │ ←─────────── │ Counter  │            │  │
//! │  └──────────┘   snapshot   └──────────┘            │  │
//! │                                          ┌─────────┴┐ │
//! │                             Scheduler →  │  Alarm   │ │
//! │                                          │Evaluator │ │
//! │                                          └────┬─────┘ │
//! │                                   ┌───────────↓─────┐ │
//! │                                   │    Event Bus    │ │
//! │                                   └─────────────────┘ │
//! └───────────────────────────────────────────────────────┘
//! ```

pub mod analysis;
pub mod api;
pub mod config;
pub mod core;
pub mod detection;
pub mod logging;
pub mod sensors;

// Re-exports for convenience
pub use analysis::FixedDecimal;
pub use config::Config;
pub use core::{Engine, Event, EventBus, EventPayload};
pub use detection::{AlarmEvaluator, Evaluation};
pub use sensors::{ParticleClass, ParticleCounter, Snapshot};

/// Detector version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Detector name
pub const NAME: &str = "Detector";
