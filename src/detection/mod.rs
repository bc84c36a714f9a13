//! Detection module - periodic ratio evaluation and alarm signalling

use std::sync::Arc;
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::analysis::FixedDecimal;
use crate::core::EventBus;
use crate::logging::{timestamp, MARKER_TARGET};
use crate::sensors::{ParticleCounter, Snapshot};

/// Outcome of one evaluation tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    /// No particles counted yet, ratio undefined
    Skipped,
    /// Ratio at or below the threshold
    Normal { ratio: FixedDecimal },
    /// Ratio above the threshold
    Alarm { ratio: FixedDecimal },
}

impl Evaluation {
    pub fn is_alarm(&self) -> bool {
        matches!(self, Evaluation::Alarm { .. })
    }
}

/// Compares the target share of all counted particles against a threshold
pub struct AlarmEvaluator {
    counter: Arc<ParticleCounter>,
    threshold: FixedDecimal,
    event_bus: Arc<EventBus>,
}

impl AlarmEvaluator {
    pub fn new(counter: Arc<ParticleCounter>, threshold: FixedDecimal, event_bus: Arc<EventBus>) -> Self {
        Self {
            counter,
            threshold,
            event_bus,
        }
    }

    pub fn threshold(&self) -> FixedDecimal {
        self.threshold
    }

    /// Evaluate a snapshot without side effects.
    ///
    /// The ratio is rounded half to even at the threshold's precision before
    /// comparing, so `1 / 1001` against `0.0004` compares `0.0010`.
    pub fn assess(&self, snapshot: Snapshot) -> Evaluation {
        let total = snapshot.total();
        let ratio = match FixedDecimal::ratio(snapshot.target, total, self.threshold.scale()) {
            Some(ratio) => ratio,
            None => return Evaluation::Skipped,
        };

        if ratio > self.threshold {
            Evaluation::Alarm { ratio }
        } else {
            Evaluation::Normal { ratio }
        }
    }

    /// Run one evaluation tick: log it, evaluate, raise the alarm if needed
    pub fn tick(&self) -> Evaluation {
        info!(target: MARKER_TARGET, checking = %timestamp(Utc::now()));

        let snapshot = self.counter.snapshot();
        self.event_bus.publish_check(snapshot);

        let evaluation = self.assess(snapshot);
        match evaluation {
            Evaluation::Skipped => {
                debug!("No particles counted, skipping evaluation");
            }
            Evaluation::Normal { ratio } => {
                debug!(%ratio, target = snapshot.target, other = snapshot.other, "Ratio within limits");
            }
            Evaluation::Alarm { ratio } => {
                warn!(target: MARKER_TARGET, %ratio, threshold = %self.threshold, "ALARM");
                self.event_bus.publish_alarm(ratio, self.threshold, snapshot);
            }
        }

        evaluation
    }
}
