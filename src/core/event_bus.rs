// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Event bus for evaluator output

use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use crate::analysis::FixedDecimal;
use crate::sensors::Snapshot;

/// Event payloads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventPayload {
    /// An evaluation tick ran against this snapshot
    Checked { snapshot: Snapshot },
    /// The target ratio exceeded the threshold
    Alarm {
        ratio: FixedDecimal,
        threshold: FixedDecimal,
        snapshot: Snapshot,
    },
}

/// Generic event wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    pub payload: EventPayload,
}

impl Event {
    pub fn is_alarm(&self) -> bool {
        matches!(self.payload, EventPayload::Alarm { .. })
    }
}

/// Broadcast bus; publishing without subscribers is a no-op
pub struct EventBus {
    event_tx: broadcast::Sender<Event>,
    event_counter: AtomicU64,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (event_tx, _) = broadcast::channel(capacity);

        Self {
            event_tx,
            event_counter: AtomicU64::new(0),
        }
    }

    pub fn publish_check(&self, snapshot: Snapshot) {
        self.publish(EventPayload::Checked { snapshot });
    }

    pub fn publish_alarm(&self, ratio: FixedDecimal, threshold: FixedDecimal, snapshot: Snapshot) {
        self.publish(EventPayload::Alarm {
            ratio,
            threshold,
            snapshot,
        });
    }

    fn publish(&self, payload: EventPayload) {
        let id = self.event_counter.fetch_add(1, Ordering::Relaxed);
        let event = Event {
            id,
            timestamp: Utc::now(),
            payload,
        };
        let _ = self.event_tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.event_tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}
