// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Lock-free particle counters shared by ingress and evaluation

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use super::ParticleClass;

/// Point-in-time copy of both counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub target: u64,
    pub other: u64,
}

impl Snapshot {
    pub fn total(&self) -> u64 {
        self.target.saturating_add(self.other)
    }
}

/// Running particle counts
///
/// Each counter is an independent atomic. A [`Snapshot`] loads them one after
/// the other, so the pair may straddle a concurrent increment; each value on
/// its own is always a complete prior count.
#[derive(Debug, Default)]
pub struct ParticleCounter {
    target: AtomicU64,
    other: AtomicU64,
}

impl ParticleCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&self, class: ParticleClass) {
        let counter = match class {
            ParticleClass::Target => &self.target,
            ParticleClass::Other => &self.other,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            target: self.target.load(Ordering::Relaxed),
            other: self.other.load(Ordering::Relaxed),
        }
    }
}
