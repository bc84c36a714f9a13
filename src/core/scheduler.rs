// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Task scheduler for timed operations

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, warn};

struct ScheduledTask {
    period: Duration,
    ticks: Arc<AtomicU64>,
    panics: Arc<AtomicU64>,
    handle: JoinHandle<()>,
}

/// Runs named periodic tasks until shutdown
pub struct Scheduler {
    tasks: Arc<RwLock<HashMap<String, ScheduledTask>>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            tasks: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Run `task` every `period`, first after `initial_delay`.
    ///
    /// Late ticks are delayed rather than bursted. A panicking tick is logged
    /// and the schedule continues. The loop ends when `shutdown` fires or its
    /// sender is dropped. Re-using a name replaces and aborts the older task.
    pub async fn spawn_periodic<F>(
        &self,
        name: &str,
        initial_delay: Duration,
        period: Duration,
        mut shutdown: broadcast::Receiver<()>,
        task: F,
    ) where
        F: Fn() + Send + Sync + 'static,
    {
        let period = period.max(Duration::from_millis(1));
        let ticks = Arc::new(AtomicU64::new(0));
        let panics = Arc::new(AtomicU64::new(0));

        let handle = {
            let name = name.to_string();
            let ticks = ticks.clone();
            let panics = panics.clone();

            tokio::spawn(async move {
                let mut ticker = interval_at(Instant::now() + initial_delay, period);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

                loop {
                    tokio::select! {
                        _ = ticker.tick() => {
                            if catch_unwind(AssertUnwindSafe(&task)).is_err() {
                                panics.fetch_add(1, Ordering::Relaxed);
                                error!("Scheduled task '{}' panicked, continuing", name);
                            }
                            ticks.fetch_add(1, Ordering::Relaxed);
                        }
                        _ = shutdown.recv() => {
                            debug!("Scheduled task '{}' stopping", name);
                            break;
                        }
                    }
                }
            })
        };

        let mut tasks = self.tasks.write().await;
        if let Some(previous) = tasks.insert(
            name.to_string(),
            ScheduledTask {
                period,
                ticks,
                panics,
                handle,
            },
        ) {
            warn!("Replacing scheduled task '{}'", name);
            previous.handle.abort();
        }
        debug!("Scheduled task '{}' with interval {:?}", name, period);
    }

    /// Completed ticks for a task
    pub async fn ticks(&self, name: &str) -> Option<u64> {
        let tasks = self.tasks.read().await;
        tasks.get(name).map(|t| t.ticks.load(Ordering::Relaxed))
    }

    /// Ticks of a task that panicked
    pub async fn panics(&self, name: &str) -> Option<u64> {
        let tasks = self.tasks.read().await;
        tasks.get(name).map(|t| t.panics.load(Ordering::Relaxed))
    }

    pub async fn period(&self, name: &str) -> Option<Duration> {
        let tasks = self.tasks.read().await;
        tasks.get(name).map(|t| t.period)
    }

    /// Wait for every task to finish after shutdown has been signalled
    pub async fn join_all(&self) {
        let mut tasks = self.tasks.write().await;
        for (name, task) in tasks.drain() {
            if let Err(e) = task.handle.await {
                warn!("Scheduled task '{}' ended abnormally: {}", name, e);
            }
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
