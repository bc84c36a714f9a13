//! Main detector engine - wires counters, evaluator and HTTP server

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use anyhow::{anyhow, Context, Result};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::api::{create_router, AppState};
use crate::config::Config;
use crate::detection::AlarmEvaluator;
use crate::sensors::ParticleCounter;
use super::{EventBus, Scheduler};

/// Name of the evaluator's scheduled task
pub const ALARM_CHECK_TASK: &str = "alarm-check";

/// Main detector engine
pub struct Engine {
    pub config: Arc<Config>,
    counter: Arc<ParticleCounter>,
    event_bus: Arc<EventBus>,
    scheduler: Scheduler,
    shutdown_tx: broadcast::Sender<()>,
    server: Option<JoinHandle<std::io::Result<()>>>,
    local_addr: Option<SocketAddr>,
    start_time: Option<Instant>,
}

impl Engine {
    pub fn new(config: Config) -> Result<Self> {
        config.validate().context("invalid configuration")?;
        let (shutdown_tx, _) = broadcast::channel(1);

        Ok(Self {
            config: Arc::new(config),
            counter: Arc::new(ParticleCounter::new()),
            event_bus: Arc::new(EventBus::default()),
            scheduler: Scheduler::new(),
            shutdown_tx,
            server: None,
            local_addr: None,
            start_time: None,
        })
    }

    /// Bind the listener, then start the evaluator schedule and the HTTP
    /// server.
    ///
    /// Returns once the listener is bound; requests are served in the
    /// background until [`Engine::stop`]. A failed bind leaves the engine
    /// untouched.
    pub async fn start(&mut self) -> Result<SocketAddr> {
        if let Some(addr) = self.local_addr {
            warn!("Engine already started on {}", addr);
            return Ok(addr);
        }

        info!("Starting detector engine...");
        let server_config = &self.config.server;
        let listener = TcpListener::bind((server_config.host.as_str(), server_config.port))
            .await
            .with_context(|| format!("failed to bind {}:{}", server_config.host, server_config.port))?;
        let addr = listener.local_addr()?;
        self.start_time = Some(Instant::now());

        let alarm = &self.config.alarm;
        let evaluator = AlarmEvaluator::new(self.counter.clone(), alarm.threshold, self.event_bus.clone());
        self.scheduler
            .spawn_periodic(
                ALARM_CHECK_TASK,
                alarm.initial_delay(),
                alarm.check_interval(),
                self.shutdown_tx.subscribe(),
                move || {
                    evaluator.tick();
                },
            )
            .await;

        let router = create_router(AppState::new(self.counter.clone(), &alarm.target_label));
        let mut shutdown = self.shutdown_tx.subscribe();
        self.server = Some(tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    let _ = shutdown.recv().await;
                })
                .await
        }));
        self.local_addr = Some(addr);

        info!(
            "Detector engine started on {} (target {:?}, threshold {})",
            addr, alarm.target_label, alarm.threshold
        );
        Ok(addr)
    }

    /// Stop the evaluator and drain in-flight requests
    pub async fn stop(&mut self) -> Result<()> {
        info!("Stopping detector engine...");
        let _ = self.shutdown_tx.send(());

        if let Some(server) = self.server.take() {
            server
                .await
                .map_err(|e| anyhow!("server task failed: {}", e))?
                .context("server error")?;
        }
        self.scheduler.join_all().await;
        self.local_addr = None;

        info!("Detector engine stopped");
        Ok(())
    }

    pub fn counter(&self) -> Arc<ParticleCounter> {
        self.counter.clone()
    }

    pub fn events(&self) -> Arc<EventBus> {
        self.event_bus.clone()
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    pub fn is_running(&self) -> bool {
        self.local_addr.is_some()
    }

    pub fn uptime(&self) -> u64 {
        self.start_time.map(|t| t.elapsed().as_secs()).unwrap_or(0)
    }
}
