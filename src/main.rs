// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Detector - Particle Detection Service
//!
//! Accepts particle labels over HTTP, keeps running counts and raises an
//! alarm when the monitored particle's share exceeds the configured threshold.

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use detector::logging::{self, log_started, log_starting};
use detector::{Config, Engine, VERSION};

/// Detector - Particle Detection Service
#[derive(Parser, Debug)]
#[command(name = "detector")]
#[command(author = "Detector Project")]
#[command(version = VERSION)]
#[command(about = "Particle counting service with ratio alarm")]
struct Args {
    /// Configuration file path (created with defaults if missing)
    #[arg(short, long, env = "DETECTOR_CONFIG")]
    config: Option<PathBuf>,

    /// Listening port, overrides DETECTOR_PORT and the config file
    #[arg(short, long)]
    port: Option<u16>,

    /// Bind address
    #[arg(long)]
    host: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable trace-level logging
    #[arg(long)]
    trace: bool,
}

fn main() -> Result<()> {
    let starting = Utc::now();
    let args = Args::parse();

    let (mut config, config_path) = load_config(&args)?;
    config.apply_env()?;
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = args.host.clone() {
        config.server.host = host;
    }

    init_logging(&args, &config)?;
    log_starting(starting);
    info!("Detector v{}", VERSION);
    match config_path {
        Some(path) => info!("Configuration loaded from {:?}", path),
        None => info!("No configuration file, using defaults"),
    }

    let mut runtime = tokio::runtime::Builder::new_multi_thread();
    runtime.enable_all().thread_name("detector-worker");
    if config.server.worker_threads > 0 {
        runtime.worker_threads(config.server.worker_threads);
    }
    let rt = runtime.build()?;

    rt.block_on(run(config))
}

async fn run(config: Config) -> Result<()> {
    let mut engine = Engine::new(config)?;
    let addr = engine.start().await?;
    log_started(Utc::now());
    info!("Listening on http://{}", addr);
    info!("   Press Ctrl+C to shutdown");

    shutdown_signal().await?;
    info!("Shutdown signal received, cleaning up...");

    engine.stop().await?;
    info!("Detector shutdown complete");
    Ok(())
}

/// An explicit `--config` path is created if missing; the default path is
/// only read when it already exists.
fn load_config(args: &Args) -> Result<(Config, Option<PathBuf>)> {
    let path = match &args.config {
        Some(path) => {
            let config = Config::load_or_create(path)
                .with_context(|| format!("failed to load configuration from {:?}", path))?;
            return Ok((config, Some(path.clone())));
        }
        None => Config::default_path(),
    };

    if path.exists() {
        let config = Config::load(&path)
            .with_context(|| format!("failed to load configuration from {:?}", path))?;
        Ok((config, Some(path)))
    } else {
        Ok((Config::default(), None))
    }
}

/// Plain output by default, decorated with `--debug`/`--trace`
fn init_logging(args: &Args, config: &Config) -> Result<()> {
    let verbose = args.debug || args.trace;
    let default_level = if args.trace {
        "trace"
    } else if args.debug {
        "debug"
    } else {
        config.log_level.as_str()
    };
    let filter = logging::env_filter(default_level)?;

    let result = if verbose {
        tracing::subscriber::set_global_default(logging::verbose_subscriber(filter))
    } else {
        tracing::subscriber::set_global_default(logging::plain_subscriber(filter, std::io::stdout))
    };
    result.map_err(|e| anyhow!("failed to install logger: {}", e))
}

async fn shutdown_signal() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate = signal(SignalKind::terminate())?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => result?,
            _ = terminate.recv() => {}
        }
    }

    #[cfg(not(unix))]
    tokio::signal::ctrl_c().await?;

    Ok(())
}
