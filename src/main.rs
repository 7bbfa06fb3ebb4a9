//! `metronomed` — the metronome daemon.
//!
//! Resolves configuration (CLI > env > settings files > defaults), wires the
//! logging pipeline, and runs a heartbeat work unit under the [`Host`]
//! supervisor until a termination signal arrives.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use metronome::{
    AppConfig, CorrelationId, Host, LogWriter, OverlapPolicy, Overrides, Subscribe, WorkError,
    WorkFn, WorkRef, resolve,
};

#[derive(Parser, Debug)]
#[clap(name = "metronomed", about = "Supervised periodic worker daemon")]
struct CliArgs {
    /// Directory containing metronome.toml / metronome.<env>.toml.
    #[clap(long, default_value = ".")]
    config_dir: PathBuf,

    /// Environment name selecting the environment-specific settings file.
    #[clap(long)]
    environment: Option<String>,

    /// Delay before the first tick, in milliseconds.
    #[clap(long)]
    initial_delay_ms: Option<u64>,

    /// Interval between tick starts, in milliseconds.
    #[clap(long)]
    interval_ms: Option<u64>,

    /// Behavior when a tick falls due while the previous one still runs.
    #[clap(long, value_enum)]
    overlap: Option<OverlapPolicy>,

    /// Maximum seconds to wait for in-flight ticks during shutdown.
    #[clap(long)]
    grace_secs: Option<u64>,

    /// Maximum seconds to wait for log queues to drain on exit.
    #[clap(long)]
    flush_timeout_secs: Option<u64>,

    /// Enable verbose logging.
    #[clap(long)]
    debug: bool,
}

impl From<&CliArgs> for Overrides {
    fn from(args: &CliArgs) -> Self {
        Overrides {
            initial_delay_ms: args.initial_delay_ms,
            interval_ms: args.interval_ms,
            overlap: args.overlap,
            grace_secs: args.grace_secs,
            flush_timeout_secs: args.flush_timeout_secs,
            debug: args.debug.then_some(true),
        }
    }
}

fn init_tracing(cfg: &AppConfig) {
    let default_directives = if cfg.host.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    let cfg = resolve(&args.config_dir, args.environment.as_deref(), (&args).into())?;
    init_tracing(&cfg);

    info!(
        initial_delay_ms = cfg.schedule.initial_delay.as_millis() as u64,
        interval_ms = cfg.schedule.interval.as_millis() as u64,
        overlap = cfg.schedule.overlap.as_label(),
        "starting metronomed"
    );

    let work: WorkRef = WorkFn::arc("heartbeat", |correlation: CorrelationId| async move {
        info!(target: "metronome::work", %correlation, "heartbeat");
        Ok::<_, WorkError>(())
    });
    let subscribers: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];

    let host = Host::new(cfg, work, subscribers);
    host.run().await?;

    info!("metronomed stopped");
    Ok(())
}
