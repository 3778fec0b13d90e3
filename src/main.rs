//! Drone promotion gate
//!
//! A Drone validation webhook that gates promote and rollback events with
//! per-user environment permissions.

use clap::Parser;
use promote_gate::{
    authz::PromotionGate,
    config::{LogFormat, load_config},
    server::run_server,
};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Drone promotion gate - authorize promote/rollback builds
#[derive(Parser, Debug)]
#[command(name = "promote-gate")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "PROMOTE_GATE_CONFIG")]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error); defaults to the
    /// configured logging.level
    #[arg(long, env = "PROMOTE_GATE_LOG_LEVEL")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Pick up DRONE_SECRET and friends from a local .env when present
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration
    let config = load_config(args.config.as_deref())
        .inspect_err(|e| eprintln!("Failed to load configuration: {e}"))?;

    // Initialize logging; RUST_LOG beats the flag, the flag beats the file
    let level = args.log_level.as_deref().unwrap_or(&config.logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    match config.logging.format {
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting promotion gate"
    );

    // Build the authorization gate once, before any traffic
    let gate = PromotionGate::from_config(&config.authz);
    info!(
        privileged_users = gate.privileged_count(),
        granted_users = gate.granted_user_count(),
        "Compiled permission index"
    );
    if gate.privileged_count() == 0 && gate.granted_user_count() == 0 {
        warn!("No privileged users or grants configured; every promote/rollback will be skipped");
    }

    run_server(&config.server, gate)
        .await
        .inspect_err(|e| error!(error = %e, "Server error"))?;

    Ok(())
}
