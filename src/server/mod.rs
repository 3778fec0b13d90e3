//! Webhook server module
//!
//! Wires the promotion gate behind Drone's validation webhook protocol.

pub mod handler;
pub mod signature;

pub use handler::{GateState, ValidationPayload};

use crate::authz::PromotionGate;
use crate::config::ServerConfig;
use crate::util::bind_listener;
use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Build the webhook router
pub fn app(state: Arc<GateState>) -> Router {
    Router::new()
        .route("/", post(handler::validate_webhook))
        .route("/healthz", get(handler::healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the validation webhook server until Ctrl+C.
///
/// The gate is fully built before the listener is bound, so no request is
/// ever evaluated against a partially constructed index.
pub async fn run_server(config: &ServerConfig, gate: PromotionGate) -> anyhow::Result<()> {
    let secret = config.secret.clone();
    if secret.is_none() {
        warn!("No shared secret configured; accepting unsigned webhook calls");
    }

    let state = Arc::new(GateState { gate, secret });

    let listener = bind_listener(&config.host, config.port).await?;
    info!(addr = %listener.local_addr()?, "Validation webhook listening");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Validation webhook stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Received shutdown signal");
    }
}
