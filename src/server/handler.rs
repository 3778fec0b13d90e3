//! Validation webhook handler
//!
//! Implements the Drone validation extension protocol: Drone POSTs the
//! build/repo payload before a build runs, and the response status decides
//! its fate:
//!
//! - `204` — the build may proceed
//! - `498` — skip the build (authorization denied)
//! - `400` — the request itself is bad (unverifiable signature, malformed
//!   payload); distinct from a denial

use crate::authz::{AuthzRequest, PromotionGate};
use crate::server::signature;
use crate::util::SecretString;
use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

/// Drone's status code for "skip this build"
const STATUS_SKIP: u16 = 498;

/// Shared webhook state
pub struct GateState {
    /// The authorization gate, built once at startup
    pub gate: PromotionGate,
    /// Shared secret for request signature verification; `None` disables
    /// verification (local testing only)
    pub secret: Option<SecretString>,
}

/// Drone validation webhook payload (the fields the gate consumes)
#[derive(Debug, Deserialize)]
pub struct ValidationPayload {
    #[serde(default)]
    pub build: BuildInfo,
    #[serde(default)]
    pub repo: RepoInfo,
}

#[derive(Debug, Default, Deserialize)]
pub struct BuildInfo {
    #[serde(default)]
    pub event: String,
    #[serde(default)]
    pub trigger: String,
    /// Target environment for promote/rollback events
    #[serde(default)]
    pub deploy_to: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct RepoInfo {
    #[serde(default)]
    pub name: String,
}

impl From<&ValidationPayload> for AuthzRequest {
    fn from(payload: &ValidationPayload) -> Self {
        AuthzRequest::new(
            &payload.build.event,
            &payload.build.trigger,
            &payload.build.deploy_to,
            &payload.repo.name,
        )
    }
}

/// Handle `POST /` validation calls from Drone
pub async fn validate_webhook(
    State(state): State<Arc<GateState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Some(secret) = &state.secret
        && let Err(e) = signature::verify(secret, &headers, &body)
    {
        warn!(error = %e, "Rejecting unverifiable webhook call");
        return error_response(StatusCode::BAD_REQUEST, &e.to_string());
    }

    let payload: ValidationPayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "Rejecting malformed webhook payload");
            return error_response(StatusCode::BAD_REQUEST, "malformed validation payload");
        }
    };

    let request = AuthzRequest::from(&payload);
    match state.gate.require(&request) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(skip) => {
            info!(
                trigger = %request.trigger,
                event = %request.event,
                environment = %request.environment,
                repo = %request.repo,
                "Skipping build"
            );
            let status =
                StatusCode::from_u16(STATUS_SKIP).unwrap_or(StatusCode::UNPROCESSABLE_ENTITY);
            error_response(status, &skip.to_string())
        }
    }
}

/// Handle `GET /healthz` liveness checks
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}
