//! Health check endpoints for orchestration probes

use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::domain::account::OwnerId;

use super::state::AppState;

/// Basic health response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Readiness response with per-component results
#[derive(Serialize)]
pub struct ReadyResponse {
    pub status: ComponentStatus,
    pub version: &'static str,
    pub checks: Vec<ComponentCheck>,
    pub latency_ms: u64,
}

#[derive(Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Healthy,
    Unhealthy,
}

/// Result of probing one backing component
#[derive(Serialize)]
pub struct ComponentCheck {
    pub name: &'static str,
    pub status: ComponentStatus,
    pub latency_ms: u64,
}

/// Returns 200 whenever the process is serving requests
///
/// Exempt from rate limiting so orchestration probes can never be starved by
/// tenant traffic.
pub async fn health_check() -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    };

    (StatusCode::OK, Json(response))
}

/// Liveness probe
pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Readiness probe verifying the key store and counter store are reachable
///
/// Any unreachable component makes the whole probe fail with 503 so the
/// instance is pulled from rotation instead of serving 503s to tenants.
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let start = Instant::now();

    let checks = vec![
        check_key_store(&state).await,
        check_counter_store(&state).await,
    ];

    let status = if checks
        .iter()
        .all(|c| c.status == ComponentStatus::Healthy)
    {
        ComponentStatus::Healthy
    } else {
        ComponentStatus::Unhealthy
    };

    let response = ReadyResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        checks,
        latency_ms: start.elapsed().as_millis() as u64,
    };

    let status_code = match status {
        ComponentStatus::Healthy => StatusCode::OK,
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(response))
}

async fn check_key_store(state: &AppState) -> ComponentCheck {
    let start = Instant::now();
    // A listing for a reserved owner exercises the store without touching
    // tenant data
    let probe = state
        .api_key_service
        .list(&OwnerId::new("readiness-probe"))
        .await;

    ComponentCheck {
        name: "key_store",
        status: match probe {
            Ok(_) => ComponentStatus::Healthy,
            Err(_) => ComponentStatus::Unhealthy,
        },
        latency_ms: start.elapsed().as_millis() as u64,
    }
}

async fn check_counter_store(state: &AppState) -> ComponentCheck {
    let start = Instant::now();
    let probe = state.rate_limiter.probe().await;

    ComponentCheck {
        name: "counter_store",
        status: match probe {
            Ok(_) => ComponentStatus::Healthy,
            Err(_) => ComponentStatus::Unhealthy,
        },
        latency_ms: start.elapsed().as_millis() as u64,
    }
}
