use axum::{middleware, routing::get, routing::post, Router};
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use super::health;
use super::keys;
use super::middleware::rate_limit::rate_limit_middleware;
use super::state::AppState;
use crate::domain::rate_limit::RouteClass;

/// Create the full router with application state
///
/// Every served route sits behind the `general` admission class; the health
/// paths are admitted through its bypass list. The remaining classes guard
/// routes mounted by the surrounding deployment.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/live", get(health::live_check))
        .route("/ready", get(health::ready_check))
        .route("/api/validate-key", get(keys::validate_key))
        .route("/api/keys", post(keys::create_api_key).get(keys::list_api_keys))
        .route("/api/keys/{id}/revoke", post(keys::revoke_api_key))
        .layer(middleware::from_fn_with_state(
            (state.clone(), RouteClass::General),
            rate_limit_middleware,
        ))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
}
