//! Axum router construction for the queue API.
//!
//! Assembles all routes into a single [`Router`] with CORS and request
//! tracing middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, put};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::admin;
use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET /api/health` -- liveness probe
/// - `GET|POST /api/groups` -- list / register groups
/// - `GET|PATCH|DELETE /api/groups/{id}` -- single group
/// - `GET /api/settings`, `PUT /api/settings/{key}` -- settings table
/// - `GET|POST /api/staff`, `DELETE /api/staff/{id}` -- staff roster
/// - `GET /api/queue/stats` -- aggregate counts
/// - `GET /api/queue/estimate` -- wait estimate
/// - `GET /api/queue/overdue` -- turns past their activity time
///
/// CORS allows any origin so the queue UI can be served from elsewhere.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(handlers::health))
        // Groups
        .route(
            "/api/groups",
            get(handlers::list_groups).post(handlers::create_group),
        )
        .route(
            "/api/groups/{id}",
            get(handlers::get_group)
                .patch(handlers::update_group)
                .delete(handlers::delete_group),
        )
        // Queue views
        .route("/api/queue/stats", get(handlers::queue_stats))
        .route("/api/queue/estimate", get(handlers::queue_estimate))
        .route("/api/queue/overdue", get(handlers::queue_overdue))
        // Admin
        .route("/api/settings", get(admin::list_settings))
        .route("/api/settings/{key}", put(admin::put_setting))
        .route(
            "/api/staff",
            get(admin::list_staff).post(admin::create_staff),
        )
        .route("/api/staff/{id}", axum::routing::delete(admin::delete_staff))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
