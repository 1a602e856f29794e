//! Axum router construction.
//!
//! Assembles the REST routes and the `WebSocket` endpoint into a single
//! [`Router`] with CORS and request tracing enabled.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete router.
///
/// - `GET /health` -- liveness and registry sizes
/// - `POST /maps`, `GET /maps` -- import and list maps
/// - `POST /maps/import` -- import a map file from disk
/// - `POST /orders`, `GET /orders` -- plan and list orders
/// - `GET /orders/{order_id}` -- single order
/// - `GET /ws` -- telemetry and order updates over `WebSocket`
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        // Maps
        .route("/maps", get(handlers::list_maps).post(handlers::create_map))
        .route("/maps/import", post(handlers::import_map))
        // Orders
        .route(
            "/orders",
            get(handlers::list_orders).post(handlers::create_order),
        )
        .route("/orders/{order_id}", get(handlers::get_order))
        // WebSocket
        .route("/ws", get(ws::ws_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
