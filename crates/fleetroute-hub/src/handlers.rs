//! REST endpoint handlers.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/health` | Liveness and registry sizes |
//! | `POST` | `/maps` | Import a map document from the body |
//! | `POST` | `/maps/import` | Import a map file from disk |
//! | `GET` | `/maps` | List imported maps |
//! | `POST` | `/orders` | Plan a route and open an order |
//! | `GET` | `/orders` | List orders, newest first |
//! | `GET` | `/orders/{order_id}` | Single order snapshot |

use std::path::PathBuf;
use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use fleetroute_core::plan_order;
use fleetroute_types::{CreateOrderResponse, MapData, MapSummary, Order, OrderId, RouteRequest};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;
use crate::state::AppState;

/// Query parameters for `POST /maps/import`.
#[derive(Debug, Deserialize)]
pub struct ImportQuery {
    /// Map file to read; `maps.default_path` when omitted.
    pub path: Option<PathBuf>,
}

/// Response body for a successful map import.
#[derive(Debug, Serialize)]
pub struct MapImportResponse {
    /// Always `true`.
    pub ok: bool,
    /// The imported map.
    #[serde(flatten)]
    pub summary: MapSummary,
}

impl From<MapSummary> for MapImportResponse {
    fn from(summary: MapSummary) -> Self {
        Self { ok: true, summary }
    }
}

// ---------------------------------------------------------------------------
// GET /health
// ---------------------------------------------------------------------------

/// Report liveness together with registry and hub sizes.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(serde_json::json!({
        "status": "ok",
        "maps": state.maps.len().await,
        "orders": state.orders.len().await,
        "subscribers": state.hub.subscriber_count().await,
    }))
}

// ---------------------------------------------------------------------------
// Maps
// ---------------------------------------------------------------------------

/// Import a map document posted as JSON.
///
/// # Errors
///
/// `400` if the body is not a map document or its graph cannot be built.
pub async fn create_map(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MapData>, JsonRejection>,
) -> Result<Json<MapImportResponse>, ApiError> {
    let Json(map) = payload?;
    let summary = state.maps.import(map).await?;
    Ok(Json(summary.into()))
}

/// Import a map file from the server's filesystem.
///
/// # Errors
///
/// `400` if the file cannot be read, parsed, or built into a graph.
pub async fn import_map(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ImportQuery>, QueryRejection>,
) -> Result<Json<MapImportResponse>, ApiError> {
    let Query(query) = query?;
    let path = query
        .path
        .unwrap_or_else(|| state.config.maps.default_path.clone());
    let summary = state.maps.import_file(&path).await?;
    Ok(Json(summary.into()))
}

/// List imported maps ordered by map id.
pub async fn list_maps(State(state): State<Arc<AppState>>) -> Json<Value> {
    let maps = state.maps.list().await;
    Json(serde_json::json!({
        "count": maps.len(),
        "maps": maps,
    }))
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

/// Compute a route and open an order for it.
///
/// # Errors
///
/// `404` if the map is not loaded; `400` for a malformed body, an
/// unknown node, or an unreachable goal.
pub async fn create_order(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RouteRequest>, JsonRejection>,
) -> Result<Json<CreateOrderResponse>, ApiError> {
    let Json(request) = payload?;
    let order = plan_order(&state.maps, &state.orders, &state.config.routing, request).await?;
    Ok(Json(CreateOrderResponse::from(&order)))
}

/// List all orders, newest first.
pub async fn list_orders(State(state): State<Arc<AppState>>) -> Json<Value> {
    let orders = state.orders.list().await;
    Json(serde_json::json!({
        "count": orders.len(),
        "orders": orders,
    }))
}

/// Fetch a single order.
///
/// # Errors
///
/// `404` if no such order exists.
pub async fn get_order(
    State(state): State<Arc<AppState>>,
    Path(order_id): Path<OrderId>,
) -> Result<Json<Order>, ApiError> {
    Ok(Json(state.orders.get(&order_id).await?))
}
