//! Route request to stored order.
//!
//! `graph lookup -> shortest path -> ETA -> order registry`.

use fleetroute_graph::shortest_path;
use fleetroute_types::{Order, RouteRequest};
use tracing::debug;

use crate::config::RoutingConfig;
use crate::error::CoreError;
use crate::maps::MapRegistry;
use crate::orders::OrderRegistry;

/// Compute a route for `request` and open an order for it.
///
/// Requests that do not name an algorithm use
/// [`RoutingConfig::default_algorithm`].
///
/// # Errors
///
/// Returns [`CoreError::MapNotLoaded`] if the map has not been imported,
/// or [`CoreError::Graph`] if an endpoint is unknown or no path exists.
/// No order is created on failure.
pub async fn plan_order(
    maps: &MapRegistry,
    orders: &OrderRegistry,
    routing: &RoutingConfig,
    request: RouteRequest,
) -> Result<Order, CoreError> {
    let graph = maps
        .graph(&request.map_id)
        .await
        .ok_or_else(|| CoreError::MapNotLoaded(request.map_id.clone()))?;

    let algorithm = request.algorithm.unwrap_or(routing.default_algorithm);
    let found = shortest_path(&graph, &request.from_node, &request.to_node, algorithm)?;
    let eta_sec = routing.eta.estimate(&found.path, found.cost);

    debug!(
        map_id = %request.map_id,
        from = %request.from_node,
        to = %request.to_node,
        algorithm = %algorithm,
        cost = found.cost,
        "Route computed"
    );

    Ok(orders
        .create(request.map_id, found.path, found.cost, eta_sec)
        .await)
}
