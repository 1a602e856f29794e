//! Order registry: lifecycle of route orders keyed by order id.
//!
//! Orders are created by the planner and mutated in place by telemetry.
//! Telemetry for an order that does not exist is dropped without error,
//! since robots may start reporting before the order is created. State
//! transitions are not validated; the latest report always wins.

use std::collections::BTreeMap;

use chrono::Utc;
use fleetroute_types::{MapId, NodeId, Order, OrderId, OrderState, Telemetry};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::CoreError;

/// All orders known to the service.
#[derive(Debug, Default)]
pub struct OrderRegistry {
    orders: RwLock<BTreeMap<OrderId, Order>>,
}

impl OrderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new order in state [`OrderState::Created`] under a freshly
    /// allocated id and return the stored record.
    pub async fn create(
        &self,
        map_id: MapId,
        route: Vec<NodeId>,
        total_distance_cm: f64,
        eta_sec: f64,
    ) -> Order {
        let now = Utc::now();
        let mut orders = self.orders.write().await;

        let mut order_id = OrderId::generate();
        while orders.contains_key(&order_id) {
            order_id = OrderId::generate();
        }

        let order = Order {
            order_id: order_id.clone(),
            map_id,
            route,
            total_distance_cm,
            eta_sec,
            state: OrderState::Created,
            telemetry: None,
            created_at: now,
            updated_at: now,
        };
        orders.insert(order_id, order.clone());
        drop(orders);

        info!(
            order_id = %order.order_id,
            map_id = %order.map_id,
            hops = order.route.len(),
            total_distance_cm = order.total_distance_cm,
            eta_sec = order.eta_sec,
            "Order created"
        );
        order
    }

    /// Snapshot of a single order.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::OrderNotFound`] if no such order exists.
    pub async fn get(&self, order_id: &OrderId) -> Result<Order, CoreError> {
        self.orders
            .read()
            .await
            .get(order_id)
            .cloned()
            .ok_or_else(|| CoreError::OrderNotFound(order_id.clone()))
    }

    /// Overwrite an order's state and telemetry snapshot with a report.
    ///
    /// Returns `true` if the order existed and was updated, `false` if the
    /// report referenced an unknown order and was dropped.
    pub async fn apply_telemetry(&self, telemetry: &Telemetry) -> bool {
        let now = Utc::now();
        let mut orders = self.orders.write().await;
        let Some(order) = orders.get_mut(&telemetry.order_id) else {
            debug!(
                order_id = %telemetry.order_id,
                robot_id = %telemetry.robot_id,
                "Telemetry for unknown order dropped"
            );
            return false;
        };

        order.state = OrderState::from(telemetry.state);
        order.telemetry = Some(telemetry.snapshot(now));
        order.updated_at = now;
        true
    }

    /// All orders, newest first.
    pub async fn list(&self) -> Vec<Order> {
        let mut all: Vec<Order> = self.orders.read().await.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all
    }

    /// Number of orders.
    pub async fn len(&self) -> usize {
        self.orders.read().await.len()
    }

    /// Whether the registry holds no orders.
    pub async fn is_empty(&self) -> bool {
        self.orders.read().await.is_empty()
    }
}
