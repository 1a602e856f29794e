//! Broadcast hub: the live subscriber set and telemetry fan-out.
//!
//! Every subscriber owns a bounded outbound queue. A broadcast pass
//! enqueues without waiting, so a slow or dead subscriber never holds up
//! the others. Subscribers whose queue is full or closed are collected
//! during the pass and removed once it completes.
//!
//! Telemetry is accepted under a single lock covering both the order
//! update and the broadcast, so every subscriber sees updates in the
//! order the hub accepted them.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use fleetroute_core::OrderRegistry;
use fleetroute_types::{ClientMessage, ProtocolError, ServerMessage, Telemetry};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{Mutex, RwLock, mpsc};
use tracing::{debug, warn};
use validator::Validate;

/// Identifies one connection in the hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriberId(u64);

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// A freshly registered subscriber.
///
/// The greeting is already queued on `receiver` when this is returned.
#[derive(Debug)]
pub struct Subscription {
    /// Handle used for replies and to unsubscribe.
    pub id: SubscriberId,
    /// Outbound frames for this connection. Yields `None` once the hub
    /// has dropped the subscriber and the queue is drained.
    pub receiver: mpsc::Receiver<ServerMessage>,
}

/// Outcome of one broadcast pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Subscribers the message was queued for.
    pub delivered: usize,
    /// Subscribers removed because delivery failed.
    pub dropped: usize,
}

/// The set of connected subscribers plus the order registry that
/// telemetry is applied to.
#[derive(Debug)]
pub struct BroadcastHub {
    orders: Arc<OrderRegistry>,
    subscribers: RwLock<BTreeMap<SubscriberId, mpsc::Sender<ServerMessage>>>,
    accept: Mutex<()>,
    buffer: usize,
    next_id: AtomicU64,
}

impl BroadcastHub {
    /// Create a hub with `buffer` outbound slots per subscriber.
    ///
    /// A zero buffer is raised to one so the greeting always fits.
    pub fn new(orders: Arc<OrderRegistry>, buffer: usize) -> Self {
        Self {
            orders,
            subscribers: RwLock::new(BTreeMap::new()),
            accept: Mutex::new(()),
            buffer: buffer.max(1),
            next_id: AtomicU64::new(1),
        }
    }

    /// Add a connection to the live set and queue the greeting.
    pub async fn subscribe(&self) -> Subscription {
        let id = SubscriberId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (sender, receiver) = mpsc::channel(self.buffer);

        if let Err(e) = sender.try_send(ServerMessage::hello()) {
            warn!(subscriber = %id, "Failed to queue greeting: {e}");
        }

        let total = {
            let mut subscribers = self.subscribers.write().await;
            subscribers.insert(id, sender);
            subscribers.len()
        };
        debug!(subscriber = %id, total, "Subscriber joined");

        Subscription { id, receiver }
    }

    /// Remove a connection from the live set.
    ///
    /// Returns `false` if it was already gone.
    pub async fn unsubscribe(&self, id: SubscriberId) -> bool {
        let removed = self.subscribers.write().await.remove(&id).is_some();
        if removed {
            debug!(subscriber = %id, "Subscriber left");
        }
        removed
    }

    /// Number of live subscribers.
    pub async fn subscriber_count(&self) -> usize {
        self.subscribers.read().await.len()
    }

    /// Queue a message for every live subscriber.
    ///
    /// Subscribers whose queue is full or closed are removed after the
    /// pass.
    pub async fn broadcast(&self, message: &ServerMessage) -> BroadcastReport {
        let (total, dead) = {
            let subscribers = self.subscribers.read().await;
            let dead: Vec<SubscriberId> = subscribers
                .iter()
                .filter_map(|(id, sender)| match sender.try_send(message.clone()) {
                    Ok(()) => None,
                    Err(TrySendError::Full(_)) => {
                        warn!(subscriber = %id, "Subscriber queue full, dropping");
                        Some(*id)
                    }
                    Err(TrySendError::Closed(_)) => {
                        debug!(subscriber = %id, "Subscriber gone, dropping");
                        Some(*id)
                    }
                })
                .collect();
            (subscribers.len(), dead)
        };

        if !dead.is_empty() {
            let mut subscribers = self.subscribers.write().await;
            for id in &dead {
                subscribers.remove(id);
            }
        }

        BroadcastReport {
            delivered: total.saturating_sub(dead.len()),
            dropped: dead.len(),
        }
    }

    /// Send a reply to one subscriber, waiting for queue space.
    ///
    /// Returns `false` if the subscriber is no longer in the live set.
    pub async fn send_to(&self, id: SubscriberId, message: ServerMessage) -> bool {
        let sender = self.subscribers.read().await.get(&id).cloned();
        match sender {
            Some(sender) => sender.send(message).await.is_ok(),
            None => false,
        }
    }

    /// Validate a telemetry report, apply it to its order, and broadcast
    /// the resulting `order_update`.
    ///
    /// Reports for orders that do not exist are still broadcast; they just
    /// do not touch the registry.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::Validation`] if the report breaks a shape
    /// rule. Nothing is applied or broadcast in that case.
    pub async fn ingest(&self, telemetry: &Telemetry) -> Result<BroadcastReport, ProtocolError> {
        telemetry
            .validate()
            .map_err(|e| ProtocolError::Validation(e.to_string()))?;

        let _accepted = self.accept.lock().await;
        let applied = self.orders.apply_telemetry(telemetry).await;
        let report = self
            .broadcast(&ServerMessage::order_update(telemetry))
            .await;

        debug!(
            order_id = %telemetry.order_id,
            robot_id = %telemetry.robot_id,
            applied,
            delivered = report.delivered,
            dropped = report.dropped,
            "Telemetry accepted"
        );
        Ok(report)
    }

    /// Handle one inbound text frame and return the reply owed to its
    /// sender, if any.
    pub async fn handle_text(&self, text: &str) -> Option<ServerMessage> {
        let result = match ClientMessage::decode(text) {
            Ok(ClientMessage::Telemetry(telemetry)) => self.ingest(&telemetry).await.map(|_| None),
            Ok(ClientMessage::Subscribe(payload)) => Ok(Some(ServerMessage::Subscribed { payload })),
            Err(e) => Err(e),
        };

        result.unwrap_or_else(|e| {
            debug!(code = ?e.code(), "Rejected frame: {e}");
            Some(e.to_message())
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::float_cmp, clippy::panic)]

    use fleetroute_types::{
        ErrorCode, MapId, NodeId, OrderId, OrderState, RobotId, RobotState,
    };
    use tokio::sync::mpsc::error::TryRecvError;

    use super::*;

    fn telemetry(order_id: &OrderId, progress: f64) -> Telemetry {
        Telemetry {
            robot_id: RobotId::from("R1"),
            order_id: order_id.clone(),
            node: NodeId::from("B"),
            progress,
            speed: 10.0,
            state: RobotState::Moving,
        }
    }

    async fn hub_with_order(buffer: usize) -> (BroadcastHub, Arc<OrderRegistry>, OrderId) {
        let orders = Arc::new(OrderRegistry::new());
        let order = orders
            .create(
                MapId::from("m1"),
                vec![NodeId::from("A"), NodeId::from("B")],
                3.0,
                0.25,
            )
            .await;
        let hub = BroadcastHub::new(Arc::clone(&orders), buffer);
        (hub, orders, order.order_id)
    }

    async fn expect_hello(sub: &mut Subscription) {
        assert_eq!(sub.receiver.recv().await.unwrap(), ServerMessage::hello());
    }

    #[tokio::test]
    async fn subscribe_queues_greeting() {
        let (hub, _, _) = hub_with_order(4).await;
        let mut sub = hub.subscribe().await;
        expect_hello(&mut sub).await;
        assert_eq!(hub.subscriber_count().await, 1);
    }

    #[tokio::test]
    async fn every_subscriber_sees_every_update_in_order() {
        const UPDATES: u32 = 20;
        let (hub, orders, order_id) = hub_with_order(64).await;
        let mut subs = Vec::new();
        for _ in 0..3 {
            subs.push(hub.subscribe().await);
        }

        for i in 1..=UPDATES {
            let report = hub
                .ingest(&telemetry(&order_id, f64::from(i) / f64::from(UPDATES)))
                .await
                .unwrap();
            assert_eq!(report, BroadcastReport { delivered: 3, dropped: 0 });
        }

        for sub in &mut subs {
            expect_hello(sub).await;
            for i in 1..=UPDATES {
                let ServerMessage::OrderUpdate { progress, .. } = sub.receiver.recv().await.unwrap()
                else {
                    panic!("expected order_update");
                };
                assert_eq!(progress, f64::from(i) / f64::from(UPDATES));
            }
        }

        let order = orders.get(&order_id).await.unwrap();
        assert_eq!(order.state, OrderState::Moving);
        assert_eq!(order.telemetry.unwrap().progress, 1.0);
    }

    #[tokio::test]
    async fn full_subscriber_is_dropped_without_blocking_others() {
        let (hub, _, order_id) = hub_with_order(2).await;
        let mut live = hub.subscribe().await;
        let _stalled = hub.subscribe().await;
        expect_hello(&mut live).await;

        // Stalled queue: greeting plus first update fills both slots.
        let first = hub.ingest(&telemetry(&order_id, 0.1)).await.unwrap();
        assert_eq!(first, BroadcastReport { delivered: 2, dropped: 0 });
        assert!(live.receiver.recv().await.is_some());

        let second = hub.ingest(&telemetry(&order_id, 0.2)).await.unwrap();
        assert_eq!(second, BroadcastReport { delivered: 1, dropped: 1 });
        assert!(live.receiver.recv().await.is_some());
        assert_eq!(hub.subscriber_count().await, 1);

        let third = hub.ingest(&telemetry(&order_id, 0.3)).await.unwrap();
        assert_eq!(third, BroadcastReport { delivered: 1, dropped: 0 });
    }

    #[tokio::test]
    async fn closed_subscriber_is_dropped() {
        let (hub, _, order_id) = hub_with_order(8).await;
        let mut live = hub.subscribe().await;
        let gone = hub.subscribe().await;
        drop(gone);

        let report = hub.ingest(&telemetry(&order_id, 0.5)).await.unwrap();
        assert_eq!(report, BroadcastReport { delivered: 1, dropped: 1 });
        expect_hello(&mut live).await;
        assert!(matches!(
            live.receiver.recv().await,
            Some(ServerMessage::OrderUpdate { .. })
        ));
    }

    #[tokio::test]
    async fn unknown_order_is_broadcast_but_not_stored() {
        let orders = Arc::new(OrderRegistry::new());
        let hub = BroadcastHub::new(Arc::clone(&orders), 8);
        let mut sub = hub.subscribe().await;

        let report = hub
            .ingest(&telemetry(&OrderId::from("Onope0000"), 0.5))
            .await
            .unwrap();
        assert_eq!(report.delivered, 1);
        assert!(orders.is_empty().await);

        expect_hello(&mut sub).await;
        assert!(matches!(
            sub.receiver.recv().await,
            Some(ServerMessage::OrderUpdate { .. })
        ));
    }

    #[tokio::test]
    async fn invalid_telemetry_is_not_broadcast() {
        let (hub, orders, order_id) = hub_with_order(8).await;
        let mut sub = hub.subscribe().await;
        expect_hello(&mut sub).await;

        let mut bad = telemetry(&order_id, 1.5);
        assert!(matches!(
            hub.ingest(&bad).await,
            Err(ProtocolError::Validation(_))
        ));
        bad.progress = 0.5;
        bad.speed = 0.0;
        assert!(hub.ingest(&bad).await.is_err());
        bad.speed = 1.0;
        bad.robot_id = RobotId::from("");
        assert!(hub.ingest(&bad).await.is_err());

        assert_eq!(sub.receiver.try_recv().unwrap_err(), TryRecvError::Empty);
        assert_eq!(
            orders.get(&order_id).await.unwrap().state,
            OrderState::Created
        );
    }

    #[tokio::test]
    async fn handle_text_replies_to_sender() {
        let (hub, _, order_id) = hub_with_order(8).await;

        let reply = hub
            .handle_text(r#"{"type":"subscribe","payload":{"topic":"orders"}}"#)
            .await;
        assert_eq!(
            reply,
            Some(ServerMessage::Subscribed {
                payload: serde_json::json!({"topic": "orders"})
            })
        );

        let frame = serde_json::json!({
            "type": "telemetry",
            "payload": {"robot_id": "R1", "order_id": order_id, "node": "B", "progress": 0.4, "speed": 9.0}
        });
        assert_eq!(hub.handle_text(&frame.to_string()).await, None);

        for (text, code) in [
            ("not json", ErrorCode::ValidationError),
            (r#"{"payload":{}}"#, ErrorCode::ValidationError),
            (r#"{"type":"dance"}"#, ErrorCode::UnknownMessageType),
        ] {
            let Some(ServerMessage::Error { code: got, .. }) = hub.handle_text(text).await else {
                panic!("expected error reply for {text}");
            };
            assert_eq!(got, code, "frame {text}");
        }
    }

    #[tokio::test]
    async fn unsubscribe_closes_queue() {
        let (hub, _, _) = hub_with_order(8).await;
        let mut sub = hub.subscribe().await;

        assert!(hub.send_to(sub.id, ServerMessage::hello()).await);
        assert!(hub.unsubscribe(sub.id).await);
        assert!(!hub.unsubscribe(sub.id).await);
        assert!(!hub.send_to(sub.id, ServerMessage::hello()).await);

        expect_hello(&mut sub).await;
        expect_hello(&mut sub).await;
        assert!(sub.receiver.recv().await.is_none());
        assert_eq!(hub.subscriber_count().await, 0);
    }
}
