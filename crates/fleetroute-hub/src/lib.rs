//! HTTP API and `WebSocket` broadcast hub for the Fleetroute routing
//! service.
//!
//! This crate provides an Axum server that exposes:
//!
//! - **REST endpoints** for importing maps, planning route orders, and
//!   reading order state
//! - **`WebSocket` endpoint** (`/ws`) where robots report telemetry and
//!   observers receive `order_update` events
//!
//! # Architecture
//!
//! [`AppState`] owns the map registry, the order registry, and the
//! [`BroadcastHub`]. The hub is the only component that writes telemetry
//! into orders; it does so under one lock per accepted report so all
//! subscribers observe the same order of updates. Each connection is
//! served by its own task with a bounded outbound queue, and a subscriber
//! that cannot keep up is dropped rather than slowing the others.

pub mod error;
pub mod handlers;
pub mod hub;
pub mod router;
pub mod server;
pub mod state;
pub mod ws;

pub use error::ApiError;
pub use hub::{BroadcastHub, BroadcastReport, SubscriberId, Subscription};
pub use router::build_router;
pub use server::{ServerError, serve, start_server};
pub use state::AppState;
