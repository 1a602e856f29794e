//! Route-order pipeline for the Fleetroute routing service.
//!
//! Ties the graph search to the stateful parts of the service: imported
//! maps, the ETA model, and the order registry that telemetry later
//! mutates.
//!
//! # Modules
//!
//! - [`config`] -- Typed YAML configuration with environment overrides.
//! - [`error`] -- [`CoreError`] for map, order, and routing failures.
//! - [`eta`] -- Travel-time estimate from distance and turn count.
//! - [`maps`] -- [`MapRegistry`]: imported maps and their compiled graphs.
//! - [`orders`] -- [`OrderRegistry`]: order lifecycle and telemetry application.
//! - [`planner`] -- [`plan_order`]: route request to stored order.
//!
//! The registries are plain owned values. The process creates one of each
//! at startup and shares it behind an [`Arc`](std::sync::Arc); tests create
//! their own.

pub mod config;
pub mod error;
pub mod eta;
pub mod maps;
pub mod orders;
pub mod planner;

pub use config::{
    ConfigError, HubConfig, LoggingConfig, MapsConfig, RoutingConfig, ServerConfig, ServiceConfig,
};
pub use error::CoreError;
pub use eta::{DEFAULT_AVG_SPEED_CM_S, DEFAULT_TURN_PENALTY_S, EtaModel, estimate_eta};
pub use maps::MapRegistry;
pub use orders::OrderRegistry;
pub use planner::plan_order;
