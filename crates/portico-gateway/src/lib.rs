//! The portico gateway: dynamic prefix dispatch over a reconciled table.
//!
//! One listening port serves two surfaces: the reserved `/api` admin
//! namespace (CRUD over persisted mappings, health) and a catch-all proxy
//! that forwards every other request to the first mapping whose prefix
//! matches, or to the fixed default upstream. A background reconciler
//! rebuilds the dispatch table from the store on a fixed period and
//! publishes it atomically; mapping changes take effect on the next tick.

#![deny(unsafe_code)]

pub mod admin;
pub mod config;
pub mod error;
pub mod forward;
pub mod reconcile;
pub mod server;

pub use config::GatewayConfig;
pub use reconcile::{Reconciler, ReconcilerHandle};
pub use server::{GatewayState, build_router, serve};
