//! Gateway admin API client
//!
//! A thin, typed wrapper over the gateway's admin REST surface: one network
//! round-trip per operation, 404 normalized to `None` on existence probes,
//! and the derived route identity key used wherever two routes must be
//! compared for equivalence.

mod admin;
mod resources;
mod route_key;

pub use admin::AdminClient;
pub use resources::{Page, Plugin, Route, RouteConfig, Service, ServiceRef};
pub use route_key::identity_key;
