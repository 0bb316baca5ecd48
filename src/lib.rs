//! Gateway-Sync: deployment-time sync of declarative service configuration
//! with a Kong-compatible gateway admin API
//!
//! This crate reads service/route/plugin definitions from a YAML file and
//! reconciles them against the gateway's admin REST API: resources missing
//! remotely are created, resources present remotely are updated in place,
//! and (in the update flow) remote resources absent from the config are
//! pruned.

pub mod client;
pub mod config;
pub mod error;
pub mod reconcile;

pub use crate::error::{Error, Result};
