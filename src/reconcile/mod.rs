//! Reconciliation of desired config against the gateway's registered state
//!
//! Every flow works the same way: probe the remote resource first, then
//! branch into create or update — never a blind create that leans on the
//! gateway's conflict reporting. The update flow additionally prunes remote
//! resources that are absent from the config.
//!
//! All loops over related resources are strictly sequential awaited calls.
//! The admin API returns 500s when writes to related resources are issued
//! concurrently (see Kong/kong#3440), so there is no batching and no
//! parallelism here on purpose.

mod flows;
mod prune;
mod upsert;


pub use flows::{register_service, register_services, remove_service, update_service};
pub use prune::{
    remove_plugins, remove_routes, route_plugins_removed_from_config,
    routes_removed_from_config, service_plugins_removed_from_config,
};
pub use upsert::{upsert_route, upsert_route_plugins, upsert_service_plugins};

use async_trait::async_trait;

use crate::error::Result;

/// Injected confirmation seam for the mutating flows
///
/// The update and remove flows ask before touching remote state; any answer
/// other than `YES` aborts the pending operation without error. The binary
/// supplies a stdin-backed implementation, tests supply canned answers.
#[async_trait]
pub trait ConfirmPrompt: Send + Sync {
    async fn confirm(&self, prompt: &str) -> Result<String>;
}

/// Prompt that confirms everything; used by `--yes` and in tests.
pub struct AutoConfirm;

#[async_trait]
impl ConfirmPrompt for AutoConfirm {
    async fn confirm(&self, _prompt: &str) -> Result<String> {
        Ok("YES".to_string())
    }
}
