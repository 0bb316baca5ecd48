//! Probe-then-branch upsert helpers
//!
//! The gateway offers no native create-or-update, so every upsert reads the
//! remote state first and branches on presence. Updates always use the id
//! the probe returned, never one re-derived from a cache.

use tracing::info;

use crate::client::{AdminClient, Route, RouteConfig};
use crate::config::PluginDefinition;
use crate::error::Result;

/// Create or update each plugin attached to a service, one at a time.
pub async fn upsert_service_plugins(
    client: &AdminClient,
    service_name: &str,
    plugins: &[PluginDefinition],
) -> Result<()> {
    for plugin in plugins {
        match client.find_service_plugin(service_name, &plugin.name).await? {
            Some(existing) => {
                info!(service = service_name, plugin = %plugin.name, "updating service plugin");
                client.update_plugin(&existing.id, plugin).await?;
            }
            None => {
                info!(service = service_name, plugin = %plugin.name, "creating service plugin");
                client.create_service_plugin(service_name, plugin).await?;
            }
        }
    }

    Ok(())
}

/// Create or update one route, matched against remote state by its derived
/// identity key. Returns the route as the gateway reports it, id included,
/// so the caller can thread the id into the route's plugin pass.
pub async fn upsert_route(
    client: &AdminClient,
    service_name: &str,
    config: &RouteConfig,
) -> Result<Route> {
    match client.find_route_by_config(service_name, config).await? {
        Some(existing) => {
            info!(service = service_name, route = existing.id, "updating route");
            client.update_route(&existing.id, config).await
        }
        None => {
            info!(service = service_name, "creating route");
            client.create_route(service_name, config).await
        }
    }
}

/// Create or update each plugin attached to a route, one at a time.
pub async fn upsert_route_plugins(
    client: &AdminClient,
    route_id: &str,
    plugins: &[PluginDefinition],
) -> Result<()> {
    for plugin in plugins {
        match client.find_route_plugin(route_id, &plugin.name).await? {
            Some(existing) => {
                info!(route = route_id, plugin = %plugin.name, "updating route plugin");
                client.update_plugin(&existing.id, plugin).await?;
            }
            None => {
                info!(route = route_id, plugin = %plugin.name, "creating route plugin");
                client.create_route_plugin(route_id, plugin).await?;
            }
        }
    }

    Ok(())
}
