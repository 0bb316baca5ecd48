//! Prune pass: remote resources absent from desired config
//!
//! Runs only in the update flow, after desired state has been applied. The
//! difference is computed over the complete remote collection using the
//! plugin name or the route's derived identity key. An empty desired
//! collection prunes everything remote in that collection.

use std::collections::HashSet;

use tracing::info;

use crate::client::{identity_key, AdminClient, Plugin, Route, RouteConfig};
use crate::config::PluginDefinition;
use crate::error::Result;

/// Plugins registered on a service but no longer present in the config.
pub async fn service_plugins_removed_from_config(
    client: &AdminClient,
    service_name: &str,
    desired: &[PluginDefinition],
) -> Result<Vec<Plugin>> {
    let registered = client.list_service_plugins(service_name).await?;
    Ok(stale_plugins(registered, desired))
}

/// Plugins registered on a route but no longer present in the config.
pub async fn route_plugins_removed_from_config(
    client: &AdminClient,
    route_id: &str,
    desired: &[PluginDefinition],
) -> Result<Vec<Plugin>> {
    let registered = client.list_route_plugins(route_id).await?;
    Ok(stale_plugins(registered, desired))
}

/// Routes registered on a service but no longer present in the config,
/// matched by derived identity key.
///
/// An empty desired set marks the entire remote collection stale, keyless
/// routes included. When desired entries exist, remote routes with an empty
/// key are left alone: they cannot correspond to any config entry.
pub async fn routes_removed_from_config(
    client: &AdminClient,
    service_name: &str,
    desired: &[RouteConfig],
) -> Result<Vec<Route>> {
    let registered = client.list_routes(service_name).await?;

    if desired.is_empty() {
        return Ok(registered);
    }

    let desired_keys: HashSet<String> = desired
        .iter()
        .map(identity_key)
        .filter(|key| !key.is_empty())
        .collect();

    Ok(registered
        .into_iter()
        .filter(|route| {
            let key = identity_key(&route.config);
            !key.is_empty() && !desired_keys.contains(&key)
        })
        .collect())
}

/// Delete the given plugins, one at a time.
pub async fn remove_plugins(client: &AdminClient, plugins: &[Plugin]) -> Result<()> {
    for plugin in plugins {
        info!(plugin = %plugin.name, id = %plugin.id, "removing plugin");
        client.delete_plugin(&plugin.id).await?;
    }

    Ok(())
}

/// Delete the given routes, one at a time.
pub async fn remove_routes(client: &AdminClient, routes: &[Route]) -> Result<()> {
    for route in routes {
        info!(route = %identity_key(&route.config), id = %route.id, "removing route");
        client.delete_route(&route.id).await?;
    }

    Ok(())
}

fn stale_plugins(registered: Vec<Plugin>, desired: &[PluginDefinition]) -> Vec<Plugin> {
    let desired_names: HashSet<&str> = desired.iter().map(|plugin| plugin.name.as_str()).collect();

    registered
        .into_iter()
        .filter(|plugin| !desired_names.contains(plugin.name.as_str()))
        .collect()
}
