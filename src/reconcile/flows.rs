//! Top-level reconciliation flows: register, update, remove
//!
//! Ordering within a flow is load-bearing: the service before its plugins,
//! plugins before routes, each route before its own plugins, the prune pass
//! last. Each step re-reads remote state through the client instead of
//! trusting a local snapshot. Any failure aborts the whole pass; partial
//! remote mutations stay in place (there is no compensating transaction).

use tracing::{info, warn};

use crate::client::AdminClient;
use crate::config::{project_route, ServiceDefinition};
use crate::error::Result;
use crate::reconcile::prune::{
    remove_plugins, remove_routes, route_plugins_removed_from_config, routes_removed_from_config,
    service_plugins_removed_from_config,
};
use crate::reconcile::upsert::{upsert_route, upsert_route_plugins, upsert_service_plugins};
use crate::reconcile::ConfirmPrompt;

/// Register every given service with the gateway, in order.
pub async fn register_services(
    client: &AdminClient,
    services: &[&ServiceDefinition],
) -> Result<()> {
    for definition in services {
        register_service(client, definition).await?;
    }

    Ok(())
}

/// Create one service with its plugins and routes.
///
/// A service that already exists is skipped with a log line — the register
/// flow never touches existing services; that is the update flow's job.
pub async fn register_service(client: &AdminClient, definition: &ServiceDefinition) -> Result<()> {
    if client.service_exists(&definition.name).await? {
        info!(service = %definition.name, "service already exists, skipping");
        return Ok(());
    }

    info!(service = %definition.name, upstream = %definition.url, "creating service");
    client.create_service(&definition.name, &definition.url).await?;

    upsert_service_plugins(client, &definition.name, &definition.plugins).await?;

    for route_definition in &definition.routes {
        let descriptor = project_route(route_definition);
        let route = upsert_route(client, &definition.name, &descriptor.config).await?;
        upsert_route_plugins(client, &route.id, &descriptor.plugins).await?;
    }

    Ok(())
}

/// Bring one registered service in line with its config: upsert every
/// plugin and route present in the config, then prune everything remote
/// that the config no longer mentions.
pub async fn update_service(
    client: &AdminClient,
    definition: &ServiceDefinition,
    prompt: &dyn ConfirmPrompt,
) -> Result<()> {
    if !client.service_exists(&definition.name).await? {
        warn!(service = %definition.name, "service does not exist, nothing to update");
        return Ok(());
    }

    let answer = prompt
        .confirm(&format!(
            "Do you want to update the service \"{}\"?\nEnter \"YES\" to update: ",
            definition.name
        ))
        .await?;
    if answer != "YES" {
        info!(service = %definition.name, "update aborted");
        return Ok(());
    }

    upsert_service_plugins(client, &definition.name, &definition.plugins).await?;

    let stale_plugins =
        service_plugins_removed_from_config(client, &definition.name, &definition.plugins).await?;
    remove_plugins(client, &stale_plugins).await?;

    let mut desired_routes = Vec::with_capacity(definition.routes.len());
    for route_definition in &definition.routes {
        let descriptor = project_route(route_definition);

        let route = upsert_route(client, &definition.name, &descriptor.config).await?;
        upsert_route_plugins(client, &route.id, &descriptor.plugins).await?;

        let stale_route_plugins =
            route_plugins_removed_from_config(client, &route.id, &descriptor.plugins).await?;
        remove_plugins(client, &stale_route_plugins).await?;

        desired_routes.push(descriptor.config);
    }

    let stale_routes =
        routes_removed_from_config(client, &definition.name, &desired_routes).await?;
    remove_routes(client, &stale_routes).await?;

    Ok(())
}

/// Remove a service and every route attached to it.
pub async fn remove_service(
    client: &AdminClient,
    service_name: &str,
    prompt: &dyn ConfirmPrompt,
) -> Result<()> {
    if client.get_service(service_name).await?.is_none() {
        warn!(service = service_name, "no service registered with this name");
        return Ok(());
    }

    let answer = prompt
        .confirm(&format!(
            "Do you want to remove the service \"{service_name}\"? THINK TWICE!\nEnter \"YES\" to remove: "
        ))
        .await?;
    if answer != "YES" {
        info!(service = service_name, "removal aborted");
        return Ok(());
    }

    let routes = client.list_routes(service_name).await?;
    for route in &routes {
        info!(service = service_name, route = %route.id, "removing route");
        client.delete_route(&route.id).await?;
    }

    info!(service = service_name, "removing service");
    client.delete_service(service_name).await?;

    Ok(())
}
