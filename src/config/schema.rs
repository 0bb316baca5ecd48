//! User-authored declarative schema
//!
//! These types mirror the YAML config file the deploy pipeline ships with.
//! They describe the *desired* state for one reconciliation pass; nothing
//! here is ever persisted by this tool (persistence is the gateway's job).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Top-level config file shape
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Admin API base URL. Optional; the credentials file or the
    /// `--admin-url` flag can supply it instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_api_url: Option<String>,

    /// Services to register with the gateway
    #[serde(default)]
    pub services: Vec<ServiceDefinition>,
}

/// One service and everything attached to it
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ServiceDefinition {
    /// Gateway service name; the lookup key for every service operation
    pub name: String,

    /// Upstream URL the service proxies to
    pub url: String,

    /// Plugins attached directly to the service
    #[serde(default)]
    pub plugins: Vec<PluginDefinition>,

    /// Routes directing traffic to this service
    #[serde(default)]
    pub routes: Vec<RouteDefinition>,
}

/// One route in the flat, pre-projection shape
///
/// At least one of `host`, `path`, `method` must be present for the route to
/// be creatable; absence is preserved as `None` (not an empty string) because
/// identity resolution and validation depend on true absence.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RouteDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// HTTP method; uppercased during projection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    /// Plugins attached to this route
    #[serde(default)]
    pub plugins: Vec<PluginDefinition>,
}

/// A plugin attachment: the plugin type name plus its configuration map
///
/// The gateway treats plugin names as non-unique globally, but within one
/// attachment point (a service or a route) this tool treats the name as the
/// plugin's identity.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PluginDefinition {
    pub name: String,

    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub config: serde_json::Map<String, serde_json::Value>,
}

impl SyncConfig {
    /// Load the config from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read config file {}: {e}", path.display()))
        })?;
        serde_yaml::from_str(&raw).map_err(|e| {
            Error::Config(format!("cannot parse config file {}: {e}", path.display()))
        })
    }

    /// Services selected for this run: all of them, or the one matching
    /// `name` when a service was named on the command line.
    pub fn selected_services(&self, name: Option<&str>) -> Vec<&ServiceDefinition> {
        match name {
            Some(name) => self
                .services
                .iter()
                .filter(|service| service.name == name)
                .collect(),
            None => self.services.iter().collect(),
        }
    }
}
