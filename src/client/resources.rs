//! Wire shapes for gateway resources
//!
//! Optional route fields use `skip_serializing_if` so that an absent field
//! stays absent on the wire: the gateway distinguishes "field not sent" from
//! "field sent empty", and so does the identity key.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A named upstream target registered with the gateway
#[derive(Clone, Debug, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// Foreign-key reference to a service, as embedded in route bodies
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServiceRef {
    pub id: String,
}

/// The match criteria of a route: hosts, paths, methods
///
/// Shared between desired state (after projection) and remote routes. At
/// least one field must be present and non-empty for the route to be
/// creatable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosts: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paths: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub methods: Option<Vec<String>>,
}

impl RouteConfig {
    /// True when at least one match field is present and non-empty.
    pub fn has_identity(&self) -> bool {
        let filled = |field: &Option<Vec<String>>| field.as_ref().is_some_and(|v| !v.is_empty());
        filled(&self.hosts) || filled(&self.paths) || filled(&self.methods)
    }

    /// Reject configs with no identity before any network call is made.
    pub fn validate(&self) -> Result<()> {
        if self.has_identity() {
            Ok(())
        } else {
            Err(Error::Validation(
                "a route requires at least one of hosts, paths or methods".to_string(),
            ))
        }
    }
}

/// A route as the gateway returns it
///
/// The `id` is assigned by the gateway on creation and is unknown for
/// desired-state routes; route equivalence goes through
/// [`identity_key`](crate::client::identity_key) instead.
#[derive(Clone, Debug, Deserialize)]
pub struct Route {
    pub id: String,

    #[serde(flatten)]
    pub config: RouteConfig,

    #[serde(default)]
    pub service: Option<ServiceRef>,
}

/// A plugin instance attached to a service or a route
#[derive(Clone, Debug, Deserialize)]
pub struct Plugin {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub config: serde_json::Map<String, serde_json::Value>,
}

/// The `{data: [...]}` envelope every list endpoint returns
#[derive(Clone, Debug, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_requires_a_non_empty_field() {
        assert!(!RouteConfig::default().has_identity());

        let empty_arrays = RouteConfig {
            hosts: Some(vec![]),
            paths: Some(vec![]),
            methods: Some(vec![]),
        };
        assert!(!empty_arrays.has_identity());
        assert!(empty_arrays.validate().is_err());

        let with_path = RouteConfig {
            paths: Some(vec!["/users".to_string()]),
            ..Default::default()
        };
        assert!(with_path.has_identity());
        assert!(with_path.validate().is_ok());
    }

    #[test]
    fn absent_fields_are_not_serialized() {
        let config = RouteConfig {
            paths: Some(vec!["/users".to_string()]),
            ..Default::default()
        };
        let body = serde_json::to_value(&config).unwrap();
        assert!(body.get("hosts").is_none());
        assert!(body.get("methods").is_none());
        assert_eq!(body["paths"][0], "/users");
    }

    #[test]
    fn route_deserializes_with_flattened_config() {
        let route: Route = serde_json::from_value(serde_json::json!({
            "id": "r-1",
            "paths": ["/users"],
            "service": { "id": "s-1" }
        }))
        .unwrap();
        assert_eq!(route.id, "r-1");
        assert_eq!(route.config.paths, Some(vec!["/users".to_string()]));
        assert_eq!(route.service.unwrap().id, "s-1");
    }

    #[test]
    fn page_defaults_to_empty_data() {
        let page: Page<Plugin> = serde_json::from_str("{}").unwrap();
        assert!(page.data.is_empty());
    }
}
