//! Projection of the flat route definition into the gateway's route shape
//!
//! The config file uses the flat `{host, path, method}` form; the gateway
//! expects `{hosts: [...], paths: [...], methods: [...]}`. Projection is a
//! pure, synchronous mapping with no I/O. Absent optional fields stay absent
//! after projection — downstream identity resolution and validation depend
//! on true absence rather than empty arrays.

use crate::client::RouteConfig;
use crate::config::{PluginDefinition, RouteDefinition};

/// A route in gateway shape, with its plugin attachments split out
#[derive(Clone, Debug, Default)]
pub struct RouteDescriptor {
    pub config: RouteConfig,
    pub plugins: Vec<PluginDefinition>,
}

/// Project one flat route definition into gateway shape.
///
/// `path` becomes a singleton `paths` array, `host` a singleton `hosts`
/// array, and `method` a singleton, uppercased `methods` array.
pub fn project_route(definition: &RouteDefinition) -> RouteDescriptor {
    let config = RouteConfig {
        hosts: definition.host.clone().map(|host| vec![host]),
        paths: definition.path.clone().map(|path| vec![path]),
        methods: definition
            .method
            .as_deref()
            .map(|method| vec![method.to_uppercase()]),
    };

    RouteDescriptor {
        config,
        plugins: definition.plugins.clone(),
    }
}
