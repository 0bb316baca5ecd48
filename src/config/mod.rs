//! Declarative configuration: the user-authored schema, the projection into
//! gateway resource shapes, and credential discovery.

mod credentials;
mod projector;
mod schema;

pub use credentials::{discover_credentials, load_credentials, Credentials, DEFAULT_PROFILE};
pub use projector::{project_route, RouteDescriptor};
pub use schema::{PluginDefinition, RouteDefinition, ServiceDefinition, SyncConfig};
