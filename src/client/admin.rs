//! Typed client for the gateway admin REST API
//!
//! One network round-trip per operation, issued serially by callers. Two
//! conventions the reconciler depends on:
//!
//! - a 404 on a GET-style existence probe is a *successful* "not found"
//!   (`Ok(None)`), never an error;
//! - a 404 on a DELETE is a plain remote error — callers are expected to
//!   check existence first, the client does not paper over missing targets.
//!
//! All validation (missing identifiers, empty route identity) happens before
//! any request is sent and surfaces as [`Error::Validation`], distinct from
//! remote-reported failures. Transport failures propagate unchanged; there
//! are no retries and no timeouts at this layer.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::client::route_key::identity_key;
use crate::client::{Page, Plugin, Route, RouteConfig, Service, ServiceRef};
use crate::config::{Credentials, PluginDefinition};
use crate::error::{Error, Result};

/// Client for one gateway admin endpoint
#[derive(Clone, Debug)]
pub struct AdminClient {
    http: reqwest::Client,
    base_url: String,
}

/// POST body for route creation: the match criteria plus the owning
/// service's foreign key.
#[derive(Serialize)]
struct NewRoute<'a> {
    service: ServiceRef,
    #[serde(flatten)]
    config: &'a RouteConfig,
}

impl AdminClient {
    /// Build a client from the admin URL and default headers.
    pub fn new(credentials: &Credentials) -> Result<Self> {
        let base_url = Url::parse(&credentials.admin_api_url)
            .map_err(|e| Error::Config(format!("invalid admin URL: {e}")))?;

        let mut headers = HeaderMap::new();
        for (name, value) in &credentials.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::Config(format!("invalid header name \"{name}\": {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| Error::Config(format!("invalid header value for {name:?}: {e}")))?;
            headers.insert(name, value);
        }

        let http = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            http,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    // ── services ───────────────────────────────────────────────────────────

    pub async fn get_service(&self, name: &str) -> Result<Option<Service>> {
        self.get_optional(&format!("/services/{name}")).await
    }

    pub async fn service_exists(&self, name: &str) -> Result<bool> {
        Ok(self.get_service(name).await?.is_some())
    }

    /// Create a service. Probes first; a probe-confirmed-present service is
    /// an [`Error::AlreadyExists`], not a POST that relies on the gateway's
    /// own conflict reporting.
    pub async fn create_service(&self, name: &str, upstream_url: &str) -> Result<Service> {
        if self.get_service(name).await?.is_some() {
            return Err(Error::AlreadyExists(format!(
                "service \"{name}\" already exists"
            )));
        }

        self.send(
            Method::POST,
            "/services",
            &serde_json::json!({ "name": name, "url": upstream_url }),
        )
        .await
    }

    pub async fn delete_service(&self, name: &str) -> Result<()> {
        self.delete(&format!("/services/{name}")).await
    }

    // ── routes ─────────────────────────────────────────────────────────────

    pub async fn get_route(&self, route_id: &str) -> Result<Option<Route>> {
        self.get_optional(&format!("/routes/{route_id}")).await
    }

    /// Create a route under the named service. The service is resolved to
    /// its id first; a missing service is [`Error::NotFound`], an empty
    /// match-criteria set is [`Error::Validation`] before any call.
    pub async fn create_route(&self, service_name: &str, config: &RouteConfig) -> Result<Route> {
        config.validate()?;

        let service = self.get_service(service_name).await?.ok_or_else(|| {
            Error::NotFound(format!("service \"{service_name}\" does not exist"))
        })?;

        self.send(
            Method::POST,
            "/routes",
            &NewRoute {
                service: ServiceRef { id: service.id },
                config,
            },
        )
        .await
    }

    pub async fn update_route(&self, route_id: &str, config: &RouteConfig) -> Result<Route> {
        config.validate()?;
        self.send(Method::PATCH, &format!("/routes/{route_id}"), config)
            .await
    }

    pub async fn delete_route(&self, route_id: &str) -> Result<()> {
        self.delete(&format!("/routes/{route_id}")).await
    }

    /// All routes attached to a service. A 404 on the listing (service
    /// unknown to the gateway) is an empty collection.
    pub async fn list_routes(&self, service_name: &str) -> Result<Vec<Route>> {
        let page: Option<Page<Route>> = self
            .get_optional(&format!("/services/{service_name}/routes"))
            .await?;
        Ok(page.map(|page| page.data).unwrap_or_default())
    }

    /// Find the remote route equivalent to `config` by derived identity key.
    pub async fn find_route_by_config(
        &self,
        service_name: &str,
        config: &RouteConfig,
    ) -> Result<Option<Route>> {
        let wanted = identity_key(config);
        let routes = self.list_routes(service_name).await?;
        Ok(routes
            .into_iter()
            .find(|route| identity_key(&route.config) == wanted))
    }

    /// Routes of a service matching a host.
    pub async fn find_routes_by_host(&self, service_name: &str, host: &str) -> Result<Vec<Route>> {
        let routes = self.list_routes(service_name).await?;
        Ok(routes
            .into_iter()
            .filter(|route| {
                route
                    .config
                    .hosts
                    .as_ref()
                    .is_some_and(|hosts| hosts.iter().any(|h| h == host))
            })
            .collect())
    }

    /// Routes of a service matching a path.
    pub async fn find_routes_by_path(&self, service_name: &str, path: &str) -> Result<Vec<Route>> {
        let routes = self.list_routes(service_name).await?;
        Ok(routes
            .into_iter()
            .filter(|route| {
                route
                    .config
                    .paths
                    .as_ref()
                    .is_some_and(|paths| paths.iter().any(|p| p == path))
            })
            .collect())
    }

    // ── plugins ────────────────────────────────────────────────────────────

    pub async fn get_plugin(&self, plugin_id: &str) -> Result<Option<Plugin>> {
        self.get_optional(&format!("/plugins/{plugin_id}")).await
    }

    /// Attach a plugin to a service. The attachment point must exist.
    pub async fn create_service_plugin(
        &self,
        service_name: &str,
        plugin: &PluginDefinition,
    ) -> Result<Plugin> {
        if !self.service_exists(service_name).await? {
            return Err(Error::NotFound(format!(
                "service \"{service_name}\" does not exist"
            )));
        }

        self.send(
            Method::POST,
            &format!("/services/{service_name}/plugins"),
            plugin,
        )
        .await
    }

    /// Attach a plugin to a route. The attachment point must exist.
    pub async fn create_route_plugin(
        &self,
        route_id: &str,
        plugin: &PluginDefinition,
    ) -> Result<Plugin> {
        if self.get_route(route_id).await?.is_none() {
            return Err(Error::NotFound(format!(
                "route \"{route_id}\" does not exist"
            )));
        }

        self.send(Method::POST, &format!("/routes/{route_id}/plugins"), plugin)
            .await
    }

    pub async fn update_plugin(&self, plugin_id: &str, plugin: &PluginDefinition) -> Result<Plugin> {
        self.send(Method::PATCH, &format!("/plugins/{plugin_id}"), plugin)
            .await
    }

    pub async fn delete_plugin(&self, plugin_id: &str) -> Result<()> {
        self.delete(&format!("/plugins/{plugin_id}")).await
    }

    pub async fn list_service_plugins(&self, service_name: &str) -> Result<Vec<Plugin>> {
        let page: Option<Page<Plugin>> = self
            .get_optional(&format!("/services/{service_name}/plugins"))
            .await?;
        Ok(page.map(|page| page.data).unwrap_or_default())
    }

    pub async fn list_route_plugins(&self, route_id: &str) -> Result<Vec<Plugin>> {
        let page: Option<Page<Plugin>> = self
            .get_optional(&format!("/routes/{route_id}/plugins"))
            .await?;
        Ok(page.map(|page| page.data).unwrap_or_default())
    }

    /// Find a plugin attached to a service by plugin name.
    pub async fn find_service_plugin(
        &self,
        service_name: &str,
        plugin_name: &str,
    ) -> Result<Option<Plugin>> {
        let plugins = self.list_service_plugins(service_name).await?;
        Ok(plugins.into_iter().find(|plugin| plugin.name == plugin_name))
    }

    /// Find a plugin attached to a route by plugin name.
    pub async fn find_route_plugin(
        &self,
        route_id: &str,
        plugin_name: &str,
    ) -> Result<Option<Plugin>> {
        let plugins = self.list_route_plugins(route_id).await?;
        Ok(plugins.into_iter().find(|plugin| plugin.name == plugin_name))
    }

    // ── transport ──────────────────────────────────────────────────────────

    /// GET with 404 normalized to `Ok(None)`. Every other non-2xx status is
    /// an [`Error::Remote`].
    async fn get_optional<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let url = self.endpoint(path);
        debug!(%url, "GET");

        let response = self.http.get(&url).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(response.json().await?)),
            _ => Err(Self::remote_error(response).await),
        }
    }

    /// POST/PATCH with a JSON body; any non-2xx (404 included) is an error.
    async fn send<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.endpoint(path);
        debug!(%url, %method, "write");

        let response = self
            .http
            .request(method, &url)
            .json(body)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(Self::remote_error(response).await)
        }
    }

    /// DELETE; success is any 2xx (the gateway answers 204 with no body).
    async fn delete(&self, path: &str) -> Result<()> {
        let url = self.endpoint(path);
        debug!(%url, "DELETE");

        let response = self.http.delete(&url).send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::remote_error(response).await)
        }
    }

    async fn remote_error(response: reqwest::Response) -> Error {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Error::Remote { status, body }
    }
}
