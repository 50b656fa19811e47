//! Fetcher that falls back through CORS proxies
//!
//! `ResilientFetcher::get` tries the direct request first and then each proxy
//! route in order, one attempt per route, stopping at the first success. Nothing
//! is remembered between calls: every call starts again from the direct route.

use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, error, warn};

use super::error::ApiError;
use super::route::{ProxyRoute, DEFAULT_PROXIES};
use super::transport::{ReqwestTransport, Transport};

/// Client for fetching JSON from endpoints that may block cross-origin access
#[derive(Clone)]
pub struct ResilientFetcher {
    transport: Arc<dyn Transport>,
    proxies: Vec<ProxyRoute>,
}

impl std::fmt::Debug for ResilientFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResilientFetcher")
            .field("proxies", &self.proxies)
            .finish_non_exhaustive()
    }
}

impl Default for ResilientFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ResilientFetcher {
    /// Creates a fetcher using `reqwest` and the default proxy list
    pub fn new() -> Self {
        Self::with_transport(Arc::new(ReqwestTransport::new()))
    }

    /// Creates a fetcher with a custom transport and the default proxy list
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            proxies: DEFAULT_PROXIES.to_vec(),
        }
    }

    /// Replaces the proxy routes tried after the direct request
    pub fn with_proxies(mut self, proxies: Vec<ProxyRoute>) -> Self {
        self.proxies = proxies;
        self
    }

    /// Proxy routes in the order they are tried
    pub fn proxies(&self) -> &[ProxyRoute] {
        &self.proxies
    }

    /// Requests `url` once, without any proxy
    ///
    /// # Returns
    /// * `Ok(T)` - The parsed response body
    /// * `Err(ApiError)` - With `status` set for a non-OK response, or `None`
    ///   if the request could not be completed or the body did not parse
    pub async fn get_direct<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        self.attempt(&ProxyRoute::DIRECT, url).await
    }

    /// Requests `url` directly, then through each proxy until one succeeds
    ///
    /// A proxy attempt only counts as a success if the response is OK and its
    /// payload (for envelope proxies, the inner contents) parses.
    ///
    /// # Returns
    /// * `Ok(T)` - The payload from the first route that worked
    /// * `Err(ApiError)` - [`ApiError::all_routes_failed`] if none did
    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let direct = ProxyRoute::DIRECT;
        let routes = std::iter::once(&direct).chain(self.proxies.iter());

        for (index, route) in routes.enumerate() {
            debug!(route = %route.name, attempt = index + 1, url, "Trying route");
            match self.attempt(route, url).await {
                Ok(payload) => {
                    debug!(route = %route.name, "Route succeeded");
                    return Ok(payload);
                }
                Err(e) => {
                    warn!(route = %route.name, status = ?e.status, error = %e, "Route failed");
                }
            }
        }

        error!(url, "Every route failed");
        Err(ApiError::all_routes_failed())
    }

    async fn attempt<T: DeserializeOwned>(
        &self,
        route: &ProxyRoute,
        url: &str,
    ) -> Result<T, ApiError> {
        let response = self.transport.request(&route.transport_url(url)).await?;

        if !response.is_ok() {
            return Err(ApiError::http(response.status, &response.status_text));
        }

        route.unwrap.decode(&response.body)
    }
}
