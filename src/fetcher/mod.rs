//! Remote fetching with CORS-proxy fallback
//!
//! This module provides a `ResilientFetcher` that requests a URL directly and,
//! when that fails, retries through an ordered list of public proxy services,
//! normalizing each proxy's response shape back to the original payload.

mod client;
mod error;
mod route;
mod transport;

pub use client::ResilientFetcher;
pub use error::{ApiError, TransportError, ALL_ROUTES_FAILED};
pub use route::{ProxyRoute, Unwrap, DEFAULT_PROXIES};
pub use transport::{ReqwestTransport, Transport, TransportResponse};
