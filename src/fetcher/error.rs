//! Error types for remote fetching

use thiserror::Error;

/// Message carried by [`ApiError`] once every route has failed
pub const ALL_ROUTES_FAILED: &str = "Todos los proxies fallaron. No se pudo realizar la petición.";

/// Fallback message when a failure carries no description
const UNKNOWN_FAILURE: &str = "Error de red desconocido";

/// Error surfaced to callers of the fetcher
///
/// `status` is set only when a response arrived with a non-OK HTTP status;
/// transport, parse and exhaustion failures carry `None`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    /// Human-readable description
    pub message: String,
    /// HTTP status of the failing response, if there was one
    pub status: Option<u16>,
}

impl ApiError {
    /// Creates an error with no HTTP status
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            message: if message.trim().is_empty() {
                UNKNOWN_FAILURE.to_string()
            } else {
                message
            },
            status: None,
        }
    }

    /// Creates an error for a response that arrived with a non-OK status
    pub fn http(status: u16, status_text: &str) -> Self {
        Self {
            message: format!("Error {}: {}", status, status_text).trim_end().to_string(),
            status: Some(status),
        }
    }

    /// The error returned when the direct call and every proxy failed
    pub fn all_routes_failed() -> Self {
        Self::new(ALL_ROUTES_FAILED)
    }
}

/// Failure to complete a request at all (DNS, connection, CORS block, ...)
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP client error
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Any other failure, described by whatever text was available
    #[error("{0}")]
    Other(String),
}

impl From<TransportError> for ApiError {
    fn from(error: TransportError) -> Self {
        ApiError::new(error.to_string())
    }
}
