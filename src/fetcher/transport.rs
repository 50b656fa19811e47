//! HTTP transport used by the fetcher
//!
//! The fetcher only needs "GET this URL and tell me the status and body". Keeping
//! that behind a trait lets route logic be tested without a network.

use async_trait::async_trait;
use reqwest::Client;

use super::error::TransportError;

/// A completed HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,
    /// Reason phrase for the status, empty if unknown
    pub status_text: String,
    /// Response body as text
    pub body: String,
}

impl TransportResponse {
    /// Creates a response with the canonical reason phrase for `status`
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        let status_text = reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|code| code.canonical_reason())
            .unwrap_or_default()
            .to_string();
        Self {
            status,
            status_text,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs a single GET request
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetches `url`; resolves with any HTTP status, fails only if no response arrived
    async fn request(&self, url: &str) -> Result<TransportResponse, TransportError>;
}

/// Transport backed by `reqwest`
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Creates a transport with a default HTTP client
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transport with a custom HTTP client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn request(&self, url: &str) -> Result<TransportResponse, TransportError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        Ok(TransportResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_ok_range() {
        assert!(TransportResponse::new(200, "").is_ok());
        assert!(TransportResponse::new(204, "").is_ok());
        assert!(!TransportResponse::new(199, "").is_ok());
        assert!(!TransportResponse::new(301, "").is_ok());
        assert!(!TransportResponse::new(500, "").is_ok());
    }

    #[test]
    fn test_response_uses_canonical_reason() {
        assert_eq!(TransportResponse::new(404, "").status_text, "Not Found");
    }

    #[tokio::test]
    async fn test_reqwest_transport_returns_status_and_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/feed.json")
            .with_status(503)
            .with_body("down")
            .create_async()
            .await;

        let transport = ReqwestTransport::new();
        let response = transport
            .request(&format!("{}/feed.json", server.url()))
            .await
            .unwrap();

        assert_eq!(response.status, 503);
        assert_eq!(response.status_text, "Service Unavailable");
        assert_eq!(response.body, "down");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_reqwest_transport_fails_without_server() {
        let transport = ReqwestTransport::new();
        let result = transport.request("http://127.0.0.1:1/unreachable").await;

        assert!(matches!(result, Err(TransportError::Request(_))));
    }
}
