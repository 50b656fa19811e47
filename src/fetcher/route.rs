//! Transport routes tried by the fetcher
//!
//! A route is data: a URL template plus a rule for pulling the real payload out
//! of the response. Templates may contain `{url}` (the target URL verbatim) or
//! `{encoded_url}` (the target URL percent-encoded as a query value).

use serde::{de::DeserializeOwned, Deserialize};
use std::borrow::Cow;
use url::form_urlencoded;

use super::error::ApiError;

/// How a route's response body maps to the caller's payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unwrap {
    /// The body is the payload
    Plain,
    /// The body is `{"contents": "<payload as JSON text>", ...}`
    Envelope,
}

/// Outer wrapper returned by envelope proxies
#[derive(Debug, Deserialize)]
struct Envelope {
    contents: Option<String>,
}

impl Unwrap {
    /// Extracts the payload from a response body
    pub fn decode<T: DeserializeOwned>(self, body: &str) -> Result<T, ApiError> {
        match self {
            Unwrap::Plain => serde_json::from_str(body)
                .map_err(|e| ApiError::new(format!("Respuesta no válida: {}", e))),
            Unwrap::Envelope => {
                let envelope: Envelope = serde_json::from_str(body)
                    .map_err(|e| ApiError::new(format!("Envoltorio del proxy no válido: {}", e)))?;
                let contents = envelope
                    .contents
                    .ok_or_else(|| ApiError::new("Respuesta del proxy sin contenido"))?;
                serde_json::from_str(&contents)
                    .map_err(|e| ApiError::new(format!("Contenido del proxy no válido: {}", e)))
            }
        }
    }
}

/// One way of reaching a target URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyRoute {
    /// Short name used in logs
    pub name: Cow<'static, str>,
    /// URL template, see the module docs for placeholders
    pub template: Cow<'static, str>,
    /// How to read the response
    pub unwrap: Unwrap,
}

/// Public CORS relays, in the order they are tried after the direct request
pub const DEFAULT_PROXIES: &[ProxyRoute] = &[
    ProxyRoute::fixed(
        "allorigins",
        "https://api.allorigins.win/get?url={encoded_url}",
        Unwrap::Envelope,
    ),
    ProxyRoute::fixed(
        "corsproxy",
        "https://corsproxy.io/?url={encoded_url}",
        Unwrap::Plain,
    ),
    ProxyRoute::fixed(
        "codetabs",
        "https://api.codetabs.com/v1/proxy?quest={encoded_url}",
        Unwrap::Plain,
    ),
];

impl ProxyRoute {
    /// Requests the target URL as-is
    pub const DIRECT: ProxyRoute = ProxyRoute::fixed("direct", "{url}", Unwrap::Plain);

    /// Builds a route from static strings
    pub const fn fixed(name: &'static str, template: &'static str, unwrap: Unwrap) -> Self {
        Self {
            name: Cow::Borrowed(name),
            template: Cow::Borrowed(template),
            unwrap,
        }
    }

    /// Builds a route from runtime configuration
    pub fn new(name: impl Into<String>, template: impl Into<String>, unwrap: Unwrap) -> Self {
        Self {
            name: Cow::Owned(name.into()),
            template: Cow::Owned(template.into()),
            unwrap,
        }
    }

    /// The URL actually requested for `target`
    pub fn transport_url(&self, target: &str) -> String {
        let encoded: String = form_urlencoded::byte_serialize(target.as_bytes()).collect();
        self.template
            .replace("{encoded_url}", &encoded)
            .replace("{url}", target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    const TARGET: &str = "https://itunes.apple.com/lookup?id=123&media=podcast";

    #[test]
    fn test_direct_route_passes_url_through() {
        assert_eq!(ProxyRoute::DIRECT.transport_url(TARGET), TARGET);
    }

    #[test]
    fn test_proxy_routes_encode_target() {
        assert_eq!(
            DEFAULT_PROXIES[0].transport_url(TARGET),
            "https://api.allorigins.win/get?url=https%3A%2F%2Fitunes.apple.com%2Flookup%3Fid%3D123%26media%3Dpodcast"
        );
        assert_eq!(
            DEFAULT_PROXIES[1].transport_url(TARGET),
            "https://corsproxy.io/?url=https%3A%2F%2Fitunes.apple.com%2Flookup%3Fid%3D123%26media%3Dpodcast"
        );
    }

    #[test]
    fn test_default_proxy_order() {
        let names: Vec<&str> = DEFAULT_PROXIES.iter().map(|r| r.name.as_ref()).collect();
        assert_eq!(names, vec!["allorigins", "corsproxy", "codetabs"]);
        assert_eq!(DEFAULT_PROXIES[0].unwrap, Unwrap::Envelope);
    }

    #[test]
    fn test_plain_decode() {
        let value: Value = Unwrap::Plain.decode(r#"{"a": 1}"#).unwrap();
        assert_eq!(value, json!({"a": 1}));
    }

    #[test]
    fn test_plain_decode_rejects_non_json() {
        let err = Unwrap::Plain.decode::<Value>("<html>").unwrap_err();
        assert_eq!(err.status, None);
    }

    #[test]
    fn test_envelope_decode_unwraps_contents() {
        let body = json!({"contents": "{\"resultCount\":1}", "status": {"http_code": 200}}).to_string();
        let value: Value = Unwrap::Envelope.decode(&body).unwrap();
        assert_eq!(value, json!({"resultCount": 1}));
    }

    #[test]
    fn test_envelope_decode_requires_contents() {
        let err = Unwrap::Envelope.decode::<Value>(r#"{"status": {}}"#).unwrap_err();
        assert_eq!(err.message, "Respuesta del proxy sin contenido");
    }

    #[test]
    fn test_envelope_decode_rejects_bad_inner_json() {
        let body = json!({"contents": "<!doctype html>"}).to_string();
        assert!(Unwrap::Envelope.decode::<Value>(&body).is_err());
    }
}
