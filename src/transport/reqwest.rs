//! HTTP transport backed by `reqwest`.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method};
use std::collections::HashMap;
use std::time::Duration;

use super::error::TransportError;
use super::http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};

/// `User-Agent` sent with every request.
pub const USER_AGENT: &str = concat!("quantity-surveyor/", env!("CARGO_PKG_VERSION"));

/// Sends requests over a pooled `reqwest::Client`.
///
/// The total timeout covers the whole exchange, including reading the body;
/// generation over a large drawing can take minutes, so it should be generous.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Builds the client with the given total and connect timeouts.
    pub fn new(timeout: Duration, connect_timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| TransportError::Request(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

fn method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Delete => Method::DELETE,
    }
}

/// Headers that are not valid HTTP are dropped with a warning.
fn to_header_map(headers: HashMap<String, String>) -> HeaderMap {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        match (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(&value)) {
            (Ok(name), Ok(value)) => {
                map.insert(name, value);
            }
            _ => tracing::warn!(header = %name, "Dropping invalid request header"),
        }
    }
    map
}

fn from_header_map(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| Some((name.to_string(), value.to_str().ok()?.to_string())))
        .collect()
}

fn classify(err: &reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connection(err.to_string())
    } else {
        TransportError::Request(err.to_string())
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self
            .client
            .request(method(request.method), &request.url)
            .headers(to_header_map(request.headers));
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| classify(&e))?;

        let status = response.status().as_u16();
        let headers = from_header_map(response.headers());
        let body = response.bytes().await.map_err(|e| classify(&e))?;

        tracing::trace!(status, bytes = body.len(), "HTTP response received");

        Ok(HttpResponse { status, headers, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_creation() {
        assert!(ReqwestTransport::new(Duration::from_secs(600), Duration::from_secs(30)).is_ok());
    }

    #[test]
    fn test_invalid_headers_are_dropped() {
        let mut headers = HashMap::new();
        headers.insert("x-goog-api-key".to_string(), "abc".to_string());
        headers.insert("bad header".to_string(), "value".to_string());
        headers.insert("X-Goog-Upload-Protocol".to_string(), "multipart".to_string());

        let map = to_header_map(headers);

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("x-goog-upload-protocol").unwrap(), "multipart");
    }

    #[test]
    fn test_response_headers_round_trip() {
        let mut map = HeaderMap::new();
        map.insert("retry-after", HeaderValue::from_static("30"));

        let headers = from_header_map(&map);

        assert_eq!(headers.get("retry-after").map(String::as_str), Some("30"));
    }

    #[test]
    fn test_user_agent_names_crate() {
        assert!(USER_AGENT.starts_with("quantity-surveyor/"));
    }
}
