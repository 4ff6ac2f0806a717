//! Mock implementations for testing.
//!
//! Stand-ins for the transport and auth layers so the services and the
//! surveyor can be exercised without network access.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::auth::{AuthManager, Credential, API_KEY_HEADER, API_KEY_PARAM};
use crate::transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, TransportError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Mock HTTP transport for testing.
///
/// Responses are returned in the order they were enqueued; every request is
/// recorded for later assertions.
///
/// ```
/// use quantity_surveyor::mocks::MockHttpTransport;
/// use quantity_surveyor::transport::{HttpMethod, HttpRequest, HttpTransport};
/// use std::collections::HashMap;
///
/// # #[tokio::main]
/// # async fn main() {
/// let transport = MockHttpTransport::new();
/// transport.enqueue_json_response(200, r#"{"name": "files/abc"}"#);
///
/// let request = HttpRequest {
///     method: HttpMethod::Get,
///     url: "https://example.com/v1beta/files/abc".to_string(),
///     headers: HashMap::new(),
///     body: None,
/// };
///
/// let response = transport.send(request).await.unwrap();
/// assert_eq!(response.status, 200);
/// transport.verify_request_count(1);
/// # }
/// ```
#[derive(Clone, Default)]
pub struct MockHttpTransport {
    responses: Arc<Mutex<VecDeque<Result<HttpResponse, TransportError>>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl MockHttpTransport {
    /// Create a new mock HTTP transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a response to be returned by the next request.
    pub fn enqueue_response(&self, response: Result<HttpResponse, TransportError>) {
        lock(&self.responses).push_back(response);
    }

    /// Enqueue a JSON response with the given status code and body.
    pub fn enqueue_json_response(&self, status: u16, body: &str) {
        self.enqueue_json_response_with_headers(status, body, &[]);
    }

    /// Enqueue a JSON response with extra headers, e.g. `Retry-After`.
    pub fn enqueue_json_response_with_headers(&self, status: u16, body: &str, headers: &[(&str, &str)]) {
        let mut header_map = HashMap::new();
        header_map.insert("content-type".to_string(), "application/json".to_string());
        for (name, value) in headers {
            header_map.insert(name.to_string(), value.to_string());
        }

        self.enqueue_response(Ok(HttpResponse {
            status,
            headers: header_map,
            body: Bytes::from(body.to_string()),
        }));
    }

    /// Enqueue a transport error.
    pub fn enqueue_error(&self, error: TransportError) {
        self.enqueue_response(Err(error));
    }

    /// Get all requests that were made.
    pub fn get_requests(&self) -> Vec<HttpRequest> {
        lock(&self.requests).clone()
    }

    /// Get the last request that was made.
    pub fn last_request(&self) -> Option<HttpRequest> {
        lock(&self.requests).last().cloned()
    }

    /// Number of responses still queued.
    pub fn pending_responses(&self) -> usize {
        lock(&self.responses).len()
    }

    /// Verify that exactly `expected` requests were made.
    pub fn verify_request_count(&self, expected: usize) {
        let actual = lock(&self.requests).len();
        assert_eq!(actual, expected, "Expected {} requests, got {}", expected, actual);
    }

    /// Verify that a request was made with the expected method and URL.
    pub fn verify_request(&self, index: usize, method: HttpMethod, url_contains: &str) {
        let requests = lock(&self.requests);
        assert!(index < requests.len(), "No request at index {}", index);

        let request = &requests[index];
        assert_eq!(request.method, method, "Expected method {:?}, got {:?}", method, request.method);
        assert!(
            request.url.contains(url_contains),
            "Expected URL to contain '{}', got '{}'",
            url_contains,
            request.url
        );
    }

    /// Verify that a request carried a specific header.
    pub fn verify_header(&self, index: usize, header_name: &str, header_value: &str) {
        let requests = lock(&self.requests);
        assert!(index < requests.len(), "No request at index {}", index);

        let actual_value = requests[index].headers.get(header_name);
        assert_eq!(
            actual_value.map(String::as_str),
            Some(header_value),
            "Expected header '{}' to be '{}', got {:?}",
            header_name,
            header_value,
            actual_value
        );
    }
}

#[async_trait]
impl HttpTransport for MockHttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        lock(&self.requests).push(request);

        lock(&self.responses).pop_front().unwrap_or_else(|| {
            Err(TransportError::Connection(
                "No response configured in MockHttpTransport".to_string(),
            ))
        })
    }
}

/// Mock authentication manager for testing.
///
/// ```
/// use quantity_surveyor::mocks::MockAuthManager;
/// use quantity_surveyor::auth::AuthManager;
///
/// let auth = MockAuthManager::new("test-api-key");
/// assert_eq!(
///     auth.get_auth_header(),
///     Some(("x-goog-api-key".to_string(), "test-api-key".to_string()))
/// );
/// ```
#[derive(Clone)]
pub struct MockAuthManager {
    credential: Credential,
}

impl MockAuthManager {
    /// Create a mock auth manager using header authentication.
    pub fn new(api_key: &str) -> Self {
        Self {
            credential: Credential::Header {
                name: API_KEY_HEADER.to_string(),
                value: api_key.to_string(),
            },
        }
    }

    /// Create a mock auth manager using query parameter authentication.
    pub fn with_query_param(api_key: &str) -> Self {
        Self {
            credential: Credential::Query {
                name: API_KEY_PARAM.to_string(),
                value: api_key.to_string(),
            },
        }
    }
}

impl AuthManager for MockAuthManager {
    fn credential(&self) -> Credential {
        self.credential.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get(url: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: url.to_string(),
            headers: HashMap::new(),
            body: None,
        }
    }

    #[tokio::test]
    async fn test_mock_transport_returns_in_order() {
        let transport = MockHttpTransport::new();
        transport.enqueue_json_response(200, r#"{"id": 1}"#);
        transport.enqueue_json_response_with_headers(429, "{}", &[("Retry-After", "3")]);

        let first = transport.send(get("https://example.com/1")).await.unwrap();
        let second = transport.send(get("https://example.com/2")).await.unwrap();

        assert_eq!(first.status, 200);
        assert_eq!(second.status, 429);
        assert_eq!(second.headers.get("Retry-After").map(String::as_str), Some("3"));
        transport.verify_request_count(2);
        transport.verify_request(1, HttpMethod::Get, "/2");
    }

    #[tokio::test]
    async fn test_mock_transport_without_response_errors() {
        let transport = MockHttpTransport::new();
        assert!(transport.send(get("https://example.com")).await.is_err());
    }

    #[test]
    fn test_mock_auth_manager_modes() {
        let header = MockAuthManager::new("k");
        assert!(header.get_auth_header().is_some());
        assert!(header.get_auth_query_param().is_none());

        let query = MockAuthManager::with_query_param("k");
        assert!(query.get_auth_header().is_none());
        assert_eq!(query.get_auth_query_param(), Some(("key".to_string(), "k".to_string())));
    }
}
