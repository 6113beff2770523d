//! HTTP transport types and the process-wide API client.
//!
//! # Design
//! Requests and responses are plain data. Call descriptors build an
//! `HttpRequest` without touching the network; a `Transport` executes it.
//! Non-2xx statuses come back as an `HttpResponse` like any other, so status
//! interpretation stays with the use case.
//!
//! `ApiClient` bundles the base URL, the headers every GitHub call carries,
//! and the shared transport. It is built once and handed to use cases
//! explicitly; nothing in it changes after construction.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::config::ClientConfig;
use crate::error::TransportError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// An HTTP request described as plain data.
///
/// `url` is absolute. `query` pairs are appended by the transport so values
/// never need manual escaping here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data. `body` is `None` when the
/// server sent nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The body of a successful response.
    pub fn success_body(&self) -> Option<&str> {
        if self.is_success() {
            self.body.as_deref()
        } else {
            None
        }
    }

    /// The body of an unsuccessful response.
    pub fn error_body(&self) -> Option<&str> {
        if self.is_success() {
            None
        } else {
            self.body.as_deref()
        }
    }

    /// First header matching `name`, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Executes HTTP requests. Implementations must be shareable across the
/// one-shot worker threads the networking use cases spawn.
pub trait Transport: Send + Sync {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Blocking transport backed by a single `ureq` agent (and its connection
/// pool).
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(config: &ClientConfig) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_connect(Some(config.timeout))
            .timeout_recv_response(Some(config.timeout))
            .timeout_recv_body(Some(config.timeout))
            .build()
            .new_agent();
        Self { agent }
    }
}

fn decorate<B>(mut builder: ureq::RequestBuilder<B>, request: &HttpRequest) -> ureq::RequestBuilder<B> {
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    for (key, value) in &request.query {
        builder = builder.query(key, value);
    }
    builder
}

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = request.url.as_str();
        let sent = match request.method {
            HttpMethod::Get => decorate(self.agent.get(url), &request).call(),
            HttpMethod::Delete => decorate(self.agent.delete(url), &request).call(),
            HttpMethod::Post => {
                let builder = decorate(self.agent.post(url), &request);
                match &request.body {
                    Some(body) => builder.content_type("application/json").send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
            HttpMethod::Put => {
                let builder = decorate(self.agent.put(url), &request);
                match &request.body {
                    Some(body) => builder.content_type("application/json").send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };
        let mut response = sent.map_err(|e| TransportError::Connection(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| TransportError::Body(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body: if body.is_empty() { None } else { Some(body) },
        })
    }
}

/// Shared entry point for every API call: base URL, default headers and the
/// transport.
pub struct ApiClient {
    base_url: String,
    default_headers: Vec<(String, String)>,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("default_headers", &self.default_headers.len())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(config: &ClientConfig, transport: Arc<dyn Transport>) -> Self {
        let mut default_headers = vec![
            ("accept".to_string(), "application/vnd.github+json".to_string()),
            ("user-agent".to_string(), config.user_agent.clone()),
        ];
        if let Some(token) = &config.token {
            default_headers.push(("authorization".to_string(), format!("Bearer {token}")));
        }
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            default_headers,
            transport,
        }
    }

    /// Client using `UreqTransport` with the configured timeout.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config, Arc::new(UreqTransport::new(config)))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path such as `/search/repositories`.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn default_headers(&self) -> &[(String, String)] {
        &self.default_headers
    }

    pub fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        debug!(method = request.method.as_str(), url = %request.url, "sending request");
        let response = self.transport.execute(request)?;
        debug!(status = response.status, "received response");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    impl Transport for Echo {
        fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            Ok(HttpResponse {
                status: 200,
                headers: request.headers,
                body: Some(request.url),
            })
        }
    }

    fn response(status: u16, body: Option<&str>) -> HttpResponse {
        HttpResponse {
            status,
            headers: vec![("X-RateLimit-Remaining".to_string(), "59".to_string())],
            body: body.map(str::to_string),
        }
    }

    #[test]
    fn success_and_error_bodies_are_exclusive() {
        let ok = response(200, Some("{}"));
        assert_eq!(ok.success_body(), Some("{}"));
        assert!(ok.error_body().is_none());

        let failed = response(422, Some("invalid"));
        assert!(failed.success_body().is_none());
        assert_eq!(failed.error_body(), Some("invalid"));
    }

    #[test]
    fn header_lookup_ignores_case() {
        assert_eq!(response(200, None).header("x-ratelimit-remaining"), Some("59"));
        assert!(response(200, None).header("etag").is_none());
    }

    #[test]
    fn client_adds_default_headers_and_token() {
        let config = ClientConfig::new("http://localhost:3000/").with_token("ghp_abc");
        let client = ApiClient::new(&config, Arc::new(Echo));
        assert_eq!(client.base_url(), "http://localhost:3000");
        assert!(client
            .default_headers()
            .contains(&("authorization".to_string(), "Bearer ghp_abc".to_string())));
        assert!(client
            .default_headers()
            .iter()
            .any(|(k, v)| k == "accept" && v == "application/vnd.github+json"));
    }

    #[test]
    fn url_for_joins_with_single_slash() {
        let client = ApiClient::new(&ClientConfig::new("http://h/"), Arc::new(Echo));
        assert_eq!(client.url_for("/search/repositories"), "http://h/search/repositories");
        assert_eq!(client.url_for("repos/a/b"), "http://h/repos/a/b");
    }

    #[test]
    fn execute_delegates_to_transport() {
        let client = ApiClient::new(&ClientConfig::new("http://h"), Arc::new(Echo));
        let resp = client
            .execute(HttpRequest {
                method: HttpMethod::Get,
                url: "http://h/x".to_string(),
                headers: Vec::new(),
                query: Vec::new(),
                body: None,
            })
            .unwrap();
        assert_eq!(resp.body.as_deref(), Some("http://h/x"));
    }
}
