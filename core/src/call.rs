//! Call descriptors: how a logical endpoint is physically invoked.
//!
//! # Design
//! `ApiCall` binds one request adapter and one response adapter to an
//! `Endpoint`. The endpoint's `CallShape` decides which slots of the adapter's
//! `WireParams` reach the request:
//!
//! - `Normal`: headers, plus fields sent as a JSON object body.
//! - `Queried`: query parameters, headers and fields.
//! - `Path`: 1 to 3 positional segments, percent-encoded, substituted into a
//!   `{}` template.
//! - `LiteralUrl`: a complete URL handed over by the caller.
//!
//! `call_args` and `build_request` are the only places that look at the
//! shape, and both match it exhaustively. A descriptor whose adapter does not
//! produce what its shape needs (wrong number of segments, no URL) is a
//! programming error and panics.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::adapter::{Fields, Headers, Query, RequestAdapter, ResponseAdapter, WireParams};
use crate::error::TransportError;
use crate::http::{ApiClient, HttpMethod, HttpRequest, HttpResponse};

/// Number of positional segments a path call takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathArity {
    One,
    Two,
    Three,
}

impl PathArity {
    pub fn count(self) -> usize {
        match self {
            PathArity::One => 1,
            PathArity::Two => 2,
            PathArity::Three => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallShape {
    Normal,
    Queried,
    Path(PathArity),
    LiteralUrl,
}

/// Method, shape and path (or path template) of one endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    method: HttpMethod,
    shape: CallShape,
    path: &'static str,
}

impl Endpoint {
    pub const fn normal(method: HttpMethod, path: &'static str) -> Self {
        Self {
            method,
            shape: CallShape::Normal,
            path,
        }
    }

    pub const fn queried(method: HttpMethod, path: &'static str) -> Self {
        Self {
            method,
            shape: CallShape::Queried,
            path,
        }
    }

    /// Path-parameter endpoint; `template` holds one `{}` per segment.
    ///
    /// # Panics
    /// If the number of `{}` placeholders differs from `arity`.
    #[track_caller]
    pub fn path(method: HttpMethod, template: &'static str, arity: PathArity) -> Self {
        let placeholders = template.matches("{}").count();
        assert_eq!(
            placeholders,
            arity.count(),
            "path template {template:?} has {placeholders} placeholders, expected {}",
            arity.count()
        );
        Self {
            method,
            shape: CallShape::Path(arity),
            path: template,
        }
    }

    pub const fn literal_url(method: HttpMethod) -> Self {
        Self {
            method,
            shape: CallShape::LiteralUrl,
            path: "",
        }
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn shape(&self) -> CallShape {
        self.shape
    }
}

/// Wire parameters narrowed to what a call shape consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallArgs {
    Normal { headers: Headers, fields: Fields },
    Queried { query: Query, headers: Headers, fields: Fields },
    Path(Vec<String>),
    LiteralUrl(String),
}

/// One endpoint bound to its request and response adapters.
#[derive(Debug, Clone)]
pub struct ApiCall<Q, S> {
    endpoint: Endpoint,
    request_adapter: Q,
    response_adapter: S,
}

impl<Q, S> ApiCall<Q, S>
where
    Q: RequestAdapter,
    S: ResponseAdapter,
{
    pub fn new(endpoint: Endpoint, request_adapter: Q, response_adapter: S) -> Self {
        Self {
            endpoint,
            request_adapter,
            response_adapter,
        }
    }

    pub fn request_adapter(&self) -> &Q {
        &self.request_adapter
    }

    pub fn response_adapter(&self) -> &S {
        &self.response_adapter
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn shape(&self) -> CallShape {
        self.endpoint.shape
    }

    /// Pick the parts of `wire` this call's shape uses.
    ///
    /// # Panics
    /// If a path call got the wrong number of segments or a literal-URL call
    /// got no URL.
    #[track_caller]
    pub fn call_args(&self, wire: WireParams) -> CallArgs {
        match self.endpoint.shape {
            CallShape::Normal => CallArgs::Normal {
                headers: wire.headers,
                fields: wire.fields,
            },
            CallShape::Queried => CallArgs::Queried {
                query: wire.query,
                headers: wire.headers,
                fields: wire.fields,
            },
            CallShape::Path(arity) => {
                assert_eq!(
                    wire.path.len(),
                    arity.count(),
                    "path call {:?} expects {} segments",
                    self.endpoint.path,
                    arity.count()
                );
                CallArgs::Path(wire.path)
            }
            CallShape::LiteralUrl => match wire.url {
                Some(url) => CallArgs::LiteralUrl(url),
                None => panic!("literal-URL call received no URL from its request adapter"),
            },
        }
    }

    /// Resolve `args` into a complete request against `client`.
    ///
    /// # Panics
    /// If `args` does not match this call's shape.
    #[track_caller]
    pub fn build_request(&self, client: &ApiClient, args: CallArgs) -> HttpRequest {
        let method = self.endpoint.method;
        let mut headers = client.default_headers().to_vec();
        match (self.endpoint.shape, args) {
            (CallShape::Normal, CallArgs::Normal { headers: extra, fields }) => {
                merge_headers(&mut headers, extra);
                HttpRequest {
                    method,
                    url: client.url_for(self.endpoint.path),
                    headers,
                    query: Vec::new(),
                    body: json_body(fields),
                }
            }
            (CallShape::Queried, CallArgs::Queried { query, headers: extra, fields }) => {
                merge_headers(&mut headers, extra);
                HttpRequest {
                    method,
                    url: client.url_for(self.endpoint.path),
                    headers,
                    query: query.into_iter().collect(),
                    body: json_body(fields),
                }
            }
            (CallShape::Path(arity), CallArgs::Path(segments)) => {
                assert_eq!(segments.len(), arity.count(), "wrong number of path segments");
                HttpRequest {
                    method,
                    url: client.url_for(&fill_template(self.endpoint.path, &segments)),
                    headers,
                    query: Vec::new(),
                    body: None,
                }
            }
            (CallShape::LiteralUrl, CallArgs::LiteralUrl(url)) => {
                let url = if url.starts_with("http://") || url.starts_with("https://") {
                    url
                } else {
                    client.url_for(&url)
                };
                HttpRequest {
                    method,
                    url,
                    headers,
                    query: Vec::new(),
                    body: None,
                }
            }
            (shape, args) => panic!("call args {args:?} do not match call shape {shape:?}"),
        }
    }

    /// Build and execute the request in one go.
    pub fn invoke(&self, client: &ApiClient, args: CallArgs) -> Result<HttpResponse, TransportError> {
        client.execute(self.build_request(client, args))
    }
}

/// Request-specific headers replace defaults with the same name.
fn merge_headers(headers: &mut Vec<(String, String)>, extra: Headers) {
    for (name, value) in extra {
        headers.retain(|(k, _)| !k.eq_ignore_ascii_case(&name));
        headers.push((name, value));
    }
}

fn json_body(fields: Fields) -> Option<String> {
    if fields.is_empty() {
        return None;
    }
    let object: serde_json::Map<String, serde_json::Value> = fields
        .into_iter()
        .map(|(k, v)| (k, serde_json::Value::String(v)))
        .collect();
    Some(serde_json::Value::Object(object).to_string())
}

/// Characters escaped inside one path segment (the WHATWG path-segment set).
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'%');

/// Substitute `segments` into `template`; each segment stays one segment.
fn fill_template(template: &str, segments: &[String]) -> String {
    let mut out = String::with_capacity(template.len() + segments.iter().map(String::len).sum::<usize>());
    let mut parts = template.split("{}");
    if let Some(first) = parts.next() {
        out.push_str(first);
    }
    for (part, segment) in parts.zip(segments) {
        out.extend(utf8_percent_encode(segment, PATH_SEGMENT));
        out.push_str(part);
    }
    out
}
