//! Request and response adapters.
//!
//! # Design
//! A request adapter turns an endpoint's typed parameters into `WireParams`:
//! string maps for headers, body fields and query, plus the ordered path
//! segments and the literal URL some endpoints take. Only the slots the
//! endpoint's call shape uses are read.
//!
//! A response adapter turns a raw body into the endpoint's domain type. Both
//! are pure; neither performs I/O or retries.

use std::collections::BTreeMap;

use crate::error::ParseError;

pub type Headers = BTreeMap<String, String>;
pub type Fields = BTreeMap<String, String>;
pub type Query = BTreeMap<String, String>;

/// Wire-level parameters produced by a `RequestAdapter`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WireParams {
    pub headers: Headers,
    pub fields: Fields,
    pub query: Query,
    /// Positional path segments, in template order.
    pub path: Vec<String>,
    /// Full target URL for literal-URL calls.
    pub url: Option<String>,
}

impl WireParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: &str, value: impl ToString) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }

    pub fn field(mut self, name: &str, value: impl ToString) -> Self {
        self.fields.insert(name.to_string(), value.to_string());
        self
    }

    /// Add a query parameter; non-string values are stringified here.
    pub fn query(mut self, name: &str, value: impl ToString) -> Self {
        self.query.insert(name.to_string(), value.to_string());
        self
    }

    pub fn segment(mut self, value: impl Into<String>) -> Self {
        self.path.push(value.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// Converts an endpoint's request parameters into wire parameters.
///
/// Must be total and deterministic: equal inputs give equal outputs.
pub trait RequestAdapter: Send + Sync {
    type Params;

    fn convert(&self, params: &Self::Params) -> WireParams;
}

/// Converts a raw response body into an endpoint's domain type.
pub trait ResponseAdapter: Send + Sync {
    type Output;

    fn convert(&self, raw: &str) -> Result<Self::Output, ParseError>;
}
