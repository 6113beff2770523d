//! Error types for the networking pipeline.
//!
//! # Design
//! `ApiException` is the closed set of failures a caller ever sees. Every
//! consumer matches it exhaustively; there is no catch-all arm on purpose.
//!
//! The other enums describe where a failure came from before a use case
//! turns it into an `ApiException`: `TransportError` for the HTTP round-trip,
//! `ParseError` for response adapters, and `CallError` for everything that
//! reaches a use case's `on_error` hook.

use thiserror::Error;

/// Failures surfaced to callers of a networking use case.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiException {
    /// Connectivity check failed; no request was sent.
    #[error("no internet connection")]
    NoInternet,

    /// The server answered 2xx without a body.
    #[error("empty response")]
    EmptyResponse,

    /// The request never produced a response (DNS, connect, timeout, ...).
    #[error("network error: {0}")]
    Network(String),

    #[error("server error {code}: {message}")]
    Server { message: String, code: u16 },

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("unexpected response: {0}")]
    Unexpected(String),

    /// Wraps anything else, keeping the cause's message.
    #[error("{0}")]
    General(String),
}

/// Errors raised by a `Transport` while executing a request.
///
/// Non-2xx statuses are not transport errors; they come back as an
/// `HttpResponse` and are classified by the use case.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connection(String),

    #[error("failed to read response body: {0}")]
    Body(String),
}

/// A response body did not match the schema a `ResponseAdapter` expects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid JSON: {0}")]
    Json(String),

    #[error("invalid timestamp {value:?}: {reason}")]
    Timestamp { value: String, reason: String },
}

impl From<serde_json::Error> for ParseError {
    fn from(e: serde_json::Error) -> Self {
        ParseError::Json(e.to_string())
    }
}

/// Everything that can reach a use case's `on_error` hook.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallError {
    /// Raised by the pipeline itself (`NoInternet`, `EmptyResponse`).
    #[error(transparent)]
    Api(ApiException),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The worker thread running the HTTP call could not be started or
    /// panicked.
    #[error("call worker failed: {0}")]
    Worker(String),

    /// The response adapter panicked while converting a body.
    #[error("response adapter panicked: {0}")]
    Adapter(String),
}

impl From<ApiException> for CallError {
    fn from(e: ApiException) -> Self {
        CallError::Api(e)
    }
}

impl From<CallError> for ApiException {
    fn from(e: CallError) -> Self {
        match e {
            CallError::Api(api) => api,
            CallError::Transport(transport) => ApiException::Network(transport.to_string()),
            CallError::Parse(parse) => ApiException::General(parse.to_string()),
            CallError::Worker(msg) | CallError::Adapter(msg) => ApiException::General(msg),
        }
    }
}

/// Map a non-success HTTP status (and its body, if any) to an `ApiException`.
pub fn classify_status(code: u16, error_body: Option<&str>) -> ApiException {
    let body = error_body.unwrap_or("null");
    match code {
        401 | 403 => ApiException::Unauthorized(format!("responseCode: {code}, errorBody: {body}")),
        500..=599 => ApiException::Server {
            message: body.to_string(),
            code,
        },
        _ => ApiException::Unexpected(format!("responseCode: {code}, errorBody: {body}")),
    }
}

/// What a user interface shows for a failure: the taxonomy collapses to two
/// presentations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorState {
    NoInternet,
    Unknown,
}

impl From<&ApiException> for ErrorState {
    fn from(e: &ApiException) -> Self {
        match e {
            ApiException::NoInternet => ErrorState::NoInternet,
            ApiException::EmptyResponse
            | ApiException::Network(_)
            | ApiException::Server { .. }
            | ApiException::Unauthorized(_)
            | ApiException::Unexpected(_)
            | ApiException::General(_) => ErrorState::Unknown,
        }
    }
}
