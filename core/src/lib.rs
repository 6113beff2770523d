//! Typed networking pipeline for the GitHub REST API.
//!
//! # Overview
//! A use case turns domain parameters into wire parameters through a request
//! adapter, performs one HTTP call described by an `ApiCall`, and converts the
//! JSON body back into a domain value through a response adapter. Every
//! result is an `Outcome`: the domain value or a classified `ApiException`.
//!
//! # Design
//! - `NetworkingUseCase` owns the fixed orchestration (connectivity check,
//!   call, status classification, parsing); implementors only supply
//!   adapters and optional `on_success` / `on_failure` / `on_error` hooks.
//! - HTTP goes through the `Transport` trait. `UreqTransport` is the real
//!   one; tests script responses without a socket.
//! - Each call runs on its own worker thread, so a slow or panicking transport
//!   never takes the caller down with it.
//! - Response DTOs live in `github::wire` and never leave the crate; callers
//!   see only the domain types in `github::types`.

pub mod adapter;
pub mod call;
pub mod config;
pub mod connectivity;
pub mod error;
pub mod fuzzy;
pub mod github;
pub mod http;
pub mod networking;
pub mod outcome;
pub mod store;
pub mod use_case;

pub use adapter::{RequestAdapter, ResponseAdapter, WireParams};
pub use call::{ApiCall, CallArgs, CallShape, Endpoint, PathArity};
pub use crate::config::{ClientConfig, ConfigError};
pub use connectivity::{AlwaysOnline, Connectivity, ToggleConnectivity};
pub use error::{classify_status, ApiException, CallError, ErrorState, ParseError, TransportError};
pub use http::{ApiClient, HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
pub use networking::{NetworkContext, NetworkingUseCase};
pub use outcome::Outcome;
pub use store::{CollaboratorStore, InMemoryStore, RepositoryStore};
pub use use_case::UseCase;
