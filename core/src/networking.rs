//! Orchestration for use cases backed by exactly one REST call.
//!
//! # Design
//! A `NetworkingUseCase` supplies its call descriptor, a mapping from its own
//! parameters to the request adapter's, and three hooks that decide the final
//! `Outcome`. `execute` runs the fixed sequence:
//!
//! 1. connectivity check, short-circuiting to `on_error(NoInternet)`;
//! 2. `provide_params`, then the request adapter;
//! 3. the shape-specific argument selection of the call descriptor;
//! 4. `ApiCall::invoke` on a one-shot scoped worker thread while the caller
//!    blocks;
//! 5. `on_error` for transport faults, `on_failure` for non-2xx statuses,
//!    `on_error(EmptyResponse)` for a bodiless success, otherwise the response
//!    adapter followed by `on_success`.
//!
//! There are no retries. Every path ends in exactly one hook call. Panics in
//! the transport or the response adapter are caught and reach `on_error`.
//! `provide_params`, the request adapter and the hooks run on the caller's
//! thread and are not guarded: a panic there, like a descriptor whose adapter
//! produces the wrong arity, is a programming error and propagates.
//!
//! Concrete use cases implement `UseCase` by delegating to `execute`, which
//! keeps composite use cases free to call them like any other.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

use tracing::{debug, warn};

use crate::adapter::{RequestAdapter, ResponseAdapter};
use crate::call::{ApiCall, CallArgs};
use crate::connectivity::Connectivity;
use crate::error::{classify_status, ApiException, CallError};
use crate::http::{ApiClient, HttpResponse};
use crate::outcome::Outcome;

/// Collaborators every networking use case needs.
#[derive(Clone)]
pub struct NetworkContext {
    client: Arc<ApiClient>,
    connectivity: Arc<dyn Connectivity>,
}

impl fmt::Debug for NetworkContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkContext")
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}

impl NetworkContext {
    pub fn new(client: Arc<ApiClient>, connectivity: Arc<dyn Connectivity>) -> Self {
        Self { client, connectivity }
    }

    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    pub fn connectivity(&self) -> &dyn Connectivity {
        self.connectivity.as_ref()
    }
}

/// Domain type produced by a networking use case's response adapter.
pub type DomainOf<U> = <<U as NetworkingUseCase>::Response as ResponseAdapter>::Output;

pub trait NetworkingUseCase {
    type Params;
    type Request: RequestAdapter;
    type Response: ResponseAdapter;

    fn context(&self) -> &NetworkContext;

    fn api_call(&self) -> &ApiCall<Self::Request, Self::Response>;

    /// Map this use case's parameters to the request adapter's.
    fn provide_params(&self, params: &Self::Params) -> <Self::Request as RequestAdapter>::Params;

    /// A 2xx response with a body was converted into `result`.
    fn on_success(
        &self,
        _params: Self::Params,
        result: <Self::Response as ResponseAdapter>::Output,
        _raw_json: &str,
    ) -> Outcome<<Self::Response as ResponseAdapter>::Output, ApiException> {
        Outcome::success(result)
    }

    /// The server answered with a non-2xx status.
    fn on_failure(
        &self,
        _params: Self::Params,
        code: u16,
        error_body: Option<String>,
    ) -> Outcome<<Self::Response as ResponseAdapter>::Output, ApiException> {
        Outcome::failure(classify_status(code, error_body.as_deref()))
    }

    /// No usable response: offline, transport fault, empty body, or a body
    /// the response adapter rejected.
    fn on_error(&self, error: CallError) -> Outcome<<Self::Response as ResponseAdapter>::Output, ApiException> {
        Outcome::failure(error.into())
    }
}

/// Run `use_case` for `params`.
pub fn execute<U>(use_case: &U, params: U::Params) -> Outcome<DomainOf<U>, ApiException>
where
    U: NetworkingUseCase,
{
    let context = use_case.context();
    if !context.connectivity().is_network_available() {
        warn!("network unavailable, call not attempted");
        return use_case.on_error(CallError::Api(ApiException::NoInternet));
    }

    let call = use_case.api_call();
    let request_params = use_case.provide_params(&params);
    let wire = call.request_adapter().convert(&request_params);
    let args = call.call_args(wire);
    debug!(shape = ?call.shape(), "dispatching call");

    let response = match dispatch(call, context.client(), args) {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, "call failed without a response");
            return use_case.on_error(e);
        }
    };

    if !response.is_success() {
        warn!(status = response.status, "call returned a non-success status");
        let error_body = response.error_body().map(str::to_string);
        return use_case.on_failure(params, response.status, error_body);
    }

    let raw = match response.success_body().filter(|body| !body.is_empty()) {
        Some(raw) => raw,
        None => return use_case.on_error(CallError::Api(ApiException::EmptyResponse)),
    };
    match convert(call.response_adapter(), raw) {
        Ok(result) => use_case.on_success(params, result, raw),
        Err(e) => {
            warn!(error = %e, "response body could not be converted");
            use_case.on_error(e)
        }
    }
}

/// Invoke `call` on a fresh single-use worker thread and wait for it.
fn dispatch<Q, S>(call: &ApiCall<Q, S>, client: &ApiClient, args: CallArgs) -> Result<HttpResponse, CallError>
where
    Q: RequestAdapter,
    S: ResponseAdapter,
{
    thread::scope(|scope| {
        let worker = thread::Builder::new()
            .name("hubview-call".to_string())
            .spawn_scoped(scope, move || call.invoke(client, args))
            .map_err(|e| CallError::Worker(e.to_string()))?;

        match worker.join() {
            Ok(result) => result.map_err(CallError::Transport),
            Err(panic) => Err(CallError::Worker(panic_message(panic.as_ref()))),
        }
    })
}

/// Run the response adapter, turning a panic into `CallError::Adapter`.
fn convert<S: ResponseAdapter>(adapter: &S, raw: &str) -> Result<S::Output, CallError> {
    match panic::catch_unwind(AssertUnwindSafe(|| adapter.convert(raw))) {
        Ok(converted) => converted.map_err(CallError::Parse),
        Err(panic) => Err(CallError::Adapter(panic_message(panic.as_ref()))),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
