use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use http::Method;
use serde_json::Value;
use smallvec::SmallVec;
use tracing::{debug, error, info, warn};

use crate::error::Failure;
use crate::ids::RequestId;
use crate::recovery::{build_env, RecoveryContext, RecoveryRegistry};
use crate::router::{ParamVec, RouteMatch};
use crate::server::Response;

/// Maximum inline headers/cookies before heap allocation. Most requests
/// carry ≤16 headers.
pub const MAX_INLINE_HEADERS: usize = 16;

/// Stack-allocated header/cookie storage for the hot path.
///
/// Header names use `Arc<str>`: common names (content-type, cookie, …)
/// repeat across requests and clone with an O(1) refcount bump. Values are
/// per-request data and stay `String`.
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// Request data passed to a route handler.
#[derive(Debug, Clone)]
pub struct HandlerRequest {
    /// Unique request id for log correlation.
    pub request_id: RequestId,
    /// HTTP method (GET, POST, …).
    pub method: Method,
    /// Matched route pattern.
    pub path: String,
    /// Name the handler was registered under.
    pub handler_name: String,
    /// Path parameters extracted from the URL.
    pub path_params: ParamVec,
    /// Query string parameters.
    pub query_params: ParamVec,
    /// HTTP headers (lowercase names).
    pub headers: HeaderVec,
    /// Cookies parsed from the Cookie header.
    pub cookies: HeaderVec,
    /// Request body parsed as JSON, if present.
    pub body: Option<Value>,
}

impl HandlerRequest {
    /// Get a path parameter by name. Last write wins for duplicate names.
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Get a query parameter by name. Last write wins for duplicates.
    #[inline]
    #[must_use]
    pub fn get_query_param(&self, name: &str) -> Option<&str> {
        self.query_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Get a header by name (case-insensitive per RFC 7230).
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Get a cookie by name.
    #[inline]
    #[must_use]
    pub fn get_cookie(&self, name: &str) -> Option<&str> {
        self.cookies
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }
}

/// A route handler: produces the response body, or a tagged failure for the
/// recovery layer to dispatch. Handlers may also mutate the response
/// directly (status, headers, redirect).
pub type RouteHandlerFn =
    dyn Fn(&HandlerRequest, &mut Response) -> Result<Value, Failure> + Send + Sync;

/// Shared handle to a registered route handler.
pub type RouteHandler = Arc<RouteHandlerFn>;

/// Routes requests to registered handlers and dispatches their failures to
/// recovery handlers.
#[derive(Clone)]
pub struct Dispatcher {
    handlers: HashMap<String, RouteHandler>,
    recovery: Arc<RecoveryRegistry>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    /// A dispatcher with its own empty recovery registry.
    #[must_use]
    pub fn new() -> Self {
        Self::with_recovery(Arc::new(RecoveryRegistry::new()))
    }

    /// A dispatcher sharing an existing recovery registry.
    #[must_use]
    pub fn with_recovery(recovery: Arc<RecoveryRegistry>) -> Self {
        Dispatcher {
            handlers: HashMap::new(),
            recovery,
        }
    }

    /// The recovery registry consulted when a handler fails.
    #[must_use]
    pub fn recovery(&self) -> &Arc<RecoveryRegistry> {
        &self.recovery
    }

    /// Register a request handler under `name`. If a handler with the same
    /// name already exists it is replaced; lookups after this call see only
    /// the new handler.
    pub fn register_handler<F>(&mut self, name: &str, handler_fn: F)
    where
        F: Fn(&HandlerRequest, &mut Response) -> Result<Value, Failure> + Send + Sync + 'static,
    {
        if self.handlers.contains_key(name) {
            warn!(handler_name = %name, "Replaced existing request handler");
        } else {
            info!(
                handler_name = %name,
                total_handlers = self.handlers.len() + 1,
                "Request handler registered"
            );
        }
        self.handlers.insert(name.to_string(), Arc::new(handler_fn));
    }

    /// Registered handler names, for introspection.
    #[must_use]
    pub fn handler_names(&self) -> Vec<&str> {
        self.handlers.keys().map(String::as_str).collect()
    }

    /// Run the matched route's handler and return the completed response.
    ///
    /// Returns `None` when no handler is registered under the route's name
    /// (the transport renders its own error for that). Otherwise:
    ///
    /// * `Some(Ok(response))` — the handler succeeded, or it failed and a
    ///   recovery handler produced the response.
    /// * `Some(Err(failure))` — the failure matched nothing in its ancestry
    ///   chain (or the recovery handler itself failed) and propagates to the
    ///   caller exactly as raised.
    #[must_use]
    pub fn dispatch(
        &self,
        route_match: RouteMatch,
        body: Option<Value>,
        headers: HeaderVec,
        cookies: HeaderVec,
    ) -> Option<Result<Response, Failure>> {
        let request_id = RequestId::new();

        debug!(
            request_id = %request_id,
            handler_name = %route_match.handler_name,
            available_handlers = self.handlers.len(),
            "Handler lookup"
        );

        let handler = match self.handlers.get(&route_match.handler_name) {
            Some(handler) => Arc::clone(handler),
            None => {
                error!(
                    request_id = %request_id,
                    handler_name = %route_match.handler_name,
                    "Handler not found"
                );
                return None;
            }
        };

        let request = HandlerRequest {
            request_id,
            method: route_match.route.method.clone(),
            path: route_match.route.path_pattern.clone(),
            handler_name: route_match.handler_name,
            path_params: route_match.path_params,
            query_params: route_match.query_params,
            headers,
            cookies,
            body,
        };

        info!(
            request_id = %request_id,
            handler_name = %request.handler_name,
            method = %request.method,
            path = %request.path,
            "Request dispatched to handler"
        );

        let start = Instant::now();
        let mut response = Response::new();
        let outcome = (*handler)(&request, &mut response);

        match outcome {
            Ok(body) => {
                response.set_body(body);
                info!(
                    request_id = %request_id,
                    handler_name = %request.handler_name,
                    status = response.status(),
                    latency_ms = start.elapsed().as_millis() as u64,
                    "Handler completed"
                );
                Some(Ok(response))
            }
            Err(failure) => Some(self.recover(failure, &request, response)),
        }
    }

    /// Dispatch one failure to the recovery registry.
    ///
    /// The resolve result is captured here, once; re-registrations made
    /// while the recovery handler runs are seen only by later dispatches.
    fn recover(
        &self,
        failure: Failure,
        request: &HandlerRequest,
        mut response: Response,
    ) -> Result<Response, Failure> {
        warn!(
            request_id = %request.request_id,
            handler_name = %request.handler_name,
            kind = %failure.kind(),
            message = failure.message(),
            "Request handler failed"
        );

        let Some(handler) = self.recovery.resolve(failure.kind()) else {
            info!(
                request_id = %request.request_id,
                kind = %failure.kind(),
                "Unmatched failure, propagating to caller"
            );
            return Err(failure);
        };

        let env = build_env(&failure, &request.method, &request.path);
        let outcome = {
            let mut ctx = RecoveryContext {
                failure: &failure,
                env: &env,
                response: &mut response,
            };
            (*handler)(&mut ctx)
        };

        match outcome {
            Ok(body) => {
                // No-op when the recovery handler finalized the response,
                // e.g. a redirect: finalized content wins over the body.
                response.set_body(body);
                info!(
                    request_id = %request.request_id,
                    kind = %failure.kind(),
                    status = response.status(),
                    "Recovery handler completed"
                );
                Ok(response)
            }
            Err(next) => {
                // The recovery handler's own failure is not re-dispatched.
                error!(
                    request_id = %request.request_id,
                    kind = %next.kind(),
                    message = next.message(),
                    "Recovery handler failed, propagating to caller"
                );
                Err(next)
            }
        }
    }
}
