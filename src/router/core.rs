use std::sync::Arc;

use http::Method;
use regex::Regex;
use smallvec::SmallVec;
use tracing::{debug, info, warn};

/// Maximum number of path/query parameters before heap allocation.
/// Most routes carry ≤4 path params, so 8 keeps the hot path allocation-free.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated parameter storage for the hot path.
///
/// Param names use `Arc<str>`: they come from the static route table, so
/// cloning one is an O(1) refcount bump. Values are per-request data and
/// stay `String`.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// One declared route: method, path pattern, and the name of the handler
/// registered with the dispatcher.
#[derive(Debug, Clone)]
pub struct Route {
    pub method: Method,
    pub path_pattern: String,
    pub handler_name: String,
}

/// Result of matching a request path against the route table.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// The matched route (shared, the table owns the canonical copy).
    pub route: Arc<Route>,
    /// Name of the handler that should process this request.
    pub handler_name: String,
    /// Path parameters extracted from the URL (`{id}` → `("id", "123")`).
    pub path_params: ParamVec,
    /// Query string parameters, populated by the server after the match.
    pub query_params: ParamVec,
}

impl RouteMatch {
    /// Get a path parameter by name. Last write wins when a name repeats at
    /// different path depths.
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
}

/// Ordered route table. Matching scans declarations in order and returns the
/// first route whose method and compiled pattern both hit.
#[derive(Clone, Default)]
pub struct Router {
    routes: Vec<(Method, Regex, Arc<Route>, Vec<Arc<str>>)>,
}

impl Router {
    #[must_use]
    pub fn new() -> Self {
        Router { routes: Vec::new() }
    }

    /// Declare a route. `pattern` uses `{name}` segments for path
    /// parameters, e.g. `/pets/{id}`.
    ///
    /// # Panics
    ///
    /// Panics if the pattern produces an uncompilable regex. Patterns are
    /// application literals declared at setup, so this fails at startup,
    /// never per-request.
    pub fn add_route(&mut self, method: Method, pattern: &str, handler_name: &str) {
        let (regex, param_names) = Self::path_to_regex(pattern);
        let route = Arc::new(Route {
            method: method.clone(),
            path_pattern: pattern.to_string(),
            handler_name: handler_name.to_string(),
        });
        info!(
            method = %method,
            pattern = %pattern,
            handler_name = %handler_name,
            total_routes = self.routes.len() + 1,
            "Route declared"
        );
        self.routes.push((method, regex, route, param_names));
    }

    /// Match an HTTP request against the table.
    #[must_use]
    pub fn route(&self, method: Method, path: &str) -> Option<RouteMatch> {
        debug!(method = %method, path = %path, "Route match attempt");

        for (route_method, regex, route, param_names) in &self.routes {
            if *route_method != method {
                continue;
            }
            let Some(captures) = regex.captures(path) else {
                continue;
            };

            let mut path_params = ParamVec::new();
            for (idx, name) in param_names.iter().enumerate() {
                if let Some(value) = captures.get(idx + 1) {
                    path_params.push((Arc::clone(name), value.as_str().to_string()));
                }
            }

            info!(
                method = %method,
                path = %path,
                route_pattern = %route.path_pattern,
                handler_name = %route.handler_name,
                path_params = ?path_params,
                "Route matched"
            );

            return Some(RouteMatch {
                route: Arc::clone(route),
                handler_name: route.handler_name.clone(),
                path_params,
                query_params: ParamVec::new(),
            });
        }

        warn!(method = %method, path = %path, "No route matched");
        None
    }

    /// All declared path patterns, in declaration order.
    #[must_use]
    pub fn path_patterns(&self) -> Vec<String> {
        self.routes
            .iter()
            .map(|(_, _, route, _)| route.path_pattern.clone())
            .collect()
    }

    /// Convert a path pattern to a regex plus its ordered parameter names:
    /// `/users/{id}` → `^/users/([^/]+)$`, `["id"]`.
    pub(crate) fn path_to_regex(path: &str) -> (Regex, Vec<Arc<str>>) {
        if path == "/" {
            return (
                Regex::new(r"^/$").expect("Failed to compile path regex"),
                Vec::new(),
            );
        }

        let mut pattern = String::with_capacity(path.len() + 5);
        pattern.push('^');
        let mut param_names = Vec::with_capacity(path.matches('{').count());

        for segment in path.split('/') {
            if segment.starts_with('{') && segment.ends_with('}') {
                let name = segment.trim_start_matches('{').trim_end_matches('}');
                pattern.push_str("/([^/]+)");
                param_names.push(Arc::from(name));
            } else if !segment.is_empty() {
                pattern.push('/');
                pattern.push_str(segment);
            }
        }

        pattern.push('$');
        let regex = Regex::new(&pattern).expect("Failed to compile path regex");

        (regex, param_names)
    }
}
