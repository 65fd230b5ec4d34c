use http::Method;
use serde_json::{Map, Value};

use crate::error::Failure;
use crate::server::Response;

/// Environment key under which the dispatched failure is mirrored, so a
/// handler can branch on it without a separate dispatch parameter.
pub const ENV_ERROR_KEY: &str = "mulligan.error";

/// Environment key for the request method.
pub const ENV_METHOD_KEY: &str = "mulligan.request.method";

/// Environment key for the request path.
pub const ENV_PATH_KEY: &str = "mulligan.request.path";

/// Per-dispatch bundle passed to a recovery handler.
///
/// Created fresh for each dispatched failure and discarded when the handler
/// returns. Pure data: the caught failure and the request environment are
/// read-only, the response handle is mutable so a handler can set status,
/// headers, or issue a redirect before (or instead of) returning a body.
pub struct RecoveryContext<'a> {
    /// The failure that triggered this dispatch.
    pub failure: &'a Failure,
    /// Read-only request environment. Always contains the failure under
    /// [`ENV_ERROR_KEY`].
    pub env: &'a Map<String, Value>,
    /// The in-flight response. Content a handler finalizes here (e.g. a
    /// redirect) takes precedence over its returned body value.
    pub response: &'a mut Response,
}

/// Build the environment for one dispatch: request identity plus the failure
/// mirror under [`ENV_ERROR_KEY`].
pub(crate) fn build_env(failure: &Failure, method: &Method, path: &str) -> Map<String, Value> {
    let mut env = Map::new();
    env.insert(ENV_ERROR_KEY.to_string(), failure.to_env_value());
    env.insert(
        ENV_METHOD_KEY.to_string(),
        Value::String(method.to_string()),
    );
    env.insert(ENV_PATH_KEY.to_string(), Value::String(path.to_string()));
    env
}
