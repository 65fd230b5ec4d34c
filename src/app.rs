use std::sync::Arc;

use anyhow::Context;
use http::Method;
use serde_json::Value;

use crate::dispatcher::{Dispatcher, HandlerRequest};
use crate::error::{ErrorKind, Failure};
use crate::recovery::{RecoveryContext, RecoveryRegistry};
use crate::router::Router;
use crate::runtime_config::RuntimeConfig;
use crate::server::{AppService, HttpServer, Response, ServerHandle};

/// Application builder owning the router, the dispatcher, and the recovery
/// registry as explicit instances — there is no module-level registration
/// table anywhere; everything an app registers lives here.
///
/// ```no_run
/// use mulligan::{App, Failure};
/// use mulligan::error::{ErrorKind, FAILURE};
/// use serde_json::json;
///
/// static NOT_FOUND: ErrorKind = ErrorKind::new("NotFoundError", &FAILURE);
///
/// let mut app = App::new();
/// app.get("/hello", |_req, _res| Ok(json!("hello")));
/// app.get("/missing", |_req, _res| Err(Failure::of(&NOT_FOUND)));
/// app.error(&NOT_FOUND, |_ctx| Ok(json!("Not Found")));
///
/// let handle = app.serve("127.0.0.1:8080").unwrap();
/// handle.join().unwrap();
/// ```
pub struct App {
    router: Router,
    dispatcher: Dispatcher,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    #[must_use]
    pub fn new() -> Self {
        App {
            router: Router::new(),
            dispatcher: Dispatcher::new(),
        }
    }

    /// Declare a route and register its handler in one step. The handler is
    /// stored under a name derived from the method and pattern; declaring
    /// the same method + pattern again replaces the handler.
    pub fn route<F>(&mut self, method: Method, pattern: &str, handler: F) -> &mut Self
    where
        F: Fn(&HandlerRequest, &mut Response) -> Result<Value, Failure> + Send + Sync + 'static,
    {
        let name = handler_name(&method, pattern);
        self.router.add_route(method, pattern, &name);
        self.dispatcher.register_handler(&name, handler);
        self
    }

    pub fn get<F>(&mut self, pattern: &str, handler: F) -> &mut Self
    where
        F: Fn(&HandlerRequest, &mut Response) -> Result<Value, Failure> + Send + Sync + 'static,
    {
        self.route(Method::GET, pattern, handler)
    }

    pub fn post<F>(&mut self, pattern: &str, handler: F) -> &mut Self
    where
        F: Fn(&HandlerRequest, &mut Response) -> Result<Value, Failure> + Send + Sync + 'static,
    {
        self.route(Method::POST, pattern, handler)
    }

    pub fn put<F>(&mut self, pattern: &str, handler: F) -> &mut Self
    where
        F: Fn(&HandlerRequest, &mut Response) -> Result<Value, Failure> + Send + Sync + 'static,
    {
        self.route(Method::PUT, pattern, handler)
    }

    pub fn delete<F>(&mut self, pattern: &str, handler: F) -> &mut Self
    where
        F: Fn(&HandlerRequest, &mut Response) -> Result<Value, Failure> + Send + Sync + 'static,
    {
        self.route(Method::DELETE, pattern, handler)
    }

    /// Register a recovery handler for `kind`. Registering the same kind
    /// again replaces the previous handler; later failures of that kind (or
    /// of descendant kinds with nothing more specific registered) dispatch
    /// to the new one.
    pub fn error<F>(&mut self, kind: &'static ErrorKind, handler: F) -> &mut Self
    where
        F: Fn(&mut RecoveryContext<'_>) -> Result<Value, Failure> + Send + Sync + 'static,
    {
        self.dispatcher.recovery().register(kind, handler);
        self
    }

    /// Names of all kinds with a registered recovery handler, in
    /// registration order.
    #[must_use]
    pub fn errors(&self) -> Vec<&'static str> {
        self.dispatcher.recovery().kinds()
    }

    /// Shared handle to the recovery registry, e.g. for registration after
    /// the app has started serving.
    #[must_use]
    pub fn recovery(&self) -> Arc<RecoveryRegistry> {
        Arc::clone(self.dispatcher.recovery())
    }

    /// Finish building and produce the HTTP service.
    #[must_use]
    pub fn into_service(self) -> AppService {
        AppService::new(Arc::new(self.router), Arc::new(self.dispatcher))
    }

    /// Apply the runtime configuration and start serving on `addr`.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be parsed or bound.
    pub fn serve(self, addr: &str) -> anyhow::Result<ServerHandle> {
        let config = RuntimeConfig::from_env();
        may::config().set_stack_size(config.stack_size);
        HttpServer(self.into_service())
            .start(addr)
            .with_context(|| format!("failed to bind {addr}"))
    }

    /// Like [`App::serve`], bound to `MULLIGAN_ADDR` (default
    /// `127.0.0.1:8080`).
    ///
    /// # Errors
    ///
    /// Returns an error if the configured address cannot be parsed or bound.
    pub fn serve_from_env(self) -> anyhow::Result<ServerHandle> {
        let config = RuntimeConfig::from_env();
        may::config().set_stack_size(config.stack_size);
        let addr = config.addr.clone();
        HttpServer(self.into_service())
            .start(&addr)
            .with_context(|| format!("failed to bind {addr}"))
    }
}

fn handler_name(method: &Method, pattern: &str) -> String {
    format!("{} {}", method.as_str().to_ascii_lowercase(), pattern)
}
