//! # Mulligan
//!
//! **Mulligan** is a small coroutine-powered HTTP framework for Rust whose
//! centerpiece is hierarchical error recovery: failures raised while
//! producing a response are dispatched to the most specific registered
//! recovery handler, and failures nothing matches propagate to the caller
//! exactly as raised.
//!
//! ## Architecture
//!
//! The library is organized into a handful of modules:
//!
//! - **[`error`]** - Error kinds in a single-parent ancestry tree, and the
//!   tagged [`Failure`] value handlers return instead of panicking
//! - **[`recovery`]** - The kind → handler registry with ancestor-chain
//!   resolution, and the per-dispatch [`RecoveryContext`]
//! - **[`router`]** - Method + path-pattern matching with `{param}` capture
//! - **[`dispatcher`]** - Invokes route handlers and dispatches their
//!   failures to recovery handlers
//! - **[`server`]** - HTTP plumbing on `may_minihttp`: request parsing, the
//!   mutable response object, and the service/server wrappers
//! - **[`app`]** - The [`App`] builder owning router, dispatcher, and
//!   recovery registry as explicit instances
//! - **[`runtime_config`]** - Environment variable runtime configuration
//! - **[`telemetry`]** - `tracing` subscriber setup
//!
//! ## Error recovery
//!
//! Error kinds are static declarations with explicit parent links:
//!
//! ```rust
//! use mulligan::error::{ErrorKind, FAILURE};
//!
//! static NOT_FOUND: ErrorKind = ErrorKind::new("NotFoundError", &FAILURE);
//! static ORDER_NOT_FOUND: ErrorKind = ErrorKind::new("OrderNotFoundError", &NOT_FOUND);
//! ```
//!
//! Resolution starts at the failure's own kind and widens along the chain,
//! so registering a handler for `NOT_FOUND` catches `ORDER_NOT_FOUND`
//! failures too — until something registers `ORDER_NOT_FOUND` itself, which
//! then wins for that kind without affecting its siblings. Re-registering a
//! kind replaces its handler in place. A failure whose whole chain is
//! unregistered is re-emitted unchanged; nothing is swallowed behind your
//! back, and there is no implicit catch-all unless you register the root
//! [`FAILURE`] kind yourself.
//!
//! ## Quick Start
//!
//! ```no_run
//! use mulligan::{App, Failure};
//! use mulligan::error::{ErrorKind, FAILURE};
//! use serde_json::json;
//!
//! static NOT_FOUND: ErrorKind = ErrorKind::new("NotFoundError", &FAILURE);
//!
//! mulligan::telemetry::init_tracing();
//!
//! let mut app = App::new();
//! app.get("/pets/{id}", |req, _res| {
//!     let id = req.get_path_param("id").unwrap_or("");
//!     Err(Failure::new(&NOT_FOUND, format!("no pet {id}")))
//! });
//! app.error(&NOT_FOUND, |ctx| Ok(json!(ctx.failure.message())));
//!
//! app.serve("0.0.0.0:8080").unwrap().join().unwrap();
//! ```
//!
//! ## Runtime Considerations
//!
//! Mulligan runs on the `may` coroutine runtime, not tokio or async-std.
//! Handlers execute synchronously inside the coroutine serving their
//! request; stack size is configurable via `MULLIGAN_STACK_SIZE`. Blocking
//! operations should use `may`'s blocking facilities, and tokio-based
//! libraries need bridging.

pub mod app;
pub mod dispatcher;
pub mod error;
pub mod ids;
pub mod recovery;
pub mod router;
pub mod runtime_config;
pub mod server;
pub mod telemetry;

pub use app::App;
pub use error::{ErrorKind, Failure, FAILURE};
pub use recovery::{RecoveryContext, RecoveryRegistry, ENV_ERROR_KEY};
pub use server::Response;
