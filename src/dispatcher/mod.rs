//! # Dispatcher Module
//!
//! Invokes the matched route's handler and, when that handler fails, runs
//! the error-recovery dispatch.
//!
//! ## Overview
//!
//! The dispatcher owns two registries: request handlers keyed by name (the
//! router maps paths to names) and the shared
//! [`RecoveryRegistry`](crate::recovery::RecoveryRegistry). One dispatch
//! call wraps exactly one request-handler invocation:
//!
//! 1. The route's handler runs synchronously in the request's coroutine.
//! 2. `Ok(body)` passes through: the body lands on the response unchanged.
//! 3. `Err(failure)` triggers recovery: the registry is consulted once with
//!    the failure's kind, walking its ancestry chain for the most specific
//!    registered handler.
//! 4. On a hit, a fresh [`RecoveryContext`](crate::recovery::RecoveryContext)
//!    is built and the recovery handler runs exactly once; its return value
//!    becomes the response body unless it finalized the response directly
//!    (e.g. a redirect).
//! 5. On a miss, the original failure is re-emitted to the caller untouched —
//!    same kind, same message, same payload. Dispatch never wraps, renames,
//!    or swallows an unmatched failure.
//!
//! A failure raised by a recovery handler itself propagates outward without
//! another registry consultation: recovery is strictly local to one dispatch
//! and never re-enters.
//!
//! ## Concurrency
//!
//! Dispatch introduces no concurrency of its own. Handlers run inline in
//! whatever coroutine serves the request; the only shared state is the
//! recovery registry, which is read through lock-free snapshots. The resolve
//! result is captured before the recovery handler runs, so a concurrent
//! re-registration affects the next dispatch, never one already in flight.

mod core;

pub use core::{
    Dispatcher, HandlerRequest, HeaderVec, RouteHandler, RouteHandlerFn, MAX_INLINE_HEADERS,
};
