//! # Recovery Module
//!
//! The error-dispatch core: a registry mapping error kinds to recovery
//! handlers, and the per-dispatch context those handlers receive.
//!
//! ## Overview
//!
//! Applications register a recovery handler per [`ErrorKind`]. When a request
//! handler fails, the dispatcher resolves the failure's kind against the
//! registry by walking its ancestry chain — the kind itself first, then its
//! parent, and so on to the root — and invokes the first handler found with a
//! fresh [`RecoveryContext`]. The most specific currently-registered kind
//! always wins, so a broad handler (say, for a generic not-found kind) never
//! shadows a narrower one registered for a sub-kind.
//!
//! Failures whose entire ancestry chain is unregistered are not touched:
//! the dispatcher re-emits them to its caller unchanged.
//!
//! ## Registration semantics
//!
//! Keys are unique per kind. Registering a handler for a kind that already
//! has one replaces the entry in place: content changes, registration order
//! does not. New lookups see the replacement immediately; a dispatch that
//! already resolved keeps the handler it captured.
//!
//! ## Concurrency
//!
//! `resolve` runs on every failed request, so reads are lock-free: the
//! registry publishes immutable snapshots through an [`arc_swap::ArcSwap`]
//! and each lookup walks a single snapshot. Writers are serialized by a
//! mutex and swap in a fully-built replacement, so a concurrent reader sees
//! either the old handler or the new one, never a torn entry.
//!
//! [`ErrorKind`]: crate::error::ErrorKind

mod context;
mod registry;

pub(crate) use context::build_env;
pub use context::{RecoveryContext, ENV_ERROR_KEY, ENV_METHOD_KEY, ENV_PATH_KEY};
pub use registry::{RecoveryFn, RecoveryHandler, RecoveryRegistry};
