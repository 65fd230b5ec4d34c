//! # Router Module
//!
//! Matches an incoming method + path against the application's declared
//! routes and extracts `{param}` path segments.
//!
//! Routes are declared directly on the [`App`](crate::App) builder at setup
//! time, so tables are small and matching is an ordered scan over compiled
//! per-route regexes — first declared match wins. Extracted parameters are
//! collected into a stack-allocated [`ParamVec`] to keep the request hot
//! path free of heap allocation in the common case.

mod core;

pub use core::{ParamVec, Route, RouteMatch, Router, MAX_INLINE_PARAMS};
