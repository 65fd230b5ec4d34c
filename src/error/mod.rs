//! # Error Module
//!
//! Failure taxonomy for the framework: error kinds arranged in a
//! single-parent tree, and the tagged failure value that request handlers
//! return instead of panicking.
//!
//! ## Overview
//!
//! An [`ErrorKind`] is a statically declared identifier with an explicit
//! parent pointer. Kinds form a tree rooted at [`FAILURE`], the universal
//! "any failure" kind. Because the parent link is plain data, walking a
//! kind's ancestry is an ordinary traversal with no runtime type
//! introspection involved.
//!
//! A [`Failure`] tags a concrete occurrence with its kind, a message, and an
//! optional JSON payload. Handlers signal failure by returning
//! `Err(Failure)` from an explicit `Result`; the recovery layer
//! pattern-matches on that result rather than unwinding the stack.
//!
//! ## Declaring kinds
//!
//! ```rust
//! use mulligan::error::{ErrorKind, FAILURE};
//!
//! static HTTP_ERROR: ErrorKind = ErrorKind::new("HttpError", &FAILURE);
//! static NOT_FOUND: ErrorKind = ErrorKind::new("NotFoundError", &HTTP_ERROR);
//!
//! assert!(NOT_FOUND.is_a(&FAILURE));
//! ```

mod failure;
mod kind;

pub use failure::Failure;
pub use kind::{Ancestry, ErrorKind, FAILURE};
