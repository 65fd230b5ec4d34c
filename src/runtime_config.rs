//! # Runtime Configuration Module
//!
//! Environment variable based configuration for the coroutine runtime and
//! server binding.
//!
//! ## Environment Variables
//!
//! ### `MULLIGAN_STACK_SIZE`
//!
//! Stack size for handler coroutines, decimal (`16384`) or hex (`0x4000`).
//! Default: `0x4000` (16 KB). Total memory is stack_size × concurrent
//! coroutines, so tune to handler depth rather than defaulting large.
//!
//! ### `MULLIGAN_ADDR`
//!
//! Bind address for [`App::serve`](crate::App::serve) when none is given
//! explicitly. Default: `127.0.0.1:8080`.

use std::env;

const DEFAULT_STACK_SIZE: usize = 0x4000;
const DEFAULT_ADDR: &str = "127.0.0.1:8080";

/// Runtime configuration loaded from environment variables at startup.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Stack size for coroutines in bytes.
    pub stack_size: usize,
    /// Default bind address.
    pub addr: String,
}

impl RuntimeConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset or unparseable.
    #[must_use]
    pub fn from_env() -> Self {
        let stack_size = match env::var("MULLIGAN_STACK_SIZE") {
            Ok(val) => parse_stack_size(&val).unwrap_or(DEFAULT_STACK_SIZE),
            Err(_) => DEFAULT_STACK_SIZE,
        };
        let addr = env::var("MULLIGAN_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
        RuntimeConfig { stack_size, addr }
    }
}

fn parse_stack_size(val: &str) -> Option<usize> {
    if let Some(hex) = val.strip_prefix("0x") {
        usize::from_str_radix(hex, 16).ok()
    } else {
        val.parse().ok()
    }
}
