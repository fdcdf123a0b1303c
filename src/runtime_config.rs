//! # Runtime Configuration Module
//!
//! Environment-driven settings for the serving process.
//!
//! ## Environment Variables
//!
//! ### `MPLEX_ADDR`
//!
//! Address the HTTP server binds to. Default: `0.0.0.0:4444`.
//!
//! ### `MPLEX_STACK_SIZE`
//!
//! Stack size for `may` coroutines, decimal (`16384`) or hexadecimal (`0x4000`).
//! Every request runs on its own coroutine, so total stack memory is
//! roughly `stack_size × concurrent requests`. Default: `0x4000` (16 KB).
//!
//! ```rust
//! use mplex::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! assert!(config.stack_size > 0);
//! ```

use std::env;

pub const DEFAULT_ADDR: &str = "0.0.0.0:4444";
pub const DEFAULT_STACK_SIZE: usize = 0x4000;

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub addr: String,
    /// Coroutine stack size in bytes
    pub stack_size: usize,
}

impl RuntimeConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(
            env::var("MPLEX_ADDR").ok().as_deref(),
            env::var("MPLEX_STACK_SIZE").ok().as_deref(),
        )
    }

    fn from_vars(addr: Option<&str>, stack_size: Option<&str>) -> Self {
        RuntimeConfig {
            addr: addr
                .filter(|a| !a.is_empty())
                .unwrap_or(DEFAULT_ADDR)
                .to_string(),
            stack_size: stack_size
                .and_then(parse_stack_size)
                .unwrap_or(DEFAULT_STACK_SIZE),
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::from_vars(None, None)
    }
}

/// Parse `16384` or `0x4000`; zero is rejected
#[must_use]
pub fn parse_stack_size(val: &str) -> Option<usize> {
    let val = val.trim();
    let parsed = match val.strip_prefix("0x").or_else(|| val.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16).ok(),
        None => val.parse().ok(),
    };
    parsed.filter(|size| *size > 0)
}
