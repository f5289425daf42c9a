//! `[cache]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [cache]
//! expiry = 86400    # Lifetime of memoized and published entries (seconds)
//! ```

use macros::Config;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::ConfigDiagnostics;

/// Shared content cache settings.
#[derive(Debug, Clone, Serialize, Deserialize, Config)]
#[serde(default)]
#[config(section = "cache")]
pub struct CacheConfig {
    /// Lifetime of memoized minify results and published content, in seconds.
    #[config(inline_doc = "Entry lifetime in seconds.")]
    pub expiry: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            expiry: 24 * 60 * 60,
        }
    }
}

impl CacheConfig {
    pub const fn expiry(&self) -> Duration {
        Duration::from_secs(self.expiry)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.expiry == 0 {
            diag.error_with_hint(
                Self::FIELDS.expiry,
                "expiry must be greater than 0",
                "use 86400 for one day",
            );
        }
    }
}
