//! Scanner configuration

use crate::{RescanError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Retry and timeout policy for a scan pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Upper bound on a single tag read, in milliseconds
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,

    /// Extra attempts after a failed read or write-back
    #[serde(default = "default_retry_times")]
    pub retry_times: u32,
}

impl ScannerConfig {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    /// Total attempts per item, first try included
    pub fn attempts(&self) -> u32 {
        self.retry_times.saturating_add(1)
    }

    pub fn validate(&self) -> Result<()> {
        if self.read_timeout_ms == 0 {
            return Err(RescanError::InvalidConfig(
                "read_timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            read_timeout_ms: default_read_timeout_ms(),
            retry_times: default_retry_times(),
        }
    }
}

fn default_read_timeout_ms() -> u64 {
    2_000
}

fn default_retry_times() -> u32 {
    2
}
