// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Persistent application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Port for the relay HTTP server (default 3002).
    pub relay_port: u16,
    /// Connect timeout for the relay's outbound requests, in seconds.
    ///
    /// Only the connection phase is bounded; a whole-request timeout would
    /// cut off legitimately long document streams.
    pub upstream_connect_timeout_secs: u64,
    /// Delay between print invocation and resource cleanup, in milliseconds.
    pub cleanup_delay_ms: u64,
    /// Delay between job completion and the view-close request, in milliseconds.
    pub view_close_delay_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            relay_port: 3002,
            upstream_connect_timeout_secs: 10,
            cleanup_delay_ms: 1000,
            view_close_delay_ms: 2000,
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write configuration to a JSON file (pretty-printed).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let raw = serde_json::to_string_pretty(self)?;
        std::fs::write(path, raw)?;
        Ok(())
    }

    pub fn upstream_connect_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_connect_timeout_secs)
    }

    pub fn cleanup_delay(&self) -> Duration {
        Duration::from_millis(self.cleanup_delay_ms)
    }

    pub fn view_close_delay(&self) -> Duration {
        Duration::from_millis(self.view_close_delay_ms)
    }
}
