// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Abdruck.

use thiserror::Error;

/// Top-level error type for all Abdruck operations.
#[derive(Debug, Error)]
pub enum AbdruckError {
    // -- Input validation --
    #[error("no document URL provided")]
    MissingUrl,

    #[error("invalid document URL: {0}")]
    InvalidUrl(String),

    #[error("no print mode selected")]
    NoModeSelected,

    #[error("unknown print mode: {0}")]
    UnknownMode(String),

    // -- Relay --
    #[error("relay fetch failed: {0}")]
    RelayFetch(String),

    #[error("relay server error: {0}")]
    RelayServer(String),

    // -- Print flow --
    #[error("print invocation failed: {0}")]
    PrintInvocation(String),

    #[error("rendering surface error: {0}")]
    Surface(String),

    #[error("resource handle already revoked")]
    HandleRevoked,

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -- Platform bridge --
    #[error("platform bridge error: {0}")]
    Bridge(String),

    #[error("feature not available on this platform")]
    PlatformUnavailable,
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, AbdruckError>;
