// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Abdruck document relay and print flow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::error::{AbdruckError, Result};

/// Unique identifier for a print job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated absolute document URL.
///
/// Both the relay and the orchestrator construct this before any use of the
/// raw value; there is no way to obtain a `TargetUrl` from unvalidated input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetUrl(Url);

impl TargetUrl {
    /// Parse a raw string as an absolute http(s) URL.
    ///
    /// Empty input is reported as a missing URL rather than an invalid one,
    /// so callers can distinguish "nothing supplied" from "garbage supplied".
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AbdruckError::MissingUrl);
        }

        let url = Url::parse(trimmed)
            .map_err(|e| AbdruckError::InvalidUrl(format!("{trimmed}: {e}")))?;

        match url.scheme() {
            "http" | "https" => Ok(Self(url)),
            other => Err(AbdruckError::InvalidUrl(format!(
                "unsupported scheme '{other}' in {trimmed}"
            ))),
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }
}

impl std::fmt::Display for TargetUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How the fetched document is handed to the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrintMode {
    /// Present the native print dialog directly.
    Print,
    /// Open a save-as-PDF preview instead of printing.
    SaveAsPdf,
}

impl PrintMode {
    /// Identifier used by mode selectors and the CLI.
    pub fn mode_id(&self) -> &'static str {
        match self {
            Self::Print => "print",
            Self::SaveAsPdf => "pdf",
        }
    }

    /// Parse a mode identifier.
    ///
    /// Unknown values are rejected here, at validation time, so invocation
    /// never has to deal with an open string set.
    pub fn from_mode_id(id: &str) -> Option<Self> {
        match id {
            "print" => Some(Self::Print),
            "pdf" => Some(Self::SaveAsPdf),
            _ => None,
        }
    }

    /// Label shown in mode selectors.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Print => "Print Document",
            Self::SaveAsPdf => "Save as PDF",
        }
    }
}

/// Fine-grained lifecycle phase of the print flow.
///
/// `Idle` and `Validating` exist before a job does (a job is only created
/// once its URL has validated); the remaining phases belong to one job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Idle,
    Validating,
    Initializing,
    /// Document bytes are being fetched through the relay.
    Fetching,
    /// The hidden surface is loading the fetched content.
    Rendering,
    /// The native print capability has been invoked; cleanup is pending.
    Printing,
    Completed,
    Failed,
}

impl Phase {
    /// Terminal phases accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Coarse status reported to observers.
    pub fn status(&self) -> JobStatus {
        match self {
            Self::Idle | Self::Validating | Self::Initializing | Self::Fetching
            | Self::Rendering => JobStatus::Initializing,
            Self::Printing => JobStatus::Printing,
            Self::Completed => JobStatus::Completed,
            Self::Failed => JobStatus::Failed,
        }
    }
}

/// Coarse job status surfaced to the hosting view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    /// Preparing: validated, fetching, or rendering.
    Initializing,
    /// Handed to the platform print capability.
    Printing,
    /// Printed and cleaned up.
    Completed,
    /// Failed — see the job's failure reason.
    Failed,
}

/// Why a job failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureReason {
    /// The invocation carried no URL, or one that does not parse.
    InvalidOrMissingUrl,
    /// The relay call failed (network, upstream, or relay error).
    FetchFailed,
    /// The platform print capability (or the surface hosting it) failed.
    PrintInvocationFailed,
}

impl FailureReason {
    /// Whether re-invoking the flow with the same input can succeed.
    ///
    /// Fetch failures are transient; the other reasons need new input or a
    /// changed environment.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::FetchFailed)
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::InvalidOrMissingUrl => "invalid or missing URL",
            Self::FetchFailed => "fetch failed",
            Self::PrintInvocationFailed => "print invocation failed",
        };
        write!(f, "{s}")
    }
}

/// A complete print job.
#[derive(Debug, Clone, Serialize)]
pub struct PrintJob {
    pub id: JobId,
    pub document_url: TargetUrl,
    pub mode: PrintMode,
    pub phase: Phase,
    /// Busy indicator for the hosting view; cleared on every terminal phase.
    pub loading: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub error_message: Option<String>,
    pub failure: Option<FailureReason>,
    /// Content type forwarded by the relay.
    pub content_type: Option<String>,
    /// SHA-256 hash of the fetched document bytes.
    pub document_hash: Option<String>,
    /// Size of the fetched document in bytes.
    pub total_bytes: u64,
}

impl PrintJob {
    /// Create a job for a validated URL and chosen mode.
    ///
    /// Jobs start in `Initializing`: validation happened before the job
    /// existed, so the pre-job phases never appear on a live job.
    pub fn new(document_url: TargetUrl, mode: PrintMode) -> Self {
        let now = Utc::now();
        Self {
            id: JobId::new(),
            document_url,
            mode,
            phase: Phase::Initializing,
            loading: false,
            created_at: now,
            updated_at: now,
            error_message: None,
            failure: None,
            content_type: None,
            document_hash: None,
            total_bytes: 0,
        }
    }

    pub fn status(&self) -> JobStatus {
        self.phase.status()
    }
}

/// Status of the relay HTTP server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServerStatus {
    Stopped,
    Starting,
    Running,
    Error,
}
