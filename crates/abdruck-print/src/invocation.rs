// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Invocation parsing: the hosting view is opened with a `url` query
// parameter carrying a URL-encoded absolute URL.  That parameter is the sole
// external input to the print flow; the print mode is chosen interactively.

use url::Url;

use abdruck_core::error::{AbdruckError, Result};
use abdruck_core::types::{PrintMode, TargetUrl};

/// Extract and validate the document URL from the hosting view's URI.
///
/// Percent-decoding of the parameter value happens during query parsing.
/// Absence of the parameter (or an empty value) is `MissingUrl`; a value
/// that does not parse as an absolute http(s) URL is `InvalidUrl`.  No
/// print job exists until this has succeeded.
pub fn parse_invocation(invocation_uri: &str) -> Result<TargetUrl> {
    let uri = Url::parse(invocation_uri)
        .map_err(|e| AbdruckError::InvalidUrl(format!("invocation URI: {e}")))?;

    let raw = uri
        .query_pairs()
        .find(|(key, _)| key == "url")
        .map(|(_, value)| value.into_owned());

    match raw {
        None => Err(AbdruckError::MissingUrl),
        Some(value) => TargetUrl::parse(&value),
    }
}

/// A fully validated request to print one document.
///
/// Construction requires both a validated URL and a chosen mode, so the
/// start of the flow cannot be reached with either missing.
#[derive(Debug, Clone)]
pub struct PrintRequest {
    url: TargetUrl,
    mode: PrintMode,
}

impl PrintRequest {
    pub fn new(url: TargetUrl, mode: PrintMode) -> Self {
        Self { url, mode }
    }

    /// Build a request from optional parts, rejecting missing ones.
    pub fn build(url: Option<TargetUrl>, mode: Option<PrintMode>) -> Result<Self> {
        let url = url.ok_or(AbdruckError::MissingUrl)?;
        let mode = mode.ok_or(AbdruckError::NoModeSelected)?;
        Ok(Self { url, mode })
    }

    pub fn url(&self) -> &TargetUrl {
        &self.url
    }

    pub fn mode(&self) -> PrintMode {
        self.mode
    }
}
