// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Client side of the relay: how the print orchestrator fetches documents.
//
// The orchestrator only sees the `DocumentFetcher` trait; `RelayClient` is
// its production implementation and calls `GET /proxy?url=` on the relay.
// Unlike the relay server, the client does materialize the body: the bytes
// become a local resource handle for the rendering surface.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::{debug, info};

use abdruck_core::error::{AbdruckError, Result};
use abdruck_core::types::TargetUrl;

/// Fallback content type when the relay response carries none.
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// A fetched document with its forwarded content type.
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    pub bytes: Bytes,
    pub content_type: String,
}

/// Seam between the orchestrator and whatever fetches documents for it.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch(&self, target: &TargetUrl) -> Result<FetchedDocument>;
}

/// Fetches documents through the relay's `/proxy` endpoint.
pub struct RelayClient {
    http: reqwest::Client,
    relay_base: String,
}

impl RelayClient {
    /// Create a client for the relay at `relay_base` (scheme + authority).
    pub fn new(relay_base: impl Into<String>, connect_timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| AbdruckError::RelayFetch(format!("build client: {e}")))?;

        Ok(Self {
            http,
            relay_base: relay_base.into().trim_end_matches('/').to_owned(),
        })
    }

    /// Build the relay request URL for a target document.
    fn proxy_url(&self, target: &TargetUrl) -> String {
        format!(
            "{}/proxy?url={}",
            self.relay_base,
            urlencoding::encode(target.as_str())
        )
    }
}

#[async_trait]
impl DocumentFetcher for RelayClient {
    async fn fetch(&self, target: &TargetUrl) -> Result<FetchedDocument> {
        let request_url = self.proxy_url(target);
        debug!(url = %request_url, "fetching document through relay");

        let response = self
            .http
            .get(&request_url)
            .send()
            .await
            .map_err(|e| AbdruckError::RelayFetch(format!("{target}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AbdruckError::RelayFetch(format!(
                "{target}: relay returned status {status}"
            )));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_owned();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AbdruckError::RelayFetch(format!("{target}: read body: {e}")))?;

        info!(
            target = %target,
            bytes = bytes.len(),
            content_type = %content_type,
            "document fetched through relay"
        );

        Ok(FetchedDocument {
            bytes,
            content_type,
        })
    }
}
