// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Local resource handles: revocable stand-ins for fetched document bytes.
//
// A handle is scoped to one print job and lets the rendering surface address
// the content without a second network round trip.  Revocation releases the
// bytes; every handle must be revoked exactly once on every exit path, and a
// `Drop` backstop covers jobs that are abandoned mid-flight.

use bytes::Bytes;
use sha2::{Digest, Sha256};
use tracing::debug;
use uuid::Uuid;

use abdruck_bridge::traits::DocumentContent;
use abdruck_core::error::{AbdruckError, Result};

/// URI scheme for locally held documents.
const RESOURCE_SCHEME: &str = "doc";

/// Revocable reference to one fetched document.
pub struct LocalResourceHandle {
    uri: String,
    bytes: Bytes,
    content_type: String,
    /// SHA-256 hash of the document bytes, hex-encoded.
    sha256: String,
    total_bytes: u64,
    revoked: bool,
}

impl LocalResourceHandle {
    /// Wrap fetched bytes into a fresh handle.
    pub fn new(bytes: Bytes, content_type: impl Into<String>) -> Self {
        let id = Uuid::new_v4();

        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let sha256 = hex::encode(hasher.finalize());

        let handle = Self {
            uri: format!("{RESOURCE_SCHEME}:{id}"),
            total_bytes: bytes.len() as u64,
            bytes,
            content_type: content_type.into(),
            sha256,
            revoked: false,
        };

        debug!(
            uri = %handle.uri,
            bytes = handle.total_bytes,
            content_type = %handle.content_type,
            "resource handle created"
        );
        handle
    }

    /// Local addressing URI for this handle's content.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Hex-encoded SHA-256 of the document bytes.
    pub fn sha256(&self) -> &str {
        &self.sha256
    }

    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    pub fn is_revoked(&self) -> bool {
        self.revoked
    }

    /// Borrow the content for surface loading or print invocation.
    ///
    /// # Errors
    ///
    /// Returns `HandleRevoked` once the handle has been revoked.
    pub fn content(&self) -> Result<DocumentContent<'_>> {
        if self.revoked {
            return Err(AbdruckError::HandleRevoked);
        }
        Ok(DocumentContent {
            resource_uri: &self.uri,
            bytes: &self.bytes,
            mime_type: &self.content_type,
        })
    }

    /// Release the held bytes.
    ///
    /// The first call performs the revocation and returns true; later calls
    /// are no-ops, so revocation can be reached from multiple cleanup paths.
    pub fn revoke(&mut self) -> bool {
        if self.revoked {
            debug!(uri = %self.uri, "resource handle already revoked");
            return false;
        }
        self.bytes = Bytes::new();
        self.revoked = true;
        debug!(uri = %self.uri, "resource handle revoked");
        true
    }
}

impl Drop for LocalResourceHandle {
    fn drop(&mut self) {
        if !self.revoked {
            debug!(uri = %self.uri, "resource handle dropped without revocation; releasing");
            self.revoke();
        }
    }
}

impl std::fmt::Debug for LocalResourceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalResourceHandle")
            .field("uri", &self.uri)
            .field("content_type", &self.content_type)
            .field("total_bytes", &self.total_bytes)
            .field("revoked", &self.revoked)
            .finish()
    }
}
