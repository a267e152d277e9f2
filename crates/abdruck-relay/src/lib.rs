// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Abdruck Relay — same-origin document relay.  The server side streams
// arbitrary remote documents back to the caller without buffering or
// transformation; the client side is what the print orchestrator uses to
// fetch documents through it.

pub mod client;
pub mod proxy;
pub mod server;

pub use client::{DocumentFetcher, FetchedDocument, RelayClient};
pub use proxy::{ProxyState, router};
pub use server::RelayServer;
