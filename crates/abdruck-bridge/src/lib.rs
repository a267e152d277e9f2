// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Abdruck — Native platform bridge abstractions.
//
// This crate defines the trait seams between the print orchestrator and the
// platform it is embedded in: the native print dialog, the hosting view, and
// the hidden rendering surfaces documents are loaded into. Embedding hosts
// (webview shells) provide their own implementations; the headless bridge
// here serves desktop builds, CI, and tests.

pub mod headless;
pub mod traits;

use std::sync::Arc;

/// The bridge implementation for this build.
///
/// There is no in-tree webview implementation (embedders register their own
/// `PlatformBridge`), so this always resolves to the headless bridge.
pub fn platform_bridge() -> Arc<dyn traits::PlatformBridge> {
    Arc::new(headless::HeadlessBridge::new())
}

/// The surface host implementation for this build.
pub fn surface_host() -> Arc<dyn traits::SurfaceHost> {
    Arc::new(headless::HeadlessBridge::new())
}
