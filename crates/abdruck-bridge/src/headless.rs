// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Headless bridge for desktop/CI builds where no webview host is embedding
// the print flow.
//
// Print methods log and report success without presenting any UI, and
// surfaces complete their load immediately (the content is already local),
// so the whole orchestration can be exercised end-to-end without a display.

use tokio::sync::oneshot;
use tracing::{debug, info};

use abdruck_core::error::Result;

use crate::traits::{
    DocumentContent, LoadSignal, NativePrint, NativeViewControl, PlatformBridge, RenderSurface,
    SurfaceHost,
};

/// Bridge used when no embedding host is present.
pub struct HeadlessBridge;

impl HeadlessBridge {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HeadlessBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformBridge for HeadlessBridge {
    fn platform_name(&self) -> &str {
        "Headless"
    }
}

impl NativePrint for HeadlessBridge {
    fn show_print_dialog(&self, document: &[u8], mime_type: &str) -> Result<()> {
        info!(
            bytes = document.len(),
            mime_type, "headless bridge: print dialog not presented"
        );
        Ok(())
    }

    fn show_pdf_preview(&self, document: &[u8], mime_type: &str) -> Result<()> {
        info!(
            bytes = document.len(),
            mime_type, "headless bridge: PDF preview not presented"
        );
        Ok(())
    }
}

impl NativeViewControl for HeadlessBridge {
    fn request_view_close(&self) -> Result<()> {
        info!("headless bridge: view close requested");
        Ok(())
    }
}

impl SurfaceHost for HeadlessBridge {
    fn create_surface(&self) -> Result<Box<dyn RenderSurface>> {
        Ok(Box::new(HeadlessSurface::new()))
    }
}

/// Surface that completes its load as soon as content is handed to it.
pub struct HeadlessSurface {
    attached: bool,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self { attached: false }
    }
}

impl Default for HeadlessSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderSurface for HeadlessSurface {
    fn begin_load(&mut self, content: DocumentContent<'_>) -> Result<LoadSignal> {
        self.attached = true;
        debug!(
            uri = content.resource_uri,
            bytes = content.bytes.len(),
            mime_type = content.mime_type,
            "headless surface loaded"
        );

        // Nothing renders asynchronously here, so the signal fires at once.
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(());
        Ok(rx)
    }

    fn detach(&mut self) {
        if self.attached {
            debug!("headless surface detached");
        }
        self.attached = false;
    }

    fn is_attached(&self) -> bool {
        self.attached
    }
}
