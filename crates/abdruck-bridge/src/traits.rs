// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for native capabilities.
//
// The print flow needs three things from its host: a way to invoke the
// native print capability, a way to ask the hosting view to close, and
// hidden rendering surfaces to load documents into. Each is a trait so the
// orchestrator never touches platform APIs directly.

use abdruck_core::error::Result;
use tokio::sync::oneshot;

/// Unified bridge that groups the native capabilities.
pub trait PlatformBridge: NativePrint + NativeViewControl + Send + Sync {
    /// Human-readable platform name (e.g. "Headless", "WebView host").
    fn platform_name(&self) -> &str;
}

/// Invoke the platform print capability.
pub trait NativePrint {
    /// Present the native print dialog for the given document bytes.
    /// Returns Ok(()) if the dialog was presented (user may still cancel).
    fn show_print_dialog(&self, document: &[u8], mime_type: &str) -> Result<()>;

    /// Open a save-as-PDF preview of the document instead of printing.
    fn show_pdf_preview(&self, document: &[u8], mime_type: &str) -> Result<()>;
}

/// Control over the hosting view.
pub trait NativeViewControl {
    /// Ask the hosting view to close itself.
    ///
    /// Best-effort: an error means the request could not be delivered, not
    /// that anything is wrong with the job that asked for it.
    fn request_view_close(&self) -> Result<()>;
}

/// One-shot signal that resolves exactly once, when a surface has finished
/// loading its content. A dropped sender means the surface was torn down
/// before the load completed.
pub type LoadSignal = oneshot::Receiver<()>;

/// Borrowed view of locally held document content for surface loading.
///
/// The bytes are already local; loading a surface never goes back to the
/// network.
#[derive(Debug, Clone, Copy)]
pub struct DocumentContent<'a> {
    /// Local addressing URI for the content.
    pub resource_uri: &'a str,
    pub bytes: &'a [u8],
    pub mime_type: &'a str,
}

/// Creates per-job rendering surfaces.
pub trait SurfaceHost: Send + Sync {
    /// Create a fresh, detached surface for one job.
    fn create_surface(&self) -> Result<Box<dyn RenderSurface>>;
}

/// An isolated, invisible rendering context hosting one document.
pub trait RenderSurface: Send {
    /// Attach the surface (hidden, out of the visible layout) and begin
    /// loading the given content. The returned signal fires when the load
    /// completes.
    fn begin_load(&mut self, content: DocumentContent<'_>) -> Result<LoadSignal>;

    /// Detach from the render tree and discard the content.
    ///
    /// Safe to call repeatedly, including on surfaces that never attached.
    fn detach(&mut self);

    fn is_attached(&self) -> bool;
}
