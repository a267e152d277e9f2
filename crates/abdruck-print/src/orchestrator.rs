// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The async driver of the print flow.
//
// All side effects live here: the relay fetch, surface creation and loading,
// the native print invocation, and the two scheduled delays.  State changes
// go exclusively through the pure transition function in `machine`, and all
// post-load teardown goes through the shared `CleanupGuard`, so every exit
// path releases the handle and surface exactly once.
//
// Ordering guarantee: the native print invocation is sequenced strictly
// after the surface's one-shot load signal; there is no timer-based guess.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, instrument, warn};

use abdruck_bridge::traits::{PlatformBridge, SurfaceHost};
use abdruck_core::config::AppConfig;
use abdruck_core::error::{AbdruckError, Result};
use abdruck_core::types::{PrintJob, PrintMode};
use abdruck_relay::client::DocumentFetcher;

use crate::cleanup::{self, with_guard};
use crate::invocation::{PrintRequest, parse_invocation};
use crate::machine::{JobEvent, apply};
use crate::resource::LocalResourceHandle;
use crate::timer::ScheduledAction;

/// Fixed delays decoupling the print-dialog handoff from cleanup, and
/// completion from the view-close request.
#[derive(Debug, Clone, Copy)]
pub struct CleanupTiming {
    pub cleanup_delay: Duration,
    pub view_close_delay: Duration,
}

impl Default for CleanupTiming {
    fn default() -> Self {
        Self {
            cleanup_delay: Duration::from_millis(1000),
            view_close_delay: Duration::from_millis(2000),
        }
    }
}

impl From<&AppConfig> for CleanupTiming {
    fn from(config: &AppConfig) -> Self {
        Self {
            cleanup_delay: config.cleanup_delay(),
            view_close_delay: config.view_close_delay(),
        }
    }
}

/// Drives print jobs to a terminal state.
pub struct PrintOrchestrator {
    fetcher: Arc<dyn DocumentFetcher>,
    bridge: Arc<dyn PlatformBridge>,
    surfaces: Arc<dyn SurfaceHost>,
    timing: CleanupTiming,
}

impl PrintOrchestrator {
    pub fn new(
        fetcher: Arc<dyn DocumentFetcher>,
        bridge: Arc<dyn PlatformBridge>,
        surfaces: Arc<dyn SurfaceHost>,
        timing: CleanupTiming,
    ) -> Self {
        Self {
            fetcher,
            bridge,
            surfaces,
            timing,
        }
    }

    /// Drive a job from a raw invocation URI and an optional user-chosen mode.
    ///
    /// # Errors
    ///
    /// Validation failures (missing/invalid URL, no mode) are returned as
    /// errors without creating a print job, and without any relay call.
    pub async fn run_from_invocation(
        &self,
        invocation_uri: &str,
        mode: Option<PrintMode>,
    ) -> Result<PrintJob> {
        let url = parse_invocation(invocation_uri)?;
        let request = PrintRequest::build(Some(url), mode)?;
        Ok(self.run(request).await)
    }

    /// Run one validated print request to a terminal state.
    #[instrument(skip(self), fields(url = %request.url(), mode = ?request.mode()))]
    pub async fn run(&self, request: PrintRequest) -> PrintJob {
        let mut job = PrintJob::new(request.url().clone(), request.mode());
        info!(job_id = %job.id, "print job created");

        job = apply(job, JobEvent::StartRequested);

        // Fetch through the relay.
        let fetched = match self.fetcher.fetch(request.url()).await {
            Ok(doc) => doc,
            Err(e) => {
                warn!(job_id = %job.id, error = %e, "document fetch failed");
                return apply(
                    job,
                    JobEvent::FetchFailed {
                        detail: e.to_string(),
                    },
                );
            }
        };

        let mut handle = LocalResourceHandle::new(fetched.bytes, fetched.content_type);
        job = apply(
            job,
            JobEvent::DocumentFetched {
                content_type: handle.content_type().to_owned(),
                sha256: handle.sha256().to_owned(),
                total_bytes: handle.total_bytes(),
            },
        );

        // Bind the handle to a fresh hidden surface.
        let mut surface = match self.surfaces.create_surface() {
            Ok(surface) => surface,
            Err(e) => {
                warn!(job_id = %job.id, error = %e, "surface creation failed");
                handle.revoke();
                return apply(
                    job,
                    JobEvent::PrintFailed {
                        detail: e.to_string(),
                    },
                );
            }
        };

        let signal = match handle.content().and_then(|c| surface.begin_load(c)) {
            Ok(signal) => signal,
            Err(e) => {
                warn!(job_id = %job.id, error = %e, "surface load failed to start");
                surface.detach();
                handle.revoke();
                return apply(
                    job,
                    JobEvent::PrintFailed {
                        detail: e.to_string(),
                    },
                );
            }
        };

        // From here on both resources live in the shared guard; every exit
        // path releases them through it, at most once.
        let guard = cleanup::shared();
        with_guard(&guard, |g| {
            g.set_handle(handle);
            g.set_surface(surface);
        });

        // Print is unreachable before the one-shot load signal resolves.
        if signal.await.is_err() {
            // Sender dropped: the surface was torn down mid-load.
            warn!(job_id = %job.id, "surface torn down before its content loaded");
            with_guard(&guard, |g| g.run());
            return apply(
                job,
                JobEvent::PrintFailed {
                    detail: "rendering surface was torn down before its content loaded".into(),
                },
            );
        }

        job = apply(job, JobEvent::SurfaceReady);

        // Invoke the platform print capability on the loaded content.
        let print_result = with_guard(&guard, |g| match g.handle() {
            Some(h) => h.content().and_then(|c| match job.mode {
                PrintMode::Print => self.bridge.show_print_dialog(c.bytes, c.mime_type),
                PrintMode::SaveAsPdf => self.bridge.show_pdf_preview(c.bytes, c.mime_type),
            }),
            None => Err(AbdruckError::HandleRevoked),
        })
        .unwrap_or_else(|| Err(AbdruckError::Bridge("cleanup guard poisoned".into())));

        if let Err(e) = print_result {
            warn!(job_id = %job.id, error = %e, "native print invocation failed");
            with_guard(&guard, |g| g.run());
            return apply(
                job,
                JobEvent::PrintFailed {
                    detail: e.to_string(),
                },
            );
        }

        info!(job_id = %job.id, mode = ?job.mode, "native print invoked");

        // Release resources on a fixed delay, decoupled from the dialog
        // handoff.  The action tolerates an already-cleaned guard.
        let cleanup_action = ScheduledAction::schedule(self.timing.cleanup_delay, {
            let guard = Arc::clone(&guard);
            move || {
                let _ = with_guard(&guard, |g| g.run());
            }
        });
        cleanup_action.finished().await;

        job = apply(job, JobEvent::CleanupCompleted);
        info!(job_id = %job.id, "print job completed");

        // Ask the hosting view to close itself, best-effort.
        let close_action = ScheduledAction::schedule(self.timing.view_close_delay, {
            let bridge = Arc::clone(&self.bridge);
            move || {
                if let Err(e) = bridge.request_view_close() {
                    warn!(error = %e, "view close request failed");
                }
            }
        });
        close_action.finished().await;

        job
    }
}
