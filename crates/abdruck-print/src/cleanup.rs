// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Exactly-once teardown of a job's releasable resources.
//
// A job can reach cleanup from several paths at once: the scheduled
// post-print action, a failure branch, abandonment of the hosting view.
// The guard holds the resource handle and the rendering surface behind a
// single done-flag so whichever path arrives first performs the teardown
// and every later arrival is a no-op.

use std::sync::{Arc, Mutex};

use tracing::{debug, error};

use abdruck_bridge::traits::RenderSurface;

use crate::resource::LocalResourceHandle;

/// Owns a job's releasable resources.
pub struct CleanupGuard {
    handle: Option<LocalResourceHandle>,
    surface: Option<Box<dyn RenderSurface>>,
    done: bool,
}

impl CleanupGuard {
    pub fn new() -> Self {
        Self {
            handle: None,
            surface: None,
            done: false,
        }
    }

    pub fn set_handle(&mut self, handle: LocalResourceHandle) {
        self.handle = Some(handle);
    }

    pub fn set_surface(&mut self, surface: Box<dyn RenderSurface>) {
        self.surface = Some(surface);
    }

    pub fn handle(&self) -> Option<&LocalResourceHandle> {
        self.handle.as_ref()
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Revoke the handle and detach the surface.
    ///
    /// The first call performs the work and returns true; later calls are
    /// no-ops.
    pub fn run(&mut self) -> bool {
        if self.done {
            debug!("cleanup already performed");
            return false;
        }
        self.done = true;

        if let Some(mut handle) = self.handle.take() {
            handle.revoke();
        }
        if let Some(mut surface) = self.surface.take() {
            surface.detach();
        }

        debug!("job resources released");
        true
    }
}

impl Default for CleanupGuard {
    fn default() -> Self {
        Self::new()
    }
}

/// Guard shared between the driver and its scheduled cleanup actions.
pub type SharedCleanup = Arc<Mutex<CleanupGuard>>;

pub fn shared() -> SharedCleanup {
    Arc::new(Mutex::new(CleanupGuard::new()))
}

/// Run `f` with the guard locked.
///
/// Returns `None` if the lock is poisoned (a sibling task panicked mid
/// cleanup); callers treat that as an unrecoverable platform fault.
pub fn with_guard<R>(guard: &SharedCleanup, f: impl FnOnce(&mut CleanupGuard) -> R) -> Option<R> {
    match guard.lock() {
        Ok(mut locked) => Some(f(&mut locked)),
        Err(e) => {
            error!(error = %e, "cleanup guard lock poisoned");
            None
        }
    }
}
