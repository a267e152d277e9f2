// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scheduled one-shot actions with a cancellation handle.
//
// The print flow uses two fixed delays: one between the print-dialog handoff
// and resource cleanup, one between completion and the view-close request.
// Modelling them as explicit scheduled actions lets an abandoned job cancel
// its pending callbacks instead of relying on the host having torn down
// their targets.  Actions must tolerate firing against targets that no
// longer exist.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;

/// A delayed one-shot callback.
pub struct ScheduledAction {
    handle: JoinHandle<()>,
}

impl ScheduledAction {
    /// Run `action` after `delay`, unless cancelled first.
    pub fn schedule<F>(delay: Duration, action: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            sleep(delay).await;
            action();
        });
        Self { handle }
    }

    /// Cancel the action if it has not fired yet.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    /// Wait until the action has fired (or was cancelled).
    pub async fn finished(self) {
        // A JoinError here means the action was cancelled, not a failure.
        let _ = self.handle.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[tokio::test]
    async fn action_fires_after_delay() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&fired);

        let action = ScheduledAction::schedule(Duration::from_millis(5), move || {
            flag.store(true, Ordering::SeqCst);
        });

        assert!(!fired.load(Ordering::SeqCst));
        action.finished().await;
        assert!(fired.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn cancelled_action_never_fires() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&fired);

        let action = ScheduledAction::schedule(Duration::from_millis(5), move || {
            flag.store(true, Ordering::SeqCst);
        });

        action.cancel();
        action.finished().await;
        sleep(Duration::from_millis(20)).await;
        assert!(!fired.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn zero_delay_still_runs_the_action() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&fired);

        ScheduledAction::schedule(Duration::ZERO, move || {
            flag.store(true, Ordering::SeqCst);
        })
        .finished()
        .await;

        assert!(fired.load(Ordering::SeqCst));
    }
}
