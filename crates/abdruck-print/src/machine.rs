// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pure transition function for the print job state machine.
//
// Every state change goes through `apply`; the async driver owns all side
// effects (fetching, surfaces, timers).  Events that are illegal in the
// current phase leave the job unchanged, and terminal phases absorb
// everything, so the machine can be fed from racing cleanup paths without
// corrupting a job.

use chrono::Utc;
use tracing::warn;

use abdruck_core::types::{FailureReason, Phase, PrintJob};

/// Events that drive a print job between phases.
#[derive(Debug, Clone)]
pub enum JobEvent {
    /// The user started the flow (URL and mode were validated beforehand).
    StartRequested,
    /// The relay produced the document.
    DocumentFetched {
        content_type: String,
        sha256: String,
        total_bytes: u64,
    },
    /// The relay call failed.
    FetchFailed { detail: String },
    /// The hidden surface finished loading the document.
    SurfaceReady,
    /// The platform surface or native print capability failed.
    PrintFailed { detail: String },
    /// Cleanup finished after a successful print invocation.
    CleanupCompleted,
}

/// Advance a job by one event, returning the new job value.
pub fn apply(mut job: PrintJob, event: JobEvent) -> PrintJob {
    if job.phase.is_terminal() {
        warn!(job_id = %job.id, phase = ?job.phase, event = ?event, "event ignored: job is terminal");
        return job;
    }

    let next = match (job.phase, &event) {
        (Phase::Initializing, JobEvent::StartRequested) => {
            job.loading = true;
            Phase::Fetching
        }

        (
            Phase::Fetching,
            JobEvent::DocumentFetched {
                content_type,
                sha256,
                total_bytes,
            },
        ) => {
            job.content_type = Some(content_type.clone());
            job.document_hash = Some(sha256.clone());
            job.total_bytes = *total_bytes;
            Phase::Rendering
        }

        (Phase::Fetching, JobEvent::FetchFailed { detail }) => {
            fail(&mut job, FailureReason::FetchFailed, detail);
            Phase::Failed
        }

        (Phase::Rendering, JobEvent::SurfaceReady) => {
            job.loading = false;
            Phase::Printing
        }

        (Phase::Rendering | Phase::Printing, JobEvent::PrintFailed { detail }) => {
            fail(&mut job, FailureReason::PrintInvocationFailed, detail);
            Phase::Failed
        }

        (Phase::Printing, JobEvent::CleanupCompleted) => Phase::Completed,

        (phase, event) => {
            warn!(job_id = %job.id, phase = ?phase, event = ?event, "event ignored in current phase");
            return job;
        }
    };

    job.phase = next;
    job.updated_at = Utc::now();
    job
}

/// Record a failure on the job. Busy indicators are cleared here so no
/// failure path can leave the hosting view spinning.
fn fail(job: &mut PrintJob, reason: FailureReason, detail: &str) {
    job.loading = false;
    job.failure = Some(reason);
    job.error_message = Some(detail.to_owned());
}

#[cfg(test)]
mod tests {
    use super::*;
    use abdruck_core::types::{JobStatus, PrintMode, TargetUrl};

    fn test_job() -> PrintJob {
        PrintJob::new(
            TargetUrl::parse("https://example.com/a.pdf").expect("valid URL"),
            PrintMode::Print,
        )
    }

    fn fetched() -> JobEvent {
        JobEvent::DocumentFetched {
            content_type: "application/pdf".into(),
            sha256: "cafe".into(),
            total_bytes: 10,
        }
    }

    #[test]
    fn happy_path_reaches_completed() {
        let mut job = test_job();

        job = apply(job, JobEvent::StartRequested);
        assert_eq!(job.phase, Phase::Fetching);
        assert!(job.loading);

        job = apply(job, fetched());
        assert_eq!(job.phase, Phase::Rendering);
        assert_eq!(job.content_type.as_deref(), Some("application/pdf"));
        assert_eq!(job.total_bytes, 10);

        job = apply(job, JobEvent::SurfaceReady);
        assert_eq!(job.phase, Phase::Printing);
        assert_eq!(job.status(), JobStatus::Printing);
        assert!(!job.loading);

        job = apply(job, JobEvent::CleanupCompleted);
        assert_eq!(job.phase, Phase::Completed);
        assert!(job.failure.is_none());
    }

    #[test]
    fn fetch_failure_is_terminal_with_reason() {
        let mut job = apply(test_job(), JobEvent::StartRequested);
        job = apply(
            job,
            JobEvent::FetchFailed {
                detail: "connection refused".into(),
            },
        );

        assert_eq!(job.phase, Phase::Failed);
        assert_eq!(job.failure, Some(FailureReason::FetchFailed));
        assert_eq!(job.error_message.as_deref(), Some("connection refused"));
        assert!(!job.loading);
    }

    #[test]
    fn print_failure_from_rendering() {
        let mut job = apply(test_job(), JobEvent::StartRequested);
        job = apply(job, fetched());
        job = apply(
            job,
            JobEvent::PrintFailed {
                detail: "surface torn down".into(),
            },
        );

        assert_eq!(job.phase, Phase::Failed);
        assert_eq!(job.failure, Some(FailureReason::PrintInvocationFailed));
    }

    #[test]
    fn print_failure_from_printing() {
        let mut job = apply(test_job(), JobEvent::StartRequested);
        job = apply(job, fetched());
        job = apply(job, JobEvent::SurfaceReady);
        job = apply(
            job,
            JobEvent::PrintFailed {
                detail: "dialog refused".into(),
            },
        );

        assert_eq!(job.phase, Phase::Failed);
        assert_eq!(job.failure, Some(FailureReason::PrintInvocationFailed));
        assert!(!job.loading);
    }

    #[test]
    fn illegal_event_leaves_job_unchanged() {
        let job = apply(test_job(), JobEvent::StartRequested);
        let before = job.phase;

        // The surface cannot be ready while the document is still fetching.
        let job = apply(job, JobEvent::SurfaceReady);
        assert_eq!(job.phase, before);
        assert!(job.loading);
    }

    #[test]
    fn terminal_phases_absorb_events() {
        let mut job = apply(test_job(), JobEvent::StartRequested);
        job = apply(
            job,
            JobEvent::FetchFailed {
                detail: "gone".into(),
            },
        );
        assert_eq!(job.phase, Phase::Failed);

        let job = apply(job, JobEvent::StartRequested);
        assert_eq!(job.phase, Phase::Failed);
        assert_eq!(job.failure, Some(FailureReason::FetchFailed));
    }

    #[test]
    fn updated_at_advances_on_transition() {
        let job = test_job();
        let created = job.updated_at;
        let job = apply(job, JobEvent::StartRequested);
        assert!(job.updated_at >= created);
    }
}
