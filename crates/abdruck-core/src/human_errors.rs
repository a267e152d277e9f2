// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the hosting view.
//
// Every technical error is mapped to plain English with a clear suggestion.
// The severity levels drive how the message is presented.

use crate::error::AbdruckError;
use crate::types::FailureReason;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Network blip, upstream hiccup — trying again can work.
    Transient,
    /// User must supply or change something (a URL, a print mode).
    ActionRequired,
    /// Cannot be fixed by retrying with the same input or environment.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether re-running the flow with the same input can succeed.
    pub retriable: bool,
    /// Severity level (drives icon/colour in the hosting view).
    pub severity: Severity,
}

/// Convert an `AbdruckError` into a `HumanError`.
pub fn humanize_error(err: &AbdruckError) -> HumanError {
    match err {
        // -- Input validation --
        AbdruckError::MissingUrl => HumanError {
            message: "No document link was provided.".into(),
            suggestion: "Open this page from a document link, or add a ?url= parameter pointing at the document.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        AbdruckError::InvalidUrl(detail) => HumanError {
            message: "This document link isn't valid.".into(),
            suggestion: format!("Check that the link is a complete web address starting with http:// or https://. ({detail})"),
            retriable: false,
            severity: Severity::Permanent,
        },

        AbdruckError::NoModeSelected => HumanError {
            message: "No print mode selected.".into(),
            suggestion: "Choose either Print Document or Save as PDF, then try again.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        AbdruckError::UnknownMode(id) => HumanError {
            message: "That print mode isn't recognised.".into(),
            suggestion: format!("Use \"print\" or \"pdf\". (Got: {id})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        // -- Relay --
        AbdruckError::RelayFetch(detail) => HumanError {
            message: "The document couldn't be fetched.".into(),
            suggestion: format!("Check your connection and that the document is still available, then try again. ({detail})"),
            retriable: true,
            severity: Severity::Transient,
        },

        AbdruckError::RelayServer(detail) => HumanError {
            message: "The relay service had a problem.".into(),
            suggestion: format!("Try restarting the service. ({detail})"),
            retriable: true,
            severity: Severity::Transient,
        },

        // -- Print flow --
        AbdruckError::PrintInvocation(_) => HumanError {
            message: "The print dialog couldn't be opened.".into(),
            suggestion: "Close this page and start the print flow again.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        AbdruckError::Surface(_) => HumanError {
            message: "The document couldn't be prepared for printing.".into(),
            suggestion: "Close this page and start the print flow again.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        AbdruckError::HandleRevoked => HumanError {
            message: "This print job has already been cleaned up.".into(),
            suggestion: "Start the print flow again from the document link.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        // -- Storage / persistence --
        AbdruckError::Io(_) => HumanError {
            message: "A file couldn't be read or written.".into(),
            suggestion: "Check that the configuration file exists and is readable.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        AbdruckError::Serialization(_) => HumanError {
            message: "A settings file couldn't be understood.".into(),
            suggestion: "The configuration file may be damaged. Remove it to fall back to defaults.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        // -- Platform bridge --
        AbdruckError::Bridge(detail) => HumanError {
            message: "The app couldn't talk to this device's print system.".into(),
            suggestion: format!("Restart the app and try again. ({detail})"),
            retriable: false,
            severity: Severity::Permanent,
        },

        AbdruckError::PlatformUnavailable => HumanError {
            message: "Printing isn't available on this device.".into(),
            suggestion: "Open the document link on a device with printing support.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },
    }
}

/// Convert a terminal job failure into a `HumanError`.
pub fn humanize_failure(reason: &FailureReason) -> HumanError {
    match reason {
        FailureReason::InvalidOrMissingUrl => HumanError {
            message: "No valid document link was provided.".into(),
            suggestion: "Open this page from a document link with a complete web address.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },
        FailureReason::FetchFailed => HumanError {
            message: "The document couldn't be fetched.".into(),
            suggestion: "Check your connection, then try printing again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },
        FailureReason::PrintInvocationFailed => HumanError {
            message: "The print dialog couldn't be opened.".into(),
            suggestion: "Close this page and start the print flow again.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_errors_are_retriable() {
        let human = humanize_error(&AbdruckError::RelayFetch("connection refused".into()));
        assert!(human.retriable);
        assert_eq!(human.severity, Severity::Transient);
    }

    #[test]
    fn missing_url_requires_action() {
        let human = humanize_error(&AbdruckError::MissingUrl);
        assert!(!human.retriable);
        assert_eq!(human.severity, Severity::ActionRequired);
    }

    #[test]
    fn print_invocation_is_permanent() {
        let human = humanize_error(&AbdruckError::PrintInvocation("dialog refused".into()));
        assert!(!human.retriable);
        assert_eq!(human.severity, Severity::Permanent);
    }

    #[test]
    fn failure_reasons_match_error_classes() {
        assert!(humanize_failure(&FailureReason::FetchFailed).retriable);
        assert!(!humanize_failure(&FailureReason::InvalidOrMissingUrl).retriable);
        assert!(!humanize_failure(&FailureReason::PrintInvocationFailed).retriable);
    }

    #[test]
    fn detail_is_carried_into_suggestion() {
        let human = humanize_error(&AbdruckError::RelayFetch("timed out".into()));
        assert!(human.suggestion.contains("timed out"));
    }
}
