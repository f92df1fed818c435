// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages.
//
// Every technical error is mapped to plain English with a clear suggestion.
// The severity drives how a front end presents it.

use crate::error::SimReaderError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Radio busy or service restarting; trying again may work.
    Transient,
    /// User must do something (grant a permission, insert a SIM, fix a file).
    ActionRequired,
    /// Cannot be fixed by retrying or user action.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary.
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    /// Whether trying again could succeed.
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert a `SimReaderError` into a `HumanError`.
pub fn humanize_error(err: &SimReaderError) -> HumanError {
    match err {
        SimReaderError::PermissionDenied => HumanError {
            message: "The app isn't allowed to read phone information.".into(),
            suggestion: "Grant the \"Phone\" permission in the system settings for this app, then try again.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        SimReaderError::ServiceUnavailable(_) => HumanError {
            message: "The phone service isn't available.".into(),
            suggestion: "This device may not have cellular hardware, or it is in airplane mode.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        SimReaderError::Telephony(detail) => humanize_telephony_error(detail),

        SimReaderError::Fault(_) | SimReaderError::Bridge(_) => HumanError {
            message: "Reading SIM information failed unexpectedly.".into(),
            suggestion: "Try again. If this keeps happening, restart the device.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        SimReaderError::PlatformUnavailable => HumanError {
            message: "SIM information isn't available on this device.".into(),
            suggestion: "Run on an Android or iOS phone, or pass --snapshot with a recorded device snapshot.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        SimReaderError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "Check the path and try again.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "That file can't be read.".into(),
                    suggestion: "Check the file permissions.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        SimReaderError::Serialization(_) | SimReaderError::Config(_) => HumanError {
            message: "A settings or snapshot file is not valid.".into(),
            suggestion: format!("Fix the file and try again. ({err})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },
    }
}

/// Parse platform-specific telephony failure details.
fn humanize_telephony_error(detail: &str) -> HumanError {
    let lower = detail.to_ascii_lowercase();

    if lower.contains("securityexception") || lower.contains("permission") {
        HumanError {
            message: "The system blocked access to part of the SIM information.".into(),
            suggestion: "Some details need extra permissions on newer phones. Check the app's phone permissions.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        }
    } else if lower.contains("no sim") || lower.contains("absent") {
        HumanError {
            message: "No SIM card was found.".into(),
            suggestion: "Insert a SIM card or enable an eSIM, then try again.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        }
    } else {
        HumanError {
            message: "The phone service had a problem.".into(),
            suggestion: format!("Try again in a moment. (Detail: {detail})"),
            retriable: true,
            severity: Severity::Transient,
        }
    }
}
