// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages.
//
// Every technical error is mapped to plain English with a clear suggestion.
// The taxonomy uses three severity levels that drive UI presentation.

use crate::error::KartenwerkError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Worth simply trying again.
    Transient,
    /// User must do something (fill a field, pick a smaller photo,
    /// grant camera permission).
    ActionRequired,
    /// Cannot be fixed by retrying or user action on this device.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether trying the same action again can succeed unchanged.
    pub retriable: bool,
    /// Severity level (drives icon/colour in UI).
    pub severity: Severity,
}

/// Convert a `KartenwerkError` into a `HumanError` anyone can understand.
pub fn humanize_error(err: &KartenwerkError) -> HumanError {
    match err {
        // Validation and precondition messages are already written for the
        // user — pass them through as the headline.
        KartenwerkError::Validation(msg) => HumanError {
            message: msg.clone(),
            suggestion: "Fix the highlighted field and submit again.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        KartenwerkError::Precondition(msg) => HumanError {
            message: msg.clone(),
            suggestion: "Submit the form first, then download the card.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        KartenwerkError::Media(detail) => humanize_media_error(detail),

        KartenwerkError::Render(_) => HumanError {
            message: "The card couldn't be generated.".into(),
            suggestion: "Try exporting again. If this keeps happening, try removing and re-adding the photo.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        KartenwerkError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "The app doesn't have permission to write the file.".into(),
                    suggestion: "Choose a different folder to save the card in.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, your device's storage may be full.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        KartenwerkError::Serialization(_) => HumanError {
            message: "The app had an internal data problem.".into(),
            suggestion: "Try again. If this keeps happening, please report it.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        KartenwerkError::Bridge(_) => HumanError {
            message: "A device-specific feature didn't work.".into(),
            suggestion: "Try restarting the app. Some features may not be available on all devices.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        KartenwerkError::PlatformUnavailable => HumanError {
            message: "This feature isn't available on your device.".into(),
            suggestion: "Use the file picker or drag a photo in instead.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },
    }
}

/// Parse media error details into human-readable messages.
fn humanize_media_error(detail: &str) -> HumanError {
    let lower = detail.to_ascii_lowercase();

    if lower.contains("2mb") || lower.contains("file size") {
        HumanError {
            message: "That photo is too large.".into(),
            suggestion: "Pick a photo under 2MB, or take a new one with the camera.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        }
    } else if lower.contains("image file") || lower.contains("decode") {
        HumanError {
            message: "That file doesn't look like a photo.".into(),
            suggestion: "Pick a JPG or PNG image file.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        }
    } else if lower.contains("camera") || lower.contains("permission") {
        HumanError {
            message: "The camera couldn't be opened.".into(),
            suggestion: "Allow camera access in your system settings, or add a photo from a file instead.".into(),
            retriable: true,
            severity: Severity::ActionRequired,
        }
    } else {
        HumanError {
            message: "There was a problem with that photo.".into(),
            suggestion: format!("Try a different image. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_passes_through() {
        let err = KartenwerkError::Validation("Please enter a valid 10-digit phone number".into());
        let human = humanize_error(&err);
        assert!(human.message.contains("10-digit"));
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(!human.retriable);
    }

    #[test]
    fn oversized_photo_is_action_required() {
        let err = KartenwerkError::Media("File size should be less than 2MB".into());
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(human.message.contains("too large"));
    }

    #[test]
    fn camera_denial_is_retriable() {
        let err = KartenwerkError::Media("camera access denied by user".into());
        let human = humanize_error(&err);
        assert!(human.retriable);
        assert_eq!(human.severity, Severity::ActionRequired);
    }

    #[test]
    fn render_failure_is_transient() {
        let err = KartenwerkError::Render("page smaller than card".into());
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::Transient);
        assert!(human.retriable);
    }

    #[test]
    fn platform_unavailable_is_permanent() {
        let human = humanize_error(&KartenwerkError::PlatformUnavailable);
        assert_eq!(human.severity, Severity::Permanent);
        assert!(!human.retriable);
    }
}
