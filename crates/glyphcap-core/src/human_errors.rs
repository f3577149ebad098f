// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the person holding the camera.
//
// Every technical error is mapped to plain English with a clear suggestion.
// The severity drives how the presentation layer renders the outcome.

use crate::error::{EngineInitCause, ErrorKind, GlyphcapError};
use crate::types::RecognitionResult;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Try again as-is, or with a better photo.
    Transient,
    /// User must do something first (install language data, fix settings).
    ActionRequired,
    /// Cannot be fixed by retrying; the input itself is unusable.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether resubmitting the same request may succeed.
    pub retriable: bool,
    /// Severity level.
    pub severity: Severity,
}

/// Convert a `GlyphcapError` into a `HumanError`.
pub fn humanize_error(err: &GlyphcapError) -> HumanError {
    humanize_with_cause(err.kind(), err.engine_init_cause(), &err.to_string())
}

/// Humanize a delivered result. Returns `None` for successful results.
pub fn humanize_result(result: &RecognitionResult) -> Option<HumanError> {
    match result {
        RecognitionResult::Text(_) => None,
        RecognitionResult::Failed {
            kind,
            message,
            cause,
        } => Some(humanize_with_cause(*kind, *cause, message)),
    }
}

/// Convert an [`ErrorKind`] plus technical detail into a `HumanError`.
///
/// Without a cause, an `EngineInit` failure is reported as missing model data.
pub fn humanize_kind(kind: ErrorKind, detail: &str) -> HumanError {
    humanize_with_cause(kind, None, detail)
}

fn humanize_with_cause(kind: ErrorKind, cause: Option<EngineInitCause>, detail: &str) -> HumanError {
    match kind {
        ErrorKind::InvalidArgument => HumanError {
            message: "This photo can't be read.".into(),
            suggestion: "The picture is empty or could not be decoded. Take the photo again.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        ErrorKind::EngineInit => match cause {
            Some(EngineInitCause::MalformedLanguageCode) => HumanError {
                message: "That language code isn't valid.".into(),
                suggestion: format!(
                    "Use a lowercase language code such as `eng` or `chi_sim`. ({detail})"
                ),
                retriable: false,
                severity: Severity::ActionRequired,
            },
            Some(EngineInitCause::LanguageUnavailable) => HumanError {
                message: "The text language isn't installed.".into(),
                suggestion: format!(
                    "Install the language data for text recognition, then try again. ({detail})"
                ),
                retriable: false,
                severity: Severity::ActionRequired,
            },
            Some(EngineInitCause::ModelData) | None => HumanError {
                message: "Text recognition isn't set up yet.".into(),
                suggestion: format!(
                    "The recognition data files are missing or damaged. Reinstall them, then try again. ({detail})"
                ),
                retriable: false,
                severity: Severity::ActionRequired,
            },
        },

        ErrorKind::Recognition => HumanError {
            message: "No text was found in this photo.".into(),
            suggestion: "Try again with better lighting, holding the camera steady so the text is sharp and fills the frame.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        ErrorKind::Busy => HumanError {
            message: "Still reading the previous photo.".into(),
            suggestion: "Wait for the current result to appear, then try again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        ErrorKind::Config => HumanError {
            message: "The settings file couldn't be loaded.".into(),
            suggestion: format!("Check or delete the settings file to restore defaults. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },
    }
}
