// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for glyphcap.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level error type for all glyphcap operations.
#[derive(Debug, Error)]
pub enum GlyphcapError {
    // -- Pipeline errors --
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("OCR engine initialisation failed: {0}")]
    EngineInit(String),

    #[error("OCR engine initialisation failed: unsupported language code {0:?}")]
    UnsupportedLanguage(String),

    #[error("OCR engine initialisation failed: language model '{language}' unavailable in {dir}")]
    LanguageUnavailable { language: String, dir: String },

    #[error("text recognition failed: {0}")]
    Recognition(String),

    #[error("a recognition request is already in flight")]
    Busy,

    // -- Configuration / persistence --
    #[error("configuration error: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Coarse classification of a [`GlyphcapError`].
///
/// This is what crosses the background/foreground boundary inside a
/// [`RecognitionResult::Failed`](crate::types::RecognitionResult::Failed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Zero-sized image, wrong colour mode, bad language code format.
    InvalidArgument,
    /// Model data missing, unreadable, or lacking the requested language.
    EngineInit,
    /// The engine produced no usable text.
    Recognition,
    /// Submission while another request is in flight.
    Busy,
    /// Configuration file could not be read or parsed.
    Config,
}

/// What an [`ErrorKind::EngineInit`] failure was about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EngineInitCause {
    /// The language code itself is not well formed.
    MalformedLanguageCode,
    /// The model directory exists but has nothing for the language.
    LanguageUnavailable,
    /// Model directory or model files missing, empty, or unloadable.
    ModelData,
}

impl GlyphcapError {
    /// Classify this error into its [`ErrorKind`].
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::EngineInit(_) | Self::UnsupportedLanguage(_) | Self::LanguageUnavailable { .. } => {
                ErrorKind::EngineInit
            }
            Self::Recognition(_) => ErrorKind::Recognition,
            Self::Busy => ErrorKind::Busy,
            Self::Config(_) | Self::Io(_) | Self::Serialization(_) => ErrorKind::Config,
        }
    }

    /// The finer cause of an engine initialisation failure, if this is one.
    pub fn engine_init_cause(&self) -> Option<EngineInitCause> {
        match self {
            Self::EngineInit(_) => Some(EngineInitCause::ModelData),
            Self::UnsupportedLanguage(_) => Some(EngineInitCause::MalformedLanguageCode),
            Self::LanguageUnavailable { .. } => Some(EngineInitCause::LanguageUnavailable),
            _ => None,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::InvalidArgument => "InvalidArgument",
            Self::EngineInit => "EngineInitError",
            Self::Recognition => "RecognitionError",
            Self::Busy => "Busy",
            Self::Config => "ConfigError",
        };
        f.write_str(name)
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, GlyphcapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_maps_to_a_kind() {
        assert_eq!(
            GlyphcapError::InvalidArgument("0x0".into()).kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(GlyphcapError::EngineInit("x".into()).kind(), ErrorKind::EngineInit);
        assert_eq!(GlyphcapError::Recognition("x".into()).kind(), ErrorKind::Recognition);
        assert_eq!(GlyphcapError::Busy.kind(), ErrorKind::Busy);
        assert_eq!(
            GlyphcapError::UnsupportedLanguage("ENG".into()).kind(),
            ErrorKind::EngineInit
        );

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(GlyphcapError::from(io).kind(), ErrorKind::Config);
    }

    #[test]
    fn engine_init_causes_are_structured() {
        assert_eq!(
            GlyphcapError::UnsupportedLanguage("ENG".into()).engine_init_cause(),
            Some(EngineInitCause::MalformedLanguageCode)
        );
        let unavailable = GlyphcapError::LanguageUnavailable {
            language: "deu".into(),
            dir: "/models".into(),
        };
        assert_eq!(
            unavailable.engine_init_cause(),
            Some(EngineInitCause::LanguageUnavailable)
        );
        // The message text plays no part in the classification.
        assert_eq!(
            GlyphcapError::EngineInit("language files corrupt".into()).engine_init_cause(),
            Some(EngineInitCause::ModelData)
        );
        assert_eq!(GlyphcapError::Busy.engine_init_cause(), None);
    }

    #[test]
    fn display_includes_detail() {
        let err = GlyphcapError::EngineInit("language model 'deu' unavailable".into());
        assert_eq!(
            err.to_string(),
            "OCR engine initialisation failed: language model 'deu' unavailable"
        );
    }
}
