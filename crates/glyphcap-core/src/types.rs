// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the glyphcap recognition pipeline.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineInitCause, ErrorKind, GlyphcapError, Result};

/// Unique identifier for a recognition request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Location of the recognition engine's model files for one language.
///
/// Layout: `<dir>/<language>/` contains the files the backend needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelData {
    pub dir: PathBuf,
    pub language: String,
}

impl ModelData {
    pub fn new(dir: impl Into<PathBuf>, language: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            language: language.into(),
        }
    }

    /// Directory holding the model files for [`language`](Self::language).
    pub fn language_dir(&self) -> PathBuf {
        self.dir.join(&self.language)
    }

    /// Path of a named model file inside the language directory.
    pub fn model_file(&self, file_name: &str) -> PathBuf {
        self.language_dir().join(file_name)
    }

    /// Check that the model directory exists and provides the language.
    ///
    /// Everything that goes wrong here is an `EngineInit` error: the
    /// provisioning collaborator is responsible for the directory, the
    /// pipeline only reports on it.
    pub fn validate(&self) -> Result<()> {
        if !is_valid_language_code(&self.language) {
            return Err(GlyphcapError::UnsupportedLanguage(self.language.clone()));
        }
        if !self.dir.is_dir() {
            return Err(GlyphcapError::EngineInit(format!(
                "model data directory not found at {}",
                self.dir.display()
            )));
        }
        let language_dir = self.language_dir();
        if !language_dir.is_dir() {
            return Err(GlyphcapError::LanguageUnavailable {
                language: self.language.clone(),
                dir: self.dir.display().to_string(),
            });
        }
        Ok(())
    }

    /// Check that a required model file is present and readable.
    pub fn require_file(&self, file_name: &str) -> Result<PathBuf> {
        let path = self.model_file(file_name);
        ensure_readable_file(&path)?;
        Ok(path)
    }
}

fn ensure_readable_file(path: &Path) -> Result<()> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() && meta.len() > 0 => Ok(()),
        Ok(_) => Err(GlyphcapError::EngineInit(format!(
            "model file {} is empty or not a regular file",
            path.display()
        ))),
        Err(err) => Err(GlyphcapError::EngineInit(format!(
            "model file {} unreadable: {}",
            path.display(),
            err
        ))),
    }
}

/// Lowercase ASCII letters, digits, and `_` only (`eng`, `chi_sim`).
fn is_valid_language_code(code: &str) -> bool {
    !code.is_empty()
        && code
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// Outcome of one recognition request, delivered exactly once to the
/// result callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecognitionResult {
    /// Recognised text.
    Text(String),
    /// The request failed; `message` is the technical detail.
    Failed {
        kind: ErrorKind,
        message: String,
        /// Set for `EngineInit` failures.
        #[serde(default)]
        cause: Option<EngineInitCause>,
    },
}

impl RecognitionResult {
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// The recognised text, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Failed { .. } => None,
        }
    }

    /// The failure classification, if any.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Text(_) => None,
            Self::Failed { kind, .. } => Some(*kind),
        }
    }
}

impl From<Result<String>> for RecognitionResult {
    fn from(outcome: Result<String>) -> Self {
        match outcome {
            Ok(text) => Self::Text(text),
            Err(err) => Self::from(err),
        }
    }
}

impl From<GlyphcapError> for RecognitionResult {
    fn from(err: GlyphcapError) -> Self {
        Self::Failed {
            kind: err.kind(),
            message: err.to_string(),
            cause: err.engine_init_cause(),
        }
    }
}

/// Lifecycle of the orchestrator's current request.
///
/// `Completed` and `Failed` are terminal for that request; the orchestrator
/// accepts a new submission from either of them (or from `Idle`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OrchestratorState {
    /// Nothing submitted yet.
    #[default]
    Idle,
    /// A request is in flight; its callback has not fired yet.
    Running,
    /// The last request delivered `RecognitionResult::Text`.
    Completed,
    /// The last request delivered `RecognitionResult::Failed`.
    Failed,
}

impl OrchestratorState {
    /// Whether a new request may be submitted.
    pub fn accepts_submission(self) -> bool {
        !matches!(self, Self::Running)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_missing_directory() {
        let model = ModelData::new("/nonexistent/glyphcap-models", "eng");
        let err = model.validate().expect_err("missing dir must fail");
        assert_eq!(err.kind(), ErrorKind::EngineInit);
    }

    #[test]
    fn validate_rejects_missing_language() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir(dir.path().join("eng")).expect("mkdir eng");

        let model = ModelData::new(dir.path(), "deu");
        let err = model.validate().expect_err("deu is not provisioned");
        assert_eq!(err.kind(), ErrorKind::EngineInit);
        assert!(err.to_string().contains("'deu'"));

        assert!(ModelData::new(dir.path(), "eng").validate().is_ok());
    }

    #[test]
    fn validate_rejects_malformed_language_codes() {
        let dir = tempfile::tempdir().expect("tempdir");
        for code in ["", "../eng", "ENG", "en g"] {
            let err = ModelData::new(dir.path(), code)
                .validate()
                .expect_err("malformed code");
            assert_eq!(err.kind(), ErrorKind::EngineInit, "code {code:?}");
            assert_eq!(
                err.engine_init_cause(),
                Some(EngineInitCause::MalformedLanguageCode),
                "code {code:?}"
            );
        }
    }

    #[test]
    fn require_file_checks_presence_and_size() {
        let dir = tempfile::tempdir().expect("tempdir");
        let lang = dir.path().join("eng");
        std::fs::create_dir(&lang).expect("mkdir eng");
        std::fs::write(lang.join("empty.rten"), b"").expect("write empty");
        std::fs::write(lang.join("model.rten"), b"weights").expect("write model");

        let model = ModelData::new(dir.path(), "eng");
        assert!(model.require_file("missing.rten").is_err());
        assert!(model.require_file("empty.rten").is_err());
        assert_eq!(
            model.require_file("model.rten").expect("present"),
            lang.join("model.rten")
        );
    }

    #[test]
    fn result_from_error_keeps_kind_and_message() {
        let result = RecognitionResult::from(GlyphcapError::Recognition("blank page".into()));
        assert_eq!(result.error_kind(), Some(ErrorKind::Recognition));
        assert!(!result.is_text());
        match result {
            RecognitionResult::Failed { message, .. } => {
                assert_eq!(message, "text recognition failed: blank page")
            }
            RecognitionResult::Text(_) => panic!("expected failure"),
        }
    }

    #[test]
    fn result_from_engine_init_error_carries_cause() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = ModelData::new(dir.path(), "deu")
            .validate()
            .expect_err("no deu directory");
        let result = RecognitionResult::from(err);
        match result {
            RecognitionResult::Failed { kind, cause, .. } => {
                assert_eq!(kind, ErrorKind::EngineInit);
                assert_eq!(cause, Some(EngineInitCause::LanguageUnavailable));
            }
            RecognitionResult::Text(_) => panic!("expected failure"),
        }
    }

    #[test]
    fn only_running_rejects_submission() {
        assert!(OrchestratorState::Idle.accepts_submission());
        assert!(!OrchestratorState::Running.accepts_submission());
        assert!(OrchestratorState::Completed.accepts_submission());
        assert!(OrchestratorState::Failed.accepts_submission());
    }
}
