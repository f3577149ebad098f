// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipeline configuration.

use std::ffi::OsString;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::types::ModelData;

/// Text returned in place of an unusable engine result under
/// [`EmptyTextPolicy::Placeholder`].
pub const PLACEHOLDER_TEXT: &str = "Empty/Null Result";

/// Language recognised when nothing else is configured.
pub const DEFAULT_LANGUAGE: &str = "eng";

/// Decode-time reduction factor applied to captured photos.
///
/// Phone cameras produce far more pixels than OCR needs; a quarter of the
/// linear resolution keeps glyphs legible and the per-pixel passes cheap.
pub const DEFAULT_SAMPLE_SIZE: u32 = 4;

/// What to report when the engine produces no usable text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyTextPolicy {
    /// Surface a `RecognitionError`.
    #[default]
    Fail,
    /// Complete successfully with [`PLACEHOLDER_TEXT`].
    Placeholder,
}

/// Persistent pipeline settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Directory holding one sub-directory of model files per language.
    pub model_dir: PathBuf,
    /// Language code of the model to load (e.g. `eng`).
    pub language: String,
    /// Handling of blank or failed engine output.
    pub empty_text: EmptyTextPolicy,
    /// When set, intermediate grayscale/binary images are written here.
    pub debug_output_dir: Option<PathBuf>,
    /// Integer downsampling factor applied when decoding a capture.
    pub sample_size: u32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            model_dir: default_model_dir(),
            language: DEFAULT_LANGUAGE.to_string(),
            empty_text: EmptyTextPolicy::Fail,
            debug_output_dir: None,
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }
}

impl ScanConfig {
    /// The model directory and language bundled for a request.
    pub fn model_data(&self) -> ModelData {
        ModelData::new(self.model_dir.clone(), self.language.clone())
    }
}

/// Name of the per-application directory under the data home.
pub const APP_DIR_NAME: &str = "glyphcap";

/// Base directory for user data files.
///
/// Follows the XDG Base Directory specification: `$XDG_DATA_HOME`, falling
/// back to `~/.local/share`, and to the system temp directory when neither
/// variable is usable.
pub fn data_home() -> PathBuf {
    resolve_data_home(std::env::var_os("XDG_DATA_HOME"), std::env::var_os("HOME"))
}

fn resolve_data_home(xdg_data_home: Option<OsString>, home: Option<OsString>) -> PathBuf {
    // An empty variable counts as unset.
    let non_empty = |value: Option<OsString>| value.filter(|v| !v.is_empty());
    if let Some(xdg) = non_empty(xdg_data_home) {
        return PathBuf::from(xdg);
    }
    if let Some(home) = non_empty(home) {
        return PathBuf::from(home).join(".local").join("share");
    }
    std::env::temp_dir()
}

/// `<data home>/glyphcap`, where settings and models live.
pub fn app_data_dir() -> PathBuf {
    data_home().join(APP_DIR_NAME)
}

/// Default model directory: `<data home>/glyphcap/models`.
pub fn default_model_dir() -> PathBuf {
    app_data_dir().join("models")
}
