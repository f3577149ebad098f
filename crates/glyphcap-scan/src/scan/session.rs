// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Recognition engine lifecycle.
//
// An `OcrSession` owns a backend. `initialize` validates the model data, brings
// the backend up, and hands out an `ActiveEngine` guard. The guard is the only
// way to run recognition, and dropping it (normally, on error, or while a
// panic unwinds) shuts the backend down again.

use glyphcap_core::config::{EmptyTextPolicy, PLACEHOLDER_TEXT};
use glyphcap_core::error::{ErrorKind, GlyphcapError, Result};
use glyphcap_core::types::ModelData;
use image::GrayImage;
use tracing::{debug, info, instrument, warn};

use crate::pixels::{ColorMode, PixelBuffer};

/// The external text recognition engine.
///
/// Implementations are driven strictly in the order `init` → `recognize` →
/// `end`, once per request. `end` is called even when `init` fails, so it must
/// tolerate a half-initialised backend.
pub trait RecognitionBackend: Send {
    /// Short name used in log fields.
    fn name(&self) -> &'static str;

    /// Load the models for `model.language`.
    fn init(&mut self, model: &ModelData) -> Result<()>;

    /// Recognise the text in a two-tone image (samples are 0 or 255).
    fn recognize(&mut self, image: &GrayImage) -> Result<String>;

    /// Free everything acquired by `init`.
    fn end(&mut self);
}

/// Owns a [`RecognitionBackend`] across requests.
#[derive(Debug)]
pub struct OcrSession<B> {
    backend: B,
    empty_text: EmptyTextPolicy,
}

impl<B: RecognitionBackend> OcrSession<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            empty_text: EmptyTextPolicy::default(),
        }
    }

    /// Choose how blank or failed engine output is reported.
    pub fn with_empty_text_policy(mut self, policy: EmptyTextPolicy) -> Self {
        self.empty_text = policy;
        self
    }

    pub fn empty_text_policy(&self) -> EmptyTextPolicy {
        self.empty_text
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Bring the backend up for one request.
    ///
    /// The model data is validated before the backend is touched. If the
    /// backend's own `init` fails it is ended again before the error is
    /// returned, and the error is always reported as `EngineInit`.
    #[instrument(skip_all, fields(backend = self.backend.name(), language = %model.language))]
    pub fn initialize(&mut self, model: &ModelData) -> Result<ActiveEngine<'_, B>> {
        model.validate()?;

        if let Err(err) = self.backend.init(model) {
            self.backend.end();
            let err = match err {
                err if err.kind() == ErrorKind::EngineInit => err,
                other => GlyphcapError::EngineInit(other.to_string()),
            };
            warn!(error = %err, "Engine initialisation failed");
            return Err(err);
        }

        info!(model_dir = %model.dir.display(), "Engine initialised");
        Ok(ActiveEngine {
            backend: &mut self.backend,
            empty_text: self.empty_text,
            released: false,
        })
    }

    /// Initialise, recognise `image`, and release, in one call.
    pub fn recognize_once(&mut self, model: &ModelData, image: &PixelBuffer) -> Result<String> {
        let mut engine = self.initialize(model)?;
        let outcome = engine.recognize(image);
        engine.release();
        outcome
    }
}

/// An initialised backend. Ends the backend exactly once when released or
/// dropped.
pub struct ActiveEngine<'a, B: RecognitionBackend> {
    backend: &'a mut B,
    empty_text: EmptyTextPolicy,
    released: bool,
}

impl<B: RecognitionBackend> ActiveEngine<'_, B> {
    /// Recognise the text in a Binary buffer.
    ///
    /// Blank output and backend errors are both "no usable result"; the
    /// session's [`EmptyTextPolicy`] decides whether that is an error or the
    /// placeholder text.
    #[instrument(skip_all, fields(backend = self.backend.name(), width = image.width(), height = image.height()))]
    pub fn recognize(&mut self, image: &PixelBuffer) -> Result<String> {
        if image.mode() != ColorMode::Binary {
            return Err(GlyphcapError::InvalidArgument(format!(
                "recognition expects a Binary buffer, got {:?}",
                image.mode()
            )));
        }
        let luma = image.as_luma().ok_or_else(|| {
            GlyphcapError::InvalidArgument("binary buffer without luminance samples".into())
        })?;

        let detail = match self.backend.recognize(luma) {
            Ok(text) if !text.trim().is_empty() => {
                debug!(chars = text.chars().count(), lines = text.lines().count(), "Text recognised");
                return Ok(text);
            }
            Ok(_) => "engine returned no text".to_string(),
            Err(GlyphcapError::Recognition(detail)) => detail,
            Err(other) => other.to_string(),
        };

        match self.empty_text {
            EmptyTextPolicy::Fail => Err(GlyphcapError::Recognition(detail)),
            EmptyTextPolicy::Placeholder => {
                warn!(%detail, "No usable text, returning placeholder");
                Ok(PLACEHOLDER_TEXT.to_string())
            }
        }
    }

    /// End the backend now.
    pub fn release(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if !self.released {
            self.released = true;
            self.backend.end();
            debug!(backend = self.backend.name(), "Engine released");
        }
    }
}

impl<B: RecognitionBackend> Drop for ActiveEngine<'_, B> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
