// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Recognition backend built on the `ocrs` crate, a pure-Rust OCR engine whose
// neural network models are executed via `rten`.
//
// # Feature Gate
//
// Only compiled with the `ocr` feature:
//
// ```toml
// glyphcap-scan = { path = "crates/glyphcap-scan", features = ["ocr"] }
// ```
//
// # Model Layout
//
// Each language directory under the model directory holds two files:
//
// - `text-detection.rten` locates text regions in the image.
// - `text-recognition.rten` decodes characters from detected regions.
//
// e.g. `~/.local/share/glyphcap/models/eng/text-detection.rten`.
//
// **Important:** `ocrs` and `rten` must be compiled in release mode. Debug
// builds are 10-100x slower.

use glyphcap_core::error::{GlyphcapError, Result};
use glyphcap_core::types::ModelData;
use image::{GrayImage, Rgb, RgbImage};
use ocrs::{ImageSource, OcrEngine, OcrEngineParams};
use rten::Model;
use tracing::{debug, info, instrument};

/// Well-known filenames for the detection and recognition models.
pub const DETECTION_MODEL_FILENAME: &str = "text-detection.rten";
pub const RECOGNITION_MODEL_FILENAME: &str = "text-recognition.rten";

/// [`RecognitionBackend`](super::RecognitionBackend) backed by `ocrs`.
///
/// Holds no engine until `init`; `end` drops the loaded models.
#[derive(Default)]
pub struct OcrsBackend {
    engine: Option<OcrEngine>,
}

impl OcrsBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether models are currently loaded.
    pub fn is_loaded(&self) -> bool {
        self.engine.is_some()
    }
}

fn load_model(model: &ModelData, file_name: &str) -> Result<Model> {
    let path = model.require_file(file_name)?;
    info!(path = %path.display(), "Loading OCR model");
    Model::load_file(&path).map_err(|err| {
        GlyphcapError::EngineInit(format!(
            "failed to load {} for language '{}': {}",
            path.display(),
            model.language,
            err
        ))
    })
}

impl super::RecognitionBackend for OcrsBackend {
    fn name(&self) -> &'static str {
        "ocrs"
    }

    #[instrument(skip_all, fields(language = %model.language))]
    fn init(&mut self, model: &ModelData) -> Result<()> {
        let detection_model = load_model(model, DETECTION_MODEL_FILENAME)?;
        let recognition_model = load_model(model, RECOGNITION_MODEL_FILENAME)?;

        let engine = OcrEngine::new(OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: Some(recognition_model),
            ..Default::default()
        })
        .map_err(|err| GlyphcapError::EngineInit(format!("failed to initialise OCR engine: {}", err)))?;

        self.engine = Some(engine);
        Ok(())
    }

    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    fn recognize(&mut self, image: &GrayImage) -> Result<String> {
        let engine = self
            .engine
            .as_ref()
            .ok_or_else(|| GlyphcapError::Recognition("OCR engine not initialised".into()))?;

        // ocrs expects interleaved RGB.
        let rgb = RgbImage::from_fn(image.width(), image.height(), |x, y| {
            let [v] = image.get_pixel(x, y).0;
            Rgb([v, v, v])
        });

        let source = ImageSource::from_bytes(rgb.as_raw(), rgb.dimensions()).map_err(|err| {
            GlyphcapError::Recognition(format!(
                "failed to create image source ({}x{}): {}",
                rgb.width(),
                rgb.height(),
                err
            ))
        })?;

        let input = engine
            .prepare_input(source)
            .map_err(|err| GlyphcapError::Recognition(format!("OCR preprocessing failed: {}", err)))?;

        let text = engine
            .get_text(&input)
            .map_err(|err| GlyphcapError::Recognition(format!("OCR text recognition failed: {}", err)))?;

        debug!(line_count = text.lines().count(), char_count = text.len(), "OCR pass complete");
        Ok(text)
    }

    fn end(&mut self) {
        if self.engine.take().is_some() {
            debug!("OCR models unloaded");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::RecognitionBackend;
    use crate::scan::testing::provisioned_model;
    use glyphcap_core::ErrorKind;

    #[test]
    fn init_requires_both_model_files() {
        let (_dir, model) = provisioned_model("eng");
        let mut backend = OcrsBackend::new();

        let err = backend.init(&model).expect_err("no model files");
        assert_eq!(err.kind(), ErrorKind::EngineInit);
        assert!(err.to_string().contains(DETECTION_MODEL_FILENAME));
        assert!(!backend.is_loaded());
    }

    #[test]
    fn corrupt_model_is_an_init_error() {
        let (_dir, model) = provisioned_model("eng");
        for name in [DETECTION_MODEL_FILENAME, RECOGNITION_MODEL_FILENAME] {
            std::fs::write(model.model_file(name), b"not a model").expect("write model");
        }

        let mut backend = OcrsBackend::new();
        let err = backend.init(&model).expect_err("garbage weights");
        assert_eq!(err.kind(), ErrorKind::EngineInit);
        assert!(err.to_string().contains("'eng'"));
    }

    #[test]
    fn recognize_before_init_fails() {
        let mut backend = OcrsBackend::new();
        let err = backend
            .recognize(&GrayImage::new(4, 4))
            .expect_err("not initialised");
        assert_eq!(err.kind(), ErrorKind::Recognition);
    }

    #[test]
    fn end_is_safe_without_init() {
        let mut backend = OcrsBackend::new();
        backend.end();
        backend.end();
        assert!(!backend.is_loaded());
    }
}
