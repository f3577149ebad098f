// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The preprocessing pipeline: grayscale, binarize, recognise. The order is
// fixed and the first failing stage ends the request.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use glyphcap_core::config::ScanConfig;
use glyphcap_core::error::{GlyphcapError, Result};
use glyphcap_core::types::{ModelData, RequestId};
use tracing::{debug, info, instrument, warn};

use super::session::{OcrSession, RecognitionBackend};
use crate::pixels::{PixelBuffer, binarize, grayscale};

/// File names of the intermediate images written in debug mode.
pub const GRAYSCALE_DUMP: &str = "01_grayscale.png";
pub const BINARY_DUMP: &str = "02_binary.png";

/// One captured image to recognise, with the model data to use.
#[derive(Debug, Clone)]
pub struct PipelineRequest {
    pub id: RequestId,
    /// Decoded, orientation-corrected Color capture.
    pub image: PixelBuffer,
    pub model: ModelData,
    pub submitted_at: DateTime<Utc>,
}

impl PipelineRequest {
    pub fn new(image: PixelBuffer, model: ModelData) -> Self {
        Self {
            id: RequestId::new(),
            image,
            model,
            submitted_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PreprocessPipeline {
    debug_output_dir: Option<PathBuf>,
}

impl PreprocessPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ScanConfig) -> Self {
        Self {
            debug_output_dir: config.debug_output_dir.clone(),
        }
    }

    /// Write the intermediate images of every request under `dir`.
    pub fn with_debug_output(mut self, dir: impl Into<PathBuf>) -> Self {
        self.debug_output_dir = Some(dir.into());
        self
    }

    pub fn debug_output_dir(&self) -> Option<&Path> {
        self.debug_output_dir.as_deref()
    }

    /// The two pixel stages alone: `binarize(grayscale(image))`.
    pub fn prepare(&self, image: &PixelBuffer) -> Result<PixelBuffer> {
        binarize(&grayscale(image)?)
    }

    /// Run every stage for `request`.
    ///
    /// The engine is only initialised once both pixel stages have succeeded,
    /// and is released before this returns.
    #[instrument(skip_all, fields(request_id = %request.id, width = request.image.width(), height = request.image.height()))]
    pub fn run<B: RecognitionBackend>(
        &self,
        session: &mut OcrSession<B>,
        request: &PipelineRequest,
    ) -> Result<String> {
        let started = Utc::now();
        let queued_ms = (started - request.submitted_at).num_milliseconds();
        debug!(queued_ms, "Pipeline started");

        let gray = grayscale(&request.image)?;
        self.dump(request.id, GRAYSCALE_DUMP, &gray);

        let binary = binarize(&gray)?;
        drop(gray);
        self.dump(request.id, BINARY_DUMP, &binary);

        let outcome = session.recognize_once(&request.model, &binary);

        let elapsed_ms = (Utc::now() - started).num_milliseconds();
        match &outcome {
            Ok(text) => info!(elapsed_ms, chars = text.chars().count(), "Pipeline complete"),
            Err(err) => warn!(elapsed_ms, error = %err, "Pipeline failed"),
        }
        outcome
    }

    fn dump(&self, id: RequestId, file_name: &str, image: &PixelBuffer) {
        let Some(root) = &self.debug_output_dir else {
            return;
        };
        let dir = root.join(id.to_string());
        let path = dir.join(file_name);
        let written = std::fs::create_dir_all(&dir)
            .map_err(GlyphcapError::from)
            .and_then(|()| image.save(&path));
        match written {
            Ok(()) => debug!(path = %path.display(), "Wrote debug image"),
            Err(err) => warn!(path = %path.display(), error = %err, "Could not write debug image"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixels::{ColorMode, solid_color};
    use crate::scan::testing::{Reply, StubBackend, provisioned_model};
    use glyphcap_core::ErrorKind;

    fn reference_capture() -> PixelBuffer {
        PixelBuffer::from_rgb_samples(
            2,
            2,
            &[[0, 0, 0], [255, 255, 255], [100, 100, 100], [200, 200, 200]],
        )
        .expect("2x2 capture")
    }

    #[test]
    fn prepare_binarizes_the_reference_capture() {
        let binary = PreprocessPipeline::new()
            .prepare(&reference_capture())
            .expect("prepare");
        assert_eq!(binary.mode(), ColorMode::Binary);
        assert_eq!(binary.luma_samples().expect("luma"), &[0, 255, 0, 255]);
    }

    #[test]
    fn end_to_end_with_echo_engine() {
        let (_dir, model) = provisioned_model("eng");
        let stub = StubBackend::replying(Reply::Text("OK".into()));
        let counters = stub.counters();
        let mut session = OcrSession::new(stub);

        let request = PipelineRequest::new(reference_capture(), model);
        let text = PreprocessPipeline::new()
            .run(&mut session, &request)
            .expect("pipeline");

        assert_eq!(text, "OK");
        assert_eq!(counters.seen(), vec![vec![0, 255, 0, 255]]);
        assert_eq!(counters.inits(), 1);
        assert_eq!(counters.releases(), 1);
    }

    #[test]
    fn empty_capture_short_circuits_before_the_engine() {
        let (_dir, model) = provisioned_model("eng");
        let stub = StubBackend::replying(Reply::Text("OK".into()));
        let counters = stub.counters();
        let mut session = OcrSession::new(stub);

        let empty = PixelBuffer::from_rgb_samples(0, 0, &[]).expect("0x0");
        let err = PreprocessPipeline::new()
            .run(&mut session, &PipelineRequest::new(empty, model))
            .expect_err("empty capture");

        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(counters.inits(), 0);
        assert_eq!(counters.recognitions(), 0);
    }

    #[test]
    fn engine_errors_propagate_with_balanced_teardown() {
        let stub = StubBackend::replying(Reply::Text("OK".into()));
        let counters = stub.counters();
        let mut session = OcrSession::new(stub);

        let request = PipelineRequest::new(
            reference_capture(),
            ModelData::new("/nonexistent/glyphcap", "eng"),
        );
        let err = PreprocessPipeline::new()
            .run(&mut session, &request)
            .expect_err("missing models");

        assert_eq!(err.kind(), ErrorKind::EngineInit);
        assert_eq!(counters.inits(), counters.releases());
    }

    #[test]
    fn debug_output_writes_both_stages() {
        let (_models, model) = provisioned_model("eng");
        let debug_dir = tempfile::tempdir().expect("debug dir");
        let mut session = OcrSession::new(StubBackend::replying(Reply::Text("OK".into())));

        let request = PipelineRequest::new(solid_color(8, 8, [30, 30, 30]), model);
        PreprocessPipeline::new()
            .with_debug_output(debug_dir.path())
            .run(&mut session, &request)
            .expect("pipeline");

        let request_dir = debug_dir.path().join(request.id.to_string());
        assert!(request_dir.join(GRAYSCALE_DUMP).is_file());
        assert!(request_dir.join(BINARY_DUMP).is_file());

        let reopened = image::open(request_dir.join(BINARY_DUMP))
            .expect("decode dump")
            .to_luma8();
        assert!(reopened.as_raw().iter().all(|&v| v == 0));
    }

    #[test]
    fn unwritable_debug_output_does_not_fail_the_request() {
        let (_models, model) = provisioned_model("eng");
        let scratch = tempfile::tempdir().expect("scratch");
        let not_a_dir = scratch.path().join("occupied");
        std::fs::write(&not_a_dir, b"file").expect("write file");

        let mut session = OcrSession::new(StubBackend::replying(Reply::Text("OK".into())));
        let text = PreprocessPipeline::new()
            .with_debug_output(&not_a_dir)
            .run(&mut session, &PipelineRequest::new(reference_capture(), model))
            .expect("pipeline");
        assert_eq!(text, "OK");
    }

    #[test]
    fn from_config_picks_up_debug_dir() {
        let config = ScanConfig {
            debug_output_dir: Some(PathBuf::from("/tmp/glyphcap-debug")),
            ..ScanConfig::default()
        };
        let pipeline = PreprocessPipeline::from_config(&config);
        assert_eq!(
            pipeline.debug_output_dir(),
            Some(Path::new("/tmp/glyphcap-debug"))
        );
    }
}
