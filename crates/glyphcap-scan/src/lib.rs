// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// glyphcap-scan: image preprocessing and text recognition for glyphcap.
//
// Provides the pixel buffer type, the grayscale and fixed-threshold binarize
// transforms, the recognition engine session, and the pipeline that chains
// them for one captured photo.

pub mod pixels;
pub mod scan;

// Re-export the primary types so callers can use `glyphcap_scan::PixelBuffer` etc.
pub use pixels::{ColorMode, PixelBuffer, binarize, grayscale};
pub use scan::{
    ActiveEngine, OcrSession, PipelineRequest, PreprocessPipeline, RecognitionBackend,
};

#[cfg(feature = "ocr")]
pub use scan::OcrsBackend;
