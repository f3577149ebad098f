// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text recognition: the engine session, the ocrs backend, and the
// preprocessing pipeline that feeds it.

pub mod pipeline;
pub mod session;

#[cfg(feature = "ocr")]
pub mod ocr;

#[cfg(test)]
pub(crate) mod testing;

pub use pipeline::{PipelineRequest, PreprocessPipeline};
pub use session::{ActiveEngine, OcrSession, RecognitionBackend};

#[cfg(feature = "ocr")]
pub use ocr::OcrsBackend;
