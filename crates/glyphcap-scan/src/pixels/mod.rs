// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pixel buffers and the grayscale/binarize transforms.

pub mod buffer;
pub mod processor;

pub use buffer::{ColorMode, PixelBuffer, solid_color};
pub use processor::{BINARIZE_THRESHOLD, binarize, grayscale, luminance};
