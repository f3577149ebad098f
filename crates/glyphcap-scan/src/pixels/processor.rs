// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Preprocessing transforms: perceptual grayscale conversion and fixed-threshold
// binarization. Each transform borrows its input and returns a new buffer, so
// the caller's original capture stays intact for display.

use glyphcap_core::error::{GlyphcapError, Result};
use image::{GrayImage, Luma};
use tracing::{debug, instrument};

use super::buffer::{ColorMode, PixelBuffer};

/// ITU-R BT.601 luma weights for red, green, and blue, in thousandths.
///
/// 0.299 / 0.587 / 0.114 track the eye's sensitivity to each primary, so
/// printed text keeps its contrast after the colour is discarded. They are
/// applied in integer per-mille arithmetic: the weighted sum divided by 1000
/// is exactly the truncated floating-point luminance, without the float
/// rounding that would turn pure white into 254.
pub const LUMA_WEIGHTS_PER_MILLE: [u32; 3] = [299, 587, 114];

/// Luminance at or above which a pixel becomes white.
///
/// A single global cut-off tuned for dark ink on light paper. It is not
/// adaptive: photos with uneven lighting (shadows, flash hot-spots) lose
/// text in the dark or bright regions. That is a known accuracy limit of the
/// pipeline, kept for predictable output.
pub const BINARIZE_THRESHOLD: u8 = 162;

/// Sample value of a black pixel in a Binary buffer.
pub const BLACK: u8 = 0;

/// Sample value of a white pixel in a Binary buffer.
pub const WHITE: u8 = 255;

/// Perceptual luminance of one RGB sample, truncated to `0..=255`.
pub fn luminance([r, g, b]: [u8; 3]) -> u8 {
    let [wr, wg, wb] = LUMA_WEIGHTS_PER_MILLE;
    let weighted = wr * u32::from(r) + wg * u32::from(g) + wb * u32::from(b);
    // Weights sum to 1000, so the quotient never exceeds 255.
    (weighted / 1000) as u8
}

/// Map one luminance value onto black or white.
pub fn classify(value: u8) -> u8 {
    if value < BINARIZE_THRESHOLD { BLACK } else { WHITE }
}

/// Convert a Color buffer into a Grayscale buffer of identical dimensions.
#[instrument(skip_all, fields(width = input.width(), height = input.height()))]
pub fn grayscale(input: &PixelBuffer) -> Result<PixelBuffer> {
    ensure_non_empty("grayscale", input)?;
    let rgb = input.as_rgb().ok_or_else(|| {
        GlyphcapError::InvalidArgument(format!(
            "grayscale expects a Color buffer, got {:?}",
            input.mode()
        ))
    })?;

    let gray = GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        Luma([luminance(rgb.get_pixel(x, y).0)])
    });

    debug!("Grayscale conversion complete");
    Ok(PixelBuffer::grayscale_from(gray))
}

/// Convert a Grayscale buffer into a Binary buffer of identical dimensions.
///
/// Values below [`BINARIZE_THRESHOLD`] become [`BLACK`]; everything else
/// becomes [`WHITE`]. A Binary buffer must first be relabelled with
/// [`PixelBuffer::reinterpret_as_grayscale`].
#[instrument(skip_all, fields(width = input.width(), height = input.height()))]
pub fn binarize(input: &PixelBuffer) -> Result<PixelBuffer> {
    ensure_non_empty("binarize", input)?;
    if input.mode() != ColorMode::Grayscale {
        return Err(GlyphcapError::InvalidArgument(format!(
            "binarize expects a Grayscale buffer, got {:?}",
            input.mode()
        )));
    }
    let gray = input.as_luma().ok_or_else(|| {
        GlyphcapError::InvalidArgument("grayscale buffer without luminance samples".into())
    })?;

    let binary = GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        Luma([classify(gray.get_pixel(x, y).0[0])])
    });

    let black = binary.as_raw().iter().filter(|&&v| v == BLACK).count();
    debug!(black, threshold = BINARIZE_THRESHOLD, "Binarization complete");
    Ok(PixelBuffer::binary_from(binary))
}

fn ensure_non_empty(stage: &str, input: &PixelBuffer) -> Result<()> {
    if input.is_empty() {
        return Err(GlyphcapError::InvalidArgument(format!(
            "{stage}: image must have positive dimensions, got {}x{}",
            input.width(),
            input.height()
        )));
    }
    Ok(())
}

// -- Tests --------------------------------------------------------------------
