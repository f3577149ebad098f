// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pixel buffer, the owned sample grid every preprocessing stage consumes and
// produces. Samples are stored in `image` crate buffers so decoding, resizing,
// and encoding reuse the ecosystem codecs.

use std::path::Path;

use glyphcap_core::error::{GlyphcapError, Result};
use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Rgb, RgbImage};
use tracing::{debug, info, instrument};

/// How the samples of a [`PixelBuffer`] are to be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorMode {
    /// One RGB triple per pixel.
    Color,
    /// One luminance value per pixel, any of 0..=255.
    Grayscale,
    /// One luminance value per pixel, only 0 (black) or 255 (white).
    Binary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Samples {
    Rgb(RgbImage),
    Luma(GrayImage),
}

/// An owned 2D grid of samples in row-major order.
///
/// Invariant: the sample count is always `width * height`, and a `Binary`
/// buffer only ever holds 0 and 255. Binary buffers can only be produced by
/// [`binarize`](crate::pixels::processor::binarize).
///
/// A zero-sized buffer can be constructed (decoders occasionally yield one)
/// but every transform rejects it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    mode: ColorMode,
    samples: Samples,
}

impl PixelBuffer {
    // -- Construction ---------------------------------------------------------

    /// Build a Color buffer from RGB triples in row-major order.
    pub fn from_rgb_samples(width: u32, height: u32, samples: &[[u8; 3]]) -> Result<Self> {
        ensure_sample_count(width, height, samples.len())?;
        let raw: Vec<u8> = samples.iter().flatten().copied().collect();
        let image = RgbImage::from_raw(width, height, raw).ok_or_else(|| {
            GlyphcapError::InvalidArgument(format!(
                "RGB sample buffer does not fit {width}x{height}"
            ))
        })?;
        Ok(Self::from_rgb_image(image))
    }

    /// Build a Grayscale buffer from luminance values in row-major order.
    pub fn from_luma_samples(width: u32, height: u32, samples: Vec<u8>) -> Result<Self> {
        ensure_sample_count(width, height, samples.len())?;
        let image = GrayImage::from_raw(width, height, samples).ok_or_else(|| {
            GlyphcapError::InvalidArgument(format!(
                "luminance sample buffer does not fit {width}x{height}"
            ))
        })?;
        Ok(Self::grayscale_from(image))
    }

    /// Wrap an RGB image as a Color buffer.
    pub fn from_rgb_image(image: RgbImage) -> Self {
        Self {
            mode: ColorMode::Color,
            samples: Samples::Rgb(image),
        }
    }

    /// Convert any decoded image into a Color buffer (alpha is dropped).
    pub fn from_dynamic(image: &DynamicImage) -> Self {
        Self::from_rgb_image(image.to_rgb8())
    }

    /// Decode a captured photo from disk into a Color buffer.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let image = image::open(path.as_ref()).map_err(|err| {
            GlyphcapError::InvalidArgument(format!(
                "failed to decode capture {}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        info!(width = image.width(), height = image.height(), "Capture decoded");
        Ok(Self::from_dynamic(&image))
    }

    pub(crate) fn grayscale_from(image: GrayImage) -> Self {
        Self {
            mode: ColorMode::Grayscale,
            samples: Samples::Luma(image),
        }
    }

    /// Caller guarantees every sample is 0 or 255.
    pub(crate) fn binary_from(image: GrayImage) -> Self {
        debug_assert!(image.as_raw().iter().all(|&v| v == 0 || v == 255));
        Self {
            mode: ColorMode::Binary,
            samples: Samples::Luma(image),
        }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        match &self.samples {
            Samples::Rgb(image) => image.width(),
            Samples::Luma(image) => image.width(),
        }
    }

    pub fn height(&self) -> u32 {
        match &self.samples {
            Samples::Rgb(image) => image.height(),
            Samples::Luma(image) => image.height(),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    /// Number of pixels (not bytes).
    pub fn sample_count(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    /// Whether either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// The underlying RGB image of a Color buffer.
    pub fn as_rgb(&self) -> Option<&RgbImage> {
        match &self.samples {
            Samples::Rgb(image) => Some(image),
            Samples::Luma(_) => None,
        }
    }

    /// The underlying luminance image of a Grayscale or Binary buffer.
    pub fn as_luma(&self) -> Option<&GrayImage> {
        match &self.samples {
            Samples::Rgb(_) => None,
            Samples::Luma(image) => Some(image),
        }
    }

    /// Luminance samples in row-major order (Grayscale or Binary only).
    pub fn luma_samples(&self) -> Option<&[u8]> {
        self.as_luma().map(|image| image.as_raw().as_slice())
    }

    /// RGB triples in row-major order (Color only).
    pub fn rgb_samples(&self) -> Option<Vec<[u8; 3]>> {
        self.as_rgb().map(|image| image.pixels().map(|p| p.0).collect())
    }

    // -- Reinterpretation / resampling ----------------------------------------

    /// Relabel a Binary buffer as Grayscale. Samples are untouched; other
    /// modes are returned unchanged.
    pub fn reinterpret_as_grayscale(self) -> Self {
        match self.mode {
            ColorMode::Binary => Self {
                mode: ColorMode::Grayscale,
                samples: self.samples,
            },
            _ => self,
        }
    }

    /// Shrink the buffer by an integer `factor` in both dimensions.
    ///
    /// Each side is divided by `factor` (never below one pixel). Binary
    /// buffers use nearest-neighbour sampling so they stay two-tone.
    #[instrument(skip(self), fields(width = self.width(), height = self.height()))]
    pub fn downsample(self, factor: u32) -> Result<Self> {
        if factor == 0 {
            return Err(GlyphcapError::InvalidArgument(
                "downsample factor must be at least 1".into(),
            ));
        }
        if factor == 1 || self.is_empty() {
            return Ok(self);
        }

        let new_w = (self.width() / factor).max(1);
        let new_h = (self.height() / factor).max(1);
        let filter = match self.mode {
            ColorMode::Binary => FilterType::Nearest,
            ColorMode::Color | ColorMode::Grayscale => FilterType::Triangle,
        };
        debug!(new_w, new_h, factor, "Downsampling");

        let samples = match &self.samples {
            Samples::Rgb(image) => Samples::Rgb(imageops::resize(image, new_w, new_h, filter)),
            Samples::Luma(image) => Samples::Luma(imageops::resize(image, new_w, new_h, filter)),
        };
        Ok(Self {
            mode: self.mode,
            samples,
        })
    }

    // -- Output ---------------------------------------------------------------

    /// Copy the samples into a `DynamicImage` (for display or encoding).
    pub fn to_dynamic(&self) -> DynamicImage {
        match &self.samples {
            Samples::Rgb(image) => DynamicImage::ImageRgb8(image.clone()),
            Samples::Luma(image) => DynamicImage::ImageLuma8(image.clone()),
        }
    }

    /// Write the buffer to a file. The format is inferred from the extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let result = match &self.samples {
            Samples::Rgb(image) => image.save(path.as_ref()),
            Samples::Luma(image) => image.save(path.as_ref()),
        };
        result.map_err(|err| {
            GlyphcapError::Io(std::io::Error::other(format!(
                "failed to save image to {}: {}",
                path.as_ref().display(),
                err
            )))
        })
    }
}

impl From<RgbImage> for PixelBuffer {
    fn from(image: RgbImage) -> Self {
        Self::from_rgb_image(image)
    }
}

/// A uniformly coloured Color buffer.
pub fn solid_color(width: u32, height: u32, rgb: [u8; 3]) -> PixelBuffer {
    PixelBuffer::from_rgb_image(RgbImage::from_pixel(width, height, Rgb(rgb)))
}

fn ensure_sample_count(width: u32, height: u32, actual: usize) -> Result<()> {
    let expected = (width as usize).checked_mul(height as usize).ok_or_else(|| {
        GlyphcapError::InvalidArgument(format!("{width}x{height} overflows the address space"))
    })?;
    if expected != actual {
        return Err(GlyphcapError::InvalidArgument(format!(
            "expected {expected} samples for {width}x{height}, got {actual}"
        )));
    }
    Ok(())
}
