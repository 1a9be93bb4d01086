// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page normalizer — decodes captures in the configured color mode and
// stretches them to an A4 portrait page at the output DPI.

use std::path::Path;

use image::DynamicImage;
use image::imageops::FilterType;
use scanfeed_core::error::{Result, ScanfeedError};
use scanfeed_core::{ColorMode, PageSize};
use tracing::{debug, info, instrument};

/// Interpolation used for every page resize.
const PAGE_FILTER: FilterType = FilterType::Triangle;

/// Load a capture from disk as luma8 or rgb8, depending on `mode`.
#[instrument(skip_all, fields(path = %path.as_ref().display(), mode = ?mode))]
pub fn decode(path: impl AsRef<Path>, mode: ColorMode) -> Result<DynamicImage> {
    let img = image::open(path.as_ref()).map_err(|err| {
        ScanfeedError::ImageError(format!(
            "failed to open {}: {}",
            path.as_ref().display(),
            err
        ))
    })?;
    let img = match mode {
        ColorMode::Grayscale => DynamicImage::ImageLuma8(img.to_luma8()),
        ColorMode::Color => DynamicImage::ImageRgb8(img.to_rgb8()),
    };
    debug!(width = img.width(), height = img.height(), "Capture decoded");
    Ok(img)
}

/// Fits images to a fixed page box for export.
///
/// The aspect ratio of the source is not kept: every page comes out at
/// exactly [`PageNormalizer::page`] pixels, portrait, whatever the input
/// orientation.
#[derive(Debug, Clone, Copy)]
pub struct PageNormalizer {
    page: PageSize,
}

impl PageNormalizer {
    /// Normalizer for the given output DPI.
    pub fn new(dpi: f64) -> Self {
        Self {
            page: PageSize::for_dpi(dpi),
        }
    }

    /// Target page in pixels.
    pub fn page(&self) -> PageSize {
        self.page
    }

    /// Convert to a canonical pixel layout and resize to the page box.
    ///
    /// Single-channel images stay luma8. Everything else is flattened to
    /// rgb8, dropping any alpha channel.
    #[instrument(skip_all, fields(width = self.page.width, height = self.page.height))]
    pub fn normalize(&self, image: &DynamicImage) -> DynamicImage {
        let canonical = if image.color().has_color() {
            DynamicImage::ImageRgb8(image.to_rgb8())
        } else {
            DynamicImage::ImageLuma8(image.to_luma8())
        };

        info!(
            from_w = canonical.width(),
            from_h = canonical.height(),
            "Resizing capture to page"
        );
        canonical.resize_exact(self.page.width, self.page.height, PAGE_FILTER)
    }
}
