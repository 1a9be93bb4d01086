// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Scanfeed ingestion and export pipelines.

use serde::{Deserialize, Serialize};

/// Position of a capture in the device's creation order, parsed from its
/// filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CaptureIndex(pub u64);

impl CaptureIndex {
    /// True when this capture lies strictly above the given watermark.
    ///
    /// A negative watermark means nothing has been processed yet, so every
    /// index is above it.
    pub fn is_above(&self, watermark: i64) -> bool {
        match u64::try_from(watermark) {
            Ok(w) => self.0 > w,
            Err(_) => true,
        }
    }

    /// The index as a signed value, saturating at `i64::MAX`.
    pub fn as_i64(&self) -> i64 {
        i64::try_from(self.0).unwrap_or(i64::MAX)
    }
}

impl std::fmt::Display for CaptureIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How captures are decoded on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorMode {
    /// Single-channel luma.
    Grayscale,
    /// Three-channel RGB.
    Color,
}

impl ColorMode {
    pub fn from_grayscale_flag(read_grayscale: bool) -> Self {
        if read_grayscale {
            Self::Grayscale
        } else {
            Self::Color
        }
    }
}

/// Raster formats accepted for per-image export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageKind {
    Jpg,
    Png,
    Bmp,
    Tiff,
}

/// What the export pipeline produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveFormat {
    /// One file per page, reusing the source filenames.
    Image(ImageKind),
    /// A single multi-page PDF.
    Document,
}

impl SaveFormat {
    /// Interpret a configured format tag.
    ///
    /// Matching is case-insensitive. Anything that is not a known raster
    /// format, the empty string included, selects `Document`.
    pub fn parse(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Self::Image(ImageKind::Jpg),
            "png" => Self::Image(ImageKind::Png),
            "bmp" => Self::Image(ImageKind::Bmp),
            "tif" | "tiff" => Self::Image(ImageKind::Tiff),
            _ => Self::Document,
        }
    }

    pub fn is_document(&self) -> bool {
        matches!(self, Self::Document)
    }
}

/// Pixel dimensions of an exported page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: u32,
    pub height: u32,
}

impl PageSize {
    /// A4 portrait at the reference resolution.
    pub const A4_REFERENCE: PageSize = PageSize {
        width: 2480,
        height: 3508,
    };

    /// Resolution at which `A4_REFERENCE` is defined.
    pub const REFERENCE_DPI: f64 = 300.0;

    /// A4 mm dimensions (width, height), used for PDF page boxes.
    pub const A4_MM: (f32, f32) = (210.0, 297.0);

    /// Target page for the given output DPI.
    ///
    /// Each reference dimension is scaled by `REFERENCE_DPI / dpi` and
    /// rounded to the nearest pixel, so 300 DPI gives 2480x3508 and 150 DPI
    /// gives 4960x7016.
    pub fn for_dpi(dpi: f64) -> Self {
        let factor = Self::REFERENCE_DPI / dpi;
        Self {
            width: (f64::from(Self::A4_REFERENCE.width) * factor).round() as u32,
            height: (f64::from(Self::A4_REFERENCE.height) * factor).round() as u32,
        }
    }

    /// True when either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_format_is_case_insensitive() {
        assert_eq!(SaveFormat::parse("PNG"), SaveFormat::Image(ImageKind::Png));
        assert_eq!(SaveFormat::parse("Jpg"), SaveFormat::Image(ImageKind::Jpg));
        assert_eq!(SaveFormat::parse("tiff"), SaveFormat::Image(ImageKind::Tiff));
        assert_eq!(SaveFormat::parse("bmp"), SaveFormat::Image(ImageKind::Bmp));
    }

    #[test]
    fn unknown_or_empty_format_selects_document() {
        assert!(SaveFormat::parse("").is_document());
        assert!(SaveFormat::parse("pdf").is_document());
        assert!(SaveFormat::parse("webp").is_document());
    }

    #[test]
    fn page_size_follows_inverse_dpi_law() {
        assert_eq!(
            PageSize::for_dpi(300.0),
            PageSize {
                width: 2480,
                height: 3508
            }
        );
        assert_eq!(
            PageSize::for_dpi(150.0),
            PageSize {
                width: 4960,
                height: 7016
            }
        );
        // 2480 * 300 / 400 = 1860, 3508 * 300 / 400 = 2631
        assert_eq!(
            PageSize::for_dpi(400.0),
            PageSize {
                width: 1860,
                height: 2631
            }
        );
    }

    #[test]
    fn huge_dpi_rounds_to_empty_page() {
        assert!(PageSize::for_dpi(5e6).is_empty());
        assert!(!PageSize::for_dpi(300.0).is_empty());
    }

    #[test]
    fn watermark_comparison() {
        assert!(CaptureIndex(0).is_above(-1));
        assert!(!CaptureIndex(5).is_above(5));
        assert!(CaptureIndex(6).is_above(5));
        assert!(!CaptureIndex(4).is_above(5));
    }
}
