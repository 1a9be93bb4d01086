// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipeline configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScanfeedError};
use crate::types::{ColorMode, PageSize, SaveFormat};

/// Settings for one ingestion/export run.
///
/// Field names are snake_case; the upper-case names used by older config
/// files are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Directory the capture device writes into.
    #[serde(alias = "DEVICE_PATH")]
    pub device_path: PathBuf,
    /// Fixed filename prefix written by the device (e.g. `IMG_`).
    #[serde(alias = "IMAGE_PREFIX")]
    pub image_prefix: String,
    /// Filename extension of captures, without the dot.
    #[serde(alias = "IMAGE_EXTENSION")]
    pub image_extension: String,
    /// Decode captures as single-channel luma instead of RGB.
    #[serde(alias = "READ_GRAYSCALE")]
    pub read_grayscale: bool,
    /// Highest capture index handled by a previous run. `-1` when none.
    #[serde(alias = "LAST_IMAGE_IDX")]
    pub last_image_idx: i64,
    /// Output directory.
    #[serde(alias = "SAVE_PATH")]
    pub save_path: PathBuf,
    /// Prefix of the generated PDF filename.
    #[serde(alias = "SAVE_PREFIX")]
    pub save_prefix: String,
    /// `jpg`, `png`, `bmp`, `tiff`, or anything else for a PDF.
    #[serde(alias = "SAVE_FORMAT")]
    pub save_format: String,
    /// Output resolution.
    #[serde(alias = "SAVE_DPI")]
    pub save_dpi: f64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            device_path: PathBuf::from("."),
            image_prefix: "IMG_".into(),
            image_extension: "jpg".into(),
            read_grayscale: false,
            last_image_idx: -1,
            save_path: PathBuf::from("output"),
            save_prefix: "scan".into(),
            save_format: "pdf".into(),
            save_dpi: 300.0,
        }
    }
}

impl ScanConfig {
    /// Read a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        Ok(config)
    }

    /// Write the config back as pretty-printed JSON.
    pub fn store(&self, path: impl AsRef<Path>) -> Result<()> {
        let raw = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), raw)?;
        Ok(())
    }

    /// Reject settings the pipelines cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.image_prefix.is_empty() && self.image_extension.is_empty() {
            return Err(ScanfeedError::Config(
                "image_prefix and image_extension cannot both be empty".into(),
            ));
        }
        if !self.save_dpi.is_finite() || self.save_dpi <= 0.0 {
            return Err(ScanfeedError::Config(format!(
                "save_dpi must be a positive number, got {}",
                self.save_dpi
            )));
        }
        let page = PageSize::for_dpi(self.save_dpi);
        if page.is_empty() {
            return Err(ScanfeedError::Config(format!(
                "save_dpi {} gives an empty {}x{} page",
                self.save_dpi, page.width, page.height
            )));
        }
        if self.save_path.as_os_str().is_empty() {
            return Err(ScanfeedError::Config("save_path is empty".into()));
        }
        Ok(())
    }

    pub fn color_mode(&self) -> ColorMode {
        ColorMode::from_grayscale_flag(self.read_grayscale)
    }

    pub fn save_format(&self) -> SaveFormat {
        SaveFormat::parse(&self.save_format)
    }

    /// Record `max_index` as processed. The watermark only moves forward.
    ///
    /// Returns true if the watermark changed.
    pub fn advance_watermark(&mut self, max_index: i64) -> bool {
        if max_index > self.last_image_idx {
            self.last_image_idx = max_index;
            true
        } else {
            false
        }
    }
}
