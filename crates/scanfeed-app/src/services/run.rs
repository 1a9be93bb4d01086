// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// One ingest/export run: load config, pick up new captures, export them and
// move the watermark past them.

use std::path::{Path, PathBuf};

use image::DynamicImage;
use scanfeed_core::ScanConfig;
use scanfeed_core::error::Result;
use scanfeed_document::ImageHandler;
use tracing::{info, instrument, warn};

/// Options taken from the command line.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub config_path: PathBuf,
    /// Replaces the stored watermark for this run.
    pub watermark: Option<i64>,
    /// Ingest and report only; nothing is written.
    pub dry_run: bool,
}

/// Outcome of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub ingested: usize,
    pub written: Vec<PathBuf>,
    /// Watermark after the run.
    pub watermark: i64,
}

#[instrument(skip_all, fields(config = %options.config_path.display(), dry_run = options.dry_run))]
pub fn run(options: &RunOptions) -> Result<RunSummary> {
    let mut config = load_or_default(&options.config_path)?;
    if let Some(watermark) = options.watermark {
        config.last_image_idx = watermark;
    }
    config.validate()?;

    let handler = ImageHandler::new(&config)?;
    for (name, image) in &handler {
        info!(name, width = image.width(), height = image.height(), "New capture");
    }

    if options.dry_run {
        info!(captures = handler.len(), "Dry run, nothing written");
        return Ok(RunSummary {
            ingested: handler.len(),
            written: Vec::new(),
            watermark: config.last_image_idx,
        });
    }

    // Pages go out as captured; there is no per-page processing stage.
    let pages: Vec<DynamicImage> = handler.iter().map(|(_, image)| image.clone()).collect();
    let written = match handler.save(&pages)? {
        Some(report) => report.written,
        None => Vec::new(),
    };

    if config.advance_watermark(handler.max()) {
        if let Some(parent) = options.config_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        config.store(&options.config_path)?;
        info!(watermark = config.last_image_idx, "Watermark advanced");
    }

    Ok(RunSummary {
        ingested: handler.len(),
        written,
        watermark: config.last_image_idx,
    })
}

fn load_or_default(path: &Path) -> Result<ScanConfig> {
    if path.exists() {
        ScanConfig::load(path)
    } else {
        warn!(path = %path.display(), "Config file not found, using defaults");
        Ok(ScanConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    fn setup(format: &str) -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let device = dir.path().join("device");
        std::fs::create_dir(&device).unwrap();
        for i in [4u32, 5, 6] {
            RgbImage::from_pixel(16, 12, Rgb([0, 0, 0]))
                .save(device.join(format!("IMG_{i:04}.png")))
                .unwrap();
        }

        let config = ScanConfig {
            device_path: device,
            image_extension: "png".into(),
            last_image_idx: 4,
            save_path: dir.path().join("out"),
            save_format: format.into(),
            save_dpi: 1200.0,
            ..ScanConfig::default()
        };
        let config_path = dir.path().join("scanfeed.json");
        config.store(&config_path).unwrap();
        (dir, config_path)
    }

    #[test]
    fn run_exports_and_persists_watermark() {
        let (_dir, config_path) = setup("png");
        let options = RunOptions {
            config_path: config_path.clone(),
            watermark: None,
            dry_run: false,
        };

        let summary = run(&options).unwrap();
        assert_eq!(summary.ingested, 2);
        assert_eq!(summary.written.len(), 2);
        assert_eq!(summary.watermark, 6);
        assert_eq!(ScanConfig::load(&config_path).unwrap().last_image_idx, 6);

        // Nothing new on the second pass.
        let again = run(&options).unwrap();
        assert_eq!(again.ingested, 0);
        assert!(again.written.is_empty());
    }

    #[test]
    fn dry_run_leaves_everything_alone() {
        let (dir, config_path) = setup("pdf");
        let options = RunOptions {
            config_path: config_path.clone(),
            watermark: Some(-1),
            dry_run: true,
        };

        let summary = run(&options).unwrap();
        assert_eq!(summary.ingested, 3);
        assert!(!dir.path().join("out").exists());
        assert_eq!(ScanConfig::load(&config_path).unwrap().last_image_idx, 4);
    }
}
