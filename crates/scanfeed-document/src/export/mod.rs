// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Export pipeline — normalizes processed pages and persists them either as
// one image file per page or as a single timestamped PDF.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use image::DynamicImage;
use scanfeed_core::error::{Result, ScanfeedError};
use scanfeed_core::{SaveFormat, ScanConfig};
use tracing::{debug, info, instrument};

use crate::image::PageNormalizer;
use crate::pdf::PdfWriter;

/// `strftime` layout of the timestamp in generated PDF names.
pub const PDF_TIMESTAMP_FORMAT: &str = "%d_%m_%y-%H_%M";

/// What a save call wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveReport {
    pub format: SaveFormat,
    /// Files created, in page order. A single entry for PDF output.
    pub written: Vec<PathBuf>,
}

/// Writes normalized pages under the configured output directory.
#[derive(Debug, Clone)]
pub struct Exporter {
    save_path: PathBuf,
    save_prefix: String,
    format: SaveFormat,
    normalizer: PageNormalizer,
}

impl Exporter {
    pub fn from_config(config: &ScanConfig) -> Self {
        Self {
            save_path: config.save_path.clone(),
            save_prefix: config.save_prefix.clone(),
            format: config.save_format(),
            normalizer: PageNormalizer::new(config.save_dpi),
        }
    }

    pub fn format(&self) -> SaveFormat {
        self.format
    }

    /// Normalize `images` and write them out.
    ///
    /// In image mode the i-th image is stored under the i-th name of
    /// `source_names`; the pairing is positional only. In document mode all
    /// images become pages of one PDF.
    #[instrument(skip_all, fields(images = images.len(), format = ?self.format))]
    pub fn save(&self, source_names: &[String], images: &[DynamicImage]) -> Result<SaveReport> {
        let page = self.normalizer.page();
        if page.is_empty() {
            return Err(ScanfeedError::Config(format!(
                "output DPI gives an empty {}x{} page",
                page.width, page.height
            )));
        }
        if !self.format.is_document() && images.len() > source_names.len() {
            return Err(ScanfeedError::ImageError(format!(
                "{} images to save but only {} source filenames",
                images.len(),
                source_names.len()
            )));
        }

        self.ensure_output_dir()?;

        let written = match self.format {
            SaveFormat::Image(_) => self.write_images(source_names, images)?,
            SaveFormat::Document => vec![self.write_document(images, Local::now())?],
        };

        info!(files = written.len(), "Export complete");
        Ok(SaveReport {
            format: self.format,
            written,
        })
    }

    /// Create the output directory if it is missing. Parents are not created.
    fn ensure_output_dir(&self) -> Result<()> {
        if !self.save_path.exists() {
            std::fs::create_dir(&self.save_path)?;
            debug!(path = %self.save_path.display(), "Created output directory");
        }
        Ok(())
    }

    fn write_images(&self, source_names: &[String], images: &[DynamicImage]) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(images.len());
        for (name, image) in source_names.iter().zip(images) {
            let path = self.save_path.join(name);
            let page = self.normalizer.normalize(image);
            save_image(&page, &path)?;
            debug!(path = %path.display(), "Wrote page image");
            written.push(path);
        }
        Ok(written)
    }

    fn write_document(&self, images: &[DynamicImage], now: DateTime<Local>) -> Result<PathBuf> {
        let pages: Vec<DynamicImage> = images
            .iter()
            .map(|image| self.normalizer.normalize(image))
            .collect();

        let path = self.pdf_path(now);
        PdfWriter::new(&self.save_prefix).write_pages_to_file(&pages, &path)?;
        Ok(path)
    }

    /// `<save_path>/<prefix>_<DD_MM_YY-HH_MM>.pdf` for the given moment.
    ///
    /// Two saves within the same minute share a name; the later one wins.
    pub fn pdf_path(&self, now: DateTime<Local>) -> PathBuf {
        self.save_path.join(pdf_filename(&self.save_prefix, now))
    }
}

/// Generated document name for `prefix` at `now`.
pub fn pdf_filename(prefix: &str, now: DateTime<Local>) -> String {
    format!("{}_{}.pdf", prefix, now.format(PDF_TIMESTAMP_FORMAT))
}

/// Write an image; the encoder follows the file extension.
fn save_image(image: &DynamicImage, path: &Path) -> Result<()> {
    image.save(path).map_err(|err| {
        ScanfeedError::ImageError(format!(
            "failed to save image to {}: {}",
            path.display(),
            err
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use image::{GrayImage, Luma};

    fn config_in(dir: &Path, format: &str) -> ScanConfig {
        ScanConfig {
            save_path: dir.join("out"),
            save_prefix: "lecture".into(),
            save_format: format.into(),
            save_dpi: 1200.0,
            ..ScanConfig::default()
        }
    }

    fn page(value: u8) -> DynamicImage {
        DynamicImage::ImageLuma8(GrayImage::from_pixel(20, 30, Luma([value])))
    }

    #[test]
    fn pdf_filename_uses_minute_timestamp() {
        let now = Local.with_ymd_and_hms(2024, 3, 7, 9, 5, 59).unwrap();
        assert_eq!(pdf_filename("lecture", now), "lecture_07_03_24-09_05.pdf");
    }

    #[test]
    fn image_mode_reuses_source_names() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::from_config(&config_in(dir.path(), "PNG"));
        let names = vec!["IMG_0003.png".to_string(), "IMG_0009.png".to_string()];

        let report = exporter.save(&names, &[page(10), page(20)]).unwrap();
        assert_eq!(report.written.len(), 2);
        assert_eq!(report.written[0], dir.path().join("out").join("IMG_0003.png"));

        let written = image::open(&report.written[1]).unwrap();
        // 1200 DPI: 2480 / 4 x 3508 / 4
        assert_eq!((written.width(), written.height()), (620, 877));
    }

    #[test]
    fn image_mode_rejects_more_images_than_names() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::from_config(&config_in(dir.path(), "png"));
        let names = vec!["IMG_0001.png".to_string()];

        let err = exporter.save(&names, &[page(1), page(2)]).unwrap_err();
        assert!(matches!(err, ScanfeedError::ImageError(_)));
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn document_mode_writes_one_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::from_config(&config_in(dir.path(), "whatever"));

        let report = exporter.save(&[], &[page(0), page(128), page(255)]).unwrap();
        assert_eq!(report.format, SaveFormat::Document);
        assert_eq!(report.written.len(), 1);

        let doc = lopdf::Document::load(&report.written[0]).unwrap();
        assert_eq!(doc.get_pages().len(), 3);
    }

    #[test]
    fn empty_page_size_fails_in_both_modes() {
        for format in ["png", "pdf"] {
            let dir = tempfile::tempdir().unwrap();
            let mut config = config_in(dir.path(), format);
            config.save_dpi = 5e6;
            let exporter = Exporter::from_config(&config);

            let err = exporter
                .save(&["IMG_0001.png".to_string()], &[page(1)])
                .unwrap_err();
            assert!(matches!(err, ScanfeedError::Config(_)), "{format}: {err:?}");
            assert!(!dir.path().join("out").exists());
        }
    }

    #[test]
    fn output_directory_is_not_created_recursively() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path(), "png");
        config.save_path = dir.path().join("missing").join("out");
        let exporter = Exporter::from_config(&config);

        let err = exporter
            .save(&["IMG_0001.png".to_string()], &[page(1)])
            .unwrap_err();
        assert!(matches!(err, ScanfeedError::Io(_)));
    }
}
