// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — builds a multi-page document from raster pages using
// `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.

use std::path::Path;

use image::DynamicImage;
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use scanfeed_core::PageSize;
use scanfeed_core::error::{Result, ScanfeedError};
use tracing::{debug, info, instrument, warn};

/// Writes raster pages into a single PDF, one image per A4 page.
///
/// Each raster is stretched to cover its page edge to edge; callers are
/// expected to hand in pages that already have A4 proportions.
pub struct PdfWriter {
    /// Title metadata embedded in the PDF /Info dictionary.
    title: String,
}

impl PdfWriter {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    /// Page box in printpdf's Mm units.
    fn page_dimensions(&self) -> (Mm, Mm) {
        let (w_mm, h_mm) = PageSize::A4_MM;
        (Mm(w_mm), Mm(h_mm))
    }

    /// Build a PDF with one page per image, in order.
    #[instrument(skip(self, pages), fields(pages = pages.len()))]
    pub fn create_from_pages(&self, pages: &[DynamicImage]) -> Result<Vec<u8>> {
        if pages.is_empty() {
            return Err(ScanfeedError::PdfError(
                "cannot build a document with no pages".into(),
            ));
        }

        let (page_w, page_h) = self.page_dimensions();
        let page_w_pt = page_w.into_pt().0;
        let page_h_pt = page_h.into_pt().0;

        let mut doc = PdfDocument::new(&self.title);
        let mut pdf_pages: Vec<PdfPage> = Vec::with_capacity(pages.len());

        for page in pages {
            if page.width() == 0 || page.height() == 0 {
                return Err(ScanfeedError::PdfError(format!(
                    "cannot place an empty {}x{} raster on a page",
                    page.width(),
                    page.height()
                )));
            }
            let raw = raw_image(page);
            let (px_w, px_h) = (raw.width as f32, raw.height as f32);
            let xobject_id = doc.add_image(&raw);

            // Place the raster at the DPI that makes its width match the page,
            // then correct the height for any rounding in the page pixels.
            let dpi = px_w * 25.4 / page_w.0;
            let natural_w_pt = px_w / dpi * 72.0;
            let natural_h_pt = px_h / dpi * 72.0;

            let ops = vec![Op::UseXobject {
                id: xobject_id,
                transform: XObjectTransform {
                    translate_x: Some(Pt(0.0)),
                    translate_y: Some(Pt(0.0)),
                    scale_x: Some(page_w_pt / natural_w_pt),
                    scale_y: Some(page_h_pt / natural_h_pt),
                    dpi: Some(dpi),
                    rotate: None,
                },
            }];
            pdf_pages.push(PdfPage::new(page_w, page_h, ops));
        }

        doc.with_pages(pdf_pages);
        debug!(pages = doc.pages.len(), "Page layout complete");

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            warn!(count = warnings.len(), "printpdf reported warnings while saving");
        }

        Ok(output)
    }

    /// Build the PDF and write it directly to a file.
    pub fn write_pages_to_file(&self, pages: &[DynamicImage], path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.create_from_pages(pages)?;
        std::fs::write(path.as_ref(), &bytes)?;
        info!(bytes = bytes.len(), "Wrote PDF to {}", path.as_ref().display());
        Ok(())
    }
}

/// Convert a page into printpdf's raw pixel form.
///
/// Luma pages are embedded as single-channel data; anything else as RGB8.
fn raw_image(page: &DynamicImage) -> RawImage {
    let width = page.width() as usize;
    let height = page.height() as usize;
    let (pixels, data_format) = if page.color().has_color() {
        (page.to_rgb8().into_raw(), RawImageFormat::RGB8)
    } else {
        (page.to_luma8().into_raw(), RawImageFormat::R8)
    };
    RawImage {
        pixels: RawImageData::U8(pixels),
        width,
        height,
        data_format,
        tag: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage};

    #[test]
    fn one_pdf_page_per_image() {
        let pages = vec![
            DynamicImage::ImageLuma8(GrayImage::from_pixel(62, 88, Luma([240]))),
            DynamicImage::ImageRgb8(RgbImage::from_pixel(62, 88, Rgb([10, 200, 30]))),
            DynamicImage::ImageLuma8(GrayImage::from_pixel(62, 88, Luma([15]))),
        ];
        let bytes = PdfWriter::new("test").create_from_pages(&pages).unwrap();
        assert!(bytes.starts_with(b"%PDF"));

        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 3);
    }

    #[test]
    fn empty_page_list_is_an_error() {
        let err = PdfWriter::new("test").create_from_pages(&[]).unwrap_err();
        assert!(matches!(err, ScanfeedError::PdfError(_)));
    }

    #[test]
    fn empty_raster_is_an_error() {
        let pages = vec![DynamicImage::ImageLuma8(GrayImage::new(0, 0))];
        let err = PdfWriter::new("test").create_from_pages(&pages).unwrap_err();
        assert!(matches!(err, ScanfeedError::PdfError(_)));
    }

    #[test]
    fn raw_image_keeps_channel_count() {
        let gray = DynamicImage::ImageLuma8(GrayImage::from_pixel(4, 3, Luma([1])));
        let raw = raw_image(&gray);
        assert!(matches!(raw.data_format, RawImageFormat::R8));
        match raw.pixels {
            RawImageData::U8(px) => assert_eq!(px.len(), 12),
            _ => panic!("expected u8 pixels"),
        }

        let rgb = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 3, Rgb([1, 2, 3])));
        let raw = raw_image(&rgb);
        assert!(matches!(raw.data_format, RawImageFormat::RGB8));
    }
}
