// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// scanfeed-document — Capture ingestion and page export for Scanfeed.
//
// Provides the ingestion pipeline (scan the device directory, order captures
// by their filename index, drop already-processed ones, decode the rest), a
// page normalizer that fits images to A4 at a given DPI, and an export
// pipeline writing per-page images or a single multi-page PDF.

pub mod export;
pub mod image;
pub mod ingest;
pub mod pdf;

// Re-export the primary structs so callers can use `scanfeed_document::ImageHandler` etc.
pub use export::{Exporter, SaveReport};
pub use image::normalizer::PageNormalizer;
pub use ingest::handler::ImageHandler;
pub use ingest::index::parse_index;
pub use pdf::writer::PdfWriter;
