// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Ingestion pipeline — scans the device directory, orders captures by index,
// drops everything at or below the watermark, and decodes the rest.

use std::path::{Path, PathBuf};

use image::DynamicImage;
use scanfeed_core::error::Result;
use scanfeed_core::{CaptureIndex, ScanConfig};
use tracing::{debug, info, instrument};

use super::index::parse_index;
use super::scanner::scan;
use crate::export::{Exporter, SaveReport};
use crate::image::decode;

/// A decoded capture held by the handler.
#[derive(Debug, Clone)]
pub struct Capture {
    pub path: PathBuf,
    /// Base filename, reused when exporting per-page images.
    pub name: String,
    pub index: CaptureIndex,
    pub image: DynamicImage,
}

/// The set of new captures for one run.
///
/// Built once by [`ImageHandler::new`] and never modified afterwards. All
/// decoded images stay in memory until the handler is dropped.
///
/// ```ignore
/// let handler = ImageHandler::new(&config)?;
/// let pages: Vec<DynamicImage> = handler.iter().map(|(_, img)| img.clone()).collect();
/// handler.save(&pages)?;
/// config.advance_watermark(handler.max());
/// ```
#[derive(Debug)]
pub struct ImageHandler {
    captures: Vec<Capture>,
    exporter: Exporter,
}

impl ImageHandler {
    /// Scan, parse, sort, filter and decode, in that order.
    ///
    /// Any unparsable filename or undecodable file fails the whole
    /// construction.
    #[instrument(skip_all, fields(device = %config.device_path.display(), watermark = config.last_image_idx))]
    pub fn new(config: &ScanConfig) -> Result<Self> {
        let paths = scan(&config.device_path, &config.image_prefix, &config.image_extension)?;

        let mut indexed = paths
            .into_iter()
            .map(|path| parse_index(&path, &config.image_prefix).map(|index| (path, index)))
            .collect::<Result<Vec<(PathBuf, CaptureIndex)>>>()?;
        indexed.sort_by_key(|(_, index)| *index);

        let found = indexed.len();
        indexed.retain(|(_, index)| index.is_above(config.last_image_idx));
        debug!(
            found,
            kept = indexed.len(),
            "Discarded captures at or below watermark"
        );

        let mode = config.color_mode();
        let captures = indexed
            .into_iter()
            .map(|(path, index)| {
                let image = decode(&path, mode)?;
                Ok(Capture {
                    name: base_name(&path),
                    path,
                    index,
                    image,
                })
            })
            .collect::<Result<Vec<Capture>>>()?;

        info!(captures = captures.len(), "Ingestion complete");
        Ok(Self {
            captures,
            exporter: Exporter::from_config(config),
        })
    }

    /// Iterate `(base filename, image)` pairs in ascending index order.
    ///
    /// Every call starts a fresh pass from the first capture.
    pub fn iter(&self) -> Captures<'_> {
        Captures {
            captures: &self.captures,
            cursor: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.captures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.captures.is_empty()
    }

    /// Highest capture index held, or -1 when there are none.
    pub fn max(&self) -> i64 {
        self.captures
            .iter()
            .map(|c| c.index.as_i64())
            .max()
            .unwrap_or(-1)
    }

    pub fn captures(&self) -> &[Capture] {
        &self.captures
    }

    /// Source paths in index order.
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.captures.iter().map(|c| c.path.as_path())
    }

    /// Capture indices in ascending order.
    pub fn indices(&self) -> impl Iterator<Item = CaptureIndex> + '_ {
        self.captures.iter().map(|c| c.index)
    }

    /// Export processed pages.
    ///
    /// Does nothing and returns `None` when this handler ingested no
    /// captures, regardless of `images`. Per-image output is named after the
    /// captures by position, so `images` should line up with [`iter`].
    ///
    /// [`iter`]: ImageHandler::iter
    pub fn save(&self, images: &[DynamicImage]) -> Result<Option<SaveReport>> {
        // Keyed on the ingested set, not on `images`.
        if self.captures.is_empty() {
            debug!("No captures ingested, skipping save");
            return Ok(None);
        }

        let names: Vec<String> = self.captures.iter().map(|c| c.name.clone()).collect();
        self.exporter.save(&names, images).map(Some)
    }
}

impl<'a> IntoIterator for &'a ImageHandler {
    type Item = (&'a str, &'a DynamicImage);
    type IntoIter = Captures<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Cursor over an [`ImageHandler`]'s captures.
#[derive(Debug, Clone)]
pub struct Captures<'a> {
    captures: &'a [Capture],
    cursor: usize,
}

impl<'a> Iterator for Captures<'a> {
    type Item = (&'a str, &'a DynamicImage);

    fn next(&mut self) -> Option<Self::Item> {
        let capture = self.captures.get(self.cursor)?;
        self.cursor += 1;
        Some((capture.name.as_str(), &capture.image))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.captures.len() - self.cursor;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Captures<'_> {}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
