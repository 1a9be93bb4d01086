// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Directory scanner — lists the captures sitting directly in the device
// directory whose names match `<prefix>*.<extension>`.

use std::fs;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use scanfeed_core::error::{Result, ScanfeedError};
use tracing::{debug, instrument, warn};

/// Collect the files directly under `root` named `<prefix>*.<extension>`.
///
/// Subdirectories are not entered. Returned paths are absolute; their order
/// is whatever the filesystem reports. No match, or a device directory that
/// is not there, is an empty vector rather than an error.
#[instrument(skip_all, fields(root = %root.as_ref().display(), prefix = %prefix, extension = %extension))]
pub fn scan(root: impl AsRef<Path>, prefix: &str, extension: &str) -> Result<Vec<PathBuf>> {
    let root = std::path::absolute(root.as_ref())?;
    if !root.is_dir() {
        warn!("Device directory not found, nothing to ingest");
        return Ok(Vec::new());
    }
    let pattern = capture_pattern(prefix, extension)?;
    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };

    let mut matches = Vec::new();
    for entry in fs::read_dir(&root)? {
        let entry = entry?;
        // Follows symlinks; directories and dangling links are skipped.
        if !entry.path().is_file() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if pattern.matches_with(name, options) {
            matches.push(root.join(name));
        }
    }

    debug!(found = matches.len(), "Scanned device directory");
    Ok(matches)
}

/// Glob for `<prefix>*.<extension>` with both parts taken literally.
fn capture_pattern(prefix: &str, extension: &str) -> Result<Pattern> {
    let raw = format!("{}*.{}", Pattern::escape(prefix), Pattern::escape(extension));
    Pattern::new(&raw).map_err(|err| {
        ScanfeedError::Config(format!("bad capture filename pattern {raw:?}: {err}"))
    })
}
