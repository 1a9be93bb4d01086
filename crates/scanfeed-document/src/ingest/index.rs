// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Capture index parsing — turns a device filename such as `IMG_000045.jpg`
// into its numeric position in the capture sequence.

use std::path::Path;

use scanfeed_core::CaptureIndex;
use scanfeed_core::error::{Result, ScanfeedError};

/// Extract the capture index from `filename`.
///
/// Directory components are ignored. A leading `prefix` is removed once,
/// everything from the first `.` onward is dropped, and the remaining digits
/// are read as a base-10 number. An all-zero stem parses as 0.
pub fn parse_index(filename: impl AsRef<Path>, prefix: &str) -> Result<CaptureIndex> {
    let path = filename.as_ref();
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| parse_error(&path.display().to_string(), "no UTF-8 file name"))?;

    let stem = name.strip_prefix(prefix).unwrap_or(name);
    let stem = stem.split('.').next().unwrap_or_default();

    if stem.is_empty() {
        return Err(parse_error(name, "no digits after prefix"));
    }
    if !stem.bytes().all(|b| b.is_ascii_digit()) {
        return Err(parse_error(name, &format!("{stem:?} is not a number")));
    }

    let digits = stem.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(CaptureIndex(0));
    }

    digits
        .parse::<u64>()
        .map(CaptureIndex)
        .map_err(|err| parse_error(name, &err.to_string()))
}

fn parse_error(name: &str, reason: &str) -> ScanfeedError {
    ScanfeedError::IndexParse {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}
