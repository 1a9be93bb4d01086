// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Ingestion — filename index parsing, device directory scanning, and the
// handler that owns the decoded captures for a run.

pub mod handler;
pub mod index;
pub mod scanner;

pub use handler::{Capture, Captures, ImageHandler};
pub use index::parse_index;
pub use scanner::scan;
