//! Amalgam Scan
//!
//! Include-graph resolution and ordering for C/C++ amalgamation.
//!
//! ## Modules
//!
//! - `directive` - Single-line `#include` matching
//! - `resolver` - Include token to file path resolution
//! - `session` - Visited set, classification, depth-first scanner and
//!   source-directory driver

pub mod directive;
pub mod resolver;
pub mod session;

pub use directive::{source_lines, IncludeMatcher};
pub use resolver::SearchPath;
pub use session::{ScanReport, ScanSession};

use amalgam_core::{AmalgamConfig, EmissionQueues, Result};

/// Scan the tree described by `config` and return the emission order
pub fn scan_tree(config: &AmalgamConfig) -> Result<(EmissionQueues, ScanReport)> {
    let mut session = ScanSession::from_config(config)?;
    let report = session.scan_source_dirs()?;
    Ok((session.into_queues(), report))
}
