//! Core type definitions

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Recognized C/C++ source file extensions
pub const SOURCE_EXTENSIONS: &[&str] = &["c", "cpp", "cc", "cxx"];

/// Recognized C/C++ header file extensions
pub const HEADER_EXTENSIONS: &[&str] = &["h", "hpp", "hh", "hxx", "inl"];

/// Which amalgamation output a file belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    /// Goes into the amalgamated header
    Header,
    /// Goes into the amalgamated translation unit
    Source,
}

impl FileCategory {
    /// Classify a bare extension (without the leading dot)
    pub fn from_extension(ext: &str) -> Option<Self> {
        if HEADER_EXTENSIONS.contains(&ext) {
            Some(FileCategory::Header)
        } else if SOURCE_EXTENSIONS.contains(&ext) {
            Some(FileCategory::Source)
        } else {
            None
        }
    }

    /// Classify a path by its extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileCategory::Header => "header",
            FileCategory::Source => "source",
        }
    }
}

impl std::fmt::Display for FileCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying or scanning a candidate path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Already in the visited set
    AlreadyScanned,
    /// Missing on disk or not a C/C++ file; never emitted
    External,
    /// Eligible for scanning and emission
    Parsed(FileCategory),
}
