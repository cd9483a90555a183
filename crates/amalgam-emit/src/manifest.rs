//! Emission manifest
//!
//! JSON record of what went into an amalgamation and in which order.

use amalgam_core::{EmissionQueues, Error, Result};
use amalgam_scan::ScanReport;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Manifest written next to the amalgamation
#[derive(Debug, Clone, Serialize)]
pub struct Manifest<'a> {
    /// Amalgamated header path
    pub header: PathBuf,
    /// Amalgamated source path
    pub source: PathBuf,
    /// Headers in emission order
    pub headers: &'a std::collections::VecDeque<PathBuf>,
    /// Sources in emission order
    pub sources: &'a std::collections::VecDeque<PathBuf>,
    /// Scan statistics, when available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<&'a ScanReport>,
}

impl<'a> Manifest<'a> {
    pub fn new(header: PathBuf, source: PathBuf, queues: &'a EmissionQueues) -> Self {
        Self {
            header,
            source,
            headers: queues.headers(),
            sources: queues.sources(),
            report: None,
        }
    }

    pub fn with_report(mut self, report: &'a ScanReport) -> Self {
        self.report = Some(report);
        self
    }

    /// Serialize as pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the manifest to `path`
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|source| Error::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amalgam_core::FileCategory;

    #[test]
    fn test_manifest_json() {
        let mut queues = EmissionQueues::new();
        queues.push(FileCategory::Header, PathBuf::from("/p/include/a.hpp"));
        queues.push(FileCategory::Source, PathBuf::from("/p/src/a.cpp"));
        let report = ScanReport {
            headers: 1,
            sources: 1,
            ..ScanReport::default()
        };

        let manifest = Manifest::new("/out/x.hpp".into(), "/out/x.cpp".into(), &queues)
            .with_report(&report);
        let value: serde_json::Value = serde_json::from_str(&manifest.to_json().unwrap()).unwrap();

        assert_eq!(value["header"], "/out/x.hpp");
        assert_eq!(value["headers"][0], "/p/include/a.hpp");
        assert_eq!(value["sources"][0], "/p/src/a.cpp");
        assert_eq!(value["report"]["headers"], 1);
    }

    #[test]
    fn test_manifest_without_report() {
        let queues = EmissionQueues::new();
        let manifest = Manifest::new("x.hpp".into(), "x.cpp".into(), &queues);
        let value: serde_json::Value = serde_json::from_str(&manifest.to_json().unwrap()).unwrap();

        assert!(value.get("report").is_none());
        assert_eq!(value["headers"].as_array().unwrap().len(), 0);
    }
}
