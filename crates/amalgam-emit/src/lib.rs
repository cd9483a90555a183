//! Amalgam Emit
//!
//! Writes the ordered emission queues into `<name>.<header-ext>` and
//! `<name>.<source-ext>`, plus an optional JSON manifest.

pub mod manifest;
pub mod writer;

pub use manifest::Manifest;
pub use writer::AmalgamationWriter;

use amalgam_core::{AmalgamConfig, EmissionQueues, Error, Result};
use amalgam_scan::ScanReport;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

/// What a finished amalgamation produced
#[derive(Debug, Clone, Serialize)]
pub struct AmalgamationSummary {
    pub header_path: PathBuf,
    pub source_path: PathBuf,
    pub headers_written: usize,
    pub sources_written: usize,
    pub header_bytes: u64,
    pub source_bytes: u64,
}

/// Create both output files and drain the queues into them
pub fn write_amalgamation(
    config: &AmalgamConfig,
    queues: &EmissionQueues,
    report: Option<&ScanReport>,
) -> Result<AmalgamationSummary> {
    config.validate()?;

    let header_path = config.header_path();
    let source_path = config.source_path();

    std::fs::create_dir_all(&config.output.dir).map_err(|source| Error::Write {
        path: config.output.dir.clone(),
        source,
    })?;

    info!("Creating header amalgamation: {}", header_path.display());
    info!("Creating source amalgamation: {}", source_path.display());

    let header = BufWriter::new(create(&header_path)?);
    let source = BufWriter::new(create(&source_path)?);

    let mut writer = AmalgamationWriter::new(header, source, &config.header_file_name())?;
    writer.write_queues(queues)?;
    let headers_written = writer.headers_written();
    let sources_written = writer.sources_written();
    writer.finish()?;

    if let Some(manifest_path) = &config.output.manifest {
        let mut manifest = Manifest::new(header_path.clone(), source_path.clone(), queues);
        if let Some(report) = report {
            manifest = manifest.with_report(report);
        }
        manifest.write_to(manifest_path)?;
        info!("Manifest written to: {}", manifest_path.display());
    }

    Ok(AmalgamationSummary {
        header_bytes: file_len(&header_path)?,
        source_bytes: file_len(&source_path)?,
        header_path,
        source_path,
        headers_written,
        sources_written,
    })
}

fn create(path: &Path) -> Result<File> {
    File::create(path).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn file_len(path: &Path) -> Result<u64> {
    std::fs::metadata(path)
        .map(|metadata| metadata.len())
        .map_err(|source| Error::Write {
            path: path.to_path_buf(),
            source,
        })
}
