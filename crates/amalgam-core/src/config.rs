//! Configuration types

use crate::error::{Error, Result};
use crate::types::FileCategory;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Amalgamation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AmalgamConfig {
    /// Project root; `<base>/src` and `<base>/include` are registered by default
    pub base_dir: PathBuf,

    /// Output configuration
    pub output: OutputConfig,

    /// Search path configuration
    pub search: SearchConfig,
}

impl Default for AmalgamConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            output: OutputConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory the amalgamation is written to
    pub dir: PathBuf,

    /// Base name shared by both output files
    pub name: String,

    /// Header output extension, without the leading dot
    pub header_ext: String,

    /// Source output extension, without the leading dot
    pub source_ext: String,

    /// Optional JSON manifest of the emission order
    pub manifest: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            name: "amalgamation".into(),
            header_ext: "hpp".into(),
            source_ext: "cpp".into(),
            manifest: None,
        }
    }
}

/// Search path configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Include directories registered after `<base>/include`
    pub include_dirs: Vec<PathBuf>,

    /// Source directories registered after `<base>/src`
    pub source_dirs: Vec<PathBuf>,

    /// Glob patterns for files skipped while walking source directories
    pub exclude: Vec<String>,

    /// Resolve `./` and `../` tokens against the including file's directory
    pub relative_includes: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            include_dirs: vec![],
            source_dirs: vec![],
            exclude: vec![],
            relative_includes: true,
        }
    }
}

impl AmalgamConfig {
    /// Create a configuration for the positional `base output name` interface
    pub fn new(base_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            base_dir: base_dir.into(),
            output: OutputConfig {
                dir: output_dir.into(),
                name: name.into(),
                ..OutputConfig::default()
            },
            search: SearchConfig::default(),
        }
    }

    /// Load a configuration file; YAML or JSON is picked by extension
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| Error::Config(format!("{}: {}", path.display(), e))),
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
                .map_err(|e| Error::Config(format!("{}: {}", path.display(), e))),
            _ => Err(Error::Config(format!(
                "unsupported config format: {}",
                path.display()
            ))),
        }
    }

    /// Set the header output extension
    pub fn set_header_extension(&mut self, ext: &str) {
        let ext = normalize_extension(ext);
        if FileCategory::from_extension(&ext) != Some(FileCategory::Header) {
            warn!(".{} is not a recognized C/C++ header file extension", ext);
        }
        self.output.header_ext = ext;
    }

    /// Set the source output extension
    pub fn set_source_extension(&mut self, ext: &str) {
        let ext = normalize_extension(ext);
        if FileCategory::from_extension(&ext) != Some(FileCategory::Source) {
            warn!(".{} is not a recognized C/C++ source file extension", ext);
        }
        self.output.source_ext = ext;
    }

    /// Reject configurations that cannot produce output file names
    pub fn validate(&self) -> Result<()> {
        if self.output.name.trim().is_empty() {
            return Err(Error::Config("output name is empty".into()));
        }
        if self.output.header_ext.is_empty() || self.output.source_ext.is_empty() {
            return Err(Error::Config("output extension is empty".into()));
        }
        Ok(())
    }

    /// Include directories in registration order
    pub fn include_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = vec![self.base_dir.join("include")];
        dirs.extend(self.search.include_dirs.iter().cloned());
        dirs
    }

    /// Source directories in registration order
    pub fn source_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = vec![self.base_dir.join("src")];
        dirs.extend(self.search.source_dirs.iter().cloned());
        dirs
    }

    pub fn header_file_name(&self) -> String {
        format!("{}.{}", self.output.name, self.output.header_ext)
    }

    pub fn source_file_name(&self) -> String {
        format!("{}.{}", self.output.name, self.output.source_ext)
    }

    pub fn header_path(&self) -> PathBuf {
        self.output.dir.join(self.header_file_name())
    }

    pub fn source_path(&self) -> PathBuf {
        self.output.dir.join(self.source_file_name())
    }
}

/// Strip a leading dot and surrounding whitespace
fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_string()
}
