//! Include Path Resolver
//!
//! Maps an include token to a file path using the registered search path.
//!
//! Search order, first match wins:
//! 1. `./` and `../` tokens relative to the including file (when enabled)
//! 2. absolute tokens, returned as-is
//! 3. include directories, in registration order
//! 4. source directories, in registration order

use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

/// Registered include and source directories
#[derive(Debug, Clone)]
pub struct SearchPath {
    include_dirs: Vec<PathBuf>,
    source_dirs: Vec<PathBuf>,
    relative_includes: bool,
}

impl SearchPath {
    /// Create an empty search path
    pub fn new() -> Self {
        Self {
            include_dirs: Vec::new(),
            source_dirs: Vec::new(),
            relative_includes: true,
        }
    }

    /// Enable or disable includer-relative resolution of `./` and `../` tokens
    pub fn with_relative_includes(mut self, enabled: bool) -> Self {
        self.relative_includes = enabled;
        self
    }

    /// Register an include directory; missing directories are ignored
    pub fn add_include_dir(&mut self, path: &Path) -> bool {
        match register(&mut self.include_dirs, path) {
            Some(dir) => {
                info!("Include directory added: {}", dir.display());
                true
            }
            None => false,
        }
    }

    /// Register a source directory; missing directories are ignored
    pub fn add_source_dir(&mut self, path: &Path) -> bool {
        match register(&mut self.source_dirs, path) {
            Some(dir) => {
                info!("Source directory added: {}", dir.display());
                true
            }
            None => false,
        }
    }

    pub fn include_dirs(&self) -> &[PathBuf] {
        &self.include_dirs
    }

    pub fn source_dirs(&self) -> &[PathBuf] {
        &self.source_dirs
    }

    /// Resolve an include token found in `from_file`
    pub fn resolve(&self, token: &str, from_file: &Path) -> Option<PathBuf> {
        let token_path = Path::new(token);

        if self.relative_includes && is_explicitly_relative(token_path) {
            if let Some(parent) = from_file.parent() {
                let candidate = normalize_path(&parent.join(token_path));
                if candidate.exists() {
                    debug!("Resolved {} relative to {}", token, from_file.display());
                    return Some(candidate);
                }
            }
        }

        if token_path.is_absolute() {
            return Some(normalize_path(token_path));
        }

        for dir in self.include_dirs.iter().chain(self.source_dirs.iter()) {
            let candidate = normalize_path(&dir.join(token_path));
            if candidate.exists() {
                debug!("Resolved {} in {}", token, dir.display());
                return Some(candidate);
            }
        }

        None
    }
}

impl Default for SearchPath {
    fn default() -> Self {
        Self::new()
    }
}

fn register(dirs: &mut Vec<PathBuf>, path: &Path) -> Option<PathBuf> {
    if !path.is_dir() {
        info!("Skipping missing directory: {}", path.display());
        return None;
    }

    let dir = absolute_path(path);
    if dirs.contains(&dir) {
        return None;
    }
    dirs.push(dir.clone());
    Some(dir)
}

/// Whether a token starts with a `.` or `..` component
fn is_explicitly_relative(path: &Path) -> bool {
    matches!(
        path.components().next(),
        Some(Component::CurDir) | Some(Component::ParentDir)
    )
}

/// Make a path absolute against the working directory, then normalize it
pub fn absolute_path(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    normalize_path(&absolute)
}

/// Lexically remove `.` components and fold `..` into its parent.
///
/// Symlinks are not consulted.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}
