//! Scan Session
//!
//! Owns all state of one amalgamation scan: the search path, the visited
//! set and the emission queues. Nothing is global, so independent sessions
//! can run side by side.
//!
//! The include graph is walked depth-first with an explicit work stack.
//! A file is marked visited before its includes are processed, which makes
//! the walk terminate on include cycles, and it is enqueued only after all
//! of its includes are done, which puts dependencies ahead of dependents.

use crate::directive::IncludeMatcher;
use crate::resolver::{absolute_path, SearchPath};
use amalgam_core::{AmalgamConfig, EmissionQueues, Error, FileCategory, Result, ScanOutcome};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace};
use walkdir::WalkDir;

/// Summary of a completed scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    /// Files found while walking source directories
    pub roots: usize,
    /// Roots skipped by an exclude pattern
    pub excluded: usize,
    /// Roots that were scanned from the walk
    pub parsed_roots: usize,
    /// Roots that are not C/C++ files
    pub external_roots: usize,
    /// Roots already reached through an include
    pub already_scanned_roots: usize,
    /// Files read from disk
    pub files_read: usize,
    /// Include tokens that matched no file
    pub unresolved_includes: usize,
    /// Queued headers
    pub headers: usize,
    /// Queued sources
    pub sources: usize,
}

/// A file whose includes are being processed
struct Frame {
    path: PathBuf,
    category: FileCategory,
    tokens: std::vec::IntoIter<String>,
}

/// State of one scan over a source tree
pub struct ScanSession {
    search: SearchPath,
    matcher: IncludeMatcher,
    excludes: GlobSet,
    visited: HashSet<PathBuf>,
    queues: EmissionQueues,
    report: ScanReport,
}

impl ScanSession {
    /// Create a session over a fully registered search path
    pub fn new(search: SearchPath) -> Self {
        Self {
            search,
            matcher: IncludeMatcher::new(),
            excludes: GlobSet::empty(),
            visited: HashSet::new(),
            queues: EmissionQueues::new(),
            report: ScanReport::default(),
        }
    }

    /// Create a session from configuration, registering its directories
    pub fn from_config(config: &AmalgamConfig) -> Result<Self> {
        let mut search = SearchPath::new().with_relative_includes(config.search.relative_includes);
        for dir in config.source_dirs() {
            search.add_source_dir(&dir);
        }
        for dir in config.include_dirs() {
            search.add_include_dir(&dir);
        }

        Self::new(search).with_excludes(&config.search.exclude)
    }

    /// Skip walked files matching any of the glob patterns
    pub fn with_excludes(mut self, patterns: &[String]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern).map_err(|e| Error::Pattern(e.to_string()))?;
            builder.add(glob);
        }
        self.excludes = builder.build().map_err(|e| Error::Pattern(e.to_string()))?;
        Ok(self)
    }

    pub fn search_path(&self) -> &SearchPath {
        &self.search
    }

    /// Classify a path without touching session state
    pub fn classify(&self, path: &Path) -> ScanOutcome {
        if self.visited.contains(path) {
            return ScanOutcome::AlreadyScanned;
        }

        match FileCategory::from_path(path) {
            Some(category) if path.is_file() => ScanOutcome::Parsed(category),
            _ => ScanOutcome::External,
        }
    }

    /// Scan a file and everything it transitively includes.
    ///
    /// Returns the classification of `path` itself.
    pub fn scan(&mut self, path: &Path) -> Result<ScanOutcome> {
        let path = absolute_path(path);
        let outcome = self.classify(&path);
        let ScanOutcome::Parsed(category) = outcome else {
            return Ok(outcome);
        };

        self.visited.insert(path.clone());
        let mut stack = vec![self.open(path, category)?];

        while let Some(frame) = stack.last_mut() {
            let Some(token) = frame.tokens.next() else {
                if let Some(done) = stack.pop() {
                    self.enqueue(done.path, done.category);
                }
                continue;
            };

            let Some(resolved) = self.search.resolve(&token, &frame.path) else {
                debug!("Unresolved include {} in {}", token, frame.path.display());
                self.report.unresolved_includes += 1;
                continue;
            };

            match self.classify(&resolved) {
                ScanOutcome::AlreadyScanned => {}
                ScanOutcome::External => {
                    trace!("External include: {}", resolved.display());
                    self.visited.insert(resolved);
                }
                ScanOutcome::Parsed(category) => {
                    self.visited.insert(resolved.clone());
                    stack.push(self.open(resolved, category)?);
                }
            }
        }

        Ok(outcome)
    }

    /// Walk every source directory and scan each file found
    pub fn scan_source_dirs(&mut self) -> Result<ScanReport> {
        let source_dirs = self.search.source_dirs().to_vec();

        for dir in &source_dirs {
            info!("Scanning source directory: {}", dir.display());

            for entry in WalkDir::new(dir).sort_by_file_name() {
                let entry = entry.map_err(|e| Error::Walk(e.to_string()))?;
                if entry.file_type().is_dir() {
                    continue;
                }

                self.report.roots += 1;
                if self.is_excluded(dir, entry.path()) {
                    debug!("Excluded: {}", entry.path().display());
                    self.report.excluded += 1;
                    continue;
                }

                match self.scan(entry.path())? {
                    ScanOutcome::Parsed(_) => self.report.parsed_roots += 1,
                    ScanOutcome::External => self.report.external_roots += 1,
                    ScanOutcome::AlreadyScanned => self.report.already_scanned_roots += 1,
                }
            }
        }

        info!(
            "Scan complete: {} headers, {} sources, {} unresolved includes",
            self.queues.headers().len(),
            self.queues.sources().len(),
            self.report.unresolved_includes
        );
        Ok(self.report())
    }

    /// Whether a path has been scanned or marked external
    pub fn is_visited(&self, path: &Path) -> bool {
        self.visited.contains(path)
    }

    pub fn visited(&self) -> &HashSet<PathBuf> {
        &self.visited
    }

    pub fn queues(&self) -> &EmissionQueues {
        &self.queues
    }

    /// Current scan summary
    pub fn report(&self) -> ScanReport {
        ScanReport {
            headers: self.queues.headers().len(),
            sources: self.queues.sources().len(),
            ..self.report.clone()
        }
    }

    /// Finish the session, keeping only the emission order
    pub fn into_queues(self) -> EmissionQueues {
        self.queues
    }

    /// Read a file and collect its include tokens; the file is closed on return
    fn open(&mut self, path: PathBuf, category: FileCategory) -> Result<Frame> {
        debug!("Scan file: {}", path.display());
        let source = std::fs::read_to_string(&path).map_err(|source| Error::Read {
            path: path.clone(),
            source,
        })?;
        self.report.files_read += 1;

        Ok(Frame {
            tokens: self.matcher.tokens(&source).into_iter(),
            path,
            category,
        })
    }

    fn enqueue(&mut self, path: PathBuf, category: FileCategory) {
        debug!("Enqueue {} file: {}", category, path.display());
        self.queues.push(category, path);
    }

    fn is_excluded(&self, root: &Path, path: &Path) -> bool {
        if self.excludes.is_empty() {
            return false;
        }
        let relative = path.strip_prefix(root).unwrap_or(path);
        self.excludes.is_match(relative) || self.excludes.is_match(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn session_for(root: &Path) -> ScanSession {
        let mut search = SearchPath::new();
        search.add_source_dir(&root.join("src"));
        search.add_include_dir(&root.join("include"));
        ScanSession::new(search)
    }

    #[test]
    fn test_classify_has_no_side_effects() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join("src/a.cpp"), "int a;\n").unwrap();
        fs::write(root.join("src/notes.txt"), "notes\n").unwrap();

        let session = session_for(root);
        let a = root.join("src/a.cpp");

        assert_eq!(session.classify(&a), ScanOutcome::Parsed(FileCategory::Source));
        assert_eq!(session.classify(&a), ScanOutcome::Parsed(FileCategory::Source));
        assert!(!session.is_visited(&a));

        assert_eq!(session.classify(&root.join("src/notes.txt")), ScanOutcome::External);
        assert_eq!(session.classify(&root.join("src/gone.cpp")), ScanOutcome::External);
    }

    #[test]
    fn test_scan_marks_and_enqueues() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join("src/a.cpp"), "int a;\n").unwrap();

        let mut session = session_for(root);
        let a = root.join("src/a.cpp");

        assert_eq!(session.scan(&a).unwrap(), ScanOutcome::Parsed(FileCategory::Source));
        assert!(session.is_visited(&a));
        assert_eq!(session.scan(&a).unwrap(), ScanOutcome::AlreadyScanned);
        assert_eq!(session.queues().sources().len(), 1);
    }

    #[test]
    fn test_external_include_is_marked_visited() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::create_dir_all(root.join("include")).unwrap();
        fs::write(root.join("include/table.def"), "X(1)\n").unwrap();
        fs::write(root.join("src/a.cpp"), "#include \"table.def\"\n").unwrap();

        let mut session = session_for(root);
        session.scan(&root.join("src/a.cpp")).unwrap();

        assert!(session.is_visited(&root.join("include/table.def")));
        assert_eq!(session.queues().headers().len(), 0);
        assert_eq!(session.queues().sources().len(), 1);
    }

    #[test]
    fn test_unreadable_file_is_fatal() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join("src/bad.cpp"), [0xffu8, 0xfe, 0x00, 0x80]).unwrap();

        let mut session = session_for(root);
        let result = session.scan(&root.join("src/bad.cpp"));
        assert!(matches!(result, Err(Error::Read { .. })));
    }

    #[test]
    fn test_invalid_exclude_pattern() {
        let session = ScanSession::new(SearchPath::new());
        let result = session.with_excludes(&["src/[".to_string()]);
        assert!(matches!(result, Err(Error::Pattern(_))));
    }
}
