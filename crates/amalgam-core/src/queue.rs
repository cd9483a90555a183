//! Emission queues
//!
//! Two insertion-ordered sequences of absolute paths, one per output.
//! The scanner appends a file only after all of its includes have been
//! processed, so queue order is dependency-then-dependent.

use crate::types::FileCategory;
use serde::Serialize;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

/// Header and source emission queues
#[derive(Debug, Clone, Default, Serialize)]
pub struct EmissionQueues {
    headers: VecDeque<PathBuf>,
    sources: VecDeque<PathBuf>,
}

impl EmissionQueues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a path to the queue for its category
    pub fn push(&mut self, category: FileCategory, path: PathBuf) {
        match category {
            FileCategory::Header => self.headers.push_back(path),
            FileCategory::Source => self.sources.push_back(path),
        }
    }

    /// Queue for one category, in emission order
    pub fn queue(&self, category: FileCategory) -> &VecDeque<PathBuf> {
        match category {
            FileCategory::Header => &self.headers,
            FileCategory::Source => &self.sources,
        }
    }

    pub fn headers(&self) -> &VecDeque<PathBuf> {
        &self.headers
    }

    pub fn sources(&self) -> &VecDeque<PathBuf> {
        &self.sources
    }

    /// Position of a path within its queue
    pub fn position(&self, path: &Path) -> Option<(FileCategory, usize)> {
        if let Some(i) = self.headers.iter().position(|p| p == path) {
            return Some((FileCategory::Header, i));
        }
        self.sources
            .iter()
            .position(|p| p == path)
            .map(|i| (FileCategory::Source, i))
    }

    /// Total number of queued files
    pub fn len(&self) -> usize {
        self.headers.len() + self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.sources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_routes_by_category() {
        let mut queues = EmissionQueues::new();
        queues.push(FileCategory::Header, PathBuf::from("/p/include/a.hpp"));
        queues.push(FileCategory::Source, PathBuf::from("/p/src/a.cpp"));
        queues.push(FileCategory::Header, PathBuf::from("/p/include/b.hpp"));

        assert_eq!(queues.len(), 3);
        assert_eq!(queues.headers().len(), 2);
        assert_eq!(queues.sources().len(), 1);
        assert_eq!(
            queues.position(Path::new("/p/include/b.hpp")),
            Some((FileCategory::Header, 1))
        );
        assert_eq!(
            queues.position(Path::new("/p/src/a.cpp")),
            Some((FileCategory::Source, 0))
        );
        assert_eq!(queues.position(Path::new("/p/src/missing.cpp")), None);
    }

    #[test]
    fn test_empty() {
        let queues = EmissionQueues::default();
        assert!(queues.is_empty());
        assert_eq!(queues.len(), 0);
    }
}
