//! Corpus abstraction over knowledge-base storage.
//!
//! The [`Corpus`] trait defines the two operations the retriever needs —
//! list documents, read a document — enabling pluggable backends:
//!
//! - **[`DirectoryCorpus`]** — a flat directory of `.txt` files on disk,
//!   the production backend.
//! - **[`MemoryCorpus`]** — an in-memory map, for tests and embedded
//!   corpora.
//!
//! Listings are always returned in sorted order so retrieval output is
//! reproducible for a fixed corpus.

use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::CorpusError;

/// A readable collection of named text documents.
pub trait Corpus: Send + Sync {
    /// Human-readable label for status output (e.g. the directory path).
    fn label(&self) -> String;

    /// List document names in deterministic (sorted) order.
    ///
    /// A failure here means the corpus as a whole is unreachable and is
    /// fatal to the retrieval call.
    fn list(&self) -> Result<Vec<String>, CorpusError>;

    /// Read the full text of one document.
    fn read(&self, name: &str) -> Result<String, CorpusError>;
}

/// Knowledge base stored as a flat directory of text files.
///
/// One file = one document; the document name is the file name. Only files
/// matching the include patterns (default `*.txt`) are visible; nested
/// directories are not descended into.
#[derive(Debug)]
pub struct DirectoryCorpus {
    root: PathBuf,
    include: GlobSet,
}

impl DirectoryCorpus {
    pub fn new(root: impl Into<PathBuf>, include_globs: &[String]) -> Result<Self, CorpusError> {
        Ok(Self {
            root: root.into(),
            include: build_globset(include_globs)?,
        })
    }

    /// The directory this corpus reads from.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Corpus for DirectoryCorpus {
    fn label(&self) -> String {
        self.root.display().to_string()
    }

    fn list(&self) -> Result<Vec<String>, CorpusError> {
        let mut names = Vec::new();

        let walker = WalkDir::new(&self.root).min_depth(1).max_depth(1);
        for entry in walker {
            let entry = entry.map_err(|e| CorpusError::Access {
                path: self.root.clone(),
                source: io::Error::from(e),
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().to_string();
            if !self.include.is_match(&name) {
                continue;
            }

            names.push(name);
        }

        // Sort for deterministic ordering
        names.sort();

        Ok(names)
    }

    fn read(&self, name: &str) -> Result<String, CorpusError> {
        std::fs::read_to_string(self.root.join(name)).map_err(|e| CorpusError::Document {
            name: name.to_string(),
            source: e,
        })
    }
}

/// In-memory corpus backed by a sorted map.
///
/// Used in tests and wherever a corpus must be assembled without touching
/// the filesystem.
#[derive(Debug, Default)]
pub struct MemoryCorpus {
    docs: BTreeMap<String, String>,
}

impl MemoryCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a document.
    pub fn insert(&mut self, name: impl Into<String>, body: impl Into<String>) {
        self.docs.insert(name.into(), body.into());
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }
}

impl Corpus for MemoryCorpus {
    fn label(&self) -> String {
        format!("memory ({} documents)", self.docs.len())
    }

    fn list(&self) -> Result<Vec<String>, CorpusError> {
        // BTreeMap keys are already sorted
        Ok(self.docs.keys().cloned().collect())
    }

    fn read(&self, name: &str) -> Result<String, CorpusError> {
        self.docs
            .get(name)
            .cloned()
            .ok_or_else(|| CorpusError::Document {
                name: name.to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "no such document"),
            })
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet, CorpusError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| CorpusError::Pattern {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| CorpusError::Pattern {
        pattern: patterns.join(", "),
        message: e.to_string(),
    })
}
