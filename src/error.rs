//! Error types for knowledge-base access.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while listing or reading knowledge-base documents.
///
/// [`CorpusError::Access`] is fatal to a retrieval call and propagates to the
/// caller. [`CorpusError::Document`] affects a single document; the retriever
/// logs it and continues with the rest of the corpus.
#[derive(Debug, Error)]
pub enum CorpusError {
    /// The corpus location itself cannot be listed (missing, not a
    /// directory, no permission).
    #[error("cannot access knowledge base at {path}: {source}")]
    Access {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A single document cannot be opened or decoded as UTF-8 text.
    #[error("cannot read document '{name}': {source}")]
    Document {
        name: String,
        #[source]
        source: io::Error,
    },

    /// An include pattern in the corpus configuration is malformed.
    #[error("invalid include pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },
}
