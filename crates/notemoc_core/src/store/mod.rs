//! Note-store collaborator contract.
//!
//! # Responsibility
//! - Define how the engine obtains the current item set for a session.
//! - Provide in-memory and JSON-file implementations.
//!
//! # Invariants
//! - Stores return already-decrypted, already-deduplicated items.
//! - Failures are returned unchanged; the engine never retries.

pub mod json;
pub mod memory;

use crate::model::Item;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::PathBuf;

pub use json::{CorpusDocument, JsonFileNoteStore};
pub use memory::MemoryNoteStore;

/// Opaque handle identifying an authenticated note-store session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    id: String,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Rejects blank session ids.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.id.trim().is_empty() {
            return Err(StoreError::InvalidSession);
        }
        Ok(())
    }
}

/// Note-store failure.
#[derive(Debug)]
pub enum StoreError {
    /// Session handle is blank or was rejected.
    InvalidSession,
    /// Backing file could not be read.
    Io { path: PathBuf, source: io::Error },
    /// Backing document is not a valid corpus.
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// Upstream store reported a failure.
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSession => write!(f, "note-store session is invalid"),
            Self::Io { path, source } => {
                write!(f, "failed to read corpus {}: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "invalid corpus document {}: {source}", path.display())
            }
            Self::Unavailable(message) => write!(f, "note store unavailable: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::InvalidSession | Self::Unavailable(_) => None,
        }
    }
}

/// Source of the full current item set.
pub trait NoteStore {
    /// Returns every note and tag visible to `session`.
    fn get_corpus(&self, session: &Session) -> Result<Vec<Item>, StoreError>;
}
