//! JSON corpus file store.
//!
//! The document shape is `{ "items": [ { "content_type": "Note", ... } ] }`.

use crate::model::Item;
use crate::store::{NoteStore, Session, StoreError};
use log::{debug, error};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// On-disk corpus document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusDocument {
    #[serde(default)]
    pub items: Vec<Item>,
}

/// Reads the whole corpus from one JSON file on every call.
#[derive(Debug, Clone)]
pub struct JsonFileNoteStore {
    path: PathBuf,
}

impl JsonFileNoteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl NoteStore for JsonFileNoteStore {
    fn get_corpus(&self, session: &Session) -> Result<Vec<Item>, StoreError> {
        session.validate()?;
        let raw = std::fs::read_to_string(&self.path).map_err(|source| {
            error!(
                "event=store_read module=store status=error error_kind=io error={}",
                source
            );
            StoreError::Io {
                path: self.path.clone(),
                source,
            }
        })?;
        let document: CorpusDocument = serde_json::from_str(&raw).map_err(|source| {
            error!(
                "event=store_read module=store status=error error_kind=parse line={} column={}",
                source.line(),
                source.column()
            );
            StoreError::Parse {
                path: self.path.clone(),
                source,
            }
        })?;
        debug!(
            "event=store_read module=store status=ok items={}",
            document.items.len()
        );
        Ok(document.items)
    }
}
