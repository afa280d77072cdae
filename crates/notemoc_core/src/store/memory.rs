//! In-memory note store.

use crate::model::Item;
use crate::store::{NoteStore, Session, StoreError};

/// Serves a fixed item list, or a fixed failure.
#[derive(Debug, Clone, Default)]
pub struct MemoryNoteStore {
    items: Vec<Item>,
    failure: Option<String>,
}

impl MemoryNoteStore {
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            items,
            failure: None,
        }
    }

    /// Store whose every call fails with `StoreError::Unavailable`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            items: Vec::new(),
            failure: Some(message.into()),
        }
    }
}

impl NoteStore for MemoryNoteStore {
    fn get_corpus(&self, session: &Session) -> Result<Vec<Item>, StoreError> {
        session.validate()?;
        if let Some(message) = &self.failure {
            return Err(StoreError::Unavailable(message.clone()));
        }
        Ok(self.items.clone())
    }
}
