//! Read-only domain model for the note/tag corpus.
//!
//! # Responsibility
//! - Define the item shapes handed over by the note store.
//! - Resolve note-to-tag references without touching source items.
//!
//! # Invariants
//! - Every item is identified by a stable `ItemId`.
//! - Items are never mutated once loaded into a run.

pub mod item;

pub use item::{Corpus, ContentType, Item, ItemId, ItemRef, Note, Tag, TagLookup};
