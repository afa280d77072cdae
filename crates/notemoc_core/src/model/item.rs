//! Note, tag and corpus records.
//!
//! # Responsibility
//! - Define the closed `Item` variant produced by note stores.
//! - Partition raw items into a `Corpus` and resolve tag references.
//!
//! # Invariants
//! - `uuid` is unique within one corpus.
//! - Tag titles double as display names and MOC grouping keys.
//! - Tag resolution keeps reference order and drops dangling references.

use crate::config::ConfigError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier for notes and tags.
pub type ItemId = Uuid;

/// Kind of item carried by the note store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentType {
    Note,
    Tag,
}

impl ContentType {
    /// Wire name used by note stores.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Note => "Note",
            Self::Tag => "Tag",
        }
    }
}

impl Display for ContentType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "note" => Ok(Self::Note),
            "tag" => Ok(Self::Tag),
            other => Err(ConfigError::UnknownContentType(other.to_string())),
        }
    }
}

/// Typed reference from one item to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRef {
    pub uuid: ItemId,
    pub content_type: ContentType,
}

impl ItemRef {
    /// Reference to a tag item.
    pub fn tag(uuid: ItemId) -> Self {
        Self {
            uuid,
            content_type: ContentType::Tag,
        }
    }
}

/// A single note as materialized by the note store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub uuid: ItemId,
    #[serde(default)]
    pub title: String,
    /// Raw body text. Missing bodies deserialize as empty.
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub references: Vec<ItemRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub trashed: bool,
}

impl Note {
    /// Creates an untrashed, untagged note stamped with the current time.
    pub fn new(uuid: ItemId, title: impl Into<String>, text: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            uuid,
            title: title.into(),
            text: text.into(),
            references: Vec::new(),
            created_at: now,
            updated_at: now,
            trashed: false,
        }
    }

    /// Adds tag references in the given order.
    pub fn with_tags(mut self, tag_ids: &[ItemId]) -> Self {
        self.references
            .extend(tag_ids.iter().copied().map(ItemRef::tag));
        self
    }

    /// Overrides creation and update timestamps.
    pub fn with_timestamps(mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = updated_at;
        self
    }

    /// Marks the note as trashed.
    pub fn into_trashed(mut self) -> Self {
        self.trashed = true;
        self
    }

    /// Iterates over referenced tag ids.
    pub fn tag_ids(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.references
            .iter()
            .filter(|reference| reference.content_type == ContentType::Tag)
            .map(|reference| reference.uuid)
    }
}

/// A named label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub uuid: ItemId,
    pub title: String,
}

impl Tag {
    pub fn new(uuid: ItemId, title: impl Into<String>) -> Self {
        Self {
            uuid,
            title: title.into(),
        }
    }
}

/// Closed variant over every item kind the engine understands.
///
/// Serialized with a `content_type` discriminator to match note-store
/// payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "content_type")]
pub enum Item {
    Note(Note),
    Tag(Tag),
}

/// Notes and tags of one run, partitioned from raw items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    pub notes: Vec<Note>,
    pub tags: Vec<Tag>,
}

impl Corpus {
    pub fn new(notes: Vec<Note>, tags: Vec<Tag>) -> Self {
        Self { notes, tags }
    }

    /// Partitions store items into notes and tags, preserving order.
    pub fn from_items(items: Vec<Item>) -> Self {
        let mut corpus = Self::default();
        for item in items {
            match item {
                Item::Note(note) => corpus.notes.push(note),
                Item::Tag(tag) => corpus.tags.push(tag),
            }
        }
        corpus
    }

    pub fn tag_lookup(&self) -> TagLookup<'_> {
        TagLookup::new(&self.tags)
    }
}

/// Tag id to title resolution table.
#[derive(Debug, Clone, Default)]
pub struct TagLookup<'a> {
    titles: HashMap<ItemId, &'a str>,
}

impl<'a> TagLookup<'a> {
    pub fn new(tags: &'a [Tag]) -> Self {
        let titles = tags
            .iter()
            .map(|tag| (tag.uuid, tag.title.as_str()))
            .collect();
        Self { titles }
    }

    pub fn title(&self, tag_id: ItemId) -> Option<&'a str> {
        self.titles.get(&tag_id).copied()
    }

    /// Resolves the tag titles of one note, in reference order, deduplicated.
    pub fn titles_for(&self, note: &Note) -> Vec<String> {
        let mut seen = HashSet::new();
        note.tag_ids()
            .filter_map(|tag_id| self.title(tag_id))
            .filter(|title| seen.insert(*title))
            .map(str::to_string)
            .collect()
    }
}
