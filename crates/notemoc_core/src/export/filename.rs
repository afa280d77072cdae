//! Filename sanitization and per-run uniqueness.
//!
//! # Responsibility
//! - Map arbitrary titles onto portable file stems.
//! - Hand out collision-free paths for one export run.
//!
//! # Invariants
//! - A claimed path is never handed out twice within one registry,
//!   compared case-insensitively.
//! - Collisions get `-1`, `-2`, ... suffixes in claim order.
//! - Sanitized components never start with `.`, so `.` and `..` cannot
//!   alias the output root or escape it.
//! - One registry belongs to exactly one exporter run.

use crate::model::{ItemId, Note};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

/// Maximum stem length in characters.
pub const MAX_FILENAME_CHARS: usize = 200;
/// Stem used when sanitization leaves nothing.
pub const UNTITLED: &str = "untitled";

static RESERVED_CHARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[<>:"/\\|?*]"#).expect("valid reserved chars regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Sanitizes a title into a file stem or directory name.
///
/// Leading dots are stripped; an empty result becomes `untitled`.
pub fn sanitize_filename(name: &str) -> String {
    let stem = sanitize_component(name);
    if stem.is_empty() {
        UNTITLED.to_string()
    } else {
        stem
    }
}

/// File stem base for a note before uniqueness suffixing.
///
/// Notes whose title sanitizes to nothing fall back to
/// `untitled-<first 8 hex chars of uuid>`.
pub fn note_file_stem(note: &Note) -> String {
    let stem = sanitize_component(&note.title);
    if stem.is_empty() {
        let simple = note.uuid.simple().to_string();
        format!("{UNTITLED}-{}", &simple[..8])
    } else {
        stem
    }
}

fn sanitize_component(name: &str) -> String {
    let replaced = RESERVED_CHARS_RE.replace_all(name, "-");
    let collapsed = WHITESPACE_RE.replace_all(&replaced, " ");
    collapsed
        .trim()
        .trim_start_matches('.')
        .trim_start()
        .chars()
        .take(MAX_FILENAME_CHARS)
        .collect::<String>()
        .trim_end()
        .to_string()
}

/// Per-run table of claimed file paths.
///
/// Paths are `/`-separated and relative to the output directory, without
/// the `.md` extension.
#[derive(Debug, Default)]
pub struct FilenameRegistry {
    used: HashSet<String>,
    assigned: HashMap<ItemId, String>,
}

impl FilenameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the first free path for `stem`, optionally under `dir`.
    pub fn claim(&mut self, dir: Option<&str>, stem: &str) -> String {
        let prefix = dir
            .filter(|value| !value.is_empty())
            .map(|value| format!("{value}/"))
            .unwrap_or_default();
        let mut candidate = format!("{prefix}{stem}");
        let mut suffix = 0_usize;
        while !self.used.insert(candidate.to_lowercase()) {
            suffix += 1;
            candidate = format!("{prefix}{stem}-{suffix}");
        }
        candidate
    }

    /// Claims a path for one item and remembers it for link resolution.
    ///
    /// Re-assigning an item returns its existing path.
    pub fn assign(&mut self, item_id: ItemId, dir: Option<&str>, stem: &str) -> String {
        if let Some(existing) = self.assigned.get(&item_id) {
            return existing.clone();
        }
        let path = self.claim(dir, stem);
        self.assigned.insert(item_id, path.clone());
        path
    }

    /// Path previously assigned to `item_id`.
    pub fn path_for(&self, item_id: ItemId) -> Option<&str> {
        self.assigned.get(&item_id).map(String::as_str)
    }
}
