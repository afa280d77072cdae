//! Per-note markdown rendering.
//!
//! # Responsibility
//! - Render one note into the target markdown dialect.
//! - Expose the body link-rewriting hook.
//!
//! # Invariants
//! - The title is always emitted as a level-1 heading.
//! - Source notes are read-only; rendering never mutates them.

use crate::export::config::ExportConfig;
use crate::export::frontmatter::{Frontmatter, SOURCE_MARKER};
use crate::model::Note;
use chrono::{DateTime, SecondsFormat, Utc};

/// Heading used for notes without a title.
pub const UNTITLED_HEADING: &str = "Untitled";

/// Rewrites links inside a note body before it is written.
pub trait LinkRewriter {
    fn rewrite(&self, body: &str) -> String;
}

/// Leaves bodies untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl LinkRewriter for PassThrough {
    fn rewrite(&self, body: &str) -> String {
        body.to_string()
    }
}

/// Display title of a note.
pub fn display_title(note: &Note) -> &str {
    let trimmed = note.title.trim();
    if trimmed.is_empty() {
        UNTITLED_HEADING
    } else {
        trimmed
    }
}

/// Inline `#tag` form: whitespace runs become `-`.
pub fn inline_tag(tag: &str) -> String {
    format!("#{}", tag.split_whitespace().collect::<Vec<_>>().join("-"))
}

pub(crate) fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Renders one note with its resolved tag titles.
pub fn render_note(
    note: &Note,
    tag_titles: &[String],
    config: &ExportConfig,
    rewriter: &dyn LinkRewriter,
) -> String {
    let mut out = String::new();

    if config.tag_style.includes_frontmatter() {
        let mut frontmatter = Frontmatter::new()
            .quoted("title", &note.title)
            .list("tags", tag_titles)
            .plain("created", format_timestamp(&note.created_at))
            .plain("updated", format_timestamp(&note.updated_at));
        if config.preserve_uuids {
            frontmatter = frontmatter.plain("uuid", note.uuid);
        }
        out.push_str(&frontmatter.plain("source", SOURCE_MARKER).render());
        out.push('\n');
    }

    out.push_str("# ");
    out.push_str(display_title(note));
    out.push_str("\n\n");

    let body = rewriter.rewrite(&note.text);
    if !body.is_empty() {
        out.push_str(&body);
        if !body.ends_with('\n') {
            out.push('\n');
        }
    }

    if config.tag_style.includes_inline() && !tag_titles.is_empty() {
        let line = tag_titles
            .iter()
            .map(|tag| inline_tag(tag))
            .collect::<Vec<_>>()
            .join(" ");
        out.push('\n');
        out.push_str(&line);
        out.push('\n');
    }

    out
}
