//! Markdown export of notes and MOCs.
//!
//! # Responsibility
//! - Render notes into the target markdown dialect.
//! - Assign collision-free file names and persist through a `FileSink`.
//!
//! # Invariants
//! - No note overwrites another note's file within one run.

pub mod config;
pub mod filename;
pub mod frontmatter;
pub mod links;
pub mod markdown;
pub mod provider;
pub mod sink;

pub use config::{ExportConfig, FolderLayout, LinkStyle, TagStyle};
pub use filename::{note_file_stem, sanitize_filename, FilenameRegistry};
pub use links::render_link;
pub use markdown::{render_note, LinkRewriter, PassThrough};
pub use provider::{ExportError, ExportSummary, ObsidianProvider, Provider, ProviderKind};
pub use sink::{FileSink, FsSink, MemorySink};
