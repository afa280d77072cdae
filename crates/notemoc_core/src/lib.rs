//! Note-corpus analysis and knowledge-base export engine.
//! Discovers themes, builds Maps of Content and writes markdown vaults.

pub mod analysis;
pub mod config;
pub mod export;
pub mod logging;
pub mod migrate;
pub mod moc;
pub mod model;
pub mod store;

pub use analysis::{AnalyzerConfig, ContentAnalyzer, ContentTheme};
pub use config::ConfigError;
pub use export::{
    ExportConfig, ExportError, FileSink, FolderLayout, FsSink, LinkStyle, MemorySink,
    ObsidianProvider, Provider, ProviderKind, TagStyle,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use migrate::{MigrationConfig, MigrationError, MigrationResult, Migrator};
pub use moc::{MocBuilder, MocConfig, MocError, MocFile, MocPlan, MocStyle};
pub use model::{ContentType, Corpus, Item, ItemId, Note, Tag};
pub use store::{JsonFileNoteStore, MemoryNoteStore, NoteStore, Session, StoreError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
