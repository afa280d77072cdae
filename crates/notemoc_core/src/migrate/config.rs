//! Migration request, result and error types.

use crate::config::ConfigError;
use crate::export::{ExportConfig, ExportError, FolderLayout, LinkStyle, ProviderKind, TagStyle};
use crate::model::ContentType;
use crate::moc::MocConfig;
use crate::store::{Session, StoreError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

/// Full configuration of one migration run.
#[derive(Debug, Clone)]
pub struct MigrationConfig {
    pub session: Option<Session>,
    pub provider: Option<ProviderKind>,
    pub output_dir: Option<PathBuf>,
    /// Item kind to export; only notes produce files.
    pub content_type: ContentType,
    /// Tag titles; a note is kept when it carries any of them.
    pub tag_filter: Vec<String>,
    pub preserve_uuids: bool,
    pub link_style: LinkStyle,
    pub tag_style: TagStyle,
    pub folder_layout: FolderLayout,
    pub generate_mocs: bool,
    pub moc: MocConfig,
    pub dry_run: bool,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            session: None,
            provider: None,
            output_dir: None,
            content_type: ContentType::Note,
            tag_filter: Vec::new(),
            preserve_uuids: false,
            link_style: LinkStyle::default(),
            tag_style: TagStyle::default(),
            folder_layout: FolderLayout::default(),
            generate_mocs: false,
            moc: MocConfig::default(),
            dry_run: false,
        }
    }
}

impl MigrationConfig {
    /// Config with the three required settings filled in.
    pub fn new(session: Session, provider: ProviderKind, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            session: Some(session),
            provider: Some(provider),
            output_dir: Some(output_dir.into()),
            ..Self::default()
        }
    }

    /// Export settings handed to the provider.
    pub fn export_config(&self) -> ExportConfig {
        ExportConfig {
            output_dir: self.output_dir.clone(),
            preserve_uuids: self.preserve_uuids,
            link_style: self.link_style,
            tag_style: self.tag_style,
            folder_layout: self.folder_layout,
            dry_run: self.dry_run,
        }
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationResult {
    pub notes_exported: usize,
    pub mocs_created: usize,
    /// Distinct tag titles across exported notes.
    pub tags_processed: usize,
    pub duration: Duration,
    pub output_path: PathBuf,
    /// Degraded failures that did not abort the run.
    pub warnings: Vec<String>,
    /// Data problems found in exported notes, such as dangling tag references.
    pub errors: Vec<String>,
}

/// Run-aborting failure.
#[derive(Debug)]
pub enum MigrationError {
    MissingSession,
    MissingProvider,
    MissingOutputDir,
    /// Real runs refuse to write into an existing directory.
    OutputDirExists(PathBuf),
    InvalidConfig(ConfigError),
    Store(StoreError),
    /// Filtering left nothing to export.
    NoNotesFound,
    Export(ExportError),
}

impl Display for MigrationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingSession => write!(f, "session is required"),
            Self::MissingProvider => write!(f, "export provider is required"),
            Self::MissingOutputDir => write!(f, "output directory is required"),
            Self::OutputDirExists(path) => {
                write!(f, "output directory already exists: {}", path.display())
            }
            Self::InvalidConfig(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::NoNotesFound => write!(f, "no notes found to export"),
            Self::Export(err) => write!(f, "{err}"),
        }
    }
}

impl Error for MigrationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidConfig(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Export(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for MigrationError {
    fn from(value: ConfigError) -> Self {
        Self::InvalidConfig(value)
    }
}

impl From<StoreError> for MigrationError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<ExportError> for MigrationError {
    fn from(value: ExportError) -> Self {
        match value {
            ExportError::MissingOutputDir => Self::MissingOutputDir,
            other => Self::Export(other),
        }
    }
}
