//! Command-line arguments and their mapping onto run configuration.

use clap::Parser;
use notemoc_core::{
    ContentType, FolderLayout, LinkStyle, MigrationConfig, MocConfig, MocStyle, ProviderKind,
    Session, TagStyle,
};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};

/// Top-level CLI parser for the `notemoc` binary.
#[derive(Debug, Parser)]
#[command(
    name = "notemoc",
    version,
    about = "Export a note corpus as a markdown vault with Maps of Content"
)]
pub struct Cli {
    /// Corpus JSON document (`{ "items": [...] }`)
    #[arg(long)]
    pub input: PathBuf,

    /// Output directory; must not exist unless --dry-run is set
    #[arg(long)]
    pub output: PathBuf,

    /// Note-store session id
    #[arg(long, default_value = "local")]
    pub session: String,

    /// Export provider
    #[arg(long, default_value = "obsidian")]
    pub provider: ProviderKind,

    /// Item kind to export: note, tag
    #[arg(long, default_value = "note")]
    pub content_type: ContentType,

    /// Keep only notes carrying any of these tags (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Generate Maps of Content after exporting notes
    #[arg(long)]
    pub mocs: bool,

    /// MOC style: flat, hierarchical, para, topic, auto
    #[arg(long)]
    pub moc_style: Option<MocStyle>,

    /// MOC max depth (1-10)
    #[arg(long)]
    pub max_depth: Option<u32>,

    /// Minimum notes a tag needs for its own MOC
    #[arg(long)]
    pub min_notes: Option<usize>,

    /// Omit the statistics section from Home
    #[arg(long)]
    pub no_stats: bool,

    /// Omit the recently updated section from Home
    #[arg(long)]
    pub no_recent: bool,

    /// Number of recently updated notes listed on Home
    #[arg(long)]
    pub recent: Option<usize>,

    /// Write note UUIDs into frontmatter
    #[arg(long)]
    pub preserve_uuids: bool,

    /// Link style: wikilink, markdown, relative
    #[arg(long, default_value = "wikilink")]
    pub link_style: LinkStyle,

    /// Tag style: frontmatter, inline, both
    #[arg(long, default_value = "frontmatter")]
    pub tag_style: TagStyle,

    /// Folder layout: flat, by-tag
    #[arg(long, default_value = "flat")]
    pub layout: FolderLayout,

    /// Compute everything but write nothing
    #[arg(long)]
    pub dry_run: bool,

    /// MOC configuration JSON; flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Absolute directory for rolling log files
    #[arg(long)]
    pub log_dir: Option<String>,

    /// Log level: trace, debug, info, warn, error
    #[arg(long)]
    pub log_level: Option<String>,
}

/// Failure while turning arguments into configuration.
#[derive(Debug)]
pub enum ArgsError {
    ReadConfig { path: PathBuf, source: io::Error },
    ParseConfig {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl Display for ArgsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReadConfig { path, source } => {
                write!(f, "failed to read config {}: {source}", path.display())
            }
            Self::ParseConfig { path, source } => {
                write!(f, "invalid config {}: {source}", path.display())
            }
        }
    }
}

impl Error for ArgsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ReadConfig { source, .. } => Some(source),
            Self::ParseConfig { source, .. } => Some(source),
        }
    }
}

impl Cli {
    /// MOC settings from `--config` (or defaults) with flag overrides applied.
    pub fn moc_config(&self) -> Result<MocConfig, ArgsError> {
        let mut moc = match &self.config {
            Some(path) => load_moc_config(path)?,
            None => MocConfig::default(),
        };
        if let Some(style) = self.moc_style {
            moc.style = style;
        }
        if let Some(max_depth) = self.max_depth {
            moc.max_depth = max_depth;
        }
        if let Some(min_notes) = self.min_notes {
            moc.min_notes_per_moc = min_notes;
        }
        if let Some(recent) = self.recent {
            moc.recent_count = recent;
        }
        if self.no_stats {
            moc.include_stats = false;
        }
        if self.no_recent {
            moc.include_recent = false;
        }
        Ok(moc)
    }

    pub fn migration_config(&self) -> Result<MigrationConfig, ArgsError> {
        Ok(MigrationConfig {
            content_type: self.content_type,
            tag_filter: self.tags.clone(),
            preserve_uuids: self.preserve_uuids,
            link_style: self.link_style,
            tag_style: self.tag_style,
            folder_layout: self.layout,
            generate_mocs: self.mocs,
            moc: self.moc_config()?,
            dry_run: self.dry_run,
            ..MigrationConfig::new(
                Session::new(self.session.clone()),
                self.provider,
                self.output.clone(),
            )
        })
    }
}

fn load_moc_config(path: &Path) -> Result<MocConfig, ArgsError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ArgsError::ReadConfig {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ArgsError::ParseConfig {
        path: path.to_path_buf(),
        source,
    })
}
