//! Export provider contract and the Obsidian-flavoured markdown provider.
//!
//! # Responsibility
//! - Validate export settings before any I/O.
//! - Render and persist every note, then hand MOC generation to the builder.
//!
//! # Invariants
//! - One provider instance owns one filename registry for one run.
//! - The first failed note write aborts the export.
//! - Dry runs perform every computation but never touch the sink.
//! - By-tag directories are sanitized components, so every written path
//!   stays under the output directory.

use crate::config::ConfigError;
use crate::export::config::{ExportConfig, FolderLayout};
use crate::export::filename::{note_file_stem, sanitize_filename, FilenameRegistry};
use crate::export::markdown::{render_note, LinkRewriter, PassThrough};
use crate::export::sink::FileSink;
use crate::moc::{MocBuilder, MocConfig, MocError, MocFile, MocPlan};
use crate::model::Corpus;
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Instant;

/// Export-stage failure.
#[derive(Debug)]
pub enum ExportError {
    /// No output directory configured.
    MissingOutputDir,
    /// Directory creation or file write failed.
    Io { path: PathBuf, source: io::Error },
}

impl ExportError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingOutputDir => write!(f, "output directory is required"),
            Self::Io { path, source } => write!(f, "failed to write {}: {source}", path.display()),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::MissingOutputDir => None,
        }
    }
}

/// Counts and relative paths of one note export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub notes_exported: usize,
    /// Paths relative to the output directory, in export order.
    pub files: Vec<String>,
}

/// Target knowledge-base format.
pub trait Provider {
    /// Stable provider identifier.
    fn name(&self) -> &'static str;

    /// Checks settings; performs no I/O.
    fn validate(&self) -> Result<(), ExportError>;

    /// Renders and writes every note of `corpus`.
    ///
    /// Tag titles resolve against `corpus.tags`, which may be wider than
    /// the exported notes.
    fn export(&mut self, corpus: &Corpus) -> Result<ExportSummary, ExportError>;

    /// Builds MOCs for `corpus` without persisting them.
    fn generate_mocs(&mut self, corpus: &Corpus, config: &MocConfig) -> Result<MocPlan, MocError>;

    /// Persists one generated MOC at the output root.
    fn write_moc(&self, moc: &MocFile) -> Result<(), ExportError>;
}

/// Known providers, selectable by name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Obsidian,
}

impl ProviderKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Obsidian => "obsidian",
        }
    }

    /// Instantiates the provider over `sink`.
    pub fn create<'s>(self, config: ExportConfig, sink: &'s dyn FileSink) -> Box<dyn Provider + 's> {
        match self {
            Self::Obsidian => Box::new(ObsidianProvider::new(config, sink)),
        }
    }
}

impl Display for ProviderKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "obsidian" => Ok(Self::Obsidian),
            other => Err(ConfigError::UnknownProvider(other.to_string())),
        }
    }
}

/// Markdown vault provider with wikilink-first defaults.
pub struct ObsidianProvider<'s> {
    config: ExportConfig,
    sink: &'s dyn FileSink,
    names: FilenameRegistry,
    rewriter: Box<dyn LinkRewriter>,
}

impl<'s> ObsidianProvider<'s> {
    pub fn new(config: ExportConfig, sink: &'s dyn FileSink) -> Self {
        Self {
            config,
            sink,
            names: FilenameRegistry::new(),
            rewriter: Box::new(PassThrough),
        }
    }

    /// Replaces the body link rewriter.
    pub fn with_link_rewriter(mut self, rewriter: Box<dyn LinkRewriter>) -> Self {
        self.rewriter = rewriter;
        self
    }

    fn output_dir(&self) -> Result<&Path, ExportError> {
        self.config
            .output_dir
            .as_deref()
            .filter(|dir| !dir.as_os_str().is_empty())
            .ok_or(ExportError::MissingOutputDir)
    }
}

impl Provider for ObsidianProvider<'_> {
    fn name(&self) -> &'static str {
        ProviderKind::Obsidian.as_str()
    }

    fn validate(&self) -> Result<(), ExportError> {
        self.output_dir().map(|_| ())
    }

    fn export(&mut self, corpus: &Corpus) -> Result<ExportSummary, ExportError> {
        let started_at = Instant::now();
        let output_dir = self.output_dir()?.to_path_buf();
        let dry_run = self.config.dry_run;
        info!(
            "event=export_notes module=export status=start provider={} notes={} dry_run={}",
            self.name(),
            corpus.notes.len(),
            dry_run
        );

        if !dry_run {
            self.sink
                .create_dir_all(&output_dir)
                .map_err(|source| ExportError::io(&output_dir, source))?;
        }

        let lookup = corpus.tag_lookup();
        let mut created_dirs = HashSet::new();
        let mut summary = ExportSummary::default();
        for note in &corpus.notes {
            let tag_titles = lookup.titles_for(note);
            let dir = match self.config.folder_layout {
                FolderLayout::Flat => None,
                FolderLayout::ByTag => tag_titles.first().map(|title| sanitize_filename(title)),
            };
            let path = self
                .names
                .assign(note.uuid, dir.as_deref(), &note_file_stem(note));
            let content = render_note(note, &tag_titles, &self.config, self.rewriter.as_ref());
            let relative = format!("{path}.md");

            if !dry_run {
                if let Some(dir) = dir.filter(|dir| created_dirs.insert(dir.clone())) {
                    let dir_path = output_dir.join(dir);
                    self.sink
                        .create_dir_all(&dir_path)
                        .map_err(|source| ExportError::io(&dir_path, source))?;
                }
                let file_path = output_dir.join(&relative);
                if let Err(source) = self.sink.write_file(&file_path, content.as_bytes()) {
                    error!(
                        "event=export_notes module=export status=error note_uuid={} written={} error={}",
                        note.uuid, summary.notes_exported, source
                    );
                    return Err(ExportError::io(&file_path, source));
                }
            }

            summary.notes_exported += 1;
            summary.files.push(relative);
        }

        info!(
            "event=export_notes module=export status=ok notes={} duration_ms={}",
            summary.notes_exported,
            started_at.elapsed().as_millis()
        );
        Ok(summary)
    }

    fn generate_mocs(&mut self, corpus: &Corpus, config: &MocConfig) -> Result<MocPlan, MocError> {
        MocBuilder::new(&corpus.notes, &corpus.tags, config)
            .with_link_style(self.config.link_style)
            .generate(&mut self.names)
    }

    fn write_moc(&self, moc: &MocFile) -> Result<(), ExportError> {
        let output_dir = self.output_dir()?;
        if self.config.dry_run {
            return Ok(());
        }
        let path = output_dir.join(&moc.filename);
        self.sink
            .write_file(&path, moc.content.as_bytes())
            .map_err(|source| ExportError::io(&path, source))
    }
}

#[cfg(test)]
mod tests {
    use super::{ExportError, ObsidianProvider, Provider, ProviderKind};
    use crate::config::ConfigError;
    use crate::export::config::{ExportConfig, FolderLayout};
    use crate::export::sink::{FileSink, MemorySink};
    use crate::moc::MocConfig;
    use crate::model::{Corpus, Note, Tag};
    use std::path::Path;
    use uuid::Uuid;

    fn untitled_corpus() -> Corpus {
        let notes = (0..3)
            .map(|_| Note::new(Uuid::new_v4(), "Untitled", "same title"))
            .collect();
        Corpus::new(notes, Vec::new())
    }

    #[test]
    fn colliding_titles_get_distinct_files() {
        let sink = MemorySink::new();
        let mut provider = ObsidianProvider::new(ExportConfig::new("/vault"), &sink);

        let summary = provider.export(&untitled_corpus()).unwrap();
        assert_eq!(summary.notes_exported, 3);
        assert_eq!(summary.files, vec!["Untitled.md", "Untitled-1.md", "Untitled-2.md"]);
        assert_eq!(sink.file_count(), 3);
        assert!(sink.file(Path::new("/vault/Untitled-2.md")).is_some());
    }

    #[test]
    fn by_tag_layout_nests_under_first_tag() {
        let work = Tag::new(Uuid::new_v4(), "work/plans");
        let tagged = Note::new(Uuid::new_v4(), "Roadmap", "").with_tags(&[work.uuid]);
        let loose = Note::new(Uuid::new_v4(), "Loose", "");
        let corpus = Corpus::new(vec![tagged, loose], vec![work]);
        let config = ExportConfig {
            folder_layout: FolderLayout::ByTag,
            ..ExportConfig::new("/vault")
        };
        let sink = MemorySink::new();
        let mut provider = ObsidianProvider::new(config, &sink);

        let summary = provider.export(&corpus).unwrap();
        assert_eq!(summary.files, vec!["work-plans/Roadmap.md", "Loose.md"]);
        assert!(sink.exists(Path::new("/vault/work-plans")));
        assert!(sink.file(Path::new("/vault/work-plans/Roadmap.md")).is_some());
    }

    #[test]
    fn dot_tags_cannot_alias_root_files_or_leave_the_vault() {
        let here = Tag::new(Uuid::new_v4(), ".");
        let parent = Tag::new(Uuid::new_v4(), "..");
        let notes = vec![
            Note::new(Uuid::new_v4(), "Plan", "first body"),
            Note::new(Uuid::new_v4(), "Plan", "second body").with_tags(&[here.uuid]),
            Note::new(Uuid::new_v4(), "Escaped", "").with_tags(&[parent.uuid]),
        ];
        let config = ExportConfig {
            folder_layout: FolderLayout::ByTag,
            ..ExportConfig::new("/vault")
        };
        let sink = MemorySink::new();
        let mut provider = ObsidianProvider::new(config, &sink);

        let summary = provider
            .export(&Corpus::new(notes, vec![here, parent]))
            .unwrap();
        assert_eq!(
            summary.files,
            vec!["Plan.md", "untitled/Plan.md", "untitled/Escaped.md"]
        );
        assert_eq!(sink.file_count(), 3);
        let root_plan = sink.file(Path::new("/vault/Plan.md")).unwrap();
        assert!(root_plan.contains("first body"));
        assert!(sink
            .file_paths()
            .iter()
            .all(|path| path.starts_with("/vault") && !path.starts_with("/vault/..")));
    }

    #[test]
    fn dry_run_renders_without_writing() {
        let sink = MemorySink::new();
        let config = ExportConfig {
            dry_run: true,
            ..ExportConfig::new("/vault")
        };
        let mut provider = ObsidianProvider::new(config, &sink);

        let summary = provider.export(&untitled_corpus()).unwrap();
        assert_eq!(summary.notes_exported, 3);
        assert_eq!(sink.file_count(), 0);
        assert_eq!(sink.dir_count(), 0);
    }

    #[test]
    fn first_write_failure_aborts_export() {
        let notes = vec![
            Note::new(Uuid::new_v4(), "Alpha", ""),
            Note::new(Uuid::new_v4(), "Broken", ""),
            Note::new(Uuid::new_v4(), "Gamma", ""),
        ];
        let sink = MemorySink::new().fail_writes_matching("Broken");
        let mut provider = ObsidianProvider::new(ExportConfig::new("/vault"), &sink);

        let err = provider.export(&Corpus::new(notes, Vec::new())).unwrap_err();
        assert!(matches!(err, ExportError::Io { ref path, .. } if path == Path::new("/vault/Broken.md")));
        assert_eq!(sink.file_paths(), vec![Path::new("/vault/Alpha.md").to_path_buf()]);
    }

    #[test]
    fn missing_output_dir_fails_validation() {
        let sink = MemorySink::new();
        let mut provider = ObsidianProvider::new(ExportConfig::default(), &sink);
        assert!(matches!(provider.validate(), Err(ExportError::MissingOutputDir)));
        assert!(matches!(
            provider.export(&untitled_corpus()),
            Err(ExportError::MissingOutputDir)
        ));
    }

    #[test]
    fn mocs_are_written_at_output_root() {
        let sink = MemorySink::new();
        let mut provider = ObsidianProvider::new(ExportConfig::new("/vault"), &sink);
        let corpus = untitled_corpus();
        provider.export(&corpus).unwrap();

        let plan = provider.generate_mocs(&corpus, &MocConfig::default()).unwrap();
        for moc in &plan.files {
            provider.write_moc(moc).unwrap();
        }
        assert!(sink.file(Path::new("/vault/Home.md")).is_some());
    }

    #[test]
    fn provider_kind_parses_and_creates() {
        assert_eq!("Obsidian".parse::<ProviderKind>(), Ok(ProviderKind::Obsidian));
        assert_eq!(
            "notion".parse::<ProviderKind>(),
            Err(ConfigError::UnknownProvider("notion".to_string()))
        );
        let sink = MemorySink::new();
        let provider = ProviderKind::Obsidian.create(ExportConfig::new("/vault"), &sink);
        assert_eq!(provider.name(), "obsidian");
    }
}
