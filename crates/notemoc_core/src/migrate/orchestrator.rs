//! Linear migration pipeline.

use crate::export::{FileSink, Provider, ProviderKind};
use crate::migrate::config::{MigrationConfig, MigrationError, MigrationResult};
use crate::model::{ContentType, Corpus, TagLookup};
use crate::store::{NoteStore, Session};
use log::{error, info, warn};
use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;

/// Drives one run against a note store and a file sink.
pub struct Migrator<'a> {
    store: &'a dyn NoteStore,
    sink: &'a dyn FileSink,
}

impl<'a> Migrator<'a> {
    pub fn new(store: &'a dyn NoteStore, sink: &'a dyn FileSink) -> Self {
        Self { store, sink }
    }

    /// Executes the full pipeline.
    pub fn run(&self, config: &MigrationConfig) -> Result<MigrationResult, MigrationError> {
        let started_at = Instant::now();
        info!(
            "event=migration_run module=migrate status=start dry_run={} mocs={} tag_filter={}",
            config.dry_run,
            config.generate_mocs,
            config.tag_filter.len()
        );

        match self.run_stages(config, started_at) {
            Ok(result) => {
                info!(
                    "event=migration_run module=migrate status=ok notes={} mocs={} tags={} warnings={} errors={} duration_ms={}",
                    result.notes_exported,
                    result.mocs_created,
                    result.tags_processed,
                    result.warnings.len(),
                    result.errors.len(),
                    result.duration.as_millis()
                );
                Ok(result)
            }
            Err(err) => {
                error!(
                    "event=migration_run module=migrate status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    fn run_stages(
        &self,
        config: &MigrationConfig,
        started_at: Instant,
    ) -> Result<MigrationResult, MigrationError> {
        let (session, provider_kind, output_dir) = self.validate(config)?;

        let items = self.store.get_corpus(session)?;
        let corpus = filter_corpus(Corpus::from_items(items), config);
        if corpus.notes.is_empty() {
            return Err(MigrationError::NoNotesFound);
        }

        let mut provider = provider_kind.create(config.export_config(), self.sink);
        provider.validate()?;
        let summary = provider.export(&corpus)?;

        let mut result = MigrationResult {
            notes_exported: summary.notes_exported,
            output_path: output_dir.to_path_buf(),
            ..MigrationResult::default()
        };
        let (tags_processed, dangling) = count_tags(&corpus);
        result.tags_processed = tags_processed;
        result.errors = dangling;

        if config.generate_mocs {
            self.write_mocs(provider.as_mut(), &corpus, config, &mut result);
        }

        result.duration = started_at.elapsed();
        Ok(result)
    }

    fn validate<'c>(
        &self,
        config: &'c MigrationConfig,
    ) -> Result<(&'c Session, ProviderKind, &'c Path), MigrationError> {
        let session = config.session.as_ref().ok_or(MigrationError::MissingSession)?;
        let provider = config.provider.ok_or(MigrationError::MissingProvider)?;
        let output_dir = config
            .output_dir
            .as_deref()
            .filter(|dir| !dir.as_os_str().is_empty())
            .ok_or(MigrationError::MissingOutputDir)?;
        if config.generate_mocs {
            config.moc.validate()?;
        }
        if !config.dry_run && self.sink.exists(output_dir) {
            return Err(MigrationError::OutputDirExists(output_dir.to_path_buf()));
        }
        Ok((session, provider, output_dir))
    }

    fn write_mocs(
        &self,
        provider: &mut dyn Provider,
        corpus: &Corpus,
        config: &MigrationConfig,
        result: &mut MigrationResult,
    ) {
        let plan = match provider.generate_mocs(corpus, &config.moc) {
            Ok(plan) => plan,
            Err(err) => {
                warn!(
                    "event=moc_write module=migrate status=skip error={}",
                    err
                );
                result.warnings.push(format!("MOC generation failed: {err}"));
                return;
            }
        };

        result.warnings.extend(plan.warnings);
        for moc in &plan.files {
            match provider.write_moc(moc) {
                Ok(()) => result.mocs_created += 1,
                Err(err) => {
                    warn!(
                        "event=moc_write module=migrate status=error order={} error={}",
                        moc.order, err
                    );
                    result
                        .warnings
                        .push(format!("failed to write MOC {}: {err}", moc.filename));
                }
            }
        }
    }
}

/// Applies the trash, content-type and tag filters.
///
/// The tag filter matches resolved tag titles case-insensitively and keeps
/// notes carrying any listed tag. Tags are kept whole for title resolution.
pub fn filter_corpus(corpus: Corpus, config: &MigrationConfig) -> Corpus {
    let Corpus { notes, tags } = corpus;
    let wanted: HashSet<String> = config
        .tag_filter
        .iter()
        .map(|tag| tag.trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect();
    let exports_notes = config.content_type == ContentType::Note;

    let lookup = TagLookup::new(&tags);
    let notes = notes
        .into_iter()
        .filter(|note| !note.trashed)
        .filter(|_| exports_notes)
        .filter(|note| {
            wanted.is_empty()
                || lookup
                    .titles_for(note)
                    .iter()
                    .any(|title| wanted.contains(&title.to_lowercase()))
        })
        .collect();

    Corpus::new(notes, tags)
}

fn count_tags(corpus: &Corpus) -> (usize, Vec<String>) {
    let lookup = corpus.tag_lookup();
    let mut titles = HashSet::new();
    let mut dangling = Vec::new();
    for note in &corpus.notes {
        for tag_id in note.tag_ids() {
            match lookup.title(tag_id) {
                Some(title) => {
                    titles.insert(title);
                }
                None => dangling.push(format!(
                    "note {} references unknown tag {}",
                    note.uuid, tag_id
                )),
            }
        }
    }
    (titles.len(), dangling)
}

#[cfg(test)]
mod tests {
    use super::{filter_corpus, Migrator};
    use crate::export::{MemorySink, ProviderKind};
    use crate::migrate::{MigrationConfig, MigrationError};
    use crate::model::{ContentType, Corpus, Item, Note, Tag};
    use crate::moc::MocStyle;
    use crate::store::{MemoryNoteStore, Session};
    use uuid::Uuid;

    fn config() -> MigrationConfig {
        MigrationConfig::new(Session::new("s1"), ProviderKind::Obsidian, "/vault")
    }

    fn abc_corpus() -> (Corpus, [Uuid; 3]) {
        let work = Tag::new(Uuid::new_v4(), "work");
        let personal = Tag::new(Uuid::new_v4(), "Personal");
        let a = Note::new(Uuid::new_v4(), "A", "").with_tags(&[work.uuid]);
        let b = Note::new(Uuid::new_v4(), "B", "").with_tags(&[personal.uuid]);
        let c = Note::new(Uuid::new_v4(), "C", "").with_tags(&[work.uuid, personal.uuid]);
        let ids = [a.uuid, b.uuid, c.uuid];
        (Corpus::new(vec![a, b, c], vec![work, personal]), ids)
    }

    #[test]
    fn tag_filter_keeps_notes_with_any_listed_tag() {
        let (corpus, [a, _, c]) = abc_corpus();
        let config = MigrationConfig {
            tag_filter: vec!["WORK".to_string()],
            ..config()
        };
        let kept: Vec<Uuid> = filter_corpus(corpus, &config)
            .notes
            .iter()
            .map(|note| note.uuid)
            .collect();
        assert_eq!(kept, vec![a, c]);
    }

    #[test]
    fn trashed_notes_and_tag_content_type_are_excluded() {
        let (mut corpus, [a, _, _]) = abc_corpus();
        corpus.notes[1] = corpus.notes[1].clone().into_trashed();
        let filtered = filter_corpus(corpus.clone(), &config());
        assert_eq!(filtered.notes.len(), 2);
        assert_eq!(filtered.notes[0].uuid, a);

        let tags_only = MigrationConfig {
            content_type: ContentType::Tag,
            ..config()
        };
        assert!(filter_corpus(corpus, &tags_only).notes.is_empty());
    }

    #[test]
    fn validation_precedes_any_io() {
        let store = MemoryNoteStore::failing("must not be called");
        let sink = MemorySink::new();
        let migrator = Migrator::new(&store, &sink);

        let missing_session = MigrationConfig {
            session: None,
            ..config()
        };
        assert!(matches!(
            migrator.run(&missing_session),
            Err(MigrationError::MissingSession)
        ));

        let missing_provider = MigrationConfig {
            provider: None,
            ..config()
        };
        assert!(matches!(
            migrator.run(&missing_provider),
            Err(MigrationError::MissingProvider)
        ));

        let mut bad_depth = MigrationConfig {
            generate_mocs: true,
            ..config()
        };
        bad_depth.moc.max_depth = 0;
        assert!(matches!(
            migrator.run(&bad_depth),
            Err(MigrationError::InvalidConfig(_))
        ));
        assert_eq!(sink.dir_count(), 0);
    }

    #[test]
    fn dangling_tag_references_are_reported() {
        let ghost = Uuid::new_v4();
        let note = Note::new(Uuid::new_v4(), "Orphan", "").with_tags(&[ghost]);
        let store = MemoryNoteStore::new(vec![Item::Note(note)]);
        let sink = MemorySink::new();

        let result = Migrator::new(&store, &sink).run(&config()).unwrap();
        assert_eq!(result.tags_processed, 0);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains(&ghost.to_string()));
    }

    #[test]
    fn style_fallback_warning_reaches_result() {
        let (corpus, _) = abc_corpus();
        let mut items: Vec<Item> = corpus.tags.into_iter().map(Item::Tag).collect();
        items.extend(corpus.notes.into_iter().map(Item::Note));
        let store = MemoryNoteStore::new(items);
        let sink = MemorySink::new();
        let mut config = MigrationConfig {
            generate_mocs: true,
            ..config()
        };
        config.moc.style = MocStyle::Topic;

        let result = Migrator::new(&store, &sink).run(&config).unwrap();
        assert_eq!(result.notes_exported, 3);
        assert_eq!(result.tags_processed, 2);
        assert!(result.mocs_created >= 1);
        assert_eq!(
            result.warnings,
            vec!["MOC style 'topic' is not yet differentiated; using flat layout".to_string()]
        );
    }
}
