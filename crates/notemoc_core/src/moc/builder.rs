//! Maps of Content generation.
//!
//! # Responsibility
//! - Index notes by tag title and select top-level tags.
//! - Render one MOC per selected tag, one per discovered theme, and Home.
//!
//! # Invariants
//! - Home is always the first file of a plan.
//! - MOC names are claimed from the run's filename registry, so they never
//!   collide with exported notes or with each other.
//! - Generation either returns every file or fails without emitting any.

use crate::analysis::{ContentAnalyzer, ContentTheme};
use crate::config::ConfigError;
use crate::export::config::LinkStyle;
use crate::export::filename::{note_file_stem, sanitize_filename, FilenameRegistry};
use crate::export::frontmatter::{Frontmatter, SOURCE_MARKER};
use crate::export::links::render_link;
use crate::export::markdown::{display_title, format_timestamp, inline_tag};
use crate::moc::config::MocConfig;
use crate::moc::icons::{icon_for_tag, is_canonical_category, HOME_ICON, THEME_ICON};
use crate::model::{ItemId, Note, Tag, TagLookup};
use log::{info, warn};
use std::collections::{BTreeMap, HashMap};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Order hint of the Home MOC.
pub const ORDER_HOME: u8 = 0;
/// Order hint of tag MOCs.
pub const ORDER_TAG: u8 = 1;
/// Order hint of theme MOCs.
pub const ORDER_THEME: u8 = 2;

pub const HOME_TITLE: &str = "Home";
const MAX_TOP_LEVEL_TAGS: usize = 10;
const CATEGORY_BONUS: f64 = 0.5;
const MIN_THEME_MOC_NOTES: usize = 2;
const MAX_HOME_THEMES: usize = 10;
const MAX_THEME_PHRASES: usize = 5;

/// MOC generation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MocError {
    InvalidConfig(ConfigError),
    EmptyCorpus,
}

impl Display for MocError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidConfig(err) => write!(f, "invalid MOC configuration: {err}"),
            Self::EmptyCorpus => write!(f, "no notes available for MOC generation"),
        }
    }
}

impl Error for MocError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidConfig(err) => Some(err),
            Self::EmptyCorpus => None,
        }
    }
}

impl From<ConfigError> for MocError {
    fn from(value: ConfigError) -> Self {
        Self::InvalidConfig(value)
    }
}

/// One generated index document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MocFile {
    /// Path relative to the output directory, including `.md`.
    pub filename: String,
    pub title: String,
    /// Fully rendered markdown.
    pub content: String,
    pub tags: Vec<String>,
    /// Presentation hint: Home, then tag MOCs, then theme MOCs.
    pub order: u8,
}

/// Output of one generation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MocPlan {
    pub files: Vec<MocFile>,
    pub warnings: Vec<String>,
}

/// A tag important enough to get its own MOC.
#[derive(Debug, Clone, PartialEq)]
pub struct TopLevelTag {
    pub title: String,
    pub note_count: usize,
    pub score: f64,
}

/// Builds MOCs for one corpus.
pub struct MocBuilder<'a> {
    notes: &'a [Note],
    notes_by_tag: BTreeMap<String, Vec<&'a Note>>,
    config: &'a MocConfig,
    link_style: LinkStyle,
}

impl<'a> MocBuilder<'a> {
    /// Indexes `notes` by the titles of the tags they reference.
    pub fn new(notes: &'a [Note], tags: &'a [Tag], config: &'a MocConfig) -> Self {
        let lookup = TagLookup::new(tags);
        let mut notes_by_tag: BTreeMap<String, Vec<&'a Note>> = BTreeMap::new();
        for tag in tags {
            notes_by_tag.entry(tag.title.clone()).or_default();
        }
        for note in notes {
            for title in lookup.titles_for(note) {
                notes_by_tag.entry(title).or_default().push(note);
            }
        }

        Self {
            notes,
            notes_by_tag,
            config,
            link_style: LinkStyle::default(),
        }
    }

    pub fn with_link_style(mut self, link_style: LinkStyle) -> Self {
        self.link_style = link_style;
        self
    }

    /// Number of distinct tag titles carried by at least one note.
    pub fn tag_count(&self) -> usize {
        self.notes_by_tag.values().filter(|notes| !notes.is_empty()).count()
    }

    /// Number of notes carrying the tag titled `tag`.
    pub fn note_count(&self, tag: &str) -> usize {
        self.notes_by_tag.get(tag).map_or(0, Vec::len)
    }

    /// Scores tags by frequency plus canonical-category bonus.
    ///
    /// Tags under `min_notes_per_moc` are excluded; the rest are ordered by
    /// score, then note count, then title, and capped at ten.
    pub fn select_top_level_tags(&self) -> Vec<TopLevelTag> {
        let total = self.notes.len().max(1) as f64;
        let mut selected: Vec<TopLevelTag> = self
            .notes_by_tag
            .iter()
            .filter(|(_, notes)| !notes.is_empty() && notes.len() >= self.config.min_notes_per_moc)
            .map(|(title, notes)| {
                let mut score = notes.len() as f64 / total;
                if is_canonical_category(title) {
                    score += CATEGORY_BONUS;
                }
                TopLevelTag {
                    title: title.clone(),
                    note_count: notes.len(),
                    score,
                }
            })
            .collect();

        selected.sort_by(|left, right| {
            right
                .score
                .total_cmp(&left.score)
                .then_with(|| right.note_count.cmp(&left.note_count))
                .then_with(|| left.title.cmp(&right.title))
        });
        selected.truncate(MAX_TOP_LEVEL_TAGS);
        selected
    }

    /// Generates every MOC, claiming file names from `names`.
    ///
    /// Styles without their own layout fall back to flat and say so in
    /// [`MocPlan::warnings`].
    pub fn generate(&self, names: &mut FilenameRegistry) -> Result<MocPlan, MocError> {
        let started_at = Instant::now();
        if self.notes.is_empty() {
            return Err(MocError::EmptyCorpus);
        }
        self.config.validate()?;

        let mut warnings = Vec::new();
        let style = self.config.style;
        if !style.is_differentiated() {
            warn!(
                "event=moc_generate module=moc status=fallback style={} layout=flat",
                style
            );
            warnings.push(format!(
                "MOC style '{style}' is not yet differentiated; using flat layout"
            ));
        }

        let files = self.generate_flat(names);
        info!(
            "event=moc_generate module=moc status=ok style={} files={} duration_ms={}",
            style,
            files.len(),
            started_at.elapsed().as_millis()
        );
        Ok(MocPlan { files, warnings })
    }

    fn generate_flat(&self, names: &mut FilenameRegistry) -> Vec<MocFile> {
        let themes: Vec<ContentTheme> = ContentAnalyzer::new(self.config.analyzer.clone())
            .analyze(self.notes)
            .into_iter()
            .filter(|theme| theme.note_count >= MIN_THEME_MOC_NOTES)
            .collect();
        let top_tags = self.select_top_level_tags();

        let home_path = names.claim(None, HOME_TITLE);
        let tag_paths: Vec<String> = top_tags
            .iter()
            .map(|tag| names.claim(None, &moc_stem(&tag.title)))
            .collect();
        let theme_paths: Vec<String> = themes
            .iter()
            .map(|theme| names.claim(None, &moc_stem(&theme.name)))
            .collect();

        let names: &FilenameRegistry = names;
        let mut files = Vec::with_capacity(1 + top_tags.len() + themes.len());
        for (tag, path) in top_tags.iter().zip(&tag_paths) {
            files.push(self.render_tag_moc(tag, path, &home_path, names));
        }
        for (theme, path) in themes.iter().zip(&theme_paths) {
            files.push(self.render_theme_moc(theme, path, &home_path, names));
        }

        let home = self.render_home(&home_path, &top_tags, &tag_paths, &themes, &theme_paths, names);
        files.insert(0, home);
        files
    }

    fn render_tag_moc(
        &self,
        tag: &TopLevelTag,
        path: &str,
        home_path: &str,
        names: &FilenameRegistry,
    ) -> MocFile {
        let title = format!("{} MOC", tag.title);
        let tags = vec!["moc".to_string(), tag.title.clone()];
        let mut notes = self
            .notes_by_tag
            .get(&tag.title)
            .cloned()
            .unwrap_or_default();
        sort_by_title(&mut notes);

        let mut content = moc_frontmatter(&title, &tags);
        content.push_str(&format!("\n# {} {}\n\n", icon_for_tag(&tag.title), tag.title));
        content.push_str(&format!(
            "Notes tagged {} ({}).\n\n## Notes\n\n",
            inline_tag(&tag.title),
            count_label(tag.note_count)
        ));
        for note in notes {
            content.push_str(&format!("- {}\n", self.note_link(note, names)));
        }
        content.push_str(&self.back_link(home_path));

        MocFile {
            filename: format!("{path}.md"),
            title,
            content,
            tags,
            order: ORDER_TAG,
        }
    }

    fn render_theme_moc(
        &self,
        theme: &ContentTheme,
        path: &str,
        home_path: &str,
        names: &FilenameRegistry,
    ) -> MocFile {
        let title = format!("{} MOC", theme.name);
        let tags = vec!["moc".to_string(), "theme".to_string()];
        let by_id: HashMap<ItemId, &Note> = self.notes.iter().map(|note| (note.uuid, note)).collect();

        let mut content = moc_frontmatter(&title, &tags);
        content.push_str(&format!("\n# {THEME_ICON} {}\n\n", theme.name));
        content.push_str(&format!(
            "Theme discovered across {}.\n\nKeywords: {}\n",
            count_label(theme.note_count),
            theme.keywords.join(", ")
        ));

        if !theme.phrases.is_empty() {
            content.push_str("\n## Key phrases\n\n");
            for phrase in theme.phrases.iter().take(MAX_THEME_PHRASES) {
                content.push_str(&format!("- {phrase}\n"));
            }
        }

        content.push_str("\n## Notes\n\n");
        for note in theme.related_notes.iter().filter_map(|id| by_id.get(id)) {
            content.push_str(&format!("- {}\n", self.note_link(note, names)));
        }
        content.push_str(&self.back_link(home_path));

        MocFile {
            filename: format!("{path}.md"),
            title,
            content,
            tags,
            order: ORDER_THEME,
        }
    }

    fn render_home(
        &self,
        path: &str,
        top_tags: &[TopLevelTag],
        tag_paths: &[String],
        themes: &[ContentTheme],
        theme_paths: &[String],
        names: &FilenameRegistry,
    ) -> MocFile {
        let tags = vec!["moc".to_string(), "home".to_string()];
        let mut content = moc_frontmatter(HOME_TITLE, &tags);
        content.push_str(&format!("\n# {HOME_ICON} {HOME_TITLE}\n\n"));
        content.push_str(&format!("Map of content for {}.\n", count_label(self.notes.len())));

        if !top_tags.is_empty() {
            content.push_str("\n## Categories\n\n");
            for (tag, target) in top_tags.iter().zip(tag_paths) {
                content.push_str(&format!(
                    "- {} {} ({})\n",
                    icon_for_tag(&tag.title),
                    render_link(self.link_style, target, &tag.title),
                    count_label(tag.note_count)
                ));
            }
        }

        if !themes.is_empty() {
            content.push_str("\n## Content themes\n\n");
            for (theme, target) in themes.iter().zip(theme_paths).take(MAX_HOME_THEMES) {
                content.push_str(&format!(
                    "- {} ({})\n",
                    render_link(self.link_style, target, &theme.name),
                    count_label(theme.note_count)
                ));
            }
        }

        if self.config.include_stats {
            content.push_str("\n## Statistics\n\n");
            content.push_str(&format!("- Notes: {}\n", self.notes.len()));
            content.push_str(&format!("- Tags: {}\n", self.tag_count()));
            content.push_str(&format!("- Category MOCs: {}\n", top_tags.len()));
            content.push_str(&format!("- Theme MOCs: {}\n", themes.len()));
        }

        if self.config.include_recent && self.config.recent_count > 0 {
            let mut recent: Vec<&Note> = self.notes.iter().collect();
            recent.sort_by(|left, right| {
                right
                    .updated_at
                    .cmp(&left.updated_at)
                    .then_with(|| left.uuid.cmp(&right.uuid))
            });
            content.push_str("\n## Recently updated\n\n");
            for note in recent.into_iter().take(self.config.recent_count) {
                content.push_str(&format!(
                    "- {} ({})\n",
                    self.note_link(note, names),
                    &format_timestamp(&note.updated_at)[..10]
                ));
            }
        }

        MocFile {
            filename: format!("{path}.md"),
            title: HOME_TITLE.to_string(),
            content,
            tags,
            order: ORDER_HOME,
        }
    }

    fn note_link(&self, note: &Note, names: &FilenameRegistry) -> String {
        let target = names
            .path_for(note.uuid)
            .map_or_else(|| note_file_stem(note), str::to_string);
        render_link(self.link_style, &target, display_title(note))
    }

    fn back_link(&self, home_path: &str) -> String {
        format!(
            "\nBack to {}\n",
            render_link(self.link_style, home_path, HOME_TITLE)
        )
    }
}

fn moc_stem(name: &str) -> String {
    sanitize_filename(&format!("{name} MOC"))
}

fn moc_frontmatter(title: &str, tags: &[String]) -> String {
    Frontmatter::new()
        .quoted("title", title)
        .list("tags", tags)
        .plain("type", "moc")
        .plain("source", SOURCE_MARKER)
        .render()
}

fn sort_by_title(notes: &mut [&Note]) {
    notes.sort_by(|left, right| {
        display_title(left)
            .to_lowercase()
            .cmp(&display_title(right).to_lowercase())
            .then_with(|| left.uuid.cmp(&right.uuid))
    });
}

fn count_label(count: usize) -> String {
    if count == 1 {
        "1 note".to_string()
    } else {
        format!("{count} notes")
    }
}

#[cfg(test)]
mod tests {
    use super::{MocBuilder, MocError, ORDER_HOME, ORDER_TAG, ORDER_THEME};
    use crate::analysis::AnalyzerConfig;
    use crate::config::ConfigError;
    use crate::export::config::LinkStyle;
    use crate::export::filename::{note_file_stem, FilenameRegistry};
    use crate::moc::config::{MocConfig, MocStyle};
    use crate::model::{Note, Tag};
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn tagged(title: &str, body: &str, tag: &Tag) -> Note {
        Note::new(Uuid::new_v4(), title, body).with_tags(&[tag.uuid])
    }

    fn scenario() -> (Vec<Note>, Vec<Tag>) {
        let work = Tag::new(Uuid::new_v4(), "work");
        let personal = Tag::new(Uuid::new_v4(), "personal");
        let rare = Tag::new(Uuid::new_v4(), "rarely-used");
        let mut notes = Vec::new();
        for idx in 0..10 {
            notes.push(tagged(&format!("Work item {idx}"), "quarterly planning", &work));
        }
        for idx in 0..5 {
            notes.push(tagged(&format!("Journal {idx}"), "evening reflection", &personal));
        }
        notes.push(tagged("Odd one", "misc", &rare));
        (notes, vec![work, personal, rare])
    }

    #[test]
    fn top_level_selection_applies_threshold_and_bonus() {
        let (notes, tags) = scenario();
        let config = MocConfig {
            min_notes_per_moc: 3,
            ..MocConfig::default()
        };
        let builder = MocBuilder::new(&notes, &tags, &config);

        let selected = builder.select_top_level_tags();
        let titles: Vec<_> = selected.iter().map(|tag| tag.title.as_str()).collect();
        assert_eq!(titles, vec!["work", "personal"]);
        assert_eq!(selected[0].note_count, 10);
        assert!((selected[0].score - (10.0 / 16.0 + 0.5)).abs() < 1e-9);
        assert_eq!(builder.note_count("rarely-used"), 1);
    }

    #[test]
    fn non_canonical_frequent_tag_can_trail_canonical_one() {
        let recipes = Tag::new(Uuid::new_v4(), "recipes");
        let ideas = Tag::new(Uuid::new_v4(), "ideas");
        let mut notes: Vec<Note> = (0..5)
            .map(|idx| tagged(&format!("R{idx}"), "", &recipes))
            .collect();
        notes.extend((0..2).map(|idx| tagged(&format!("I{idx}"), "", &ideas)));
        let tags = vec![recipes, ideas];
        let config = MocConfig::default();

        let selected = MocBuilder::new(&notes, &tags, &config).select_top_level_tags();
        assert_eq!(selected[0].title, "ideas");
        assert_eq!(selected[1].title, "recipes");
    }

    #[test]
    fn generate_puts_home_first_followed_by_tag_mocs() {
        let (notes, tags) = scenario();
        let config = MocConfig {
            min_notes_per_moc: 3,
            ..MocConfig::default()
        };
        let mut names = FilenameRegistry::new();
        let plan = MocBuilder::new(&notes, &tags, &config)
            .generate(&mut names)
            .expect("generation should succeed");

        assert!(plan.warnings.is_empty());
        assert_eq!(plan.files[0].filename, "Home.md");
        assert_eq!(plan.files[0].order, ORDER_HOME);
        assert_eq!(plan.files[1].filename, "work MOC.md");
        assert_eq!(plan.files[1].order, ORDER_TAG);
        assert_eq!(plan.files[2].filename, "personal MOC.md");
        assert!(plan.files.iter().all(|file| file.filename != "rarely-used MOC.md"));

        let home = &plan.files[0].content;
        assert!(home.contains("[[work MOC|work]] (10 notes)"));
        assert!(home.contains("- Notes: 16\n"));
        assert!(home.contains("- Tags: 3\n"));
        assert!(home.contains("## Recently updated"));

        let work = &plan.files[1].content;
        assert!(work.contains("[[Work item 0]]"));
        assert!(work.contains("[[Work item 9]]"));
        assert!(work.contains("Back to [[Home]]"));
    }

    #[test]
    fn generate_emits_theme_mocs_with_phrases() {
        let notes = vec![
            Note::new(Uuid::new_v4(), "Rust ownership", "borrowing rules"),
            Note::new(Uuid::new_v4(), "Rust ownership", "lifetimes explained"),
            Note::new(Uuid::new_v4(), "Gardening tomatoes", "watering schedule"),
            Note::new(Uuid::new_v4(), "Gardening roses", "pruning schedule"),
        ];
        let config = MocConfig {
            analyzer: AnalyzerConfig {
                min_global_score: 0.5,
                ..AnalyzerConfig::default()
            },
            ..MocConfig::default()
        };
        let mut names = FilenameRegistry::new();
        let plan = MocBuilder::new(&notes, &[], &config)
            .generate(&mut names)
            .unwrap();

        let themes: Vec<_> = plan
            .files
            .iter()
            .filter(|file| file.order == ORDER_THEME)
            .map(|file| file.title.as_str())
            .collect();
        assert_eq!(themes, vec!["Gardening MOC", "Ownership MOC", "Rust MOC"]);

        let rust = plan
            .files
            .iter()
            .find(|file| file.title == "Rust MOC")
            .unwrap();
        assert!(rust.content.contains("## Key phrases\n\n- rust ownership\n"));
        assert!(plan.files[0].content.contains("## Content themes"));
    }

    #[test]
    fn links_follow_registry_assignments_and_style() {
        let work = Tag::new(Uuid::new_v4(), "work");
        let notes = vec![tagged("Plan", "", &work), tagged("Plan", "", &work)];
        let tags = vec![work];
        let mut names = FilenameRegistry::new();
        names.assign(notes[0].uuid, None, "Plan");
        names.assign(notes[1].uuid, None, "Plan");
        let config = MocConfig::default();

        let plan = MocBuilder::new(&notes, &tags, &config)
            .with_link_style(LinkStyle::Markdown)
            .generate(&mut names)
            .unwrap();
        let work_moc = &plan.files[1].content;
        assert!(work_moc.contains("[Plan](Plan.md)"));
        assert!(work_moc.contains("[Plan](Plan-1.md)"));
    }

    #[test]
    fn home_counts_only_tags_carried_by_notes() {
        let work = Tag::new(Uuid::new_v4(), "work");
        let unused = Tag::new(Uuid::new_v4(), "archive");
        let notes = vec![tagged("Plan", "", &work)];
        let tags = vec![work, unused];
        let config = MocConfig::default();

        let builder = MocBuilder::new(&notes, &tags, &config);
        assert_eq!(builder.tag_count(), 1);
        let plan = builder.generate(&mut FilenameRegistry::new()).unwrap();
        assert!(plan.files[0].content.contains("- Tags: 1\n"));
    }

    #[test]
    fn link_breaking_titles_render_usable_links() {
        let work = Tag::new(Uuid::new_v4(), "work");
        let notes = vec![tagged("A|B", "", &work), tagged("C]]D", "", &work)];
        let tags = vec![work];
        let mut names = FilenameRegistry::new();
        for note in &notes {
            names.assign(note.uuid, None, &note_file_stem(note));
        }
        let config = MocConfig::default();

        let plan = MocBuilder::new(&notes, &tags, &config)
            .generate(&mut names)
            .unwrap();
        let work_moc = &plan.files[1].content;
        assert!(work_moc.contains("- [[A-B]]\n"));
        assert!(work_moc.contains("- [C\\]\\]D](C%5D%5DD.md)\n"));
        assert!(!work_moc.contains("[[C]]D]]"));
    }

    #[test]
    fn note_titled_home_keeps_its_name() {
        let notes = vec![Note::new(Uuid::new_v4(), "Home", "")];
        let mut names = FilenameRegistry::new();
        names.assign(notes[0].uuid, None, "Home");
        let config = MocConfig::default();

        let plan = MocBuilder::new(&notes, &[], &config)
            .generate(&mut names)
            .unwrap();
        assert_eq!(plan.files[0].filename, "Home-1.md");
    }

    #[test]
    fn undifferentiated_styles_fall_back_with_warning() {
        let (notes, tags) = scenario();
        let config = MocConfig {
            style: MocStyle::Para,
            ..MocConfig::default()
        };
        let plan = MocBuilder::new(&notes, &tags, &config)
            .generate(&mut FilenameRegistry::new())
            .unwrap();
        assert_eq!(
            plan.warnings,
            vec!["MOC style 'para' is not yet differentiated; using flat layout".to_string()]
        );
        assert_eq!(plan.files[0].title, "Home");
    }

    #[test]
    fn recent_section_lists_latest_updates_first() {
        let older = Utc.with_ymd_and_hms(2023, 5, 1, 0, 0, 0).unwrap();
        let newer = Utc.with_ymd_and_hms(2024, 6, 2, 0, 0, 0).unwrap();
        let notes = vec![
            Note::new(Uuid::new_v4(), "Old", "").with_timestamps(older, older),
            Note::new(Uuid::new_v4(), "New", "").with_timestamps(older, newer),
        ];
        let config = MocConfig {
            recent_count: 1,
            include_stats: false,
            ..MocConfig::default()
        };
        let plan = MocBuilder::new(&notes, &[], &config)
            .generate(&mut FilenameRegistry::new())
            .unwrap();
        let home = &plan.files[0].content;
        assert!(home.contains("## Recently updated\n\n- [[New]] (2024-06-02)\n"));
        assert!(!home.contains("[[Old]]"));
        assert!(!home.contains("## Statistics"));
    }

    #[test]
    fn rejects_empty_corpus_and_invalid_depth() {
        let config = MocConfig::default();
        let err = MocBuilder::new(&[], &[], &config)
            .generate(&mut FilenameRegistry::new())
            .unwrap_err();
        assert_eq!(err, MocError::EmptyCorpus);

        let notes = vec![Note::new(Uuid::new_v4(), "One", "")];
        let config = MocConfig {
            max_depth: 42,
            ..MocConfig::default()
        };
        let err = MocBuilder::new(&notes, &[], &config)
            .generate(&mut FilenameRegistry::new())
            .unwrap_err();
        assert_eq!(err, MocError::InvalidConfig(ConfigError::MaxDepthOutOfRange(42)));
    }
}
