//! TF-IDF theme discovery.
//!
//! # Responsibility
//! - Count keyword and phrase document frequencies across notes.
//! - Score per-note terms with TF-IDF and aggregate global significance.
//! - Cluster notes into named themes and rank them.
//!
//! # Invariants
//! - A term counts at most once per note towards document frequency.
//! - Every returned theme has `note_count >= min_theme_notes`.
//! - At most `max_themes` themes are returned.
//! - Ordering is deterministic: ties break on term/name ascending.

use crate::analysis::tokenize::{extract_text, is_keyword, phrases, tokenize};
use crate::model::{ItemId, Note};
use log::debug;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::time::Instant;

/// Tunable thresholds for theme discovery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Terms seen in fewer notes are ignored.
    pub min_document_frequency: usize,
    /// Themes with fewer notes are dropped.
    pub min_theme_notes: usize,
    /// Keywords below this global score never name a theme.
    pub min_global_score: f64,
    pub max_themes: usize,
    pub top_keywords_per_note: usize,
    pub top_phrases_per_note: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            min_document_frequency: 2,
            min_theme_notes: 2,
            min_global_score: 1.0,
            max_themes: 20,
            top_keywords_per_note: 5,
            top_phrases_per_note: 3,
        }
    }
}

/// A discovered topical cluster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentTheme {
    /// Title-cased keyword naming the theme.
    pub name: String,
    pub keywords: Vec<String>,
    /// Phrases ordered by global score, strongest first.
    pub phrases: Vec<String>,
    pub note_count: usize,
    /// Global score of the naming keyword. Used for ranking only.
    pub relevance: f64,
    pub related_notes: Vec<ItemId>,
}

/// Tokens and candidate terms of one note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteTerms {
    pub note_id: ItemId,
    pub tokens: Vec<String>,
    /// Qualifying keyword occurrences, repeats included.
    pub keywords: Vec<String>,
    /// Qualifying phrase occurrences, repeats included.
    pub phrases: Vec<String>,
}

impl NoteTerms {
    pub fn extract(note: &Note) -> Self {
        let tokens = tokenize(&extract_text(note));
        let keywords = tokens
            .iter()
            .filter(|token| is_keyword(token))
            .cloned()
            .collect();
        let phrases = phrases(&tokens);
        Self {
            note_id: note.uuid,
            tokens,
            keywords,
            phrases,
        }
    }
}

/// Per-term document frequency tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentFrequencies {
    total_notes: usize,
    keywords: HashMap<String, usize>,
    phrases: HashMap<String, usize>,
}

impl DocumentFrequencies {
    pub fn from_terms(terms: &[NoteTerms]) -> Self {
        let mut frequencies = Self {
            total_notes: terms.len(),
            ..Self::default()
        };
        for note in terms {
            let distinct_keywords: HashSet<&str> =
                note.keywords.iter().map(String::as_str).collect();
            for keyword in distinct_keywords {
                *frequencies.keywords.entry(keyword.to_string()).or_default() += 1;
            }

            let distinct_phrases: HashSet<&str> = note.phrases.iter().map(String::as_str).collect();
            for phrase in distinct_phrases {
                *frequencies.phrases.entry(phrase.to_string()).or_default() += 1;
            }
        }
        frequencies
    }

    pub fn total_notes(&self) -> usize {
        self.total_notes
    }

    pub fn keyword(&self, keyword: &str) -> usize {
        self.keywords.get(keyword).copied().unwrap_or(0)
    }

    pub fn phrase(&self, phrase: &str) -> usize {
        self.phrases.get(phrase).copied().unwrap_or(0)
    }

    pub fn keyword_count(&self) -> usize {
        self.keywords.len()
    }

    pub fn phrase_count(&self) -> usize {
        self.phrases.len()
    }

    fn idf(&self, document_frequency: usize) -> f64 {
        (self.total_notes as f64 / document_frequency as f64).ln()
    }
}

#[derive(Debug, Clone)]
struct TopTerms {
    note_id: ItemId,
    keywords: Vec<(String, f64)>,
    phrases: Vec<(String, f64)>,
}

#[derive(Debug)]
struct ThemeDraft {
    keywords: Vec<String>,
    phrases: Vec<String>,
    related_notes: Vec<ItemId>,
    relevance: f64,
}

/// Discovers themes from note content.
#[derive(Debug, Clone, Default)]
pub struct ContentAnalyzer {
    config: AnalyzerConfig,
}

impl ContentAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    /// Returns ranked themes for `notes`.
    ///
    /// An empty corpus, or one without eligible terms, yields no themes.
    pub fn analyze(&self, notes: &[Note]) -> Vec<ContentTheme> {
        let started_at = Instant::now();
        if notes.is_empty() {
            return Vec::new();
        }

        let terms: Vec<NoteTerms> = notes.iter().map(NoteTerms::extract).collect();
        let frequencies = DocumentFrequencies::from_terms(&terms);
        let top_terms: Vec<TopTerms> = terms
            .iter()
            .map(|note| self.top_terms(note, &frequencies))
            .collect();

        // Global scores must be complete before any theme is drafted.
        let mut keyword_scores: HashMap<&str, f64> = HashMap::new();
        let mut phrase_scores: HashMap<&str, f64> = HashMap::new();
        for top in &top_terms {
            for (keyword, score) in &top.keywords {
                *keyword_scores.entry(keyword.as_str()).or_default() += score;
            }
            for (phrase, score) in &top.phrases {
                *phrase_scores.entry(phrase.as_str()).or_default() += score;
            }
        }

        let mut drafts: BTreeMap<String, ThemeDraft> = BTreeMap::new();
        for top in &top_terms {
            let mut assigned = Vec::new();
            for (keyword, _) in &top.keywords {
                let global = keyword_scores.get(keyword.as_str()).copied().unwrap_or(0.0);
                if global < self.config.min_global_score {
                    continue;
                }

                let name = title_case(keyword);
                let draft = drafts.entry(name.clone()).or_insert_with(|| ThemeDraft {
                    keywords: Vec::new(),
                    phrases: Vec::new(),
                    related_notes: Vec::new(),
                    relevance: global,
                });
                push_unique(&mut draft.keywords, keyword);
                if !draft.related_notes.contains(&top.note_id) {
                    draft.related_notes.push(top.note_id);
                }
                assigned.push(name);
            }

            for name in assigned {
                if let Some(draft) = drafts.get_mut(&name) {
                    for (phrase, _) in &top.phrases {
                        push_unique(&mut draft.phrases, phrase);
                    }
                }
            }
        }

        let mut themes: Vec<ContentTheme> = drafts
            .into_iter()
            .filter(|(_, draft)| draft.related_notes.len() >= self.config.min_theme_notes)
            .map(|(name, mut draft)| {
                draft.phrases.sort_by(|left, right| {
                    let left_score = phrase_scores.get(left.as_str()).copied().unwrap_or(0.0);
                    let right_score = phrase_scores.get(right.as_str()).copied().unwrap_or(0.0);
                    right_score.total_cmp(&left_score).then_with(|| left.cmp(right))
                });
                ContentTheme {
                    name,
                    keywords: draft.keywords,
                    phrases: draft.phrases,
                    note_count: draft.related_notes.len(),
                    relevance: draft.relevance,
                    related_notes: draft.related_notes,
                }
            })
            .collect();

        themes.sort_by(|left, right| {
            right
                .relevance
                .total_cmp(&left.relevance)
                .then_with(|| left.name.cmp(&right.name))
        });
        themes.truncate(self.config.max_themes);

        debug!(
            "event=content_analyze module=analysis status=ok notes={} keywords={} phrases={} themes={} duration_ms={}",
            notes.len(),
            frequencies.keyword_count(),
            frequencies.phrase_count(),
            themes.len(),
            started_at.elapsed().as_millis()
        );
        themes
    }

    fn top_terms(&self, note: &NoteTerms, frequencies: &DocumentFrequencies) -> TopTerms {
        let total_tokens = note.tokens.len();
        let keywords = self.score_terms(
            &note.keywords,
            total_tokens,
            |term| frequencies.keyword(term),
            frequencies,
            self.config.top_keywords_per_note,
        );
        let phrases = self.score_terms(
            &note.phrases,
            total_tokens,
            |term| frequencies.phrase(term),
            frequencies,
            self.config.top_phrases_per_note,
        );
        TopTerms {
            note_id: note.note_id,
            keywords,
            phrases,
        }
    }

    fn score_terms(
        &self,
        occurrences: &[String],
        total_tokens: usize,
        document_frequency: impl Fn(&str) -> usize,
        frequencies: &DocumentFrequencies,
        keep: usize,
    ) -> Vec<(String, f64)> {
        if total_tokens == 0 {
            return Vec::new();
        }

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for term in occurrences {
            *counts.entry(term.as_str()).or_default() += 1;
        }

        let mut scored: Vec<(String, f64)> = counts
            .into_iter()
            .filter_map(|(term, count)| {
                let df = document_frequency(term);
                if df < self.config.min_document_frequency.max(1) {
                    return None;
                }
                let tf = count as f64 / total_tokens as f64;
                Some((term.to_string(), tf * frequencies.idf(df)))
            })
            .collect();

        scored.sort_by(|left, right| match right.1.total_cmp(&left.1) {
            Ordering::Equal => left.0.cmp(&right.0),
            other => other,
        });
        scored.truncate(keep);
        scored
    }
}

fn push_unique(values: &mut Vec<String>, value: &str) {
    if !values.iter().any(|existing| existing == value) {
        values.push(value.to_string());
    }
}

/// Upper-cases the first letter of every whitespace-separated word.
pub(crate) fn title_case(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
