//! Text extraction, tokenization and stop-word filtering.
//!
//! # Responsibility
//! - Build the weighted analysis text of a note.
//! - Split text into lowercase Unicode letter/digit tokens.
//! - Derive bigram and trigram phrases from token runs.
//!
//! # Invariants
//! - Tokens are never empty.
//! - Output depends only on the input text.

use crate::model::Note;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Number of times a title is repeated ahead of the body.
pub const TITLE_WEIGHT: usize = 3;
const MIN_KEYWORD_CHARS: usize = 3;
const MIN_BIGRAM_CHARS: usize = 6;
const MIN_TRIGRAM_CHARS: usize = 9;

static MARKDOWN_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]*)\]\([^)]*\)").expect("valid link regex"));

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and",
        "any", "are", "aren", "around", "as", "at", "be", "because", "been", "before", "being",
        "below", "between", "both", "but", "by", "can", "cannot", "could", "couldn", "did",
        "didn", "do", "does", "doesn", "doing", "don", "done", "down", "during", "each", "either",
        "else", "etc", "even", "ever", "every", "few", "for", "from", "further", "get", "gets",
        "getting", "got", "had", "hadn", "has", "hasn", "have", "haven", "having", "he", "her",
        "here", "hers", "herself", "him", "himself", "his", "how", "however", "i", "if", "in",
        "into", "is", "isn", "it", "its", "itself", "just", "least", "less", "let", "like",
        "made", "make", "makes", "many", "may", "me", "might", "more", "most", "much", "must",
        "my", "myself", "need", "needs", "neither", "never", "no", "nor", "not", "now", "of",
        "off", "often", "on", "once", "one", "only", "or", "other", "others", "our", "ours",
        "ourselves", "out", "over", "own", "per", "quite", "rather", "really", "same", "see",
        "shall", "she", "should", "shouldn", "since", "so", "some", "still", "such", "than",
        "that", "the", "their", "theirs", "them", "themselves", "then", "there", "these",
        "they", "thing", "things", "this", "those", "though", "through", "thus", "to", "too",
        "under", "until", "up", "upon", "us", "use", "used", "using", "very", "via", "was",
        "wasn", "way", "we", "well", "were", "weren", "what", "when", "where", "whether",
        "which", "while", "who", "whom", "whose", "why", "will", "with", "within", "without",
        "won", "would", "wouldn", "yes", "yet", "you", "your", "yours", "yourself",
        "yourselves",
    ]
    .into_iter()
    .collect()
});

/// Builds the lowercase analysis text of one note.
///
/// The title is repeated [`TITLE_WEIGHT`] times ahead of the body.
pub fn extract_text(note: &Note) -> String {
    let mut text = String::with_capacity((note.title.len() + 1) * TITLE_WEIGHT + note.text.len());
    for _ in 0..TITLE_WEIGHT {
        text.push_str(&note.title);
        text.push(' ');
    }
    text.push_str(&note.text);
    text.to_lowercase()
}

/// Splits text into lowercase tokens.
///
/// Rules:
/// - `[text](url)` keeps only `text`.
/// - Emphasis markers (`*`, `_`, `~`, backtick) are removed.
/// - Any character that is not a Unicode letter or digit separates tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    let without_links = MARKDOWN_LINK_RE.replace_all(text, "$1");
    let without_emphasis: String = without_links
        .chars()
        .filter(|c| !matches!(c, '*' | '_' | '~' | '`'))
        .collect();

    without_emphasis
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Returns whether `token` is a common function word.
pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(token)
}

/// Returns whether `token` qualifies as a keyword.
pub fn is_keyword(token: &str) -> bool {
    token.chars().count() >= MIN_KEYWORD_CHARS && !is_stop_word(token)
}

/// Forms qualifying bigrams and trigrams from consecutive tokens.
///
/// A phrase never starts with a stop word. Bigrams need more than five
/// characters, trigrams more than eight, counted with separating spaces.
pub fn phrases(tokens: &[String]) -> Vec<String> {
    let mut found = Vec::new();
    for (idx, head) in tokens.iter().enumerate() {
        if is_stop_word(head) {
            continue;
        }

        if let Some(second) = tokens.get(idx + 1) {
            let bigram = format!("{head} {second}");
            if bigram.chars().count() >= MIN_BIGRAM_CHARS {
                found.push(bigram);
            }

            if let Some(third) = tokens.get(idx + 2) {
                let trigram = format!("{head} {second} {third}");
                if trigram.chars().count() >= MIN_TRIGRAM_CHARS {
                    found.push(trigram);
                }
            }
        }
    }
    found
}
