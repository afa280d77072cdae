//! Content analysis over the note corpus.
//!
//! # Responsibility
//! - Turn raw note text into tokens, keywords and phrases.
//! - Discover recurring themes via document frequency and TF-IDF.
//!
//! # Invariants
//! - Analysis is a pure function of its input notes.
//! - Stop words never become keywords or phrase heads.

pub mod themes;
pub mod tokenize;

pub use themes::{AnalyzerConfig, ContentAnalyzer, ContentTheme, DocumentFrequencies, NoteTerms};
pub use tokenize::{extract_text, is_keyword, is_stop_word, phrases, tokenize};
