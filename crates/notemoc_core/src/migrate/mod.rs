//! Migration orchestration.
//!
//! # Responsibility
//! - Run validate, fetch, filter, export and MOC stages in a fixed order.
//! - Collect counts, warnings and data errors into one result.
//!
//! # Invariants
//! - Configuration errors fail the run before any I/O.
//! - MOC-stage failures never discard exported notes.
//! - Dry runs report the same counts as real runs.

pub mod config;
pub mod orchestrator;

pub use config::{MigrationConfig, MigrationError, MigrationResult};
pub use orchestrator::{filter_corpus, Migrator};
