//! Maps of Content (MOC) generation.
//!
//! # Responsibility
//! - Select top-level tags and discovered themes worth an index page.
//! - Render Home, tag and theme MOCs as markdown.
//!
//! # Invariants
//! - MOC names share the export run's filename registry.

pub mod builder;
pub mod config;
pub mod icons;

pub use builder::{
    MocBuilder, MocError, MocFile, MocPlan, TopLevelTag, HOME_TITLE, ORDER_HOME, ORDER_TAG,
    ORDER_THEME,
};
pub use config::{MocConfig, MocStyle, MAX_MAX_DEPTH, MIN_MAX_DEPTH};
