//! Per-run rendering configuration.

use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// How cross references are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStyle {
    /// `[[target]]` or `[[target|Title]]`.
    #[default]
    Wikilink,
    /// `[Title](target.md)`.
    Markdown,
    /// `[Title](./target.md)`.
    Relative,
}

impl FromStr for LinkStyle {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "wikilink" => Ok(Self::Wikilink),
            "markdown" => Ok(Self::Markdown),
            "relative" => Ok(Self::Relative),
            other => Err(ConfigError::UnknownLinkStyle(other.to_string())),
        }
    }
}

/// Where note tags are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagStyle {
    #[default]
    Frontmatter,
    Inline,
    Both,
}

impl TagStyle {
    pub fn includes_frontmatter(self) -> bool {
        matches!(self, Self::Frontmatter | Self::Both)
    }

    pub fn includes_inline(self) -> bool {
        matches!(self, Self::Inline | Self::Both)
    }
}

impl FromStr for TagStyle {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "frontmatter" => Ok(Self::Frontmatter),
            "inline" => Ok(Self::Inline),
            "both" => Ok(Self::Both),
            other => Err(ConfigError::UnknownTagStyle(other.to_string())),
        }
    }
}

/// Directory placement of exported notes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FolderLayout {
    /// Every note directly in the output directory.
    #[default]
    Flat,
    /// Notes grouped under a directory named after their first tag.
    ByTag,
}

impl FromStr for FolderLayout {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "flat" => Ok(Self::Flat),
            "by-tag" | "by_tag" | "bytag" => Ok(Self::ByTag),
            other => Err(ConfigError::UnknownFolderLayout(other.to_string())),
        }
    }
}

/// Rendering configuration, immutable for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub output_dir: Option<PathBuf>,
    pub preserve_uuids: bool,
    pub link_style: LinkStyle,
    pub tag_style: TagStyle,
    pub folder_layout: FolderLayout,
    /// Skip every directory and file write; everything else still runs.
    pub dry_run: bool,
}

impl ExportConfig {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: Some(output_dir.into()),
            ..Self::default()
        }
    }
}
