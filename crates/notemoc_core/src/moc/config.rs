//! MOC generation settings.

use crate::analysis::AnalyzerConfig;
use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Lowest accepted `max_depth`.
pub const MIN_MAX_DEPTH: u32 = 1;
/// Highest accepted `max_depth`.
pub const MAX_MAX_DEPTH: u32 = 10;

/// Layout strategy for generated MOCs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MocStyle {
    #[default]
    Flat,
    Hierarchical,
    Para,
    Topic,
    /// Picks the best differentiated style; currently always flat.
    Auto,
}

impl MocStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::Hierarchical => "hierarchical",
            Self::Para => "para",
            Self::Topic => "topic",
            Self::Auto => "auto",
        }
    }

    /// Whether the style has its own layout rather than the flat fallback.
    pub fn is_differentiated(self) -> bool {
        matches!(self, Self::Flat | Self::Auto)
    }
}

impl Display for MocStyle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MocStyle {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "flat" => Ok(Self::Flat),
            "hierarchical" => Ok(Self::Hierarchical),
            "para" => Ok(Self::Para),
            "topic" => Ok(Self::Topic),
            "auto" => Ok(Self::Auto),
            other => Err(ConfigError::UnknownMocStyle(other.to_string())),
        }
    }
}

/// Per-run MOC generation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MocConfig {
    pub style: MocStyle,
    /// Must stay within `1..=10`.
    pub max_depth: u32,
    /// Tags with fewer notes never get their own MOC.
    pub min_notes_per_moc: usize,
    pub include_stats: bool,
    pub include_recent: bool,
    pub recent_count: usize,
    pub analyzer: AnalyzerConfig,
}

impl Default for MocConfig {
    fn default() -> Self {
        Self {
            style: MocStyle::Flat,
            max_depth: 3,
            min_notes_per_moc: 2,
            include_stats: true,
            include_recent: true,
            recent_count: 10,
            analyzer: AnalyzerConfig::default(),
        }
    }
}

impl MocConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_MAX_DEPTH..=MAX_MAX_DEPTH).contains(&self.max_depth) {
            return Err(ConfigError::MaxDepthOutOfRange(self.max_depth));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{MocConfig, MocStyle};
    use crate::config::ConfigError;

    #[test]
    fn parses_every_style() {
        for style in [
            MocStyle::Flat,
            MocStyle::Hierarchical,
            MocStyle::Para,
            MocStyle::Topic,
            MocStyle::Auto,
        ] {
            assert_eq!(style.as_str().parse::<MocStyle>(), Ok(style));
        }
        assert_eq!(
            "tree".parse::<MocStyle>(),
            Err(ConfigError::UnknownMocStyle("tree".to_string()))
        );
    }

    #[test]
    fn validate_bounds_max_depth() {
        let mut config = MocConfig::default();
        assert!(config.validate().is_ok());

        config.max_depth = 0;
        assert_eq!(config.validate(), Err(ConfigError::MaxDepthOutOfRange(0)));
        config.max_depth = 11;
        assert_eq!(config.validate(), Err(ConfigError::MaxDepthOutOfRange(11)));
        config.max_depth = 10;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn deserializes_partial_documents_with_defaults() {
        let config: MocConfig =
            serde_json::from_str(r#"{"style":"para","recent_count":3}"#).unwrap();
        assert_eq!(config.style, MocStyle::Para);
        assert_eq!(config.recent_count, 3);
        assert_eq!(config.max_depth, 3);
        assert_eq!(config.analyzer.max_themes, 20);
    }
}
