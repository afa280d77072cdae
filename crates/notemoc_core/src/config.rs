//! Configuration parse and validation errors shared by all run settings.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rejected configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    UnknownMocStyle(String),
    MaxDepthOutOfRange(u32),
    UnknownLinkStyle(String),
    UnknownTagStyle(String),
    UnknownFolderLayout(String),
    UnknownProvider(String),
    UnknownContentType(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownMocStyle(value) => write!(
                f,
                "unknown MOC style `{value}`; expected flat|hierarchical|para|topic|auto"
            ),
            Self::MaxDepthOutOfRange(value) => {
                write!(f, "MOC max depth {value} is outside the allowed range 1..=10")
            }
            Self::UnknownLinkStyle(value) => write!(
                f,
                "unknown link style `{value}`; expected wikilink|markdown|relative"
            ),
            Self::UnknownTagStyle(value) => write!(
                f,
                "unknown tag style `{value}`; expected frontmatter|inline|both"
            ),
            Self::UnknownFolderLayout(value) => {
                write!(f, "unknown folder layout `{value}`; expected flat|by-tag")
            }
            Self::UnknownProvider(value) => {
                write!(f, "unknown export provider `{value}`; expected obsidian")
            }
            Self::UnknownContentType(value) => {
                write!(f, "unknown content type `{value}`; expected note|tag")
            }
        }
    }
}

impl Error for ConfigError {}
