//! Cross-reference rendering for the supported link styles.

use crate::export::config::LinkStyle;

/// Characters that end or redirect a wikilink target.
const WIKILINK_TARGET_BREAKERS: [char; 5] = ['[', ']', '|', '#', '^'];
/// Characters that end a wikilink alias.
const WIKILINK_ALIAS_BREAKERS: [char; 3] = ['[', ']', '|'];

/// Renders a link to `target` (a `/`-separated path without extension).
///
/// Wikilinks add a `|display` alias only when the alias differs from the
/// target's file stem. Alias characters that would close the link become
/// `-`. Targets a wikilink cannot address are emitted as markdown links.
pub fn render_link(style: LinkStyle, target: &str, display: &str) -> String {
    match style {
        LinkStyle::Wikilink if target.contains(WIKILINK_TARGET_BREAKERS) => {
            markdown_link(target, display)
        }
        LinkStyle::Wikilink => {
            let alias = display.replace(WIKILINK_ALIAS_BREAKERS, "-");
            let stem = target.rsplit('/').next().unwrap_or(target);
            if stem == alias {
                format!("[[{target}]]")
            } else {
                format!("[[{target}|{alias}]]")
            }
        }
        LinkStyle::Markdown => markdown_link(target, display),
        LinkStyle::Relative => {
            format!("[{}](./{}.md)", escape_label(display), encode_path(target))
        }
    }
}

fn markdown_link(target: &str, display: &str) -> String {
    format!("[{}]({}.md)", escape_label(display), encode_path(target))
}

fn encode_path(target: &str) -> String {
    target
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn escape_label(display: &str) -> String {
    display.replace('[', "\\[").replace(']', "\\]")
}
