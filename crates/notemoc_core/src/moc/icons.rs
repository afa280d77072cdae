//! Canonical categories and heading icons.

/// Top-level categories that earn a selection bonus, with their icons.
const CATEGORY_ICONS: &[(&str, &str)] = &[
    ("work", "💼"),
    ("personal", "🏠"),
    ("learning", "📚"),
    ("projects", "🚀"),
    ("ideas", "💡"),
    ("reference", "📖"),
];

pub const HOME_ICON: &str = "🗺️";
pub const TAG_ICON: &str = "📁";
pub const THEME_ICON: &str = "🧩";

/// Case-insensitive canonical category lookup.
pub fn is_canonical_category(name: &str) -> bool {
    category_icon(name).is_some()
}

/// Heading icon for a tag MOC.
pub fn icon_for_tag(name: &str) -> &'static str {
    category_icon(name).unwrap_or(TAG_ICON)
}

fn category_icon(name: &str) -> Option<&'static str> {
    let normalized = name.trim().to_lowercase();
    CATEGORY_ICONS
        .iter()
        .find(|(category, _)| *category == normalized)
        .map(|(_, icon)| *icon)
}
