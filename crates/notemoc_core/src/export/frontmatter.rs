//! `---`-delimited YAML-like frontmatter writer.

/// Fixed `source` marker stamped on every generated document.
pub const SOURCE_MARKER: &str = "notemoc";

/// Accumulates frontmatter lines in insertion order.
#[derive(Debug, Default)]
pub struct Frontmatter {
    lines: Vec<String>,
}

impl Frontmatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a double-quoted, escaped string value.
    pub fn quoted(mut self, key: &str, value: &str) -> Self {
        self.lines.push(format!("{key}: {}", quote(value)));
        self
    }

    /// Adds a bare value such as a timestamp or identifier.
    pub fn plain(mut self, key: &str, value: impl std::fmt::Display) -> Self {
        self.lines.push(format!("{key}: {value}"));
        self
    }

    /// Adds a flow sequence of quoted strings.
    pub fn list(mut self, key: &str, values: &[String]) -> Self {
        let items = values
            .iter()
            .map(|value| quote(value))
            .collect::<Vec<_>>()
            .join(", ");
        self.lines.push(format!("{key}: [{items}]"));
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::from("---\n");
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out.push_str("---\n");
        out
    }
}

fn quote(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}
