use serde::{Deserialize, Serialize};

/// How the text nodes inside one matched element are glued together
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextJoin {
    /// "Neat text": nodes stripped, empty ones dropped, joined with a single space
    #[default]
    Space,
    /// Same stripping, joined with newlines to keep paragraph structure
    Newline,
    /// Stripped nodes concatenated with no separator
    None,
}

impl TextJoin {
    pub fn separator(self) -> &'static str {
        match self {
            TextJoin::Space => " ",
            TextJoin::Newline => "\n",
            TextJoin::None => "",
        }
    }
}

/// Joins text nodes according to `join`.
///
/// Each node is trimmed and whitespace-only nodes are skipped. Returns `None`
/// when nothing is left, so callers never see an empty string.
pub fn join_text_nodes<'a, I>(nodes: I, join: TextJoin) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let parts: Vec<&str> = nodes
        .into_iter()
        .map(str::trim)
        .filter(|node| !node.is_empty())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(join.separator()))
    }
}

/// Trims a raw value (typically an attribute) and maps empty to `None`
pub fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neat_text_joins_with_space() {
        let nodes = ["  Main St, ", "\n", " Mobile, AL  "];
        assert_eq!(
            join_text_nodes(nodes, TextJoin::Space).as_deref(),
            Some("Main St, Mobile, AL")
        );
    }

    #[test]
    fn test_newline_join_keeps_paragraphs() {
        let nodes = ["First paragraph.", "  ", "Second paragraph."];
        assert_eq!(
            join_text_nodes(nodes, TextJoin::Newline).as_deref(),
            Some("First paragraph.\nSecond paragraph.")
        );
    }

    #[test]
    fn test_compact_join() {
        let nodes = [" June 4 ", " @ ", " 7:00 pm "];
        assert_eq!(
            join_text_nodes(nodes, TextJoin::None).as_deref(),
            Some("June 4@7:00 pm")
        );
    }

    #[test]
    fn test_whitespace_only_is_absent() {
        assert_eq!(join_text_nodes(["   ", "\n\t"], TextJoin::Space), None);
        assert_eq!(join_text_nodes(Vec::<&str>::new(), TextJoin::Space), None);
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty("  x "), Some("x".to_string()));
        assert_eq!(non_empty("   "), None);
    }
}
