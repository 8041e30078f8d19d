//! Comment lowering.

use crate::ast::Comment;

pub(super) fn can_lower(kind: &str) -> bool {
    matches!(kind, "line_comment" | "block_comment" | "comment")
}

/// Strip comment markers. Block comments keep one entry per line with the
/// conventional leading `*` removed.
pub(super) fn lower(text: &str) -> Comment {
    if let Some(rest) = text.strip_prefix("//") {
        return Comment {
            text: rest.trim().to_string(),
            block: false,
        };
    }

    // The extra `*` of `/**` goes with the per-line prefix below.
    let inner = text.strip_prefix("/*").unwrap_or(text);
    let inner = inner.strip_suffix("*/").unwrap_or(inner);

    let lines: Vec<&str> = inner
        .lines()
        .map(|line| {
            let line = line.trim();
            line.strip_prefix('*').map(str::trim_start).unwrap_or(line)
        })
        .collect();

    let start = lines.iter().position(|l| !l.is_empty()).unwrap_or(lines.len());
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(start, |i| i + 1);

    Comment {
        text: lines[start..end].join("\n"),
        block: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_comment() {
        let c = lower("// count the items");
        assert_eq!(c.text, "count the items");
        assert!(!c.block);
    }

    #[test]
    fn test_single_line_block_comment() {
        let c = lower("/* temp */");
        assert_eq!(c.text, "temp");
        assert!(c.block);
    }

    #[test]
    fn test_javadoc_lines() {
        let c = lower("/**\n     * First line.\n     * Second line.\n     */");
        assert_eq!(c.text, "First line.\nSecond line.");
    }

    #[test]
    fn test_empty_block_comment() {
        assert_eq!(lower("/**/").text, "");
    }
}
