//! Splitting a document body into per-slide chunks.

use regex::Regex;
use std::sync::LazyLock;

/// A line of three or more dashes between two newlines.
///
/// This does not know about code fences or tables: a `---` line inside a
/// fenced block ends the slide there.
static SLIDE_DELIMITER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n-{3,}\r?\n").unwrap());

/// Split the post-frontmatter body into trimmed slide sources.
///
/// Chunks that are empty after trimming are dropped, so an empty body
/// yields no slides.
pub fn split_slides(body: &str) -> Vec<&str> {
    SLIDE_DELIMITER_REGEX
        .split(body)
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_slide() {
        assert_eq!(split_slides("# Hello\n\nSpeaker note.\n"), vec!["# Hello\n\nSpeaker note."]);
    }

    #[test]
    fn test_split_on_three_or_more_dashes() {
        let body = "# One\n---\n# Two\n-----\n# Three";
        assert_eq!(split_slides(body), vec!["# One", "# Two", "# Three"]);
    }

    #[test]
    fn test_chunks_trimmed() {
        let body = "\n\n  # One  \n\n---\n\n# Two\n\n";
        assert_eq!(split_slides(body), vec!["# One", "# Two"]);
    }

    #[test]
    fn test_empty_body_has_no_slides() {
        assert!(split_slides("").is_empty());
        assert!(split_slides("  \n\n").is_empty());
    }

    #[test]
    fn test_dashes_need_surrounding_newlines() {
        // Leading delimiter has no preceding newline; inline dashes are text.
        assert_eq!(split_slides("---\n# A"), vec!["---\n# A"]);
        assert_eq!(split_slides("a --- b"), vec!["a --- b"]);
    }

    #[test]
    fn test_crlf_delimiter() {
        assert_eq!(split_slides("# A\r\n---\r\n# B"), vec!["# A", "# B"]);
    }

    #[test]
    fn test_delimiter_inside_fence_still_splits() {
        let body = "```\nbefore\n---\nafter\n```";
        assert_eq!(split_slides(body), vec!["```\nbefore", "after\n```"]);
    }
}
