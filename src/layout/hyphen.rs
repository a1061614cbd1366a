//! Hyphenation-aware line merging.

/// Merge two line fragments across a line boundary.
///
/// A trailing hyphen is treated as a word-wrap break (removed, fragments
/// concatenated directly) only when the character before the hyphen is
/// alphabetic and the continuation starts with a lowercase letter. A
/// capitalized continuation keeps the hyphen literal ("test-" + "Case"
/// names a compound, not a wrapped word). In every other case the fragments
/// join with a single space.
///
/// Returns the merged text and whether a hyphen was consumed.
pub fn merge_hyphenated_text(line_end: &str, next_line_start: &str) -> (String, bool) {
    let trimmed_end = line_end.trim_end();
    let trimmed_start = next_line_start.trim_start();

    if let Some(stem) = trimmed_end.strip_suffix('-') {
        let before = stem.chars().last();
        let after = trimmed_start.chars().next();

        let is_word_wrap = matches!(
            (before, after),
            (Some(b), Some(a)) if b.is_alphabetic() && a.is_alphabetic() && !a.is_uppercase()
        );

        if is_word_wrap {
            return (format!("{}{}", stem, trimmed_start), true);
        }
    }

    if trimmed_end.is_empty() {
        return (trimmed_start.to_string(), false);
    }
    if trimmed_start.is_empty() {
        return (trimmed_end.to_string(), false);
    }
    (format!("{} {}", trimmed_end, trimmed_start), false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_wrap_merged() {
        assert_eq!(
            merge_hyphenated_text("exam-", "ple"),
            ("example".to_string(), true)
        );
    }

    #[test]
    fn test_capitalized_continuation_kept_literal() {
        assert_eq!(
            merge_hyphenated_text("test-", "Case"),
            ("test- Case".to_string(), false)
        );
    }

    #[test]
    fn test_no_hyphen_joins_with_space() {
        assert_eq!(
            merge_hyphenated_text("hello", "world"),
            ("hello world".to_string(), false)
        );
    }

    #[test]
    fn test_digit_before_hyphen_kept_literal() {
        assert_eq!(
            merge_hyphenated_text("ISO 9001-", "certified"),
            ("ISO 9001- certified".to_string(), false)
        );
    }

    #[test]
    fn test_digit_after_hyphen_kept_literal() {
        assert_eq!(
            merge_hyphenated_text("part-", "42"),
            ("part- 42".to_string(), false)
        );
    }

    #[test]
    fn test_bare_hyphen_kept_literal() {
        assert_eq!(merge_hyphenated_text("-", "next"), ("- next".to_string(), false));
    }

    #[test]
    fn test_empty_fragments() {
        assert_eq!(merge_hyphenated_text("", "world"), ("world".to_string(), false));
        assert_eq!(merge_hyphenated_text("hello", ""), ("hello".to_string(), false));
        assert_eq!(merge_hyphenated_text("", ""), ("".to_string(), false));
    }

    #[test]
    fn test_trailing_whitespace_ignored() {
        assert_eq!(
            merge_hyphenated_text("exam- ", " ple"),
            ("example".to_string(), true)
        );
    }
}
