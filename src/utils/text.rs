//! Display bounds for model output.

/// Character budget applied to every rendered result
pub const DEFAULT_MAX_CHARS: usize = 6000;

/// Appended when a result has been cut
pub const TRUNCATION_MARKER: &str = " …[truncated]";

/// Bound `text` to `max_chars` characters.
///
/// Text within the bound is returned unchanged. Longer text keeps its first
/// `max_chars` characters followed by [`TRUNCATION_MARKER`]. An absent value
/// renders as the empty string. Counting is by `char`, so a code point is
/// never split.
pub fn clamp(text: Option<&str>, max_chars: usize) -> String {
    let text = text.unwrap_or("");
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{}", &text[..cut], TRUNCATION_MARKER),
        None => text.to_string(),
    }
}

/// Whether [`clamp`] would cut `text`
pub fn exceeds(text: &str, max_chars: usize) -> bool {
    text.chars().nth(max_chars).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_within_bound_is_identity() {
        assert_eq!(clamp(Some("short"), 10), "short");
        assert_eq!(clamp(Some("exactly10!"), 10), "exactly10!");
    }

    #[test]
    fn test_clamp_empty_and_absent() {
        assert_eq!(clamp(Some(""), DEFAULT_MAX_CHARS), "");
        assert_eq!(clamp(None, DEFAULT_MAX_CHARS), "");
        assert_eq!(clamp(None, 0), "");
    }

    #[test]
    fn test_clamp_cuts_and_marks() {
        let out = clamp(Some("abcdefghijkl"), 5);
        assert_eq!(out, format!("abcde{}", TRUNCATION_MARKER));
    }

    #[test]
    fn test_clamp_length_bound() {
        let text = "x".repeat(DEFAULT_MAX_CHARS * 2);
        let out = clamp(Some(&text), DEFAULT_MAX_CHARS);
        assert!(out.chars().count() <= DEFAULT_MAX_CHARS + TRUNCATION_MARKER.chars().count());
        assert!(out.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn test_clamp_counts_characters_not_bytes() {
        // Each rupee sign is three bytes
        let text = "₹₹₹₹";
        assert_eq!(clamp(Some(text), 4), text);
        assert_eq!(clamp(Some(text), 2), format!("₹₹{}", TRUNCATION_MARKER));
    }

    #[test]
    fn test_exceeds() {
        assert!(!exceeds("abc", 3));
        assert!(exceeds("abcd", 3));
        assert!(!exceeds("", 0));
    }
}
