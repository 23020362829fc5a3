//! Hashtag extraction for post content.

use once_cell::sync::Lazy;
use regex::Regex;

/// `#` followed by one or more ASCII word characters
static HASHTAG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#((?-u:\w)+)").expect("Invalid hashtag regex"));

/// Extract hashtags from content text
///
/// Tags are returned without the leading `#`, in order of appearance.
/// Repeated tags are kept so the stored list mirrors the content.
pub fn extract_hashtags(content: &str) -> Vec<String> {
    HASHTAG_REGEX
        .captures_iter(content)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_hashtags_in_order() {
        let tags = extract_hashtags("Sunset at the pier #sunset #beach_life");
        assert_eq!(tags, vec!["sunset", "beach_life"]);
    }

    #[test]
    fn test_extract_keeps_duplicates() {
        let tags = extract_hashtags("#rust is great, #rust forever");
        assert_eq!(tags, vec!["rust", "rust"]);
    }

    #[test]
    fn test_no_hashtags() {
        assert!(extract_hashtags("plain text, no tags # here").is_empty());
    }

    #[test]
    fn test_hashtag_stops_at_punctuation() {
        let tags = extract_hashtags("Loving #summer2025! and #go-lang");
        assert_eq!(tags, vec!["summer2025", "go"]);
    }

    #[test]
    fn test_hashtag_stops_at_non_ascii_letters() {
        let tags = extract_hashtags("Breakfast #café and #naïve #ünïcode");
        assert_eq!(tags, vec!["caf", "na"]);
    }
}
