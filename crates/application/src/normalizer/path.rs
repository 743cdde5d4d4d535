//! Dotted key splitting

/// Split `key` at `.` into trimmed segments
///
/// Returns an empty vector when any segment is blank, which marks the whole
/// key as unusable. Partial paths are never returned.
pub fn split_path(key: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    for part in key.split('.') {
        let part = part.trim();
        if part.is_empty() {
            return Vec::new();
        }
        parts.push(part);
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_segment() {
        assert_eq!(split_path("event"), ["event"]);
    }

    #[test]
    fn nested_segments_are_trimmed() {
        assert_eq!(split_path("traits.name"), ["traits", "name"]);
        assert_eq!(split_path("foo. b"), ["foo", "b"]);
        assert_eq!(split_path(" context . library .name "), ["context", "library", "name"]);
    }

    #[test]
    fn blank_segments_reject_the_key() {
        for key in ["", " ", "..foo", ".foo", "foo.", "foo. .", "a..b", "a.\t.b"] {
            assert!(split_path(key).is_empty(), "key {key:?} should be rejected");
        }
    }
}
