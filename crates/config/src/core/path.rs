//! Hierarchical configuration key helpers
//!
//! Keys are `:`-delimited paths such as `logging:level:default`. Lookups are
//! case-insensitive, enumeration preserves the case the provider stored.

use std::cmp::Ordering;

/// Delimiter between key segments
pub const KEY_DELIMITER: &str = ":";

/// Join segments into a single key path
pub fn combine<I, S>(segments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut path = String::new();
    for segment in segments {
        if !path.is_empty() {
            path.push_str(KEY_DELIMITER);
        }
        path.push_str(segment.as_ref());
    }
    path
}

/// Last segment of a key path
pub fn section_key(path: &str) -> &str {
    match path.rfind(KEY_DELIMITER) {
        Some(pos) => &path[pos + KEY_DELIMITER.len()..],
        None => path,
    }
}

/// Everything before the last segment, `None` for top-level keys
pub fn parent_path(path: &str) -> Option<&str> {
    path.rfind(KEY_DELIMITER).map(|pos| &path[..pos])
}

/// Normalized form used for case-insensitive key lookups
pub(crate) fn normalize(key: &str) -> String {
    key.to_lowercase()
}

/// Case-insensitive key equality
pub fn keys_equal(x: &str, y: &str) -> bool {
    x.eq_ignore_ascii_case(y) || normalize(x) == normalize(y)
}

/// Orders keys segment by segment.
///
/// Numeric segments compare by value and sort before non-numeric ones, so
/// array entries `items:2` < `items:10`. Other segments compare
/// case-insensitively. A key that is a prefix of another sorts first.
pub fn compare_keys(x: &str, y: &str) -> Ordering {
    let xs: Vec<&str> = x.split(KEY_DELIMITER).filter(|s| !s.is_empty()).collect();
    let ys: Vec<&str> = y.split(KEY_DELIMITER).filter(|s| !s.is_empty()).collect();

    for (a, b) in xs.iter().zip(ys.iter()) {
        let ordering = match (a.parse::<i64>(), b.parse::<i64>()) {
            (Ok(a), Ok(b)) => a.cmp(&b),
            (Ok(_), Err(_)) => Ordering::Less,
            (Err(_), Ok(_)) => Ordering::Greater,
            (Err(_), Err(_)) => normalize(a).cmp(&normalize(b)),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }

    xs.len().cmp(&ys.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combine_and_split() {
        let path = combine(["logging", "level", "default"]);
        assert_eq!(path, "logging:level:default");
        assert_eq!(section_key(&path), "default");
        assert_eq!(parent_path(&path), Some("logging:level"));
        assert_eq!(parent_path("root"), None);
        assert_eq!(section_key("root"), "root");
    }

    #[test]
    fn test_compare_keys() {
        let mut keys = vec!["b", "10", "A", "2", "a:1"];
        keys.sort_by(|x, y| compare_keys(x, y));
        assert_eq!(keys, vec!["2", "10", "A", "a:1", "b"]);
    }

    #[test]
    fn test_keys_equal() {
        assert!(keys_equal("Logging:Level", "logging:level"));
        assert!(!keys_equal("logging", "log"));
    }
}
