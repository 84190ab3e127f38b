//! Normalization of raw column values

/// Strip the surrounding quotes of a printed string and unescape inner quotes
pub fn clean(raw: &str) -> String {
    let unquoted = raw
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(raw);
    unquoted.replace("\\\"", "\"")
}

/// Fold `(id, value)` rows ordered by ID into one entry per ID
///
/// A `None` value (the outer side of a LEFT JOIN) contributes the ID only.
pub fn group_by_id<V, C, I>(rows: I) -> Vec<(String, C)>
where
    I: IntoIterator<Item = (String, Option<V>)>,
    C: Default + Extend<V>,
{
    let mut grouped: Vec<(String, C)> = Vec::new();
    for (id, value) in rows {
        if grouped.last().map_or(true, |(last, _)| *last != id) {
            grouped.push((id, C::default()));
        }
        if let (Some(value), Some((_, values))) = (value, grouped.last_mut()) {
            values.extend(std::iter::once(value));
        }
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_clean_strips_surrounding_quotes() {
        assert_eq!(clean("\"abc-123\""), "abc-123");
        assert_eq!(clean("plain"), "plain");
        assert_eq!(clean("\"\""), "");
        assert_eq!(clean("\""), "\"");
    }

    #[test]
    fn test_clean_unescapes_inner_quotes() {
        assert_eq!(clean(r#""The \"Yoneda\" lemma""#), r#"The "Yoneda" lemma"#);
    }

    #[test]
    fn test_group_keeps_ids_without_values() {
        let rows = vec![
            ("a".to_string(), Some("x".to_string())),
            ("a".to_string(), Some("y".to_string())),
            ("b".to_string(), None),
            ("c".to_string(), Some("x".to_string())),
        ];
        let grouped: Vec<(String, Vec<String>)> = group_by_id(rows);

        assert_eq!(grouped.len(), 3);
        assert_eq!(grouped[0].0, "a");
        assert_eq!(grouped[0].1, vec!["x", "y"]);
        assert!(grouped[1].1.is_empty());
        assert_eq!(grouped[2].0, "c");
    }

    #[test]
    fn test_group_values_are_not_split() {
        let rows = vec![
            ("a".to_string(), Some("//example.org/search?q=a,b".to_string())),
            ("a".to_string(), Some("//example.org/search?q=a,b".to_string())),
        ];
        let grouped: Vec<(String, BTreeSet<String>)> = group_by_id(rows);

        assert_eq!(grouped.len(), 1);
        assert_eq!(
            grouped[0].1.iter().collect::<Vec<_>>(),
            vec!["//example.org/search?q=a,b"]
        );
    }

    #[test]
    fn test_group_empty() {
        let rows: Vec<(String, Option<String>)> = Vec::new();
        let grouped: Vec<(String, Vec<String>)> = group_by_id(rows);
        assert!(grouped.is_empty());
    }
}
