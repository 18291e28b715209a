//! Dotted-path addressing over a YAML document.
//!
//! Paths are split on `.`; there is no escape for a literal dot inside a key.
//! All functions here are pure and never touch the disk.

use serde_yaml::{Mapping, Value};

/// Separator between path segments.
pub const SEPARATOR: char = '.';

/// Splits a dotted path into segments. The empty path has no segments and
/// addresses the document root.
#[must_use]
pub fn segments(path: &str) -> Vec<&str> {
    if path.is_empty() {
        Vec::new()
    } else {
        path.split(SEPARATOR).collect()
    }
}

/// Text a mapping key is addressed by: strings as-is, numbers in decimal
/// form, booleans as `true`/`false`. Other keys cannot be addressed.
#[must_use]
pub fn key_text(key: &Value) -> Option<String> {
    match key {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

/// Finds the key in `mapping` addressed by `segment`. A string key wins over
/// a number or boolean key with the same text.
fn find_key(mapping: &Mapping, segment: &str) -> Option<Value> {
    let exact = Value::String(segment.to_string());
    if mapping.contains_key(&exact) {
        return Some(exact);
    }
    mapping.keys().find(|key| key_text(key).as_deref() == Some(segment)).cloned()
}

/// Walks `segments` down from `root`, returning `None` as soon as a segment
/// is missing or the current node is not a mapping.
#[must_use]
pub fn lookup<'a>(root: &'a Value, segments: &[&str]) -> Option<&'a Value> {
    match segments.split_first() {
        None => Some(root),
        Some((head, rest)) => {
            let mapping = root.as_mapping()?;
            lookup(mapping.get(&find_key(mapping, head)?)?, rest)
        }
    }
}

/// Returns `true` if the final segment exists, even when it holds `null`.
#[must_use]
pub fn contains(root: &Value, segments: &[&str]) -> bool {
    match segments.split_last() {
        None => true,
        Some((last, parents)) => lookup(root, parents)
            .and_then(Value::as_mapping)
            .is_some_and(|parent| find_key(parent, last).is_some()),
    }
}

/// Stores `value` at `segments`, creating intermediate mappings and replacing
/// any intermediate node that is not a mapping. Existing keys are reused, so
/// a segment `101` updates a `101:` number key instead of adding `'101':`.
pub fn assign(root: &mut Value, segments: &[&str], value: Value) {
    match segments.split_first() {
        None => *root = value,
        Some((head, rest)) => {
            let mapping = ensure_mapping(root);
            let key = find_key(mapping, head).unwrap_or_else(|| Value::String((*head).to_string()));
            assign(mapping.entry(key).or_insert(Value::Null), rest, value);
        }
    }
}

/// Removes the final segment from its parent mapping, returning the removed
/// value. Parents left empty are kept.
pub fn remove(root: &mut Value, segments: &[&str]) -> Option<Value> {
    let (head, rest) = segments.split_first()?;
    let mapping = root.as_mapping_mut()?;
    let key = find_key(mapping, head)?;
    if rest.is_empty() {
        mapping.shift_remove(&key)
    } else {
        remove(mapping.get_mut(&key)?, rest)
    }
}

fn ensure_mapping(value: &mut Value) -> &mut Mapping {
    if !value.is_mapping() {
        *value = Value::Mapping(Mapping::new());
    }
    match value {
        Value::Mapping(mapping) => mapping,
        _ => unreachable!("node was just replaced by a mapping"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(yaml: &str) -> Value {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn empty_path_has_no_segments() {
        assert!(segments("").is_empty());
        assert_eq!(segments("servers.web1.host"), vec!["servers", "web1", "host"]);
        assert_eq!(segments("a..b"), vec!["a", "", "b"]);
    }

    #[test]
    fn lookup_walks_nested_mappings() {
        let root = doc("servers:\n  web1:\n    host: 1.2.3.4\n    port: 22\n");
        assert_eq!(lookup(&root, &["servers", "web1", "host"]), Some(&Value::from("1.2.3.4")));
        assert_eq!(lookup(&root, &["servers", "web1", "port"]).and_then(Value::as_u64), Some(22));
        assert_eq!(lookup(&root, &["servers", "web2", "host"]), None);
        assert_eq!(lookup(&root, &[]), Some(&root));
    }

    #[test]
    fn lookup_stops_at_scalars_and_sequences() {
        let root = doc("name: web\nsites:\n  - domain: a.test\n");
        assert_eq!(lookup(&root, &["name", "length"]), None);
        assert_eq!(lookup(&root, &["sites", "0"]), None);
    }

    #[test]
    fn contains_sees_null_values() {
        let root = doc("a:\n  b: ~\n");
        assert!(contains(&root, &["a", "b"]));
        assert!(contains(&root, &["a"]));
        assert!(!contains(&root, &["a", "c"]));
        assert!(!contains(&root, &["a", "b", "c"]));
    }

    #[test]
    fn assign_creates_intermediate_mappings() {
        let mut root = Value::Mapping(Mapping::new());
        assign(&mut root, &["a", "b", "c"], Value::from(1));
        assert_eq!(root, doc("a:\n  b:\n    c: 1\n"));
    }

    #[test]
    fn assign_replaces_scalar_intermediates() {
        let mut root = doc("a: plain\n");
        assign(&mut root, &["a", "b"], Value::from(true));
        assert_eq!(root, doc("a:\n  b: true\n"));
    }

    #[test]
    fn assign_overwrites_existing_leaf() {
        let mut root = doc("a:\n  b: 1\n  keep: yes\n");
        assign(&mut root, &["a", "b"], Value::from("two"));
        assert_eq!(root, doc("a:\n  b: two\n  keep: yes\n"));
    }

    #[test]
    fn remove_keeps_empty_parents_and_order() {
        let mut root = doc("a:\n  x: 1\n  b: 2\n  y: 3\n");
        assert_eq!(remove(&mut root, &["a", "b"]), Some(Value::from(2)));
        let keys: Vec<_> = lookup(&root, &["a"])
            .and_then(Value::as_mapping)
            .unwrap()
            .keys()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(keys, vec!["x", "y"]);

        let mut root = doc("a:\n  b: 2\n");
        remove(&mut root, &["a", "b"]);
        assert_eq!(root, doc("a: {}\n"));
    }

    #[test]
    fn remove_missing_path_is_none() {
        let mut root = doc("a: 1\n");
        assert_eq!(remove(&mut root, &["a", "b"]), None);
        assert_eq!(remove(&mut root, &["z"]), None);
        assert_eq!(remove(&mut root, &[]), None);
        assert_eq!(root, doc("a: 1\n"));
    }

    #[test]
    fn number_and_bool_keys_are_addressed_by_text() {
        let root = doc("servers:\n  101:\n    host: 10.0.0.1\nflags:\n  true: on\n");
        assert_eq!(lookup(&root, &["servers", "101", "host"]), Some(&Value::from("10.0.0.1")));
        assert!(contains(&root, &["servers", "101"]));
        assert!(contains(&root, &["flags", "true"]));
        assert!(!contains(&root, &["servers", "102"]));
    }

    #[test]
    fn assign_reuses_number_keys() {
        let mut root = doc("servers:\n  101:\n    host: 10.0.0.1\n");
        assign(&mut root, &["servers", "101", "port"], Value::from(2222));
        assert_eq!(root, doc("servers:\n  101:\n    host: 10.0.0.1\n    port: 2222\n"));
        let servers = lookup(&root, &["servers"]).and_then(Value::as_mapping);
        assert_eq!(servers.map(Mapping::len), Some(1));
    }

    #[test]
    fn remove_finds_number_keys() {
        let mut root = doc("a:\n  7: seven\n  b: 2\n");
        assert_eq!(remove(&mut root, &["a", "7"]), Some(Value::from("seven")));
        assert_eq!(root, doc("a:\n  b: 2\n"));
    }

    #[test]
    fn string_key_wins_over_number_key() {
        let root = doc("'1': text\n1: number\n");
        assert_eq!(lookup(&root, &["1"]), Some(&Value::from("text")));
    }

    #[test]
    fn key_text_covers_scalars_only() {
        assert_eq!(key_text(&Value::from(101)).as_deref(), Some("101"));
        assert_eq!(key_text(&Value::from(false)).as_deref(), Some("false"));
        assert_eq!(key_text(&Value::from("web1")).as_deref(), Some("web1"));
        assert_eq!(key_text(&Value::Null), None);
    }
}
