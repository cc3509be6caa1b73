//! Nested-key codec: dot-notation names to nested mappings and back.
//!
//! A field named `database.port` holding `5432` corresponds to
//! `{"database": {"port": 5432}}` in nested form. Empty mappings are kept as
//! leaves so `unflatten(flatten(m)) == m` for every `m` in which no leaf key is
//! also the prefix of another key. Keys that themselves contain `.` inside a
//! nested mapping cannot be told apart from nesting and do not round-trip.

use serde_json::{Map, Value};

use crate::error::ConfigError;

/// Field name to value mapping. Insertion order is preserved.
pub type FormData = Map<String, Value>;

/// Flatten a nested mapping into dotted keys.
pub fn flatten(nested: &FormData) -> FormData {
    let mut out = Map::new();
    flatten_into(None, nested, &mut out);
    out
}

fn flatten_into(prefix: Option<&str>, map: &FormData, out: &mut FormData) {
    for (key, value) in map {
        let path = match prefix {
            Some(prefix) => format!("{prefix}.{key}"),
            None => key.clone(),
        };
        match value {
            Value::Object(inner) if !inner.is_empty() => flatten_into(Some(&path), inner, out),
            _ => {
                out.insert(path, value.clone());
            }
        }
    }
}

/// Expand dotted keys into nested mappings.
///
/// Fails with [`ConfigError::KeyCollision`] when a path runs through a
/// non-mapping value or lands on an existing mapping (both `a` and `a.b`).
pub fn unflatten(flat: &FormData) -> Result<FormData, ConfigError> {
    let mut out = Map::new();
    for (path, value) in flat {
        set_nested(&mut out, path, value.clone())?;
    }
    Ok(out)
}

/// Store `value` at dotted `path`, creating intermediate mappings.
pub fn set_nested(target: &mut FormData, path: &str, value: Value) -> Result<(), ConfigError> {
    let collision = || ConfigError::KeyCollision {
        path: path.to_owned(),
    };

    let mut segments: Vec<&str> = path.split('.').collect();
    let leaf = segments.pop().unwrap_or(path);

    let mut current = target;
    for segment in segments {
        let slot = current
            .entry(segment)
            .or_insert_with(|| Value::Object(Map::new()));
        current = match slot {
            Value::Object(inner) => inner,
            _ => return Err(collision()),
        };
    }

    match current.get(leaf) {
        Some(Value::Object(existing)) if !existing.is_empty() => Err(collision()),
        _ => {
            current.insert(leaf.to_owned(), value);
            Ok(())
        }
    }
}

/// Read the value at dotted `path`, if every segment exists.
pub fn get_nested<'a>(source: &'a FormData, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let first = segments.next()?;
    let mut current = source.get(first)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Whether any top-level value is a non-empty mapping.
pub fn is_nested(data: &FormData) -> bool {
    data.values()
        .any(|v| matches!(v, Value::Object(inner) if !inner.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn map(value: Value) -> FormData {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    // ── flatten ──────────────────────────────────────────────────────

    #[test]
    fn flatten_joins_segments_with_dots() {
        let nested = map(json!({
            "name": "Ada",
            "database": {"host": "localhost", "port": 5432},
            "a": {"b": {"c": true}}
        }));
        assert_eq!(
            Value::Object(flatten(&nested)),
            json!({
                "name": "Ada",
                "database.host": "localhost",
                "database.port": 5432,
                "a.b.c": true
            })
        );
    }

    #[test]
    fn flatten_keeps_empty_mappings_as_leaves() {
        let nested = map(json!({"opts": {}, "list": [1, 2]}));
        assert_eq!(
            Value::Object(flatten(&nested)),
            json!({"opts": {}, "list": [1, 2]})
        );
    }

    #[test]
    fn flatten_preserves_order() {
        let nested = map(json!({"z": 1, "a": {"y": 2, "b": 3}}));
        let keys: Vec<_> = flatten(&nested).keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a.y", "a.b"]);
    }

    // ── unflatten ────────────────────────────────────────────────────

    #[test]
    fn unflatten_builds_intermediate_mappings() {
        let flat = map(json!({"database.port": 5432, "database.host": "db", "x": 1}));
        assert_eq!(
            Value::Object(unflatten(&flat).unwrap()),
            json!({"database": {"port": 5432, "host": "db"}, "x": 1})
        );
    }

    #[test]
    fn unflatten_deep_path() {
        let flat = map(json!({"a.b.c": "x"}));
        assert_eq!(
            Value::Object(unflatten(&flat).unwrap()),
            json!({"a": {"b": {"c": "x"}}})
        );
    }

    #[test]
    fn unflatten_rejects_path_through_scalar() {
        let flat = map(json!({"database": 1, "database.port": 5432}));
        let err = unflatten(&flat).unwrap_err();
        assert!(matches!(err, ConfigError::KeyCollision { path } if path == "database.port"));
    }

    #[test]
    fn unflatten_rejects_leaf_over_mapping() {
        let flat = map(json!({"database.port": 5432, "database": 1}));
        let err = unflatten(&flat).unwrap_err();
        assert!(matches!(err, ConfigError::KeyCollision { path } if path == "database"));
    }

    #[test]
    fn round_trip_holds_without_collisions() {
        let samples = [
            json!({}),
            json!({"a": 1}),
            json!({"a": {"b": {"c": [1, {"d": 2}]}}, "e": null}),
            json!({"server": {"tls": {}, "port": 8080}, "name": "x"}),
            json!({"": {"weird": true}, "ok": false}),
        ];
        for sample in samples {
            let nested = map(sample.clone());
            let back = unflatten(&flatten(&nested)).unwrap();
            assert_eq!(Value::Object(back), sample);
        }
    }

    // ── get/set ──────────────────────────────────────────────────────

    #[test]
    fn get_nested_walks_segments() {
        let data = map(json!({"a": {"b": {"c": 3}}, "top": 1}));
        assert_eq!(get_nested(&data, "a.b.c"), Some(&json!(3)));
        assert_eq!(get_nested(&data, "top"), Some(&json!(1)));
        assert_eq!(get_nested(&data, "a.x"), None);
        assert_eq!(get_nested(&data, "top.deeper"), None);
    }

    #[test]
    fn set_nested_overwrites_scalar_leaf() {
        let mut data = map(json!({"a": {"b": 1}}));
        set_nested(&mut data, "a.b", json!(2)).unwrap();
        set_nested(&mut data, "a.c", json!(3)).unwrap();
        assert_eq!(Value::Object(data), json!({"a": {"b": 2, "c": 3}}));
    }

    #[test]
    fn is_nested_detects_mappings() {
        assert!(is_nested(&map(json!({"a": {"b": 1}}))));
        assert!(!is_nested(&map(json!({"a.b": 1, "c": {}}))));
    }
}
