//! Rebuild a nested tree from dotted field paths.
//!
//! `("database.url", "pg://")` becomes `{database: {url: "pg://"}}`. This is
//! the inverse of [`flatten`](crate::flatten) and feeds every writer.

use indexmap::IndexMap;

use crate::error::ConfigError;
use crate::value::Value;

/// Nest `values` by path segment, keeping first-seen order at every level.
///
/// A path that is both a leaf and the parent of another path cannot be
/// represented in any of the supported formats and fails with
/// [`ConfigError::PathConflict`].
pub fn nest(values: &IndexMap<String, Value>) -> Result<IndexMap<String, Value>, ConfigError> {
    let mut root = IndexMap::new();
    for (path, value) in values {
        set_nested(&mut root, path, value.clone())?;
    }
    Ok(root)
}

fn set_nested(
    root: &mut IndexMap<String, Value>,
    dotted_key: &str,
    value: Value,
) -> Result<(), ConfigError> {
    let segments: Vec<&str> = dotted_key.split('.').collect();
    let Some((leaf, parents)) = segments.split_last() else {
        return Ok(());
    };

    let mut current = root;
    for (depth, segment) in parents.iter().enumerate() {
        let entry = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Map(IndexMap::new()));
        current = match entry {
            Value::Map(map) => map,
            _ => {
                return Err(ConfigError::PathConflict {
                    key: segments[..=depth].join("."),
                });
            }
        };
    }

    if matches!(current.get(*leaf), Some(Value::Map(_))) {
        return Err(ConfigError::PathConflict {
            key: dotted_key.to_string(),
        });
    }
    current.insert(leaf.to_string(), value);
    Ok(())
}
