//! Writing value slots back to disk.
//!
//! Values are nested by path segment, rendered in the format the extension
//! names, and written after creating any missing parent directories. TOML
//! documents are assembled with `toml_edit` so comment blocks can ride along
//! as key and table decor. YAML is rendered by `serde_yaml`, then comment
//! blocks are slotted in above the matching key lines.

use std::path::Path;

use indexmap::IndexMap;

use crate::comments::{self, CommentMap, YamlKeyTracker, YamlLine};
use crate::error::ConfigError;
use crate::nest;
use crate::types::FileFormat;
use crate::value::Value;

/// Write `values` to `path`. Nothing is created if the extension is not
/// supported or the values cannot be nested.
pub fn save(
    path: &Path,
    values: &IndexMap<String, Value>,
    comments: &CommentMap,
) -> Result<(), ConfigError> {
    let format = FileFormat::from_path(path)?;
    let content = render(format, values, comments)?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    std::fs::write(path, &content).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(path = %path.display(), fields = values.len(), "saved config file");
    Ok(())
}

/// Pure function: the document text `save` would write.
pub fn render(
    format: FileFormat,
    values: &IndexMap<String, Value>,
    comments: &CommentMap,
) -> Result<String, ConfigError> {
    let tree = nest::nest(values)?;
    match format {
        FileFormat::Json => {
            if let Some((key, value)) = values.iter().find(|(_, v)| !is_finite(v)) {
                return Err(ConfigError::NonFiniteNumber {
                    key: key.clone(),
                    value: value.to_string(),
                });
            }
            let mut out = serde_json::to_string_pretty(&tree).map_err(ConfigError::JsonSerialize)?;
            out.push('\n');
            Ok(out)
        }
        FileFormat::Toml => Ok(render_toml(&tree, comments)),
        FileFormat::Yaml => {
            if tree.is_empty() {
                return Ok(String::new());
            }
            let plain = serde_yaml::to_string(&tree).map_err(ConfigError::YamlSerialize)?;
            Ok(annotate_yaml(&plain, comments))
        }
    }
}

/// JSON has no NaN or infinity; `serde_json` would quietly write `null`.
fn is_finite(value: &Value) -> bool {
    match value {
        Value::Float(f) => f.is_finite(),
        Value::List(items) => items.iter().all(is_finite),
        Value::Map(map) => map.values().all(is_finite),
        _ => true,
    }
}

// --- TOML ---

fn render_toml(tree: &IndexMap<String, Value>, comments: &CommentMap) -> String {
    let mut doc = toml_edit::DocumentMut::new();
    fill_table(doc.as_table_mut(), tree, "", comments);
    doc.to_string()
}

fn fill_table(
    table: &mut toml_edit::Table,
    map: &IndexMap<String, Value>,
    prefix: &str,
    comments: &CommentMap,
) {
    for (key, value) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };

        match value {
            Value::Map(child) => {
                let mut sub = toml_edit::Table::new();
                fill_table(&mut sub, child, &path, comments);
                if let Some(lines) = comments.get(&path) {
                    let block = comments::render_block(lines, "");
                    sub.decor_mut().set_prefix(format!("\n{block}"));
                }
                table.insert(key, toml_edit::Item::Table(sub));
            }
            leaf => {
                table.insert(key, toml_edit::value(to_toml_value(leaf)));
                if let Some(lines) = comments.get(&path)
                    && let Some(mut key_mut) = table.key_mut(key)
                {
                    key_mut
                        .leaf_decor_mut()
                        .set_prefix(comments::render_block(lines, ""));
                }
            }
        }
    }
}

fn to_toml_value(value: &Value) -> toml_edit::Value {
    match value {
        Value::Bool(b) => toml_edit::Value::from(*b),
        Value::Integer(i) => toml_edit::Value::from(*i),
        Value::Float(f) => toml_edit::Value::from(*f),
        Value::String(s) => toml_edit::Value::from(s.as_str()),
        Value::List(items) => {
            let mut array = toml_edit::Array::new();
            for item in items {
                array.push(to_toml_value(item));
            }
            toml_edit::Value::Array(array)
        }
        Value::Map(map) => {
            let mut inline = toml_edit::InlineTable::new();
            for (key, item) in map {
                inline.insert(key.as_str(), to_toml_value(item));
            }
            toml_edit::Value::InlineTable(inline)
        }
    }
}

// --- YAML ---

fn annotate_yaml(plain: &str, comments: &CommentMap) -> String {
    if comments.is_empty() {
        return plain.to_string();
    }

    let mut tracker = YamlKeyTracker::default();
    let mut out = String::with_capacity(plain.len());
    for line in plain.lines() {
        if let YamlLine::Key(Some(path)) = tracker.classify(line)
            && let Some(lines) = comments.get(&path)
        {
            let indent = &line[..line.len() - line.trim_start().len()];
            out.push_str(&comments::render_block(lines, indent));
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}
