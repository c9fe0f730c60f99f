//! Reading config files into flat field pairs.
//!
//! The format comes from the extension and is checked before the file is
//! touched. Each format is parsed with its own crate into that crate's
//! document tree, which must be a mapping (or empty). The document is then
//! flattened into dotted paths by [`flatten`](crate::flatten), so the three
//! formats share one path scheme:
//!
//! - nested mappings and tables become `parent.child` paths
//! - sequences and arrays stay whole, as one [`Value::List`] leaf
//! - an empty mapping is kept as an empty [`Value::Map`] leaf
//! - explicit nulls become pairs with no value
//!
//! Comments are recovered from the same text by [`comments`](crate::comments).

use std::path::Path;

use crate::comments::{self, CommentMap};
use crate::error::ConfigError;
use crate::flatten;
use crate::types::FileFormat;
use crate::value::Value;

/// Everything recovered from one file.
#[derive(Debug, Default)]
pub struct LoadedFile {
    pub fields: Vec<(String, Option<Value>)>,
    pub comments: CommentMap,
}

/// Read and parse `path`.
pub fn load(path: &Path) -> Result<LoadedFile, ConfigError> {
    let format = FileFormat::from_path(path)?;
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let loaded = parse_str(format, &content, path)?;
    tracing::debug!(
        path = %path.display(),
        fields = loaded.fields.len(),
        comments = loaded.comments.len(),
        "loaded config file"
    );
    Ok(loaded)
}

/// Parse `content` as `format`. `path` is only used in error reports.
pub fn parse_str(
    format: FileFormat,
    content: &str,
    path: &Path,
) -> Result<LoadedFile, ConfigError> {
    let fields = match format {
        FileFormat::Yaml => {
            let doc: serde_yaml::Value =
                serde_yaml::from_str(content).map_err(|e| ConfigError::YamlParse {
                    path: path.to_path_buf(),
                    source: e,
                })?;
            match doc {
                serde_yaml::Value::Null => Vec::new(),
                serde_yaml::Value::Mapping(map) => flatten::flatten_yaml(&map),
                _ => return Err(not_a_mapping(path)),
            }
        }
        FileFormat::Toml => {
            let doc: toml::Table = toml::from_str(content).map_err(|e| ConfigError::TomlParse {
                path: path.to_path_buf(),
                source: e,
            })?;
            flatten::flatten_toml(&doc)
        }
        FileFormat::Json => {
            if content.trim().is_empty() {
                Vec::new()
            } else {
                let doc: serde_json::Value =
                    serde_json::from_str(content).map_err(|e| ConfigError::JsonParse {
                        path: path.to_path_buf(),
                        source: e,
                    })?;
                match doc {
                    serde_json::Value::Null => Vec::new(),
                    serde_json::Value::Object(map) => flatten::flatten_json(&map),
                    _ => return Err(not_a_mapping(path)),
                }
            }
        }
    };

    Ok(LoadedFile {
        fields,
        comments: comments::extract(format, content),
    })
}

fn not_a_mapping(path: &Path) -> ConfigError {
    ConfigError::NotAMapping {
        path: path.to_path_buf(),
    }
}
