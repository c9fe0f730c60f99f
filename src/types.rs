use std::path::Path;

use crate::error::ConfigError;
use crate::value::Value;

/// Outcome of resolving a field path against the store, without side effects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution<'a> {
    /// The field's own value.
    Value(&'a Value),
    /// The value slot was empty; this is the field's default.
    Default(&'a Value),
    /// No entry, or an entry with both slots empty.
    Missing,
}

impl<'a> Resolution<'a> {
    /// The resolved value, whichever slot it came from.
    pub fn value(self) -> Option<&'a Value> {
        match self {
            Resolution::Value(v) | Resolution::Default(v) => Some(v),
            Resolution::Missing => None,
        }
    }

    pub fn is_defaulted(self) -> bool {
        matches!(self, Resolution::Default(_))
    }
}

/// Config file formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Yaml,
    Toml,
    Json,
}

impl FileFormat {
    /// Pick the format for `path` from its extension (`.yml`, `.yaml`,
    /// `.toml`, `.json`, ASCII case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("yml") | Some("yaml") => Ok(FileFormat::Yaml),
            Some("toml") => Ok(FileFormat::Toml),
            Some("json") => Ok(FileFormat::Json),
            _ => Err(ConfigError::UnsupportedExtension {
                path: path.to_path_buf(),
            }),
        }
    }
}
