use std::path::PathBuf;
use thiserror::Error;

/// Every failure fieldfig surfaces to the caller.
///
/// A field that is missing from the store is *not* an error: resolution calls
/// return `None`, log through the [`LogSink`](crate::LogSink), and raise the
/// missing-values flag instead.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error(
        "Alternating arguments must come in (field, value, default) triples, got {len} arguments"
    )]
    ArgumentCount { len: usize },

    #[error("Unsupported config file '{path}': only .yml, .yaml, .toml and .json are supported")]
    UnsupportedExtension { path: PathBuf },

    #[error("Cannot log an empty list of messages")]
    EmptyMessages,

    #[error("Failed to read or write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse YAML in {path}: {source}")]
    YamlParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Failed to parse TOML in {path}: {source}")]
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to parse JSON in {path}: {source}")]
    JsonParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Top level of {path} is not a mapping of fields")]
    NotAMapping { path: PathBuf },

    #[error("Field '{key}' is both a value and a section; it cannot be written")]
    PathConflict { key: String },

    #[error("Field '{key}' holds {value}, which JSON cannot represent")]
    NonFiniteNumber { key: String, value: String },

    #[error("Failed to serialize YAML: {0}")]
    YamlSerialize(serde_yaml::Error),

    #[error("Failed to serialize JSON: {0}")]
    JsonSerialize(serde_json::Error),
}

impl ConfigError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        ConfigError::InvalidArgument {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_extension_formats_correctly() {
        let err = ConfigError::UnsupportedExtension {
            path: "/plugins/config.ini".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("config.ini"));
        assert!(msg.contains(".yaml"));
    }

    #[test]
    fn argument_count_formats() {
        let err = ConfigError::ArgumentCount { len: 4 };
        assert!(err.to_string().contains("got 4"));
    }

    #[test]
    fn path_conflict_names_key() {
        let err = ConfigError::PathConflict {
            key: "database".into(),
        };
        assert!(err.to_string().contains("'database'"));
    }

    #[test]
    fn non_finite_number_names_key_and_value() {
        let err = ConfigError::NonFiniteNumber {
            key: "ratio".into(),
            value: "NaN".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'ratio'"));
        assert!(msg.contains("NaN"));
    }
}
