use std::fmt;
use std::path::{Path, PathBuf};

/// Where a config store came from: a file path or any logical name.
///
/// Only used in diagnostic messages and as the default target of
/// [`ConfigManager::save`](crate::ConfigManager::save).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigSource {
    locator: String,
}

impl ConfigSource {
    /// A source named by a raw locator, kept verbatim.
    pub fn new(locator: impl Into<String>) -> Self {
        Self {
            locator: locator.into(),
        }
    }

    /// A source backed by a file. The locator is the absolute form of `path`
    /// (or `path` as given if the working directory cannot be determined).
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        Self::new(absolute.to_string_lossy().into_owned())
    }

    pub fn locator(&self) -> &str {
        &self.locator
    }

    pub fn set_locator(&mut self, locator: impl Into<String>) {
        self.locator = locator.into();
    }

    /// The locator interpreted as a filesystem path.
    pub fn as_path(&self) -> &Path {
        Path::new(&self.locator)
    }

    /// Whether the locator points at an existing regular file.
    pub fn path_has_file(&self) -> bool {
        self.as_path().is_file()
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.locator)
    }
}

impl From<&str> for ConfigSource {
    fn from(locator: &str) -> Self {
        Self::new(locator)
    }
}

impl From<String> for ConfigSource {
    fn from(locator: String) -> Self {
        Self::new(locator)
    }
}

impl From<&Path> for ConfigSource {
    fn from(path: &Path) -> Self {
        Self::from_path(path)
    }
}

impl From<PathBuf> for ConfigSource {
    fn from(path: PathBuf) -> Self {
        Self::from_path(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn raw_locator_kept_verbatim() {
        let source = ConfigSource::from("plugins/config.yml");
        assert_eq!(source.locator(), "plugins/config.yml");
        assert_eq!(source.to_string(), "plugins/config.yml");
    }

    #[test]
    fn path_locator_is_absolute() {
        let source = ConfigSource::from(PathBuf::from("plugins/config.yml"));
        assert!(source.as_path().is_absolute());
        assert!(source.locator().ends_with("config.yml"));
    }

    #[test]
    fn equality_on_locator() {
        assert_eq!(ConfigSource::new("a"), ConfigSource::from("a".to_string()));
        assert_ne!(ConfigSource::new("a"), ConfigSource::new("b"));
    }

    #[test]
    fn path_has_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("config.yml");
        assert!(!ConfigSource::from_path(&file).path_has_file());
        fs::write(&file, "a: 1\n").unwrap();
        assert!(ConfigSource::from_path(&file).path_has_file());
        assert!(!ConfigSource::from_path(dir.path()).path_has_file());
    }

    #[test]
    fn set_locator_replaces() {
        let mut source = ConfigSource::new("old");
        source.set_locator("new");
        assert_eq!(source.locator(), "new");
    }
}
