//! Missing-value reporting.
//!
//! Every resolution miss becomes one log message (WARN when a default stood
//! in, ERROR when nothing did) and raises the missing-values flag. Messages go
//! through a [`LogSink`]; the default [`TracingSink`] emits them as `tracing`
//! events under the `fieldfig` target, so they show up in whatever
//! subscriber the host installed.

use std::fmt;

use tracing::Level;

use crate::error::ConfigError;
use crate::source::ConfigSource;

/// Destination for diagnostic messages.
pub trait LogSink: Send + Sync {
    fn log(&self, level: Level, message: &str);
}

/// Forwards messages to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, level: Level, message: &str) {
        if level == Level::ERROR {
            tracing::error!(target: "fieldfig", "{message}");
        } else if level == Level::WARN {
            tracing::warn!(target: "fieldfig", "{message}");
        } else if level == Level::INFO {
            tracing::info!(target: "fieldfig", "{message}");
        } else if level == Level::DEBUG {
            tracing::debug!(target: "fieldfig", "{message}");
        } else {
            tracing::trace!(target: "fieldfig", "{message}");
        }
    }
}

/// Sink plus the cumulative missing-values flag.
pub struct Diagnostics {
    sink: Box<dyn LogSink>,
    missing_values: bool,
}

impl Diagnostics {
    pub fn new(sink: Box<dyn LogSink>) -> Self {
        Self {
            sink,
            missing_values: false,
        }
    }

    pub fn missing_values(&self) -> bool {
        self.missing_values
    }

    pub fn set_missing_values(&mut self, missing: bool) {
        self.missing_values = missing;
    }

    pub fn set_sink(&mut self, sink: Box<dyn LogSink>) {
        self.sink = sink;
    }

    /// Log each message separately at `level`. An empty batch is a caller
    /// error.
    pub fn log_messages(&self, level: Level, messages: &[&str]) -> Result<(), ConfigError> {
        if messages.is_empty() {
            return Err(ConfigError::EmptyMessages);
        }
        for message in messages {
            self.sink.log(level, message);
        }
        Ok(())
    }

    /// `path` had no value; `replacement` (the stringified default) was used.
    pub fn missing_with_replacement(
        &mut self,
        source: &ConfigSource,
        path: &str,
        replacement: &str,
        extra: &[&str],
    ) {
        self.report(
            Level::WARN,
            &format!(
                "Field '{path}' does not exist in the config from '{source}'. \
                 Using replacement value {replacement} from the default values."
            ),
            extra,
        );
    }

    /// `path` had neither a value nor a default.
    pub fn missing(&mut self, source: &ConfigSource, path: &str, extra: &[&str]) {
        self.report(
            Level::ERROR,
            &format!(
                "Field '{path}' does not exist in the config from '{source}'. \
                 No replacement was found; behavior beyond this point is undefined."
            ),
            extra,
        );
    }

    /// `path` resolved, but to the wrong kind of value.
    pub fn invalid(&mut self, source: &ConfigSource, path: &str, expected: &str, found: &str) {
        self.report(
            Level::ERROR,
            &format!(
                "Field '{path}' in the config from '{source}' holds {found}, expected {expected}."
            ),
            &[],
        );
    }

    fn report(&mut self, level: Level, headline: &str, extra: &[&str]) {
        self.sink.log(level, headline);
        for message in extra {
            self.sink.log(level, message);
        }
        self.missing_values = true;
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new(Box::new(TracingSink))
    }
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics")
            .field("missing_values", &self.missing_values)
            .finish_non_exhaustive()
    }
}
