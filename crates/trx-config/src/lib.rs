//! Configuration for the trx-stress load generator.
//!
//! Settings are loaded once from a YAML file at startup and shared
//! read-only across worker sessions. Every key has a default, so a minimal
//! config only overrides what differs; the file itself must exist and parse.

mod error;

pub use error::ConfigError;

use serde::Deserialize;
use std::path::Path;
use tracing::warn;

/// Conventional location of the config file, relative to the working
/// directory.
pub const CONFIG_PATH: &str = "trx-stress.yaml";

/// Per-call DML limits.
///
/// `dml_limit` bounds how many rows a single insert/update/delete call may
/// touch. `dml_max` is the ceiling `dml_limit` can be raised to at runtime.
/// `row_limit` bounds candidate-row fetches when sampling update/delete
/// targets.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DmlLimits {
    #[serde(default = "default_dml_limit")]
    dml_limit: u32,
    #[serde(default = "default_dml_max")]
    dml_max: u32,
    #[serde(default = "default_row_limit")]
    row_limit: u32,
}

impl DmlLimits {
    /// Create limits directly. `dml_limit` is clamped to `dml_max`.
    pub fn new(dml_limit: u32, dml_max: u32, row_limit: u32) -> Self {
        Self {
            dml_limit: dml_limit.min(dml_max),
            dml_max,
            row_limit,
        }
    }

    /// Current per-call limit.
    pub fn dml_limit(&self) -> u32 {
        self.dml_limit
    }

    /// Ceiling for [`set_dml_limit`](Self::set_dml_limit).
    pub fn dml_max(&self) -> u32 {
        self.dml_max
    }

    /// Candidate-row fetch bound.
    pub fn row_limit(&self) -> u32 {
        self.row_limit
    }

    /// Overwrite the per-call limit. A value above `dml_max` is rejected
    /// and the prior limit retained; no error is surfaced.
    pub fn set_dml_limit(&mut self, limit: u32) {
        if limit > self.dml_max {
            warn!(
                limit,
                dml_max = self.dml_max,
                "unable to overwrite dml_limit greater than dml_max"
            );
        } else {
            self.dml_limit = limit;
        }
    }

    /// Clamp a requested operation count to the per-call limit.
    pub fn clamp(&self, cnt: u32) -> u32 {
        cnt.min(self.dml_limit)
    }

    /// How many candidate rows a sampling query may fetch.
    pub fn fetch_limit(&self) -> u32 {
        self.dml_limit.max(self.row_limit)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.dml_limit == 0 {
            return Err(ConfigError::Invalid("dml_limit must be at least 1".into()));
        }
        if self.dml_limit > self.dml_max {
            return Err(ConfigError::Invalid(format!(
                "dml_limit {} exceeds dml_max {}",
                self.dml_limit, self.dml_max
            )));
        }
        Ok(())
    }
}

impl Default for DmlLimits {
    fn default() -> Self {
        Self {
            dml_limit: default_dml_limit(),
            dml_max: default_dml_max(),
            row_limit: default_row_limit(),
        }
    }
}

/// Load-generation configuration, immutable once loaded.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Default number of batch rounds when the CLI does not override it.
    #[serde(default = "default_batch_rounds")]
    pub batch_rounds: u32,

    /// Lower bound of the inter-round pause, in seconds.
    #[serde(default = "default_batch_pause_min")]
    pub batch_pause_min: u64,

    /// Upper bound of the inter-round pause, in seconds.
    #[serde(default = "default_batch_pause_max")]
    pub batch_pause_max: u64,

    /// Upper bound of a worker's per-round insert count.
    #[serde(default = "default_max_insert")]
    pub max_insert: u32,

    /// Number of worker sessions per round; owner ids run `1..=workers`.
    #[serde(default = "default_workers")]
    pub workers: u32,

    /// Store login in `user/password@host[:port]/dbname` form.
    #[serde(default = "default_credentials")]
    pub credentials: String,

    /// Whether workers sleep before each DML statement.
    #[serde(default = "default_pause")]
    pub pause: bool,

    /// Standard deviation of the pacing delay, in milliseconds.
    #[serde(default = "default_sleep_std_ms")]
    pub sleep_std_ms: u64,

    #[serde(flatten)]
    pub limits: DmlLimits,
}

impl Config {
    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file. A missing or unreadable file
    /// is an error; the caller decides whether that is fatal.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&yaml)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_pause_min > self.batch_pause_max {
            return Err(ConfigError::Invalid(format!(
                "batch_pause_min {} exceeds batch_pause_max {}",
                self.batch_pause_min, self.batch_pause_max
            )));
        }
        if self.max_insert == 0 {
            return Err(ConfigError::Invalid("max_insert must be at least 1".into()));
        }
        if self.workers == 0 {
            return Err(ConfigError::Invalid("workers must be at least 1".into()));
        }
        self.limits.validate()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            batch_rounds: default_batch_rounds(),
            batch_pause_min: default_batch_pause_min(),
            batch_pause_max: default_batch_pause_max(),
            max_insert: default_max_insert(),
            workers: default_workers(),
            credentials: default_credentials(),
            pause: default_pause(),
            sleep_std_ms: default_sleep_std_ms(),
            limits: DmlLimits::default(),
        }
    }
}

fn default_batch_rounds() -> u32 {
    10
}

fn default_batch_pause_min() -> u64 {
    1
}

fn default_batch_pause_max() -> u64 {
    10
}

fn default_max_insert() -> u32 {
    20
}

fn default_workers() -> u32 {
    10
}

fn default_credentials() -> String {
    "trx/trxpw@localhost:5432/testdb".to_string()
}

fn default_pause() -> bool {
    true
}

fn default_sleep_std_ms() -> u64 {
    100
}

fn default_dml_limit() -> u32 {
    100
}

fn default_dml_max() -> u32 {
    10_000
}

fn default_row_limit() -> u32 {
    100
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_from_empty_mapping() {
        let config = Config::from_yaml("{}").unwrap();
        assert_eq!(config.batch_rounds, 10);
        assert_eq!(config.batch_pause_min, 1);
        assert_eq!(config.batch_pause_max, 10);
        assert_eq!(config.max_insert, 20);
        assert_eq!(config.workers, 10);
        assert!(config.pause);
        assert_eq!(config.sleep_std_ms, 100);
        assert_eq!(config.limits.dml_limit(), 100);
        assert_eq!(config.limits.dml_max(), 10_000);
        assert_eq!(config.limits.row_limit(), 100);
    }

    #[test]
    fn test_overrides() {
        let yaml = r#"
batch_pause_min: 2
batch_pause_max: 5
max_insert: 50
workers: 4
credentials: app/secret@db.internal:6432/load
pause: false
dml_limit: 500
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.batch_pause_min, 2);
        assert_eq!(config.batch_pause_max, 5);
        assert_eq!(config.max_insert, 50);
        assert_eq!(config.workers, 4);
        assert_eq!(config.credentials, "app/secret@db.internal:6432/load");
        assert!(!config.pause);
        assert_eq!(config.limits.dml_limit(), 500);
    }

    #[test]
    fn test_pause_bounds_validated() {
        let err = Config::from_yaml("batch_pause_min: 10\nbatch_pause_max: 5").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_limit_above_max_rejected_at_load() {
        let err = Config::from_yaml("dml_limit: 20000\ndml_max: 10000").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_set_dml_limit_above_max_retains_prior_value() {
        let mut limits = DmlLimits::new(100, 10_000, 100);
        limits.set_dml_limit(20_000);
        assert_eq!(limits.dml_limit(), 100);
        limits.set_dml_limit(500);
        assert_eq!(limits.dml_limit(), 500);
    }

    #[test]
    fn test_clamp() {
        let limits = DmlLimits::new(100, 10_000, 100);
        assert_eq!(limits.clamp(7), 7);
        assert_eq!(limits.clamp(100), 100);
        assert_eq!(limits.clamp(101), 100);
        assert_eq!(limits.clamp(u32::MAX), 100);
    }

    #[test]
    fn test_fetch_limit_uses_larger_bound() {
        assert_eq!(DmlLimits::new(100, 10_000, 100).fetch_limit(), 100);
        assert_eq!(DmlLimits::new(500, 10_000, 100).fetch_limit(), 500);
        assert_eq!(DmlLimits::new(50, 10_000, 100).fetch_limit(), 100);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_insert: 5\nworkers: 2").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.max_insert, 5);
        assert_eq!(config.workers, 2);
    }

    #[test]
    fn test_from_file_missing_is_io_error() {
        let err = Config::from_file("/nonexistent/trx-stress.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
