//! Configuration types and CLI options.
//!
//! This module defines the enums and the `Config` struct used for command-line
//! argument parsing. Every option can also be supplied through the environment
//! variable named in its `env` attribute.

use std::fmt;
use std::path::PathBuf;

use clap::builder::FalseyValueParser;
use clap::{Parser, ValueEnum};
use thiserror::Error;

use crate::config::constants::*;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Document store receiving the migrated rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// MongoDB collection (production target)
    Mongo,
    /// Document table in a local SQLite file
    Sqlite,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Mongo => "mongo",
            Backend::Sqlite => "sqlite",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A configuration value that failed validation.
#[derive(Error, Debug)]
#[error("invalid configuration for '{field}': {message}")]
pub struct ConfigError {
    /// Name of the offending option
    pub field: &'static str,
    /// What is wrong and what is expected
    pub message: String,
}

/// Parses a batch size leniently.
///
/// Never fails: non-numeric input falls back to [`DEFAULT_BATCH_SIZE`] and
/// anything below 1 (including negative numbers) is raised to 1.
pub fn parse_batch_size(raw: &str) -> Result<usize, std::convert::Infallible> {
    let size = match raw.trim().parse::<i64>() {
        Ok(n) if n < 1 => 1,
        Ok(n) => usize::try_from(n).unwrap_or(usize::MAX),
        Err(_) => DEFAULT_BATCH_SIZE,
    };
    Ok(size)
}

fn parse_port(raw: &str) -> Result<u16, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(DEFAULT_PORT);
    }
    trimmed
        .parse::<u16>()
        .map_err(|_| format!("'{}' is not a valid port number (expected 1-65535)", raw))
}

/// Migration configuration.
///
/// Built once in `main` (or programmatically via `Default`) and passed
/// explicitly to the store factory and the orchestrator.
///
/// # Examples
///
/// ```no_run
/// use healthcare_migrate::{Backend, Config};
/// use std::path::PathBuf;
///
/// let config = Config {
///     source: Some(PathBuf::from("patients.csv")),
///     backend: Backend::Sqlite,
///     batch_size: 500,
///     ..Default::default()
/// };
/// ```
#[derive(Clone, Parser)]
#[command(
    name = "healthcare_migrate",
    about = "Migrate a CSV dataset into a document database in batches",
    version
)]
pub struct Config {
    /// CSV file to migrate (overrides CSV_PATH)
    #[arg(value_name = "CSV_FILE")]
    pub source: Option<PathBuf>,

    /// CSV file to migrate when no positional argument is given
    #[arg(long, env = "CSV_PATH", hide_env_values = true)]
    pub csv_path: Option<PathBuf>,

    /// Rows per bulk insert (values below 1 become 1, non-numeric values fall back to 1000)
    #[arg(
        long,
        env = "MIGRATION_BATCH_SIZE",
        default_value = "1000",
        value_parser = parse_batch_size,
        allow_negative_numbers = true
    )]
    pub batch_size: usize,

    /// Document store receiving the rows
    #[arg(long, value_enum, env = "MIGRATION_BACKEND", default_value_t = Backend::Mongo)]
    pub backend: Backend,

    /// Database server host
    #[arg(long, env = "MONGO_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Database server port
    #[arg(long, env = "MONGO_PORT", default_value = "27017", value_parser = parse_port)]
    pub port: u16,

    /// User to authenticate as
    #[arg(long, env = "MONGO_USER", default_value = DEFAULT_USER)]
    pub user: String,

    /// Password of the user
    #[arg(
        long,
        env = "MONGO_PASSWORD",
        default_value = DEFAULT_PASSWORD,
        hide_default_value = true,
        hide_env_values = true
    )]
    pub password: String,

    /// Database holding the user's credentials
    #[arg(long, env = "MONGO_AUTH_DB", default_value = DEFAULT_AUTH_DB)]
    pub auth_db: String,

    /// Target database
    #[arg(long, env = "MONGO_DB", default_value = DEFAULT_DATABASE)]
    pub database: String,

    /// Target collection
    #[arg(long, env = "MONGO_COLLECTION", default_value = DEFAULT_COLLECTION)]
    pub collection: String,

    /// SQLite file used by the sqlite backend
    #[arg(long, env = "MIGRATION_SQLITE_PATH", default_value = DEFAULT_SQLITE_PATH)]
    pub sqlite_path: PathBuf,

    /// Count the documents in the target collection after the run
    /// (from the environment, empty, "0", "false", "no" and "off" mean off)
    #[arg(long, env = "MIGRATION_VERIFY", value_parser = FalseyValueParser::new())]
    pub verify: bool,

    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: None,
            csv_path: None,
            batch_size: DEFAULT_BATCH_SIZE,
            backend: Backend::Mongo,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            user: DEFAULT_USER.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
            auth_db: DEFAULT_AUTH_DB.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            sqlite_path: PathBuf::from(DEFAULT_SQLITE_PATH),
            verify: false,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("source", &self.source)
            .field("csv_path", &self.csv_path)
            .field("batch_size", &self.batch_size)
            .field("backend", &self.backend)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("auth_db", &self.auth_db)
            .field("database", &self.database)
            .field("collection", &self.collection)
            .field("sqlite_path", &self.sqlite_path)
            .field("verify", &self.verify)
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl Config {
    /// Replaces empty values with their defaults.
    ///
    /// An environment variable that is set but empty counts as unset.
    pub fn normalized(mut self) -> Self {
        fn or_default(value: &mut String, default: &str) {
            if value.trim().is_empty() {
                *value = default.to_string();
            }
        }

        or_default(&mut self.host, DEFAULT_HOST);
        or_default(&mut self.user, DEFAULT_USER);
        or_default(&mut self.password, DEFAULT_PASSWORD);
        or_default(&mut self.auth_db, DEFAULT_AUTH_DB);
        or_default(&mut self.database, DEFAULT_DATABASE);
        or_default(&mut self.collection, DEFAULT_COLLECTION);
        if self.sqlite_path.as_os_str().is_empty() {
            self.sqlite_path = PathBuf::from(DEFAULT_SQLITE_PATH);
        }
        if self
            .csv_path
            .as_ref()
            .is_some_and(|p| p.as_os_str().is_empty())
        {
            self.csv_path = None;
        }
        self.batch_size = self.batch_size.max(1);
        self
    }

    /// Resolves the CSV file to read.
    ///
    /// Precedence: positional argument, then `CSV_PATH`, then the default
    /// location, which depends on whether we run inside the compose network.
    pub fn source_path(&self) -> PathBuf {
        if let Some(path) = self.source.as_ref().or(self.csv_path.as_ref()) {
            return path.clone();
        }
        if self.host == CONTAINER_HOST {
            PathBuf::from(CONTAINER_CSV_PATH)
        } else {
            PathBuf::from(DEFAULT_CSV_PATH)
        }
    }

    /// Human-readable description of the target, safe to log.
    pub fn target_description(&self) -> String {
        match self.backend {
            Backend::Mongo => format!(
                "mongodb://{}@{}:{}/{}.{}",
                self.user, self.host, self.port, self.database, self.collection
            ),
            Backend::Sqlite => format!(
                "sqlite:{} (collection '{}')",
                self.sqlite_path.display(),
                self.collection
            ),
        }
    }

    /// Validates configuration values.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` naming the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError {
                field: "batch_size",
                message: "must be greater than 0".to_string(),
            });
        }
        if self.port == 0 {
            return Err(ConfigError {
                field: "port",
                message: "must be between 1 and 65535".to_string(),
            });
        }
        if self.database.trim().is_empty() {
            return Err(ConfigError {
                field: "database",
                message: "must not be empty (set MONGO_DB or --database)".to_string(),
            });
        }
        if self.collection.trim().is_empty() {
            return Err(ConfigError {
                field: "collection",
                message: "must not be empty (set MONGO_COLLECTION or --collection)".to_string(),
            });
        }
        if self.collection.contains('$') {
            return Err(ConfigError {
                field: "collection",
                message: format!("'{}' must not contain '$'", self.collection),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_parse_batch_size_numeric() {
        assert_eq!(parse_batch_size("250").unwrap(), 250);
        assert_eq!(parse_batch_size(" 42 ").unwrap(), 42);
    }

    #[test]
    fn test_parse_batch_size_coerces_to_one() {
        assert_eq!(parse_batch_size("0").unwrap(), 1);
        assert_eq!(parse_batch_size("-3").unwrap(), 1);
    }

    #[test]
    fn test_parse_batch_size_falls_back_to_default() {
        assert_eq!(parse_batch_size("abc").unwrap(), DEFAULT_BATCH_SIZE);
        assert_eq!(parse_batch_size("").unwrap(), DEFAULT_BATCH_SIZE);
        assert_eq!(parse_batch_size("12.5").unwrap(), DEFAULT_BATCH_SIZE);
    }

    #[test]
    fn test_parse_port() {
        assert_eq!(parse_port("27018").unwrap(), 27018);
        assert_eq!(parse_port("").unwrap(), DEFAULT_PORT);
        assert!(parse_port("not-a-port").is_err());
        assert!(parse_port("70000").is_err());
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.batch_size, 1000);
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 27017);
        assert_eq!(config.database, "healthcare_db");
        assert_eq!(config.collection, "patient_records");
        assert_eq!(config.backend, Backend::Mongo);
        assert!(!config.verify);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_source_path_precedence() {
        let mut config = Config::default();
        assert_eq!(config.source_path(), PathBuf::from(DEFAULT_CSV_PATH));

        config.host = CONTAINER_HOST.to_string();
        assert_eq!(config.source_path(), PathBuf::from(CONTAINER_CSV_PATH));

        config.csv_path = Some(PathBuf::from("env.csv"));
        assert_eq!(config.source_path(), PathBuf::from("env.csv"));

        config.source = Some(PathBuf::from("arg.csv"));
        assert_eq!(config.source_path(), PathBuf::from("arg.csv"));
    }

    #[test]
    fn test_normalized_replaces_empty_values() {
        let config = Config {
            host: String::new(),
            database: "  ".to_string(),
            csv_path: Some(PathBuf::new()),
            batch_size: 0,
            ..Default::default()
        }
        .normalized();

        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.database, DEFAULT_DATABASE);
        assert!(config.csv_path.is_none());
        assert_eq!(config.batch_size, 1);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = Config {
            port: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.field, "port");

        let config = Config {
            collection: "bad$name".to_string(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.field, "collection");
        assert!(err.message.contains('$'));
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = Config {
            password: "hunter2".to_string(),
            ..Default::default()
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_target_description_hides_password() {
        let config = Config::default();
        let target = config.target_description();
        assert!(target.contains("healthcare_db.patient_records"));
        assert!(!target.contains(DEFAULT_PASSWORD));
    }
}
