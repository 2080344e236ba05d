use std::{env, fmt, fs, io, path};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uptime::{AggregationConfig, MIN_RETENTION_DAYS};

use crate::retention::RetentionPolicy;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read config {path}: {source}")]
    ReadFailed { path: path::PathBuf, source: io::Error },

    #[error("failed to write config {path}: {source}")]
    WriteFailed { path: path::PathBuf, source: io::Error },

    #[error("failed to parse config: {0}")]
    ParseFailed(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    SerializeFailed(#[from] toml::ser::Error),

    #[error("no config path available (neither XDG_CONFIG_HOME nor HOME is set)")]
    ConfigPathUnavailable,

    #[error("invalid [aggregation] section: {0}")]
    Aggregation(#[from] uptime::ConfigError),

    #[error("retention of {days} days is shorter than the {min} days the 30 day uptime needs")]
    RetentionTooShort { days: u32, min: u32 },

    #[error("invalid [{section}] section: {message}")]
    Invalid { section: &'static str, message: String },
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub aggregation: AggregationConfig,
    pub retention: RetentionPolicy,
    pub server: ServerConfig,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Path of the local libsql database file
    pub path: String,
    pub max_connections: usize,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: "uptime.db".into(), max_connections: 8 }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: "0.0.0.0".into(), port: 8080 }
    }
}

/// Used to ensure we are actually reading a toml file
fn normalize_toml_path(path: &path::Path) -> path::PathBuf {
    let mut path = path.to_path_buf();
    if path.extension().map(|ext| ext != "toml").unwrap_or(true) {
        path.set_extension("toml");
    }
    path
}

/// Get default config path ($XDG_CONFIG_HOME/uptime/config.toml or
/// $HOME/.config/...)
fn default_config_path() -> Result<path::PathBuf, Error> {
    let path = if let Ok(config_home) = env::var("XDG_CONFIG_HOME") {
        path::PathBuf::from(config_home)
    } else if let Some(home_dir) = env::home_dir() {
        home_dir.join(".config")
    } else {
        return Err(Error::ConfigPathUnavailable);
    };

    Ok(path.join("uptime/config.toml"))
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let write_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str, value: &dyn fmt::Display| {
                writeln!(f, "  {:indent$}{}: {}", "", label, value, indent = level * 2)
            }
        };
        let write_title_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str| {
                writeln!(f, "{:indent$}{}", "", label, indent = level * 2)
            }
        };

        let write_title_1 = write_title_indented(1);
        let write_1 = write_indented(1);

        let regions: Vec<String> =
            self.aggregation.regions.iter().map(ToString::to_string).collect();

        writeln!(f, "Current Internal Configuration State:")?;
        write_title_1(f, "Database")?;
        write_1(f, "Path", &self.database.path)?;
        write_1(f, "Max Connections", &self.database.max_connections)?;
        write_title_1(f, "Aggregation")?;
        write_1(f, "Regions", &regions.join(", "))?;
        write_1(f, "Accepted Status Codes", &self.aggregation.accepted_status_codes)?;
        write_1(f, "Freshness (s)", &self.aggregation.freshness_seconds)?;
        write_1(f, "Empty Regions", &self.aggregation.empty_region_policy)?;
        write_title_1(f, "Retention")?;
        write_1(f, "Days", &self.retention.days)?;
        write_1(f, "Cleanup Interval (s)", &self.retention.cleanup_interval_seconds)?;
        write_title_1(f, "Server")?;
        write_1(f, "Bind Address", &self.server.bind)?;
        write_1(f, "Port", &self.server.port)?;

        Ok(())
    }
}

impl Config {
    /// Generate Config structure from file
    ///
    /// Creates a default config in ~/.config/uptime/config.toml
    ///  or the specified path, with the name config.toml if one does not exist
    ///
    /// ```rust,ignore
    /// let cfg = config::Config::from_config(None::<&path::Path>)?;
    /// println!("{}", cfg);
    /// ```
    pub fn from_config(optional_path: Option<impl AsRef<path::Path>>) -> Result<Self, Error> {
        let config_path: path::PathBuf = if let Some(path) = optional_path {
            normalize_toml_path(path.as_ref())
        } else {
            default_config_path()?
        };

        let config = if config_path.exists() {
            let raw_string = fs::read_to_string(&config_path)
                .map_err(|source| Error::ReadFailed { path: config_path.clone(), source })?;
            Self::from_toml(&raw_string)?
        } else {
            let config = Self::default();
            config.write_config(&config_path)?;
            tracing::info!(path = %config_path.display(), "Wrote default configuration");
            config
        };

        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self, Error> {
        Ok(toml::from_str(raw)?)
    }

    /// Serialize and write a config to a file
    pub fn write_config(&self, path: &path::Path) -> Result<(), Error> {
        let config_str: String = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|source| Error::WriteFailed { path: path.to_path_buf(), source })?;
        }

        fs::write(path, config_str)
            .map_err(|source| Error::WriteFailed { path: path.to_path_buf(), source })
    }

    pub fn validate(&self) -> Result<(), Error> {
        self.aggregation.validate()?;

        if self.retention.days < MIN_RETENTION_DAYS {
            return Err(Error::RetentionTooShort {
                days: self.retention.days,
                min: MIN_RETENTION_DAYS,
            });
        }
        if self.retention.cleanup_interval_seconds == 0 {
            return Err(Error::Invalid {
                section: "retention",
                message: "cleanup_interval_seconds must be positive".into(),
            });
        }
        if self.database.path.trim().is_empty() {
            return Err(Error::Invalid { section: "database", message: "path is empty".into() });
        }
        if self.database.max_connections == 0 {
            return Err(Error::Invalid {
                section: "database",
                message: "max_connections must be positive".into(),
            });
        }
        Ok(())
    }
}
