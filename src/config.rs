use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::error::MigrateError;

/// What to do with manifest items that fail parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, AsRefStr, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum RejectPolicy {
    /// Drop the item, logging it at debug level only
    #[default]
    Silent,
    /// Drop the item and log a warning for it
    Warn,
    /// Abort the run before any file is renamed
    Fail,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoggingConfig {
    pub cms_file_migrate: String,
}

impl LoggingConfig {
    const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];
    const DEFAULT_LEVEL: &str = "info";

    fn default() -> Self {
        LoggingConfig {
            cms_file_migrate: Self::DEFAULT_LEVEL.to_string(),
        }
    }

    /// flexi_logger spec: quiet for dependencies, configured level for this crate
    pub fn log_spec(&self) -> String {
        format!("warn, cms_file_migrate={}", self.cms_file_migrate)
    }

    fn ensure_valid(&mut self) {
        let str_original = self.cms_file_migrate.clone();
        self.cms_file_migrate = self.cms_file_migrate.trim().to_ascii_lowercase();
        if !Self::LOG_LEVELS.contains(&self.cms_file_migrate.as_str()) {
            eprintln!(
                "Config error: log level of '{}' is invalid - using default of '{}'",
                str_original,
                Self::DEFAULT_LEVEL
            );
            self.cms_file_migrate = Self::DEFAULT_LEVEL.to_owned();
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MigrationConfig {
    rejected: String,
}

impl MigrationConfig {
    pub fn reject_policy(&self) -> RejectPolicy {
        // ensure_valid guarantees a known value
        self.rejected.parse().unwrap_or_default()
    }

    pub fn set_reject_policy(&mut self, policy: RejectPolicy) {
        self.rejected = policy.as_ref().to_owned();
    }

    fn default() -> Self {
        MigrationConfig {
            rejected: RejectPolicy::default().as_ref().to_owned(),
        }
    }

    fn ensure_valid(&mut self) {
        let str_original = self.rejected.clone();
        self.rejected = self.rejected.trim().to_ascii_lowercase();
        if self.rejected.parse::<RejectPolicy>().is_err() {
            eprintln!(
                "Config error: rejected policy of '{}' is invalid - using default of '{}'",
                str_original,
                RejectPolicy::default()
            );
            self.rejected = RejectPolicy::default().as_ref().to_owned();
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    pub logging: LoggingConfig,
    pub migration: MigrationConfig,
}

impl Config {
    const ENV_PREFIX: &str = "CMS_MIGRATE_";

    /// Loads configuration from defaults, then the TOML file, then `CMS_MIGRATE_*`
    /// environment variables. Without an explicit path, `config.toml` in the app's local
    /// data directory is used if present. An explicit path must exist.
    pub fn load_config(config_path: Option<&Path>) -> Result<Self, MigrateError> {
        let config_path = match config_path {
            Some(path) if !path.exists() => {
                return Err(MigrateError::Error(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_config_path(),
        };

        let default_config = Config {
            logging: LoggingConfig::default(),
            migration: MigrationConfig::default(),
        };

        let mut figment = Figment::from(Serialized::defaults(default_config));
        if let Some(config_path) = &config_path {
            figment = figment.merge(Toml::file(config_path));
        }
        figment = figment.merge(Env::prefixed(Self::ENV_PREFIX).split("__"));

        let mut config: Config = figment.extract().map_err(Box::new)?;
        config.ensure_valid();

        Ok(config)
    }

    fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "cms-file-migrate")
            .map(|dirs| dirs.data_local_dir().join("config.toml"))
    }

    fn ensure_valid(&mut self) {
        self.logging.ensure_valid();
        self.migration.ensure_valid();
    }
}
