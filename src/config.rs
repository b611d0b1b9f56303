use std::{
    io,
    path::{Path, PathBuf},
    str::FromStr,
};

use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const APP_NAME: &str = "alarmio";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// chrono format used when listing alarms, e.g. `%l:%M %p`
    #[serde(default = "default_time_format")]
    pub time_format: String,
    /// where the preference namespaces live, defaults to the platform data dir
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_time_format() -> String {
    crate::alarm::TIME_FORMAT.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            time_format: default_time_format(),
            data_dir: None,
            log_level: default_log_level(),
        }
    }
}

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// a missing file gives the default config
    ///
    /// # Errors
    /// if the file exists but can't be read or parsed
    pub fn load(path: &Path) -> Result<Self> {
        let config = match std::fs::read_to_string(path) {
            Ok(config) => config,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(Error::io(path, e)),
        };
        Ok(toml::from_str(&config)?)
    }

    /// # Errors
    /// if the config dir can't be created or the file can't be written
    pub fn save(&self, path: &Path) -> Result<()> {
        let config = toml::to_string(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        std::fs::write(path, config).map_err(|e| Error::io(path, e))
    }

    /// # Errors
    /// if there is no home directory to put the config in
    pub fn config_path() -> Result<PathBuf> {
        let mut path = project_dirs()?.config_dir().to_path_buf();
        path.push("config.toml");
        Ok(path)
    }

    /// # Errors
    /// if no `data_dir` is configured and there is no home directory
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        let mut path = project_dirs()?.data_dir().to_path_buf();
        path.push("prefs");
        Ok(path)
    }

    /// # Errors
    /// if `log_level` isn't one of off, error, warn, info, debug, trace
    pub fn log_level(&self) -> Result<LevelFilter> {
        LevelFilter::from_str(&self.log_level)
            .map_err(|_| Error::InvalidLogLevel(self.log_level.clone()))
    }
}

fn project_dirs() -> Result<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", APP_NAME).ok_or(Error::NoProjectDirs)
}
