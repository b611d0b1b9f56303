use std::{io, path::PathBuf};

use thiserror::Error;

use crate::alarm::AlarmId;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("couldn't access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("couldn't parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("couldn't serialize preferences: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("couldn't serialize alarms: {0}")]
    JsonSerialize(#[from] serde_json::Error),
    #[error("invalid alarm time `{0}`, expected HH:MM")]
    InvalidTime(String),
    #[error("invalid day `{0}`, expected one of Su, M, Tu, W, Th, F, S")]
    InvalidDay(String),
    #[error("invalid log level `{0}`")]
    InvalidLogLevel(String),
    #[error("couldn't determine the home directory")]
    NoProjectDirs,
    #[error("no alarm ids left to hand out")]
    IdsExhausted,
    #[error("no alarm with id {0}")]
    UnknownAlarm(AlarmId),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
