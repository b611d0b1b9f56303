//! Flat string keyed storage, partitioned into namespaces.
//!
//! A namespace holds string and boolean values. [`FilePreferences`] keeps each
//! namespace in its own TOML file and goes back to disk on every call, so two
//! handles on the same file always see each other's writes.
//! [`MemoryPreferences`] keeps everything in process.

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Str(String),
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

pub trait Preferences {
    /// # Errors
    /// if the backing storage can't be read
    fn get(&self, key: &str) -> Result<Option<Value>>;

    /// overwrites whatever was stored under `key`
    ///
    /// # Errors
    /// if the backing storage can't be written
    fn put(&mut self, key: &str, value: Value) -> Result<()>;

    /// # Errors
    /// if the backing storage can't be read
    fn keys(&self) -> Result<Vec<String>>;

    /// `None` if missing or if the key holds a boolean
    ///
    /// # Errors
    /// if the backing storage can't be read
    fn get_string(&self, key: &str) -> Result<Option<String>> {
        Ok(match self.get(key)? {
            Some(Value::Str(s)) => Some(s),
            _ => None,
        })
    }

    /// `None` if missing or if the key holds a string
    ///
    /// # Errors
    /// if the backing storage can't be read
    fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        Ok(match self.get(key)? {
            Some(Value::Bool(b)) => Some(b),
            _ => None,
        })
    }
}

type Table = BTreeMap<String, Value>;

/// a namespace stored as `<root>/<namespace>.toml`
#[derive(Debug, Clone)]
pub struct FilePreferences {
    path: PathBuf,
}

impl FilePreferences {
    #[must_use]
    pub fn open(root: impl AsRef<Path>, namespace: &str) -> Self {
        Self {
            path: root.as_ref().join(format!("{namespace}.toml")),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_table(&self) -> Result<Table> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Table::new()),
            Err(e) => return Err(Error::io(&self.path, e)),
        };
        Ok(toml::from_str(&contents).unwrap_or_else(|e| {
            warn!(
                "discarding unreadable preferences file {}: {e}",
                self.path.display()
            );
            Table::new()
        }))
    }

    fn write_table(&self, table: &Table) -> Result<()> {
        let contents = toml::to_string(table)?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        fs::write(&self.path, contents).map_err(|e| Error::io(&self.path, e))
    }
}

impl Preferences for FilePreferences {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.read_table()?.remove(key))
    }

    fn put(&mut self, key: &str, value: Value) -> Result<()> {
        let mut table = self.read_table()?;
        table.insert(key.to_string(), value);
        debug!("writing `{key}` to {}", self.path.display());
        self.write_table(&table)
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.read_table()?.into_keys().collect())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    table: Table,
}

impl MemoryPreferences {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Preferences for MemoryPreferences {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.table.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: Value) -> Result<()> {
        self.table.insert(key.to_string(), value);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.table.keys().cloned().collect())
    }
}
