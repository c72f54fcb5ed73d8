//! The JSON settings document an experimenter fills in before a session.
//!
//! The document is an object of sections: one per trial type (keyed by trial
//! name) and one `SessionSettings` section. Every key a section's settings
//! type declares is required.

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsDocument {
    root: Map<String, Value>,
}

impl SettingsDocument {
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            _ => Err(ConfigError::NotAnObject),
        }
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let value = serde_json::from_str(raw).map_err(ConfigError::Parse)?;
        Self::from_value(value)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn section<'a>(&'a self, name: &'a str) -> Result<SettingsSection<'a>, ConfigError> {
        match self.root.get(name) {
            Some(Value::Object(map)) => Ok(SettingsSection { name, map }),
            Some(other) => Err(ConfigError::Invalid {
                section: name.to_string(),
                reason: format!("expected an object, found {other}"),
            }),
            None => Err(ConfigError::MissingSection(name.to_string())),
        }
    }

    pub fn insert(&mut self, name: &str, value: Value) {
        self.root.insert(name.to_string(), value);
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.root)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SettingsSection<'a> {
    name: &'a str,
    map: &'a Map<String, Value>,
}

impl<'a> SettingsSection<'a> {
    pub fn name(&self) -> &str {
        self.name
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T, ConfigError> {
        let value = self.map.get(key).ok_or_else(|| ConfigError::MissingKey {
            section: self.name.to_string(),
            key: key.to_string(),
        })?;
        serde_json::from_value(value.clone()).map_err(|source| ConfigError::Malformed {
            section: self.name.to_string(),
            source,
        })
    }

    /// Parses the whole section into `T`.
    ///
    /// The keys `T::default()` serializes to are the required keys; the first
    /// absent one is reported as [`ConfigError::MissingKey`].
    pub fn parse<T>(&self) -> Result<T, ConfigError>
    where
        T: DeserializeOwned + Serialize + Default,
    {
        let template = serde_json::to_value(T::default()).map_err(|source| {
            ConfigError::Malformed {
                section: self.name.to_string(),
                source,
            }
        })?;
        if let Value::Object(required) = template {
            if let Some(key) = required.keys().find(|key| !self.map.contains_key(*key)) {
                return Err(ConfigError::MissingKey {
                    section: self.name.to_string(),
                    key: key.clone(),
                });
            }
        }
        serde_json::from_value(Value::Object(self.map.clone())).map_err(|source| {
            ConfigError::Malformed {
                section: self.name.to_string(),
                source,
            }
        })
    }
}
