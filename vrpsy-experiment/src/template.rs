use std::path::Path;

use serde_json::Value;
use tracing::info;
use vrpsy_core::{ConfigError, SettingsDocument};

use crate::config::{SESSION_SETTINGS_KEY, SessionSettings};
use crate::trial::Trial;

/// Settings template: every trial's defaults under its name, plus the session
/// defaults.
pub fn template_document(trials: &[Box<dyn Trial>]) -> Result<SettingsDocument, ConfigError> {
    let mut doc = SettingsDocument::default();
    for trial in trials {
        doc.insert(trial.name(), trial.template_settings()?);
    }
    let session = serde_json::to_value(SessionSettings::default()).map_err(|source| {
        ConfigError::Malformed {
            section: SESSION_SETTINGS_KEY.to_string(),
            source,
        }
    })?;
    doc.insert(SESSION_SETTINGS_KEY, session);
    Ok(doc)
}

/// Writes the template document, pretty-printed, to `path`.
pub fn write_template(trials: &[Box<dyn Trial>], path: &Path) -> Result<(), ConfigError> {
    let value: Value = template_document(trials)?.into_value();
    let raw = serde_json::to_string_pretty(&value).map_err(|source| ConfigError::Malformed {
        section: "template".to_string(),
        source,
    })?;
    std::fs::write(path, raw).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "settings template written");
    Ok(())
}
