use std::path::PathBuf;

use thiserror::Error;

/// Misconfiguration detected while loading the experiment. Never recoverable.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write settings file {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("settings document is not valid JSON")]
    Parse(#[source] serde_json::Error),

    #[error("settings document root must be a JSON object")]
    NotAnObject,

    #[error("settings section `{0}` is missing")]
    MissingSection(String),

    #[error("settings section `{section}` is missing key `{key}`")]
    MissingKey { section: String, key: String },

    #[error("settings section `{section}` is malformed: {source}")]
    Malformed {
        section: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid value in `{section}`: {reason}")]
    Invalid { section: String, reason: String },

    #[error("no trial types are registered")]
    EmptyRegistry,

    #[error("trial type `{0}` is registered more than once")]
    DuplicateTrial(String),

    #[error("every trial type has zero repetitions")]
    EmptySequence,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("table `{table}` expects {expected} columns, row has {got}")]
    ColumnCount {
        table: String,
        expected: usize,
        got: usize,
    },

    #[error("table `{table}` column {index} is `{expected}`, row has `{got}`")]
    ColumnName {
        table: String,
        index: usize,
        expected: String,
        got: String,
    },
}
