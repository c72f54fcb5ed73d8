use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;
use vrpsy_core::ResultsTable;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to write results to {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode results table `{label}`")]
    Encode {
        label: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Receives every results table at the end of a session.
pub trait ResultsSink {
    fn save_table(&mut self, label: &str, table: &ResultsTable) -> Result<(), PersistenceError>;
}

/// Keeps tables in memory, in the order they were saved.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub tables: Vec<(String, ResultsTable)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self, label: &str) -> Option<&ResultsTable> {
        self.tables
            .iter()
            .find(|(name, _)| name == label)
            .map(|(_, table)| table)
    }
}

impl ResultsSink for MemorySink {
    fn save_table(&mut self, label: &str, table: &ResultsTable) -> Result<(), PersistenceError> {
        self.tables.push((label.to_string(), table.clone()));
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

/// Writes one `<label>.<ext>` file per table into a directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
    format: OutputFormat,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>, format: OutputFormat) -> Self {
        Self {
            dir: dir.into(),
            format,
        }
    }

    pub fn path_for(&self, label: &str) -> PathBuf {
        self.dir.join(format!("{label}.{}", self.format.extension()))
    }

    fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> PersistenceError + '_ {
        move |source| PersistenceError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl ResultsSink for DirectorySink {
    fn save_table(&mut self, label: &str, table: &ResultsTable) -> Result<(), PersistenceError> {
        std::fs::create_dir_all(&self.dir).map_err(Self::io_error(&self.dir))?;
        let path = self.path_for(label);
        let file = File::create(&path).map_err(Self::io_error(&path))?;
        let mut writer = BufWriter::new(file);
        match self.format {
            OutputFormat::Csv => writer
                .write_all(table.to_csv().as_bytes())
                .map_err(Self::io_error(&path))?,
            OutputFormat::Json => serde_json::to_writer_pretty(&mut writer, table.rows())
                .map_err(|source| PersistenceError::Encode {
                    label: label.to_string(),
                    source,
                })?,
        }
        writer.flush().map_err(Self::io_error(&path))?;
        info!(table = label, rows = table.len(), path = %path.display(), "results saved");
        Ok(())
    }
}
