use thiserror::Error;
use vrpsy_core::{ConfigError, TableError};

use crate::sink::PersistenceError;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A trial produced a row that does not match its declared columns.
    #[error("trial `{trial}` produced a malformed result row")]
    ColumnMismatch {
        trial: String,
        #[source]
        source: TableError,
    },

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// A lifecycle callback arrived in a state that cannot accept it.
    #[error("`{operation}` is not valid while the session is {state}")]
    OutOfOrder {
        operation: &'static str,
        state: String,
    },
}
