use thiserror::Error;

use crate::core::execution::EngineError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("File not found or could not be read: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Malformed input on line {line}: {reason}")]
    InputMalformed { line: usize, reason: String },

    #[error("Failed to read or write JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Simulation failed: {0}")]
    SimulationError(#[from] EngineError),
}

impl Error {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Error::InputMalformed {
            line,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
