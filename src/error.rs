//! Error types for the Tally command line

use tally_core::TallyError;
use thiserror::Error;

/// Errors that stop a command run
#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("line {line}: {error}")]
    Sheet { line: usize, error: TallyError },
}

pub type Result<T> = std::result::Result<T, AppError>;
