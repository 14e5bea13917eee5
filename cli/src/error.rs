//! Failures of the `caparg` binary itself (not of the tokens it parses).

use caparg_core::DeclarationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    /// Declaration file could not be read.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// The declared tree cannot be compiled.
    #[error("invalid declaration: {0}")]
    Declaration(#[from] DeclarationError),
}

pub type Result<T> = std::result::Result<T, CliError>;
