//! Error types for code generation.

use thiserror::Error;

/// Error type for code generation operations.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Model or configuration document parsing error.
    #[error("parse error: {0}")]
    Parse(#[from] fluentgen_model::ParseError),

    /// Model lookup or validation error.
    #[error("model error: {0}")]
    Model(#[from] fluentgen_model::ModelError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A fully written temporary file could not be moved into place.
    #[error("failed to persist generated file: {0}")]
    Persist(#[from] tempfile::PersistError),
}
