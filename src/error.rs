//! Error types for the conversion pipeline.
//!
//! Two layers, following the shape of the rest of the crate:
//!
//! - [`ReferenceError`] - loading and flattening reference tables
//! - [`PipelineError`] - top-level orchestration
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// Reference Table Errors
// =============================================================================

/// Errors while loading or flattening the SGT/IBGE/serventias tables.
#[derive(Debug, Error)]
pub enum ReferenceError {
    /// Failed to read a reference file.
    #[error("Failed to read reference file: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV in a reference table.
    #[error("Invalid reference CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is missing from a reference table.
    #[error("Reference table {file} has no '{column}' column")]
    MissingColumn { file: String, column: String },

    /// A code cell could not be parsed as an integer.
    #[error("Reference table {file}: cannot parse code '{value}'")]
    BadCode { file: String, value: String },

    /// A parent pointer references a code absent from the table.
    #[error("Unknown code {code} referenced as a parent")]
    UnknownCode { code: i64 },

    /// The parent chain of a code never reaches a root.
    #[error("Cycle detected in the parent chain of code {code}")]
    Cycle { code: i64 },
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level orchestration errors.
///
/// This is the main error type returned by [`crate::pipeline::run`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Reference table error.
    #[error("Reference error: {0}")]
    Reference(#[from] ReferenceError),

    /// IO error on inputs or outputs.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A case-record file is not valid JSON or not an array of records.
    #[error("Invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Failure writing an output CSV.
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    /// The JSON discovery pattern could not be built.
    #[error("Invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for reference table operations.
pub type ReferenceResult<T> = Result<T, ReferenceError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // ReferenceError -> PipelineError
        let ref_err = ReferenceError::UnknownCode { code: 42 };
        let pipeline_err: PipelineError = ref_err.into();
        assert!(pipeline_err.to_string().contains("42"));

        // io::Error -> ReferenceError
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let ref_err: ReferenceError = io_err.into();
        assert!(ref_err.to_string().contains("gone"));
    }

    #[test]
    fn test_missing_column_format() {
        let err = ReferenceError::MissingColumn {
            file: "sgt_assuntos.csv".into(),
            column: "cod_pai".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("sgt_assuntos.csv"));
        assert!(msg.contains("cod_pai"));
    }
}
