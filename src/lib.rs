//! # cnj2csv - CNJ case-record JSON to denormalized CSV
//!
//! cnj2csv flattens the JSON dumps of one Brazilian court category into
//! wide, semicolon-delimited CSV rows, joining every case and movement
//! against the SGT reference tables (subjects, classes, movements) and
//! the auxiliary organ/municipality lookups.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │  SGT tables  │───▶│   Flatten    │───▶│   Extract    │───▶│  Output CSV  │
//! │ (raw ; CSVs) │    │ (hierarchy)  │    │ (JSON join)  │    │ (one/filter) │
//! └──────────────┘    └──────────────┘    └──────────────┘    └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cnj2csv::{run, ConvertOptions, CourtType};
//!
//! let summary = run(&ConvertOptions {
//!     root: "./data".into(),
//!     court: CourtType::JusticaTrabalho,
//!     subjects: vec![],
//! })?;
//! println!("Wrote {} rows", summary.rows);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error hierarchy
//! - [`models`] - Domain types and the output-row contract
//! - [`parser`] - Encoding-aware CSV input handling
//! - [`tables`] - Reference-table loading
//! - [`flatten`] - Hierarchy flattener
//! - [`extract`] - Record extractor
//! - [`writer`] - Output CSV writer
//! - [`pipeline`] - End-to-end orchestration

// Core modules
pub mod error;
pub mod models;

// Parsing and loading
pub mod parser;
pub mod tables;

// Transformation
pub mod extract;
pub mod flatten;

// Output
pub mod writer;

// Orchestration
pub mod pipeline;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{PipelineError, PipelineResult, ReferenceError, ReferenceResult};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    ClassRow, CourtType, Municipality, MovementRow, OutputRow, SubjectRow, OUTPUT_HEADER,
};

// =============================================================================
// Re-exports - Tables and Flattening
// =============================================================================

pub use flatten::{flatten_classes, flatten_movements, flatten_subjects};
pub use tables::{RefTables, SgtTable};

// =============================================================================
// Re-exports - Extraction and Output
// =============================================================================

pub use extract::extract_case;
pub use writer::RowWriter;

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use pipeline::{run, ConvertOptions, RunSummary};
