//! Error types for the machconf pipeline.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`WorkbookError`] - workbook opening / table access errors (fatal)
//! - [`StoreError`] - recipe store errors (fatal)
//! - [`PromptError`] - operator input errors
//! - [`PipelineError`] - top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.
//!
//! Per-record problems (unparsable fault code, missing gearbox, unchecked
//! bypass) are *not* errors: they are skip notices collected by the export
//! routines so a single bad row never aborts a run.

use thiserror::Error;

// =============================================================================
// Workbook Errors
// =============================================================================

/// Errors while opening or reading the input workbook.
///
/// Any of these means the source is unusable and the run must abort.
#[derive(Debug, Error)]
pub enum WorkbookError {
    /// Failed to read the file.
    #[error("Failed to read workbook: {0}")]
    Io(#[from] std::io::Error),

    /// The spreadsheet library rejected the file or a cell access.
    #[error("Workbook format error: {0}")]
    Xlsx(#[from] calamine::XlsxError),
}

// =============================================================================
// Recipe Store Errors
// =============================================================================

/// Errors from the external recipe store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite open or query failure.
    #[error("Recipe store error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

// =============================================================================
// Prompt Errors
// =============================================================================

/// Errors while reading operator input.
#[derive(Debug, Error)]
pub enum PromptError {
    /// Stdin read failure.
    #[error("Failed to read operator input: {0}")]
    Io(#[from] std::io::Error),

    /// Input closed (EOF) while an answer was still required. Without this
    /// a re-prompting loop would spin forever on a non-interactive run.
    #[error("Operator input closed before an answer was given")]
    ClosedInput,
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline orchestration errors.
///
/// This is the main error type returned by [`crate::transform::pipeline`]
/// entry points. It wraps all lower-level errors and adds output-side
/// variants.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Workbook error.
    #[error("Workbook error: {0}")]
    Workbook(#[from] WorkbookError),

    /// Recipe store error.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Operator input error.
    #[error("Prompt error: {0}")]
    Prompt(#[from] PromptError),

    /// Failed to write an output file.
    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for workbook operations.
pub type WorkbookResult<T> = Result<T, WorkbookError>;

/// Result type for recipe store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type for operator prompts.
pub type PromptResult<T> = Result<T, PromptError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
