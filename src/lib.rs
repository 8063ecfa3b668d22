//! # machconf - machine configuration workbook converter
//!
//! machconf turns structured configuration workbooks (motors, faults,
//! bypasses, buttons, module/machine topology) into the flat text-ID CSV
//! files consumed by the AWM automation system and the hierarchical JSON
//! consumed by the supervision layer, optionally enriched with recipe
//! names from an external SQLite store.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌───────────┐   ┌────────────┐   ┌───────────────┐
//! │ Workbook │──▶│ Extractor │──▶│  EM merge  │──▶│ CSV / JSON    │
//! │  (.xlsx) │   │ (tables)  │   │  (enrich)  │   │ encoders      │
//! └──────────┘   └───────────┘   └────────────┘   └───────────────┘
//!                                                        ▲
//!                                  ┌──────────────┐      │
//!                                  │ Recipe store │──────┘
//!                                  │  (SQLite)    │
//!                                  └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use machconf::{run_prod, ConsoleOperator, Language};
//! use std::path::Path;
//!
//! let mut op = ConsoleOperator::new();
//! let report = run_prod(Path::new("config.xlsx"), Path::new("out"),
//!                       Language::En, 1, &mut op)?;
//! println!("{} machines exported", report.machines);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - hierarchical error types
//! - [`models`] - domain models (Language, ModuleRegistry, Machine, Recipe)
//! - [`extract`] - workbook table discovery and record extraction
//! - [`transform`] - EM enrichment and the run pipelines
//! - [`export`] - text-ID CSV encoding and supervision JSON assembly
//! - [`store`] - external recipe store access
//! - [`prompt`] - operator interaction surface

// Core modules
pub mod error;
pub mod models;

// Extraction
pub mod extract;

// Transformation
pub mod transform;

// Encoders
pub mod export;

// External collaborators
pub mod prompt;
pub mod store;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{PipelineError, PromptError, StoreError, WorkbookError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{Language, Machine, ModuleConfig, ModuleEntry, ModuleRegistry, Recipe};

// =============================================================================
// Re-exports - Extraction
// =============================================================================

pub use extract::workbook::{discover_tables, open_tables, read_motors, read_prod, ProdData, TableKind, TableRef};
pub use extract::{rows_to_records, table_records, Record};

// =============================================================================
// Re-exports - Transformation
// =============================================================================

pub use transform::{apply_em, build_em_lookup, run_diag, run_prod, DiagReport, ProdReport};

// =============================================================================
// Re-exports - Encoders
// =============================================================================

pub use export::{
    build_channel_config, build_machines, export_buttons, export_bypasses, export_faults,
    export_motors, CsvExport,
};

// =============================================================================
// Re-exports - Store & Prompts
// =============================================================================

pub use prompt::{ask_language, ask_store, ask_workbook, ConsoleOperator, Operator};
pub use store::{fetch_recipe_rows, fold_recipes, RecipeRow};
