//! Transformation module.
//!
//! - Enrich: EM description merge into bypass/button records
//! - Pipeline: full production and diagnostic runs

pub mod enrich;
pub mod pipeline;

pub use enrich::{apply_em, build_em_lookup, EmLookup};
pub use pipeline::{run_diag, run_prod, DiagReport, ProdReport};
