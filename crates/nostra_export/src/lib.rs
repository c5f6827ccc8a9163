//! `nostra_export`:
//! assembles the distributable `BuildFiles/` tree of Nostra Utils.
//!
//! - `conf`   : fixed source/destination layout and exclude patterns
//! - `spec`   : export plan, step ids, report, errors
//! - `export` : the three steps and `run_export`
//! - `log`    : tracing subscriber setup for the binary

pub mod conf;
pub mod export;
pub mod log;
pub mod spec;

pub use export::{export_build_config, export_headers, export_project_tree, run_export};
pub use spec::{EnumExportStep, ExportError, ReportExport, SpecExportPlan};
