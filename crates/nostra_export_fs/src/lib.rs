//! `nostra_export_fs` v1:
//! Rust-side filesystem copy engine used to assemble build trees.
//!
//! Modules:
//! - `copy`    : traversal and copy orchestration (`copy_tree`, `copy_file`)
//! - `pattern` : exclude glob matching on entry names
//! - `spec`    : enums/options/errors
//! - `report`  : run-time report model
//! - `util`    : shared helper functions

pub mod copy;
pub mod pattern;
pub mod report;
pub mod spec;
mod util;

pub use copy::{copy_file, copy_tree};
pub use pattern::SpecExcludePatterns;
pub use report::{ReportCopy, ReportCopyBuilder};
pub use spec::{
    CopyTreeError, EnumCopyDirectoryConflictStrategy, EnumCopyFileConflictStrategy,
    EnumCopyMetadataMode, EnumCopySymlinkStrategy, SpecCopyFileOptions, SpecCopyOptions,
};
