//! Export plan, step identifiers, report and errors.

use std::fmt;
use std::path::{Path, PathBuf};

use nostra_export_fs::{CopyTreeError, ReportCopy};
use thiserror::Error;

use crate::conf::{
    C_PATH_DIR_BUILD_CONFIG_DST, C_PATH_DIR_HEADER_SRC, C_PATH_DIR_INCLUDE_DST,
    C_PATH_DIR_PROJECT_DST, C_PATH_DIR_PROJECT_SRC, C_PATH_FILE_BUILD_CONFIG_SRC,
    TUP_PATTERNS_EXCLUDE_PROJECT,
};

/// The three export steps, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumExportStep {
    /// Header directory -> include directory.
    Headers,
    /// Project tree -> CMake project directory, with exclusions.
    ProjectTree,
    /// Build configuration file -> CMake directory.
    BuildConfig,
}

impl EnumExportStep {
    pub const ALL: [EnumExportStep; 3] = [Self::Headers, Self::ProjectTree, Self::BuildConfig];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Headers => "headers",
            Self::ProjectTree => "project-tree",
            Self::BuildConfig => "build-config",
        }
    }
}

impl fmt::Display for EnumExportStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source/destination layout of one export run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecExportPlan {
    pub path_dir_header_src: PathBuf,
    pub path_dir_include_dst: PathBuf,
    pub path_dir_project_src: PathBuf,
    pub path_dir_project_dst: PathBuf,
    pub path_file_build_config_src: PathBuf,
    pub path_dir_build_config_dst: PathBuf,
    /// Globs matched against entry names inside the project tree.
    pub patterns_exclude_project: Vec<String>,
}

impl Default for SpecExportPlan {
    fn default() -> Self {
        Self {
            path_dir_header_src: PathBuf::from(C_PATH_DIR_HEADER_SRC),
            path_dir_include_dst: PathBuf::from(C_PATH_DIR_INCLUDE_DST),
            path_dir_project_src: PathBuf::from(C_PATH_DIR_PROJECT_SRC),
            path_dir_project_dst: PathBuf::from(C_PATH_DIR_PROJECT_DST),
            path_file_build_config_src: PathBuf::from(C_PATH_FILE_BUILD_CONFIG_SRC),
            path_dir_build_config_dst: PathBuf::from(C_PATH_DIR_BUILD_CONFIG_DST),
            patterns_exclude_project: TUP_PATTERNS_EXCLUDE_PROJECT
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

impl SpecExportPlan {
    /// Join every relative path onto `path_dir_root`; absolute paths are kept.
    pub fn resolve(&self, path_dir_root: &Path) -> Self {
        Self {
            path_dir_header_src: path_dir_root.join(&self.path_dir_header_src),
            path_dir_include_dst: path_dir_root.join(&self.path_dir_include_dst),
            path_dir_project_src: path_dir_root.join(&self.path_dir_project_src),
            path_dir_project_dst: path_dir_root.join(&self.path_dir_project_dst),
            path_file_build_config_src: path_dir_root.join(&self.path_file_build_config_src),
            path_dir_build_config_dst: path_dir_root.join(&self.path_dir_build_config_dst),
            patterns_exclude_project: self.patterns_exclude_project.clone(),
        }
    }
}

/// Outcome of a successful export run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportExport {
    pub report_headers: ReportCopy,
    pub report_project: ReportCopy,
    /// Where the build configuration file was written.
    pub path_file_build_config_dst: PathBuf,
}

impl fmt::Display for ReportExport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.report_headers.format("[headers]"))?;
        writeln!(f, "{}", self.report_project.format("[project-tree]"))?;
        write!(
            f,
            "[build-config] {}",
            self.path_file_build_config_dst.display()
        )
    }
}

/// A failed export step; the run stops at the first one.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Export step `{step}` failed")]
    Step {
        step: EnumExportStep,
        #[source]
        source: CopyTreeError,
    },
}

impl ExportError {
    pub fn step(&self) -> EnumExportStep {
        match self {
            Self::Step { step, .. } => *step,
        }
    }

    pub fn copy_error(&self) -> &CopyTreeError {
        match self {
            Self::Step { source, .. } => source,
        }
    }
}
