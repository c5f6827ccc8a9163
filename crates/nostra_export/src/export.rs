//! The three export steps and their strict sequence.

use std::path::{Path, PathBuf};

use nostra_export_fs::{ReportCopy, SpecCopyFileOptions, SpecCopyOptions, copy_file, copy_tree};
use tracing::info;

use crate::spec::{EnumExportStep, ExportError, ReportExport, SpecExportPlan};

/// Copy the header directory to the include directory, structure preserved.
pub fn export_headers(plan: &SpecExportPlan) -> Result<ReportCopy, ExportError> {
    let report = copy_tree(
        &plan.path_dir_header_src,
        &plan.path_dir_include_dst,
        SpecCopyOptions::default(),
    )
    .map_err(|source| ExportError::Step {
        step: EnumExportStep::Headers,
        source,
    })?;
    info!(
        "{} {} -> {}",
        report.format("[headers]"),
        plan.path_dir_header_src.display(),
        plan.path_dir_include_dst.display()
    );
    log_report_warnings(&report);
    Ok(report)
}

/// Copy the project tree, dropping entries that match the exclude globs.
pub fn export_project_tree(plan: &SpecExportPlan) -> Result<ReportCopy, ExportError> {
    let spec_cp_options = SpecCopyOptions {
        patterns_exclude: Some(plan.patterns_exclude_project.clone()),
        ..SpecCopyOptions::default()
    };
    let report = copy_tree(
        &plan.path_dir_project_src,
        &plan.path_dir_project_dst,
        spec_cp_options,
    )
    .map_err(|source| ExportError::Step {
        step: EnumExportStep::ProjectTree,
        source,
    })?;
    info!(
        "{} {} -> {}",
        report.format("[project-tree]"),
        plan.path_dir_project_src.display(),
        plan.path_dir_project_dst.display()
    );
    log_report_warnings(&report);
    Ok(report)
}

/// Copy the build configuration file into its (existing) destination directory.
pub fn export_build_config(plan: &SpecExportPlan) -> Result<PathBuf, ExportError> {
    let path_file_dst = copy_file(
        &plan.path_file_build_config_src,
        &plan.path_dir_build_config_dst,
        SpecCopyFileOptions::default(),
    )
    .map_err(|source| ExportError::Step {
        step: EnumExportStep::BuildConfig,
        source,
    })?;
    info!(
        "[build-config] {} -> {}",
        plan.path_file_build_config_src.display(),
        path_file_dst.display()
    );
    Ok(path_file_dst)
}

// Hard links and symlink loops are not failures; keep the default run silent.
fn log_report_warnings(report: &ReportCopy) {
    for warning in &report.warnings {
        info!("{warning}");
    }
}

/// Run headers, project tree and build config in that order against
/// `path_dir_root`. The first failing step ends the run; earlier output is
/// left in place.
pub fn run_export(
    path_dir_root: &Path,
    plan: &SpecExportPlan,
) -> Result<ReportExport, ExportError> {
    let plan = plan.resolve(path_dir_root);
    info!("exporting build files under {}", path_dir_root.display());

    let report_headers = export_headers(&plan)?;
    let report_project = export_project_tree(&plan)?;
    let path_file_build_config_dst = export_build_config(&plan)?;

    Ok(ReportExport {
        report_headers,
        report_project,
        path_file_build_config_dst,
    })
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use nostra_export_fs::CopyTreeError;

    use super::{export_build_config, export_headers, export_project_tree};
    use crate::spec::{EnumExportStep, SpecExportPlan};

    fn write_text(path: &Path, txt: &str) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(path, txt).expect("write text");
    }

    #[test]
    fn export_headers_keeps_sub_directories() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let plan = SpecExportPlan::default().resolve(tmp.path());
        write_text(
            &plan.path_dir_header_src.join("nostrautils/math/Vec3.hpp"),
            "vec3",
        );
        write_text(&plan.path_dir_header_src.join("NostraUtils.h"), "all");

        let report = export_headers(&plan).expect("export headers");
        assert_eq!(report.cnt_copied, 2);
        assert_eq!(
            std::fs::read_to_string(plan.path_dir_include_dst.join("nostrautils/math/Vec3.hpp"))
                .expect("read"),
            "vec3"
        );
    }

    #[test]
    fn export_headers_does_not_filter() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let plan = SpecExportPlan::default().resolve(tmp.path());
        write_text(&plan.path_dir_header_src.join("output/Gen.h"), "gen");

        export_headers(&plan).expect("export headers");
        assert!(plan.path_dir_include_dst.join("output/Gen.h").is_file());
    }

    #[test]
    fn export_project_tree_applies_plan_patterns() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let mut plan = SpecExportPlan::default().resolve(tmp.path());
        plan.patterns_exclude_project.push("*.user".to_string());
        write_text(&plan.path_dir_project_src.join("a.cpp"), "a");
        write_text(&plan.path_dir_project_src.join("a.user"), "u");
        write_text(&plan.path_dir_project_src.join("p.vcxproj"), "p");

        let report = export_project_tree(&plan).expect("export project");
        assert_eq!(report.cnt_excluded, 2);
        assert!(plan.path_dir_project_dst.join("a.cpp").is_file());
        assert!(!plan.path_dir_project_dst.join("a.user").exists());
    }

    #[test]
    fn export_build_config_needs_destination_directory() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let plan = SpecExportPlan::default().resolve(tmp.path());
        write_text(&plan.path_file_build_config_src, "cmake_minimum_required()");

        let err = export_build_config(&plan).expect_err("no CMake directory yet");
        assert_eq!(err.step(), EnumExportStep::BuildConfig);
        assert!(matches!(
            err.copy_error(),
            CopyTreeError::DestinationNotFound(_)
        ));

        std::fs::create_dir_all(&plan.path_dir_build_config_dst).expect("mkdir");
        let path_written = export_build_config(&plan).expect("export build config");
        assert_eq!(
            path_written,
            plan.path_dir_build_config_dst.join("CMakeLists.txt")
        );
    }
}
