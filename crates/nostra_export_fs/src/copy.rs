//! Filesystem tree traversal and copy orchestration.

use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::pattern::SpecExcludePatterns;
use crate::report::{ReportCopy, ReportCopyBuilder};
use crate::spec::{
    CopyTreeError, EnumCopyDirectoryConflictStrategy, EnumCopySymlinkStrategy,
    SpecCopyFileOptions, SpecCopyOptions,
};
use crate::util::{
    apply_metadata, copy_file_with_metadata, create_symbolic_link, derive_dir_identity,
    is_hard_linked, is_overlap, resolve_file_conflict,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EnumEntryKind {
    Dir,
    File,
    Symlink,
}

#[derive(Debug, Clone)]
struct SpecTreeEntry {
    path_src: PathBuf,
    name: OsString,
    kind: EnumEntryKind,
}

#[derive(Debug)]
struct SpecCopyContext {
    spec_cp_options: SpecCopyOptions,
    spec_ex_pats: SpecExcludePatterns,
    builder_cp_report: ReportCopyBuilder,
    /// Identities of the directories currently being walked (ancestor chain).
    set_active_dirs: HashSet<(u64, u64)>,
}

/// Copy a directory tree from `dir_source` to `dir_destination`.
///
/// Behavior is controlled by [`SpecCopyOptions`]:
/// - exclude globs tested against every entry name at every depth; an
///   excluded directory is not descended,
/// - destination conflict policy (fail when `dir_destination` exists, or merge),
/// - symlink handling (follow or recreate),
/// - which metadata is copied along with the bytes.
///
/// Missing parents of `dir_destination` are created. Entries are visited in
/// name order, directories before files. The first failure aborts the walk
/// and is returned as is; whatever was already written stays in place.
pub fn copy_tree<P, Q>(
    dir_source: P,
    dir_destination: Q,
    spec_cp_options: SpecCopyOptions,
) -> Result<ReportCopy, CopyTreeError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let path_dir_src = dir_source.as_ref().to_path_buf();
    let path_dir_dst = dir_destination.as_ref().to_path_buf();

    let spec_ex_pats = match spec_cp_options.patterns_exclude.as_deref() {
        Some(patterns) => SpecExcludePatterns::new(patterns)?,
        None => SpecExcludePatterns::empty(),
    };

    match fs::metadata(&path_dir_src) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => return Err(CopyTreeError::SourceNotDirectory(path_dir_src)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(CopyTreeError::SourceNotFound(path_dir_src));
        }
        Err(e) => return Err(CopyTreeError::from_io(path_dir_src, e)),
    }
    if is_overlap(&path_dir_src, &path_dir_dst) {
        return Err(CopyTreeError::SourceDestinationOverlap {
            source_dir: path_dir_src,
            destination_dir: path_dir_dst,
        });
    }
    if let Some(path_parent_dst) = path_dir_dst.parent()
        && !path_parent_dst.as_os_str().is_empty()
    {
        fs::create_dir_all(path_parent_dst)
            .map_err(|e| CopyTreeError::from_io(path_parent_dst, e))?;
    }

    debug!(
        "copy tree {} -> {} (exclude={:?})",
        path_dir_src.display(),
        path_dir_dst.display(),
        spec_ex_pats.patterns()
    );

    let mut spec_cp_ctx = SpecCopyContext {
        spec_cp_options,
        spec_ex_pats,
        builder_cp_report: ReportCopyBuilder::default(),
        set_active_dirs: HashSet::new(),
    };
    copy_directory(&path_dir_src, &path_dir_dst, &mut spec_cp_ctx)?;
    Ok(spec_cp_ctx.builder_cp_report.build())
}

/// Copy one regular file into the existing directory `dir_destination`,
/// keeping its file name.
///
/// Returns the path that was written (or kept, under the `Skip` rule).
pub fn copy_file<P, Q>(
    file_source: P,
    dir_destination: Q,
    spec_cp_file_options: SpecCopyFileOptions,
) -> Result<PathBuf, CopyTreeError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let path_file_src = file_source.as_ref();
    let path_dir_dst = dir_destination.as_ref();

    match fs::metadata(path_file_src) {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => return Err(CopyTreeError::SourceNotFile(path_file_src.to_path_buf())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(CopyTreeError::SourceNotFound(path_file_src.to_path_buf()));
        }
        Err(e) => return Err(CopyTreeError::from_io(path_file_src, e)),
    }
    match fs::metadata(path_dir_dst) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            return Err(CopyTreeError::DestinationNotDirectory(
                path_dir_dst.to_path_buf(),
            ));
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(CopyTreeError::DestinationNotFound(path_dir_dst.to_path_buf()));
        }
        Err(e) => return Err(CopyTreeError::from_io(path_dir_dst, e)),
    }

    let name_file = path_file_src
        .file_name()
        .ok_or_else(|| CopyTreeError::SourceNotFile(path_file_src.to_path_buf()))?;
    let path_file_dst = path_dir_dst.join(name_file);

    if !resolve_file_conflict(&path_file_dst, spec_cp_file_options.rule_conflict_file)? {
        debug!("keep existing {}", path_file_dst.display());
        return Ok(path_file_dst);
    }
    copy_file_with_metadata(
        path_file_src,
        &path_file_dst,
        spec_cp_file_options.rule_metadata,
    )
    .map_err(|e| CopyTreeError::from_io(&path_file_dst, e))?;
    debug!(
        "copied {} -> {}",
        path_file_src.display(),
        path_file_dst.display()
    );
    Ok(path_file_dst)
}

fn copy_directory(
    path_dir_src: &Path,
    path_dir_dst: &Path,
    spec_cp_ctx: &mut SpecCopyContext,
) -> Result<(), CopyTreeError> {
    let tuple_dir_identifier = derive_dir_identity(path_dir_src)?;
    if let Some(tuple_dir_identifier) = tuple_dir_identifier
        && !spec_cp_ctx.set_active_dirs.insert(tuple_dir_identifier)
    {
        spec_cp_ctx
            .builder_cp_report
            .add_warning(format!("Symlink loop detected: {}", path_dir_src.display()));
        return Ok(());
    }

    prepare_destination_dir(path_dir_dst, spec_cp_ctx)?;
    walk_directory(path_dir_src, path_dir_dst, spec_cp_ctx)?;
    apply_metadata(
        path_dir_src,
        path_dir_dst,
        spec_cp_ctx.spec_cp_options.rule_metadata,
    )
    .map_err(|e| CopyTreeError::from_io(path_dir_dst, e))?;

    if let Some(tuple_dir_identifier) = tuple_dir_identifier {
        spec_cp_ctx.set_active_dirs.remove(&tuple_dir_identifier);
    }
    Ok(())
}

fn prepare_destination_dir(
    path_dir_dst: &Path,
    spec_cp_ctx: &mut SpecCopyContext,
) -> Result<(), CopyTreeError> {
    match fs::create_dir(path_dir_dst) {
        Ok(()) => {
            spec_cp_ctx.builder_cp_report.add_dir_created();
            return Ok(());
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
        Err(e) => return Err(CopyTreeError::from_io(path_dir_dst, e)),
    }

    if spec_cp_ctx.spec_cp_options.rule_conflict_dir == EnumCopyDirectoryConflictStrategy::Error {
        return Err(CopyTreeError::DestinationExists(path_dir_dst.to_path_buf()));
    }
    let meta_dir_dst =
        fs::symlink_metadata(path_dir_dst).map_err(|e| CopyTreeError::from_io(path_dir_dst, e))?;
    if meta_dir_dst.file_type().is_symlink() {
        return Err(CopyTreeError::UnsafeDestination(path_dir_dst.to_path_buf()));
    }
    if !meta_dir_dst.is_dir() {
        return Err(CopyTreeError::DestinationNotDirectory(
            path_dir_dst.to_path_buf(),
        ));
    }
    trace!("merge into existing {}", path_dir_dst.display());
    Ok(())
}

fn walk_directory(
    path_dir_src: &Path,
    path_dir_dst: &Path,
    spec_cp_ctx: &mut SpecCopyContext,
) -> Result<(), CopyTreeError> {
    let mut l_dirs: Vec<SpecTreeEntry> = Vec::new();
    let mut l_files: Vec<SpecTreeEntry> = Vec::new();

    let iter_entries =
        fs::read_dir(path_dir_src).map_err(|e| CopyTreeError::from_io(path_dir_src, e))?;
    for entry_res in iter_entries {
        let entry = entry_res.map_err(|e| CopyTreeError::from_io(path_dir_src, e))?;
        let path_entry = entry.path();
        let name = entry.file_name();
        spec_cp_ctx.builder_cp_report.add_scanned();

        if spec_cp_ctx.spec_ex_pats.is_excluded(&name) {
            debug!("excluded {}", path_entry.display());
            spec_cp_ctx.builder_cp_report.add_excluded();
            continue;
        }

        let spec_entry = classify_entry(path_entry, name, spec_cp_ctx)?;
        match spec_entry.kind {
            EnumEntryKind::Dir => l_dirs.push(spec_entry),
            EnumEntryKind::File | EnumEntryKind::Symlink => l_files.push(spec_entry),
        }
    }

    l_dirs.sort_by(|a, b| a.name.cmp(&b.name));
    l_files.sort_by(|a, b| a.name.cmp(&b.name));

    for spec_dir_entry in l_dirs {
        let path_dir_dst_sub = path_dir_dst.join(&spec_dir_entry.name);
        copy_directory(&spec_dir_entry.path_src, &path_dir_dst_sub, spec_cp_ctx)?;
    }
    for spec_file_entry in l_files {
        let path_file_dst = path_dir_dst.join(&spec_file_entry.name);
        handle_file_entry(&spec_file_entry, &path_file_dst, spec_cp_ctx)?;
    }
    Ok(())
}

/// Sort an entry into dir/file/symlink, following links unless they are
/// recreated as links.
fn classify_entry(
    path_entry: PathBuf,
    name: OsString,
    spec_cp_ctx: &SpecCopyContext,
) -> Result<SpecTreeEntry, CopyTreeError> {
    let meta_entry =
        fs::symlink_metadata(&path_entry).map_err(|e| CopyTreeError::from_io(&path_entry, e))?;

    let meta_entry = if meta_entry.file_type().is_symlink() {
        match spec_cp_ctx.spec_cp_options.rule_symlink {
            EnumCopySymlinkStrategy::CopySymlinks => {
                return Ok(SpecTreeEntry {
                    path_src: path_entry,
                    name,
                    kind: EnumEntryKind::Symlink,
                });
            }
            EnumCopySymlinkStrategy::Dereference => match fs::metadata(&path_entry) {
                Ok(v) => v,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    return Err(CopyTreeError::BrokenSymlink(path_entry));
                }
                Err(e) => return Err(CopyTreeError::from_io(path_entry, e)),
            },
        }
    } else {
        meta_entry
    };

    let kind = if meta_entry.is_dir() {
        EnumEntryKind::Dir
    } else if meta_entry.is_file() {
        EnumEntryKind::File
    } else {
        return Err(CopyTreeError::SpecialFile(path_entry));
    };
    Ok(SpecTreeEntry {
        path_src: path_entry,
        name,
        kind,
    })
}

fn handle_file_entry(
    spec_file_entry: &SpecTreeEntry,
    path_file_dst: &Path,
    spec_cp_ctx: &mut SpecCopyContext,
) -> Result<(), CopyTreeError> {
    let path_file_src = &spec_file_entry.path_src;
    if !resolve_file_conflict(path_file_dst, spec_cp_ctx.spec_cp_options.rule_conflict_file)? {
        debug!("keep existing {}", path_file_dst.display());
        spec_cp_ctx.builder_cp_report.add_skipped();
        return Ok(());
    }

    if spec_file_entry.kind == EnumEntryKind::Symlink {
        if fs::symlink_metadata(path_file_dst).is_ok() {
            fs::remove_file(path_file_dst).map_err(|e| CopyTreeError::from_io(path_file_dst, e))?;
        }
        create_symbolic_link(path_file_src, path_file_dst)
            .map_err(|e| CopyTreeError::from_io(path_file_dst, e))?;
        trace!("linked {}", path_file_dst.display());
        spec_cp_ctx.builder_cp_report.add_copied();
        return Ok(());
    }

    if is_hard_linked(path_file_src) {
        spec_cp_ctx.builder_cp_report.add_warning(format!(
            "Hard link detected: {}",
            path_file_src.display()
        ));
    }
    copy_file_with_metadata(
        path_file_src,
        path_file_dst,
        spec_cp_ctx.spec_cp_options.rule_metadata,
    )
    .map_err(|e| CopyTreeError::from_io(path_file_dst, e))?;
    trace!("copied {}", path_file_dst.display());
    spec_cp_ctx.builder_cp_report.add_copied();
    Ok(())
}
