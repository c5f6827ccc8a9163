use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::spec::{CopyTreeError, EnumCopyFileConflictStrategy, EnumCopyMetadataMode};

////////////////////////////////////////////////////////////////////////////////
// #region PathUtilities

fn _absolutize_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(path)
}

fn _normalize_lexically(path: &Path) -> PathBuf {
    let mut path_out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                path_out.pop();
            }
            Component::CurDir => {}
            other => path_out.push(other.as_os_str()),
        }
    }
    path_out
}

/// Resolve `path` as far as it exists on disk, then append the remainder
/// (the destination usually does not exist yet).
fn _normalize_path(path: &Path) -> PathBuf {
    if let Ok(resolved) = fs::canonicalize(path) {
        return resolved;
    }

    let path_abs = _normalize_lexically(&_absolutize_path(path));
    let mut path_existing = path_abs.as_path();
    let mut l_tail = Vec::new();
    while !path_existing.exists() {
        let (Some(parent), Some(name)) = (path_existing.parent(), path_existing.file_name()) else {
            break;
        };
        l_tail.push(name.to_os_string());
        path_existing = parent;
    }

    let mut path_resolved =
        fs::canonicalize(path_existing).unwrap_or_else(|_| path_existing.to_path_buf());
    for name in l_tail.into_iter().rev() {
        path_resolved.push(name);
    }
    path_resolved
}

pub(crate) fn is_overlap(src: &Path, dst: &Path) -> bool {
    let src_resolved = _normalize_path(src);
    let dst_resolved = _normalize_path(dst);
    dst_resolved.starts_with(&src_resolved) || src_resolved.starts_with(&dst_resolved)
}

/// Device/inode pair of the directory `path` points to (following links).
#[cfg(unix)]
pub(crate) fn derive_dir_identity(path: &Path) -> Result<Option<(u64, u64)>, CopyTreeError> {
    use std::os::unix::fs::MetadataExt;

    let stat_dir = fs::metadata(path).map_err(|e| CopyTreeError::from_io(path, e))?;
    Ok(Some((stat_dir.dev(), stat_dir.ino())))
}

#[cfg(not(unix))]
pub(crate) fn derive_dir_identity(_path: &Path) -> Result<Option<(u64, u64)>, CopyTreeError> {
    Ok(None)
}

/// Decide whether `path_dst` may be written.
///
/// Returns `Ok(false)` when the conflict rule says to keep the existing file.
pub(crate) fn resolve_file_conflict(
    path_dst: &Path,
    rule_conflict: EnumCopyFileConflictStrategy,
) -> Result<bool, CopyTreeError> {
    let meta_dst = match fs::symlink_metadata(path_dst) {
        Ok(v) => v,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(true),
        Err(e) => return Err(CopyTreeError::from_io(path_dst, e)),
    };
    if meta_dst.file_type().is_symlink() {
        return Err(CopyTreeError::UnsafeDestination(path_dst.to_path_buf()));
    }
    if meta_dst.is_dir() {
        return Err(CopyTreeError::DestinationExists(path_dst.to_path_buf()));
    }

    match rule_conflict {
        EnumCopyFileConflictStrategy::Skip => Ok(false),
        EnumCopyFileConflictStrategy::Overwrite => Ok(true),
        EnumCopyFileConflictStrategy::Error => {
            Err(CopyTreeError::DestinationExists(path_dst.to_path_buf()))
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region CopyPrimitives

pub(crate) fn create_symbolic_link(path_src: &Path, path_dst: &Path) -> Result<(), io::Error> {
    let target = fs::read_link(path_src)?;

    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(&target, path_dst)
    }
    #[cfg(windows)]
    {
        use std::os::windows::fs::{symlink_dir, symlink_file};
        if path_src.is_dir() {
            symlink_dir(&target, path_dst)
        } else {
            symlink_file(&target, path_dst)
        }
    }
    #[cfg(not(any(unix, windows)))]
    {
        let _ = (target, path_dst);
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "Symbolic links are unsupported on this platform",
        ))
    }
}

pub(crate) fn copy_file_with_metadata(
    path_file_src: &Path,
    path_file_dst: &Path,
    rule_metadata: EnumCopyMetadataMode,
) -> Result<(), io::Error> {
    fs::copy(path_file_src, path_file_dst)?;
    apply_metadata(path_file_src, path_file_dst, rule_metadata)
}

/// Copy metadata of `path_src` onto an already populated `path_dst`.
///
/// For directories this must run after all children were written, otherwise
/// the copied modification time is bumped again.
pub(crate) fn apply_metadata(
    path_src: &Path,
    path_dst: &Path,
    rule_metadata: EnumCopyMetadataMode,
) -> Result<(), io::Error> {
    use filetime::{FileTime, set_file_times};

    let stat_src = fs::metadata(path_src)?;
    if rule_metadata == EnumCopyMetadataMode::Full {
        #[cfg(target_os = "linux")]
        copy_xattrs_linux(path_src, path_dst);

        let file_time_access = FileTime::from_last_access_time(&stat_src);
        let file_time_modify = FileTime::from_last_modification_time(&stat_src);
        set_file_times(path_dst, file_time_access, file_time_modify)?;
    }
    fs::set_permissions(path_dst, stat_src.permissions())
}

/// Best effort: filesystems without xattr support are silently ignored.
#[cfg(target_os = "linux")]
fn copy_xattrs_linux(path_src: &Path, path_dst: &Path) {
    let iter_xattr_names = match xattr::list(path_src) {
        Ok(v) => v,
        Err(_) => return,
    };

    for name in iter_xattr_names {
        let Some(raw_value) = xattr::get(path_src, &name).ok().flatten() else {
            continue;
        };
        let _ = xattr::set(path_dst, &name, &raw_value);
    }
}

/// Whether a regular file shares its inode with other names.
#[cfg(target_os = "linux")]
pub(crate) fn is_hard_linked(path_file: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    fs::symlink_metadata(path_file).is_ok_and(|stat| stat.is_file() && stat.nlink() > 1)
}

#[cfg(not(target_os = "linux"))]
pub(crate) fn is_hard_linked(_path_file: &Path) -> bool {
    false
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
