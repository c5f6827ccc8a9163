//! Copy specification models and top-level error types.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////
// #region EnumsInit

/// Symlink handling policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumCopySymlinkStrategy {
    /// Follow the link and copy the target bytes/entries.
    Dereference,
    /// Create a symbolic link at destination (do not copy target bytes).
    CopySymlinks,
}

/// Existing destination file conflict policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumCopyFileConflictStrategy {
    /// Keep destination file and skip current source file.
    Skip,
    /// Replace destination file with source file.
    Overwrite,
    /// Abort with [`CopyTreeError::DestinationExists`].
    Error,
}

/// Existing destination directory conflict policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumCopyDirectoryConflictStrategy {
    /// Reuse destination directory and continue copying children into it.
    Merge,
    /// Abort with [`CopyTreeError::DestinationExists`].
    Error,
}

/// Which source metadata is applied to a copied entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumCopyMetadataMode {
    /// Permission bits only.
    Permissions,
    /// Permission bits, access/modification times and (Linux) extended attributes.
    Full,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region StructsAndErrors

/// Input options for `copy_tree`.
#[derive(Debug, Clone)]
pub struct SpecCopyOptions {
    /// Exclude glob patterns applied to the basename of every entry.
    pub patterns_exclude: Option<Vec<String>>,
    /// Symlink handling behavior.
    pub rule_symlink: EnumCopySymlinkStrategy,
    /// Behavior when the destination root or a sub directory already exists.
    pub rule_conflict_dir: EnumCopyDirectoryConflictStrategy,
    /// Behavior for existing destination files (only reachable when merging).
    pub rule_conflict_file: EnumCopyFileConflictStrategy,
    /// Metadata applied to copied files and directories.
    pub rule_metadata: EnumCopyMetadataMode,
}

impl Default for SpecCopyOptions {
    fn default() -> Self {
        Self {
            patterns_exclude: None,
            rule_symlink: EnumCopySymlinkStrategy::Dereference,
            rule_conflict_dir: EnumCopyDirectoryConflictStrategy::Error,
            rule_conflict_file: EnumCopyFileConflictStrategy::Error,
            rule_metadata: EnumCopyMetadataMode::Full,
        }
    }
}

/// Input options for `copy_file`.
#[derive(Debug, Clone)]
pub struct SpecCopyFileOptions {
    /// Behavior when the target file already exists.
    pub rule_conflict_file: EnumCopyFileConflictStrategy,
    /// Metadata applied to the copied file.
    pub rule_metadata: EnumCopyMetadataMode,
}

impl Default for SpecCopyFileOptions {
    fn default() -> Self {
        Self {
            rule_conflict_file: EnumCopyFileConflictStrategy::Overwrite,
            rule_metadata: EnumCopyMetadataMode::Permissions,
        }
    }
}

/// Copy failures. The first one raised aborts the whole call.
#[derive(Debug, Error)]
pub enum CopyTreeError {
    /// Invalid exclude pattern.
    #[error("Invalid exclude pattern `{pattern}`: {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Source does not exist: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Source is not a directory: {}", .0.display())]
    SourceNotDirectory(PathBuf),

    #[error("Source is not a regular file: {}", .0.display())]
    SourceNotFile(PathBuf),

    /// Source and destination overlap (`src` contains `dst` or vice versa).
    #[error(
        "Source and destination directories overlap: {} <-> {}",
        .source_dir.display(),
        .destination_dir.display()
    )]
    SourceDestinationOverlap {
        /// Normalized source directory.
        source_dir: PathBuf,
        /// Normalized destination directory.
        destination_dir: PathBuf,
    },

    #[error("Destination exists: {}", .0.display())]
    DestinationExists(PathBuf),

    #[error("Destination does not exist: {}", .0.display())]
    DestinationNotFound(PathBuf),

    #[error("Destination is not a directory: {}", .0.display())]
    DestinationNotDirectory(PathBuf),

    /// Existing destination entry is a symlink and would redirect writes.
    #[error("Unsafe destination path is an existing symlink: {}", .0.display())]
    UnsafeDestination(PathBuf),

    #[error("Broken symlink: {}", .0.display())]
    BrokenSymlink(PathBuf),

    /// Socket, FIFO or device node.
    #[error("Special file cannot be copied: {}", .0.display())]
    SpecialFile(PathBuf),

    #[error("Permission denied: {}", .path.display())]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("IO error at {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CopyTreeError {
    /// Wrap an IO error raised while touching `path`.
    pub fn from_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path, source },
            _ => Self::Io { path, source },
        }
    }

    /// Path the failure is attached to.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::InvalidPattern { .. } => None,
            Self::SourceDestinationOverlap { source_dir, .. } => Some(source_dir.as_path()),
            Self::SourceNotFound(path)
            | Self::SourceNotDirectory(path)
            | Self::SourceNotFile(path)
            | Self::DestinationExists(path)
            | Self::DestinationNotFound(path)
            | Self::DestinationNotDirectory(path)
            | Self::UnsafeDestination(path)
            | Self::BrokenSymlink(path)
            | Self::SpecialFile(path) => Some(path.as_path()),
            Self::PermissionDenied { path, .. } | Self::Io { path, .. } => Some(path.as_path()),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
