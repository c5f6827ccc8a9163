//! Fixed export layout: every path is relative to the export root.

/// Header directory copied verbatim to [`C_PATH_DIR_INCLUDE_DST`].
pub const C_PATH_DIR_HEADER_SRC: &str = "Nostra Utils/src/header";
/// Destination of the header copy.
pub const C_PATH_DIR_INCLUDE_DST: &str = "BuildFiles/include";
/// Project tree copied with [`TUP_PATTERNS_EXCLUDE_PROJECT`] applied.
pub const C_PATH_DIR_PROJECT_SRC: &str = "Nostra Utils";
/// Destination of the filtered project copy.
pub const C_PATH_DIR_PROJECT_DST: &str = "BuildFiles/CMake/Nostra Utils";
/// Solution level build configuration.
pub const C_PATH_FILE_BUILD_CONFIG_SRC: &str = "CMakeLists.txt";
/// Directory receiving the build configuration file.
pub const C_PATH_DIR_BUILD_CONFIG_DST: &str = "BuildFiles/CMake";

/// Entry names dropped from the project copy, at any depth.
pub const TUP_PATTERNS_EXCLUDE_PROJECT: [&str; 2] = ["*.vcxproj*", "output"];
