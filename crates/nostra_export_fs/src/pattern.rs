//! Exclude-pattern matching on entry basenames.
//!
//! Kept free of filesystem access so callers can check what a copy would
//! drop without touching a tree.

use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::spec::CopyTreeError;

/// Compiled set of shell-like exclude globs (`*`, `?`, character classes).
///
/// Patterns are matched against one path segment (an entry name), never
/// against a full relative path, so a plain name such as `output` excludes
/// every entry called `output` at any depth.
#[derive(Debug, Clone)]
pub struct SpecExcludePatterns {
    patterns: Vec<String>,
    glob_set: GlobSet,
}

impl SpecExcludePatterns {
    /// Compile `patterns`; the first invalid one is returned as
    /// [`CopyTreeError::InvalidPattern`].
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, CopyTreeError> {
        let mut builder_glob_set = GlobSetBuilder::new();
        let mut l_patterns = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let glob = Glob::new(pattern).map_err(|e| CopyTreeError::InvalidPattern {
                pattern: pattern.to_string(),
                message: e.kind().to_string(),
            })?;
            builder_glob_set.add(glob);
            l_patterns.push(pattern.to_string());
        }
        let glob_set = builder_glob_set
            .build()
            .map_err(|e| CopyTreeError::InvalidPattern {
                pattern: e.glob().unwrap_or_default().to_string(),
                message: e.kind().to_string(),
            })?;
        Ok(Self {
            patterns: l_patterns,
            glob_set,
        })
    }

    /// Matcher that excludes nothing.
    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
            glob_set: GlobSet::empty(),
        }
    }

    /// Source patterns in insertion order.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Whether an entry called `name` must be skipped.
    pub fn is_excluded(&self, name: impl AsRef<Path>) -> bool {
        !self.patterns.is_empty() && self.glob_set.is_match(name.as_ref())
    }

    /// Patterns matching `name`, in insertion order.
    pub fn matching_patterns(&self, name: impl AsRef<Path>) -> Vec<&str> {
        self.glob_set
            .matches(name.as_ref())
            .into_iter()
            .map(|idx| self.patterns[idx].as_str())
            .collect()
    }
}

impl Default for SpecExcludePatterns {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::SpecExcludePatterns;
    use crate::spec::CopyTreeError;

    fn project_patterns() -> SpecExcludePatterns {
        SpecExcludePatterns::new(&["*.vcxproj*", "output"]).expect("compile patterns")
    }

    #[test]
    fn vcxproj_family_is_excluded() {
        let spec_ex_pats = project_patterns();
        assert!(spec_ex_pats.is_excluded("Nostra Utils.vcxproj"));
        assert!(spec_ex_pats.is_excluded("Nostra Utils.vcxproj.filters"));
        assert!(spec_ex_pats.is_excluded("Nostra Utils.vcxproj.user"));
        assert!(spec_ex_pats.is_excluded(".vcxproj"));
    }

    #[test]
    fn output_matches_exact_name_only() {
        let spec_ex_pats = project_patterns();
        assert!(spec_ex_pats.is_excluded("output"));
        assert!(!spec_ex_pats.is_excluded("output2"));
        assert!(!spec_ex_pats.is_excluded("my_output"));
        assert!(!spec_ex_pats.is_excluded("Output"));
    }

    #[test]
    fn ordinary_sources_are_kept() {
        let spec_ex_pats = project_patterns();
        for name in ["CMakeLists.txt", "Matrix.cpp", "Vec3.hpp", "src", "header", "vcxproj"] {
            assert!(!spec_ex_pats.is_excluded(name), "{name} must be kept");
        }
    }

    #[test]
    fn question_mark_and_class_globs() {
        let spec_ex_pats = SpecExcludePatterns::new(&["file?.txt", "build[0-9]"]).expect("compile");
        assert!(spec_ex_pats.is_excluded("file1.txt"));
        assert!(!spec_ex_pats.is_excluded("file10.txt"));
        assert!(spec_ex_pats.is_excluded("build7"));
        assert!(!spec_ex_pats.is_excluded("buildx"));
    }

    #[test]
    fn matching_patterns_reports_every_hit() {
        let spec_ex_pats = SpecExcludePatterns::new(&["*.user", "*.vcxproj*"]).expect("compile");
        let mut l_hits = spec_ex_pats.matching_patterns("a.vcxproj.user");
        l_hits.sort_unstable();
        assert_eq!(l_hits, vec!["*.user", "*.vcxproj*"]);
        assert!(spec_ex_pats.matching_patterns("a.cpp").is_empty());
    }

    #[test]
    fn empty_set_excludes_nothing() {
        let spec_ex_pats = SpecExcludePatterns::empty();
        assert!(spec_ex_pats.is_empty());
        assert!(!spec_ex_pats.is_excluded("output"));
        assert!(!spec_ex_pats.is_excluded(""));
    }

    #[test]
    fn invalid_glob_rejected() {
        let err = SpecExcludePatterns::new(&["["]).expect_err("unclosed class must fail");
        match err {
            CopyTreeError::InvalidPattern { pattern, .. } => assert_eq!(pattern, "["),
            other => panic!("unexpected error: {other}"),
        }
    }
}
