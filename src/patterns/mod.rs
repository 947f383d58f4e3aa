// patterns/mod.rs
pub mod brace;
pub mod cache;
pub mod micromatch;

use crate::error::FsError;
use globset::GlobSet;

/// Compiled patterns for efficient matching against paths
///
/// This struct combines both glob patterns and regex patterns
/// for flexible and efficient path matching.
#[derive(Clone)]
pub struct Patterns {
    pub set: GlobSet,
    pub regexes: Vec<regex::Regex>,
}

impl Patterns {
    /// Compiles a single pattern into a Patterns instance.
    ///
    /// Handles brace expansion, explicit `re:`-prefixed regexes, and
    /// converts complex glob features (extglob, character classes) to
    /// regex when necessary.
    ///
    /// # Errors
    ///
    /// Returns `FsError::BadGlob`/`FsError::BadPattern` for malformed
    /// patterns, or `FsError::BraceExpansionDepth`/`BraceExpansionCount`
    /// if brace expansion exceeds its guard rails.
    pub fn compile(pattern: &str) -> Result<Self, FsError> {
        Self::compile_many([pattern])
    }

    /// Compiles multiple patterns into a single `Patterns` instance.
    pub fn compile_many<I, S>(patterns: I) -> Result<Self, FsError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = globset::GlobSetBuilder::new();
        let mut regexes = Vec::new();

        for pattern in patterns {
            let pattern_str = pattern.as_ref().trim();
            if pattern_str.is_empty() {
                continue;
            }

            Self::process_pattern(pattern_str, &mut builder, &mut regexes)?;
        }

        let set = builder.build().map_err(FsError::BadGlob)?;

        Ok(Self { set, regexes })
    }

    /// Processes a single pattern, handling brace expansion and type detection
    fn process_pattern(
        pattern: &str,
        builder: &mut globset::GlobSetBuilder,
        regexes: &mut Vec<regex::Regex>,
    ) -> Result<(), FsError> {
        // Check if brace expansion is needed
        let expanded_patterns = if pattern.contains('{') && pattern.contains('}') {
            brace::expand(pattern)?
        } else {
            vec![pattern.to_string()]
        };

        for expanded in expanded_patterns {
            // Handle explicit regex patterns (prefixed with "re:")
            if let Some(regex_pattern) = expanded.strip_prefix("re:") {
                let re = cache::get_or_compile_regex(regex_pattern)?;
                regexes.push(re);
                continue;
            }

            // Determine if pattern requires regex conversion
            if Self::is_complex_pattern(&expanded) {
                // Convert complex patterns to regex
                let regex_pattern = micromatch::micromatch_to_regex(&expanded)?;
                let re = cache::get_or_compile_regex(&regex_pattern)?;
                regexes.push(re);
            } else {
                // Process as regular glob pattern
                Self::add_glob_pattern(&expanded, builder)?;
            }
        }

        Ok(())
    }

    /// Checks if a pattern contains advanced glob features requiring regex
    fn is_complex_pattern(pattern: &str) -> bool {
        // Check for extended glob features that require regex conversion
        pattern.contains('@')
            || pattern.contains('!')
            || pattern.contains('+')
            || pattern.contains('?')
            || pattern.contains('(')
            || pattern.contains(')')
            || pattern.contains('[')
            || pattern.contains(']')
            || pattern.contains('{')
            || pattern.contains('}')
            || pattern.contains('|')
    }

    /// Adds a glob pattern to the globset builder
    fn add_glob_pattern(
        pattern: &str,
        builder: &mut globset::GlobSetBuilder,
    ) -> Result<(), FsError> {
        let glob = globset::Glob::new(pattern).map_err(FsError::BadGlob)?;

        builder.add(glob);
        Ok(())
    }

    /// Checks if a relative path matches any of the compiled patterns.
    pub fn is_match(&self, relative_path: &str) -> bool {
        // First check globset (usually faster)
        if !self.set.is_empty() && self.set.is_match(relative_path) {
            return true;
        }

        // Then check regexes
        for re in &self.regexes {
            if re.is_match(relative_path) {
                return true;
            }
        }

        false
    }
}

/// Returns cache metrics for both glob and regex caches
pub fn cache_metrics() -> (cache::CacheMetrics, cache::CacheMetrics) {
    (cache::glob_cache_metrics(), cache::regex_cache_metrics())
}
