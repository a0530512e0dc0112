//! Exclude pattern set
//!
//! An ordered list of compiled regular expressions matched against the
//! source-relative path of each discovered file. Any match excludes the
//! file; the first matching pattern is reported for logging.

use regex::Regex;

use super::errors::DomainError;

/// Ordered set of compiled exclude patterns
#[derive(Debug, Clone, Default)]
pub struct ExcludeSet {
    patterns: Vec<Regex>,
}

impl ExcludeSet {
    /// Compiles every pattern, in order
    ///
    /// # Errors
    /// Returns `DomainError::InvalidPattern` for the first pattern that
    /// fails to compile
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, DomainError> {
        let patterns = patterns
            .iter()
            .map(|p| {
                Regex::new(p.as_ref()).map_err(|e| DomainError::InvalidPattern {
                    pattern: p.as_ref().to_string(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Wraps patterns that were already compiled (e.g. by the CLI parser)
    pub fn from_compiled(patterns: Vec<Regex>) -> Self {
        Self { patterns }
    }

    /// Returns the first pattern matching `path`, if any
    pub fn first_match(&self, path: &str) -> Option<&Regex> {
        self.patterns.iter().find(|re| re.is_match(path))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
