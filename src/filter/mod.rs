//! Message filter applied to every record before rendering
//!
//! The pattern is a regular expression searched anywhere in `record.data`.
//! It is compiled once when the adapter is built; an invalid pattern stops
//! the adapter from starting.

use crate::error::{ForwarderError, Result};
use crate::record::LogRecord;
use regex::Regex;

/// Pattern used when no filter is configured
pub const MATCH_ALL: &str = ".*?";

#[derive(Debug, Clone)]
pub struct FilterEngine {
    regex: Regex,
}

impl FilterEngine {
    /// Compile a filter pattern. An empty pattern matches every record.
    pub fn compile(pattern: &str) -> Result<Self> {
        let pattern = if pattern.is_empty() { MATCH_ALL } else { pattern };

        let regex = Regex::new(pattern).map_err(|source| ForwarderError::InvalidFilter {
            pattern: pattern.to_string(),
            source,
        })?;

        Ok(Self { regex })
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Whether the record should produce a notification
    ///
    /// Only `record.data` is inspected; records with empty data never match.
    pub fn matches(&self, record: &LogRecord) -> bool {
        if record.data.is_empty() {
            return false;
        }
        self.regex.is_match(&record.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ContainerInfo;

    #[test]
    fn test_default_matches_everything_non_empty() {
        let filter = FilterEngine::compile(MATCH_ALL).unwrap();
        assert!(filter.matches(&LogRecord::new("hello")));
        assert!(filter.matches(&LogRecord::new(" ")));
        assert!(filter.matches(&LogRecord::new("line one\nline two")));
    }

    #[test]
    fn test_empty_pattern_compiles_to_match_all() {
        let filter = FilterEngine::compile("").unwrap();
        assert_eq!(filter.pattern(), MATCH_ALL);
        assert!(filter.matches(&LogRecord::new("anything")));
    }

    #[test]
    fn test_empty_data_never_matches() {
        let filter = FilterEngine::compile("^$").unwrap();
        assert!(!filter.matches(&LogRecord::new("")));
    }

    #[test]
    fn test_pattern_is_unanchored_search() {
        let filter = FilterEngine::compile("error").unwrap();
        assert!(!filter.matches(&LogRecord::new("all good")));
        assert!(filter.matches(&LogRecord::new("error: disk full")));
        assert!(filter.matches(&LogRecord::new("fatal error occurred")));
    }

    #[test]
    fn test_only_data_is_inspected() {
        let filter = FilterEngine::compile("postgres").unwrap();
        let record = LogRecord::new("connection reset")
            .with_container(ContainerInfo::new("1", "postgres", "postgres:16"));
        assert!(!filter.matches(&record));
    }

    #[test]
    fn test_case_insensitive_flag() {
        let filter = FilterEngine::compile("(?i)warn|error").unwrap();
        assert!(filter.matches(&LogRecord::new("WARNING: low memory")));
        assert!(!filter.matches(&LogRecord::new("info: started")));
    }

    #[test]
    fn test_accepts_whatever_regex_accepts() {
        for pattern in [r"\w{40}", r"(?i)timeout after \d+ms", r"[\p{L}\p{N}]{20}"] {
            assert_eq!(
                FilterEngine::compile(pattern).is_ok(),
                Regex::new(pattern).is_ok(),
                "pattern {}",
                pattern
            );
        }
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let err = FilterEngine::compile("error(").unwrap_err();
        assert!(matches!(err, ForwarderError::InvalidFilter { .. }));
        assert!(err.is_construction_error());
        assert!(err.to_string().contains("error("));
    }
}
