//! Paths excluded from request metrics

use crate::utils::error::Result;
use regex::Regex;

/// Exact paths, `*`-suffixed prefixes and regex patterns
#[derive(Debug, Clone, Default)]
pub struct PathExclusions {
    exact: Vec<String>,
    prefixes: Vec<String>,
    patterns: Vec<Regex>,
}

impl PathExclusions {
    pub fn new(paths: &[String], patterns: &[String]) -> Result<Self> {
        let mut exact = Vec::new();
        let mut prefixes = Vec::new();
        for path in paths {
            match path.strip_suffix('*') {
                Some(prefix) => prefixes.push(prefix.to_string()),
                None => exact.push(path.clone()),
            }
        }

        let patterns = patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            exact,
            prefixes,
            patterns,
        })
    }

    pub fn is_excluded(&self, path: &str) -> bool {
        self.exact.iter().any(|p| p == path)
            || self.prefixes.iter().any(|p| path.starts_with(p.as_str()))
            || self.patterns.iter().any(|re| re.is_match(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_prefix_and_pattern() {
        let exclusions = PathExclusions::new(
            &["/health/live".to_string(), "/static/*".to_string()],
            &[r"^/internal/\d+$".to_string()],
        )
        .unwrap();

        assert!(exclusions.is_excluded("/health/live"));
        assert!(!exclusions.is_excluded("/health/live/extra"));
        assert!(exclusions.is_excluded("/static/app.js"));
        assert!(exclusions.is_excluded("/internal/42"));
        assert!(!exclusions.is_excluded("/internal/abc"));
        assert!(!exclusions.is_excluded("/api/users"));
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(PathExclusions::new(&[], &["(".to_string()]).is_err());
    }
}
