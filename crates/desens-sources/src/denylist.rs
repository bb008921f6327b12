use glob::Pattern;

/// File-name exclusions such as Office lock files (`~$*`)
pub struct Denylist {
    patterns: Vec<Pattern>,
}

impl Denylist {
    /// Invalid patterns are dropped with a warning
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let compiled = patterns
            .into_iter()
            .filter_map(|p| match Pattern::new(p.as_ref()) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    tracing::warn!(pattern = p.as_ref(), "Ignoring invalid exclude pattern: {}", e);
                    None
                }
            })
            .collect();

        Self { patterns: compiled }
    }

    /// Check a bare file name (no directories) against every pattern
    pub fn is_denied(&self, name: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.matches(name))
    }

    /// First matching pattern, for skip logs
    pub fn matching_pattern(&self, name: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|p| p.matches(name))
            .map(Pattern::as_str)
    }
}
