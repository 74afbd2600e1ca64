//! Path prefix matching.
//!
//! # Design Decisions
//! - Matching is ASCII case-insensitive, like Express's default router
//! - A prefix only matches on a segment boundary: `/api/users` matches
//!   `/api/users` and `/api/users/7`, never `/api/usersettings`
//! - No regex to guarantee O(n) matching

/// Matches the request path against a mount prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    /// Create a new path prefix matcher. A trailing slash is ignored.
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let trimmed = prefix.trim_end_matches('/');
        Self {
            prefix: if trimmed.is_empty() {
                "/".to_string()
            } else {
                trimmed.to_string()
            },
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn matches(&self, path: &str) -> bool {
        if self.prefix == "/" {
            return path.starts_with('/');
        }
        self.remainder(path).is_some()
    }

    /// The part of `path` after the prefix, when it matches.
    pub fn remainder<'a>(&self, path: &'a str) -> Option<&'a str> {
        let head = path.get(..self.prefix.len())?;
        if !head.eq_ignore_ascii_case(&self.prefix) {
            return None;
        }
        let rest = &path[self.prefix.len()..];
        (rest.is_empty() || rest.starts_with('/')).then_some(rest)
    }

    /// Rewrite `path` so its prefix is spelled exactly as this matcher's.
    /// `None` when it doesn't match or is already canonical.
    pub fn canonicalize(&self, path: &str) -> Option<String> {
        let rest = self.remainder(path)?;
        if path.starts_with(self.prefix.as_str()) {
            return None;
        }
        Some(format!("{}{}", self.prefix, rest))
    }
}
