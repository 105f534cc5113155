//! Path matching logic.
//!
//! # Responsibilities
//! - Normalize client paths into lookup keys (static routes)
//! - Match request path prefixes (dev server proxy rules)
//!
//! # Design Decisions
//! - Query string and fragment never take part in matching
//! - Static routes are non-strict (trailing slash ignored) and case-insensitive
//! - Prefix matching is case-sensitive and byte-exact
//! - No regex to guarantee O(n) matching

/// Trait for matching a request path against a condition.
pub trait PathMatcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the path matches this condition.
    fn matches(&self, path: &str) -> bool;
}

/// Strip the query string and fragment from a path.
pub fn strip_query(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    &path[..end]
}

/// Normalize a client path into the key used for static route lookup.
///
/// `"/Login/?next=1"` and `"/login"` share the key `"/login"`.
pub fn normalize(path: &str) -> String {
    let path = strip_query(path).trim();
    let trimmed = path.trim_end_matches('/');
    let mut key = String::with_capacity(trimmed.len() + 1);
    if !trimmed.starts_with('/') {
        key.push('/');
    }
    key.push_str(trimmed);
    key.to_lowercase()
}

/// Matches one static path exactly (after normalization).
#[derive(Debug, Clone)]
pub struct StaticPathMatcher {
    key: String,
}

impl StaticPathMatcher {
    pub fn new(path: &str) -> Self {
        Self { key: normalize(path) }
    }

    /// Normalized key this matcher accepts.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl PathMatcher for StaticPathMatcher {
    fn matches(&self, path: &str) -> bool {
        normalize(path) == self.key
    }
}

/// Matches the request path prefix.
#[derive(Debug, Clone)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl PathMatcher for PathPrefixMatcher {
    fn matches(&self, path: &str) -> bool {
        path.starts_with(&self.prefix)
    }
}
