//! History-mode navigation stack.
//!
//! Models the browser's native history API: entries are real URL paths
//! under a base prefix, with push/replace and back/forward traversal.

/// Session history rooted at a base URL.
#[derive(Debug, Clone)]
pub struct WebHistory {
    base: String,
    entries: Vec<String>,
    position: usize,
}

impl WebHistory {
    /// Create a history whose first entry is `initial` (an app path, without base).
    pub fn new(base: &str, initial: &str) -> Self {
        Self {
            base: normalize_base(base),
            entries: vec![ensure_leading_slash(initial)],
            position: 0,
        }
    }

    /// Create a history from a full browser URL path (including the base).
    pub fn from_url(base: &str, url_path: &str) -> Self {
        let mut history = Self::new(base, "/");
        let location = history.strip_base(url_path).unwrap_or("/").to_string();
        history.entries[0] = ensure_leading_slash(&location);
        history
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Current app path (without base).
    pub fn location(&self) -> &str {
        &self.entries[self.position]
    }

    /// Full URL path for an app path.
    pub fn href(&self, path: &str) -> String {
        let path = ensure_leading_slash(path);
        format!("{}{}", self.base.trim_end_matches('/'), path)
    }

    /// Map a URL path back to an app path. `None` if it lies outside the base.
    pub fn strip_base<'a>(&self, url_path: &'a str) -> Option<&'a str> {
        strip_base(&self.base, url_path)
    }

    /// Push a new entry, dropping any forward entries.
    pub fn push(&mut self, path: &str) {
        self.entries.truncate(self.position + 1);
        self.entries.push(ensure_leading_slash(path));
        self.position += 1;
    }

    /// Overwrite the current entry.
    pub fn replace(&mut self, path: &str) {
        self.entries[self.position] = ensure_leading_slash(path);
    }

    /// Move by `delta` entries. Returns false (and stays put) when out of range.
    pub fn go(&mut self, delta: isize) -> bool {
        let Some(target) = (self.position as isize).checked_add(delta) else {
            return false;
        };
        if delta == 0 || target < 0 || target as usize >= self.entries.len() {
            return false;
        }
        self.position = target as usize;
        true
    }

    pub fn back(&mut self) -> bool {
        self.go(-1)
    }

    pub fn forward(&mut self) -> bool {
        self.go(1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Map a URL path under `base` to an app path. `None` if it lies outside.
pub fn strip_base<'a>(base: &str, url_path: &'a str) -> Option<&'a str> {
    let bare = base.trim_end_matches('/');
    if bare.is_empty() {
        return Some(url_path);
    }
    match url_path.strip_prefix(bare) {
        Some("") => Some("/"),
        Some(rest) if rest.starts_with('/') => Some(rest),
        _ => None,
    }
}

/// Bases always start and end with `/`.
pub fn normalize_base(base: &str) -> String {
    let trimmed = base.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", trimmed)
    }
}

fn ensure_leading_slash(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}
