//! Import specifier aliasing.
//!
//! `@/views/ChatView.vue` resolves to `<root>/src/views/ChatView.vue` under the
//! default configuration. An alias matches either the whole specifier or a
//! prefix followed by `/`; the longest alias wins.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Compiled alias table anchored at the project root.
#[derive(Debug, Clone)]
pub struct AliasResolver {
    // Longest alias first.
    entries: Vec<(String, PathBuf)>,
}

impl AliasResolver {
    pub fn new(root: &Path, aliases: &BTreeMap<String, String>) -> Self {
        let mut entries: Vec<(String, PathBuf)> = aliases
            .iter()
            .map(|(alias, target)| (alias.clone(), root.join(target)))
            .collect();
        entries.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));
        Self { entries }
    }

    /// Resolve a specifier; `None` when no alias applies.
    pub fn resolve(&self, specifier: &str) -> Option<PathBuf> {
        self.entries.iter().find_map(|(alias, dir)| {
            if specifier == alias {
                return Some(dir.clone());
            }
            specifier
                .strip_prefix(alias.as_str())
                .and_then(|rest| rest.strip_prefix('/'))
                .map(|rest| dir.join(rest))
        })
    }
}
