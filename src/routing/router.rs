//! Navigation over the route table.
//!
//! # Responsibilities
//! - Resolve a path or a route name to a final view
//! - Follow redirects to their terminal route
//! - Record navigations in the history stack
//!
//! # Design Decisions
//! - Router instances are plain values owned by the app context
//! - The table is shared via Arc; the history is per instance
//! - The URL recorded is the final path after redirects

use std::sync::Arc;

use crate::routing::error::NavigationError;
use crate::routing::history::WebHistory;
use crate::routing::matcher::{strip_query, PathMatcher, StaticPathMatcher};
use crate::routing::table::{Binding, Outcome, RouteTable, View};

/// Upper bound on redirect hops for a single navigation.
pub const MAX_REDIRECTS: usize = 8;

/// Navigation target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Path(String),
    Named(String),
}

impl From<&str> for Location {
    fn from(value: &str) -> Self {
        if value.starts_with('/') {
            Location::Path(value.to_string())
        } else {
            Location::Named(value.to_string())
        }
    }
}

/// A path resolved all the way down to a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// Final app path after redirects.
    pub path: String,
    /// Name of the matched route, if it has one.
    pub name: Option<String>,
    pub view: View,
    /// Path originally requested when a redirect was followed.
    pub redirected_from: Option<String>,
}

impl Resolved {
    pub fn is_not_found(&self) -> bool {
        self.view == View::NotFound
    }
}

/// Client router: a shared route table plus this session's history.
#[derive(Debug, Clone)]
pub struct Router {
    table: Arc<RouteTable>,
    history: WebHistory,
    current: Option<Resolved>,
}

impl Router {
    pub fn new(table: Arc<RouteTable>, history: WebHistory) -> Self {
        Self {
            table,
            history,
            current: None,
        }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn history(&self) -> &WebHistory {
        &self.history
    }

    /// Last completed navigation.
    pub fn current(&self) -> Option<&Resolved> {
        self.current.as_ref()
    }

    /// Immediate outcome for a path; redirects are reported, not followed.
    pub fn resolve(&self, path: &str) -> Outcome {
        self.table.resolve(path)
    }

    /// Resolve a target to its final view, following redirects.
    pub fn resolve_final(&self, location: &Location) -> Result<Resolved, NavigationError> {
        let mut path = match location {
            Location::Path(path) => path.clone(),
            Location::Named(name) => self
                .table
                .by_name(name)
                .map(|route| route.path.clone())
                .ok_or_else(|| NavigationError::UnknownName(name.clone()))?,
        };
        let requested = path.clone();
        let mut redirected = false;

        for _ in 0..=MAX_REDIRECTS {
            match self.table.lookup(&path) {
                Some(route) => match &route.binding {
                    Binding::View(view) => {
                        return Ok(Resolved {
                            path,
                            name: route.name.clone(),
                            view: *view,
                            redirected_from: redirected.then(|| requested.clone()),
                        })
                    }
                    Binding::Redirect(target) => {
                        tracing::debug!(from = %path, to = %target, "Following redirect");
                        path = carry_query(&path, target);
                        redirected = true;
                    }
                },
                None => {
                    return Ok(Resolved {
                        path,
                        name: None,
                        view: View::NotFound,
                        redirected_from: redirected.then(|| requested.clone()),
                    })
                }
            }
        }

        Err(NavigationError::TooManyRedirects(requested))
    }

    /// Push a new history entry for `location` and resolve it.
    ///
    /// Navigating to the current location does not add an entry.
    pub fn navigate(&mut self, location: impl Into<Location>) -> Result<&Resolved, NavigationError> {
        let resolved = self.resolve_final(&location.into())?;
        if !same_location(self.history.location(), &resolved.path) {
            self.history.push(&resolved.path);
        }
        Ok(self.commit(resolved))
    }

    /// Like `navigate`, but overwrites the current history entry.
    pub fn replace(&mut self, location: impl Into<Location>) -> Result<&Resolved, NavigationError> {
        let resolved = self.resolve_final(&location.into())?;
        self.history.replace(&resolved.path);
        Ok(self.commit(resolved))
    }

    /// Resolve whatever the history currently points at, without pushing.
    pub fn sync(&mut self) -> Result<&Resolved, NavigationError> {
        let location = Location::Path(self.history.location().to_string());
        let resolved = self.resolve_final(&location)?;
        if resolved.redirected_from.is_some() {
            self.history.replace(&resolved.path);
        }
        Ok(self.commit(resolved))
    }

    /// Step back one entry. `Ok(None)` when already at the oldest entry.
    pub fn back(&mut self) -> Result<Option<&Resolved>, NavigationError> {
        self.go(-1)
    }

    /// Step forward one entry. `Ok(None)` when already at the newest entry.
    pub fn forward(&mut self) -> Result<Option<&Resolved>, NavigationError> {
        self.go(1)
    }

    pub fn go(&mut self, delta: isize) -> Result<Option<&Resolved>, NavigationError> {
        if !self.history.go(delta) {
            return Ok(None);
        }
        self.sync().map(Some)
    }

    /// Full URL (with base) for an app path.
    pub fn href(&self, path: &str) -> String {
        self.history.href(path)
    }

    fn commit(&mut self, resolved: Resolved) -> &Resolved {
        if resolved.is_not_found() {
            tracing::warn!(path = %resolved.path, "No route matched");
        } else {
            tracing::debug!(path = %resolved.path, view = %resolved.view, "Navigated");
        }
        self.current.insert(resolved)
    }
}

/// Same route key and same query. `/chat`, `/chat/` and `/Chat` are one location.
fn same_location(current: &str, next: &str) -> bool {
    StaticPathMatcher::new(current).matches(next) && query_of(current) == query_of(next)
}

fn query_of(path: &str) -> &str {
    &path[strip_query(path).len()..]
}

/// Redirect targets without their own query keep the original one.
fn carry_query(from: &str, target: &str) -> String {
    let query = query_of(from);
    if query.is_empty() || target.contains(['?', '#']) {
        target.to_string()
    } else {
        format!("{}{}", target, query)
    }
}
