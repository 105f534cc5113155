//! Route table and static lookup.
//!
//! # Responsibilities
//! - Store route records
//! - Look up the route for a path
//! - Return the bound view, the redirect target, or an explicit not-found
//!
//! # Design Decisions
//! - Immutable after construction (shareable without locks)
//! - O(1) lookup via HashMap on normalized path keys
//! - Redirect chains validated once, at construction

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::routing::error::RouteTableError;
use crate::routing::matcher::{normalize, StaticPathMatcher};

/// Views the client knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Login,
    Register,
    Chat,
    /// Fallback shown when no route matches. Never bound in a table.
    NotFound,
}

impl View {
    pub fn as_str(&self) -> &'static str {
        match self {
            View::Login => "login",
            View::Register => "register",
            View::Chat => "chat",
            View::NotFound => "not_found",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a route points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Binding {
    View(View),
    Redirect(String),
}

/// One row of the route table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub binding: Binding,
}

impl Route {
    /// A named route rendering `view`.
    pub fn view(path: impl Into<String>, name: impl Into<String>, view: View) -> Self {
        Self {
            path: path.into(),
            name: Some(name.into()),
            binding: Binding::View(view),
        }
    }

    /// An unnamed redirect from `path` to `target`.
    pub fn redirect(path: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: None,
            binding: Binding::Redirect(target.into()),
        }
    }
}

/// Result of a single lookup. Redirects are not followed here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Render(View),
    Redirect(String),
    NotFound,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Render(view) => write!(f, "render:{}", view),
            Outcome::Redirect(target) => write!(f, "redirect:{}", target),
            Outcome::NotFound => f.write_str("not-found"),
        }
    }
}

/// Frozen, validated set of routes.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
    by_path: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
}

impl RouteTable {
    /// Validate and freeze a list of routes.
    pub fn new(routes: Vec<Route>) -> Result<Self, RouteTableError> {
        let mut by_path = HashMap::with_capacity(routes.len());
        let mut by_name = HashMap::with_capacity(routes.len());

        for (idx, route) in routes.iter().enumerate() {
            if route.binding == Binding::View(View::NotFound) {
                return Err(RouteTableError::FallbackBound(route.path.clone()));
            }
            let key = StaticPathMatcher::new(&route.path).key().to_string();
            if by_path.insert(key, idx).is_some() {
                return Err(RouteTableError::DuplicatePath(route.path.clone()));
            }
            if let Some(name) = &route.name {
                if by_name.insert(name.clone(), idx).is_some() {
                    return Err(RouteTableError::DuplicateName(name.clone()));
                }
            }
        }

        let table = Self {
            routes,
            by_path,
            by_name,
        };

        match table.lookup("/") {
            None => return Err(RouteTableError::MissingRoot),
            Some(root) if !matches!(root.binding, Binding::Redirect(_)) => {
                return Err(RouteTableError::RootNotRedirect)
            }
            Some(_) => {}
        }

        for route in &table.routes {
            if let Binding::Redirect(_) = route.binding {
                table.check_redirect_chain(route)?;
            }
        }

        Ok(table)
    }

    /// The application's route table.
    pub fn app() -> Self {
        Self::new(app_routes()).expect("application route table is valid")
    }

    /// Resolve a path to its immediate outcome.
    pub fn resolve(&self, path: &str) -> Outcome {
        match self.lookup(path) {
            Some(route) => match &route.binding {
                Binding::View(view) => Outcome::Render(*view),
                Binding::Redirect(target) => Outcome::Redirect(target.clone()),
            },
            None => Outcome::NotFound,
        }
    }

    /// Route declared at `path`, if any.
    pub fn lookup(&self, path: &str) -> Option<&Route> {
        self.by_path
            .get(&normalize(path))
            .map(|&idx| &self.routes[idx])
    }

    /// Route registered under `name`, if any.
    pub fn by_name(&self, name: &str) -> Option<&Route> {
        self.by_name.get(name).map(|&idx| &self.routes[idx])
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Follow a redirect chain until it reaches a view-bound route.
    fn check_redirect_chain(&self, start: &Route) -> Result<(), RouteTableError> {
        let mut seen = HashSet::new();
        seen.insert(normalize(&start.path));

        let mut current = start;
        while let Binding::Redirect(target) = &current.binding {
            let next = self
                .lookup(target)
                .ok_or_else(|| RouteTableError::DanglingRedirect {
                    from: current.path.clone(),
                    target: target.clone(),
                })?;
            if !seen.insert(normalize(&next.path)) {
                return Err(RouteTableError::RedirectCycle(start.path.clone()));
            }
            current = next;
        }
        Ok(())
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::app()
    }
}

/// Routes exposed to the views: `/` redirects to the login page.
pub fn app_routes() -> Vec<Route> {
    vec![
        Route::redirect("/", "/login"),
        Route::view("/login", "login", View::Login),
        Route::view("/register", "register", View::Register),
        Route::view("/chat", "chat", View::Chat),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_table_outcomes() {
        let table = RouteTable::app();
        assert_eq!(table.resolve("/"), Outcome::Redirect("/login".into()));
        assert_eq!(table.resolve("/login"), Outcome::Render(View::Login));
        assert_eq!(table.resolve("/register"), Outcome::Render(View::Register));
        assert_eq!(table.resolve("/chat"), Outcome::Render(View::Chat));
    }

    #[test]
    fn test_unmatched_path_is_not_found() {
        let table = RouteTable::app();
        assert_eq!(table.resolve("/settings"), Outcome::NotFound);
        assert_eq!(table.resolve("/chat/42"), Outcome::NotFound);
    }

    #[test]
    fn test_non_strict_matching() {
        let table = RouteTable::app();
        assert_eq!(table.resolve("/chat/"), Outcome::Render(View::Chat));
        assert_eq!(table.resolve("/Chat?session=1"), Outcome::Render(View::Chat));
    }

    #[test]
    fn test_paths_and_names_unique() {
        let table = RouteTable::app();
        let paths: HashSet<_> = table.routes().iter().map(|r| normalize(&r.path)).collect();
        assert_eq!(paths.len(), table.len());

        let names: Vec<_> = table.routes().iter().filter_map(|r| r.name.as_deref()).collect();
        let unique: HashSet<_> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
        assert_eq!(names, ["login", "register", "chat"]);
    }

    #[test]
    fn test_root_redirect_terminates_in_view() {
        let table = RouteTable::app();
        let Outcome::Redirect(target) = table.resolve("/") else {
            panic!("root must redirect");
        };
        assert!(matches!(table.resolve(&target), Outcome::Render(_)));
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let table = RouteTable::app();
        for path in ["/", "/login", "/register", "/chat", "/missing"] {
            assert_eq!(table.resolve(path), table.resolve(path));
        }
    }

    #[test]
    fn test_rejects_duplicate_path() {
        let mut routes = app_routes();
        routes.push(Route::view("/Chat/", "chat2", View::Chat));
        assert_eq!(
            RouteTable::new(routes).unwrap_err(),
            RouteTableError::DuplicatePath("/Chat/".into())
        );
    }

    #[test]
    fn test_rejects_duplicate_name() {
        let mut routes = app_routes();
        routes.push(Route::view("/help", "chat", View::Chat));
        assert_eq!(
            RouteTable::new(routes).unwrap_err(),
            RouteTableError::DuplicateName("chat".into())
        );
    }

    #[test]
    fn test_rejects_bound_fallback_view() {
        let mut routes = app_routes();
        routes.push(Route::view("/oops", "oops", View::NotFound));
        assert_eq!(
            RouteTable::new(routes).unwrap_err(),
            RouteTableError::FallbackBound("/oops".into())
        );
    }

    #[test]
    fn test_root_invariants() {
        let routes = vec![Route::view("/login", "login", View::Login)];
        assert_eq!(RouteTable::new(routes).unwrap_err(), RouteTableError::MissingRoot);

        let routes = vec![Route::view("/", "home", View::Chat)];
        assert_eq!(RouteTable::new(routes).unwrap_err(), RouteTableError::RootNotRedirect);
    }

    #[test]
    fn test_rejects_bad_redirects() {
        let routes = vec![Route::redirect("/", "/nowhere")];
        assert!(matches!(
            RouteTable::new(routes).unwrap_err(),
            RouteTableError::DanglingRedirect { .. }
        ));

        let routes = vec![
            Route::redirect("/", "/a"),
            Route::redirect("/a", "/b"),
            Route::redirect("/b", "/a"),
        ];
        assert!(matches!(
            RouteTable::new(routes).unwrap_err(),
            RouteTableError::RedirectCycle(_)
        ));
    }

    #[test]
    fn test_lookup_by_name() {
        let table = RouteTable::app();
        assert_eq!(table.by_name("register").map(|r| r.path.as_str()), Some("/register"));
        assert!(table.by_name("admin").is_none());
    }

    #[test]
    fn test_routes_serialize_as_records() {
        let json = serde_json::to_value(&app_routes()).unwrap();
        assert_eq!(json[0]["path"], "/");
        assert_eq!(json[0]["binding"]["redirect"], "/login");
        assert!(json[0].get("name").is_none());
        assert_eq!(json[3]["name"], "chat");
        assert_eq!(json[3]["binding"]["view"], "chat");
    }
}
