//! Routing error types.

use thiserror::Error;

/// Rejections raised while freezing a route table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteTableError {
    #[error("duplicate route path: {0}")]
    DuplicatePath(String),

    #[error("duplicate route name: {0}")]
    DuplicateName(String),

    #[error("no route declared for the root path")]
    MissingRoot,

    #[error("root route must be a redirect, found a view binding")]
    RootNotRedirect,

    #[error("route {0} binds the not-found fallback view")]
    FallbackBound(String),

    #[error("redirect from {from} targets undeclared path {target}")]
    DanglingRedirect { from: String, target: String },

    #[error("redirect cycle starting at {0}")]
    RedirectCycle(String),
}

/// Failures of a single navigation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("no route named {0}")]
    UnknownName(String),

    #[error("too many redirects while resolving {0}")]
    TooManyRedirects(String),
}
