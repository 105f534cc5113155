//! Application bootstrap.
//!
//! The app context owns the router and attaches to one element of the host
//! document. Mounting happens once; the first mount performs the initial
//! navigation to whatever location the history starts at.

use std::sync::Arc;

use thiserror::Error;

use crate::routing::{NavigationError, Resolved, RouteTable, Router, WebHistory};

/// Default element the client attaches to.
pub const DEFAULT_MOUNT_SELECTOR: &str = "#app";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("invalid mount selector {0:?}: expected #<element-id>")]
    InvalidSelector(String),

    #[error("application already mounted on #{0}")]
    AlreadyMounted(String),

    #[error(transparent)]
    Navigation(#[from] NavigationError),
}

/// Element id the application renders into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountPoint {
    id: String,
}

impl MountPoint {
    /// Parse an id selector such as `#app`.
    pub fn parse(selector: &str) -> Result<Self, AppError> {
        let id = selector
            .trim()
            .strip_prefix('#')
            .filter(|id| is_valid_id(id))
            .ok_or_else(|| AppError::InvalidSelector(selector.to_string()))?;
        Ok(Self { id: id.to_string() })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether a host document declares this element.
    pub fn is_present_in(&self, html: &str) -> bool {
        let double = format!("id=\"{}\"", self.id);
        let single = format!("id='{}'", self.id);
        html.contains(&double) || html.contains(&single)
    }
}

fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Application context: one router, at most one mount.
#[derive(Debug)]
pub struct App {
    router: Router,
    mounted: Option<MountPoint>,
}

impl App {
    pub fn new(router: Router) -> Self {
        Self {
            router,
            mounted: None,
        }
    }

    /// App over the built-in route table, starting at `url_path`.
    pub fn with_url(base: &str, url_path: &str) -> Self {
        let history = WebHistory::from_url(base, url_path);
        Self::new(Router::new(Arc::new(RouteTable::app()), history))
    }

    /// Attach to the element named by `selector` and run the initial navigation.
    pub fn mount(&mut self, selector: &str) -> Result<&Resolved, AppError> {
        let point = MountPoint::parse(selector)?;
        if let Some(existing) = &self.mounted {
            return Err(AppError::AlreadyMounted(existing.id().to_string()));
        }

        tracing::info!(mount = %point.id(), location = %self.router.history().location(), "Mounting application");
        self.mounted = Some(point);
        Ok(self.router.sync()?)
    }

    pub fn mount_point(&self) -> Option<&MountPoint> {
        self.mounted.as_ref()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn router_mut(&mut self) -> &mut Router {
        &mut self.router
    }
}
