//! Static files and history-mode fallback.
//!
//! # Responsibilities
//! - Serve files from the client root under the configured base
//! - Answer page navigations (GET/HEAD accepting HTML, no file extension)
//!   with the host document so deep links like `/chat` load the client
//! - Report how the client router will resolve the path (`x-spa-route`)
//!
//! # Design Decisions
//! - The host document is re-read per request so edits show up immediately
//! - Unmatched client paths still get the host document; the status is 404
//!   only when `server.not_found_status` is set

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderValue, Method, Request, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use tower::ServiceExt;
use tower_http::services::ServeDir;

use crate::app::MountPoint;
use crate::config::ServerConfig;
use crate::observability::metrics;
use crate::routing::history::{normalize_base, strip_base};
use crate::routing::{Outcome, RouteTable};

pub const X_SPA_ROUTE: &str = "x-spa-route";

/// The client application as served from disk.
#[derive(Clone)]
pub struct StaticSite {
    base: String,
    index: PathBuf,
    files: ServeDir,
    routes: Arc<RouteTable>,
    mount: Option<MountPoint>,
    not_found_status: bool,
}

impl StaticSite {
    pub fn new(config: &ServerConfig, routes: Arc<RouteTable>) -> Self {
        let root = Path::new(&config.root_dir);
        Self {
            base: normalize_base(&config.base),
            index: root.join(&config.index_file),
            files: ServeDir::new(root),
            routes,
            mount: MountPoint::parse(&config.mount_selector).ok(),
            not_found_status: config.not_found_status,
        }
    }

    /// Warn when the host document is missing or lacks the mount element.
    pub async fn check_host_document(&self) {
        match tokio::fs::read_to_string(&self.index).await {
            Ok(html) => {
                if let Some(mount) = &self.mount {
                    if !mount.is_present_in(&html) {
                        tracing::warn!(
                            index = %self.index.display(),
                            mount = %mount.id(),
                            "Host document has no mount element"
                        );
                    }
                }
            }
            Err(e) => {
                tracing::warn!(index = %self.index.display(), error = %e, "Host document not readable");
            }
        }
    }

    pub async fn serve(&self, request: Request<Body>) -> Response {
        let Some(app_path) = strip_base(&self.base, request.uri().path()).map(str::to_string) else {
            return (StatusCode::NOT_FOUND, "Not under the configured base").into_response();
        };

        let method = request.method().clone();
        if is_page_navigation(&method, &app_path, request.headers()) {
            return self.fallback(&app_path, method == Method::HEAD).await;
        }

        let (mut parts, body) = request.into_parts();
        let uri = match parts.uri.query() {
            Some(query) => format!("{}?{}", app_path, query),
            None => app_path,
        };
        parts.uri = match uri.parse::<Uri>() {
            Ok(uri) => uri,
            Err(_) => return (StatusCode::BAD_REQUEST, "Invalid path").into_response(),
        };

        match self.files.clone().oneshot(Request::from_parts(parts, body)).await {
            Ok(response) => response.map(Body::new),
            Err(infallible) => match infallible {},
        }
    }

    async fn fallback(&self, app_path: &str, head: bool) -> Response {
        let outcome = self.routes.resolve(app_path);
        let label = outcome.to_string();
        metrics::record_spa_fallback(&label);

        let html = match tokio::fs::read_to_string(&self.index).await {
            Ok(html) => html,
            Err(e) => {
                tracing::error!(index = %self.index.display(), error = %e, "Host document not readable");
                return (StatusCode::NOT_FOUND, "Host document not found").into_response();
            }
        };

        let status = if outcome == Outcome::NotFound && self.not_found_status {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::OK
        };
        tracing::debug!(path = %app_path, outcome = %label, status = %status, "Serving host document");

        let body = if head { Body::empty() } else { Body::from(html) };
        let mut response = (
            status,
            [
                (header::CONTENT_TYPE, "text/html; charset=utf-8"),
                (header::CACHE_CONTROL, "no-cache"),
            ],
            body,
        )
            .into_response();
        if let Ok(value) = HeaderValue::from_str(&label) {
            response.headers_mut().insert(X_SPA_ROUTE, value);
        }
        response
    }
}

/// GET/HEAD for an extension-less path from a client that accepts HTML.
fn is_page_navigation(method: &Method, app_path: &str, headers: &HeaderMap) -> bool {
    if method != Method::GET && method != Method::HEAD {
        return false;
    }
    let last_segment = app_path.rsplit('/').next().unwrap_or("");
    if last_segment.contains('.') {
        return false;
    }
    match headers.get(header::ACCEPT).and_then(|v| v.to_str().ok()) {
        Some(accept) => accept.contains("text/html") || accept.contains("*/*"),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(accept: Option<&'static str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(accept) = accept {
            headers.insert(header::ACCEPT, HeaderValue::from_static(accept));
        }
        headers
    }

    #[test]
    fn test_page_navigation_detection() {
        let html = headers(Some("text/html,application/xhtml+xml"));
        assert!(is_page_navigation(&Method::GET, "/chat", &html));
        assert!(is_page_navigation(&Method::HEAD, "/", &html));
        assert!(is_page_navigation(&Method::GET, "/chat", &headers(None)));
        assert!(is_page_navigation(&Method::GET, "/chat", &headers(Some("*/*"))));

        assert!(!is_page_navigation(&Method::POST, "/chat", &html));
        assert!(!is_page_navigation(&Method::GET, "/assets/main.js", &html));
        assert!(!is_page_navigation(&Method::GET, "/chat", &headers(Some("application/json"))));
    }
}
