//! Dev-server reverse proxy subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request (/api/...)
//!     → rule.rs (first matching prefix, upstream URI)
//!     → forward.rs (rewrite headers, stream body to backend)
//!     → Backend response streamed back, hop-by-hop headers stripped
//! ```
//!
//! # Design Decisions
//! - Request bodies are streamed, never buffered
//! - `change_origin` rewrites Host to the backend authority
//! - Upstream failures map to 502, upstream timeouts to 504

pub mod forward;
pub mod rule;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

pub use forward::{strip_hop_by_hop, Forwarder};
pub use rule::{ProxyRule, ProxyTable};

#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("invalid proxy target {target}: {reason}")]
    InvalidTarget { target: String, reason: String },

    #[error("invalid upstream uri: {0}")]
    InvalidUri(String),

    #[error("upstream request failed: {0}")]
    Upstream(String),

    #[error("upstream timed out after {0:?}")]
    Timeout(std::time::Duration),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::InvalidTarget { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ProxyError::InvalidUri(_) => StatusCode::BAD_REQUEST,
            ProxyError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ProxyError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
