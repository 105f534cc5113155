//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, dispatch)
//!     → request.rs (request ID)
//!     → proxy rule matched? → proxy::forward → backend
//!     → otherwise spa.rs (static file or host document fallback)
//! ```

pub mod request;
pub mod server;
pub mod spa;

pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use server::{AppState, DevServer};
pub use spa::{StaticSite, X_SPA_ROUTE};
