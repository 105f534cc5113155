//! Client shell for the customer-service chat application.
//!
//! Route table and history-mode router for the client, the application
//! bootstrap that mounts it, and the development server that serves the
//! client and reverse-proxies `/api` to the backend.

pub mod app;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod proxy;
pub mod routing;

pub use app::App;
pub use config::DevConfig;
pub use http::DevServer;
pub use lifecycle::Shutdown;
pub use routing::{Outcome, RouteTable, Router, View};
