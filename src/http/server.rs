//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the dispatch handler
//! - Wire up middleware (request ID, tracing, timeout)
//! - Dispatch requests: proxy rules first, then the static site
//! - Swap in new proxy rules when the config file changes
//! - Stop accepting and drain on shutdown

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::DevConfig;
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::http::spa::StaticSite;
use crate::lifecycle::shutdown;
use crate::proxy::{Forwarder, ProxyError, ProxyTable};
use crate::routing::RouteTable;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub proxies: Arc<ArcSwap<ProxyTable>>,
    pub forwarder: Forwarder,
    pub site: Arc<StaticSite>,
}

/// Budget for the whole request. Outlasts the forwarder's upstream timeout so
/// a hung backend surfaces as 504 rather than 408.
fn outer_timeout(config: &DevConfig) -> Duration {
    Duration::from_secs(config.timeouts.request_secs + config.timeouts.connect_secs.max(1))
}

/// Development server: static client plus API reverse proxy.
pub struct DevServer {
    router: Router,
    state: AppState,
    config: DevConfig,
}

impl DevServer {
    /// Create a new dev server with the given configuration.
    pub fn new(config: DevConfig) -> Result<Self, ProxyError> {
        Self::with_routes(config, Arc::new(RouteTable::app()))
    }

    pub fn with_routes(config: DevConfig, routes: Arc<RouteTable>) -> Result<Self, ProxyError> {
        let proxies = ProxyTable::from_config(&config.proxy)?;
        let forwarder = Forwarder::new(
            Duration::from_secs(config.timeouts.connect_secs),
            Duration::from_secs(config.timeouts.request_secs),
        );

        let state = AppState {
            proxies: Arc::new(ArcSwap::from_pointee(proxies)),
            forwarder,
            site: Arc::new(StaticSite::new(&config.server, routes)),
        };

        let router = Self::build_router(&config, state.clone());
        Ok(Self {
            router,
            state,
            config,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &DevConfig, state: AppState) -> Router {
        Router::new()
            .route("/", any(dispatch))
            .route("/{*path}", any(dispatch))
            .with_state(state)
            .layer(TimeoutLayer::new(outer_timeout(config)))
            .layer(propagate_request_id_layer())
            .layer(
                TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                    tracing::info_span!(
                        "request",
                        method = %req.method(),
                        uri = %req.uri(),
                        request_id = request_id(req).unwrap_or("-"),
                    )
                }),
            )
            .layer(set_request_id_layer())
    }

    /// Run the server until `shutdown_rx` fires.
    ///
    /// Configs arriving on `config_updates` replace the proxy rules; listener
    /// and static-root changes need a restart.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<DevConfig>,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            base = %self.config.server.base,
            root = %self.config.server.root_dir,
            proxy_rules = self.config.proxy.len(),
            "Dev server starting"
        );

        self.state.site.check_host_document().await;

        let proxies = self.state.proxies.clone();
        let mut reload_shutdown = shutdown_rx.resubscribe();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    update = config_updates.recv() => match update {
                        Some(config) => apply_reload(&proxies, &config),
                        None => break,
                    },
                    _ = reload_shutdown.recv() => break,
                }
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown_rx))
            .await?;

        tracing::info!("Dev server stopped");
        Ok(())
    }
}

fn apply_reload(proxies: &ArcSwap<ProxyTable>, config: &DevConfig) {
    match ProxyTable::from_config(&config.proxy) {
        Ok(table) => {
            tracing::info!(rules = table.rules().len(), "Proxy rules reloaded");
            proxies.store(Arc::new(table));
        }
        Err(e) => {
            tracing::error!(error = %e, "Rejected reloaded proxy rules, keeping current set");
        }
    }
}

/// Main handler: proxy when a rule matches, otherwise serve the client.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let rule = state.proxies.load().match_path(request.uri().path()).cloned();

    match rule {
        Some(rule) => match state.forwarder.forward(&rule, request).await {
            Ok(response) => response,
            Err(e) => e.into_response(),
        },
        None => state.site.serve(request).await,
    }
}
