//! aikefu-web: dev server and route inspection CLI.
//!
//! ```text
//!     Browser ──▶ dev server ──┬─ /api/* ───────▶ backend (localhost:8080)
//!                              ├─ /assets/x.js ─▶ client root on disk
//!                              └─ /chat, /login ▶ index.html (history fallback)
//! ```

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use aikefu_web::config::{load_or_default, watcher::ConfigWatcher, AliasResolver, DevConfig};
use aikefu_web::lifecycle::{signals::shutdown_on_signal, Shutdown};
use aikefu_web::observability::{logging, metrics};
use aikefu_web::routing::{Location, RouteTable, Router, WebHistory};
use aikefu_web::DevServer;

#[derive(Parser)]
#[command(name = "aikefu-web")]
#[command(about = "Dev server and route tooling for the chat client", long_about = None)]
struct Cli {
    /// Path to the TOML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the client and proxy API calls (default)
    Serve {
        /// Override server.bind_address
        #[arg(short, long)]
        bind: Option<String>,

        /// Override server.root_dir
        #[arg(short, long)]
        root: Option<String>,

        /// Do not reload proxy rules when the config file changes
        #[arg(long)]
        no_watch: bool,
    },
    /// List the route table
    Routes {
        /// Print as JSON records
        #[arg(long)]
        json: bool,
    },
    /// Show how a path or route name resolves
    Resolve { target: String },
    /// Validate the config file and the route table
    Check,
    /// Resolve an aliased import specifier
    Alias { specifier: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command.unwrap_or(Commands::Serve {
        bind: None,
        root: None,
        no_watch: false,
    }) {
        Commands::Serve {
            bind,
            root,
            no_watch,
        } => serve(config_path, bind, root, no_watch).await,
        Commands::Routes { json } => {
            let table = RouteTable::app();
            if json {
                println!("{}", serde_json::to_string_pretty(table.routes())?);
            } else {
                for route in table.routes() {
                    println!(
                        "{:<12} {:<10} {}",
                        route.path,
                        route.name.as_deref().unwrap_or("-"),
                        table.resolve(&route.path)
                    );
                }
            }
            Ok(())
        }
        Commands::Resolve { target } => {
            let config = load_or_default(config_path)?;
            let router = Router::new(
                std::sync::Arc::new(RouteTable::app()),
                WebHistory::new(&config.server.base, "/"),
            );
            let location = Location::from(target.as_str());
            if let Location::Path(path) = &location {
                println!("{} -> {}", path, router.resolve(path));
            }
            let resolved = router.resolve_final(&location)?;
            println!(
                "final: {} (view {}, href {})",
                resolved.path,
                resolved.view,
                router.href(&resolved.path)
            );
            Ok(())
        }
        Commands::Check => {
            let config = load_or_default(config_path)?;
            let table = RouteTable::new(aikefu_web::routing::table::app_routes())?;
            println!(
                "ok: {} routes, {} proxy rules, {} aliases",
                table.len(),
                config.proxy.len(),
                config.resolve.alias.len()
            );
            Ok(())
        }
        Commands::Alias { specifier } => {
            let config = load_or_default(config_path)?;
            let resolver = AliasResolver::new(Path::new(&config.server.root_dir), &config.resolve.alias);
            match resolver.resolve(&specifier) {
                Some(path) => println!("{}", path.display()),
                None => println!("{} (not aliased)", specifier),
            }
            Ok(())
        }
    }
}

async fn serve(
    config_path: Option<&Path>,
    bind: Option<String>,
    root: Option<String>,
    no_watch: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config: DevConfig = load_or_default(config_path)?;
    if let Some(bind) = bind {
        config.server.bind_address = bind;
    }
    if let Some(root) = root {
        config.server.root_dir = root;
    }

    logging::init(&config.observability)?;
    tracing::info!("aikefu-web v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // Watcher handle must outlive the server.
    let (_watcher, config_updates) = match config_path {
        Some(path) if !no_watch => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (Some(watcher.run()?), updates)
        }
        _ => {
            let (_, updates) = mpsc::unbounded_channel();
            (None, updates)
        }
    };

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(shutdown_on_signal(shutdown.clone()));

    let server = DevServer::new(config)?;
    server.run(listener, config_updates, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
