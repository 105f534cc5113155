//! Configuration file watcher for hot reload.
//!
//! The parent directory is watched rather than the file itself: editors that
//! save by writing a temp file and renaming it over the original replace the
//! inode, and a watch on the old inode would go quiet.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::DevConfig;

/// Reloads the dev config and hands each valid version to the server.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<DevConfig>,
}

impl ConfigWatcher {
    /// Returns the watcher and a receiver for validated configuration updates.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<DevConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching. Keep the returned handle alive to keep watching.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let dir = watch_dir(&self.path);
        let file_name = self.path.file_name().map(OsString::from);
        let tx = self.update_tx;
        let path = self.path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if touches_config(&event, file_name.as_deref()) => {
                    tracing::info!(path = %path.display(), kind = ?event.kind, "Dev config changed");
                    match load_config(&path) {
                        Ok(config) => {
                            if tx.send(config).is_err() {
                                tracing::debug!("Server gone, dropping config update");
                            }
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "Ignoring invalid dev config, proxy rules unchanged");
                        }
                    }
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = %e, "Config watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(1)),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::info!(path = %self.path.display(), dir = %dir.display(), "Watching dev config");
        Ok(watcher)
    }
}

fn watch_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// A create or modify event (renames included) naming the config file.
fn touches_config(event: &Event, file_name: Option<&std::ffi::OsStr>) -> bool {
    if !(event.kind.is_modify() || event.kind.is_create()) {
        return false;
    }
    let Some(file_name) = file_name else {
        return false;
    };
    event.paths.iter().any(|p| p.file_name() == Some(file_name))
}
