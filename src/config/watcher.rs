//! Hot reload of the configuration file
//!
//! The parent directory is watched rather than the file itself, since
//! editors often save by writing a temp file and renaming it over the
//! original. Events for other files are dropped, and a burst of events from
//! one save collapses into a single reload once the file has been quiet for
//! [`SETTLE_DELAY`].

use anyhow::{Context, Result};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use super::AppConfig;

/// Quiet period after the last file event before the file is re-read
pub const SETTLE_DELAY: Duration = Duration::from_millis(150);

/// Delivers a freshly parsed [`AppConfig`] each time the file changes
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<AppConfig>,
}

impl ConfigWatcher {
    /// Load `config_path` and start watching it
    ///
    /// Fails if the initial load fails; later parse errors keep the previous
    /// configuration in place.
    pub async fn new(config_path: impl Into<PathBuf>) -> Result<(Self, AppConfig)> {
        let config_path = config_path.into();
        let initial = AppConfig::load(&config_path.to_string_lossy())
            .await
            .context("Failed to load initial config")?;

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (config_tx, rx) = mpsc::channel(4);

        let target = config_path.clone();
        // Runs on notify's own thread; the unbounded send never blocks
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) if is_config_event(&event, &target) => {
                debug!("Config file event: {:?}", event.kind);
                let _ = event_tx.send(());
            }
            Ok(_) => {}
            Err(e) => error!("Config watch error: {}", e),
        })?;

        let dir = watch_dir(&config_path);
        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch config directory: {}", dir.display()))?;

        tokio::spawn(forward_reloads(config_path.clone(), event_rx, config_tx, SETTLE_DELAY));

        info!("Watching {} for changes", config_path.display());

        Ok((
            Self {
                _watcher: watcher,
                rx,
            },
            initial,
        ))
    }

    /// Wait for the next successfully parsed configuration
    ///
    /// Returns `None` once the watcher has shut down.
    pub async fn next_config(&mut self) -> Option<AppConfig> {
        self.rx.recv().await
    }
}

fn watch_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Whether `event` is a write or (re)creation of the config file
///
/// Paths are compared by file name; notify may report them absolute while
/// the config path is relative.
pub fn is_config_event(event: &Event, config_path: &Path) -> bool {
    if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
        return false;
    }
    let Some(name) = config_path.file_name() else {
        return false;
    };
    event.paths.iter().any(|path| path.file_name() == Some(name))
}

/// Turn raw file events into config reloads
///
/// Each reload waits until no event has arrived for `settle`, so a burst of
/// events costs one parse. Files that fail to parse are skipped. Ends when
/// either channel closes.
pub async fn forward_reloads(
    config_path: PathBuf,
    mut events: mpsc::UnboundedReceiver<()>,
    configs: mpsc::Sender<AppConfig>,
    settle: Duration,
) {
    let path = config_path.to_string_lossy().to_string();

    while events.recv().await.is_some() {
        let mut coalesced = 1usize;
        loop {
            match tokio::time::timeout(settle, events.recv()).await {
                Ok(Some(())) => coalesced += 1,
                Ok(None) => return,
                Err(_) => break,
            }
        }
        debug!("Reloading {} after {} file event(s)", path, coalesced);

        match AppConfig::load(&path).await {
            Ok(config) => {
                info!("Configuration reloaded from {}", path);
                if configs.send(config).await.is_err() {
                    return;
                }
            }
            Err(e) => warn!("Failed to reload config (keeping old config): {:#}", e),
        }
    }
}
