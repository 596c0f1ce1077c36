//! Preferences file watcher for hot-reload support.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::Mutex as StdMutex;
use std::sync::mpsc;
use std::time::Duration;

use notify::Watcher;
use tokio::sync::mpsc as tokio_mpsc;
use tracing::{debug, error, info};

use crate::error::{DaemonError, Result};

const RELOAD_SETTLE_DELAY: Duration = Duration::from_millis(100);
const DEBOUNCE_DURATION: Duration = Duration::from_millis(250);

pub struct PreferencesWatcher {
    _watcher_thread: std::thread::JoinHandle<()>,
    _bridge_thread: std::thread::JoinHandle<()>,
}

/// Send `()` on `tx` whenever the file at `path` is written or created.
pub fn spawn_preferences_watcher(
    path: PathBuf,
    tx: tokio_mpsc::UnboundedSender<()>,
) -> PreferencesWatcher {
    let (sync_tx, sync_rx) = mpsc::channel::<()>();

    let watcher_thread = std::thread::spawn(move || {
        if let Err(e) = watch_file(&path, &sync_tx) {
            error!("Preferences watcher error: {e}");
        }
    });

    let bridge_thread = std::thread::spawn(move || {
        while sync_rx.recv().is_ok() {
            debug!("Preferences file changed, sending reload notification");
            std::thread::sleep(RELOAD_SETTLE_DELAY);
            if tx.send(()).is_err() {
                debug!("Preferences reload receiver dropped, stopping watcher");
                break;
            }
        }
    });

    PreferencesWatcher {
        _watcher_thread: watcher_thread,
        _bridge_thread: bridge_thread,
    }
}

fn watch_file(path: &Path, tx: &mpsc::Sender<()>) -> Result<()> {
    let debounce = Arc::new(StdMutex::new(
        std::time::Instant::now()
            .checked_sub(DEBOUNCE_DURATION)
            .unwrap_or_else(std::time::Instant::now),
    ));
    let file_name = path.file_name().map(std::ffi::OsStr::to_owned);

    let (watcher_tx, watcher_rx) = mpsc::channel();

    let mut watcher =
        notify::recommended_watcher(move |result: notify::Result<notify::Event>| match result {
            Ok(event) => {
                if !matches!(
                    event.kind,
                    notify::EventKind::Modify(_) | notify::EventKind::Create(_)
                ) {
                    return;
                }
                if !event.paths.iter().any(|p| p.file_name() == file_name.as_deref()) {
                    return;
                }
                let Ok(mut last_event) = debounce.lock() else {
                    error!("[preferences_watcher] Debounce mutex poisoned, skipping event");
                    return;
                };
                let now = std::time::Instant::now();
                if now.duration_since(*last_event) > DEBOUNCE_DURATION {
                    *last_event = now;
                    let _ = watcher_tx.send(());
                }
            }
            Err(e) => {
                error!("Watcher error: {}", e);
            }
        })?;

    let Some(parent) = path.parent() else {
        return Err(DaemonError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "Invalid preferences path",
        )));
    };
    watcher.watch(parent, notify::RecursiveMode::NonRecursive)?;
    info!("Watching preferences directory: {:?}", parent);

    while watcher_rx.recv().is_ok() {
        if tx.send(()).is_err() {
            break;
        }
    }

    Ok(())
}
