//! Socket server implementation for the panelmenu daemon.
//!
//! The menu engine is single-threaded, so it lives on its own thread with a
//! current-thread runtime. Socket connections run on the caller's runtime
//! and reach the engine through an [`EngineHandle`].

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use futures_util::{SinkExt, StreamExt};
use panelmenu_core::config::{Config, Directories};
use panelmenu_core::{MenuEngine, SurfaceOptions};
use panelmenu_types::{ControlRequest, ControlResponse};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::MissedTickBehavior;
use tokio_util::codec::{Framed, LinesCodec};
use tracing::{debug, error, info, trace, warn};

use crate::config_watcher::spawn_preferences_watcher;
use crate::error::{DaemonError, Result};
use crate::host::{DesktopEntryInventory, StaticWindowManager, xdg_application_dirs};
use crate::store::FileStore;

/// Longest control line accepted from a client
pub const MAX_LINE_LENGTH: usize = 64 * 1024;

type Engine = MenuEngine<FileStore, StaticWindowManager>;

/// Where the daemon reads its files from
#[derive(Debug, Clone)]
pub struct DaemonOptions {
    pub dirs: Directories,
    /// Overrides both `daemon.socketPath` and the default location
    pub socket_path: Option<PathBuf>,
    /// Directories scanned for `.desktop` files, highest priority first
    pub application_dirs: Vec<PathBuf>,
}

impl DaemonOptions {
    #[must_use]
    pub fn new(dirs: Directories) -> Self {
        Self {
            dirs,
            socket_path: None,
            application_dirs: xdg_application_dirs(),
        }
    }

    #[must_use]
    pub fn with_socket_path(mut self, path: Option<PathBuf>) -> Self {
        self.socket_path = path;
        self
    }

    #[must_use]
    pub fn with_application_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.application_dirs = dirs;
        self
    }
}

/// Control socket location: explicit path, then `daemon.socketPath`, then
/// the runtime directory.
#[must_use]
pub fn resolve_socket_path(dirs: &Directories, config: &Config, custom: Option<PathBuf>) -> PathBuf {
    custom
        .or_else(|| config.daemon.socket_path.clone())
        .unwrap_or_else(|| dirs.socket.clone())
}

enum EngineMessage {
    Control {
        request: ControlRequest,
        reply: oneshot::Sender<ControlResponse>,
    },
    PreferencesChanged,
}

/// Cloneable sender side of the engine thread
#[derive(Clone)]
pub struct EngineHandle {
    tx: mpsc::UnboundedSender<EngineMessage>,
}

impl EngineHandle {
    /// Run one control request on the engine thread.
    ///
    /// # Errors
    ///
    /// Returns [`DaemonError::EngineStopped`] if the engine thread has exited.
    pub async fn request(&self, request: ControlRequest) -> Result<ControlResponse> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(EngineMessage::Control { request, reply })
            .map_err(|_| DaemonError::EngineStopped)?;
        rx.await.map_err(|_| DaemonError::EngineStopped)
    }

    fn preferences_changed(&self) -> bool {
        self.tx.send(EngineMessage::PreferencesChanged).is_ok()
    }
}

/// Everything the engine thread owns
pub struct DaemonState {
    engine: Engine,
    started: Instant,
    shutdown: bool,
}

impl DaemonState {
    #[must_use]
    pub fn new(engine: Engine) -> Self {
        Self {
            engine,
            started: Instant::now(),
            shutdown: false,
        }
    }

    #[must_use]
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    #[must_use]
    pub fn is_shutdown(&self) -> bool {
        self.shutdown
    }

    pub fn handle(&mut self, request: ControlRequest) -> ControlResponse {
        trace!("Handling control request: {:?}", request);
        match request {
            ControlRequest::Toggle { monitor } => {
                self.engine.window_manager_mut().set_pointer_monitor(monitor);
                match self.engine.toggle() {
                    Some(outcome) => {
                        debug!(
                            "Surface {} is now {}",
                            outcome.surface,
                            if outcome.open { "open" } else { "closed" }
                        );
                        ControlResponse::Ok
                    }
                    None => error_response("No menu surface to toggle"),
                }
            }
            ControlRequest::ToggleRunner => match self.engine.toggle_runner() {
                Some(_) => ControlResponse::Ok,
                None => error_response("Standalone runner is disabled"),
            },
            ControlRequest::Status => ControlResponse::Status {
                surfaces: self.engine.statuses(),
            },
            ControlRequest::Reload => match self.reload() {
                Ok(()) => ControlResponse::Ok,
                Err(e) => e.into(),
            },
            ControlRequest::Shutdown => {
                self.shutdown = true;
                ControlResponse::Ok
            }
        }
    }

    /// Re-read `preferences.json` and apply whatever changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn reload(&mut self) -> Result<()> {
        let changed = self.engine.store_mut().reload()?;
        let delivered = self.engine.pump();
        info!(
            "Preferences reloaded: {} key(s) changed, {} update(s) delivered",
            changed.len(),
            delivered
        );
        Ok(())
    }

    /// Fire due engine timers
    pub fn tick(&mut self) -> usize {
        self.engine.advance_timers(self.started.elapsed())
    }
}

fn error_response(message: &str) -> ControlResponse {
    ControlResponse::Error {
        message: message.to_string(),
    }
}

/// Build the engine from the files under `dirs`.
///
/// # Errors
///
/// Returns an error if `preferences.json` exists but cannot be parsed.
pub fn build_state(dirs: &Directories, config: &Config, application_dirs: &[PathBuf]) -> Result<DaemonState> {
    let store = FileStore::open(&dirs.preferences_file)?;
    let wm = StaticWindowManager::from_config(&config.monitors);
    let inventory = DesktopEntryInventory::scan(application_dirs);
    let options = SurfaceOptions {
        leave_delay: config.navigation.leave_delay(),
        search_limit: config.search.max_results,
    };
    let engine = MenuEngine::new(store, wm, Box::new(inventory), options);
    Ok(DaemonState::new(engine))
}

/// Start the engine thread and wait until the engine is built.
async fn spawn_engine(
    dirs: Directories,
    config: Config,
    application_dirs: Vec<PathBuf>,
) -> Result<(EngineHandle, watch::Receiver<bool>)> {
    let (tx, rx) = mpsc::unbounded_channel();
    let (ready_tx, ready_rx) = oneshot::channel::<Result<()>>();
    let (stopped_tx, stopped_rx) = watch::channel(false);
    let tick = Duration::from_millis(config.daemon.tick_ms.max(1));

    let _engine_thread = std::thread::Builder::new()
        .name("panelmenu-engine".to_string())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    let _ = ready_tx.send(Err(e.into()));
                    return;
                }
            };
            runtime.block_on(async move {
                match build_state(&dirs, &config, &application_dirs) {
                    Ok(state) => {
                        let _ = ready_tx.send(Ok(()));
                        engine_loop(state, rx, tick).await;
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                    }
                }
            });
            let _ = stopped_tx.send(true);
        })?;

    ready_rx.await.map_err(|_| DaemonError::EngineStopped)??;
    Ok((EngineHandle { tx }, stopped_rx))
}

async fn engine_loop(
    mut state: DaemonState,
    mut rx: mpsc::UnboundedReceiver<EngineMessage>,
    tick: Duration,
) {
    let mut interval = tokio::time::interval(tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            message = rx.recv() => {
                let Some(message) = message else {
                    debug!("All engine handles dropped");
                    break;
                };
                match message {
                    EngineMessage::Control { request, reply } => {
                        let response = state.handle(request);
                        if reply.send(response).is_err() {
                            debug!("Control client went away before the reply");
                        }
                    }
                    EngineMessage::PreferencesChanged => {
                        if let Err(e) = state.reload() {
                            error!("Failed to reload preferences: {}", e);
                        }
                    }
                }
                if state.is_shutdown() {
                    info!("Engine stopping");
                    break;
                }
            }
            _ = interval.tick() => {
                state.tick();
            }
        }
    }
}

/// Run the daemon server until a `shutdown` request arrives.
///
/// # Errors
///
/// Returns an error if the config is invalid, another daemon owns the
/// socket, or the engine cannot be built.
pub async fn run(options: DaemonOptions) -> Result<()> {
    let DaemonOptions {
        dirs,
        socket_path,
        application_dirs,
    } = options;

    dirs.ensure_exists()?;
    let config = Config::load(&dirs.config_file)?;
    let path = resolve_socket_path(&dirs, &config, socket_path);

    cleanup_stale_socket(&path).await?;

    let preferences_file = dirs.preferences_file.clone();
    let (engine, mut stopped) = spawn_engine(dirs, config, application_dirs).await?;

    let listener = UnixListener::bind(&path)?;
    info!("Daemon listening on {:?}", path);

    let (reload_tx, mut reload_rx) = mpsc::unbounded_channel::<()>();
    let _watcher = spawn_preferences_watcher(preferences_file, reload_tx);
    let watcher_engine = engine.clone();
    tokio::spawn(async move {
        while reload_rx.recv().await.is_some() {
            debug!("Preferences reload event received");
            if !watcher_engine.preferences_changed() {
                break;
            }
        }
        debug!("Preferences watcher task ended");
    });

    info!("Ready to accept connections");
    loop {
        tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok((stream, _addr)) => {
                    debug!("Accepted connection");
                    let engine = engine.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, engine).await {
                            error!("Connection error: {}", e);
                        }
                    });
                }
                Err(e) => {
                    error!("Accept error: {}", e);
                }
            },
            _ = stopped.changed() => {
                info!("Shutdown requested, stopping server");
                break;
            }
        }
    }

    if path.exists()
        && let Err(e) = std::fs::remove_file(&path)
    {
        warn!("Failed to remove socket file {:?}: {}", path, e);
    }

    Ok(())
}

async fn cleanup_stale_socket(path: &Path) -> Result<()> {
    if path.exists() {
        if UnixStream::connect(path).await.is_ok() {
            return Err(DaemonError::Io(std::io::Error::new(
                std::io::ErrorKind::AddrInUse,
                "Another daemon is already running",
            )));
        }
        info!("Removing stale socket at {}", path.display());
        std::fs::remove_file(path)?;
    }
    Ok(())
}

async fn handle_connection(stream: UnixStream, engine: EngineHandle) -> Result<()> {
    let framed = Framed::new(stream, LinesCodec::new_with_max_length(MAX_LINE_LENGTH));
    let (mut sink, mut lines) = framed.split();

    while let Some(line) = lines.next().await {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let (response, stop) = match serde_json::from_str::<ControlRequest>(&line) {
            Ok(request) => {
                let stop = request == ControlRequest::Shutdown;
                let response = engine
                    .request(request)
                    .await
                    .unwrap_or_else(ControlResponse::from);
                (response, stop)
            }
            Err(e) => {
                warn!("Invalid control request: {}", e);
                (DaemonError::InvalidRequest(e.to_string()).into(), false)
            }
        };

        sink.send(serde_json::to_string(&response)?).await?;
        if stop {
            break;
        }
    }

    debug!("Connection closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use panelmenu_core::settings::keys;
    use panelmenu_core::SettingsStore;
    use tempfile::TempDir;

    fn state_in(dir: &TempDir, preferences: &str) -> DaemonState {
        let dirs = Directories::with_base(dir.path().to_path_buf());
        std::fs::write(&dirs.preferences_file, preferences).unwrap();
        build_state(&dirs, &Config::default(), &[]).unwrap()
    }

    #[test]
    fn test_toggle_opens_then_closes() {
        let dir = TempDir::new().unwrap();
        let mut state = state_in(&dir, "{}");

        assert_eq!(state.handle(ControlRequest::Toggle { monitor: None }), ControlResponse::Ok);
        assert_eq!(state.engine().coordinator().open_count(), 1);
        state.handle(ControlRequest::Toggle { monitor: None });
        assert_eq!(state.engine().coordinator().open_count(), 0);
    }

    #[test]
    fn test_single_monitor_toggle_keeps_focus() {
        let dir = TempDir::new().unwrap();
        let mut state = state_in(&dir, "{}");
        state.handle(ControlRequest::Toggle { monitor: Some(0) });
        assert_eq!(state.engine().window_manager().focused(), None);
        assert_eq!(state.engine().coordinator().open_count(), 1);
    }

    #[test]
    fn test_runner_disabled_is_an_error() {
        let dir = TempDir::new().unwrap();
        let mut state = state_in(&dir, "{}");
        assert!(matches!(
            state.handle(ControlRequest::ToggleRunner),
            ControlResponse::Error { .. }
        ));
    }

    #[test]
    fn test_status_lists_surfaces() {
        let dir = TempDir::new().unwrap();
        let mut state = state_in(&dir, r#"{"enable-standalone-runner-menu": true}"#);
        let ControlResponse::Status { surfaces } = state.handle(ControlRequest::Status) else {
            panic!("expected status");
        };
        assert_eq!(surfaces.len(), 2);
        assert!(surfaces.iter().any(|s| s.standalone));
    }

    #[test]
    fn test_reload_applies_file_edits() {
        let dir = TempDir::new().unwrap();
        let mut state = state_in(&dir, "{}");
        let path = state.engine().store().path().to_path_buf();

        std::fs::write(&path, r#"{"enable-standalone-runner-menu": true}"#).unwrap();
        assert_eq!(state.handle(ControlRequest::Reload), ControlResponse::Ok);
        assert_eq!(state.handle(ControlRequest::ToggleRunner), ControlResponse::Ok);
    }

    #[test]
    fn test_reload_with_broken_file_reports_error() {
        let dir = TempDir::new().unwrap();
        let mut state = state_in(&dir, r#"{"menu-layout": "redmond"}"#);
        let path = state.engine().store().path().to_path_buf();

        std::fs::write(&path, "{ broken").unwrap();
        assert!(matches!(
            state.handle(ControlRequest::Reload),
            ControlResponse::Error { .. }
        ));
        assert_eq!(
            state.engine().store().get(keys::MENU_LAYOUT),
            Some("redmond".into())
        );
    }

    #[test]
    fn test_reload_after_deleting_pinned_apps_clears_grid() {
        let dir = TempDir::new().unwrap();
        let mut state = state_in(&dir, r#"{"pinned-apps": ["A", "", "a.desktop", "B", "", "b.desktop"]}"#);
        let path = state.engine().store().path().to_path_buf();
        assert_eq!(state.engine().statuses()[0].pinned_count, 2);

        std::fs::write(&path, "{}").unwrap();
        assert_eq!(state.handle(ControlRequest::Reload), ControlResponse::Ok);
        assert_eq!(state.engine().statuses()[0].pinned_count, 0);
    }

    #[test]
    fn test_shutdown_sets_flag() {
        let dir = TempDir::new().unwrap();
        let mut state = state_in(&dir, "{}");
        assert!(!state.is_shutdown());
        state.handle(ControlRequest::Shutdown);
        assert!(state.is_shutdown());
    }

    #[test]
    fn test_socket_path_precedence() {
        let dirs = Directories::with_base(PathBuf::from("/tmp/pm"));
        let mut config = Config::default();
        assert_eq!(resolve_socket_path(&dirs, &config, None), dirs.socket);

        config.daemon.socket_path = Some(PathBuf::from("/tmp/config.sock"));
        assert_eq!(
            resolve_socket_path(&dirs, &config, None),
            PathBuf::from("/tmp/config.sock")
        );
        assert_eq!(
            resolve_socket_path(&dirs, &config, Some(PathBuf::from("/tmp/cli.sock"))),
            PathBuf::from("/tmp/cli.sock")
        );
    }
}
