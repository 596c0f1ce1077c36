//! panelmenu CLI
//!
//! Control entry point for the panelmenu daemon. Bind `panelmenu toggle`
//! to the menu hotkey and `panelmenu runner` to the runner hotkey.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use panelmenu_core::config::{Config, Directories};
use panelmenu_daemon::{ControlClient, resolve_socket_path};
use panelmenu_types::{ControlRequest, ControlResponse, MonitorIndex, SurfaceStatus};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;
use tokio::time::sleep;

/// Find a binary, preferring the dev build in target/debug if it exists
fn find_binary(name: &str) -> PathBuf {
    if let Ok(exe) = std::env::current_exe()
        && let Some(dir) = exe.parent()
    {
        let dev_binary = dir.join(name);
        if dev_binary.exists() {
            return dev_binary;
        }
    }
    PathBuf::from(name)
}

/// panelmenu CLI
#[derive(Parser, Debug)]
#[command(name = "panelmenu")]
#[command(about = "panelmenu - panel application menu")]
#[command(version)]
#[command(after_help = "\
Examples:
  panelmenu                     Toggle the menu (starts the daemon if needed)
  panelmenu daemon              Run the daemon in foreground (for systemd)
  panelmenu toggle --monitor 1  Toggle the menu for the pointer's monitor
  panelmenu runner              Toggle the standalone runner
  panelmenu status              Show every menu surface
  panelmenu reload              Re-read preferences.json
  panelmenu stop                Stop the daemon
")]
struct Cli {
    /// Custom socket path
    #[arg(long, global = true, value_name = "PATH")]
    socket_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Start the daemon in foreground (for systemd or manual use)
    Daemon,

    /// Toggle the panel menu
    Toggle {
        /// Monitor the pointer is on
        #[arg(long)]
        monitor: Option<MonitorIndex>,
    },

    /// Toggle the standalone runner
    Runner,

    /// Show daemon and surface status
    Status,

    /// Re-read preferences from disk
    Reload,

    /// Stop the daemon
    #[command(alias = "shutdown")]
    Stop,

    /// Restart the daemon
    Restart,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let socket = socket_path(cli.socket_path)?;

    match cli.command {
        None => {
            ensure_daemon_running(&socket).await?;
            send(&socket, ControlRequest::Toggle { monitor: None }).await
        }
        Some(Commands::Daemon) => run_daemon(&socket),
        Some(Commands::Toggle { monitor }) => send(&socket, ControlRequest::Toggle { monitor }).await,
        Some(Commands::Runner) => send(&socket, ControlRequest::ToggleRunner).await,
        Some(Commands::Status) => run_status(&socket).await,
        Some(Commands::Reload) => {
            send(&socket, ControlRequest::Reload).await?;
            println!("Preferences reloaded");
            Ok(())
        }
        Some(Commands::Stop) => run_stop(&socket).await,
        Some(Commands::Restart) => run_restart(&socket).await,
    }
}

fn socket_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    let dirs = Directories::new();
    let config = Config::load(&dirs.config_file)
        .with_context(|| format!("Failed to load {}", dirs.config_file.display()))?;
    Ok(resolve_socket_path(&dirs, &config, custom))
}

async fn connect(socket: &Path) -> Result<ControlClient> {
    if !socket.exists() {
        bail!(
            "Daemon not running (socket not found at {}).\nStart with: panelmenu daemon",
            socket.display()
        );
    }
    ControlClient::connect(socket)
        .await
        .context("Failed to connect to daemon. Is it running?")
}

async fn request(socket: &Path, request: ControlRequest) -> Result<ControlResponse> {
    let mut client = connect(socket).await?;
    client
        .request(&request)
        .await
        .with_context(|| format!("{request:?} request failed"))
}

/// Send a request that only expects `ok`
async fn send(socket: &Path, req: ControlRequest) -> Result<()> {
    match request(socket, req).await? {
        ControlResponse::Ok => Ok(()),
        ControlResponse::Error { message } => bail!("{message}"),
        other => bail!("Unexpected response: {other:?}"),
    }
}

/// Check if daemon is responsive (socket exists and answers a status request)
async fn is_daemon_responsive(socket: &Path) -> bool {
    matches!(
        request(socket, ControlRequest::Status).await,
        Ok(ControlResponse::Status { .. })
    )
}

async fn ensure_daemon_running(socket: &Path) -> Result<()> {
    if socket.exists() && is_daemon_responsive(socket).await {
        return Ok(());
    }

    eprintln!("Starting daemon...");
    start_daemon_background(socket)?;

    if !wait_for_daemon(socket, Duration::from_secs(5)).await {
        bail!("Daemon failed to start within 5 seconds");
    }
    eprintln!("Daemon started");
    Ok(())
}

fn daemon_command(socket: &Path) -> Command {
    let mut command = Command::new(find_binary("panelmenu-daemon"));
    command.arg("--socket-path").arg(socket);
    command
}

fn start_daemon_background(socket: &Path) -> Result<()> {
    let mut command = daemon_command(socket);
    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .context("Failed to spawn panelmenu-daemon. Is it installed?")?;
    Ok(())
}

async fn wait_for_daemon(socket: &Path, timeout: Duration) -> bool {
    let start = std::time::Instant::now();
    let poll_interval = Duration::from_millis(100);

    while start.elapsed() < timeout {
        if is_daemon_responsive(socket).await {
            return true;
        }
        sleep(poll_interval).await;
    }

    false
}

fn run_daemon(socket: &Path) -> Result<()> {
    let status = daemon_command(socket)
        .status()
        .context("Failed to start panelmenu-daemon. Is it installed?")?;
    if !status.success() {
        bail!("panelmenu-daemon exited with status: {status}");
    }
    Ok(())
}

async fn run_status(socket: &Path) -> Result<()> {
    if !socket.exists() {
        println!("Status: Not running");
        println!("Socket: {} (not found)", socket.display());
        return Ok(());
    }

    match request(socket, ControlRequest::Status).await {
        Ok(ControlResponse::Status { surfaces }) => {
            println!("Status: Running");
            println!("Socket: {}", socket.display());
            for surface in &surfaces {
                println!("{}", describe_surface(surface));
            }
        }
        Ok(other) => bail!("Unexpected response: {other:?}"),
        Err(e) => {
            println!("Status: Error");
            println!(
                "Socket: {} (exists but connection failed)",
                socket.display()
            );
            println!("Error: {e:#}");
        }
    }

    Ok(())
}

fn describe_surface(surface: &SurfaceStatus) -> String {
    let location = match surface.monitor {
        Some(monitor) => format!("monitor {monitor}"),
        None => "runner".to_string(),
    };
    let mut line = format!(
        "Surface {} ({location}): {}, view {}, {} pinned",
        surface.id,
        if surface.open { "open" } else { "closed" },
        surface.view,
        surface.pinned_count
    );
    if surface.context_menu_open {
        line.push_str(", context menu open");
    }
    if surface.dragging {
        line.push_str(", dragging");
    }
    line
}

async fn run_stop(socket: &Path) -> Result<()> {
    let mut client = connect(socket).await?;
    // The daemon may exit before the reply is flushed.
    let _ = client.request(&ControlRequest::Shutdown).await;
    println!("Daemon shutting down");
    Ok(())
}

async fn run_restart(socket: &Path) -> Result<()> {
    if let Ok(mut client) = connect(socket).await {
        let _ = client.request(&ControlRequest::Shutdown).await;
        for _ in 0..30 {
            if !socket.exists() {
                break;
            }
            sleep(Duration::from_millis(100)).await;
        }
    }

    start_daemon_background(socket)?;
    if !wait_for_daemon(socket, Duration::from_secs(5)).await {
        bail!("Daemon failed to restart within 5 seconds");
    }

    println!("Daemon restarted");
    Ok(())
}
