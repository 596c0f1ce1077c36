//! panelmenu daemon library providing the control socket server.
//!
//! The daemon owns a [`panelmenu_core::MenuEngine`] backed by
//! `preferences.json`, a static monitor layout and the installed desktop
//! entries. `panelmenu` and panel scripts talk to it over a Unix socket
//! with one JSON object per line.

pub mod client;
pub(crate) mod config_watcher;
pub mod error;
pub mod host;
pub mod server;
pub mod store;

pub use client::ControlClient;
pub use error::{DaemonError, Result};
pub use host::{DesktopEntryInventory, StaticWindowManager, parse_desktop_entry, xdg_application_dirs};
pub use server::{DaemonOptions, DaemonState, EngineHandle, build_state, resolve_socket_path, run};
pub use store::FileStore;
