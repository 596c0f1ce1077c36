use crate::Result;
use panelmenu_types::Rect;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main process configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub monitors: MonitorsConfig,

    #[serde(default)]
    pub navigation: NavigationConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub daemon: DaemonConfig,
}

impl Config {
    /// Load config from file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid JSON.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        super::validation::warn_unknown_fields(&content, "config.json");
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.monitors.outputs.is_empty() {
            return Err(crate::Error::Config(
                "monitors.outputs must list at least one monitor".to_string(),
            ));
        }
        if self.monitors.primary >= self.monitors.outputs.len() {
            return Err(crate::Error::Config(format!(
                "monitors.primary {} is out of range ({} monitors)",
                self.monitors.primary,
                self.monitors.outputs.len()
            )));
        }
        Ok(())
    }
}

/// Monitor layout used by the headless window manager
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorsConfig {
    #[serde(default = "default_outputs")]
    pub outputs: Vec<Rect>,

    #[serde(default)]
    pub primary: usize,
}

fn default_outputs() -> Vec<Rect> {
    vec![Rect::new(0.0, 0.0, 1920.0, 1080.0)]
}

impl Default for MonitorsConfig {
    fn default() -> Self {
        Self {
            outputs: default_outputs(),
            primary: 0,
        }
    }
}

/// Hover navigation timing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationConfig {
    /// Delay before leaving the category list forgets the navigating category
    #[serde(default = "default_leave_delay")]
    pub leave_delay_ms: u64,
}

fn default_leave_delay() -> u64 {
    200
}

impl NavigationConfig {
    #[must_use]
    pub fn leave_delay(&self) -> Duration {
        Duration::from_millis(self.leave_delay_ms)
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            leave_delay_ms: default_leave_delay(),
        }
    }
}

/// Search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchConfig {
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

fn default_max_results() -> usize {
    30
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
        }
    }
}

/// Daemon process configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaemonConfig {
    /// Overrides the default control socket location
    #[serde(default)]
    pub socket_path: Option<PathBuf>,

    /// How often pending timers are checked
    #[serde(default = "default_tick")]
    pub tick_ms: u64,
}

fn default_tick() -> u64 {
    25
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            socket_path: None,
            tick_ms: default_tick(),
        }
    }
}
