//! Shared types for panelmenu components.
//!
//! This crate provides the types used across panelmenu-core, panelmenu-daemon
//! and panelmenu-cli. Everything here is plain data and serializable so it can
//! cross the control socket or be persisted in the preferences file.

use serde::{Deserialize, Deserializer, Serialize};

/// Deserialize a Vec that may be null or missing (both become empty vec)
fn deserialize_null_as_empty_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let opt: Option<Vec<T>> = Option::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

/// Index of a monitor as reported by the window manager
pub type MonitorIndex = usize;

/// A point in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Whether `point` lies inside the rectangle (edges inclusive)
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }
}

/// A user-pinned shortcut.
///
/// Persisted as three consecutive strings: name, icon, command. An empty icon
/// means "resolve the icon from the application the command refers to".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PinnedApp {
    pub name: String,
    pub icon: String,
    pub command: String,
}

impl PinnedApp {
    #[must_use]
    pub fn new(name: impl Into<String>, icon: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon: icon.into(),
            command: command.into(),
        }
    }

    /// Whether an explicit icon was stored for this entry
    #[must_use]
    pub fn has_icon(&self) -> bool {
        !self.icon.is_empty()
    }

    /// Whether the command names a desktop application rather than a shell command
    #[must_use]
    pub fn is_desktop_app(&self) -> bool {
        self.command.ends_with(".desktop")
    }
}

/// An installed application as reported by the application inventory
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AppDescriptor {
    /// Desktop file id, e.g. `org.gnome.Nautilus.desktop`
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    /// Freedesktop main categories (`Office`, `Game`, ...)
    #[serde(default, deserialize_with = "deserialize_null_as_empty_vec")]
    pub categories: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_null_as_empty_vec")]
    pub keywords: Vec<String>,
}

impl AppDescriptor {
    /// Build the pinned entry that pins this application
    #[must_use]
    pub fn to_pinned(&self) -> PinnedApp {
        PinnedApp::new(&self.name, "", &self.id)
    }
}

/// A typed preference value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
    Double(f64),
    Str(String),
    StrList(Vec<String>),
}

impl SettingValue {
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric value; integers widen to f64
    // Preference integers are small pixel counts
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Double(d) => Some(*d),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str_list(&self) -> Option<&[String]> {
        match self {
            Self::StrList(list) => Some(list),
            _ => None,
        }
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for SettingValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for SettingValue {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<Vec<String>> for SettingValue {
    fn from(value: Vec<String>) -> Self {
        Self::StrList(value)
    }
}

/// Requests accepted on the daemon control socket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlRequest {
    /// Toggle the panel menu. `monitor` reports where the pointer currently is.
    Toggle {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        monitor: Option<MonitorIndex>,
    },

    /// Toggle the standalone runner
    ToggleRunner,

    /// Report the state of every surface
    Status,

    /// Re-read preferences from disk
    Reload,

    /// Stop the daemon
    Shutdown,
}

/// Replies sent on the daemon control socket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlResponse {
    Ok,
    Status {
        #[serde(default, deserialize_with = "deserialize_null_as_empty_vec")]
        surfaces: Vec<SurfaceStatus>,
    },
    Error {
        message: String,
    },
}

/// Snapshot of one menu surface for status reporting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceStatus {
    pub id: u32,
    /// `None` for the standalone runner
    #[serde(default)]
    pub monitor: Option<MonitorIndex>,
    pub standalone: bool,
    pub open: bool,
    pub context_menu_open: bool,
    /// Human-readable name of the active view
    pub view: String,
    pub pinned_count: usize,
    pub dragging: bool,
}
