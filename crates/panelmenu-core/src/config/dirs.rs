use directories::ProjectDirs;
use std::path::PathBuf;

const SOCKET_NAME: &str = "panelmenu.sock";

/// Application directories following the XDG base directory layout
#[derive(Debug, Clone)]
pub struct Directories {
    /// Config directory (~/.config/panelmenu)
    pub config: PathBuf,

    /// Process config file path
    pub config_file: PathBuf,

    /// Persisted preferences (the settings store)
    pub preferences_file: PathBuf,

    /// Control socket ($XDG_RUNTIME_DIR/panelmenu.sock)
    pub socket: PathBuf,
}

impl Directories {
    /// Create a new `Directories` instance with standard XDG paths.
    ///
    /// # Panics
    ///
    /// Panics if the system's project directories cannot be determined.
    #[must_use]
    pub fn new() -> Self {
        let project = ProjectDirs::from("", "", "panelmenu")
            .expect("Failed to determine project directories");

        let config = project.config_dir().to_path_buf();
        let socket = project
            .runtime_dir()
            .map_or_else(std::env::temp_dir, std::path::Path::to_path_buf)
            .join(SOCKET_NAME);

        Self {
            config_file: config.join("config.json"),
            preferences_file: config.join("preferences.json"),
            config,
            socket,
        }
    }

    #[must_use]
    pub fn with_base(base: PathBuf) -> Self {
        Self {
            config_file: base.join("config.json"),
            preferences_file: base.join("preferences.json"),
            socket: base.join(SOCKET_NAME),
            config: base,
        }
    }

    /// Ensure the config directory holding both JSON files exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn ensure_exists(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.config)
    }
}

impl Default for Directories {
    fn default() -> Self {
        Self::new()
    }
}
