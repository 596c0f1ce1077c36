mod dirs;
mod settings;
mod validation;

pub use dirs::Directories;
pub use settings::{Config, DaemonConfig, MonitorsConfig, NavigationConfig, SearchConfig};
pub use validation::{unknown_preference_keys, warn_unknown_fields, warn_unknown_preferences};
