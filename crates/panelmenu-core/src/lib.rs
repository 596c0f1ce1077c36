//! Navigation, drag-reorder, coordination and settings routing for a
//! panel-anchored application menu.

pub mod category;
pub mod config;
pub mod coordinator;
pub mod drag;
pub mod host;
pub mod layout;
pub mod navigation;
pub mod pinned;
pub mod settings;
pub mod surface;
pub mod timer;

// Exposed for benchmarks - not part of stable API
#[doc(hidden)]
pub mod search;

mod engine;
mod error;

#[cfg(test)]
mod tests;

pub use category::{CategoryItem, CategoryKind};
pub use coordinator::{MenuCoordinator, TargetPolicy, ToggleOutcome};
pub use drag::{DragCommit, DragMotionResult, DragReorderSession, GridCell, GridGeometry};
pub use engine::MenuEngine;
pub use error::{Error, Result};
pub use host::{ApplicationInventory, StaticInventory, WindowManager};
pub use layout::{ActiveView, LayoutKind, LayoutProfile};
pub use navigation::NavigationPredictor;
pub use settings::{MemoryStore, SettingsDispatcher, SettingsStore, UpdateOp};
pub use surface::{GridMetrics, MenuSurface, SurfaceId, SurfaceOptions, SurfaceRole};
pub use timer::{TimerHandle, TimerQueue};

pub use panelmenu_types::*;
