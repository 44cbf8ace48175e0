/*
[INPUT]:  Public API exports for the taskview crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod config;
pub mod controller;
pub mod tui;
pub mod view;

// Re-export main types for convenience
pub use config::TaskViewConfig;
pub use controller::{ControllerError, ControllerOptions, LifecycleState, SyncController};
pub use tui::TaskBoard;
pub use view::{CreateTaskDialog, TaskTable, ViewEvent};
