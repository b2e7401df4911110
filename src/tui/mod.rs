//! TUI module: Terminal User Interface using Ratatui.
//!
//! Screens:
//! - Dashboard with session and recent activity
//! - New detection form (location cascade, patient, image)
//! - Detection progress and result
//! - Statistics with placeholder fallback
//! - Record browser with CSV/XLS export

mod app;
mod styles;
mod ui;
mod worker;

pub use app::{App, Screen};
pub use styles::SafeCellTheme;
pub use worker::{DetectionProgress, DetectionWorker, DetectionWorkerHandle};
