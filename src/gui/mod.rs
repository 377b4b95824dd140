//! GUI module - User interface components

mod app;
mod control_panel;
mod map_viewer;

pub use app::CrimeMapApp;
pub use control_panel::{ControlPanel, ControlPanelAction, UserSettings, ViewMode};
pub use map_viewer::{MapViewer, RankedTables};
