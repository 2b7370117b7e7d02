//! Managed side of the bridge: keeps native menus in sync with a
//! declarative [`NativeMenu`] description.

pub mod exporter;
pub mod model;

pub use exporter::{ExportMode, MenuExporter};
pub use model::{NativeMenu, NativeMenuEntry, NativeMenuItem};
