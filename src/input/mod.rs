//! Keyboard accelerators for menu items.
//!
//! - [`gesture`]: `Key`, `KeyModifiers` and `KeyGesture` (with parsing)

pub mod gesture;

pub use gesture::{GestureParseError, Key, KeyGesture, KeyModifiers};
