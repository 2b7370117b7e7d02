//! AppKit backend: `NSMenu` / `NSMenuItem` via objc2.
//!
//! - `ffi`: raw object aliases and string helpers
//! - `target`: runtime-registered target class receiving menu callbacks
//! - `toolkit`: [`AppKitToolkit`]

pub mod ffi;
pub mod target;
pub mod toolkit;

pub use toolkit::{AppKitItem, AppKitMenu, AppKitToolkit};
