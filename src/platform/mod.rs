//! Native toolkit backends.
//!
//! Each backend implements [`Toolkit`](crate::toolkit::Toolkit) on top of the
//! platform's menu primitives and routes native notifications back into the
//! menu model. Both assume every call happens on the UI thread.

#[cfg(target_os = "macos")]
pub mod macos;

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(target_os = "macos")]
pub use macos::AppKitToolkit;

#[cfg(target_os = "windows")]
pub use windows::Win32Toolkit;
