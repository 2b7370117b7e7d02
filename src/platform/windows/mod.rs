//! Win32 backend: `HMENU` menus driven by `WM_COMMAND` and `WM_INITMENUPOPUP`.
//!
//! - `toolkit`: [`Win32Toolkit`] and its native handles
//! - `dispatch`: routing of window messages into the menu model

pub mod dispatch;
pub mod toolkit;

pub use dispatch::{dispatch_command, dispatch_init_menu_popup, handle_menu_message};
pub use toolkit::{Win32Item, Win32Menu, Win32Toolkit};
