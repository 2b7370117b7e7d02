//! Native toolkit boundary.
//!
//! The menu model owns one native menu per [`Menu`](crate::menu::Menu) and
//! one native item per [`MenuItem`](crate::menu::MenuItem), and mirrors every
//! mutation onto them synchronously through this trait. The toolkit calls
//! back into the model through the [`MenuDelegate`] and [`ItemTarget`] it is
//! handed at creation; both are non-owning.
//!
//! All methods are called on the UI thread. They are infallible: the native
//! primitives they wrap have no failure mode the model could act on.
//!
//! # Backends
//!
//! - [`headless`]: in-memory toolkit for tests and non-GUI hosts
//! - `platform::macos`: AppKit `NSMenu` / `NSMenuItem`
//! - `platform::windows`: Win32 `HMENU`

pub mod headless;

pub use headless::HeadlessToolkit;

use crate::input::KeyGesture;
use crate::menu::{ItemTarget, MenuDelegate, MenuItemKind};

/// Native menu primitives consumed by the menu model.
pub trait Toolkit: Send + Sync + Sized + 'static {
    /// Native menu object, exclusively owned by one `Menu`.
    type Menu: Send + Sync;

    /// Native menu item object, exclusively owned by one `MenuItem`.
    type Item: Send + Sync;

    fn create_menu(&self, delegate: MenuDelegate<Self>) -> Self::Menu;

    fn create_item(&self, kind: MenuItemKind, target: ItemTarget<Self>) -> Self::Item;

    fn set_menu_title(&self, menu: &mut Self::Menu, title: &str);

    /// Insert `item` at `index`; `index` is within `[0, len]`.
    fn insert_item(&self, menu: &mut Self::Menu, index: usize, item: &mut Self::Item);

    /// Remove `item`, currently at `index`.
    fn remove_item(&self, menu: &mut Self::Menu, index: usize, item: &mut Self::Item);

    fn set_item_title(&self, item: &mut Self::Item, title: &str);

    fn set_item_submenu(&self, item: &mut Self::Item, submenu: Option<&Self::Menu>);

    fn set_item_gesture(&self, item: &mut Self::Item, gesture: Option<&KeyGesture>);

    fn set_item_checked(&self, item: &mut Self::Item, checked: bool);

    fn set_item_enabled(&self, item: &mut Self::Item, enabled: bool);

    /// Install (or clear) the application-wide menu bar.
    fn set_application_menu(&self, menu: Option<&Self::Menu>);
}
