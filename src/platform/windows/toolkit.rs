//! [`Toolkit`] implementation over Win32 menus.
//!
//! A Win32 menu item has no existence outside its menu, so [`Win32Item`]
//! keeps the item's full state and rewrites it with `SetMenuItemInfoW`
//! whenever it changes while attached.

use windows::core::PWSTR;
use windows::Win32::Foundation::HWND;
use windows::Win32::UI::WindowsAndMessaging::{
    CreatePopupMenu, DestroyMenu, DrawMenuBar, InsertMenuItemW, RemoveMenu, SetMenu, SetMenuItemInfoW, HMENU,
    MENUITEMINFOW, MENU_ITEM_STATE, MFS_CHECKED, MFS_DISABLED, MFT_SEPARATOR, MFT_STRING, MF_BYCOMMAND, MIIM_FTYPE,
    MIIM_ID, MIIM_STATE, MIIM_STRING, MIIM_SUBMENU,
};

use tracing::warn;

use super::dispatch;
use crate::input::{KeyGesture, KeyModifiers};
use crate::menu::{ItemTarget, MenuDelegate, MenuItemKind};
use crate::toolkit::Toolkit;

/// Win32 toolkit. The application menu is installed on `window`, if set.
#[derive(Debug, Clone, Copy, Default)]
pub struct Win32Toolkit {
    window: Option<isize>,
}

/// Owned popup `HMENU`.
pub struct Win32Menu {
    handle: HMENU,
}

/// State of one Win32 menu item and the menu it currently lives in.
pub struct Win32Item {
    kind: MenuItemKind,
    command_id: u32,
    title: String,
    accelerator: Option<String>,
    checked: bool,
    enabled: bool,
    submenu: Option<HMENU>,
    parent: Option<HMENU>,
}

// SAFETY: menu handles are only used on the UI thread; the host marshals
// every call onto it.
unsafe impl Send for Win32Menu {}
unsafe impl Sync for Win32Menu {}
unsafe impl Send for Win32Item {}
unsafe impl Sync for Win32Item {}

impl Win32Toolkit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toolkit that installs the application menu as `window`'s menu bar.
    pub fn with_window(window: HWND) -> Self {
        Self {
            window: Some(window.0 as isize),
        }
    }

    fn window(&self) -> Option<HWND> {
        self.window.map(|hwnd| HWND(hwnd as *mut _))
    }
}

impl Win32Menu {
    pub fn handle(&self) -> HMENU {
        self.handle
    }
}

impl Win32Item {
    pub fn command_id(&self) -> u32 {
        self.command_id
    }

    /// Display text: title, then the accelerator after a tab.
    fn text(&self) -> Vec<u16> {
        let text = match &self.accelerator {
            Some(accelerator) => format!("{}\t{}", self.title, accelerator),
            None => self.title.clone(),
        };
        text.encode_utf16().chain(std::iter::once(0)).collect()
    }

    fn state(&self) -> MENU_ITEM_STATE {
        let mut state = MENU_ITEM_STATE(0);
        if self.checked {
            state |= MFS_CHECKED;
        }
        if !self.enabled {
            state |= MFS_DISABLED;
        }
        state
    }

    /// Run `f` with a `MENUITEMINFOW` describing the whole item.
    fn with_info<R>(&self, f: impl FnOnce(&MENUITEMINFOW) -> R) -> R {
        let mut text = self.text();
        let mut info = MENUITEMINFOW {
            cbSize: std::mem::size_of::<MENUITEMINFOW>() as u32,
            fMask: MIIM_ID | MIIM_FTYPE | MIIM_STATE | MIIM_SUBMENU,
            wID: self.command_id,
            fState: self.state(),
            hSubMenu: self.submenu.unwrap_or_default(),
            ..Default::default()
        };
        match self.kind {
            MenuItemKind::Separator => info.fType = MFT_SEPARATOR,
            MenuItemKind::Command => {
                info.fType = MFT_STRING;
                info.fMask |= MIIM_STRING;
                info.dwTypeData = PWSTR(text.as_mut_ptr());
                info.cch = (text.len() - 1) as u32;
            }
        }
        f(&info)
    }

    /// Push the item's state into its menu, if attached.
    fn refresh(&self) {
        let Some(parent) = self.parent else {
            return;
        };
        let result = self.with_info(|info| unsafe { SetMenuItemInfoW(parent, self.command_id, false, info) });
        if let Err(err) = result {
            warn!(command_id = self.command_id, error = %err, "SetMenuItemInfoW failed");
        }
    }
}

impl Toolkit for Win32Toolkit {
    type Menu = Win32Menu;
    type Item = Win32Item;

    fn create_menu(&self, delegate: MenuDelegate<Self>) -> Win32Menu {
        let handle = unsafe { CreatePopupMenu() }.unwrap_or_else(|err| {
            warn!(error = %err, "CreatePopupMenu failed");
            HMENU::default()
        });
        dispatch::register_menu(handle, delegate);
        Win32Menu { handle }
    }

    fn create_item(&self, kind: MenuItemKind, target: ItemTarget<Self>) -> Win32Item {
        let command_id = dispatch::reserve_command_id();
        if kind == MenuItemKind::Command {
            dispatch::register_command(command_id, target);
        }
        Win32Item {
            kind,
            command_id,
            title: String::new(),
            accelerator: None,
            checked: false,
            enabled: true,
            submenu: None,
            parent: None,
        }
    }

    fn set_menu_title(&self, _menu: &mut Win32Menu, _title: &str) {
        // Popup menus have no title of their own; the owning item carries it.
    }

    fn insert_item(&self, menu: &mut Win32Menu, index: usize, item: &mut Win32Item) {
        let position = u32::try_from(index).unwrap_or(u32::MAX);
        let result = item.with_info(|info| unsafe { InsertMenuItemW(menu.handle, position, true, info) });
        match result {
            Ok(()) => item.parent = Some(menu.handle),
            Err(err) => warn!(index, error = %err, "InsertMenuItemW failed"),
        }
    }

    fn remove_item(&self, menu: &mut Win32Menu, _index: usize, item: &mut Win32Item) {
        if let Err(err) = unsafe { RemoveMenu(menu.handle, item.command_id, MF_BYCOMMAND) } {
            warn!(command_id = item.command_id, error = %err, "RemoveMenu failed");
        }
        item.parent = None;
    }

    fn set_item_title(&self, item: &mut Win32Item, title: &str) {
        item.title = title.to_string();
        item.refresh();
    }

    fn set_item_submenu(&self, item: &mut Win32Item, submenu: Option<&Win32Menu>) {
        item.submenu = submenu.map(Win32Menu::handle);
        item.refresh();
    }

    fn set_item_gesture(&self, item: &mut Win32Item, gesture: Option<&KeyGesture>) {
        item.accelerator = gesture.map(accelerator_text);
        item.refresh();
    }

    fn set_item_checked(&self, item: &mut Win32Item, checked: bool) {
        item.checked = checked;
        item.refresh();
    }

    fn set_item_enabled(&self, item: &mut Win32Item, enabled: bool) {
        item.enabled = enabled;
        item.refresh();
    }

    fn set_application_menu(&self, menu: Option<&Win32Menu>) {
        let Some(window) = self.window() else {
            return;
        };
        unsafe {
            if let Err(err) = SetMenu(window, menu.map(Win32Menu::handle)) {
                warn!(error = %err, "SetMenu failed");
                return;
            }
            let _ = DrawMenuBar(window);
        }
    }
}

impl Drop for Win32Menu {
    fn drop(&mut self) {
        dispatch::unregister_menu(self.handle);
        unsafe {
            let _ = DestroyMenu(self.handle);
        }
    }
}

impl Drop for Win32Item {
    fn drop(&mut self) {
        dispatch::release_command_id(self.command_id);
    }
}

/// Accelerator text shown right-aligned in the menu, e.g. `Ctrl+Shift+S`.
fn accelerator_text(gesture: &KeyGesture) -> String {
    let modifiers = gesture.modifiers;
    let mut parts = Vec::new();
    if modifiers.contains(KeyModifiers::CONTROL) {
        parts.push("Ctrl".to_string());
    }
    if modifiers.contains(KeyModifiers::SHIFT) {
        parts.push("Shift".to_string());
    }
    if modifiers.contains(KeyModifiers::ALT) {
        parts.push("Alt".to_string());
    }
    if modifiers.contains(KeyModifiers::META) {
        parts.push("Win".to_string());
    }
    parts.push(gesture.key.to_string());
    parts.join("+")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Key;

    #[test]
    fn test_accelerator_text() {
        let gesture = KeyGesture::new(Key::S, KeyModifiers::CONTROL | KeyModifiers::SHIFT);
        assert_eq!(accelerator_text(&gesture), "Ctrl+Shift+S");

        let gesture = KeyGesture::new(Key::F4, KeyModifiers::ALT);
        assert_eq!(accelerator_text(&gesture), "Alt+F4");
    }
}
