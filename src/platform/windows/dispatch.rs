//! Window-procedure side of the Win32 backend.
//!
//! The host forwards its window messages to [`handle_menu_message`]. Menus
//! are looked up by `HMENU`, items by command id. Handles are cloned out of
//! the registries before being invoked.
//!
//! Every item, separators included, holds its command id until dropped, so
//! `MF_BYCOMMAND` lookups never hit another item after the ids wrap.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

use windows::Win32::Foundation::{LPARAM, WPARAM};
use windows::Win32::UI::WindowsAndMessaging::{HMENU, WM_COMMAND, WM_INITMENUPOPUP};

use super::toolkit::Win32Toolkit;
use crate::menu::{ItemTarget, MenuDelegate};

/// Command ids below this are left to the host.
const FIRST_COMMAND_ID: u32 = 0x1000;

thread_local! {
    static NEXT_COMMAND_ID: Cell<u32> = const { Cell::new(FIRST_COMMAND_ID) };
    static MENUS: RefCell<HashMap<isize, MenuDelegate<Win32Toolkit>>> = RefCell::new(HashMap::new());
    static COMMANDS: RefCell<HashMap<u32, ItemTarget<Win32Toolkit>>> = RefCell::new(HashMap::new());
    static RESERVED: RefCell<HashSet<u32>> = RefCell::new(HashSet::new());
}

/// Route a window message. Returns true if it was a menu message this
/// backend handled.
pub fn handle_menu_message(msg: u32, wparam: WPARAM, lparam: LPARAM) -> bool {
    match msg {
        WM_COMMAND => {
            // HIWORD is 0 for menu commands, 1 for accelerators. Controls
            // send their HWND in LPARAM and may reuse either code.
            let notification = (wparam.0 >> 16) & 0xFFFF;
            if notification > 1 || lparam.0 != 0 {
                return false;
            }
            dispatch_command((wparam.0 & 0xFFFF) as u32)
        }
        WM_INITMENUPOPUP => {
            dispatch_init_menu_popup(HMENU(wparam.0 as *mut _));
            true
        }
        _ => false,
    }
}

/// An item was selected. Returns false for ids this backend does not own.
pub fn dispatch_command(command_id: u32) -> bool {
    let target = COMMANDS.with(|commands| commands.borrow().get(&command_id).cloned());
    target.is_some_and(|target| target.did_select())
}

/// A popup menu is about to open. Returns the number of items validated.
pub fn dispatch_init_menu_popup(menu: HMENU) -> usize {
    let delegate = MENUS.with(|menus| menus.borrow().get(&(menu.0 as isize)).cloned());
    delegate.map_or(0, |delegate| delegate.menu_needs_update())
}

/// Take the next free command id. It stays taken until
/// [`release_command_id`].
pub(crate) fn reserve_command_id() -> u32 {
    let reserve = |id: u32| RESERVED.with(|reserved| reserved.borrow_mut().insert(id));
    NEXT_COMMAND_ID.with(|next| loop {
        let id = next.get();
        // Command ids travel in the low word of WPARAM.
        next.set(if id >= 0xFFFF { FIRST_COMMAND_ID } else { id + 1 });
        if reserve(id) {
            return id;
        }
    })
}

pub(crate) fn release_command_id(id: u32) {
    unregister_command(id);
    RESERVED.with(|reserved| reserved.borrow_mut().remove(&id));
}

pub(crate) fn register_menu(menu: HMENU, delegate: MenuDelegate<Win32Toolkit>) {
    MENUS.with(|menus| menus.borrow_mut().insert(menu.0 as isize, delegate));
}

pub(crate) fn unregister_menu(menu: HMENU) {
    let removed = MENUS.with(|menus| menus.borrow_mut().remove(&(menu.0 as isize)));
    drop(removed);
}

pub(crate) fn register_command(id: u32, target: ItemTarget<Win32Toolkit>) {
    COMMANDS.with(|commands| commands.borrow_mut().insert(id, target));
}

fn unregister_command(id: u32) {
    let removed = COMMANDS.with(|commands| commands.borrow_mut().remove(&id));
    drop(removed);
}
