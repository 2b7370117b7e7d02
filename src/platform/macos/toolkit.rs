//! [`Toolkit`] implementation over AppKit.

use objc2::MainThreadMarker;
use tracing::warn;

use super::ffi::{
    id, msg_send, nil, nsstring, sel, AnyObject, Bool, ClassType, NSApplication, NSMenu, NSMenuItem, Retained, NO,
    NS_CONTROL_STATE_OFF, NS_CONTROL_STATE_ON, NS_F1_FUNCTION_KEY, NS_MODIFIER_COMMAND, NS_MODIFIER_CONTROL,
    NS_MODIFIER_OPTION, NS_MODIFIER_SHIFT,
};
use super::target;
use crate::input::{Key, KeyGesture, KeyModifiers};
use crate::menu::{ItemTarget, MenuDelegate, MenuItemKind};
use crate::toolkit::Toolkit;

/// AppKit toolkit. Only constructible on the main thread.
#[derive(Debug, Clone, Copy)]
pub struct AppKitToolkit {
    _private: (),
}

/// Owned `NSMenu`.
pub struct AppKitMenu {
    menu: Retained<AnyObject>,
}

/// Owned `NSMenuItem`.
pub struct AppKitItem {
    item: Retained<AnyObject>,
    tag: Option<isize>,
}

// SAFETY: AppKit objects are only touched from the main thread; the toolkit
// cannot be constructed elsewhere and the host marshals every call onto it.
unsafe impl Send for AppKitMenu {}
unsafe impl Sync for AppKitMenu {}
unsafe impl Send for AppKitItem {}
unsafe impl Sync for AppKitItem {}

impl AppKitToolkit {
    pub fn new() -> Option<Self> {
        MainThreadMarker::new().map(|_| Self { _private: () })
    }
}

impl AppKitMenu {
    pub fn as_ptr(&self) -> id {
        Retained::as_ptr(&self.menu).cast_mut()
    }
}

impl AppKitItem {
    pub fn as_ptr(&self) -> id {
        Retained::as_ptr(&self.item).cast_mut()
    }
}

impl Toolkit for AppKitToolkit {
    type Menu = AppKitMenu;
    type Item = AppKitItem;

    fn create_menu(&self, delegate: MenuDelegate<Self>) -> AppKitMenu {
        let menu: Retained<AnyObject> = unsafe { msg_send![NSMenu::class(), new] };
        let ptr = Retained::as_ptr(&menu).cast_mut();
        // Enablement is pushed from menuNeedsUpdate:; AppKit must not override it.
        unsafe {
            let _: () = msg_send![ptr, setAutoenablesItems: NO];
            let _: () = msg_send![ptr, setDelegate: target::shared_target()];
        }
        target::register_menu(ptr, delegate);
        AppKitMenu { menu }
    }

    fn create_item(&self, kind: MenuItemKind, item_target: ItemTarget<Self>) -> AppKitItem {
        match kind {
            MenuItemKind::Separator => {
                let item: Retained<AnyObject> = unsafe { msg_send![NSMenuItem::class(), separatorItem] };
                AppKitItem { item, tag: None }
            }
            MenuItemKind::Command => {
                let item: Retained<AnyObject> = unsafe { msg_send![NSMenuItem::class(), new] };
                let tag = target::next_tag();
                unsafe {
                    let _: () = msg_send![&*item, setTarget: target::shared_target()];
                    let _: () = msg_send![&*item, setAction: sel!(didSelectItem:)];
                    let _: () = msg_send![&*item, setTag: tag];
                }
                target::register_item(tag, item_target);
                AppKitItem { item, tag: Some(tag) }
            }
        }
    }

    fn set_menu_title(&self, menu: &mut AppKitMenu, title: &str) {
        unsafe {
            let _: () = msg_send![&*menu.menu, setTitle: &*nsstring(title)];
        }
    }

    fn insert_item(&self, menu: &mut AppKitMenu, index: usize, item: &mut AppKitItem) {
        let Ok(index) = isize::try_from(index) else {
            warn!(index, "menu index exceeds NSInteger range");
            return;
        };
        unsafe {
            let _: () = msg_send![&*menu.menu, insertItem: &*item.item, atIndex: index];
        }
    }

    fn remove_item(&self, menu: &mut AppKitMenu, _index: usize, item: &mut AppKitItem) {
        unsafe {
            let _: () = msg_send![&*menu.menu, removeItem: &*item.item];
        }
    }

    fn set_item_title(&self, item: &mut AppKitItem, title: &str) {
        unsafe {
            let _: () = msg_send![&*item.item, setTitle: &*nsstring(title)];
        }
    }

    fn set_item_submenu(&self, item: &mut AppKitItem, submenu: Option<&AppKitMenu>) {
        let submenu = submenu.map_or(nil, AppKitMenu::as_ptr);
        unsafe {
            let _: () = msg_send![&*item.item, setSubmenu: submenu];
        }
    }

    fn set_item_gesture(&self, item: &mut AppKitItem, gesture: Option<&KeyGesture>) {
        let (equivalent, mask) = gesture.map_or((String::new(), 0), key_equivalent);
        unsafe {
            let _: () = msg_send![&*item.item, setKeyEquivalent: &*nsstring(&equivalent)];
            let _: () = msg_send![&*item.item, setKeyEquivalentModifierMask: mask];
        }
    }

    fn set_item_checked(&self, item: &mut AppKitItem, checked: bool) {
        let state = if checked { NS_CONTROL_STATE_ON } else { NS_CONTROL_STATE_OFF };
        unsafe {
            let _: () = msg_send![&*item.item, setState: state];
        }
    }

    fn set_item_enabled(&self, item: &mut AppKitItem, enabled: bool) {
        unsafe {
            let _: () = msg_send![&*item.item, setEnabled: Bool::new(enabled)];
        }
    }

    fn set_application_menu(&self, menu: Option<&AppKitMenu>) {
        let menu = menu.map_or(nil, AppKitMenu::as_ptr);
        unsafe {
            let app: id = msg_send![NSApplication::class(), sharedApplication];
            let _: () = msg_send![app, setMainMenu: menu];
        }
    }
}

impl Drop for AppKitMenu {
    fn drop(&mut self) {
        let ptr = self.as_ptr();
        unsafe {
            let _: () = msg_send![ptr, setDelegate: nil];
        }
        target::unregister_menu(ptr);
    }
}

impl Drop for AppKitItem {
    fn drop(&mut self) {
        if let Some(tag) = self.tag {
            unsafe {
                let _: () = msg_send![&*self.item, setTarget: nil];
            }
            target::unregister_item(tag);
        }
    }
}

/// Key equivalent string and modifier mask for `gesture`.
///
/// Meta maps to Command. Letters are lowercase; Shift is carried by the mask.
fn key_equivalent(gesture: &KeyGesture) -> (String, usize) {
    let equivalent = match gesture.key {
        Key::Back => "\u{8}".to_string(),
        Key::Tab => "\t".to_string(),
        Key::Enter => "\r".to_string(),
        Key::Escape => "\u{1b}".to_string(),
        Key::Delete => "\u{7f}".to_string(),
        key => match (key.function_number(), key.character()) {
            (Some(n), _) => char::from_u32(NS_F1_FUNCTION_KEY + n - 1).map(String::from).unwrap_or_default(),
            (None, Some(c)) => c.to_string(),
            (None, None) => String::new(),
        },
    };

    let modifiers = gesture.modifiers;
    let mut mask = 0;
    if modifiers.contains(KeyModifiers::META) {
        mask |= NS_MODIFIER_COMMAND;
    }
    if modifiers.contains(KeyModifiers::CONTROL) {
        mask |= NS_MODIFIER_CONTROL;
    }
    if modifiers.contains(KeyModifiers::ALT) {
        mask |= NS_MODIFIER_OPTION;
    }
    if modifiers.contains(KeyModifiers::SHIFT) {
        mask |= NS_MODIFIER_SHIFT;
    }
    (equivalent, mask)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_equivalent_for_letter() {
        let gesture = KeyGesture::new(Key::S, KeyModifiers::META | KeyModifiers::SHIFT);
        assert_eq!(key_equivalent(&gesture), ("s".to_string(), NS_MODIFIER_COMMAND | NS_MODIFIER_SHIFT));
    }

    #[test]
    fn test_key_equivalent_for_function_key() {
        let gesture = KeyGesture::new(Key::F5, KeyModifiers::empty());
        assert_eq!(key_equivalent(&gesture), ("\u{F708}".to_string(), 0));
    }
}
