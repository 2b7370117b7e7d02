//! `MenuBridgeTarget`: the Objective-C object AppKit talks to.
//!
//! One shared instance is the delegate of every exported `NSMenu` and the
//! target of every command `NSMenuItem`. Menus are looked up by pointer,
//! items by their tag. Lookups clone the Rust handle out of the registry
//! before calling it, so callbacks may create or destroy menus.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use objc2::runtime::{AnyProtocol, ClassBuilder};
use tracing::warn;

use super::ffi::{id, msg_send, nil, sel, AnyClass, AnyObject, Retained, Sel};
use super::toolkit::AppKitToolkit;
use crate::menu::{ItemTarget, MenuDelegate};

const CLASS_NAME: &std::ffi::CStr = c"MenuBridgeTarget";

thread_local! {
    static TARGET: RefCell<Option<Retained<AnyObject>>> = const { RefCell::new(None) };
    static NEXT_TAG: Cell<isize> = const { Cell::new(1) };
    static MENUS: RefCell<HashMap<usize, MenuDelegate<AppKitToolkit>>> = RefCell::new(HashMap::new());
    static ITEMS: RefCell<HashMap<isize, ItemTarget<AppKitToolkit>>> = RefCell::new(HashMap::new());
}

/// The shared target instance, registering the class on first use.
pub fn shared_target() -> id {
    TARGET.with(|cell| {
        let mut cell = cell.borrow_mut();
        if let Some(target) = cell.as_ref() {
            return Retained::as_ptr(target).cast_mut();
        }
        let Some(class) = target_class() else {
            warn!("failed to register menu target class");
            return nil;
        };
        let target: Option<Retained<AnyObject>> = unsafe { msg_send![class, new] };
        let ptr = target.as_ref().map_or(nil, |target| Retained::as_ptr(target).cast_mut());
        *cell = target;
        ptr
    })
}

pub fn next_tag() -> isize {
    NEXT_TAG.with(|tag| {
        let value = tag.get();
        tag.set(value + 1);
        value
    })
}

pub fn register_menu(menu: id, delegate: MenuDelegate<AppKitToolkit>) {
    MENUS.with(|menus| menus.borrow_mut().insert(menu as usize, delegate));
}

pub fn unregister_menu(menu: id) {
    let removed = MENUS.with(|menus| menus.borrow_mut().remove(&(menu as usize)));
    drop(removed);
}

pub fn register_item(tag: isize, target: ItemTarget<AppKitToolkit>) {
    ITEMS.with(|items| items.borrow_mut().insert(tag, target));
}

pub fn unregister_item(tag: isize) {
    let removed = ITEMS.with(|items| items.borrow_mut().remove(&tag));
    drop(removed);
}

fn target_class() -> Option<&'static AnyClass> {
    if let Some(class) = AnyClass::get(CLASS_NAME) {
        return Some(class);
    }
    let superclass = AnyClass::get(c"NSObject")?;
    let mut builder = ClassBuilder::new(CLASS_NAME, superclass)?;
    if let Some(protocol) = AnyProtocol::get(c"NSMenuDelegate") {
        builder.add_protocol(protocol);
    }
    unsafe {
        builder.add_method(
            sel!(menuNeedsUpdate:),
            menu_needs_update as unsafe extern "C-unwind" fn(_, _, _),
        );
        builder.add_method(
            sel!(didSelectItem:),
            did_select_item as unsafe extern "C-unwind" fn(_, _, _),
        );
    }
    Some(builder.register())
}

fn item_target(sender: id) -> Option<ItemTarget<AppKitToolkit>> {
    if sender.is_null() {
        return None;
    }
    let tag: isize = unsafe { msg_send![sender, tag] };
    ITEMS.with(|items| items.borrow().get(&tag).cloned())
}

unsafe extern "C-unwind" fn menu_needs_update(_this: *mut AnyObject, _cmd: Sel, menu: id) {
    let delegate = MENUS.with(|menus| menus.borrow().get(&(menu as usize)).cloned());
    if let Some(delegate) = delegate {
        delegate.menu_needs_update();
    }
}

unsafe extern "C-unwind" fn did_select_item(_this: *mut AnyObject, _cmd: Sel, sender: id) {
    if let Some(target) = item_target(sender) {
        target.did_select();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_is_driven_by_menu_needs_update_only() {
        let class = target_class().unwrap();
        assert!(class.instance_method(sel!(menuNeedsUpdate:)).is_some());
        assert!(class.instance_method(sel!(didSelectItem:)).is_some());
        assert!(class.instance_method(sel!(validateMenuItem:)).is_none());
    }
}
