//! In-memory toolkit.
//!
//! Keeps native menus and items in slot maps and exposes hooks to simulate
//! the user: opening a menu and selecting an item. Used by the test suite
//! and by hosts without a GUI.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use slotmap::{new_key_type, SlotMap};

use super::Toolkit;
use crate::input::KeyGesture;
use crate::menu::{ItemTarget, MenuDelegate, MenuItemKind};

new_key_type! {
    pub struct NativeMenuKey;
    pub struct NativeItemKey;
}

struct MenuRecord {
    title: String,
    items: Vec<NativeItemKey>,
    delegate: MenuDelegate<HeadlessToolkit>,
}

struct ItemRecord {
    kind: MenuItemKind,
    title: String,
    submenu: Option<NativeMenuKey>,
    gesture: Option<KeyGesture>,
    checked: bool,
    enabled: bool,
    parent: Option<NativeMenuKey>,
    target: ItemTarget<HeadlessToolkit>,
}

#[derive(Default)]
struct HeadlessStore {
    menus: SlotMap<NativeMenuKey, MenuRecord>,
    items: SlotMap<NativeItemKey, ItemRecord>,
    application_menu: Option<NativeMenuKey>,
}

/// Observable state of a native menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuSnapshot {
    pub title: String,
    pub items: Vec<NativeItemKey>,
}

/// Observable state of a native item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSnapshot {
    pub kind: MenuItemKind,
    pub title: String,
    pub submenu: Option<NativeMenuKey>,
    pub gesture: Option<KeyGesture>,
    pub checked: bool,
    pub enabled: bool,
    pub parent: Option<NativeMenuKey>,
}

/// Toolkit backed by plain data structures.
#[derive(Clone, Default)]
pub struct HeadlessToolkit {
    store: Arc<Mutex<HeadlessStore>>,
}

/// Native menu handle of the headless toolkit.
pub struct HeadlessMenu {
    key: NativeMenuKey,
    store: Arc<Mutex<HeadlessStore>>,
}

/// Native item handle of the headless toolkit.
pub struct HeadlessItem {
    key: NativeItemKey,
    store: Arc<Mutex<HeadlessStore>>,
}

impl HeadlessToolkit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the menu opening. Returns the number of items validated.
    pub fn open_menu(&self, menu: NativeMenuKey) -> usize {
        let delegate = self.lock().menus.get(menu).map(|record| record.delegate.clone());
        delegate.map_or(0, |delegate| delegate.menu_needs_update())
    }

    /// Simulate the user clicking an item.
    ///
    /// Disabled items and separators swallow the click and return false.
    pub fn select_item(&self, item: NativeItemKey) -> bool {
        let target = {
            let store = self.lock();
            match store.items.get(item) {
                Some(record) if record.enabled && record.kind == MenuItemKind::Command => record.target.clone(),
                _ => return false,
            }
        };
        target.did_select()
    }

    /// Ask the item's target whether it is enabled, as a menu would on hover.
    pub fn validate_item(&self, item: NativeItemKey) -> bool {
        let target = self.lock().items.get(item).map(|record| record.target.clone());
        target.is_some_and(|target| target.validate())
    }

    pub fn menu_snapshot(&self, menu: NativeMenuKey) -> Option<MenuSnapshot> {
        self.lock().menus.get(menu).map(|record| MenuSnapshot {
            title: record.title.clone(),
            items: record.items.clone(),
        })
    }

    pub fn item_snapshot(&self, item: NativeItemKey) -> Option<ItemSnapshot> {
        self.lock().items.get(item).map(|record| ItemSnapshot {
            kind: record.kind,
            title: record.title.clone(),
            submenu: record.submenu,
            gesture: record.gesture,
            checked: record.checked,
            enabled: record.enabled,
            parent: record.parent,
        })
    }

    /// Titles of the items of `menu` in display order; separators render as `-`.
    pub fn item_titles(&self, menu: NativeMenuKey) -> Vec<String> {
        let store = self.lock();
        let Some(record) = store.menus.get(menu) else {
            return Vec::new();
        };
        record
            .items
            .iter()
            .filter_map(|key| store.items.get(*key))
            .map(|item| match item.kind {
                MenuItemKind::Separator => "-".to_string(),
                MenuItemKind::Command => item.title.clone(),
            })
            .collect()
    }

    pub fn live_menus(&self) -> usize {
        self.lock().menus.len()
    }

    pub fn live_items(&self) -> usize {
        self.lock().items.len()
    }

    pub fn application_menu(&self) -> Option<NativeMenuKey> {
        self.lock().application_menu
    }

    fn lock(&self) -> MutexGuard<'_, HeadlessStore> {
        lock_store(&self.store)
    }

    fn with_item(&self, item: &HeadlessItem, f: impl FnOnce(&mut ItemRecord)) {
        if let Some(record) = self.lock().items.get_mut(item.key) {
            f(record);
        }
    }
}

impl fmt::Debug for HeadlessToolkit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let store = self.lock();
        f.debug_struct("HeadlessToolkit")
            .field("menus", &store.menus.len())
            .field("items", &store.items.len())
            .field("application_menu", &store.application_menu)
            .finish()
    }
}

impl Toolkit for HeadlessToolkit {
    type Menu = HeadlessMenu;
    type Item = HeadlessItem;

    fn create_menu(&self, delegate: MenuDelegate<Self>) -> HeadlessMenu {
        let key = self.lock().menus.insert(MenuRecord {
            title: String::new(),
            items: Vec::new(),
            delegate,
        });
        HeadlessMenu {
            key,
            store: Arc::clone(&self.store),
        }
    }

    fn create_item(&self, kind: MenuItemKind, target: ItemTarget<Self>) -> HeadlessItem {
        let key = self.lock().items.insert(ItemRecord {
            kind,
            title: String::new(),
            submenu: None,
            gesture: None,
            checked: false,
            enabled: true,
            parent: None,
            target,
        });
        HeadlessItem {
            key,
            store: Arc::clone(&self.store),
        }
    }

    fn set_menu_title(&self, menu: &mut HeadlessMenu, title: &str) {
        if let Some(record) = self.lock().menus.get_mut(menu.key) {
            record.title = title.to_string();
        }
    }

    fn insert_item(&self, menu: &mut HeadlessMenu, index: usize, item: &mut HeadlessItem) {
        let mut store = self.lock();
        if let Some(record) = store.menus.get_mut(menu.key) {
            let index = index.min(record.items.len());
            record.items.insert(index, item.key);
        }
        if let Some(record) = store.items.get_mut(item.key) {
            record.parent = Some(menu.key);
        }
    }

    fn remove_item(&self, menu: &mut HeadlessMenu, index: usize, item: &mut HeadlessItem) {
        let mut store = self.lock();
        if let Some(record) = store.menus.get_mut(menu.key) {
            if record.items.get(index) == Some(&item.key) {
                record.items.remove(index);
            } else {
                record.items.retain(|key| *key != item.key);
            }
        }
        if let Some(record) = store.items.get_mut(item.key) {
            record.parent = None;
        }
    }

    fn set_item_title(&self, item: &mut HeadlessItem, title: &str) {
        self.with_item(item, |record| record.title = title.to_string());
    }

    fn set_item_submenu(&self, item: &mut HeadlessItem, submenu: Option<&HeadlessMenu>) {
        self.with_item(item, |record| record.submenu = submenu.map(|menu| menu.key));
    }

    fn set_item_gesture(&self, item: &mut HeadlessItem, gesture: Option<&KeyGesture>) {
        self.with_item(item, |record| record.gesture = gesture.copied());
    }

    fn set_item_checked(&self, item: &mut HeadlessItem, checked: bool) {
        self.with_item(item, |record| record.checked = checked);
    }

    fn set_item_enabled(&self, item: &mut HeadlessItem, enabled: bool) {
        self.with_item(item, |record| record.enabled = enabled);
    }

    fn set_application_menu(&self, menu: Option<&HeadlessMenu>) {
        self.lock().application_menu = menu.map(|menu| menu.key);
    }
}

impl HeadlessMenu {
    pub fn key(&self) -> NativeMenuKey {
        self.key
    }
}

impl Drop for HeadlessMenu {
    fn drop(&mut self) {
        let mut store = lock_store(&self.store);
        let removed = store.menus.remove(self.key);
        for (_, item) in store.items.iter_mut() {
            if item.parent == Some(self.key) {
                item.parent = None;
            }
            if item.submenu == Some(self.key) {
                item.submenu = None;
            }
        }
        if store.application_menu == Some(self.key) {
            store.application_menu = None;
        }
        drop(store);
        drop(removed);
    }
}

impl HeadlessItem {
    pub fn key(&self) -> NativeItemKey {
        self.key
    }
}

impl Drop for HeadlessItem {
    fn drop(&mut self) {
        let mut store = lock_store(&self.store);
        let removed = store.items.remove(self.key);
        if let Some(parent) = removed.as_ref().and_then(|record| record.parent) {
            if let Some(menu) = store.menus.get_mut(parent) {
                menu.items.retain(|key| *key != self.key);
            }
        }
        drop(store);
        drop(removed);
    }
}

fn lock_store(store: &Mutex<HeadlessStore>) -> MutexGuard<'_, HeadlessStore> {
    store.lock().unwrap_or_else(PoisonError::into_inner)
}
