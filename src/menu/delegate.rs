//! Toolkit-facing callbacks.
//!
//! The native toolkit receives a [`MenuDelegate`] for every menu and an
//! [`ItemTarget`] for every item. Both hold weak references: a native
//! object firing after its managed counterpart is gone does nothing.

use std::fmt;

use tracing::trace;

use super::{Menu, MenuItem};
use crate::com::{ComPtr, ComWeak};
use crate::events::MenuEvent;
use crate::toolkit::Toolkit;

/// Receives "menu is about to open" from the toolkit.
pub struct MenuDelegate<T: Toolkit> {
    menu: ComWeak<Menu<T>>,
}

impl<T: Toolkit> MenuDelegate<T> {
    pub(crate) fn new(menu: ComWeak<Menu<T>>) -> Self {
        Self { menu }
    }

    pub fn menu(&self) -> Option<ComPtr<Menu<T>>> {
        self.menu.upgrade()
    }

    /// The menu is about to be displayed.
    ///
    /// Evaluates every item's enablement and pushes it to the native items
    /// when `validate_on_open` is set. Items are snapshotted first, so a
    /// predicate may mutate the menu. Returns the number of items validated.
    pub fn menu_needs_update(&self) -> usize {
        let Some(menu) = self.menu.upgrade() else {
            return 0;
        };
        let context = menu.context();
        context.notify(MenuEvent::MenuOpening { menu: menu.id() });
        if !context.config().validate_on_open {
            return 0;
        }

        let items = menu.items();
        for item in &items {
            if item.is_separator() {
                continue;
            }
            let enabled = validate(item);
            item.apply_enabled(enabled);
        }
        trace!(menu = %menu.id(), count = items.len(), "menu validated");
        items.len()
    }
}

impl<T: Toolkit> Clone for MenuDelegate<T> {
    fn clone(&self) -> Self {
        Self {
            menu: self.menu.clone(),
        }
    }
}

impl<T: Toolkit> fmt::Debug for MenuDelegate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuDelegate")
            .field("menu", &self.menu.upgrade().map(|menu| menu.id()))
            .finish()
    }
}

/// Receives selection and per-item validation from the toolkit.
pub struct ItemTarget<T: Toolkit> {
    item: ComWeak<MenuItem<T>>,
}

impl<T: Toolkit> ItemTarget<T> {
    pub(crate) fn new(item: ComWeak<MenuItem<T>>) -> Self {
        Self { item }
    }

    pub fn item(&self) -> Option<ComPtr<MenuItem<T>>> {
        self.item.upgrade()
    }

    /// The user selected the item. Returns false if the item is gone.
    pub fn did_select(&self) -> bool {
        let Some(item) = self.item.upgrade() else {
            return false;
        };
        item.context().notify(MenuEvent::ItemClicked { item: item.id() });
        item.raise_on_clicked();
        true
    }

    /// The toolkit asks whether the item is currently enabled.
    pub fn validate(&self) -> bool {
        self.item.upgrade().is_some_and(|item| validate(&item))
    }
}

impl<T: Toolkit> Clone for ItemTarget<T> {
    fn clone(&self) -> Self {
        Self {
            item: self.item.clone(),
        }
    }
}

impl<T: Toolkit> fmt::Debug for ItemTarget<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemTarget")
            .field("item", &self.item.upgrade().map(|item| item.id()))
            .finish()
    }
}

fn validate<T: Toolkit>(item: &MenuItem<T>) -> bool {
    let enabled = item.evaluate_item_enabled();
    item.context().notify(MenuEvent::ItemValidated {
        item: item.id(),
        enabled,
    });
    enabled
}
