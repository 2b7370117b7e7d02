//! Menus: ordered containers of items.

use std::any::Any;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, trace};

use super::{decode_title, is_self_or_ancestor, BridgeContext, MenuDelegate, MenuItem};
use crate::com::{
    iid::{IID_IMENU, IID_IUNKNOWN},
    ComError, ComPtr, ComResult, ComWeak, Iid, Interface, ObjectId, Unknown,
};
use crate::toolkit::Toolkit;

struct MenuState<T: Toolkit> {
    native: T::Menu,
    title: String,
    children: Vec<ComPtr<MenuItem<T>>>,
    /// Item this menu hangs under as a submenu.
    owner: Option<(ObjectId, ComWeak<MenuItem<T>>)>,
}

/// Ordered list of menu items backed by one native menu.
///
/// The menu holds one reference on each child; removing a child releases
/// it. Dropping the menu detaches and releases all children first.
pub struct Menu<T: Toolkit> {
    id: ObjectId,
    this: ComWeak<Menu<T>>,
    context: Arc<BridgeContext<T>>,
    state: Mutex<MenuState<T>>,
}

impl<T: Toolkit> Menu<T> {
    pub(crate) fn create(context: Arc<BridgeContext<T>>) -> ComPtr<Self> {
        let menu = ComPtr::new_cyclic(|this| {
            let native = context.toolkit().create_menu(MenuDelegate::new(this.clone()));
            Self {
                id: ObjectId::next(),
                this,
                context,
                state: Mutex::new(MenuState {
                    native,
                    title: String::new(),
                    children: Vec::new(),
                    owner: None,
                }),
            }
        });
        trace!(menu = %menu.id, "menu created");
        menu
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn title(&self) -> String {
        self.lock().title.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().children.is_empty()
    }

    /// Snapshot of the children, each acquired.
    pub fn items(&self) -> Vec<ComPtr<MenuItem<T>>> {
        self.lock().children.clone()
    }

    pub fn item_at(&self, index: usize) -> Option<ComPtr<MenuItem<T>>> {
        self.lock().children.get(index).cloned()
    }

    pub fn index_of(&self, item: &ComPtr<MenuItem<T>>) -> Option<usize> {
        self.lock().children.iter().position(|child| ComPtr::ptr_eq(child, item))
    }

    pub fn contains(&self, item: &ComPtr<MenuItem<T>>) -> bool {
        self.index_of(item).is_some()
    }

    /// The item this menu is attached to as a submenu.
    pub fn owner(&self) -> Option<ComPtr<MenuItem<T>>> {
        self.lock().owner.as_ref().and_then(|(_, item)| item.upgrade())
    }

    pub fn set_title(&self, title: impl AsRef<[u8]>) {
        let title = decode_title(title.as_ref());
        let mut state = self.lock();
        self.context.toolkit().set_menu_title(&mut state.native, &title);
        debug!(menu = %self.id, %title, "menu title set");
        state.title = title;
    }

    /// Insert `item` so it ends up at `index`; later items shift right.
    ///
    /// `index == len` appends. The menu acquires the item.
    pub fn insert_item(&self, index: usize, item: &ComPtr<MenuItem<T>>) -> ComResult<()> {
        if let (Some(this), Some(submenu)) = (self.this.upgrade(), item.submenu()) {
            if is_self_or_ancestor(&this, &submenu) {
                return Err(ComError::AlreadyAttached);
            }
        }

        let mut guard = self.lock();
        let state = &mut *guard;
        let len = state.children.len();
        if index > len {
            return Err(ComError::OutOfRange { index, len });
        }
        item.attach(self.this.clone())?;
        item.with_native_mut(|native| self.context.toolkit().insert_item(&mut state.native, index, native));
        state.children.insert(index, item.clone());
        debug!(menu = %self.id, item = %item.id(), index, "item inserted");
        Ok(())
    }

    pub fn append_item(&self, item: &ComPtr<MenuItem<T>>) -> ComResult<()> {
        let len = self.len();
        self.insert_item(len, item)
    }

    /// Remove `item` and release the menu's reference on it.
    pub fn remove_item(&self, item: &ComPtr<MenuItem<T>>) -> ComResult<()> {
        let removed = {
            let mut guard = self.lock();
            let state = &mut *guard;
            let index = state
                .children
                .iter()
                .position(|child| ComPtr::ptr_eq(child, item))
                .ok_or(ComError::NotFound)?;
            let removed = state.children.remove(index);
            removed.with_native_mut(|native| self.context.toolkit().remove_item(&mut state.native, index, native));
            removed.detach();
            debug!(menu = %self.id, item = %removed.id(), index, "item removed");
            removed
        };
        drop(removed);
        Ok(())
    }

    /// Remove every child, releasing them in index order.
    pub fn clear(&self) {
        let removed = {
            let mut guard = self.lock();
            let state = &mut *guard;
            let removed = std::mem::take(&mut state.children);
            for item in &removed {
                item.with_native_mut(|native| self.context.toolkit().remove_item(&mut state.native, 0, native));
                item.detach();
            }
            removed
        };
        if !removed.is_empty() {
            debug!(menu = %self.id, count = removed.len(), "menu cleared");
        }
        drop(removed);
    }

    pub(crate) fn context(&self) -> &BridgeContext<T> {
        &self.context
    }

    /// Borrow the native menu.
    pub fn with_native<R>(&self, f: impl FnOnce(&T::Menu) -> R) -> R {
        f(&self.lock().native)
    }

    /// Record `item` as the owner of this menu.
    pub(crate) fn claim_owner(&self, id: ObjectId, item: ComWeak<MenuItem<T>>) -> ComResult<()> {
        let mut state = self.lock();
        match &state.owner {
            Some((owner, weak)) if *owner != id && weak.is_alive() => Err(ComError::AlreadyAttached),
            _ => {
                state.owner = Some((id, item));
                Ok(())
            }
        }
    }

    pub(crate) fn release_owner(&self, id: ObjectId) {
        let mut state = self.lock();
        if state.owner.as_ref().is_some_and(|(owner, _)| *owner == id) {
            state.owner = None;
        }
    }

    fn lock(&self) -> MutexGuard<'_, MenuState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Toolkit> Unknown for Menu<T> {
    fn object_id(&self) -> ObjectId {
        self.id
    }

    fn interfaces(&self) -> &'static [Iid] {
        &[IID_IUNKNOWN, IID_IMENU]
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

impl<T: Toolkit> Interface for Menu<T> {
    const IID: Iid = IID_IMENU;
}

impl<T: Toolkit> fmt::Debug for Menu<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("Menu")
            .field("id", &self.id)
            .field("title", &state.title)
            .field("children", &state.children.iter().map(|item| item.id()).collect::<Vec<_>>())
            .finish()
    }
}

impl<T: Toolkit> Drop for Menu<T> {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        let children = std::mem::take(&mut state.children);
        for item in &children {
            item.with_native_mut(|native| self.context.toolkit().remove_item(&mut state.native, 0, native));
            item.detach();
        }
        drop(children);
        trace!(menu = %self.id, "menu destroyed");
    }
}
