//! Menu items.

use std::any::Any;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, trace, warn};

use super::{decode_title, is_self_or_ancestor, BridgeContext, ItemTarget, Menu};
use crate::callback::{ActionProxy, CallbackResult, PredicateProxy};
use crate::com::{
    iid::{IID_IMENU_ITEM, IID_IUNKNOWN},
    ComError, ComPtr, ComResult, ComWeak, Iid, Interface, ObjectId, Unknown,
};
use crate::events::MenuEvent;
use crate::input::{Key, KeyGesture, KeyModifiers};
use crate::toolkit::Toolkit;

/// Flavor of a menu item, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuItemKind {
    /// Regular selectable item.
    Command,
    /// Visual divider; carries no title, submenu, gesture or action.
    Separator,
}

pub(crate) struct ItemState<T: Toolkit> {
    native: T::Item,
    title: String,
    gesture: Option<KeyGesture>,
    checked: bool,
    submenu: Option<ComPtr<Menu<T>>>,
    predicate: Option<ComPtr<PredicateProxy>>,
    action: Option<ComPtr<ActionProxy>>,
    parent: Option<ComWeak<Menu<T>>>,
}

/// A single entry of a [`Menu`].
///
/// Created through [`NativeFactory`](super::NativeFactory). Every setter is
/// mirrored onto the native item before it returns.
pub struct MenuItem<T: Toolkit> {
    id: ObjectId,
    kind: MenuItemKind,
    this: ComWeak<MenuItem<T>>,
    context: Arc<BridgeContext<T>>,
    state: Mutex<ItemState<T>>,
}

impl<T: Toolkit> MenuItem<T> {
    pub(crate) fn create(context: Arc<BridgeContext<T>>, kind: MenuItemKind) -> ComPtr<Self> {
        let item = ComPtr::new_cyclic(|this| {
            let native = context.toolkit().create_item(kind, ItemTarget::new(this.clone()));
            Self {
                id: ObjectId::next(),
                kind,
                this,
                context,
                state: Mutex::new(ItemState {
                    native,
                    title: String::new(),
                    gesture: None,
                    checked: false,
                    submenu: None,
                    predicate: None,
                    action: None,
                    parent: None,
                }),
            }
        });
        trace!(item = %item.id, ?kind, "menu item created");
        item
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn kind(&self) -> MenuItemKind {
        self.kind
    }

    pub fn is_separator(&self) -> bool {
        self.kind == MenuItemKind::Separator
    }

    pub fn title(&self) -> String {
        self.lock().title.clone()
    }

    pub fn gesture(&self) -> Option<KeyGesture> {
        self.lock().gesture
    }

    pub fn is_checked(&self) -> bool {
        self.lock().checked
    }

    pub fn submenu(&self) -> Option<ComPtr<Menu<T>>> {
        self.lock().submenu.clone()
    }

    /// The menu this item currently belongs to.
    pub fn parent(&self) -> Option<ComPtr<Menu<T>>> {
        self.lock().parent.as_ref().and_then(ComWeak::upgrade)
    }

    pub fn is_attached(&self) -> bool {
        self.parent().is_some()
    }

    pub fn has_action(&self) -> bool {
        self.lock().action.is_some()
    }

    pub fn has_predicate(&self) -> bool {
        self.lock().predicate.is_some()
    }

    /// Set the item title. Bytes are decoded as UTF-8, lossily.
    pub fn set_title(&self, title: impl AsRef<[u8]>) -> ComResult<()> {
        self.ensure_command()?;
        let title = decode_title(title.as_ref());
        let mut state = self.lock();
        self.context.toolkit().set_item_title(&mut state.native, &title);
        debug!(item = %self.id, %title, "item title set");
        state.title = title;
        Ok(())
    }

    /// Attach `submenu` under this item, or detach the current one with `None`.
    ///
    /// The item takes a reference on the new submenu and releases the
    /// previous one. A menu can hang under one item at a time.
    pub fn set_submenu(&self, submenu: Option<&ComPtr<Menu<T>>>) -> ComResult<()> {
        self.ensure_command()?;

        if let Some(menu) = submenu {
            let same = self
                .lock()
                .submenu
                .as_ref()
                .is_some_and(|current| ComPtr::ptr_eq(current, menu));
            if same {
                return Ok(());
            }
            if let Some(parent) = self.parent() {
                if is_self_or_ancestor(&parent, menu) {
                    return Err(ComError::AlreadyAttached);
                }
            }
            menu.claim_owner(self.id, self.this.clone())?;
        }

        let previous = {
            let mut guard = self.lock();
            let state = &mut *guard;
            let previous = state.submenu.take();
            match submenu {
                Some(menu) => {
                    menu.with_native(|native| self.context.toolkit().set_item_submenu(&mut state.native, Some(native)));
                    state.submenu = Some(menu.clone());
                }
                None => self.context.toolkit().set_item_submenu(&mut state.native, None),
            }
            previous
        };

        if let Some(previous) = previous {
            previous.release_owner(self.id);
            debug!(item = %self.id, submenu = %previous.id(), "submenu detached");
        }
        if let Some(menu) = submenu {
            debug!(item = %self.id, submenu = %menu.id(), "submenu attached");
        }
        Ok(())
    }

    /// Set the keyboard accelerator. `Key::None` clears it.
    pub fn set_gesture(&self, key: Key, modifiers: KeyModifiers) -> ComResult<()> {
        let gesture = (key != Key::None).then(|| KeyGesture::new(key, modifiers));
        self.set_key_gesture(gesture)
    }

    /// Boundary form of [`set_gesture`](Self::set_gesture) taking raw codes.
    ///
    /// Unknown key codes clear the accelerator.
    pub fn set_gesture_codes(&self, key: u32, modifiers: u32) -> ComResult<()> {
        let key = Key::from_code(key).unwrap_or_else(|| {
            warn!(item = %self.id, code = key, "unknown key code; clearing accelerator");
            Key::None
        });
        self.set_gesture(key, KeyModifiers::from_bits_retain(modifiers))
    }

    pub fn set_key_gesture(&self, gesture: Option<KeyGesture>) -> ComResult<()> {
        self.ensure_command()?;
        let mut state = self.lock();
        self.context.toolkit().set_item_gesture(&mut state.native, gesture.as_ref());
        debug!(item = %self.id, gesture = ?gesture.map(|g| g.to_string()), "item gesture set");
        state.gesture = gesture;
        Ok(())
    }

    /// Replace both callbacks. The item holds its own reference on each and
    /// releases the ones it replaces.
    pub fn set_action(
        &self,
        predicate: Option<&ComPtr<PredicateProxy>>,
        action: Option<&ComPtr<ActionProxy>>,
    ) -> ComResult<()> {
        self.ensure_command()?;
        let (old_predicate, old_action) = {
            let mut state = self.lock();
            let old_predicate = std::mem::replace(&mut state.predicate, predicate.cloned());
            let old_action = std::mem::replace(&mut state.action, action.cloned());
            (old_predicate, old_action)
        };
        debug!(
            item = %self.id,
            predicate = predicate.is_some(),
            action = action.is_some(),
            "item callbacks set"
        );
        drop(old_predicate);
        drop(old_action);
        Ok(())
    }

    pub fn set_is_checked(&self, checked: bool) -> ComResult<()> {
        self.ensure_command()?;
        let mut state = self.lock();
        self.context.toolkit().set_item_checked(&mut state.native, checked);
        debug!(item = %self.id, checked, "item check state set");
        state.checked = checked;
        Ok(())
    }

    /// Run the enablement predicate and surface its failure.
    ///
    /// An item without a predicate is enabled.
    pub fn try_evaluate_item_enabled(&self) -> CallbackResult<bool> {
        let predicate = self.lock().predicate.clone();
        match predicate {
            Some(predicate) => predicate.evaluate(),
            None => Ok(true),
        }
    }

    /// Run the enablement predicate. A failing predicate disables the item.
    pub fn evaluate_item_enabled(&self) -> bool {
        match self.try_evaluate_item_enabled() {
            Ok(enabled) => enabled,
            Err(err) => {
                warn!(item = %self.id, error = %err, "enablement predicate failed; item disabled");
                self.report_failure(err.to_string());
                false
            }
        }
    }

    /// Run the action and surface its failure. No action is a no-op.
    pub fn try_raise_on_clicked(&self) -> CallbackResult<()> {
        let action = self.lock().action.clone();
        match action {
            Some(action) => action.invoke(),
            None => Ok(()),
        }
    }

    /// Run the action. A failure is logged and reported to the event sink.
    pub fn raise_on_clicked(&self) {
        if let Err(err) = self.try_raise_on_clicked() {
            warn!(item = %self.id, error = %err, "item action failed");
            self.report_failure(err.to_string());
        }
    }

    pub(crate) fn context(&self) -> &BridgeContext<T> {
        &self.context
    }

    /// Borrow the native item.
    pub fn with_native<R>(&self, f: impl FnOnce(&T::Item) -> R) -> R {
        f(&self.lock().native)
    }

    pub(crate) fn with_native_mut<R>(&self, f: impl FnOnce(&mut T::Item) -> R) -> R {
        f(&mut self.lock().native)
    }

    /// Mirror the evaluated enablement onto the native item.
    pub(crate) fn apply_enabled(&self, enabled: bool) {
        let mut state = self.lock();
        self.context.toolkit().set_item_enabled(&mut state.native, enabled);
    }

    /// Record `menu` as the parent. Fails if the item already has a live parent.
    pub(crate) fn attach(&self, menu: ComWeak<Menu<T>>) -> ComResult<()> {
        let mut state = self.lock();
        if state.parent.as_ref().is_some_and(ComWeak::is_alive) {
            return Err(ComError::AlreadyAttached);
        }
        state.parent = Some(menu);
        Ok(())
    }

    pub(crate) fn detach(&self) {
        self.lock().parent = None;
    }

    fn ensure_command(&self) -> ComResult<()> {
        match self.kind {
            MenuItemKind::Command => Ok(()),
            MenuItemKind::Separator => Err(ComError::NotApplicableToSeparator),
        }
    }

    fn report_failure(&self, message: String) {
        self.context.notify(MenuEvent::CallbackFailed { item: self.id, message });
    }

    fn lock(&self) -> MutexGuard<'_, ItemState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Toolkit> Unknown for MenuItem<T> {
    fn object_id(&self) -> ObjectId {
        self.id
    }

    fn interfaces(&self) -> &'static [Iid] {
        &[IID_IUNKNOWN, IID_IMENU_ITEM]
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

impl<T: Toolkit> Interface for MenuItem<T> {
    const IID: Iid = IID_IMENU_ITEM;
}

impl<T: Toolkit> fmt::Debug for MenuItem<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("MenuItem")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("title", &state.title)
            .field("gesture", &state.gesture)
            .field("checked", &state.checked)
            .field("submenu", &state.submenu.as_ref().map(|menu| menu.id()))
            .finish()
    }
}

impl<T: Toolkit> Drop for MenuItem<T> {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(submenu) = state.submenu.take() {
            self.context.toolkit().set_item_submenu(&mut state.native, None);
            submenu.release_owner(self.id);
        }
        trace!(item = %self.id, "menu item destroyed");
    }
}
