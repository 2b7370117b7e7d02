//! Declarative menu description.

use crate::callback::{ActionProxy, CallbackResult, PredicateProxy};
use crate::com::ComPtr;
use crate::input::KeyGesture;
use crate::menu::MenuItemKind;

/// A menu as the managed side describes it.
#[derive(Debug, Clone, Default)]
pub struct NativeMenu {
    pub items: Vec<NativeMenuEntry>,
}

#[derive(Debug, Clone)]
pub enum NativeMenuEntry {
    Item(NativeMenuItem),
    Separator,
}

/// One command entry of a [`NativeMenu`].
#[derive(Debug, Clone, Default)]
pub struct NativeMenuItem {
    pub header: String,
    pub gesture: Option<KeyGesture>,
    pub is_checked: bool,
    /// Enablement predicate; absent means always enabled.
    pub predicate: Option<ComPtr<PredicateProxy>>,
    pub on_click: Option<ComPtr<ActionProxy>>,
    pub menu: Option<NativeMenu>,
}

impl NativeMenu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn item(mut self, item: NativeMenuItem) -> Self {
        self.items.push(NativeMenuEntry::Item(item));
        self
    }

    pub fn separator(mut self) -> Self {
        self.items.push(NativeMenuEntry::Separator);
        self
    }

    pub fn push(&mut self, entry: NativeMenuEntry) {
        self.items.push(entry);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl NativeMenuEntry {
    pub fn kind(&self) -> MenuItemKind {
        match self {
            NativeMenuEntry::Item(_) => MenuItemKind::Command,
            NativeMenuEntry::Separator => MenuItemKind::Separator,
        }
    }
}

impl NativeMenuItem {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            ..Self::default()
        }
    }

    pub fn with_gesture(mut self, gesture: KeyGesture) -> Self {
        self.gesture = Some(gesture);
        self
    }

    pub fn checked(mut self, is_checked: bool) -> Self {
        self.is_checked = is_checked;
        self
    }

    pub fn enabled_when(mut self, predicate: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        self.predicate = Some(PredicateProxy::new(predicate));
        self
    }

    pub fn on_click(mut self, action: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_click = Some(ActionProxy::new(action));
        self
    }

    pub fn on_click_fallible(mut self, action: impl Fn() -> CallbackResult<()> + Send + Sync + 'static) -> Self {
        self.on_click = Some(ActionProxy::fallible(action));
        self
    }

    pub fn with_submenu(mut self, menu: NativeMenu) -> Self {
        self.menu = Some(menu);
        self
    }
}

impl From<NativeMenuItem> for NativeMenuEntry {
    fn from(item: NativeMenuItem) -> Self {
        NativeMenuEntry::Item(item)
    }
}
