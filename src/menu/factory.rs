//! Entry point for creating menu objects.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use super::{BridgeContext, Menu, MenuItem, MenuItemKind};
use crate::callback::EventSinkProxy;
use crate::com::ComPtr;
use crate::config::BridgeConfig;
use crate::toolkit::Toolkit;

/// Creates menus and items bound to one toolkit, and owns the application
/// menu currently installed on it.
pub struct NativeFactory<T: Toolkit> {
    context: Arc<BridgeContext<T>>,
    app_menu: Mutex<Option<ComPtr<Menu<T>>>>,
}

impl<T: Toolkit> NativeFactory<T> {
    pub fn new(toolkit: T) -> Self {
        Self::with_config(toolkit, BridgeConfig::default())
    }

    pub fn with_config(toolkit: T, config: BridgeConfig) -> Self {
        info!(app_name = %config.app_name, "menu bridge initialized");
        Self {
            context: Arc::new(BridgeContext::new(toolkit, config)),
            app_menu: Mutex::new(None),
        }
    }

    pub fn toolkit(&self) -> &T {
        self.context.toolkit()
    }

    pub fn config(&self) -> &BridgeConfig {
        self.context.config()
    }

    /// A new, empty menu. The caller holds the only reference.
    pub fn create_menu(&self) -> ComPtr<Menu<T>> {
        Menu::create(Arc::clone(&self.context))
    }

    /// A new command item with an empty title.
    pub fn create_menu_item(&self) -> ComPtr<MenuItem<T>> {
        MenuItem::create(Arc::clone(&self.context), MenuItemKind::Command)
    }

    pub fn create_separator(&self) -> ComPtr<MenuItem<T>> {
        MenuItem::create(Arc::clone(&self.context), MenuItemKind::Separator)
    }

    pub fn create_item(&self, kind: MenuItemKind) -> ComPtr<MenuItem<T>> {
        MenuItem::create(Arc::clone(&self.context), kind)
    }

    /// Route menu events to `sink`, or stop routing them with `None`.
    pub fn set_event_sink(&self, sink: Option<&ComPtr<EventSinkProxy>>) {
        let previous = self.context.set_event_sink(sink.cloned());
        debug!(installed = sink.is_some(), "event sink set");
        drop(previous);
    }

    /// Install `menu` as the application menu bar. The factory keeps a
    /// reference until it is replaced.
    pub fn set_app_menu(&self, menu: Option<&ComPtr<Menu<T>>>) {
        match menu {
            Some(menu) => menu.with_native(|native| self.toolkit().set_application_menu(Some(native))),
            None => self.toolkit().set_application_menu(None),
        }
        let previous = std::mem::replace(&mut *self.lock_app_menu(), menu.cloned());
        debug!(menu = ?menu.map(|menu| menu.id()), "application menu set");
        drop(previous);
    }

    pub fn app_menu(&self) -> Option<ComPtr<Menu<T>>> {
        self.lock_app_menu().clone()
    }

    fn lock_app_menu(&self) -> MutexGuard<'_, Option<ComPtr<Menu<T>>>> {
        self.app_menu.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Toolkit> fmt::Debug for NativeFactory<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFactory")
            .field("config", self.config())
            .field("app_menu", &self.lock_app_menu().as_ref().map(|menu| menu.id()))
            .finish()
    }
}

impl<T: Toolkit> Drop for NativeFactory<T> {
    fn drop(&mut self) {
        let menu = self.app_menu.get_mut().unwrap_or_else(PoisonError::into_inner).take();
        if menu.is_some() {
            self.context.toolkit().set_application_menu(None);
        }
    }
}
