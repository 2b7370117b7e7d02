//! Menu exporter.
//!
//! Translates a [`NativeMenu`] description into [`Menu`] objects and keeps
//! them in sync. Each reset reconciles position by position:
//!
//! - same flavor at the same index: the native item is reused and updated
//! - flavor mismatch: the old item is removed and a new one inserted
//! - entries past the current end: appended
//! - native items past the description's end: removed
//!
//! Submenus are reconciled recursively with the same rules.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use super::model::{NativeMenu, NativeMenuEntry, NativeMenuItem};
use crate::com::{ComPtr, ComResult};
use crate::menu::{Menu, MenuItem, NativeFactory};
use crate::toolkit::Toolkit;

/// Where the exported menu ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportMode {
    /// Installed as the application menu bar, wrapped in a holder menu.
    Application,
    /// Kept for the host to attach, e.g. as a window's main menu.
    Window,
}

pub struct MenuExporter<T: Toolkit> {
    factory: Arc<NativeFactory<T>>,
    mode: ExportMode,
    menu: Option<NativeMenu>,
    root: Option<ComPtr<Menu<T>>>,
    reset_queued: bool,
    exported: bool,
}

impl<T: Toolkit> MenuExporter<T> {
    /// Exporter for the application menu. Exports immediately; without a
    /// menu set, a default one with "About {app_name}" is used.
    pub fn application(factory: Arc<NativeFactory<T>>) -> ComResult<Self> {
        Self::with_mode(factory, ExportMode::Application)
    }

    /// Exporter for a window menu. Nothing is built until a menu is set.
    pub fn window(factory: Arc<NativeFactory<T>>) -> ComResult<Self> {
        Self::with_mode(factory, ExportMode::Window)
    }

    fn with_mode(factory: Arc<NativeFactory<T>>, mode: ExportMode) -> ComResult<Self> {
        let mut exporter = Self {
            factory,
            mode,
            menu: None,
            root: None,
            reset_queued: true,
            exported: false,
        };
        exporter.do_layout_reset()?;
        Ok(exporter)
    }

    pub fn mode(&self) -> ExportMode {
        self.mode
    }

    pub fn is_native_menu_exported(&self) -> bool {
        self.exported
    }

    pub fn is_reset_queued(&self) -> bool {
        self.reset_queued
    }

    /// The description currently exported.
    pub fn menu(&self) -> Option<&NativeMenu> {
        self.menu.as_ref()
    }

    /// Root of the exported native tree. In application mode this is the
    /// holder menu.
    pub fn native_menu(&self) -> Option<ComPtr<Menu<T>>> {
        self.root.clone()
    }

    /// Replace the description and rebuild immediately. `None` exports an
    /// empty menu.
    pub fn set_native_menu(&mut self, menu: Option<NativeMenu>) -> ComResult<()> {
        self.menu = Some(menu.unwrap_or_default());
        self.reset_queued = true;
        self.do_layout_reset()
    }

    /// Mutable access to the description. Changes take effect on the next
    /// [`update_if_needed`](Self::update_if_needed) after a queued reset.
    pub fn menu_mut(&mut self) -> Option<&mut NativeMenu> {
        self.menu.as_mut()
    }

    /// Mark the native tree stale. Returns false if a reset was already queued.
    pub fn queue_reset(&mut self) -> bool {
        if self.reset_queued {
            return false;
        }
        self.reset_queued = true;
        true
    }

    /// Apply a queued reset. Returns whether anything was rebuilt.
    pub fn update_if_needed(&mut self) -> ComResult<bool> {
        if !self.reset_queued {
            return Ok(false);
        }
        self.do_layout_reset()?;
        Ok(true)
    }

    fn do_layout_reset(&mut self) -> ComResult<()> {
        if !self.reset_queued {
            return Ok(());
        }
        self.reset_queued = false;

        match self.mode {
            ExportMode::Application => {
                let app_name = self.factory.config().app_name.clone();
                let menu = self.menu.get_or_insert_with(|| default_app_menu(&app_name)).clone();
                let holder = NativeMenu::new().item(NativeMenuItem::new("").with_submenu(menu));
                let installed = self.root.is_some();
                let root = self.sync_root(&holder)?;
                if !installed {
                    self.factory.set_app_menu(Some(&root));
                }
            }
            ExportMode::Window => {
                if let Some(menu) = self.menu.clone() {
                    self.sync_root(&menu)?;
                }
            }
        }

        if !self.exported {
            info!(mode = ?self.mode, "native menu exported");
        }
        self.exported = true;
        Ok(())
    }

    fn sync_root(&mut self, description: &NativeMenu) -> ComResult<ComPtr<Menu<T>>> {
        let root = match &self.root {
            Some(root) => root.clone(),
            None => {
                let root = self.factory.create_menu();
                self.root = Some(root.clone());
                root
            }
        };
        self.sync_menu(&root, description)?;
        debug!(menu = %root.id(), entries = description.len(), "native menu reconciled");
        Ok(root)
    }

    fn sync_menu(&self, target: &ComPtr<Menu<T>>, description: &NativeMenu) -> ComResult<()> {
        let existing = target.items();

        for (index, entry) in description.items.iter().enumerate() {
            let reusable = existing.get(index).filter(|item| item.kind() == entry.kind());
            let item = match reusable {
                Some(item) => item.clone(),
                None => {
                    if let Some(stale) = existing.get(index) {
                        target.remove_item(stale)?;
                    }
                    let item = self.factory.create_item(entry.kind());
                    target.insert_item(index, &item)?;
                    item
                }
            };
            if let NativeMenuEntry::Item(description) = entry {
                self.sync_item(&item, description)?;
            }
        }

        for stale in existing.iter().skip(description.items.len()) {
            target.remove_item(stale)?;
        }
        Ok(())
    }

    fn sync_item(&self, item: &ComPtr<MenuItem<T>>, description: &NativeMenuItem) -> ComResult<()> {
        item.set_title(&description.header)?;
        item.set_key_gesture(description.gesture)?;
        item.set_is_checked(description.is_checked)?;
        item.set_action(description.predicate.as_ref(), description.on_click.as_ref())?;

        match &description.menu {
            Some(submenu) => {
                let target = match item.submenu() {
                    Some(target) => target,
                    None => {
                        let target = self.factory.create_menu();
                        item.set_submenu(Some(&target))?;
                        target
                    }
                };
                target.set_title(&description.header);
                self.sync_menu(&target, submenu)?;
            }
            None => {
                if item.submenu().is_some() {
                    item.set_submenu(None)?;
                }
            }
        }
        Ok(())
    }
}

impl<T: Toolkit> fmt::Debug for MenuExporter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuExporter")
            .field("mode", &self.mode)
            .field("root", &self.root.as_ref().map(|menu| menu.id()))
            .field("reset_queued", &self.reset_queued)
            .field("exported", &self.exported)
            .finish()
    }
}

fn default_app_menu(app_name: &str) -> NativeMenu {
    NativeMenu::new().item(NativeMenuItem::new(format!("About {app_name}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolkit::headless::{HeadlessMenu, HeadlessToolkit};

    fn setup() -> (HeadlessToolkit, Arc<NativeFactory<HeadlessToolkit>>) {
        let toolkit = HeadlessToolkit::new();
        let factory = Arc::new(NativeFactory::new(toolkit.clone()));
        (toolkit, factory)
    }

    #[test]
    fn test_application_mode_exports_default_menu() {
        let (toolkit, factory) = setup();
        let exporter = MenuExporter::application(Arc::clone(&factory)).unwrap();

        assert!(exporter.is_native_menu_exported());
        let holder = exporter.native_menu().unwrap();
        assert_eq!(toolkit.application_menu(), Some(holder.with_native(HeadlessMenu::key)));

        let app_item = holder.item_at(0).unwrap();
        let app_menu = app_item.submenu().unwrap();
        assert_eq!(toolkit.item_titles(app_menu.with_native(HeadlessMenu::key)), vec!["About Application"]);
    }

    #[test]
    fn test_window_mode_waits_for_a_menu() {
        let (_toolkit, factory) = setup();
        let mut exporter = MenuExporter::window(factory).unwrap();
        assert!(exporter.native_menu().is_none());

        exporter
            .set_native_menu(Some(NativeMenu::new().item(NativeMenuItem::new("Edit"))))
            .unwrap();
        assert_eq!(exporter.native_menu().unwrap().len(), 1);
    }

    #[test]
    fn test_queue_reset_is_applied_once() {
        let (_toolkit, factory) = setup();
        let mut exporter = MenuExporter::window(factory).unwrap();
        exporter.set_native_menu(Some(NativeMenu::new())).unwrap();

        assert!(!exporter.update_if_needed().unwrap());
        assert!(exporter.queue_reset());
        assert!(!exporter.queue_reset());
        assert!(exporter.update_if_needed().unwrap());
        assert!(!exporter.is_reset_queued());
    }
}
