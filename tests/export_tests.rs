//! Tests for MenuExporter reconciliation against the headless toolkit.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use menubridge::toolkit::headless::{HeadlessItem, HeadlessMenu};
use menubridge::{
    BridgeConfig, ComPtr, HeadlessToolkit, Key, KeyGesture, KeyModifiers, Menu, MenuExporter, NativeFactory,
    NativeMenu, NativeMenuItem,
};
use pretty_assertions::assert_eq;

fn setup() -> (HeadlessToolkit, Arc<NativeFactory<HeadlessToolkit>>) {
    let toolkit = HeadlessToolkit::new();
    let factory = Arc::new(NativeFactory::new(toolkit.clone()));
    (toolkit, factory)
}

/// Indented outline of the native tree: one line per item, submenus nested.
fn outline(toolkit: &HeadlessToolkit, menu: &ComPtr<Menu<HeadlessToolkit>>) -> Vec<String> {
    let mut lines = Vec::new();
    walk(toolkit, menu, 0, &mut lines);
    lines
}

fn walk(toolkit: &HeadlessToolkit, menu: &ComPtr<Menu<HeadlessToolkit>>, depth: usize, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    for (item, title) in menu
        .items()
        .iter()
        .zip(toolkit.item_titles(menu.with_native(HeadlessMenu::key)))
    {
        let native = toolkit.item_snapshot(item.with_native(HeadlessItem::key)).unwrap();
        let mut line = format!("{indent}{title}");
        if let Some(gesture) = native.gesture {
            line.push_str(&format!(" [{gesture}]"));
        }
        if native.checked {
            line.push_str(" (x)");
        }
        lines.push(line);
        if let Some(submenu) = item.submenu() {
            walk(toolkit, &submenu, depth + 1, lines);
        }
    }
}

fn file_menu() -> NativeMenu {
    NativeMenu::new()
        .item(NativeMenuItem::new("New").with_gesture(KeyGesture::new(Key::N, KeyModifiers::CONTROL)))
        .item(NativeMenuItem::new("Open"))
        .separator()
        .item(NativeMenuItem::new("Quit"))
}

// === Window mode ===

#[test]
fn exports_a_nested_description() {
    let (toolkit, factory) = setup();
    let mut exporter = MenuExporter::window(factory).unwrap();
    let description = NativeMenu::new()
        .item(NativeMenuItem::new("File").with_submenu(file_menu()))
        .item(
            NativeMenuItem::new("View").with_submenu(
                NativeMenu::new()
                    .item(NativeMenuItem::new("Sidebar").checked(true))
                    .item(NativeMenuItem::new("Zoom").with_submenu(NativeMenu::new().item(NativeMenuItem::new("In")))),
            ),
        );

    exporter.set_native_menu(Some(description)).unwrap();
    let root = exporter.native_menu().unwrap();

    assert_eq!(
        outline(&toolkit, &root),
        vec![
            "File",
            "  New [Ctrl+N]",
            "  Open",
            "  -",
            "  Quit",
            "View",
            "  Sidebar (x)",
            "  Zoom",
            "    In",
        ]
    );
}

#[test]
fn reset_reuses_items_of_the_same_flavor() {
    let (toolkit, factory) = setup();
    let mut exporter = MenuExporter::window(factory).unwrap();
    exporter.set_native_menu(Some(file_menu())).unwrap();
    let root = exporter.native_menu().unwrap();
    let before = root.items();

    let renamed = NativeMenu::new()
        .item(NativeMenuItem::new("New Window"))
        .item(NativeMenuItem::new("Open…"))
        .separator()
        .item(NativeMenuItem::new("Exit"));
    exporter.set_native_menu(Some(renamed)).unwrap();

    let after = root.items();
    assert_eq!(before.len(), after.len());
    for (old, new) in before.iter().zip(&after) {
        assert!(ComPtr::ptr_eq(old, new));
    }
    assert_eq!(outline(&toolkit, &root), vec!["New Window", "Open…", "-", "Exit"]);
    assert_eq!(after[0].gesture(), None);
}

#[test]
fn reset_replaces_flavor_mismatches_and_trims_the_tail() {
    let (toolkit, factory) = setup();
    let mut exporter = MenuExporter::window(factory).unwrap();
    exporter.set_native_menu(Some(file_menu())).unwrap();
    let root = exporter.native_menu().unwrap();
    let before = root.items();

    let changed = NativeMenu::new()
        .item(NativeMenuItem::new("New"))
        .separator()
        .item(NativeMenuItem::new("Close"));
    exporter.set_native_menu(Some(changed)).unwrap();

    let after = root.items();
    assert!(ComPtr::ptr_eq(&before[0], &after[0]));
    assert!(!ComPtr::ptr_eq(&before[1], &after[1]));
    assert!(after[1].is_separator());
    assert!(!before[1].is_attached());
    assert_eq!(outline(&toolkit, &root), vec!["New", "-", "Close"]);
    drop(before);
    assert_eq!(toolkit.live_items(), 3);
}

#[test]
fn reset_appends_new_entries() {
    let (toolkit, factory) = setup();
    let mut exporter = MenuExporter::window(factory).unwrap();
    exporter
        .set_native_menu(Some(NativeMenu::new().item(NativeMenuItem::new("One"))))
        .unwrap();
    exporter
        .set_native_menu(Some(
            NativeMenu::new()
                .item(NativeMenuItem::new("One"))
                .item(NativeMenuItem::new("Two"))
                .item(NativeMenuItem::new("Three")),
        ))
        .unwrap();

    let root = exporter.native_menu().unwrap();
    assert_eq!(outline(&toolkit, &root), vec!["One", "Two", "Three"]);
}

#[test]
fn dropping_a_submenu_from_the_description_detaches_it() {
    let (toolkit, factory) = setup();
    let mut exporter = MenuExporter::window(factory).unwrap();
    exporter
        .set_native_menu(Some(NativeMenu::new().item(NativeMenuItem::new("File").with_submenu(file_menu()))))
        .unwrap();
    assert_eq!(toolkit.live_menus(), 2);

    exporter
        .set_native_menu(Some(NativeMenu::new().item(NativeMenuItem::new("File"))))
        .unwrap();
    assert_eq!(toolkit.live_menus(), 1);
    assert_eq!(toolkit.live_items(), 1);
}

#[test]
fn queued_edits_apply_on_update() {
    let (toolkit, factory) = setup();
    let mut exporter = MenuExporter::window(factory).unwrap();
    exporter.set_native_menu(Some(file_menu())).unwrap();

    if let Some(menu) = exporter.menu_mut() {
        menu.items.truncate(2);
    }
    let root = exporter.native_menu().unwrap();
    assert_eq!(root.len(), 4);

    assert!(exporter.queue_reset());
    assert!(exporter.update_if_needed().unwrap());
    assert_eq!(outline(&toolkit, &root), vec!["New [Ctrl+N]", "Open"]);
}

#[test]
fn exported_click_handlers_fire_on_selection() {
    let (toolkit, factory) = setup();
    let clicks = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&clicks);
    let mut exporter = MenuExporter::window(factory).unwrap();
    exporter
        .set_native_menu(Some(NativeMenu::new().item(NativeMenuItem::new("Ping").on_click(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }))))
        .unwrap();

    let item = exporter.native_menu().unwrap().item_at(0).unwrap();
    assert!(toolkit.select_item(item.with_native(HeadlessItem::key)));
    assert_eq!(clicks.load(Ordering::SeqCst), 1);
}

#[test]
fn exported_predicates_drive_enablement() {
    let (toolkit, factory) = setup();
    let mut exporter = MenuExporter::window(factory).unwrap();
    exporter
        .set_native_menu(Some(NativeMenu::new().item(NativeMenuItem::new("Undo").enabled_when(|| false))))
        .unwrap();

    let root = exporter.native_menu().unwrap();
    toolkit.open_menu(root.with_native(HeadlessMenu::key));
    let item = root.item_at(0).unwrap();
    assert!(!toolkit.item_snapshot(item.with_native(HeadlessItem::key)).unwrap().enabled);
}

// === Application mode ===

#[test]
fn application_menu_wraps_the_description_in_a_holder() {
    let (toolkit, factory) = setup();
    let mut exporter = MenuExporter::application(Arc::clone(&factory)).unwrap();
    exporter.set_native_menu(Some(file_menu())).unwrap();

    let holder = exporter.native_menu().unwrap();
    assert_eq!(toolkit.application_menu(), Some(holder.with_native(HeadlessMenu::key)));
    assert_eq!(holder.len(), 1);
    assert_eq!(
        outline(&toolkit, &holder),
        vec!["", "  New [Ctrl+N]", "  Open", "  -", "  Quit"]
    );
    assert!(ComPtr::ptr_eq(&factory.app_menu().unwrap(), &holder));
}

#[test]
fn default_application_menu_uses_the_configured_name() {
    let toolkit = HeadlessToolkit::new();
    let config = BridgeConfig {
        app_name: "Notes".into(),
        ..BridgeConfig::default()
    };
    let factory = Arc::new(NativeFactory::with_config(toolkit.clone(), config));
    let exporter = MenuExporter::application(factory).unwrap();

    assert!(exporter.is_native_menu_exported());
    let holder = exporter.native_menu().unwrap();
    assert_eq!(outline(&toolkit, &holder), vec!["", "  About Notes"]);
}

#[test]
fn clearing_the_description_exports_an_empty_menu() {
    let (toolkit, factory) = setup();
    let mut exporter = MenuExporter::application(factory).unwrap();
    exporter.set_native_menu(None).unwrap();

    let holder = exporter.native_menu().unwrap();
    assert_eq!(outline(&toolkit, &holder), vec![""]);
}
