//! Property tests for child ordering and attachment.

use menubridge::toolkit::headless::HeadlessMenu;
use menubridge::{ComError, ComPtr, HeadlessToolkit, NativeFactory};
use proptest::prelude::*;

fn build(titles: &[String], at_front: bool) -> (HeadlessToolkit, Vec<String>) {
    let toolkit = HeadlessToolkit::new();
    let factory = NativeFactory::new(toolkit.clone());
    let menu = factory.create_menu();
    for (i, title) in titles.iter().enumerate() {
        let item = factory.create_menu_item();
        item.set_title(title).unwrap();
        let index = if at_front { 0 } else { i };
        menu.insert_item(index, &item).unwrap();
    }
    let model: Vec<String> = menu.items().iter().map(|item| item.title()).collect();
    assert_eq!(model, toolkit.item_titles(menu.with_native(HeadlessMenu::key)));
    (toolkit, model)
}

proptest! {
    #[test]
    fn sequential_indices_keep_insertion_order(titles in prop::collection::vec("[a-z]{1,8}", 0..24)) {
        let (_toolkit, model) = build(&titles, false);
        prop_assert_eq!(model, titles);
    }

    #[test]
    fn inserting_at_front_reverses_order(titles in prop::collection::vec("[a-z]{1,8}", 0..24)) {
        let (_toolkit, model) = build(&titles, true);
        let mut expected = titles.clone();
        expected.reverse();
        prop_assert_eq!(model, expected);
    }

    #[test]
    fn random_inserts_match_a_vec(indices in prop::collection::vec(0usize..32, 1..32)) {
        let toolkit = HeadlessToolkit::new();
        let factory = NativeFactory::new(toolkit.clone());
        let menu = factory.create_menu();
        let mut expected: Vec<u64> = Vec::new();

        for index in indices {
            let item = factory.create_menu_item();
            let result = menu.insert_item(index, &item);
            if index > expected.len() {
                prop_assert_eq!(result, Err(ComError::OutOfRange { index, len: expected.len() }));
                prop_assert!(!item.is_attached());
            } else {
                prop_assert!(result.is_ok());
                expected.insert(index, item.id().get());
                prop_assert_eq!(menu.insert_item(0, &item), Err(ComError::AlreadyAttached));
            }
        }

        let actual: Vec<u64> = menu.items().iter().map(|item| item.id().get()).collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn removing_every_item_empties_the_menu(count in 0usize..16, order in any::<u64>()) {
        let toolkit = HeadlessToolkit::new();
        let factory = NativeFactory::new(toolkit.clone());
        let menu = factory.create_menu();
        let mut items: Vec<_> = (0..count).map(|_| factory.create_menu_item()).collect();
        for item in &items {
            menu.append_item(item).unwrap();
        }

        // Deterministic shuffle driven by `order`.
        let mut seed = order;
        for i in (1..items.len()).rev() {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            items.swap(i, (seed >> 33) as usize % (i + 1));
        }

        for item in &items {
            prop_assert!(menu.remove_item(item).is_ok());
            prop_assert!(!menu.items().iter().any(|child| ComPtr::ptr_eq(child, item)));
        }
        prop_assert!(menu.is_empty());
        prop_assert!(toolkit.item_titles(menu.with_native(HeadlessMenu::key)).is_empty());
    }
}
