//! Tests for capability queries and reference counting across the menu model.

use std::sync::Arc;
use std::thread;

use menubridge::com::iid::{IID_IACTION_CALLBACK, IID_IMENU, IID_IMENU_ITEM, IID_IUNKNOWN};
use menubridge::{
    ActionProxy, ComError, ComPtr, HResult, HeadlessToolkit, Iid, Menu, MenuItem, NativeFactory, PredicateProxy,
};
use proptest::prelude::*;

type TestMenu = Menu<HeadlessToolkit>;
type TestItem = MenuItem<HeadlessToolkit>;

fn factory() -> NativeFactory<HeadlessToolkit> {
    NativeFactory::new(HeadlessToolkit::new())
}

// === Capability queries ===

#[test]
fn every_object_answers_the_base_capability() {
    let factory = factory();
    let menu = factory.create_menu();
    let item = factory.create_menu_item();
    let action = ActionProxy::new(|| {});

    for unknown in [menu.as_unknown(), item.as_unknown(), action.as_unknown()] {
        let base = unknown.query_interface(&IID_IUNKNOWN).unwrap();
        assert_eq!(base.object_id(), unknown.object_id());
    }
}

#[test]
fn query_returns_the_right_type_or_not_supported() {
    let factory = factory();
    let menu = factory.create_menu();
    let item = factory.create_menu_item();

    let as_menu: ComPtr<TestMenu> = menu.query().unwrap();
    assert!(ComPtr::ptr_eq(&as_menu, &menu));
    assert_eq!(menu.query::<TestItem>().unwrap_err(), ComError::NotSupported(IID_IMENU_ITEM));
    assert_eq!(item.query::<TestMenu>().unwrap_err(), ComError::NotSupported(IID_IMENU));
    assert_eq!(
        item.query_interface(&IID_IACTION_CALLBACK).unwrap_err(),
        ComError::NotSupported(IID_IACTION_CALLBACK)
    );
}

#[test]
fn query_through_the_base_capability_recovers_the_object() {
    let factory = factory();
    let item = factory.create_menu_item();
    let unknown = item.as_unknown();

    let typed: ComPtr<TestItem> = unknown.query().unwrap();
    assert!(ComPtr::ptr_eq(&typed, &item));
    assert!(unknown.query::<PredicateProxy>().is_err());
}

#[test]
fn unknown_identifier_is_not_supported() {
    let factory = factory();
    let menu = factory.create_menu();
    let bogus = Iid::from_u128(0x1234_5678_9abc_4def_8123_456789abcdef);

    let err = menu.query_interface(&bogus).unwrap_err();
    assert_eq!(err, ComError::NotSupported(bogus));
    assert_eq!(err.hresult(), HResult::E_NOINTERFACE);
}

#[test]
fn successful_query_acquires_and_failed_query_does_not() {
    let factory = factory();
    let menu = factory.create_menu();
    assert_eq!(menu.ref_count(), 1);

    let handle = menu.query_interface(&IID_IMENU).unwrap();
    assert_eq!(menu.ref_count(), 2);
    drop(handle);
    assert_eq!(menu.ref_count(), 1);

    let _ = menu.query_interface(&IID_IMENU_ITEM);
    assert_eq!(menu.ref_count(), 1);
}

#[test]
fn destroyed_object_cannot_be_reached_again() {
    let factory = factory();
    let item = factory.create_menu_item();
    let weak = item.downgrade();
    assert_eq!(item.release(), 0);
    assert!(weak.upgrade().is_none());
}

// === Reference counting ===

#[test]
fn factory_objects_start_with_one_reference() {
    let factory = factory();
    assert_eq!(factory.create_menu().ref_count(), 1);
    assert_eq!(factory.create_menu_item().ref_count(), 1);
    assert_eq!(factory.create_separator().ref_count(), 1);
}

#[test]
fn concurrent_acquire_release_balances() {
    let action = ActionProxy::new(|| {});
    let weak = action.downgrade();
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let shared = action.acquire();
            thread::spawn(move || {
                for _ in 0..10_000 {
                    let extra = shared.acquire();
                    let again = extra.clone();
                    assert!(again.release() >= 2);
                    drop(extra);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(action.ref_count(), 1);
    drop(action);
    assert!(!weak.is_alive());
}

#[test]
fn proxy_released_on_another_thread_during_invocation() {
    let factory = factory();
    let item = factory.create_menu_item();
    let gate = Arc::new(std::sync::Barrier::new(2));
    let inner_gate = Arc::clone(&gate);
    let action = ActionProxy::new(move || {
        inner_gate.wait();
        inner_gate.wait();
    });
    item.set_action(None, Some(&action)).unwrap();
    let weak = action.downgrade();
    drop(action);

    let item_for_thread = item.clone();
    let clicker = thread::spawn(move || item_for_thread.raise_on_clicked());

    gate.wait();
    item.set_action(None, None).unwrap();
    assert!(weak.is_alive());
    gate.wait();

    clicker.join().unwrap();
    assert!(!weak.is_alive());
}

proptest! {
    #[test]
    fn acquired_k_times_needs_k_releases(k in 0usize..64) {
        let factory = factory();
        let item = factory.create_menu_item();
        let weak = item.downgrade();

        let extra: Vec<_> = (0..k).map(|_| item.acquire()).collect();
        prop_assert_eq!(item.ref_count(), k + 1);

        for (released, handle) in extra.into_iter().enumerate() {
            prop_assert_eq!(handle.release(), k - released);
        }
        prop_assert!(weak.is_alive());
        prop_assert_eq!(item.release(), 0);
        prop_assert!(!weak.is_alive());
    }
}
