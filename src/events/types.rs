//! Menu lifecycle notifications delivered to event sinks.
//!
//! These events describe what the native toolkit did to the menu tree:
//! opening a menu, validating an item, selecting an item, or a managed
//! callback failing. This module is pure Rust with no FFI dependencies.

use crate::com::ObjectId;

/// Toolkit-level notification about a menu or menu item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEvent {
    /// A menu is about to be displayed; its items are validated next.
    MenuOpening { menu: ObjectId },

    /// An item's enablement predicate was evaluated at validation time.
    ItemValidated { item: ObjectId, enabled: bool },

    /// The user selected an item.
    ItemClicked { item: ObjectId },

    /// A managed predicate or action failed while being invoked.
    CallbackFailed { item: ObjectId, message: String },
}

impl MenuEvent {
    /// The menu or item the event is about.
    pub fn object(&self) -> ObjectId {
        match self {
            MenuEvent::MenuOpening { menu } => *menu,
            MenuEvent::ItemValidated { item, .. }
            | MenuEvent::ItemClicked { item }
            | MenuEvent::CallbackFailed { item, .. } => *item,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, MenuEvent::CallbackFailed { .. })
    }

    /// Returns a human-readable description of the event for debugging.
    pub fn description(&self) -> &'static str {
        match self {
            MenuEvent::MenuOpening { .. } => "Menu about to open",
            MenuEvent::ItemValidated { .. } => "Item enablement evaluated",
            MenuEvent::ItemClicked { .. } => "Item selected",
            MenuEvent::CallbackFailed { .. } => "Managed callback failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_is_the_subject() {
        let id = ObjectId::next();
        assert_eq!(MenuEvent::MenuOpening { menu: id }.object(), id);
        assert_eq!(MenuEvent::ItemClicked { item: id }.object(), id);
        assert_eq!(
            MenuEvent::ItemValidated {
                item: id,
                enabled: false
            }
            .object(),
            id
        );
    }

    #[test]
    fn test_only_callback_failures_are_failures() {
        let id = ObjectId::next();
        assert!(MenuEvent::CallbackFailed {
            item: id,
            message: "x".into()
        }
        .is_failure());
        assert!(!MenuEvent::ItemClicked { item: id }.is_failure());
    }

    #[test]
    fn test_all_events_have_descriptions() {
        let id = ObjectId::next();
        let events = [
            MenuEvent::MenuOpening { menu: id },
            MenuEvent::ItemValidated {
                item: id,
                enabled: true,
            },
            MenuEvent::ItemClicked { item: id },
            MenuEvent::CallbackFailed {
                item: id,
                message: String::new(),
            },
        ];

        for event in events {
            assert!(!event.description().is_empty());
        }
    }
}
