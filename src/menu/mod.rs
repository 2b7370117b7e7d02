//! Menu model.
//!
//! The logical tree of [`Menu`] and [`MenuItem`] objects mirrored onto the
//! native toolkit. Each object owns exactly one native counterpart and
//! updates it synchronously on every mutation.
//!
//! Ownership is shared: a menu holds one reference to each child and the
//! caller may hold more, so an item outlives its removal from a menu. An
//! item owns its submenu outright. Back references (item → parent menu,
//! submenu → owning item, delegate → menu) are weak and never extend a
//! lifetime.
//!
//! ```text
//! Menu ──children──▶ MenuItem ──submenu──▶ Menu ──children──▶ ...
//!   ▲                   │                    ▲                   │
//!   └──── parent (weak) ┘                    └──── owner (weak) ─┘
//! ```

pub mod container;
pub mod context;
pub mod delegate;
pub mod factory;
pub mod item;

pub use container::Menu;
pub use context::BridgeContext;
pub use delegate::{ItemTarget, MenuDelegate};
pub use factory::NativeFactory;
pub use item::{MenuItem, MenuItemKind};

use crate::com::ComPtr;
use crate::toolkit::Toolkit;

/// Decode a UTF-8 title received from the boundary.
///
/// Invalid sequences are replaced with U+FFFD rather than rejected.
pub(crate) fn decode_title(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_owned(),
        Err(err) => {
            tracing::warn!(error = %err, "menu title is not valid UTF-8; replacing invalid sequences");
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}

/// Is `target` equal to `start` or one of its ancestors?
///
/// Attaching `target` below `start` in that case would make a menu its own
/// descendant. Walks menu → owning item → parent menu, one lock at a time.
/// Every attach goes through this check, so the chain is acyclic and the
/// walk ends at a root.
pub(crate) fn is_self_or_ancestor<T: Toolkit>(start: &ComPtr<Menu<T>>, target: &ComPtr<Menu<T>>) -> bool {
    let mut current = Some(start.clone());
    while let Some(menu) = current {
        if ComPtr::ptr_eq(&menu, target) {
            return true;
        }
        current = menu.owner().and_then(|item| item.parent());
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_valid_title() {
        assert_eq!(decode_title("Fichier".as_bytes()), "Fichier");
        assert_eq!(decode_title(b""), "");
    }

    #[test]
    fn test_decode_invalid_title_is_lossy() {
        assert_eq!(decode_title(b"Op\xFFen"), "Op\u{FFFD}en");
    }
}
