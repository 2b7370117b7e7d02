//! Interface registry.
//!
//! Maps identifiers to descriptors and resolves capability queries. A query
//! for an identifier that is not registered, or that the object does not
//! list, fails with [`ComError::NotSupported`] and leaves the object alone.
//!
//! The process-wide registry lives in a `OnceLock`, the same way the event
//! bus sender does: it is populated once and read without locking.

use std::collections::HashMap;
use std::sync::OnceLock;

use super::error::{ComError, ComResult};
use super::iid::{
    Iid, IID_IACTION_CALLBACK, IID_IMENU, IID_IMENU_EVENTS, IID_IMENU_ITEM,
    IID_IPREDICATE_CALLBACK, IID_IUNKNOWN,
};
use super::object::{Interface, Unknown};
use super::ptr::ComPtr;

static GLOBAL: OnceLock<InterfaceRegistry> = OnceLock::new();

/// Registered capability contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDescriptor {
    pub iid: Iid,
    pub name: &'static str,
}

/// Identifier → descriptor table.
#[derive(Debug, Clone)]
pub struct InterfaceRegistry {
    entries: HashMap<Iid, InterfaceDescriptor>,
}

impl InterfaceRegistry {
    /// A registry that only knows the base capability.
    pub fn new() -> Self {
        let mut entries = HashMap::new();
        entries.insert(
            IID_IUNKNOWN,
            InterfaceDescriptor {
                iid: IID_IUNKNOWN,
                name: "IUnknown",
            },
        );
        Self { entries }
    }

    /// A registry with every interface this crate ships.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        let builtins = [
            (IID_IMENU, "IMenu"),
            (IID_IMENU_ITEM, "IMenuItem"),
            (IID_IACTION_CALLBACK, "IActionCallback"),
            (IID_IPREDICATE_CALLBACK, "IPredicateCallback"),
            (IID_IMENU_EVENTS, "IMenuEvents"),
        ];
        for (iid, name) in builtins {
            registry.entries.insert(iid, InterfaceDescriptor { iid, name });
        }
        registry
    }

    /// Add a contract. Identifiers are never reused.
    pub fn register(&mut self, iid: Iid, name: &'static str) -> ComResult<()> {
        if self.entries.contains_key(&iid) {
            return Err(ComError::DuplicateInterface(iid));
        }
        self.entries.insert(iid, InterfaceDescriptor { iid, name });
        Ok(())
    }

    pub fn describe(&self, iid: &Iid) -> Option<&InterfaceDescriptor> {
        self.entries.get(iid)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Does `object` answer to `iid` under this registry?
    pub fn supports(&self, object: &dyn Unknown, iid: &Iid) -> bool {
        if *iid == IID_IUNKNOWN {
            return true;
        }
        self.entries.contains_key(iid) && object.interfaces().contains(iid)
    }

    /// Capability query. Success acquires a new reference.
    pub fn resolve(
        &self,
        object: &ComPtr<dyn Unknown>,
        iid: &Iid,
    ) -> ComResult<ComPtr<dyn Unknown>> {
        if !self.supports(&**object, iid) {
            tracing::trace!(object = %object.object_id(), %iid, "interface not supported");
            return Err(ComError::NotSupported(*iid));
        }
        Ok(object.acquire())
    }

    /// Typed capability query. The concrete type must match as well as the
    /// identifier, so a wrong-typed handle is never produced.
    pub fn resolve_typed<I: Interface>(&self, object: &ComPtr<dyn Unknown>) -> ComResult<ComPtr<I>> {
        if !self.supports(&**object, &I::IID) {
            return Err(ComError::NotSupported(I::IID));
        }
        object.downcast::<I>().ok_or(ComError::NotSupported(I::IID))
    }

    /// Install a custom process-wide registry.
    ///
    /// Must happen before the first capability query; otherwise the
    /// built-in registry is already in place and `registry` is handed back.
    pub fn install_global(registry: InterfaceRegistry) -> Result<(), InterfaceRegistry> {
        GLOBAL.set(registry)
    }

    /// The process-wide registry, built-ins unless one was installed.
    pub fn global() -> &'static InterfaceRegistry {
        GLOBAL.get_or_init(InterfaceRegistry::with_builtins)
    }
}

impl Default for InterfaceRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
