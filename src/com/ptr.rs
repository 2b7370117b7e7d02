//! Owned reference-counted handles.
//!
//! A [`ComPtr`] carries exactly one acquired reference. Cloning is the only
//! way to acquire and dropping (or [`ComPtr::release`]) the only way to
//! release, so acquire/release pairing is enforced by ownership rather than
//! by convention. Counts are atomic: a handle may be released on a
//! different thread than the one that acquired it.

use std::fmt;
use std::ops::Deref;
use std::sync::{Arc, Weak};

use super::error::ComResult;
use super::iid::Iid;
use super::object::{Interface, Unknown};
use super::registry::InterfaceRegistry;

/// Strong handle to a boundary object.
pub struct ComPtr<T: ?Sized> {
    inner: Arc<T>,
}

impl<T: Unknown> ComPtr<T> {
    /// Wrap a freshly constructed object. The new handle holds count 1.
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(value),
        }
    }

    /// Construct an object that needs a back reference to itself.
    ///
    /// The weak handle passed to `build` cannot be upgraded until
    /// construction finishes.
    pub fn new_cyclic(build: impl FnOnce(ComWeak<T>) -> T) -> Self {
        Self {
            inner: Arc::new_cyclic(|weak| {
                build(ComWeak {
                    inner: weak.clone(),
                })
            }),
        }
    }

    /// View this handle through the base capability.
    pub fn into_unknown(self) -> ComPtr<dyn Unknown> {
        let inner: Arc<dyn Unknown> = self.inner;
        ComPtr { inner }
    }

    /// Acquire a base-capability handle without giving this one up.
    pub fn as_unknown(&self) -> ComPtr<dyn Unknown> {
        self.acquire().into_unknown()
    }

    /// Capability query by identifier. See [`ComPtr::<dyn Unknown>::query_interface`].
    pub fn query_interface(&self, iid: &Iid) -> ComResult<ComPtr<dyn Unknown>> {
        self.as_unknown().query_interface(iid)
    }

    /// Typed capability query.
    pub fn query<I: Interface>(&self) -> ComResult<ComPtr<I>> {
        self.as_unknown().query::<I>()
    }
}

impl ComPtr<dyn Unknown> {
    /// Resolve `iid` through the process-wide registry.
    ///
    /// On success the returned handle is a new acquired reference. On
    /// failure nothing about the object changes.
    pub fn query_interface(&self, iid: &Iid) -> ComResult<ComPtr<dyn Unknown>> {
        InterfaceRegistry::global().resolve(self, iid)
    }

    /// Typed capability query; never yields a handle of the wrong type.
    pub fn query<I: Interface>(&self) -> ComResult<ComPtr<I>> {
        InterfaceRegistry::global().resolve_typed::<I>(self)
    }

    pub(crate) fn downcast<I: Interface>(&self) -> Option<ComPtr<I>> {
        let any = Unknown::into_any(Arc::clone(&self.inner));
        any.downcast::<I>().ok().map(|inner| ComPtr { inner })
    }
}

impl<T: ?Sized> ComPtr<T> {
    /// Take an additional reference. Equivalent to `clone`.
    pub fn acquire(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Give up this reference and return how many remain.
    ///
    /// Zero means the object has been destroyed. The value is a snapshot
    /// when other threads hold references.
    pub fn release(self) -> usize {
        let remaining = Arc::strong_count(&self.inner) - 1;
        drop(self);
        remaining
    }

    /// Current number of strong references.
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Identity comparison.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&a.inner), Arc::as_ptr(&b.inner))
    }

    /// Non-owning back reference.
    pub fn downgrade(&self) -> ComWeak<T> {
        ComWeak {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

impl<T: ?Sized> Clone for ComPtr<T> {
    fn clone(&self) -> Self {
        self.acquire()
    }
}

impl<T: ?Sized> Deref for ComPtr<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner
    }
}

impl<T: ?Sized> AsRef<Arc<T>> for ComPtr<T> {
    fn as_ref(&self) -> &Arc<T> {
        &self.inner
    }
}

impl<T: ?Sized + Unknown> fmt::Debug for ComPtr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComPtr")
            .field("object", &self.inner.object_id())
            .field("refs", &self.ref_count())
            .finish()
    }
}

/// Non-owning reference. Never extends the object's lifetime.
pub struct ComWeak<T: ?Sized> {
    inner: Weak<T>,
}

impl<T: ?Sized> ComWeak<T> {
    /// Acquire a strong handle if the object is still alive.
    pub fn upgrade(&self) -> Option<ComPtr<T>> {
        self.inner.upgrade().map(|inner| ComPtr { inner })
    }

    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    /// Does this weak reference point at `ptr`'s object?
    pub fn points_to(&self, ptr: &ComPtr<T>) -> bool {
        std::ptr::addr_eq(self.inner.as_ptr(), Arc::as_ptr(&ptr.inner))
    }
}

impl<T> ComWeak<T> {
    /// A weak reference that never upgrades.
    pub fn dangling() -> Self {
        Self { inner: Weak::new() }
    }
}

impl<T: ?Sized> Clone for ComWeak<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: ?Sized> fmt::Debug for ComWeak<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComWeak")
            .field("alive", &self.is_alive())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::any::Any;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::com::iid::IID_IMENU_EVENTS;
    use crate::com::object::ObjectId;

    struct Probe {
        id: ObjectId,
        drops: Arc<AtomicUsize>,
    }

    impl Unknown for Probe {
        fn object_id(&self) -> ObjectId {
            self.id
        }

        fn interfaces(&self) -> &'static [Iid] {
            &[]
        }

        fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
            self
        }
    }

    impl Drop for Probe {
        fn drop(&mut self) {
            self.drops.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn probe() -> (ComPtr<Probe>, Arc<AtomicUsize>) {
        let drops = Arc::new(AtomicUsize::new(0));
        let ptr = ComPtr::new(Probe {
            id: ObjectId::next(),
            drops: Arc::clone(&drops),
        });
        (ptr, drops)
    }

    #[test]
    fn test_new_handle_has_count_one() {
        let (ptr, _) = probe();
        assert_eq!(ptr.ref_count(), 1);
    }

    #[test]
    fn test_acquire_and_release_counts() {
        let (ptr, drops) = probe();
        let second = ptr.acquire();
        let third = second.clone();
        assert_eq!(ptr.ref_count(), 3);

        assert_eq!(third.release(), 2);
        assert_eq!(second.release(), 1);
        assert_eq!(drops.load(Ordering::SeqCst), 0);

        assert_eq!(ptr.release(), 0);
        assert_eq!(drops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_weak_does_not_extend_lifetime() {
        let (ptr, drops) = probe();
        let weak = ptr.downgrade();
        assert!(weak.is_alive());
        assert!(weak.points_to(&ptr));

        drop(ptr);
        assert!(!weak.is_alive());
        assert!(weak.upgrade().is_none());
        assert_eq!(drops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_ptr_eq_is_identity() {
        let (a, _) = probe();
        let (b, _) = probe();
        assert!(ComPtr::ptr_eq(&a, &a.acquire()));
        assert!(!ComPtr::ptr_eq(&a, &b));
    }

    #[test]
    fn test_unknown_view_shares_count() {
        let (ptr, _) = probe();
        let unknown = ptr.as_unknown();
        assert_eq!(ptr.ref_count(), 2);
        drop(unknown);
        assert_eq!(ptr.ref_count(), 1);
    }

    #[test]
    fn test_failed_query_leaves_object_untouched() {
        let (ptr, drops) = probe();
        let result = ptr.query_interface(&IID_IMENU_EVENTS);
        assert!(result.is_err());
        assert_eq!(ptr.ref_count(), 1);
        assert_eq!(drops.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_dangling_weak_never_upgrades() {
        let weak: ComWeak<Probe> = ComWeak::dangling();
        assert!(weak.upgrade().is_none());
    }
}
