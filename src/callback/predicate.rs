//! Enablement predicates.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use super::{guarded, CallbackResult};
use crate::com::iid::IID_IPREDICATE_CALLBACK;
use crate::com::{ComPtr, Iid, Interface, ObjectId, Unknown};

type PredicateFn = dyn Fn() -> CallbackResult<bool> + Send + Sync;

/// Proxy for a managed boolean predicate, evaluated synchronously at
/// validation time.
pub struct PredicateProxy {
    id: ObjectId,
    predicate: Box<PredicateFn>,
}

impl PredicateProxy {
    pub fn new(predicate: impl Fn() -> bool + Send + Sync + 'static) -> ComPtr<Self> {
        Self::fallible(move || Ok(predicate()))
    }

    pub fn fallible(predicate: impl Fn() -> CallbackResult<bool> + Send + Sync + 'static) -> ComPtr<Self> {
        let proxy = ComPtr::new(Self {
            id: ObjectId::next(),
            predicate: Box::new(predicate),
        });
        tracing::trace!(proxy = %proxy.id, "predicate proxy created");
        proxy
    }

    /// A predicate that always answers `value`.
    pub fn constant(value: bool) -> ComPtr<Self> {
        Self::new(move || value)
    }

    pub fn evaluate(&self) -> CallbackResult<bool> {
        guarded(|| (self.predicate)())
    }
}

impl Unknown for PredicateProxy {
    fn object_id(&self) -> ObjectId {
        self.id
    }

    fn interfaces(&self) -> &'static [Iid] {
        &[IID_IPREDICATE_CALLBACK]
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

impl Interface for PredicateProxy {
    const IID: Iid = IID_IPREDICATE_CALLBACK;
}

impl fmt::Debug for PredicateProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredicateProxy").field("id", &self.id).finish()
    }
}

impl Drop for PredicateProxy {
    fn drop(&mut self) {
        tracing::trace!(proxy = %self.id, "predicate proxy destroyed");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;
    use crate::callback::{ActionProxy, CallbackError};
    use crate::com::ComError;

    #[test]
    fn test_constant() {
        assert_eq!(PredicateProxy::constant(true).evaluate(), Ok(true));
        assert_eq!(PredicateProxy::constant(false).evaluate(), Ok(false));
    }

    #[test]
    fn test_reads_live_state() {
        let flag = Arc::new(AtomicBool::new(false));
        let observed = Arc::clone(&flag);
        let proxy = PredicateProxy::new(move || observed.load(Ordering::SeqCst));

        assert_eq!(proxy.evaluate(), Ok(false));
        flag.store(true, Ordering::SeqCst);
        assert_eq!(proxy.evaluate(), Ok(true));
    }

    #[test]
    fn test_panicking_predicate_is_an_error() {
        let proxy = PredicateProxy::new(|| panic!("managed side crashed"));
        assert!(matches!(proxy.evaluate(), Err(CallbackError::Panicked(_))));
    }

    #[test]
    fn test_query_never_returns_wrong_type() {
        let action = ActionProxy::new(|| {});
        assert_eq!(
            action.query::<PredicateProxy>().unwrap_err(),
            ComError::NotSupported(IID_IPREDICATE_CALLBACK)
        );
    }
}
