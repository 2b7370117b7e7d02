//! Activation callbacks.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use super::{guarded, CallbackResult};
use crate::com::iid::IID_IACTION_CALLBACK;
use crate::com::{ComPtr, Iid, Interface, ObjectId, Unknown};

type ActionFn = dyn Fn() -> CallbackResult<()> + Send + Sync;

/// Proxy for a managed activation handler. Takes no arguments and returns
/// nothing observable.
pub struct ActionProxy {
    id: ObjectId,
    callback: Box<ActionFn>,
}

impl ActionProxy {
    /// Wrap an infallible handler.
    pub fn new(callback: impl Fn() + Send + Sync + 'static) -> ComPtr<Self> {
        Self::fallible(move || {
            callback();
            Ok(())
        })
    }

    /// Wrap a handler that may report failure to the native side.
    pub fn fallible(callback: impl Fn() -> CallbackResult<()> + Send + Sync + 'static) -> ComPtr<Self> {
        let proxy = ComPtr::new(Self {
            id: ObjectId::next(),
            callback: Box::new(callback),
        });
        tracing::trace!(proxy = %proxy.id, "action proxy created");
        proxy
    }

    /// Invoke the managed handler synchronously.
    pub fn invoke(&self) -> CallbackResult<()> {
        guarded(|| (self.callback)())
    }
}

impl Unknown for ActionProxy {
    fn object_id(&self) -> ObjectId {
        self.id
    }

    fn interfaces(&self) -> &'static [Iid] {
        &[IID_IACTION_CALLBACK]
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

impl Interface for ActionProxy {
    const IID: Iid = IID_IACTION_CALLBACK;
}

impl fmt::Debug for ActionProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionProxy").field("id", &self.id).finish()
    }
}

impl Drop for ActionProxy {
    fn drop(&mut self) {
        tracing::trace!(proxy = %self.id, "action proxy destroyed");
    }
}
