//! Event-sink proxies for toolkit lifecycle notifications.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use super::{guarded, CallbackResult};
use crate::com::iid::IID_IMENU_EVENTS;
use crate::com::{ComPtr, Iid, Interface, ObjectId, Unknown};
use crate::events::MenuEvent;

type SinkFn = dyn Fn(&MenuEvent) -> CallbackResult<()> + Send + Sync;

/// Proxy for a managed notification handler, invoked synchronously with the
/// event data.
pub struct EventSinkProxy {
    id: ObjectId,
    sink: Box<SinkFn>,
}

impl EventSinkProxy {
    pub fn new(sink: impl Fn(&MenuEvent) + Send + Sync + 'static) -> ComPtr<Self> {
        Self::fallible(move |event| {
            sink(event);
            Ok(())
        })
    }

    pub fn fallible(
        sink: impl Fn(&MenuEvent) -> CallbackResult<()> + Send + Sync + 'static,
    ) -> ComPtr<Self> {
        ComPtr::new(Self {
            id: ObjectId::next(),
            sink: Box::new(sink),
        })
    }

    pub fn notify(&self, event: &MenuEvent) -> CallbackResult<()> {
        guarded(|| (self.sink)(event))
    }
}

impl Unknown for EventSinkProxy {
    fn object_id(&self) -> ObjectId {
        self.id
    }

    fn interfaces(&self) -> &'static [Iid] {
        &[IID_IMENU_EVENTS]
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

impl Interface for EventSinkProxy {
    const IID: Iid = IID_IMENU_EVENTS;
}

impl fmt::Debug for EventSinkProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSinkProxy").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[test]
    fn test_notify_passes_event_data() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        let sink = EventSinkProxy::new(move |event| log.lock().unwrap().push(event.clone()));

        let item = ObjectId::next();
        sink.notify(&MenuEvent::ItemClicked { item }).unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![MenuEvent::ItemClicked { item }]);
    }

    #[test]
    fn test_panicking_sink_does_not_unwind() {
        let sink = EventSinkProxy::new(|_| panic!("sink crashed"));
        let result = sink.notify(&MenuEvent::MenuOpening {
            menu: ObjectId::next(),
        });
        assert!(result.is_err());
    }
}
