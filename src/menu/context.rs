//! State shared by every object created from one factory.

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::warn;

use crate::callback::EventSinkProxy;
use crate::com::ComPtr;
use crate::config::BridgeConfig;
use crate::events::MenuEvent;
use crate::toolkit::Toolkit;

/// Toolkit, configuration and event sink shared by a factory's objects.
pub struct BridgeContext<T: Toolkit> {
    toolkit: T,
    config: BridgeConfig,
    sink: Mutex<Option<ComPtr<EventSinkProxy>>>,
}

impl<T: Toolkit> BridgeContext<T> {
    pub fn new(toolkit: T, config: BridgeConfig) -> Self {
        Self {
            toolkit,
            config,
            sink: Mutex::new(None),
        }
    }

    pub fn toolkit(&self) -> &T {
        &self.toolkit
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Replace the event sink; returns the previous one.
    pub fn set_event_sink(&self, sink: Option<ComPtr<EventSinkProxy>>) -> Option<ComPtr<EventSinkProxy>> {
        std::mem::replace(&mut *self.lock_sink(), sink)
    }

    pub fn event_sink(&self) -> Option<ComPtr<EventSinkProxy>> {
        self.lock_sink().clone()
    }

    /// Deliver `event` to the sink, if one is installed.
    ///
    /// The sink is invoked without any lock held. A failing sink is logged
    /// and otherwise ignored; its failure is not reported back to itself.
    pub fn notify(&self, event: MenuEvent) {
        let Some(sink) = self.event_sink() else {
            return;
        };
        if let Err(err) = sink.notify(&event) {
            warn!(event = %event.description(), error = %err, "menu event sink failed");
        }
    }

    fn lock_sink(&self) -> MutexGuard<'_, Option<ComPtr<EventSinkProxy>>> {
        self.sink.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Toolkit + fmt::Debug> fmt::Debug for BridgeContext<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeContext")
            .field("toolkit", &self.toolkit)
            .field("config", &self.config)
            .field("has_sink", &self.lock_sink().is_some())
            .finish()
    }
}
