//! Callback proxies.
//!
//! A proxy is a reference-counted object living on the native side whose
//! invocation forwards into managed code. Proxies are shared between the
//! object that stores them and any call currently in flight, so a proxy
//! replaced mid-dispatch stays alive until that dispatch returns.
//!
//! Invocation is always synchronous. A managed callback that fails or panics
//! is reported as a [`CallbackError`]; the proxy never unwinds into native
//! code.

pub mod action;
pub mod event_sink;
pub mod predicate;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

pub use action::ActionProxy;
pub use event_sink::EventSinkProxy;
pub use predicate::PredicateProxy;

use crate::com::HResult;

/// Failure raised by a managed callback.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CallbackError {
    #[error("callback failed: {0}")]
    Failed(String),

    #[error("callback panicked: {0}")]
    Panicked(String),
}

impl CallbackError {
    pub fn failed(message: impl Into<String>) -> Self {
        CallbackError::Failed(message.into())
    }

    pub fn hresult(&self) -> HResult {
        HResult::E_FAIL
    }
}

pub type CallbackResult<T> = std::result::Result<T, CallbackError>;

/// Run a managed callback, converting a panic into `CallbackError::Panicked`.
pub(crate) fn guarded<R>(call: impl FnOnce() -> CallbackResult<R>) -> CallbackResult<R> {
    match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(result) => result,
        Err(payload) => Err(CallbackError::Panicked(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guarded_passes_through_ok() {
        assert_eq!(guarded(|| Ok(7)), Ok(7));
    }

    #[test]
    fn test_guarded_passes_through_failure() {
        let result: CallbackResult<()> = guarded(|| Err(CallbackError::failed("nope")));
        assert_eq!(result, Err(CallbackError::Failed("nope".into())));
    }

    #[test]
    fn test_guarded_catches_panic() {
        let result: CallbackResult<()> = guarded(|| panic!("boom"));
        assert_eq!(result, Err(CallbackError::Panicked("boom".into())));
    }

    #[test]
    fn test_guarded_catches_formatted_panic() {
        let n = 3;
        let result: CallbackResult<()> = guarded(|| panic!("boom {n}"));
        assert_eq!(result, Err(CallbackError::Panicked("boom 3".into())));
    }
}
