//! Error kinds reported across the interface boundary.

use std::fmt;

use super::iid::Iid;

/// Failure of a capability query or a menu-model operation.
///
/// Every kind is recoverable; none of them leaves the target object in a
/// partially-mutated state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComError {
    /// Capability query for an identifier the object does not support.
    #[error("interface {0} is not supported")]
    NotSupported(Iid),

    /// Insert index outside `[0, len]`.
    #[error("index {index} is out of range for a menu of {len} items")]
    OutOfRange { index: usize, len: usize },

    /// Item (or submenu) is still attached elsewhere.
    #[error("object is already attached; detach it first")]
    AlreadyAttached,

    /// Remove of an item that is not a child of this menu.
    #[error("item not found in menu")]
    NotFound,

    /// Title/submenu/gesture/action/checked mutation on a separator.
    #[error("operation not applicable to separator items")]
    NotApplicableToSeparator,

    /// Registration of an identifier that is already taken.
    #[error("interface {0} is already registered")]
    DuplicateInterface(Iid),
}

pub type ComResult<T> = std::result::Result<T, ComError>;

/// HRESULT-style status word returned at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HResult(pub u32);

impl HResult {
    pub const S_OK: HResult = HResult(0x0000_0000);
    pub const E_NOINTERFACE: HResult = HResult(0x8000_4002);
    pub const E_INVALIDARG: HResult = HResult(0x8007_0057);
    pub const E_BOUNDS: HResult = HResult(0x8000_000B);
    pub const E_NOTFOUND: HResult = HResult(0x8007_0490);
    pub const E_ILLEGAL_METHOD_CALL: HResult = HResult(0x8000_000E);
    pub const E_ALREADY_EXISTS: HResult = HResult(0x8007_00B7);
    pub const E_FAIL: HResult = HResult(0x8000_4005);

    pub fn is_ok(self) -> bool {
        self.0 & 0x8000_0000 == 0
    }

    /// Status for a unit result, `S_OK` on success.
    pub fn from_result<T>(result: &ComResult<T>) -> HResult {
        match result {
            Ok(_) => HResult::S_OK,
            Err(err) => err.hresult(),
        }
    }
}

impl fmt::Display for HResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X}", self.0)
    }
}

impl ComError {
    /// Stable status code for this error kind.
    pub fn hresult(&self) -> HResult {
        match self {
            ComError::NotSupported(_) => HResult::E_NOINTERFACE,
            ComError::OutOfRange { .. } => HResult::E_BOUNDS,
            ComError::AlreadyAttached => HResult::E_INVALIDARG,
            ComError::NotFound => HResult::E_NOTFOUND,
            ComError::NotApplicableToSeparator => HResult::E_ILLEGAL_METHOD_CALL,
            ComError::DuplicateInterface(_) => HResult::E_ALREADY_EXISTS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::com::iid::IID_IMENU;

    #[test]
    fn test_every_error_maps_to_failure_status() {
        let errors = [
            ComError::NotSupported(IID_IMENU),
            ComError::OutOfRange { index: 3, len: 1 },
            ComError::AlreadyAttached,
            ComError::NotFound,
            ComError::NotApplicableToSeparator,
            ComError::DuplicateInterface(IID_IMENU),
        ];
        for err in errors {
            assert!(!err.hresult().is_ok(), "{err} should be a failure status");
        }
    }

    #[test]
    fn test_from_result() {
        assert_eq!(HResult::from_result(&Ok::<(), ComError>(())), HResult::S_OK);
        assert_eq!(
            HResult::from_result(&Err::<(), _>(ComError::NotFound)),
            HResult::E_NOTFOUND
        );
    }

    #[test]
    fn test_display_is_hex() {
        assert_eq!(HResult::E_NOINTERFACE.to_string(), "0x80004002");
    }

    #[test]
    fn test_out_of_range_message() {
        let err = ComError::OutOfRange { index: 5, len: 2 };
        assert_eq!(err.to_string(), "index 5 is out of range for a menu of 2 items");
    }
}
