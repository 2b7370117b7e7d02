//! Object identity and the base capability traits.

use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::iid::Iid;

static NEXT_OBJECT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a boundary object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u64);

impl ObjectId {
    /// Allocate the next identity. Never returns the same value twice.
    pub fn next() -> Self {
        Self(NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Base capability of every object exposed across the boundary.
///
/// `interfaces` lists the identifiers the object answers to besides
/// `IID_IUNKNOWN`, which is implicit.
pub trait Unknown: Any + Send + Sync {
    fn object_id(&self) -> ObjectId;

    fn interfaces(&self) -> &'static [Iid];

    /// Erase to `Any` for typed capability resolution.
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

/// A concrete capability with a fixed identifier.
pub trait Interface: Unknown + Sized {
    const IID: Iid;
}
