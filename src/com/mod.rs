//! Reference-counted interface substrate.
//!
//! Every object that crosses the managed/native boundary is a [`ComPtr`]
//! handle to a value implementing [`Unknown`]. Handles are acquired by
//! cloning and released by dropping, so each acquire is paired with exactly
//! one release by construction.
//!
//! # Module Structure
//!
//! - [`iid`]: 128-bit interface identifiers and the well-known set
//! - [`object`]: `Unknown` / `Interface` traits and object identity
//! - [`ptr`]: `ComPtr` and `ComWeak` handles
//! - [`registry`]: identifier → descriptor registry used by capability queries
//! - [`error`]: `ComError` and boundary status codes

pub mod error;
pub mod iid;
pub mod object;
pub mod ptr;
pub mod registry;

pub use error::{ComError, ComResult, HResult};
pub use iid::Iid;
pub use object::{Interface, ObjectId, Unknown};
pub use ptr::{ComPtr, ComWeak};
pub use registry::{InterfaceDescriptor, InterfaceRegistry};
