//! Tandem core prelude.
//!
//! Curated re-exports for downstream crates and tests.

pub use crate::callable::{Callable, Invoke, WeakCallable};
pub use crate::error::InvokeError;
pub use crate::object::{Object, Slot};
pub use crate::types::{ConflictPolicy, PropertyKind};
pub use crate::value::Value;
