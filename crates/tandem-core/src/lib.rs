#![deny(clippy::disallowed_types)]
//! # Tandem Core - dynamic object and callable model
//!
//! Shared substrate for the tandem workspace: a dynamically typed [`Value`]
//! universe, shared [`Object`] property bags with reference identity,
//! first-class [`Callable`]s with allocation identity, and the tags and
//! errors the forwarding and composition crates both speak.
//!
//! # Architecture
//!
//! - **Values**: scalars and lists compare structurally, objects and
//!   callables by identity
//! - **Objects**: insertion-ordered own members (data, accessor, method)
//!   behind a short-lived lock
//! - **Callables**: object-safe [`Invoke`] seam behind a clonable handle,
//!   downcastable at crate seams
//! - **Errors**: one invocation-time taxonomy, propagated unchanged

pub mod callable;
pub mod error;
pub mod object;
pub mod prelude;
pub mod types;
pub mod value;

// Re-exports
pub use callable::{Callable, Invoke, WeakCallable};
pub use error::InvokeError;
pub use object::{Object, Slot};
pub use types::{ConflictPolicy, PropertyKind};
pub use value::Value;
