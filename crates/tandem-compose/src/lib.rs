#![deny(clippy::disallowed_types)]
//! # Tandem Compose - composable function registry
//!
//! Wraps a base callable so an ordered, deduplicated set of constituent
//! callables run alongside it. At most one wrapper exists per base at any
//! instant (the multiton law); the registry association is weak, so it
//! keeps neither bases nor wrappers alive.
//!
//! A composed call invokes the base first and returns its result; each
//! constituent then runs in insertion order with the same receiver and
//! arguments, return values discarded. Failure handling is a registry-level
//! [`FailurePolicy`]: fail-fast by default, or run-all-and-aggregate.
//!
//! The registry is an explicit, injectable value; [`global`] and the free
//! [`extend`] / [`remove`] / [`constituents_of`] functions target the
//! process-wide default.

mod composite;
mod policy;
mod registry;

pub use composite::{is_wrapper, Composite};
pub use policy::FailurePolicy;
pub use registry::{constituents_of, extend, global, remove, ComposableRegistry};
