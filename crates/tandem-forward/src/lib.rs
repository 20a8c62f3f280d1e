#![deny(clippy::disallowed_types)]
//! # Tandem Forward - static-property, dynamic-target forwarding
//!
//! Installs accessor pairs on a target object that read and write through
//! to a delegate resolved at access time. The delegate may change over the
//! target's lifetime; every access resolves it fresh through the spec's
//! [`Resolver`].
//!
//! Conflict handling is atomic under the default `Error` policy: either all
//! requested properties install or none do. `Skip` and `Override` always
//! complete, installing everything not skipped.

mod error;
mod install;
mod spec;

pub use error::ForwardError;
pub use install::{forward, install_all, install_forwarding};
pub use spec::{ForwardSpec, ForwardSpecBuilder, Resolver, Shape};
