//! Shared tags used by both the forwarding engine and the composition layer.

use serde::{Deserialize, Serialize};

/// Shape of an own member, as observed on a delegate or a target.
///
/// The forwarding plan uses this tag to decide whether a pass-through
/// getter/setter pair or a method-identity getter is installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    /// Plain stored value
    Data,
    /// Computed property with getter and/or setter
    Accessor,
    /// Callable behavior invoked with the object as receiver
    Method,
}

/// What to do when a forwarded name collides with an existing own member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Fail the whole installation atomically; nothing is installed
    #[default]
    Error,
    /// Leave the existing member untouched and continue with the rest
    Skip,
    /// Replace the existing member
    Override,
}
