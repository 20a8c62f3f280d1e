//! Setup-time errors for the forwarding engine.
//!
//! These surface synchronously from [`install_forwarding`] with no partial
//! mutation under the `Error` conflict policy. Access-time failures travel
//! as [`tandem_core::InvokeError`] out of the installed accessors instead.
//!
//! [`install_forwarding`]: crate::install_forwarding

use tandem_core::InvokeError;

/// Error raised while validating or applying a forwarding spec.
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    /// The spec cannot be installed as written
    #[error("invalid forwarding spec: {reason}")]
    InvalidSpec {
        /// What made the spec invalid
        reason: String,
        /// Underlying failure, when one exists
        #[source]
        source: Option<InvokeError>,
    },

    /// A forwarded name collides with an existing own member under the
    /// `Error` conflict policy
    #[error("forwarded name '{name}' conflicts with an existing own member")]
    Conflict {
        /// The colliding property name
        name: String,
    },
}

impl ForwardError {
    /// Create an invalid-spec error
    pub fn invalid_spec(reason: impl Into<String>) -> Self {
        Self::InvalidSpec {
            reason: reason.into(),
            source: None,
        }
    }

    /// Create an invalid-spec error with an underlying failure
    pub fn invalid_spec_with(reason: impl Into<String>, source: InvokeError) -> Self {
        Self::InvalidSpec {
            reason: reason.into(),
            source: Some(source),
        }
    }

    /// Create a conflict error
    pub fn conflict(name: impl Into<String>) -> Self {
        Self::Conflict { name: name.into() }
    }
}
