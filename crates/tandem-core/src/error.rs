//! Invocation-time error type shared by every tandem crate.
//!
//! `InvokeError` covers everything that can go wrong once control enters a
//! callable: failures raised by user code, property access on the wrong slot
//! shape, and delegate resolution. Setup-time failures have their own types
//! in the crates that own them.

/// Error raised during invocation of a callable or property access.
///
/// Errors from user callables are propagated unchanged through composed
/// calls and forwarded accessors, never wrapped or retried.
#[derive(Debug, Clone, thiserror::Error)]
pub enum InvokeError {
    /// A user callable reported failure
    #[error("callable failed: {message}")]
    Failure {
        /// Message supplied by the failing callable
        message: String,
    },

    /// The requested own property does not exist
    #[error("no own property '{name}'")]
    MissingProperty {
        /// Property name that was looked up
        name: String,
    },

    /// The property is an accessor without a getter
    #[error("property '{name}' has no getter")]
    NoGetter {
        /// Property name that was read
        name: String,
    },

    /// The property is not writable
    #[error("property '{name}' has no setter")]
    NoSetter {
        /// Property name that was written
        name: String,
    },

    /// A value was invoked or bound but is not callable
    #[error("not callable: {message}")]
    NotCallable {
        /// Description of the non-callable value
        message: String,
    },

    /// Delegate resolution failed during a forwarded access
    #[error("delegate resolution failed: {message}")]
    MissingDelegate {
        /// Description of the resolution failure
        message: String,
    },

    /// Several constituents failed in one composed call
    #[error("{} constituent(s) failed", failures.len())]
    Aggregate {
        /// Constituent failures in execution order
        failures: Vec<InvokeError>,
    },
}

impl InvokeError {
    /// Create a failure error from a user callable
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }

    /// Create a missing property error
    pub fn missing_property(name: impl Into<String>) -> Self {
        Self::MissingProperty { name: name.into() }
    }

    /// Create a missing getter error
    pub fn no_getter(name: impl Into<String>) -> Self {
        Self::NoGetter { name: name.into() }
    }

    /// Create a missing setter error
    pub fn no_setter(name: impl Into<String>) -> Self {
        Self::NoSetter { name: name.into() }
    }

    /// Create a not-callable error
    pub fn not_callable(message: impl Into<String>) -> Self {
        Self::NotCallable {
            message: message.into(),
        }
    }

    /// Create a delegate resolution error
    pub fn missing_delegate(message: impl Into<String>) -> Self {
        Self::MissingDelegate {
            message: message.into(),
        }
    }

    /// Aggregate several failures from one composed call
    pub fn aggregate(failures: Vec<InvokeError>) -> Self {
        Self::Aggregate { failures }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_property_name() {
        let err = InvokeError::missing_property("foo");
        assert_eq!(err.to_string(), "no own property 'foo'");

        let err = InvokeError::no_setter("bar");
        assert_eq!(err.to_string(), "property 'bar' has no setter");
    }

    #[test]
    fn aggregate_reports_count() {
        let err = InvokeError::aggregate(vec![
            InvokeError::failure("one"),
            InvokeError::failure("two"),
        ]);
        assert_eq!(err.to_string(), "2 constituent(s) failed");
    }
}
