//! Constituent failure handling.
//!
//! The source design leaves this open, so it is a construction-time option
//! on the registry rather than a hard-coded rule. Records inherit the
//! registry's policy when they are created and keep it for their lifetime.

/// What a composed call does when a constituent fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Propagate the first failure immediately; later constituents do not
    /// run and the base's already-computed result is lost
    #[default]
    FailFast,
    /// Run every constituent, then report all failures as one aggregate;
    /// the call still reports failure, not partial success
    ContinueOnError,
}
