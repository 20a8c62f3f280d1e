//! Registry for composable wrappers.
//!
//! This module maintains the association from a base callable to its unique
//! wrapper. The association is weak in both directions: entries hold no
//! strong reference, so the registry keeps neither bases nor wrappers
//! alive, and dead entries are pruned opportunistically during `extend`.

// Allow expect on Mutex::lock - lock poisoning from panics
// is unrecoverable, so expect() is the appropriate handling pattern.
#![allow(clippy::expect_used)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

use once_cell::sync::Lazy;
use tandem_core::Callable;
use tracing::debug;

use crate::composite::Composite;
use crate::policy::FailurePolicy;

/// Process-wide default registry, created empty and never torn down.
static GLOBAL: Lazy<ComposableRegistry> = Lazy::new(ComposableRegistry::new);

/// Association from base-callable identity to its composable wrapper.
///
/// At most one wrapper per base exists at any instant: while any clone of a
/// wrapper is alive, [`extend`](ComposableRegistry::extend) on its base
/// returns that same wrapper. The lookup-or-create step is one atomic
/// section, so racing callers on one base still converge on one wrapper.
///
/// Registries are explicit values so tests can run isolated instances; the
/// process-wide default is reachable through [`global`] and the free
/// functions in this crate.
pub struct ComposableRegistry {
    entries: Mutex<HashMap<usize, Weak<Composite>>>,
    policy: FailurePolicy,
}

impl ComposableRegistry {
    /// Create an empty registry with the default fail-fast policy.
    pub fn new() -> Self {
        Self::with_policy(FailurePolicy::default())
    }

    /// Create an empty registry whose records inherit `policy`.
    pub fn with_policy(policy: FailurePolicy) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            policy,
        }
    }

    /// The failure policy new records inherit.
    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Return the composable wrapper for `callable`, creating it on first
    /// extension, and append `constituents` not already present by
    /// identity.
    ///
    /// If `callable` is itself a wrapper, its record is extended and the
    /// argument handle is returned unchanged. The call is idempotent:
    /// re-extending with already-present constituents changes nothing.
    pub fn extend(&self, callable: &Callable, constituents: &[Callable]) -> Callable {
        if let Some(composite) = callable.downcast_ref::<Composite>() {
            let added = composite.append(constituents);
            debug!(base = ?composite.base(), added, "extended existing wrapper");
            return callable.clone();
        }

        let composite = self.lookup_or_create(callable);
        let added = composite.append(constituents);
        debug!(base = ?callable, added, "extended composable record");
        Callable::new(composite)
    }

    /// Remove one constituent from a wrapper by identity. No-op if the
    /// constituent is absent or the argument is not a wrapper.
    pub fn remove(&self, wrapper: &Callable, constituent: &Callable) {
        if let Some(composite) = wrapper.downcast_ref::<Composite>() {
            composite.remove(constituent);
        }
    }

    /// Ordered snapshot of a wrapper's constituents; empty if the argument
    /// is not a wrapper. The live list is mutable only through
    /// [`extend`](Self::extend) and [`remove`](Self::remove).
    pub fn constituents_of(&self, wrapper: &Callable) -> Vec<Callable> {
        wrapper
            .downcast_ref::<Composite>()
            .map(Composite::constituents)
            .unwrap_or_default()
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .expect("registry lock poisoned")
            .values()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    /// True if no live entries exist.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The atomic read-check-create section guarding the multiton law.
    ///
    /// An entry found under the base's address is trusted only after its
    /// base survives an identity check; a dead base's address may have been
    /// reused by a different callable.
    fn lookup_or_create(&self, base: &Callable) -> Arc<Composite> {
        let mut entries = self.entries.lock().expect("registry lock poisoned");
        entries.retain(|_, weak| weak.strong_count() > 0);

        if let Some(existing) = entries.get(&base.addr()).and_then(Weak::upgrade) {
            if existing.base().ptr_eq(base) {
                return existing;
            }
        }

        let fresh = Arc::new(Composite::new(base.clone(), self.policy));
        entries.insert(base.addr(), Arc::downgrade(&fresh));
        debug!(base = ?base, "created composable record");
        fresh
    }
}

impl Default for ComposableRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ComposableRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComposableRegistry")
            .field("entries", &self.len())
            .field("policy", &self.policy)
            .finish()
    }
}

/// The process-wide default registry.
pub fn global() -> &'static ComposableRegistry {
    &GLOBAL
}

/// [`ComposableRegistry::extend`] on the process-wide registry.
pub fn extend(callable: &Callable, constituents: &[Callable]) -> Callable {
    global().extend(callable, constituents)
}

/// [`ComposableRegistry::remove`] on the process-wide registry.
pub fn remove(wrapper: &Callable, constituent: &Callable) {
    global().remove(wrapper, constituent)
}

/// [`ComposableRegistry::constituents_of`] on the process-wide registry.
pub fn constituents_of(wrapper: &Callable) -> Vec<Callable> {
    global().constituents_of(wrapper)
}
