//! The composite wrapper: a callable that runs a base and its constituents.

// Allow expect on RwLock::read/write - lock poisoning from panics
// is unrecoverable, so expect() is the appropriate handling pattern.
#![allow(clippy::expect_used)]

use std::any::Any;
use std::sync::RwLock;

use tandem_core::{Callable, Invoke, InvokeError, Value};
use tracing::warn;

use crate::policy::FailurePolicy;

/// The wrapper behind every composable callable.
///
/// Holds the base (invoked first on every call) and the ordered,
/// identity-deduplicated constituent list. The list is read as a snapshot
/// at call start; no lock is held while user code runs, and a constituent
/// added mid-call joins the next call, not the current one.
pub struct Composite {
    base: Callable,
    constituents: RwLock<Vec<Callable>>,
    policy: FailurePolicy,
}

impl Composite {
    pub(crate) fn new(base: Callable, policy: FailurePolicy) -> Self {
        Self {
            base,
            constituents: RwLock::new(Vec::new()),
            policy,
        }
    }

    /// The wrapped base callable.
    pub fn base(&self) -> &Callable {
        &self.base
    }

    /// The failure policy inherited from the creating registry.
    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Ordered snapshot of the current constituents.
    pub fn constituents(&self) -> Vec<Callable> {
        self.constituents
            .read()
            .expect("constituent lock poisoned")
            .clone()
    }

    /// Append constituents not already present by identity, preserving
    /// insertion order. Returns how many were actually added.
    pub(crate) fn append(&self, constituents: &[Callable]) -> usize {
        let self_addr = self as *const Composite as *const () as usize;
        let mut list = self
            .constituents
            .write()
            .expect("constituent lock poisoned");
        let mut added = 0;
        for constituent in constituents {
            // A wrapper never registers itself; that call would not terminate.
            if constituent.addr() == self_addr {
                continue;
            }
            if list.iter().any(|existing| existing.ptr_eq(constituent)) {
                continue;
            }
            list.push(constituent.clone());
            added += 1;
        }
        added
    }

    /// Remove one constituent by identity; no-op if absent.
    pub(crate) fn remove(&self, constituent: &Callable) -> bool {
        let mut list = self
            .constituents
            .write()
            .expect("constituent lock poisoned");
        match list.iter().position(|existing| existing.ptr_eq(constituent)) {
            Some(index) => {
                list.remove(index);
                true
            }
            None => false,
        }
    }
}

impl Invoke for Composite {
    fn invoke(&self, receiver: &Value, args: &[Value]) -> Result<Value, InvokeError> {
        // Base first; if it fails, no constituent runs.
        let result = self.base.call(receiver, args)?;

        let constituents = self.constituents();
        match self.policy {
            FailurePolicy::FailFast => {
                for constituent in &constituents {
                    constituent.call(receiver, args)?;
                }
            }
            FailurePolicy::ContinueOnError => {
                let failures: Vec<InvokeError> = constituents
                    .iter()
                    .filter_map(|constituent| constituent.call(receiver, args).err())
                    .collect();
                if !failures.is_empty() {
                    warn!(
                        base = ?self.base,
                        failed = failures.len(),
                        total = constituents.len(),
                        "constituents failed; aggregating"
                    );
                    return Err(InvokeError::aggregate(failures));
                }
            }
        }

        // Constituent return values are discarded; the call's result is
        // the base's.
        Ok(result)
    }

    fn name(&self) -> Option<&str> {
        self.base.name()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// True if the callable is a composable wrapper.
pub fn is_wrapper(callable: &Callable) -> bool {
    callable.downcast_ref::<Composite>().is_some()
}
