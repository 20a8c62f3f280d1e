//! Forwarding specs: the declarative description of one installation.
//!
//! A [`ForwardSpec`] is built once through its builder and immutable
//! thereafter. The [`Resolver`] it carries is the abstraction boundary for
//! "whichever object currently plays the delegate role": an explicit
//! function value invoked on every access, never a cached slot.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use tandem_core::{ConflictPolicy, InvokeError, Object, PropertyKind};

use crate::error::ForwardError;

type ResolveFn = dyn Fn(&Object) -> Result<Object, InvokeError> + Send + Sync;

/// Resolves the current delegate for a target.
///
/// Resolution depends on the target's current state, so it runs on every
/// forwarded access and is never cached across a get/set pair.
#[derive(Clone)]
pub struct Resolver {
    inner: Arc<ResolveFn>,
}

impl Resolver {
    /// Wrap a resolution function.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&Object) -> Result<Object, InvokeError> + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }

    /// A resolver that always yields the same delegate handle.
    pub fn fixed(delegate: Object) -> Self {
        Self::from_fn(move |_| Ok(delegate.clone()))
    }

    /// Resolve the delegate for `target`.
    pub fn resolve(&self, target: &Object) -> Result<Object, InvokeError> {
        (self.inner)(target)
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Resolver({:#x})", Arc::as_ptr(&self.inner) as *const () as usize)
    }
}

/// A supplied member-shape description, for specs defined before any
/// delegate exists. When present, plan computation uses it instead of
/// inspecting a representative delegate.
#[derive(Debug, Clone, Default)]
pub struct Shape {
    kinds: IndexMap<String, PropertyKind>,
}

impl Shape {
    /// Create an empty shape.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a member description.
    pub fn with(mut self, name: impl Into<String>, kind: PropertyKind) -> Self {
        self.kinds.insert(name.into(), kind);
        self
    }

    /// Kind of the named member, if described.
    pub fn kind_of(&self, name: &str) -> Option<PropertyKind> {
        self.kinds.get(name).copied()
    }

    /// Number of described members.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// True if no members are described.
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

/// Declarative description of one forwarding installation.
///
/// Immutable once built; re-running an installation against the same target
/// either errors or overrides per its [`ConflictPolicy`].
#[derive(Debug, Clone)]
pub struct ForwardSpec {
    resolver: Resolver,
    properties: Vec<String>,
    policy: ConflictPolicy,
    shape: Option<Shape>,
}

impl ForwardSpec {
    /// Start building a spec around a resolver.
    pub fn builder(resolver: Resolver) -> ForwardSpecBuilder {
        ForwardSpecBuilder {
            resolver,
            properties: Vec::new(),
            policy: ConflictPolicy::default(),
            shape: None,
        }
    }

    /// The delegate resolver.
    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Forwarded names, in declaration order.
    pub fn properties(&self) -> &[String] {
        &self.properties
    }

    /// Conflict handling for this installation.
    pub fn policy(&self) -> ConflictPolicy {
        self.policy
    }

    /// The supplied shape, if the spec was defined before any delegate.
    pub fn shape(&self) -> Option<&Shape> {
        self.shape.as_ref()
    }
}

/// Builder for [`ForwardSpec`].
#[derive(Debug)]
pub struct ForwardSpecBuilder {
    resolver: Resolver,
    properties: Vec<String>,
    policy: ConflictPolicy,
    shape: Option<Shape>,
}

impl ForwardSpecBuilder {
    /// Append one forwarded name.
    pub fn property(mut self, name: impl Into<String>) -> Self {
        self.properties.push(name.into());
        self
    }

    /// Append several forwarded names in order.
    pub fn properties<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.properties.extend(names.into_iter().map(Into::into));
        self
    }

    /// Set the conflict policy.
    pub fn policy(mut self, policy: ConflictPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Supply a shape description instead of representative inspection.
    pub fn shape(mut self, shape: Shape) -> Self {
        self.shape = Some(shape);
        self
    }

    /// Validate and build the spec.
    ///
    /// Names must be unique within the spec and at least one is required.
    pub fn build(self) -> Result<ForwardSpec, ForwardError> {
        if self.properties.is_empty() {
            return Err(ForwardError::invalid_spec("no properties to forward"));
        }
        let mut seen = std::collections::HashSet::new();
        for name in &self.properties {
            if !seen.insert(name.as_str()) {
                return Err(ForwardError::invalid_spec(format!(
                    "duplicate property '{name}'"
                )));
            }
        }
        Ok(ForwardSpec {
            resolver: self.resolver,
            properties: self.properties,
            policy: self.policy,
            shape: self.shape,
        })
    }
}
