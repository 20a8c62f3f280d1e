//! Plan computation and accessor installation.
//!
//! Installation is two-phase: the plan (member kinds plus conflict
//! decisions) is computed with no mutation, then applied as one batched
//! define. Under the `Error` policy any conflict fails the call before the
//! apply phase, so either all requested properties install or none do.

use tandem_core::{Callable, ConflictPolicy, InvokeError, Object, PropertyKind, Slot, Value};
use tracing::{debug, warn};

use crate::error::ForwardError;
use crate::spec::{ForwardSpec, Resolver};

struct Plan {
    entries: Vec<(String, Slot)>,
    skipped: Vec<String>,
}

/// Install forwarding accessors on `target` per `spec`.
///
/// Every forwarded read and write resolves the delegate through the spec's
/// resolver at access time; nothing about the delegate is cached. Returns
/// the target handle for chaining. Mutates only the target, never the
/// delegate.
pub fn install_forwarding(target: &Object, spec: &ForwardSpec) -> Result<Object, ForwardError> {
    let plan = compute_plan(target, spec)?;

    if !plan.skipped.is_empty() {
        warn!(
            object_id = target.id(),
            skipped = ?plan.skipped,
            "skip policy left existing members untouched"
        );
    }
    debug!(
        object_id = target.id(),
        properties = plan.entries.len(),
        policy = ?spec.policy(),
        "installing forwarding accessors"
    );

    target.define_all(plan.entries);
    Ok(target.clone())
}

/// Call-level convenience: forward `properties` through `resolver` with the
/// default conflict policy.
pub fn forward(
    target: &Object,
    resolver: Resolver,
    properties: &[&str],
) -> Result<Object, ForwardError> {
    let spec = ForwardSpec::builder(resolver)
        .properties(properties.iter().copied())
        .build()?;
    install_forwarding(target, &spec)
}

/// Apply several specs in declaration order.
///
/// A later spec's collisions with members installed by an earlier one are
/// handled by the later spec's own policy, exactly as collisions with
/// pre-existing members are. Each spec keeps its per-call atomicity.
pub fn install_all(target: &Object, specs: &[ForwardSpec]) -> Result<Object, ForwardError> {
    for spec in specs {
        install_forwarding(target, spec)?;
    }
    Ok(target.clone())
}

fn compute_plan(target: &Object, spec: &ForwardSpec) -> Result<Plan, ForwardError> {
    let kinds = member_kinds(target, spec)?;

    let mut entries = Vec::with_capacity(kinds.len());
    let mut skipped = Vec::new();
    for (name, kind) in kinds {
        if target.has_own(&name) {
            match spec.policy() {
                ConflictPolicy::Error => return Err(ForwardError::conflict(name)),
                ConflictPolicy::Skip => {
                    skipped.push(name);
                    continue;
                }
                ConflictPolicy::Override => {}
            }
        }
        let slot = forwarded_slot(spec.resolver().clone(), &name, kind);
        entries.push((name, slot));
    }

    Ok(Plan { entries, skipped })
}

/// Determine each requested name's kind, from the supplied shape when one
/// exists, else by inspecting a representative delegate resolved once.
fn member_kinds(
    target: &Object,
    spec: &ForwardSpec,
) -> Result<Vec<(String, PropertyKind)>, ForwardError> {
    if let Some(shape) = spec.shape() {
        return spec
            .properties()
            .iter()
            .map(|name| {
                shape.kind_of(name).map(|kind| (name.clone(), kind)).ok_or_else(|| {
                    ForwardError::invalid_spec(format!("property '{name}' absent from shape"))
                })
            })
            .collect();
    }

    let representative = spec.resolver().resolve(target).map_err(|source| {
        ForwardError::invalid_spec_with("resolver failed for representative delegate", source)
    })?;
    spec.properties()
        .iter()
        .map(|name| {
            representative
                .kind_of(name)
                .map(|kind| (name.clone(), kind))
                .ok_or_else(|| {
                    ForwardError::invalid_spec(format!(
                        "property '{name}' absent on the delegate"
                    ))
                })
        })
        .collect()
}

/// Synthesize the accessor pair installed for one forwarded name.
///
/// The installed callables read the target out of their receiver rather
/// than capturing it, so a slot always resolves against the object it is
/// actually accessed through.
fn forwarded_slot(resolver: Resolver, name: &str, kind: PropertyKind) -> Slot {
    match kind {
        PropertyKind::Data | PropertyKind::Accessor => {
            let get = {
                let resolver = resolver.clone();
                let name = name.to_string();
                Callable::named(format!("forward.get {name}"), move |receiver, _args| {
                    let delegate = resolver.resolve(receiver_object(receiver)?)?;
                    delegate.get(&name)
                })
            };
            let set = {
                let name = name.to_string();
                Callable::named(format!("forward.set {name}"), move |receiver, args| {
                    let delegate = resolver.resolve(receiver_object(receiver)?)?;
                    let value = args.first().cloned().unwrap_or(Value::Null);
                    delegate.set(&name, value)?;
                    Ok(Value::Null)
                })
            };
            Slot::Accessor {
                get: Some(get),
                set: Some(set),
            }
        }
        PropertyKind::Method => {
            // Reading a method slot on the delegate yields it bound to that
            // delegate, so the binding is taken at access time, not install
            // time. Writes have no setter to land on.
            let name = name.to_string();
            let get = Callable::named(format!("forward.method {name}"), move |receiver, _args| {
                let delegate = resolver.resolve(receiver_object(receiver)?)?;
                delegate.get(&name)
            });
            Slot::Accessor {
                get: Some(get),
                set: None,
            }
        }
    }
}

fn receiver_object(receiver: &Value) -> Result<&Object, InvokeError> {
    receiver.as_object().ok_or_else(|| {
        InvokeError::missing_delegate("forwarded accessor invoked without an object receiver")
    })
}
