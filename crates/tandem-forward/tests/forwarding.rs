//! End-to-end forwarding behavior over live delegates.

#![allow(clippy::expect_used, missing_docs)]

use assert_matches::assert_matches;
use tandem_core::{Callable, ConflictPolicy, InvokeError, Object, PropertyKind, Value};
use tandem_forward::{install_all, install_forwarding, ForwardError, ForwardSpec, Resolver};

/// Delegate from the reference scenario:
/// `{ foo: 1, bar(){ return 2 }, get baz(){ return 3 } }`.
fn scenario_delegate() -> Object {
    let delegate = Object::new();
    delegate.define_data("foo", 1);
    delegate.define_method("bar", Callable::from_fn(|_, _| Ok(Value::Int(2))));
    delegate.define_accessor(
        "baz",
        Some(Callable::from_fn(|_, _| Ok(Value::Int(3)))),
        None,
    );
    delegate
}

#[test]
fn scenario_all_three_member_kinds_forward() {
    let delegate = scenario_delegate();
    let target = Object::new();
    let spec = ForwardSpec::builder(Resolver::fixed(delegate.clone()))
        .properties(["foo", "bar", "baz"])
        .build()
        .expect("valid spec");

    install_forwarding(&target, &spec).expect("installs cleanly");

    assert_eq!(target.get("foo").expect("data forwards"), Value::Int(1));
    assert_eq!(target.call("bar", &[]).expect("method forwards"), Value::Int(2));
    assert_eq!(target.get("baz").expect("accessor forwards"), Value::Int(3));

    delegate.set("foo", 9).expect("delegate write");
    assert_eq!(target.get("foo").expect("sees current state"), Value::Int(9));
}

#[test]
fn round_trip_has_a_single_source_of_truth() {
    let delegate = Object::new();
    delegate.define_data("x", 0);
    let resolver = Resolver::fixed(delegate.clone());
    let target = Object::new();
    let spec = ForwardSpec::builder(resolver.clone())
        .property("x")
        .build()
        .expect("valid spec");
    install_forwarding(&target, &spec).expect("installs cleanly");

    target.set("x", 7).expect("forwarded write");
    assert_eq!(target.get("x").expect("forwarded read"), Value::Int(7));
    assert_eq!(
        resolver
            .resolve(&target)
            .expect("resolver")
            .get("x")
            .expect("delegate read"),
        Value::Int(7)
    );
}

#[test]
fn delegate_can_vary_with_target_state() {
    let cold = Object::new();
    cold.define_data("temp", "cold");
    let hot = Object::new();
    hot.define_data("temp", "hot");

    let resolver = {
        let cold = cold.clone();
        let hot = hot.clone();
        Resolver::from_fn(move |target| {
            match target.get("mode")? {
                Value::Text(mode) if mode == "hot" => Ok(hot.clone()),
                _ => Ok(cold.clone()),
            }
        })
    };

    let target = Object::new();
    target.define_data("mode", "cold");
    let spec = ForwardSpec::builder(resolver)
        .property("temp")
        .build()
        .expect("valid spec");
    install_forwarding(&target, &spec).expect("installs cleanly");

    assert_eq!(target.get("temp").expect("read"), Value::Text("cold".into()));
    target.set("mode", "hot").expect("state flip");
    assert_eq!(target.get("temp").expect("read"), Value::Text("hot".into()));
}

#[test]
fn forwarded_methods_track_the_delegate_not_a_snapshot() {
    let delegate = Object::new();
    delegate.define_method("greet", Callable::from_fn(|_, _| Ok(Value::Text("old".into()))));
    let target = Object::new();
    let spec = ForwardSpec::builder(Resolver::fixed(delegate.clone()))
        .property("greet")
        .build()
        .expect("valid spec");
    install_forwarding(&target, &spec).expect("installs cleanly");

    assert_eq!(target.call("greet", &[]).expect("call"), Value::Text("old".into()));

    delegate.define_method("greet", Callable::from_fn(|_, _| Ok(Value::Text("new".into()))));
    assert_eq!(target.call("greet", &[]).expect("call"), Value::Text("new".into()));
}

#[test]
fn forwarded_method_reads_bind_the_current_delegate() {
    let delegate = Object::new();
    delegate.define_data("n", 21);
    delegate.define_method(
        "double",
        Callable::from_fn(|receiver, _| {
            let me = receiver.as_object().expect("receiver is the delegate");
            Ok(Value::Int(me.get("n")?.as_int().unwrap_or(0) * 2))
        }),
    );
    let target = Object::new();
    let spec = ForwardSpec::builder(Resolver::fixed(delegate))
        .property("double")
        .build()
        .expect("valid spec");
    install_forwarding(&target, &spec).expect("installs cleanly");

    // The read hands back a callable bound to the delegate; the method body
    // sees the delegate's state even when invoked bare.
    let method = target.get("double").expect("read");
    let callable = method.as_callable().expect("method reads yield callables");
    assert_eq!(callable.call(&Value::Null, &[]).expect("call"), Value::Int(42));
}

#[test]
fn writing_a_forwarded_method_has_no_setter() {
    let delegate = scenario_delegate();
    let target = Object::new();
    let spec = ForwardSpec::builder(Resolver::fixed(delegate))
        .property("bar")
        .build()
        .expect("valid spec");
    install_forwarding(&target, &spec).expect("installs cleanly");

    assert_matches!(target.set("bar", 0), Err(InvokeError::NoSetter { .. }));
}

#[test]
fn install_does_not_mutate_the_delegate() {
    let delegate = scenario_delegate();
    let before = delegate.property_names();
    let target = Object::new();
    let spec = ForwardSpec::builder(Resolver::fixed(delegate.clone()))
        .properties(["foo", "bar", "baz"])
        .build()
        .expect("valid spec");
    install_forwarding(&target, &spec).expect("installs cleanly");

    assert_eq!(delegate.property_names(), before);
    assert_eq!(delegate.kind_of("foo"), Some(PropertyKind::Data));
}

#[test]
fn later_specs_follow_their_own_policy_against_earlier_installs() {
    let first_delegate = Object::new();
    first_delegate.define_data("shared", "first");
    let second_delegate = Object::new();
    second_delegate.define_data("shared", "second");

    let first = ForwardSpec::builder(Resolver::fixed(first_delegate.clone()))
        .property("shared")
        .build()
        .expect("valid spec");

    // Error policy: the second spec collides with the first's install.
    let target = Object::new();
    let second_error = ForwardSpec::builder(Resolver::fixed(second_delegate.clone()))
        .property("shared")
        .build()
        .expect("valid spec");
    let err = install_all(&target, &[first.clone(), second_error]).expect_err("conflict");
    assert_matches!(err, ForwardError::Conflict { .. });
    // The first spec's installation survives the second's failure.
    assert_eq!(target.get("shared").expect("read"), Value::Text("first".into()));

    // Skip policy: the earlier install wins.
    let target = Object::new();
    let second_skip = ForwardSpec::builder(Resolver::fixed(second_delegate.clone()))
        .property("shared")
        .policy(ConflictPolicy::Skip)
        .build()
        .expect("valid spec");
    install_all(&target, &[first.clone(), second_skip]).expect("skips");
    assert_eq!(target.get("shared").expect("read"), Value::Text("first".into()));

    // Override policy: the later install wins.
    let target = Object::new();
    let second_override = ForwardSpec::builder(Resolver::fixed(second_delegate))
        .property("shared")
        .policy(ConflictPolicy::Override)
        .build()
        .expect("valid spec");
    install_all(&target, &[first, second_override]).expect("overrides");
    assert_eq!(target.get("shared").expect("read"), Value::Text("second".into()));
}

#[test]
fn resolver_failure_at_access_time_surfaces_unchanged() {
    let delegate = Object::new();
    delegate.define_data("x", 1);
    let armed = Object::new();
    armed.define_data("broken", false);
    let resolver = {
        let delegate = delegate.clone();
        let armed = armed.clone();
        Resolver::from_fn(move |_| {
            if armed.get("broken")?.as_bool().unwrap_or(false) {
                Err(InvokeError::missing_delegate("delegate went away"))
            } else {
                Ok(delegate.clone())
            }
        })
    };

    let target = Object::new();
    let spec = ForwardSpec::builder(resolver)
        .property("x")
        .build()
        .expect("valid spec");
    install_forwarding(&target, &spec).expect("installs while resolvable");

    assert_eq!(target.get("x").expect("read"), Value::Int(1));
    armed.set("broken", true).expect("arm");
    assert_matches!(target.get("x"), Err(InvokeError::MissingDelegate { .. }));
}
