//! Property tests for constituent-list semantics.

#![allow(clippy::expect_used, missing_docs)]

use std::sync::{Arc, Mutex};

use proptest::prelude::*;
use tandem_compose::ComposableRegistry;
use tandem_core::{Callable, Value};

const POOL: usize = 5;

#[derive(Debug, Clone)]
enum Op {
    Extend(Vec<usize>),
    Remove(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        prop::collection::vec(0..POOL, 0..4).prop_map(Op::Extend),
        (0..POOL).prop_map(Op::Remove),
    ]
}

/// Pool of recorder constituents that push their index on invocation.
fn recorder_pool(order: &Arc<Mutex<Vec<usize>>>) -> Vec<Callable> {
    (0..POOL)
        .map(|index| {
            let order = Arc::clone(order);
            Callable::from_fn(move |_, _| {
                order.lock().expect("order lock").push(index);
                Ok(Value::Null)
            })
        })
        .collect()
}

proptest! {
    /// Any interleaving of extend and remove keeps the constituent list
    /// duplicate-free and insertion-ordered, and invocation follows it.
    #[test]
    fn list_stays_deduped_and_ordered(ops in prop::collection::vec(op_strategy(), 0..30)) {
        let registry = ComposableRegistry::new();
        let invocations: Arc<Mutex<Vec<usize>>> = Arc::new(Mutex::new(Vec::new()));
        let pool = recorder_pool(&invocations);
        let base = Callable::from_fn(|_, _| Ok(Value::Null));
        let wrapper = registry.extend(&base, &[]);

        let mut model: Vec<usize> = Vec::new();
        for op in ops {
            match op {
                Op::Extend(indices) => {
                    let constituents: Vec<Callable> =
                        indices.iter().map(|index| pool[*index].clone()).collect();
                    let returned = registry.extend(&base, &constituents);
                    prop_assert!(returned.ptr_eq(&wrapper));
                    for index in indices {
                        if !model.contains(&index) {
                            model.push(index);
                        }
                    }
                }
                Op::Remove(index) => {
                    registry.remove(&wrapper, &pool[index]);
                    model.retain(|existing| *existing != index);
                }
            }
        }

        // The live list matches the model by identity and order.
        let actual = registry.constituents_of(&wrapper);
        prop_assert_eq!(actual.len(), model.len());
        for (constituent, index) in actual.iter().zip(model.iter()) {
            prop_assert!(constituent.ptr_eq(&pool[*index]));
        }

        // So does an actual invocation.
        wrapper.call(&Value::Null, &[]).expect("composed call");
        prop_assert_eq!(invocations.lock().expect("order lock").clone(), model);
    }

    /// Snapshots handed out by `constituents_of` are detached from the
    /// live list.
    #[test]
    fn snapshots_are_detached(count in 1usize..POOL) {
        let registry = ComposableRegistry::new();
        let invocations: Arc<Mutex<Vec<usize>>> = Arc::new(Mutex::new(Vec::new()));
        let pool = recorder_pool(&invocations);
        let base = Callable::from_fn(|_, _| Ok(Value::Null));

        let wrapper = registry.extend(&base, &pool[..count]);
        let mut snapshot = registry.constituents_of(&wrapper);
        snapshot.clear();

        prop_assert_eq!(registry.constituents_of(&wrapper).len(), count);
    }
}
