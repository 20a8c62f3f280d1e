//! Shared, mutable property bags with reference identity.
//!
//! `Object` wraps an insertion-ordered slot map behind an `Arc`, so clones
//! are handles to one object. Slots are read under a short-lived lock that
//! is always released before user code (getters, setters, methods) runs.
//!
//! # Runtime Agnostic
//!
//! This module uses only std primitives (`RwLock` behind `Arc`) so it works
//! from sync and async callers alike; no operation blocks on anything but
//! the slot lock itself.

// Allow expect on RwLock::read/write - lock poisoning from panics
// is unrecoverable, so expect() is the appropriate handling pattern.
#![allow(clippy::expect_used)]

use std::fmt;
use std::sync::{Arc, RwLock};

use indexmap::IndexMap;

use crate::callable::Callable;
use crate::error::InvokeError;
use crate::types::PropertyKind;
use crate::value::Value;

/// One own member of an object.
#[derive(Clone)]
pub enum Slot {
    /// Plain stored value
    Data(Value),
    /// Computed property; either side may be absent
    Accessor {
        /// Called with the object as receiver and no arguments
        get: Option<Callable>,
        /// Called with the object as receiver and the new value
        set: Option<Callable>,
    },
    /// Behavior invoked with the object as receiver
    Method(Callable),
}

impl Slot {
    /// The kind tag for this slot.
    pub fn kind(&self) -> PropertyKind {
        match self {
            Slot::Data(_) => PropertyKind::Data,
            Slot::Accessor { .. } => PropertyKind::Accessor,
            Slot::Method(_) => PropertyKind::Method,
        }
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Data(value) => f.debug_tuple("Data").field(value).finish(),
            Slot::Accessor { get, set } => f
                .debug_struct("Accessor")
                .field("get", &get.is_some())
                .field("set", &set.is_some())
                .finish(),
            Slot::Method(callable) => f.debug_tuple("Method").field(callable).finish(),
        }
    }
}

struct ObjectInner {
    /// Own members in definition order.
    slots: RwLock<IndexMap<String, Slot>>,
}

/// A shared dynamic object.
///
/// Cloning an `Object` clones the handle, not the object; all clones observe
/// the same members. Identity ([`Object::ptr_eq`]) is allocation identity.
#[derive(Clone)]
pub struct Object {
    inner: Arc<ObjectInner>,
}

impl Object {
    /// Create an empty object.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ObjectInner {
                slots: RwLock::new(IndexMap::new()),
            }),
        }
    }

    /// Identity comparison: true if both handles refer to one object.
    pub fn ptr_eq(&self, other: &Object) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Stable address of this object, for diagnostics.
    pub fn id(&self) -> usize {
        Arc::as_ptr(&self.inner) as usize
    }

    /// Define or replace one own member.
    pub fn define(&self, name: impl Into<String>, slot: Slot) {
        self.inner
            .slots
            .write()
            .expect("object slot lock poisoned")
            .insert(name.into(), slot);
    }

    /// Define or replace a data member.
    pub fn define_data(&self, name: impl Into<String>, value: impl Into<Value>) {
        self.define(name, Slot::Data(value.into()));
    }

    /// Define or replace a method member.
    pub fn define_method(&self, name: impl Into<String>, method: Callable) {
        self.define(name, Slot::Method(method));
    }

    /// Define or replace an accessor member.
    pub fn define_accessor(
        &self,
        name: impl Into<String>,
        get: Option<Callable>,
        set: Option<Callable>,
    ) {
        self.define(name, Slot::Accessor { get, set });
    }

    /// Define several members under one write lock, so a multi-property
    /// installation is never observable half-done.
    pub fn define_all(&self, entries: impl IntoIterator<Item = (String, Slot)>) {
        // Drain the iterator before taking the lock; it may touch this object.
        let entries: Vec<(String, Slot)> = entries.into_iter().collect();
        let mut slots = self
            .inner
            .slots
            .write()
            .expect("object slot lock poisoned");
        for (name, slot) in entries {
            slots.insert(name, slot);
        }
    }

    /// Remove an own member, returning its slot.
    pub fn remove_slot(&self, name: &str) -> Option<Slot> {
        self.inner
            .slots
            .write()
            .expect("object slot lock poisoned")
            .shift_remove(name)
    }

    /// True if the object itself defines `name` (inheritance is not modeled).
    pub fn has_own(&self, name: &str) -> bool {
        self.inner
            .slots
            .read()
            .expect("object slot lock poisoned")
            .contains_key(name)
    }

    /// Kind of the named own member, if present.
    pub fn kind_of(&self, name: &str) -> Option<PropertyKind> {
        self.inner
            .slots
            .read()
            .expect("object slot lock poisoned")
            .get(name)
            .map(Slot::kind)
    }

    /// Own member names in definition order.
    pub fn property_names(&self) -> Vec<String> {
        self.inner
            .slots
            .read()
            .expect("object slot lock poisoned")
            .keys()
            .cloned()
            .collect()
    }

    /// Number of own members.
    pub fn len(&self) -> usize {
        self.inner
            .slots
            .read()
            .expect("object slot lock poisoned")
            .len()
    }

    /// True if the object has no own members.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, name: &str) -> Option<Slot> {
        self.inner
            .slots
            .read()
            .expect("object slot lock poisoned")
            .get(name)
            .cloned()
    }

    /// Read a property.
    ///
    /// Data slots return the stored value, accessors run their getter with
    /// this object as receiver, and methods return the callable bound to
    /// this object.
    pub fn get(&self, name: &str) -> Result<Value, InvokeError> {
        match self.slot(name) {
            Some(Slot::Data(value)) => Ok(value),
            Some(Slot::Accessor { get: Some(getter), .. }) => {
                getter.call(&Value::Object(self.clone()), &[])
            }
            Some(Slot::Accessor { get: None, .. }) => Err(InvokeError::no_getter(name)),
            Some(Slot::Method(method)) => {
                Ok(Value::Callable(method.bind(Value::Object(self.clone()))))
            }
            None => Err(InvokeError::missing_property(name)),
        }
    }

    /// Write a property.
    ///
    /// Data slots are replaced, accessors run their setter with this object
    /// as receiver, methods are shadowed by a data slot, and writing an
    /// undefined name defines a data slot.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<(), InvokeError> {
        let value = value.into();
        match self.slot(name) {
            Some(Slot::Accessor { set: Some(setter), .. }) => {
                setter.call(&Value::Object(self.clone()), &[value])?;
                Ok(())
            }
            Some(Slot::Accessor { set: None, .. }) => Err(InvokeError::no_setter(name)),
            Some(Slot::Data(_)) | Some(Slot::Method(_)) | None => {
                self.define(name, Slot::Data(value));
                Ok(())
            }
        }
    }

    /// Invoke a property as a method with this object as receiver.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, InvokeError> {
        match self.get(name)? {
            Value::Callable(callable) => callable.call(&Value::Object(self.clone()), args),
            other => Err(InvokeError::not_callable(format!(
                "property '{name}' is a {}",
                other.type_name()
            ))),
        }
    }

    /// Export own data members as JSON; accessor and method members are
    /// skipped. Cyclic object graphs are not supported.
    pub fn to_json(&self) -> Result<serde_json::Value, InvokeError> {
        let snapshot: Vec<(String, Value)> = self
            .inner
            .slots
            .read()
            .expect("object slot lock poisoned")
            .iter()
            .filter_map(|(name, slot)| match slot {
                Slot::Data(value) => Some((name.clone(), value.clone())),
                _ => None,
            })
            .collect();

        let mut map = serde_json::Map::new();
        for (name, value) in snapshot {
            map.insert(name, value.to_json()?);
        }
        Ok(serde_json::Value::Object(map))
    }
}

impl Default for Object {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("id", &format_args!("{:#x}", self.id()))
            .field("properties", &self.len())
            .finish()
    }
}
