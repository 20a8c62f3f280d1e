//! First-class callables with reference identity.
//!
//! [`Callable`] is a cheaply clonable handle around the [`Invoke`] trait.
//! Identity is allocation identity: two clones of one handle compare equal,
//! two handles lifted from byte-identical closures do not. The composition
//! layer keys its registry on this identity and recognizes its own wrapper
//! type through [`Callable::downcast_ref`].

use std::any::Any;
use std::fmt;
use std::sync::{Arc, Weak};

use crate::error::InvokeError;
use crate::value::Value;

/// Object-safe invocation seam implemented by every callable.
///
/// Invocation is synchronous: it completes or fails before returning.
/// `receiver` plays the calling-context role and is [`Value::Null`] for
/// free-standing calls.
pub trait Invoke: Send + Sync {
    /// Invoke with the given receiver and argument list.
    fn invoke(&self, receiver: &Value, args: &[Value]) -> Result<Value, InvokeError>;

    /// Diagnostic name, if the callable has one.
    fn name(&self) -> Option<&str> {
        None
    }

    /// Type-erased self, so downstream crates can recognize their own
    /// callable implementations by downcasting.
    fn as_any(&self) -> &dyn Any;
}

/// A clonable handle to an [`Invoke`] implementation.
///
/// Cloning shares the underlying allocation; [`Callable::ptr_eq`] compares
/// that allocation, which is the identity every registry in this workspace
/// keys on.
#[derive(Clone)]
pub struct Callable {
    inner: Arc<dyn Invoke>,
}

impl Callable {
    /// Wrap an existing [`Invoke`] implementation.
    pub fn new(inner: Arc<dyn Invoke>) -> Self {
        Self { inner }
    }

    /// Lift a closure into a callable.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> Result<Value, InvokeError> + Send + Sync + 'static,
    {
        Self::new(Arc::new(FnInvoke { name: None, f }))
    }

    /// Lift a closure into a callable with a diagnostic name.
    pub fn named<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> Result<Value, InvokeError> + Send + Sync + 'static,
    {
        Self::new(Arc::new(FnInvoke {
            name: Some(name.into()),
            f,
        }))
    }

    /// Invoke the callable.
    pub fn call(&self, receiver: &Value, args: &[Value]) -> Result<Value, InvokeError> {
        self.inner.invoke(receiver, args)
    }

    /// Diagnostic name, if any.
    pub fn name(&self) -> Option<&str> {
        self.inner.name()
    }

    /// Bind a receiver, producing a callable that ignores the receiver it is
    /// later invoked with. The binding is taken at bind time, not call time.
    pub fn bind(&self, receiver: Value) -> Callable {
        Callable::new(Arc::new(BoundMethod {
            receiver,
            method: self.clone(),
        }))
    }

    /// Identity comparison: true if both handles share one allocation.
    pub fn ptr_eq(&self, other: &Callable) -> bool {
        // Compare data pointers only; vtable pointers for one type may
        // differ across codegen units.
        std::ptr::eq(
            Arc::as_ptr(&self.inner) as *const (),
            Arc::as_ptr(&other.inner) as *const (),
        )
    }

    /// Address of the underlying allocation, stable while the callable is
    /// alive. Used as a registry key; a key alone proves nothing once the
    /// callable may have been dropped, so registries revalidate with
    /// [`Callable::ptr_eq`] after upgrading their weak handles.
    pub fn addr(&self) -> usize {
        Arc::as_ptr(&self.inner) as *const () as usize
    }

    /// Downgrade to a non-owning handle.
    pub fn downgrade(&self) -> WeakCallable {
        WeakCallable {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Downcast the underlying implementation to a concrete type.
    pub fn downcast_ref<T: Invoke + 'static>(&self) -> Option<&T> {
        self.inner.as_any().downcast_ref::<T>()
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "Callable({name})"),
            None => write!(f, "Callable({:#x})", self.addr()),
        }
    }
}

/// Non-owning handle to a callable.
#[derive(Clone)]
pub struct WeakCallable {
    inner: Weak<dyn Invoke>,
}

impl WeakCallable {
    /// Recover the callable if it is still alive.
    pub fn upgrade(&self) -> Option<Callable> {
        self.inner.upgrade().map(Callable::new)
    }
}

impl fmt::Debug for WeakCallable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WeakCallable")
    }
}

/// Closure-backed [`Invoke`] implementation behind [`Callable::from_fn`].
struct FnInvoke<F> {
    name: Option<String>,
    f: F,
}

impl<F> Invoke for FnInvoke<F>
where
    F: Fn(&Value, &[Value]) -> Result<Value, InvokeError> + Send + Sync + 'static,
{
    fn invoke(&self, receiver: &Value, args: &[Value]) -> Result<Value, InvokeError> {
        (self.f)(receiver, args)
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A method with its receiver fixed at bind time.
struct BoundMethod {
    receiver: Value,
    method: Callable,
}

impl Invoke for BoundMethod {
    fn invoke(&self, _receiver: &Value, args: &[Value]) -> Result<Value, InvokeError> {
        self.method.call(&self.receiver, args)
    }

    fn name(&self) -> Option<&str> {
        self.method.name()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
