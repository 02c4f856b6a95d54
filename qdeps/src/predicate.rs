//! Binding predicates.
//!
//! A predicate decides whether a binding applies to a requested type. The
//! resolver treats it as an opaque callable and always passes the plain
//! (qualifier-free) form of the request.

use std::fmt;
use std::sync::Arc;

use crate::hierarchy::TypeHierarchy;
use crate::types::TypeDescriptor;

/// A function that checks whether a binding applies to a type.
pub type PredicateFn = dyn Fn(&TypeDescriptor) -> bool + Send + Sync;

/// A labelled, shareable type predicate.
#[derive(Clone)]
pub struct Predicate {
    label: Arc<str>,
    test: Arc<PredicateFn>,
}

impl Predicate {
    /// Wrap an arbitrary callable. `label` is only used for diagnostics.
    pub fn new<F>(label: impl Into<Arc<str>>, test: F) -> Self
    where
        F: Fn(&TypeDescriptor) -> bool + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            test: Arc::new(test),
        }
    }

    /// Applies when the requested type is exactly `ty`.
    pub fn exact(ty: TypeDescriptor) -> Self {
        let ty = ty.make_plain();
        Self::new(format!("type == {}", ty), move |requested| *requested == ty)
    }

    /// Applies when the requested type is `ty` itself or any declared supertype of it.
    ///
    /// This is the interface-binding rule: a binding for `V8` registered
    /// as assignable serves requests for `Engine` when `V8` implements
    /// `Engine` in `hierarchy`.
    pub fn assignable_to(ty: TypeDescriptor, hierarchy: Arc<TypeHierarchy>) -> Self {
        let ty = ty.make_plain();
        Self::new(format!("{} <: type", ty), move |requested| {
            hierarchy.is_subtype(&ty, requested)
        })
    }

    /// Applies to every request.
    pub fn any() -> Self {
        Self::new("any", |_| true)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn test(&self, ty: &TypeDescriptor) -> bool {
        (self.test)(ty)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Predicate").field(&self.label).finish()
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}
