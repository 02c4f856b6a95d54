//! The standard binding payload: "construct `given` when `expected` is requested".

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::binding::Binding;
use crate::context::Context;
use crate::hierarchy::TypeHierarchy;
use crate::predicate::Predicate;
use crate::types::TypeDescriptor;

/// Maps an expected (requested) type to the type that should be built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dependency {
    pub expected: TypeDescriptor,
    pub given: TypeDescriptor,
}

impl Dependency {
    pub fn new(expected: TypeDescriptor, given: TypeDescriptor) -> Self {
        Self { expected, given }
    }

    /// `expected` bound to itself.
    pub fn to_self(ty: TypeDescriptor) -> Self {
        Self {
            given: ty.clone(),
            expected: ty,
        }
    }

    /// Binding for requests of exactly `expected`, building `given`.
    pub fn bind(expected: TypeDescriptor, given: TypeDescriptor) -> Binding<Self> {
        Binding::unscoped(Predicate::exact(expected.clone()), Self::new(expected, given))
    }

    /// Binding for requests of `given` or any of its declared supertypes.
    pub fn bind_assignable(given: TypeDescriptor, hierarchy: Arc<TypeHierarchy>) -> Binding<Self> {
        Binding::unscoped(
            Predicate::assignable_to(given.clone(), hierarchy),
            Self::to_self(given),
        )
    }

    /// Binding for requests of exactly `expected` inside `context`.
    pub fn bind_in(
        expected: TypeDescriptor,
        given: TypeDescriptor,
        context: Context,
    ) -> Binding<Self> {
        Binding::new(
            Predicate::exact(expected.clone()),
            context,
            Self::new(expected, given),
        )
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.expected, self.given)
    }
}
