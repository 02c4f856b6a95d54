//! Immutable binding snapshots.
//!
//! Registration happens once, through [`RegistryBuilder`]. The resulting
//! [`Registry`] is read-only and can be shared across threads behind an
//! `Arc` for concurrent resolution.

use crate::binding::Binding;
use crate::context::Context;
use crate::dependency::Dependency;
use crate::types::TypeDescriptor;

/// A frozen, ordered collection of bindings.
///
/// Registration order is kept: it breaks ties between bindings of equal
/// specificity.
#[derive(Debug, Clone)]
pub struct Registry<P> {
    bindings: Vec<Binding<P>>,
}

impl<P> Registry<P> {
    pub fn builder() -> RegistryBuilder<P> {
        RegistryBuilder::new()
    }

    /// A registry with no bindings; every request falls back to its default.
    pub fn empty() -> Self {
        Self { bindings: Vec::new() }
    }

    pub fn bindings(&self) -> &[Binding<P>] {
        &self.bindings
    }

    pub fn get(&self, index: usize) -> Option<&Binding<P>> {
        self.bindings.get(index)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Binding<P>> {
        self.bindings.iter()
    }
}

impl<P> Default for Registry<P> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<P> FromIterator<Binding<P>> for Registry<P> {
    fn from_iter<I: IntoIterator<Item = Binding<P>>>(iter: I) -> Self {
        Self {
            bindings: iter.into_iter().collect(),
        }
    }
}

impl<'r, P> IntoIterator for &'r Registry<P> {
    type Item = &'r Binding<P>;
    type IntoIter = std::slice::Iter<'r, Binding<P>>;

    fn into_iter(self) -> Self::IntoIter {
        self.bindings.iter()
    }
}

/// Collects bindings in registration order.
#[derive(Debug)]
pub struct RegistryBuilder<P> {
    bindings: Vec<Binding<P>>,
}

impl<P> RegistryBuilder<P> {
    pub fn new() -> Self {
        Self { bindings: Vec::new() }
    }

    pub fn register(mut self, binding: Binding<P>) -> Self {
        self.bindings.push(binding);
        self
    }

    pub fn push(&mut self, binding: Binding<P>) -> &mut Self {
        self.bindings.push(binding);
        self
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn build(self) -> Registry<P> {
        Registry {
            bindings: self.bindings,
        }
    }
}

impl<P> Default for RegistryBuilder<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryBuilder<Dependency> {
    /// Register `expected -> given` for every call path.
    pub fn bind(self, expected: TypeDescriptor, given: TypeDescriptor) -> Self {
        self.register(Dependency::bind(expected, given))
    }

    /// Register `expected -> given` for call paths ending in `context`.
    pub fn bind_in<I>(self, expected: TypeDescriptor, given: TypeDescriptor, context: I) -> Self
    where
        I: IntoIterator<Item = TypeDescriptor>,
    {
        self.register(Dependency::bind_in(
            expected,
            given,
            context.into_iter().collect::<Context>(),
        ))
    }
}
