//! Binding resolution.
//!
//! Given a requested type, the current call path and a registry snapshot,
//! pick exactly one binding:
//!
//! - [`filter`] narrows the registry to bindings whose predicate accepts
//!   the request and whose context is a suffix of the call path.
//! - [`select`] orders those by specificity and falls back to a
//!   synthesized [`default`] binding when nothing applies.
//!
//! Everything here is a pure function of its inputs. A [`Resolver`] only
//! bundles an `Arc`'d registry with a default factory so the pair can be
//! cloned into worker threads.

pub mod default;
pub mod filter;
pub mod select;

use std::fmt;
use std::sync::Arc;

pub use default::{make_default, DefaultFactory, DependencyDefaults};
pub use filter::{filter, Candidate};
pub use select::{compare_specificity, order_by_specificity, rank, resolve, Resolution};

use crate::context::CallPath;
use crate::registry::Registry;
use crate::types::TypeDescriptor;

/// A registry snapshot paired with its default factory.
pub struct Resolver<P, F = DependencyDefaults> {
    registry: Arc<Registry<P>>,
    defaults: F,
}

impl<P, F: DefaultFactory<P>> Resolver<P, F> {
    pub fn new(registry: impl Into<Arc<Registry<P>>>, defaults: F) -> Self {
        Self {
            registry: registry.into(),
            defaults,
        }
    }

    pub fn registry(&self) -> &Registry<P> {
        &self.registry
    }

    /// Resolve one request. See [`select::resolve`].
    pub fn resolve(&self, requested: &TypeDescriptor, path: &CallPath) -> Resolution<'_, P> {
        resolve(requested, path, self.registry.bindings(), &self.defaults)
    }

    /// Every applicable binding in selection order, default last.
    pub fn rank(&self, requested: &TypeDescriptor, path: &CallPath) -> Vec<Resolution<'_, P>> {
        rank(requested, path, self.registry.bindings(), &self.defaults)
    }

    /// Applicable bindings, unordered.
    pub fn candidates(&self, requested: &TypeDescriptor, path: &CallPath) -> Vec<Candidate<'_, P>> {
        filter(requested, path, self.registry.bindings())
    }
}

impl<P> Resolver<P, DependencyDefaults>
where
    DependencyDefaults: DefaultFactory<P>,
{
    /// A resolver using the standard [`DependencyDefaults`] factory.
    pub fn with_defaults(registry: impl Into<Arc<Registry<P>>>) -> Self {
        Self::new(registry, DependencyDefaults)
    }
}

impl<P, F: Clone> Clone for Resolver<P, F> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            defaults: self.defaults.clone(),
        }
    }
}

impl<P, F> fmt::Debug for Resolver<P, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("bindings", &self.registry.len())
            .finish_non_exhaustive()
    }
}
