//! Registry query: which bindings apply to a request.

use std::fmt;

use tracing::trace;

use crate::binding::Binding;
use crate::context::CallPath;
use crate::types::TypeDescriptor;

/// A binding that passed the filter, with its registration index.
pub struct Candidate<'r, P> {
    /// Position of the binding in the registry.
    pub index: usize,
    pub binding: &'r Binding<P>,
}

impl<P> Clone for Candidate<'_, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for Candidate<'_, P> {}

impl<P: fmt::Debug> fmt::Debug for Candidate<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Candidate")
            .field("index", &self.index)
            .field("binding", self.binding)
            .finish()
    }
}

/// Select every binding whose predicate accepts the plain form of
/// `requested` and whose context is a suffix of `path`.
///
/// The result is in registration order but callers must not rely on that;
/// the selector re-sorts. Never fails: an empty result means the request
/// falls through to its default binding.
pub fn filter<'r, P>(
    requested: &TypeDescriptor,
    path: &CallPath,
    bindings: &'r [Binding<P>],
) -> Vec<Candidate<'r, P>> {
    let plain = requested.make_plain();

    bindings
        .iter()
        .enumerate()
        .filter(|(index, binding)| {
            let accepted = binding.applies(&plain, path);
            if accepted {
                trace!(
                    index = *index,
                    predicate = %binding.predicate(),
                    context = %binding.context(),
                    "binding applies to {}",
                    plain
                );
            }
            accepted
        })
        .map(|(index, binding)| Candidate { index, binding })
        .collect()
}
