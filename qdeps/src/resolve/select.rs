//! Binding selection.
//!
//! # Algorithm Overview
//!
//! 1. **Filter**: keep bindings whose predicate and context apply
//! 2. **Order by specificity**: longer context first, registration order on ties
//! 3. **Append default**: the synthesized fallback always sits last
//! 4. **Select**: the head of the sequence wins
//!
//! Selection is total. There is no "no match" or "ambiguous" outcome:
//! the default covers the first, registration order settles the second.

use std::cmp::Ordering;
use std::fmt;

use tracing::debug;

use super::default::{make_default, DefaultFactory};
use super::filter::{filter, Candidate};
use crate::binding::Binding;
use crate::context::CallPath;
use crate::types::TypeDescriptor;

/// The outcome of resolving one request.
pub enum Resolution<'r, P> {
    /// A registered binding won.
    Registered(Candidate<'r, P>),
    /// Nothing applied; the synthesized default was chosen.
    Default(Binding<P>),
}

impl<'r, P> Resolution<'r, P> {
    pub fn binding(&self) -> &Binding<P> {
        match self {
            Resolution::Registered(candidate) => candidate.binding,
            Resolution::Default(binding) => binding,
        }
    }

    pub fn payload(&self) -> &P {
        self.binding().payload()
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Resolution::Default(_))
    }

    /// Registry index of the winning binding, `None` for a default.
    pub fn index(&self) -> Option<usize> {
        match self {
            Resolution::Registered(candidate) => Some(candidate.index),
            Resolution::Default(_) => None,
        }
    }
}

impl<P: fmt::Debug> fmt::Debug for Resolution<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Registered(candidate) => {
                f.debug_tuple("Registered").field(candidate).finish()
            }
            Resolution::Default(binding) => f.debug_tuple("Default").field(binding).finish(),
        }
    }
}

/// Compare two candidates: more context entries first, then earlier registration.
///
/// The registration index is an explicit secondary key, so the order does
/// not depend on the stability of the sort routine.
pub fn compare_specificity<P>(a: &Candidate<'_, P>, b: &Candidate<'_, P>) -> Ordering {
    b.binding
        .specificity()
        .cmp(&a.binding.specificity())
        .then(a.index.cmp(&b.index))
}

/// Sort candidates most specific first.
pub fn order_by_specificity<P>(candidates: &mut [Candidate<'_, P>]) {
    candidates.sort_by(compare_specificity);
}

/// Produce the full ordered sequence: applicable bindings by specificity,
/// then the default binding for `requested`.
///
/// The sequence is never empty.
pub fn rank<'r, P, F>(
    requested: &TypeDescriptor,
    path: &CallPath,
    bindings: &'r [Binding<P>],
    defaults: &F,
) -> Vec<Resolution<'r, P>>
where
    F: DefaultFactory<P> + ?Sized,
{
    let mut candidates = filter(requested, path, bindings);
    order_by_specificity(&mut candidates);

    let mut ranked: Vec<_> = candidates.into_iter().map(Resolution::Registered).collect();
    ranked.push(Resolution::Default(make_default(requested, defaults)));
    ranked
}

/// Resolve `requested` at `path` against `bindings`.
///
/// Returns the most specific applicable binding, or the default binding
/// when none applies. Never fails.
pub fn resolve<'r, P, F>(
    requested: &TypeDescriptor,
    path: &CallPath,
    bindings: &'r [Binding<P>],
    defaults: &F,
) -> Resolution<'r, P>
where
    F: DefaultFactory<P> + ?Sized,
{
    let candidates = filter(requested, path, bindings);
    let fallback = make_default(requested, defaults);

    let winner = candidates
        .iter()
        .copied()
        .min_by(compare_specificity)
        .map(Resolution::Registered)
        .unwrap_or(Resolution::Default(fallback));

    match &winner {
        Resolution::Registered(candidate) => debug!(
            index = candidate.index,
            candidates = candidates.len(),
            "resolved {} at {} to {}",
            requested,
            path,
            candidate.binding.predicate()
        ),
        Resolution::Default(_) => {
            debug!("resolved {} at {} to its default binding", requested, path)
        }
    }

    winner
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use crate::dependency::Dependency;
    use crate::predicate::Predicate;
    use crate::registry::Registry;
    use crate::resolve::default::DependencyDefaults;
    use pretty_assertions::assert_eq;

    fn t(name: &str) -> TypeDescriptor {
        TypeDescriptor::named(name)
    }

    fn path(names: &[&str]) -> CallPath {
        names.iter().map(|n| t(n)).collect()
    }

    fn given(resolution: &Resolution<'_, Dependency>) -> String {
        resolution.payload().given.to_string()
    }

    #[test]
    fn test_context_match_beats_unscoped() {
        let registry = Registry::builder()
            .bind(t("Engine"), t("V6"))
            .bind_in(t("Engine"), t("V8"), [t("Car")])
            .build();

        let result = resolve(
            &t("Engine"),
            &path(&["App", "Car"]),
            registry.bindings(),
            &DependencyDefaults,
        );
        assert_eq!(given(&result), "V8");
        assert_eq!(result.index(), Some(1));
    }

    #[test]
    fn test_longest_context_wins_regardless_of_order() {
        let registry = Registry::builder()
            .bind_in(t("Engine"), t("Short"), [t("Car")])
            .bind_in(t("Engine"), t("Long"), [t("App"), t("Car")])
            .bind(t("Engine"), t("Any"))
            .build();

        let result = resolve(
            &t("Engine"),
            &path(&["App", "Car"]),
            registry.bindings(),
            &DependencyDefaults,
        );
        assert_eq!(given(&result), "Long");

        let result = resolve(
            &t("Engine"),
            &path(&["Garage", "Car"]),
            registry.bindings(),
            &DependencyDefaults,
        );
        assert_eq!(given(&result), "Short");
    }

    #[test]
    fn test_equal_specificity_keeps_registration_order() {
        let registry = Registry::builder()
            .bind(t("Engine"), t("First"))
            .bind(t("Engine"), t("Second"))
            .build();

        let result = resolve(
            &t("Engine"),
            &CallPath::root(),
            registry.bindings(),
            &DependencyDefaults,
        );
        assert_eq!(given(&result), "First");
    }

    #[test]
    fn test_default_when_nothing_applies() {
        let registry = Registry::builder().bind(t("Engine"), t("V6")).build();

        let result = resolve(
            &t("Wheel"),
            &path(&["App", "Car"]),
            registry.bindings(),
            &DependencyDefaults,
        );
        assert!(result.is_default());
        assert_eq!(result.index(), None);
        assert_eq!(result.payload().to_string(), "Wheel -> Wheel");
    }

    #[test]
    fn test_rank_lists_candidates_then_default() {
        let registry = Registry::builder()
            .bind(t("Engine"), t("V6"))
            .bind_in(t("Engine"), t("V8"), [t("Car")])
            .bind(t("Engine"), t("V4"))
            .build();

        let ranked = rank(&t("Engine"), &path(&["Car"]), registry.bindings(), &DependencyDefaults);
        let order: Vec<_> = ranked.iter().map(given).collect();
        assert_eq!(order, vec!["V8", "V6", "V4", "Engine"]);
        assert!(ranked.last().is_some_and(Resolution::is_default));
    }

    #[test]
    fn test_resolve_agrees_with_rank_head() {
        let registry = Registry::builder()
            .bind_in(t("Engine"), t("A"), [t("X")])
            .bind_in(t("Engine"), t("B"), [t("X")])
            .bind(t("Engine"), t("C"))
            .build();

        for p in [path(&[]), path(&["X"]), path(&["Y", "X"]), path(&["X", "Y"])] {
            let ranked = rank(&t("Engine"), &p, registry.bindings(), &DependencyDefaults);
            let resolved = resolve(&t("Engine"), &p, registry.bindings(), &DependencyDefaults);
            assert_eq!(given(&ranked[0]), given(&resolved));
        }
    }

    #[test]
    fn test_custom_payload_and_factory() {
        let registry: Registry<&str> = [
            Binding::new(Predicate::any(), Context::new(vec![t("Car")]), "scoped"),
            Binding::unscoped(Predicate::any(), "global"),
        ]
        .into_iter()
        .collect();
        let defaults =
            |_: TypeDescriptor, _: TypeDescriptor| Binding::unscoped(Predicate::any(), "fallback");

        let scoped = resolve(&t("X"), &path(&["Car"]), registry.bindings(), &defaults);
        assert_eq!(*scoped.payload(), "scoped");
        let global = resolve(&t("X"), &path(&["Bus"]), registry.bindings(), &defaults);
        assert_eq!(*global.payload(), "global");

        let empty: Registry<&str> = Registry::empty();
        let fallback = resolve(&t("X"), &path(&[]), empty.bindings(), &defaults);
        assert_eq!(*fallback.payload(), "fallback");
    }
}
