//! Default binding synthesis.
//!
//! When no registered binding applies, a request for `T` is satisfied by
//! building `T` itself, or, for a wrapper `W<E>`, by building `E`.

use crate::binding::Binding;
use crate::dependency::Dependency;
use crate::predicate::Predicate;
use crate::types::TypeDescriptor;

/// Produces the binding used when nothing in the registry applies.
pub trait DefaultFactory<P> {
    /// Build a binding that serves `expected` by constructing `given`.
    fn rebind(&self, expected: TypeDescriptor, given: TypeDescriptor) -> Binding<P>;
}

impl<P, F> DefaultFactory<P> for F
where
    F: Fn(TypeDescriptor, TypeDescriptor) -> Binding<P>,
{
    fn rebind(&self, expected: TypeDescriptor, given: TypeDescriptor) -> Binding<P> {
        self(expected, given)
    }
}

/// Default factory for [`Dependency`] payloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct DependencyDefaults;

impl DefaultFactory<Dependency> for DependencyDefaults {
    fn rebind(&self, expected: TypeDescriptor, given: TypeDescriptor) -> Binding<Dependency> {
        Binding::unscoped(
            Predicate::exact(expected.clone()),
            Dependency::new(expected, given),
        )
    }
}

/// Synthesize the fallback binding for `requested`.
///
/// Total over every descriptor: plain types rebind to themselves, wrappers
/// rebind to their plain element type.
pub fn make_default<P, F>(requested: &TypeDescriptor, factory: &F) -> Binding<P>
where
    F: DefaultFactory<P> + ?Sized,
{
    let expected = requested.make_plain();
    let given = match requested.element() {
        Some(element) => element.make_plain(),
        None => expected.clone(),
    };
    factory.rebind(expected, given)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;

    #[test]
    fn test_plain_type_defaults_to_itself() {
        let binding = make_default(&TypeDescriptor::named("Foo").const_(), &DependencyDefaults);
        let dep = binding.payload();

        assert_eq!(dep.expected.to_string(), "Foo");
        assert_eq!(dep.given.to_string(), "Foo");
        assert!(dep.expected.is_plain());
        assert!(binding.context().is_empty());
    }

    #[test]
    fn test_wrapper_defaults_to_element() {
        let requested: TypeDescriptor = "const Ptr<const Bar>&".parse().unwrap();
        let binding = make_default(&requested, &DependencyDefaults);

        assert_eq!(binding.payload().to_string(), "Ptr<Bar> -> Bar");
    }

    #[test]
    fn test_closure_factory() {
        let factory = |expected: TypeDescriptor, given: TypeDescriptor| {
            Binding::new(Predicate::any(), Context::unscoped(), format!("{expected}=>{given}"))
        };
        let requested = TypeDescriptor::wrapper("Vec", TypeDescriptor::named("Item"));
        let binding = make_default(&requested, &factory);

        assert_eq!(binding.payload(), "Vec<Item>=>Item");
    }
}
