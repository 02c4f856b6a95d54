//! qdeps: context-aware binding resolution for dependency injection.
//!
//! Every injection point in a dependency graph asks the same question:
//! *which binding builds this type, here?* qdeps answers it
//! deterministically from three inputs:
//!
//! - the requested [`TypeDescriptor`],
//! - the [`CallPath`] of types currently under construction,
//! - an immutable [`Registry`] of [`Binding`]s.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────┐    ┌──────────────┐    ┌──────────────┐
//! │ request + │───►│    filter    │───►│    select    │───► Resolution
//! │ call path │    │ predicate ∧  │    │ specificity, │
//! └───────────┘    │ ctx suffix   │    │ then default │
//!                  └──────────────┘    └──────────────┘
//! ```
//!
//! A binding with a longer [`Context`] is more specific and wins; equal
//! specificity falls back to registration order; when nothing applies a
//! default binding is synthesized, so resolution never fails.
//!
//! # Example
//!
//! ```
//! use qdeps::{CallPath, Registry, Resolver, TypeDescriptor};
//!
//! let t = TypeDescriptor::named;
//! let registry = Registry::builder()
//!     .bind_in(t("Engine"), t("V8"), [t("Car")])
//!     .bind(t("Engine"), t("V6"))
//!     .build();
//! let resolver = Resolver::with_defaults(registry);
//!
//! let in_car = CallPath::new(vec![t("App"), t("Car")]);
//! assert_eq!(resolver.resolve(&t("Engine"), &in_car).payload().given, t("V8"));
//!
//! let in_truck = CallPath::new(vec![t("App"), t("Truck")]);
//! assert_eq!(resolver.resolve(&t("Engine"), &in_truck).payload().given, t("V6"));
//!
//! let wheel = resolver.resolve(&t("Wheel"), &in_car);
//! assert!(wheel.is_default());
//! ```

pub mod binding;
pub mod context;
pub mod dependency;
pub mod hierarchy;
pub mod predicate;
pub mod registry;
pub mod resolve;
pub mod types;

pub use binding::Binding;
pub use context::{CallPath, Context};
pub use dependency::Dependency;
pub use hierarchy::{TypeHierarchy, TypeHierarchyBuilder};
pub use predicate::Predicate;
pub use registry::{Registry, RegistryBuilder};
pub use resolve::{
    filter, make_default, rank, resolve, Candidate, DefaultFactory, DependencyDefaults,
    Resolution, Resolver,
};
pub use types::{ParseTypeError, Qualifiers, TypeDescriptor};
