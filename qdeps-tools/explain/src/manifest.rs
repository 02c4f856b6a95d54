//! Binding Manifests
//!
//! A manifest declares the types of an application (with the interfaces
//! they implement and the constructor dependencies they take) and the
//! bindings between them:
//!
//! ```toml
//! [[types]]
//! name = "V8"
//! implements = ["Engine"]
//! depends = ["Piston"]
//!
//! [[bindings]]
//! expected = "Engine"
//! given = "V8"
//! context = ["Car"]
//! ```
//!
//! Loading a manifest produces a [`Wiring`]: a frozen registry, the type
//! hierarchy and the constructor table used by the plan walker.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use qdeps::{
    Binding, Context, Dependency, Predicate, Registry, Resolver, TypeDescriptor, TypeHierarchy,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors from loading a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid manifest: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("type `{name}` is declared more than once")]
    DuplicateType { name: String },

    #[error("binding #{index} for `{given}` uses exact matching but has no `expected` type")]
    MissingExpected { index: usize, given: String },
}

/// How a binding decides whether it applies to a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    /// The request must be exactly `expected`.
    #[default]
    Exact,
    /// The request may be `given` or any type `given` implements.
    Assignable,
}

/// A declared type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeDecl {
    pub name: TypeDescriptor,

    /// Interfaces this type implements, directly.
    #[serde(default)]
    pub implements: Vec<TypeDescriptor>,

    /// Constructor dependencies, in parameter order.
    #[serde(default)]
    pub depends: Vec<TypeDescriptor>,
}

/// A declared binding.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BindingDecl {
    #[serde(default)]
    pub expected: Option<TypeDescriptor>,

    pub given: TypeDescriptor,

    #[serde(default, rename = "match")]
    pub matching: MatchKind,

    /// Call path suffix the binding is scoped to.
    #[serde(default)]
    pub context: Vec<TypeDescriptor>,
}

/// The manifest document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub types: Vec<TypeDecl>,

    #[serde(default)]
    pub bindings: Vec<BindingDecl>,
}

impl Manifest {
    pub fn from_toml(content: &str) -> Result<Self, ManifestError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Freeze the manifest into a registry, hierarchy and constructor table.
    pub fn wire(&self) -> Result<Wiring, ManifestError> {
        let mut constructors: IndexMap<TypeDescriptor, Vec<TypeDescriptor>> = IndexMap::new();
        let mut hierarchy = TypeHierarchy::builder();

        for decl in &self.types {
            let name = decl.name.make_plain();
            if constructors.contains_key(&name) {
                return Err(ManifestError::DuplicateType {
                    name: name.to_string(),
                });
            }
            hierarchy = hierarchy.declare(name.clone(), decl.implements.iter().cloned());
            constructors.insert(name, decl.depends.clone());
        }
        let hierarchy = Arc::new(hierarchy.build());

        let mut registry = Registry::builder();
        for (index, decl) in self.bindings.iter().enumerate() {
            registry.push(self.binding(index, decl, &hierarchy)?);
        }
        let registry = registry.build();

        let wiring = Wiring {
            registry: Arc::new(registry),
            hierarchy,
            constructors,
        };
        wiring.warn_unknown_context_types();
        debug!(
            types = wiring.constructors.len(),
            bindings = wiring.registry.len(),
            "manifest wired"
        );
        Ok(wiring)
    }

    fn binding(
        &self,
        index: usize,
        decl: &BindingDecl,
        hierarchy: &Arc<TypeHierarchy>,
    ) -> Result<Binding<Dependency>, ManifestError> {
        let context: Context = decl.context.iter().map(TypeDescriptor::make_plain).collect();
        let given = decl.given.make_plain();

        let binding = match decl.matching {
            MatchKind::Exact => {
                let expected = decl
                    .expected
                    .as_ref()
                    .ok_or_else(|| ManifestError::MissingExpected {
                        index,
                        given: given.to_string(),
                    })?
                    .make_plain();
                Binding::new(
                    Predicate::exact(expected.clone()),
                    context,
                    Dependency::new(expected, given),
                )
            }
            MatchKind::Assignable => {
                let expected = decl
                    .expected
                    .as_ref()
                    .map_or_else(|| given.clone(), TypeDescriptor::make_plain);
                Binding::new(
                    Predicate::assignable_to(given.clone(), Arc::clone(hierarchy)),
                    context,
                    Dependency::new(expected, given),
                )
            }
        };
        Ok(binding)
    }
}

/// A loaded manifest, ready for resolution.
#[derive(Debug, Clone)]
pub struct Wiring {
    registry: Arc<Registry<Dependency>>,
    hierarchy: Arc<TypeHierarchy>,
    constructors: IndexMap<TypeDescriptor, Vec<TypeDescriptor>>,
}

impl Wiring {
    pub fn registry(&self) -> &Registry<Dependency> {
        &self.registry
    }

    pub fn hierarchy(&self) -> &TypeHierarchy {
        &self.hierarchy
    }

    pub fn resolver(&self) -> Resolver<Dependency> {
        Resolver::with_defaults(Arc::clone(&self.registry))
    }

    pub fn is_declared(&self, ty: &TypeDescriptor) -> bool {
        self.constructors.contains_key(&ty.make_plain())
    }

    /// Constructor dependencies of `ty`; empty for undeclared types.
    pub fn dependencies_of(&self, ty: &TypeDescriptor) -> &[TypeDescriptor] {
        self.constructors
            .get(&ty.make_plain())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every type the manifest mentions, in first-seen order.
    pub fn known_types(&self) -> IndexSet<TypeDescriptor> {
        let mut known = IndexSet::new();
        for (ty, deps) in &self.constructors {
            known.insert(ty.clone());
            known.extend(deps.iter().map(TypeDescriptor::make_plain));
        }
        for binding in self.registry.iter() {
            known.insert(binding.payload().expected.clone());
            known.insert(binding.payload().given.clone());
        }
        known
    }

    /// A context naming a type that nothing constructs can never match.
    fn warn_unknown_context_types(&self) {
        let known = self.known_types();
        for (index, binding) in self.registry.iter().enumerate() {
            for ty in binding.context().types() {
                if !known.contains(ty) {
                    warn!(
                        index,
                        "binding context mentions `{}`, which the manifest never declares",
                        ty
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qdeps::CallPath;

    const GARAGE: &str = r#"
        [[types]]
        name = "Car"
        depends = ["Engine", "Wheel"]

        [[types]]
        name = "V8"
        implements = ["Engine"]

        [[types]]
        name = "V6"
        implements = ["Engine"]

        [[bindings]]
        expected = "Engine"
        given = "V8"
        context = ["Car"]

        [[bindings]]
        given = "V6"
        match = "assignable"
    "#;

    fn t(name: &str) -> TypeDescriptor {
        name.parse().unwrap()
    }

    #[test]
    fn test_wire_builds_registry_and_constructors() {
        let wiring = Manifest::from_toml(GARAGE).unwrap().wire().unwrap();

        assert_eq!(wiring.registry().len(), 2);
        assert_eq!(wiring.dependencies_of(&t("Car")), &[t("Engine"), t("Wheel")]);
        assert!(wiring.dependencies_of(&t("Wheel")).is_empty());
        assert!(wiring.is_declared(&t("const V8&")));
        assert!(wiring.hierarchy().is_subtype(&t("V6"), &t("Engine")));
    }

    #[test]
    fn test_assignable_binding_serves_interface() {
        let wiring = Manifest::from_toml(GARAGE).unwrap().wire().unwrap();
        let resolver = wiring.resolver();

        let in_car = CallPath::new(vec![t("Car")]);
        assert_eq!(resolver.resolve(&t("Engine"), &in_car).payload().given, t("V8"));

        let in_boat = CallPath::new(vec![t("Boat")]);
        let resolved = resolver.resolve(&t("Engine"), &in_boat);
        assert_eq!(resolved.payload().given, t("V6"));
        assert_eq!(resolved.payload().expected, t("V6"));
    }

    #[test]
    fn test_exact_binding_requires_expected() {
        let err = Manifest::from_toml("[[bindings]]\ngiven = \"V8\"\n")
            .unwrap()
            .wire()
            .unwrap_err();
        assert!(matches!(err, ManifestError::MissingExpected { index: 0, .. }));
    }

    #[test]
    fn test_duplicate_type_is_rejected() {
        let err = Manifest::from_toml("[[types]]\nname = \"A\"\n[[types]]\nname = \"const A\"\n")
            .unwrap()
            .wire()
            .unwrap_err();
        assert!(matches!(err, ManifestError::DuplicateType { .. }));
    }

    #[test]
    fn test_bad_spelling_is_a_parse_error() {
        let err = Manifest::from_toml("[[types]]\nname = \"Ptr<Bar\"\n").unwrap_err();
        assert!(matches!(err, ManifestError::Parse(_)));
        assert!(err.to_string().contains("unclosed"));
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        assert!(Manifest::from_toml("[[types]]\nname = \"A\"\nscope = \"singleton\"\n").is_err());
    }
}
