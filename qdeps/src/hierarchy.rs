//! Declared subtype relationships between bound types.
//!
//! Interface bindings ("requests for `Engine` are satisfied by `V8`") need
//! to know which concrete types implement which interfaces. The hierarchy
//! records direct supertypes per type and answers transitive queries.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::types::TypeDescriptor;

/// Immutable map from a type to its declared direct supertypes.
#[derive(Debug, Clone, Default)]
pub struct TypeHierarchy {
    supertypes: FxHashMap<TypeDescriptor, Vec<TypeDescriptor>>,
}

impl TypeHierarchy {
    pub fn builder() -> TypeHierarchyBuilder {
        TypeHierarchyBuilder::default()
    }

    /// Direct supertypes declared for `ty`.
    pub fn direct_supertypes(&self, ty: &TypeDescriptor) -> &[TypeDescriptor] {
        self.supertypes
            .get(&ty.make_plain())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Check whether `sub` equals `sup` or reaches it through declared supertypes.
    ///
    /// Cyclic declarations are tolerated: each type is visited at most once.
    pub fn is_subtype(&self, sub: &TypeDescriptor, sup: &TypeDescriptor) -> bool {
        if sub == sup {
            return true;
        }

        let mut visited = FxHashSet::default();
        let mut stack = vec![sub.make_plain()];
        while let Some(current) = stack.pop() {
            for parent in self.direct_supertypes(&current) {
                if parent == sup {
                    return true;
                }
                if visited.insert(parent.clone()) {
                    stack.push(parent.clone());
                }
            }
        }
        false
    }

    pub fn len(&self) -> usize {
        self.supertypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.supertypes.is_empty()
    }
}

/// Accumulates supertype declarations before freezing them.
#[derive(Debug, Default)]
pub struct TypeHierarchyBuilder {
    supertypes: FxHashMap<TypeDescriptor, Vec<TypeDescriptor>>,
}

impl TypeHierarchyBuilder {
    /// Declare that `ty` directly implements each of `supertypes`.
    pub fn declare<I>(mut self, ty: TypeDescriptor, supertypes: I) -> Self
    where
        I: IntoIterator<Item = TypeDescriptor>,
    {
        let entry = self.supertypes.entry(ty.make_plain()).or_default();
        for sup in supertypes {
            let sup = sup.make_plain();
            if !entry.contains(&sup) {
                entry.push(sup);
            }
        }
        self
    }

    pub fn build(self) -> TypeHierarchy {
        TypeHierarchy {
            supertypes: self.supertypes,
        }
    }
}
