//! Call paths and binding contexts.
//!
//! A [`CallPath`] is the chain of types under construction, outermost
//! first. A [`Context`] scopes a binding to call paths that *end with* a
//! given sequence of types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::TypeDescriptor;

/// The chain of types currently being constructed.
///
/// A call path is an immutable snapshot: descending into a dependency
/// produces a new, strictly longer path via [`CallPath::descend`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallPath {
    frames: Vec<TypeDescriptor>,
}

impl CallPath {
    /// The empty path, used for a root request.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn new(frames: Vec<TypeDescriptor>) -> Self {
        Self { frames }
    }

    /// Return the path extended by `ty`.
    pub fn descend(&self, ty: TypeDescriptor) -> Self {
        let mut frames = Vec::with_capacity(self.frames.len() + 1);
        frames.extend(self.frames.iter().cloned());
        frames.push(ty);
        Self { frames }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[TypeDescriptor] {
        &self.frames
    }

    /// The most recently entered type.
    pub fn innermost(&self) -> Option<&TypeDescriptor> {
        self.frames.last()
    }

    pub fn contains(&self, ty: &TypeDescriptor) -> bool {
        self.frames.contains(ty)
    }

    /// Check whether the last `context.len()` frames equal `context`.
    ///
    /// An empty context matches every path. A context longer than the
    /// path never matches.
    pub fn ends_with(&self, context: &Context) -> bool {
        self.frames.ends_with(&context.types)
    }
}

impl FromIterator<TypeDescriptor> for CallPath {
    fn from_iter<I: IntoIterator<Item = TypeDescriptor>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl fmt::Display for CallPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.frames.is_empty() {
            return write!(f, "<root>");
        }
        for (i, frame) in self.frames.iter().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{}", frame)?;
        }
        Ok(())
    }
}

/// Suffix constraint over a [`CallPath`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context {
    types: Vec<TypeDescriptor>,
}

impl Context {
    /// The empty context: the binding applies anywhere.
    pub fn unscoped() -> Self {
        Self::default()
    }

    pub fn new(types: Vec<TypeDescriptor>) -> Self {
        Self { types }
    }

    /// Number of enclosing types this context pins down. Larger is more specific.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn types(&self) -> &[TypeDescriptor] {
        &self.types
    }

    pub fn matches(&self, path: &CallPath) -> bool {
        path.ends_with(self)
    }
}

impl FromIterator<TypeDescriptor> for Context {
    fn from_iter<I: IntoIterator<Item = TypeDescriptor>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, ty) in self.types.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", ty)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(names: &[&str]) -> CallPath {
        names.iter().map(|n| TypeDescriptor::named(*n)).collect()
    }

    fn context(names: &[&str]) -> Context {
        names.iter().map(|n| TypeDescriptor::named(*n)).collect()
    }

    #[test]
    fn test_empty_context_matches_everything() {
        assert!(Context::unscoped().matches(&CallPath::root()));
        assert!(Context::unscoped().matches(&path(&["App", "Car"])));
    }

    #[test]
    fn test_suffix_match() {
        let ctx = context(&["X", "Y"]);

        assert!(ctx.matches(&path(&["App", "X", "Y"])));
        assert!(ctx.matches(&path(&["X", "Y"])));
        assert!(!ctx.matches(&path(&["App", "Y", "X"])));
        assert!(!ctx.matches(&path(&["App", "X"])));
        assert!(!ctx.matches(&path(&["X", "Y", "App"])));
    }

    #[test]
    fn test_context_longer_than_path_is_no_match() {
        let ctx = context(&["A", "B", "C"]);
        assert!(!ctx.matches(&path(&["C"])));
        assert!(!ctx.matches(&CallPath::root()));
    }

    #[test]
    fn test_suffix_match_ignores_qualifiers() {
        let ctx = Context::new(vec![TypeDescriptor::named("Car")]);
        let p = CallPath::new(vec![TypeDescriptor::named("Car").const_().reference()]);
        assert!(ctx.matches(&p));
    }

    #[test]
    fn test_descend_grows_by_one() {
        let root = CallPath::root();
        let app = root.descend(TypeDescriptor::named("App"));
        let car = app.descend(TypeDescriptor::named("Car"));

        assert_eq!(root.len(), 0);
        assert_eq!(app.len(), 1);
        assert_eq!(car.len(), 2);
        assert_eq!(car.innermost(), Some(&TypeDescriptor::named("Car")));
        assert_eq!(car.to_string(), "App -> Car");
        assert_eq!(root.to_string(), "<root>");
    }
}
