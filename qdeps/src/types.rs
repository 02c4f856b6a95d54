//! Run-time type descriptors.
//!
//! A [`TypeDescriptor`] names a type the way an injection point spells it:
//! a base name, optional qualifiers (`const`, `&`, `*`, ...) and, for
//! wrapper types like `Ptr<Bar>` or `Vec<Item>`, an element type.
//!
//! Equality and hashing look only at the canonical key produced by
//! [`TypeDescriptor::make_plain`], so `const Foo&` and `Foo` compare equal.
//! Qualifiers are kept for display and diagnostics.
//!
//! Descriptors parse from and render to a C-like spelling:
//!
//! ```
//! use qdeps::TypeDescriptor;
//!
//! let ty: TypeDescriptor = "const Ptr<Bar>&".parse().unwrap();
//! assert_eq!(ty.to_string(), "const Ptr<Bar>&");
//! assert_eq!(ty.make_plain().to_string(), "Ptr<Bar>");
//! assert_eq!(ty.element().map(|e| e.to_string()), Some("Bar".to_string()));
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::Arc;

use bitflags::bitflags;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

bitflags! {
    /// Decorations stripped by [`TypeDescriptor::make_plain`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Qualifiers: u8 {
        const CONST = 1 << 0;
        const VOLATILE = 1 << 1;
        const PTR = 1 << 2;
        const REF = 1 << 3;
        const RVALUE_REF = 1 << 4;
    }
}

/// Descriptor of a requested or bound type.
#[derive(Clone)]
pub struct TypeDescriptor {
    name: Arc<str>,
    element: Option<Arc<TypeDescriptor>>,
    qualifiers: Qualifiers,
}

impl TypeDescriptor {
    /// Create a plain, non-wrapper type.
    pub fn named(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            element: None,
            qualifiers: Qualifiers::empty(),
        }
    }

    /// Create a wrapper type such as `Ptr<Bar>` around `element`.
    pub fn wrapper(name: impl Into<Arc<str>>, element: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            element: Some(Arc::new(element)),
            qualifiers: Qualifiers::empty(),
        }
    }

    /// Return a copy with `qualifiers` added.
    pub fn with_qualifiers(mut self, qualifiers: Qualifiers) -> Self {
        self.qualifiers |= qualifiers;
        self
    }

    pub fn const_(self) -> Self {
        self.with_qualifiers(Qualifiers::CONST)
    }

    pub fn reference(self) -> Self {
        self.with_qualifiers(Qualifiers::REF)
    }

    pub fn rvalue_reference(self) -> Self {
        self.with_qualifiers(Qualifiers::RVALUE_REF)
    }

    /// The base name, without qualifiers or element type.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The wrapped element type, if this is a wrapper.
    pub fn element(&self) -> Option<&TypeDescriptor> {
        self.element.as_deref()
    }

    pub fn is_wrapper(&self) -> bool {
        self.element.is_some()
    }

    pub fn qualifiers(&self) -> Qualifiers {
        self.qualifiers
    }

    pub fn is_plain(&self) -> bool {
        self.qualifiers.is_empty() && self.element.as_deref().map_or(true, Self::is_plain)
    }

    /// Strip every qualifier, recursively through the element type.
    ///
    /// The result is the canonical comparison key for this descriptor.
    pub fn make_plain(&self) -> TypeDescriptor {
        if self.is_plain() {
            return self.clone();
        }
        Self {
            name: Arc::clone(&self.name),
            element: self.element.as_deref().map(|e| Arc::new(e.make_plain())),
            qualifiers: Qualifiers::empty(),
        }
    }

    /// Render the canonical key, e.g. `Ptr<Bar>` for `const Ptr<const Bar>&`.
    pub fn canonical_name(&self) -> String {
        self.make_plain().to_string()
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.element == other.element
    }
}

impl Eq for TypeDescriptor {}

impl Hash for TypeDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.element.hash(state);
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.qualifiers.contains(Qualifiers::CONST) {
            write!(f, "const ")?;
        }
        if self.qualifiers.contains(Qualifiers::VOLATILE) {
            write!(f, "volatile ")?;
        }
        write!(f, "{}", self.name)?;
        if let Some(element) = &self.element {
            write!(f, "<{}>", element)?;
        }
        if self.qualifiers.contains(Qualifiers::PTR) {
            write!(f, "*")?;
        }
        if self.qualifiers.contains(Qualifiers::RVALUE_REF) {
            write!(f, "&&")?;
        } else if self.qualifiers.contains(Qualifiers::REF) {
            write!(f, "&")?;
        }
        Ok(())
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}`", self)
    }
}

/// Errors from parsing a type spelling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseTypeError {
    #[error("empty type spelling")]
    Empty,

    #[error("expected a type name at offset {offset} in `{input}`")]
    ExpectedName { input: String, offset: usize },

    #[error("unclosed `<` in `{input}`")]
    UnclosedElement { input: String },

    #[error("unexpected `{rest}` after type in `{input}`")]
    TrailingInput { input: String, rest: String },
}

impl FromStr for TypeDescriptor {
    type Err = ParseTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(ParseTypeError::Empty);
        }
        let mut parser = SpellingParser { input: s, pos: 0 };
        let ty = parser.parse_type()?;
        parser.skip_ws();
        if parser.pos < s.len() {
            return Err(ParseTypeError::TrailingInput {
                input: s.to_string(),
                rest: s[parser.pos..].to_string(),
            });
        }
        Ok(ty)
    }
}

/// Recursive-descent reader for `[const|volatile]* Name[<T>] [*] [&|&&]`.
struct SpellingParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> SpellingParser<'a> {
    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn skip_ws(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.input.len() - trimmed.len();
    }

    fn eat(&mut self, token: &str) -> bool {
        self.skip_ws();
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    /// Consume `word` only when it is not the prefix of a longer identifier.
    fn eat_keyword(&mut self, word: &str) -> bool {
        self.skip_ws();
        let Some(after) = self.rest().strip_prefix(word) else {
            return false;
        };
        if after.chars().next().map_or(true, |c| !is_ident_char(c)) {
            self.pos += word.len();
            true
        } else {
            false
        }
    }

    fn ident(&mut self) -> Result<&'a str, ParseTypeError> {
        self.skip_ws();
        let rest = self.rest();
        let len = rest
            .char_indices()
            .take_while(|&(i, c)| if i == 0 { is_ident_start(c) } else { is_ident_char(c) })
            .map(|(i, c)| i + c.len_utf8())
            .last()
            .unwrap_or(0);
        if len == 0 {
            return Err(ParseTypeError::ExpectedName {
                input: self.input.to_string(),
                offset: self.pos,
            });
        }
        self.pos += len;
        Ok(&rest[..len])
    }

    fn parse_type(&mut self) -> Result<TypeDescriptor, ParseTypeError> {
        let mut qualifiers = Qualifiers::empty();
        loop {
            if self.eat_keyword("const") {
                qualifiers |= Qualifiers::CONST;
            } else if self.eat_keyword("volatile") {
                qualifiers |= Qualifiers::VOLATILE;
            } else {
                break;
            }
        }

        let name = self.ident()?;
        let mut ty = if self.eat("<") {
            let element = self.parse_type()?;
            if !self.eat(">") {
                return Err(ParseTypeError::UnclosedElement {
                    input: self.input.to_string(),
                });
            }
            TypeDescriptor::wrapper(name, element)
        } else {
            TypeDescriptor::named(name)
        };

        // East-const: `Foo const&`
        if self.eat_keyword("const") {
            qualifiers |= Qualifiers::CONST;
        }
        if self.eat("*") {
            qualifiers |= Qualifiers::PTR;
        }
        if self.eat("&&") {
            qualifiers |= Qualifiers::RVALUE_REF;
        } else if self.eat("&") {
            qualifiers |= Qualifiers::REF;
        }

        ty.qualifiers = qualifiers;
        Ok(ty)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == ':'
}

impl Serialize for TypeDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TypeDescriptor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let spelling = String::deserialize(deserializer)?;
        spelling.parse().map_err(de::Error::custom)
    }
}
