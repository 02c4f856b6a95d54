//! Binding records.

use std::fmt;

use crate::context::{CallPath, Context};
use crate::predicate::Predicate;
use crate::types::TypeDescriptor;

/// A registered rule: when `predicate` accepts the requested type and
/// `context` matches the call path, construct `payload`.
#[derive(Clone)]
pub struct Binding<P> {
    predicate: Predicate,
    context: Context,
    payload: P,
}

impl<P> Binding<P> {
    pub fn new(predicate: Predicate, context: Context, payload: P) -> Self {
        Self {
            predicate,
            context,
            payload,
        }
    }

    /// A binding that applies regardless of the call path.
    pub fn unscoped(predicate: Predicate, payload: P) -> Self {
        Self::new(predicate, Context::unscoped(), payload)
    }

    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    /// Number of context entries; higher wins during selection.
    pub fn specificity(&self) -> usize {
        self.context.len()
    }

    /// Whether this binding applies to a request at `path`.
    ///
    /// `plain` must already be stripped with [`TypeDescriptor::make_plain`];
    /// the caller strips once per request rather than once per binding.
    pub fn applies(&self, plain: &TypeDescriptor, path: &CallPath) -> bool {
        self.predicate.test(plain) && self.context.matches(path)
    }
}

impl<P: fmt::Debug> fmt::Debug for Binding<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("predicate", &self.predicate)
            .field("context", &self.context)
            .field("payload", &self.payload)
            .finish()
    }
}

impl<P: fmt::Display> fmt::Display for Binding<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.payload, self.predicate)?;
        if !self.context.is_empty() {
            write!(f, " in {}", self.context)?;
        }
        Ok(())
    }
}
