//! Dependency plan walking.
//!
//! Starting from a root type, resolve it, then resolve each constructor
//! dependency of the chosen type with the call path extended by that
//! type. The result is the tree of bindings an injector would follow.
//!
//! The walker plays the construction side of resolution, so cycle
//! detection and the depth bound live here.

use qdeps::{CallPath, Dependency, Resolution, Resolver, TypeDescriptor};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, trace};

use crate::config::Config;
use crate::manifest::Wiring;

/// Errors that stop a plan walk.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("dependency cycle: `{ty}` is already under construction at {path}")]
    Cycle { ty: TypeDescriptor, path: CallPath },

    #[error("plan exceeds maximum depth {limit} at {path}")]
    DepthExceeded { limit: usize, path: CallPath },

    #[error("`{ty}` is not declared in the manifest (reached at {path})")]
    Undeclared { ty: TypeDescriptor, path: CallPath },
}

/// One resolved injection point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanNode {
    /// The type the parent asked for.
    pub requested: TypeDescriptor,
    /// The type that will be built.
    pub given: TypeDescriptor,
    /// Registry index of the winning binding; `None` for a default.
    pub binding: Option<usize>,
    /// Predicate label of the winning binding.
    pub rule: String,
    /// Context of the winning binding, empty when unscoped.
    pub context: Vec<TypeDescriptor>,
    /// Call path the request was resolved at.
    pub path: CallPath,
    pub children: Vec<PlanNode>,
}

impl PlanNode {
    pub fn is_default(&self) -> bool {
        self.binding.is_none()
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(PlanNode::size).sum::<usize>()
    }

    /// Depth-first iterator over this subtree.
    pub fn walk(&self) -> impl Iterator<Item = &PlanNode> + '_ {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }
}

/// Walks a [`Wiring`] from a root type.
pub struct Planner<'w> {
    wiring: &'w Wiring,
    resolver: Resolver<Dependency>,
    config: &'w Config,
}

impl<'w> Planner<'w> {
    pub fn new(wiring: &'w Wiring, config: &'w Config) -> Self {
        Self {
            wiring,
            resolver: wiring.resolver(),
            config,
        }
    }

    /// Build the full plan for `root`.
    pub fn plan(&self, root: &TypeDescriptor) -> Result<PlanNode, PlanError> {
        let node = self.visit(root, &CallPath::root())?;
        debug!(root = %root, nodes = node.size(), "plan complete");
        Ok(node)
    }

    fn visit(&self, requested: &TypeDescriptor, path: &CallPath) -> Result<PlanNode, PlanError> {
        if path.len() > self.config.max_depth {
            return Err(PlanError::DepthExceeded {
                limit: self.config.max_depth,
                path: path.clone(),
            });
        }

        let resolution = self.resolver.resolve(requested, path);
        let mut node = node_for(requested, path, &resolution);
        trace!(requested = %requested, given = %node.given, path = %path, "injection point");

        if path.contains(&node.given) {
            return Err(PlanError::Cycle {
                ty: node.given,
                path: path.clone(),
            });
        }
        if self.config.require_declared && !self.wiring.is_declared(&node.given) {
            return Err(PlanError::Undeclared {
                ty: node.given,
                path: path.clone(),
            });
        }

        let inner = path.descend(node.given.clone());
        for dependency in self.wiring.dependencies_of(&node.given) {
            node.children.push(self.visit(dependency, &inner)?);
        }
        Ok(node)
    }
}

fn node_for(
    requested: &TypeDescriptor,
    path: &CallPath,
    resolution: &Resolution<'_, Dependency>,
) -> PlanNode {
    let binding = resolution.binding();
    PlanNode {
        requested: requested.clone(),
        given: binding.payload().given.clone(),
        binding: resolution.index(),
        rule: binding.predicate().label().to_string(),
        context: binding.context().types().to_vec(),
        path: path.clone(),
        children: Vec::new(),
    }
}

/// Convenience wrapper around [`Planner::plan`].
pub fn plan(
    wiring: &Wiring,
    root: &TypeDescriptor,
    config: &Config,
) -> Result<PlanNode, PlanError> {
    Planner::new(wiring, config).plan(root)
}
