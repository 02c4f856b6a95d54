//! qdeps Explainer
//!
//! Loads a binding manifest and explains what qdeps resolves for it:
//!
//! - a single request at a given call path, optionally with the full
//!   ranking of applicable bindings,
//! - the whole dependency plan below a root type, following constructor
//!   dependencies and extending the call path at each level.
//!
//! ```text
//! ┌──────────┐    ┌──────────┐    ┌──────────┐    ┌──────────┐
//! │ manifest │───►│  Wiring  │───►│ Planner  │───►│  report  │
//! │  (TOML)  │    │ registry │    │  qdeps   │    │ text/json│
//! └──────────┘    └──────────┘    └──────────┘    └──────────┘
//! ```

pub mod config;
pub mod manifest;
pub mod plan;
pub mod report;

pub use config::{Config, ConfigError, OutputFormat};
pub use manifest::{BindingDecl, Manifest, ManifestError, MatchKind, TypeDecl, Wiring};
pub use plan::{plan, PlanError, PlanNode, Planner};
pub use report::{render, render_plan_text, render_resolve_text, RankedEntry, ResolveReport};
