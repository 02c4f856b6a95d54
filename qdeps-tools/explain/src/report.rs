//! Report rendering for resolutions and plans.

use qdeps::{CallPath, Dependency, Resolution, Resolver, TypeDescriptor};
use serde::Serialize;

use crate::config::{Config, OutputFormat};
use crate::plan::PlanNode;

/// One entry of a ranked resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntry {
    /// Registry index; `None` for the synthesized default.
    pub index: Option<usize>,
    pub expected: TypeDescriptor,
    pub given: TypeDescriptor,
    pub rule: String,
    pub context: Vec<TypeDescriptor>,
}

impl RankedEntry {
    fn from_resolution(resolution: &Resolution<'_, Dependency>) -> Self {
        let binding = resolution.binding();
        Self {
            index: resolution.index(),
            expected: binding.payload().expected.clone(),
            given: binding.payload().given.clone(),
            rule: binding.predicate().label().to_string(),
            context: binding.context().types().to_vec(),
        }
    }
}

/// Explanation of a single resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolveReport {
    pub requested: TypeDescriptor,
    pub path: CallPath,
    pub winner: RankedEntry,
    /// Full ranking, winner first and default last. Empty unless requested.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ranking: Vec<RankedEntry>,
}

impl ResolveReport {
    pub fn build(
        resolver: &Resolver<Dependency>,
        requested: &TypeDescriptor,
        path: &CallPath,
        config: &Config,
    ) -> Self {
        let winner = RankedEntry::from_resolution(&resolver.resolve(requested, path));
        let ranking = if config.show_candidates {
            resolver
                .rank(requested, path)
                .iter()
                .map(RankedEntry::from_resolution)
                .collect()
        } else {
            Vec::new()
        };

        Self {
            requested: requested.clone(),
            path: path.clone(),
            winner,
            ranking,
        }
    }
}

fn describe(entry: &RankedEntry) -> String {
    let line = format!("{} -> {}", entry.expected, entry.given);
    let Some(index) = entry.index else {
        return line + "  [default]";
    };
    if entry.context.is_empty() {
        format!("{}  [#{} {}]", line, index, entry.rule)
    } else {
        let context: Vec<_> = entry.context.iter().map(ToString::to_string).collect();
        format!("{}  [#{} {} in [{}]]", line, index, entry.rule, context.join(", "))
    }
}

/// Render a resolution report as text.
pub fn render_resolve_text(report: &ResolveReport) -> String {
    let mut out = format!("{} at {}\n", report.requested, report.path);
    out.push_str(&format!("  => {}\n", describe(&report.winner)));
    if !report.ranking.is_empty() {
        out.push_str("ranking:\n");
        for (position, entry) in report.ranking.iter().enumerate() {
            out.push_str(&format!("  {}. {}\n", position + 1, describe(entry)));
        }
    }
    out
}

/// Render a plan as an indented tree.
pub fn render_plan_text(root: &PlanNode) -> String {
    let mut out = describe_node(root);
    out.push('\n');
    render_children(&root.children, "", &mut out);
    out
}

fn describe_node(node: &PlanNode) -> String {
    let head = if node.requested == node.given {
        node.requested.to_string()
    } else {
        format!("{} => {}", node.requested, node.given)
    };
    match node.binding {
        Some(index) => format!("{}  [#{} {}]", head, index, node.rule),
        None => head + "  [default]",
    }
}

fn render_children(children: &[PlanNode], prefix: &str, out: &mut String) {
    for (i, child) in children.iter().enumerate() {
        let last = i + 1 == children.len();
        let (branch, indent) = if last { ("└── ", "    ") } else { ("├── ", "│   ") };
        out.push_str(&format!("{}{}{}\n", prefix, branch, describe_node(child)));
        render_children(&child.children, &format!("{}{}", prefix, indent), out);
    }
}

/// Render any serializable report in the configured format.
pub fn render<T: Serialize>(
    value: &T,
    text: impl FnOnce(&T) -> String,
    config: &Config,
) -> serde_json::Result<String> {
    match config.format {
        OutputFormat::Text => Ok(text(value)),
        OutputFormat::Json => serde_json::to_string_pretty(value),
    }
}
