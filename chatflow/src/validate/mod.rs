//! Chatflow validation: structural rules, cycle detection, per-kind rules.
//!
//! Validation never mutates its input and never fails; every defect becomes a
//! `Diagnostic`. Only errors affect `ValidationResult::valid`.

pub mod cycle;
pub mod node_rules;
pub mod result;
pub mod structural;

pub use node_rules::RuleContext;
pub use result::{Diagnostic, Severity, ValidationResult};

use crate::model::{Chatflow, ChatflowEdge, ChatflowGraph, ChatflowNode};

/// Validate a node/edge set and return every finding in rule order:
/// structural findings first, then per-kind findings in node order.
#[tracing::instrument(level = "debug", skip_all, fields(nodes = nodes.len(), edges = edges.len()))]
pub fn validate_diagnostics(nodes: &[ChatflowNode], edges: &[ChatflowEdge]) -> Vec<Diagnostic> {
    if nodes.is_empty() {
        return vec![Diagnostic::error(
            "S001",
            "Flow must have at least one node",
            None,
        )];
    }

    let graph = ChatflowGraph::build(nodes, edges);
    let mut diagnostics = structural::validate_structural(nodes, &graph);

    let ctx = RuleContext::from_nodes(nodes);
    for node in nodes {
        diagnostics.extend(node_rules::validate_node_config(node, &ctx));
    }

    tracing::debug!(
        errors = diagnostics.iter().filter(|d| d.is_error()).count(),
        warnings = diagnostics.iter().filter(|d| !d.is_error()).count(),
        "chatflow validated"
    );

    diagnostics
}

/// Validate a node/edge set into the editor-facing verdict.
pub fn validate(nodes: &[ChatflowNode], edges: &[ChatflowEdge]) -> ValidationResult {
    ValidationResult::from_diagnostics(&validate_diagnostics(nodes, edges))
}

pub fn validate_chatflow(flow: &Chatflow) -> ValidationResult {
    validate(&flow.nodes, &flow.edges)
}

/// Run only the per-kind rules for one node, against a set of known node ids.
pub fn validate_node<'a>(
    node: &ChatflowNode,
    known_ids: impl IntoIterator<Item = &'a str>,
) -> Vec<Diagnostic> {
    node_rules::validate_node_config(node, &RuleContext::from_ids(known_ids))
}
