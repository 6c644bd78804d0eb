//! Graph-level structural rules (S002–S011).
//!
//! Rule order is observable: messages come out in the order the rules run.

use crate::model::{ChatflowGraph, ChatflowNode, KindTag};
use crate::validate::cycle;
use crate::validate::result::Diagnostic;

/// Run all structural rules over a non-empty node set.
pub fn validate_structural(nodes: &[ChatflowNode], graph: &ChatflowGraph) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    s002_trigger_cardinality(nodes, &mut diagnostics);
    s004_has_end(nodes, &mut diagnostics);
    s005_no_orphans(nodes, graph, &mut diagnostics);
    s006_trigger_has_output(nodes, graph, &mut diagnostics);
    s007_end_has_input(nodes, graph, &mut diagnostics);
    s008_condition_fan_out(nodes, graph, &mut diagnostics);
    s011_no_cycles(nodes, graph, &mut diagnostics);

    diagnostics
}

fn s002_trigger_cardinality(nodes: &[ChatflowNode], diagnostics: &mut Vec<Diagnostic>) {
    let trigger_count = nodes.iter().filter(|n| n.is_trigger()).count();
    if trigger_count == 0 {
        diagnostics.push(Diagnostic::error("S002", "Flow must have a trigger node", None));
    } else if trigger_count > 1 {
        diagnostics.push(Diagnostic::error(
            "S003",
            format!("Flow can only have one trigger node, found {}", trigger_count),
            None,
        ));
    }
}

fn s004_has_end(nodes: &[ChatflowNode], diagnostics: &mut Vec<Diagnostic>) {
    if !nodes.iter().any(|n| n.is_end()) {
        diagnostics.push(Diagnostic::error(
            "S004",
            "Flow must have at least one end node",
            None,
        ));
    }
}

fn s005_no_orphans(nodes: &[ChatflowNode], graph: &ChatflowGraph, diagnostics: &mut Vec<Diagnostic>) {
    if nodes.len() <= 1 {
        return;
    }

    let orphans: Vec<&str> = nodes
        .iter()
        .filter(|n| !n.is_trigger() && !graph.is_connected(&n.id))
        .map(|n| n.display_name())
        .collect();

    if !orphans.is_empty() {
        diagnostics.push(Diagnostic::error(
            "S005",
            format!(
                "Found {} disconnected node(s): {}",
                orphans.len(),
                orphans.join(", ")
            ),
            None,
        ));
    }
}

fn s006_trigger_has_output(
    nodes: &[ChatflowNode],
    graph: &ChatflowGraph,
    diagnostics: &mut Vec<Diagnostic>,
) {
    if nodes.len() <= 1 {
        return;
    }
    let Some(trigger) = nodes.iter().find(|n| n.is_trigger()) else {
        return;
    };

    if graph.outgoing_count(&trigger.id) == 0 {
        diagnostics.push(Diagnostic::error(
            "S006",
            format!(
                "Trigger node \"{}\" must be connected to at least one action",
                trigger.display_name()
            ),
            Some(trigger.id.as_str()),
        ));
    }
}

fn s007_end_has_input(nodes: &[ChatflowNode], graph: &ChatflowGraph, diagnostics: &mut Vec<Diagnostic>) {
    if nodes.len() <= 1 {
        return;
    }

    for node in nodes.iter().filter(|n| n.is_end()) {
        if graph.incoming_count(&node.id) == 0 {
            diagnostics.push(Diagnostic::error(
                "S007",
                format!("End node \"{}\" has no incoming connection", node.display_name()),
                Some(node.id.as_str()),
            ));
        }
    }
}

fn s008_condition_fan_out(
    nodes: &[ChatflowNode],
    graph: &ChatflowGraph,
    diagnostics: &mut Vec<Diagnostic>,
) {
    for node in nodes.iter().filter(|n| n.tag() == KindTag::Condition) {
        let name = node.display_name();
        match graph.outgoing_count(&node.id) {
            0 => diagnostics.push(Diagnostic::error(
                "S008",
                format!("Condition node \"{}\" has no outputs", name),
                Some(node.id.as_str()),
            )),
            1 => diagnostics.push(Diagnostic::warning(
                "S009",
                format!(
                    "Condition node \"{}\" should have 2 outputs (true/false), found 1",
                    name
                ),
                Some(node.id.as_str()),
            )),
            2 => {}
            n => diagnostics.push(Diagnostic::error(
                "S010",
                format!("Condition node \"{}\" has too many outputs ({}), max 2", name, n),
                Some(node.id.as_str()),
            )),
        }
    }
}

fn s011_no_cycles(nodes: &[ChatflowNode], graph: &ChatflowGraph, diagnostics: &mut Vec<Diagnostic>) {
    let Some(trigger) = nodes.iter().find(|n| n.is_trigger()) else {
        return;
    };

    if let Some(node_id) = cycle::find_cycle(graph, &trigger.id) {
        diagnostics.push(Diagnostic::error(
            "S011",
            "Flow contains circular dependency (infinite loop)",
            Some(node_id.as_str()),
        ));
    }
}
