//! Active-path cycle detection from the entry node.

use std::collections::HashSet;

use petgraph::graph::NodeIndex;

use crate::model::ChatflowGraph;

/// Depth-first walk from `entry_id`, stopping at the first edge that points
/// back into the current path. Returns the id of the node that edge leaves.
///
/// Nodes reached twice through different paths are not cycles. Unknown entry
/// ids and dangling edge targets are dead ends.
pub fn find_cycle(graph: &ChatflowGraph, entry_id: &str) -> Option<String> {
    let start = graph.index_of(entry_id)?;

    let mut visited: HashSet<NodeIndex> = HashSet::new();
    let mut on_stack: HashSet<NodeIndex> = HashSet::new();
    let mut frames: Vec<(NodeIndex, std::vec::IntoIter<NodeIndex>)> = Vec::new();

    visited.insert(start);
    on_stack.insert(start);
    frames.push((start, graph.successors(start).into_iter()));

    while let Some(frame) = frames.last_mut() {
        let node = frame.0;
        match frame.1.next() {
            Some(target) if on_stack.contains(&target) => {
                let from = graph.graph[node].clone();
                let to = &graph.graph[target];
                tracing::debug!(from = %from, to = %to, "cycle closed");
                return Some(from);
            }
            Some(target) => {
                if visited.insert(target) {
                    on_stack.insert(target);
                    frames.push((target, graph.successors(target).into_iter()));
                }
            }
            None => {
                on_stack.remove(&node);
                frames.pop();
            }
        }
    }

    None
}

pub fn has_cycle(graph: &ChatflowGraph, entry_id: &str) -> bool {
    find_cycle(graph, entry_id).is_some()
}
