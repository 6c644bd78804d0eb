//! petgraph-based index over a chatflow's nodes and edges.

use std::collections::{HashMap, HashSet};

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};

use super::types::{ChatflowEdge, ChatflowNode};

/// Read-only view of a chatflow used by the graph rules.
///
/// Building never fails. Edges whose endpoints are not both known nodes are
/// left out of `graph`, so traversal treats them as dead ends, but they still
/// count toward the raw edge counts and the connected-id set.
pub struct ChatflowGraph {
    pub graph: DiGraph<String, ()>,
    pub node_indices: HashMap<String, NodeIndex>,
    outgoing: HashMap<String, usize>,
    incoming: HashMap<String, usize>,
    connected: HashSet<String>,
}

impl ChatflowGraph {
    pub fn build(nodes: &[ChatflowNode], edges: &[ChatflowEdge]) -> Self {
        let mut graph = DiGraph::new();
        let mut node_indices = HashMap::new();

        for node in nodes {
            let idx = graph.add_node(node.id.clone());
            node_indices.insert(node.id.clone(), idx);
        }

        let mut outgoing = HashMap::new();
        let mut incoming = HashMap::new();
        let mut connected = HashSet::new();

        for edge in edges {
            *outgoing.entry(edge.source.clone()).or_insert(0) += 1;
            *incoming.entry(edge.target.clone()).or_insert(0) += 1;
            connected.insert(edge.source.clone());
            connected.insert(edge.target.clone());

            if let (Some(&s), Some(&t)) = (node_indices.get(&edge.source), node_indices.get(&edge.target)) {
                graph.add_edge(s, t, ());
            }
        }

        ChatflowGraph {
            graph,
            node_indices,
            outgoing,
            incoming,
            connected,
        }
    }

    pub fn index_of(&self, node_id: &str) -> Option<NodeIndex> {
        self.node_indices.get(node_id).copied()
    }

    /// Targets of `idx` in the order their edges were given.
    pub fn successors(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        // petgraph walks adjacency lists newest-first.
        let mut targets: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .collect();
        targets.reverse();
        targets
    }

    pub fn outgoing_count(&self, node_id: &str) -> usize {
        self.outgoing.get(node_id).copied().unwrap_or(0)
    }

    pub fn incoming_count(&self, node_id: &str) -> usize {
        self.incoming.get(node_id).copied().unwrap_or(0)
    }

    /// Whether any edge, dangling or not, touches `node_id`.
    pub fn is_connected(&self, node_id: &str) -> bool {
        self.connected.contains(node_id)
    }
}
