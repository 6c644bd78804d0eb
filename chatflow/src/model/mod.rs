//! Model layer: editor JSON → Rust types + graph index.

pub mod graph;
pub mod types;

pub use graph::ChatflowGraph;
pub use types::*;

use crate::error::ChatflowError;
use types::{RawChatflow, RawNode};

/// Input size caps applied before a chatflow is accepted for validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub max_nodes: usize,
    pub max_edges: usize,
}

impl ParseOptions {
    pub const DEFAULT_MAX_NODES: usize = 5_000;
    pub const DEFAULT_MAX_EDGES: usize = 20_000;
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            max_nodes: Self::DEFAULT_MAX_NODES,
            max_edges: Self::DEFAULT_MAX_EDGES,
        }
    }
}

/// Deserialize a chatflow JSON string using the default size caps.
pub fn parse(json: &str) -> Result<Chatflow, ChatflowError> {
    parse_with_options(json, &ParseOptions::default())
}

pub fn parse_with_options(json: &str, options: &ParseOptions) -> Result<Chatflow, ChatflowError> {
    let raw: RawChatflow = serde_json::from_str(json)?;
    check_limits(raw.nodes.len(), raw.edges.len(), options)?;
    Chatflow::try_from(raw)
}

/// Deserialize a single node JSON, as sent by the editor's property panel.
pub fn parse_node(json: &str) -> Result<ChatflowNode, ChatflowError> {
    let raw: RawNode = serde_json::from_str(json)?;
    ChatflowNode::try_from(raw)
}

fn check_limits(nodes: usize, edges: usize, options: &ParseOptions) -> Result<(), ChatflowError> {
    if nodes > options.max_nodes {
        tracing::warn!(count = nodes, limit = options.max_nodes, "chatflow rejected: too many nodes");
        return Err(ChatflowError::TooLarge {
            what: "nodes",
            count: nodes,
            limit: options.max_nodes,
        });
    }
    if edges > options.max_edges {
        tracing::warn!(count = edges, limit = options.max_edges, "chatflow rejected: too many edges");
        return Err(ChatflowError::TooLarge {
            what: "edges",
            count: edges,
            limit: options.max_edges,
        });
    }
    Ok(())
}
