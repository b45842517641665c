//! Directed-graph text for a workflow's nodes and connections.
//!
//! The output is a literal transcription of the connection map: one
//! declaration per node, then one edge per target entry. Sources and
//! targets are emitted as `node{key}` using the raw connection keys, so
//! edges that reference unknown nodes, duplicates and cycles all pass
//! through untouched.

use std::fmt::Write;

use super::types::{ConnectionMap, WorkflowNode};

/// Text shown in the detail view when there is nothing to draw.
pub const EMPTY_DIAGRAM: &str = "graph TD\n    empty[\"No nodes\"]";

/// Render a `graph TD` description of the workflow.
pub fn render(nodes: &[WorkflowNode], connections: &ConnectionMap) -> String {
    let mut out = String::from("graph TD\n");

    for (i, node) in nodes.iter().enumerate() {
        let _ = writeln!(out, "    node{}[\"{}\"]", i, escape_label(&node_label(node, i)));
    }

    for edge in connections.edges() {
        let _ = writeln!(out, "    node{} --> node{}", edge.source, edge.target);
    }

    out.truncate(out.trim_end().len());
    out
}

/// Render for display, falling back to a placeholder for empty workflows.
pub fn render_or_placeholder(nodes: &[WorkflowNode], connections: &ConnectionMap) -> String {
    if nodes.is_empty() {
        return EMPTY_DIAGRAM.to_string();
    }
    render(nodes, connections)
}

/// Display label: node name, then node type, then a positional label.
fn node_label(node: &WorkflowNode, index: usize) -> String {
    node.name
        .as_deref()
        .filter(|n| !n.trim().is_empty())
        .or_else(|| node.node_type.as_deref().filter(|t| !t.trim().is_empty()))
        .map(String::from)
        .unwrap_or_else(|| format!("Node {}", index + 1))
}

fn escape_label(label: &str) -> String {
    label.replace('"', "'").replace('\n', " ")
}
