//! Task graph: one node per task, dependency and synergy edges between them.
//!
//! Built from a [`Corpus`](crate::ingest::Corpus) and written out as
//! Graphviz DOT for an external renderer.

mod build;
mod dot;

pub use build::{node_style, UNRESOLVED_NODE};
pub use dot::render_dot;

use serde::Serialize;

/// Colour applied to a node through its `spin_off` markers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStyle {
    Red,
    Green,
}

impl NodeStyle {
    pub fn color(self) -> &'static str {
        match self {
            NodeStyle::Red => "red",
            NodeStyle::Green => "green",
        }
    }
}

/// A task node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    /// Normalized task identifier
    pub id: String,
    /// Task title as authored
    pub label: String,
    pub style: Option<NodeStyle>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Source must be done before the target
    DependsOn,
    /// Source helps the target without blocking it
    SynergyWith,
}

/// A directed edge (source --kind--> target)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    /// Identifier of the named task; `None` when no task has that title.
    pub source: Option<String>,
    /// Name as written in the dependent task
    pub source_name: String,
    pub target: String,
    pub kind: EdgeKind,
}

/// Derived graph of a corpus
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl TaskGraph {
    /// Edges whose source name matched no task
    pub fn unresolved(&self) -> impl Iterator<Item = &GraphEdge> {
        self.edges.iter().filter(|e| e.source.is_none())
    }
}
