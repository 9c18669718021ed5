//! Graphviz DOT output.

use super::{build::UNRESOLVED_NODE, EdgeKind, TaskGraph};
use crate::ingest::Corpus;

/// Words DOT reserves, matched case-insensitively
const KEYWORDS: [&str; 6] = ["node", "edge", "graph", "digraph", "subgraph", "strict"];

/// Build the graph of `corpus` and write it as DOT
pub fn render_dot(corpus: &Corpus) -> String {
    TaskGraph::from_corpus(corpus).to_dot()
}

impl TaskGraph {
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph techtree {\n");

        for node in &self.nodes {
            out.push_str(&format!("{} [label = {}", dot_id(&node.id), quote(&node.label)));
            if let Some(style) = node.style {
                out.push_str(&format!(" color={}", quote(style.color())));
            }
            out.push_str("]\n");
        }

        for edge in &self.edges {
            let source = edge.source.as_deref().unwrap_or(UNRESOLVED_NODE);
            out.push_str(&format!("{} -> {}", dot_id(source), dot_id(&edge.target)));
            if edge.kind == EdgeKind::SynergyWith {
                out.push_str(" [style=dotted]");
            }
            out.push_str(";\n");
        }

        out.push_str("}\n");
        out
    }
}

/// Double-quoted DOT string
fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        match c {
            '"' | '\\' => {
                quoted.push('\\');
                quoted.push(c);
            }
            '\n' => quoted.push_str("\\n"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

/// Identifier as-is when DOT accepts it bare, quoted otherwise
fn dot_id(id: &str) -> String {
    let bare = id
        .chars()
        .next()
        .map_or(false, |c| c.is_alphabetic() || c == '_')
        && id.chars().all(|c| c.is_alphanumeric() || c == '_')
        && !KEYWORDS.contains(&id.to_ascii_lowercase().as_str());
    if bare {
        id.to_string()
    } else {
        quote(id)
    }
}
