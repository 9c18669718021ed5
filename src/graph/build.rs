//! Corpus → graph.

use super::{EdgeKind, GraphEdge, GraphNode, NodeStyle, TaskGraph};
use crate::ingest::{Attribute, Corpus, TaskRecord};
use std::collections::HashMap;

/// Node name written for an edge whose source matched no task
pub const UNRESOLVED_NODE: &str = "None";

const MARK_RED: &str = "mark_red";
const MARK_GREEN: &str = "mark_green";

/// Style from the record's `spin_off` text; red wins over green.
pub fn node_style(record: &TaskRecord) -> Option<NodeStyle> {
    let spin_off = record.text(Attribute::SpinOff)?.to_lowercase();
    if spin_off.contains(MARK_RED) {
        Some(NodeStyle::Red)
    } else if spin_off.contains(MARK_GREEN) {
        Some(NodeStyle::Green)
    } else {
        None
    }
}

impl TaskGraph {
    /// Build nodes and edges for every record, in identifier order.
    ///
    /// Edge sources are looked up by exact task title. All dependency
    /// edges come before all synergy edges.
    pub fn from_corpus(corpus: &Corpus) -> Self {
        let by_name: HashMap<&str, &str> = corpus
            .iter()
            .map(|(id, record)| (record.taskname.as_str(), id))
            .collect();

        let nodes = corpus
            .iter()
            .map(|(id, record)| GraphNode {
                id: id.to_string(),
                label: record.taskname.clone(),
                style: node_style(record),
            })
            .collect();

        let mut edges = Vec::new();
        for (attribute, kind) in [
            (Attribute::DependsOn, EdgeKind::DependsOn),
            (Attribute::SynergyWith, EdgeKind::SynergyWith),
        ] {
            for (id, record) in corpus.iter() {
                for name in record.list(attribute) {
                    let source = by_name.get(name.as_str()).map(|s| s.to_string());
                    if source.is_none() {
                        log::warn!(
                            "{:?} lists unknown task {:?} in {}",
                            record.taskname,
                            name,
                            attribute
                        );
                    }
                    edges.push(GraphEdge {
                        source,
                        source_name: name.clone(),
                        target: id.to_string(),
                        kind,
                    });
                }
            }
        }

        TaskGraph { nodes, edges }
    }
}
