//! Turns a parsed document into task records.
//!
//! Label/content pairs before the first section are document-wide defaults.
//! Every section then yields one record starting from a copy of those
//! defaults, with its own pairs merged on top:
//!
//! - bullet lists are unioned, existing entries first;
//! - a free-text attribute may only be set once, so re-setting one that a
//!   default or an earlier pair already provides is an error.

use super::rst::{Document, Node};
use super::sections::{parse_pair, Attribute, AttributeValue};
use crate::error::{Result, TechtreeError};
use serde::Serialize;
use std::collections::btree_map::{BTreeMap, Entry};

pub type Attributes = BTreeMap<Attribute, AttributeValue>;

/// One named task and its merged attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskRecord {
    /// Task title exactly as authored
    pub taskname: String,
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl TaskRecord {
    pub fn new(taskname: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            taskname: taskname.into(),
            attributes,
        }
    }

    /// Corpus key and graph node identifier
    pub fn id(&self) -> String {
        norm_taskname(&self.taskname)
    }

    pub fn get(&self, attribute: Attribute) -> Option<&AttributeValue> {
        self.attributes.get(&attribute)
    }

    /// Entries of a bullet-list attribute; empty when unset.
    pub fn list(&self, attribute: Attribute) -> &[String] {
        self.get(attribute)
            .and_then(AttributeValue::as_list)
            .unwrap_or(&[])
    }

    pub fn text(&self, attribute: Attribute) -> Option<&str> {
        self.get(attribute).and_then(AttributeValue::as_text)
    }

    /// Merge one parsed section into the record
    pub fn merge(&mut self, attribute: Attribute, value: AttributeValue) -> Result<()> {
        merge_value(&mut self.attributes, attribute, value, &self.taskname)
    }
}

/// Lowercase, spaces and hyphens replaced with underscores
pub fn norm_taskname(name: &str) -> String {
    name.to_lowercase().replace(&[' ', '-'][..], "_")
}

fn merge_value(
    attributes: &mut Attributes,
    attribute: Attribute,
    value: AttributeValue,
    owner: &str,
) -> Result<()> {
    match attributes.entry(attribute) {
        Entry::Vacant(slot) => {
            slot.insert(value);
            Ok(())
        }
        Entry::Occupied(mut slot) => match (slot.get_mut(), value) {
            (AttributeValue::BulletList(existing), AttributeValue::BulletList(new)) => {
                for item in new {
                    if !existing.contains(&item) {
                        existing.push(item);
                    }
                }
                Ok(())
            }
            _ => Err(TechtreeError::ConflictingOverride {
                task: owner.to_string(),
                attribute: attribute.key().to_string(),
            }),
        },
    }
}

/// Pairs up `nodes` as label/content and parses each pair
fn parse_pairs(nodes: &[Node]) -> Result<Vec<(Attribute, AttributeValue)>> {
    let pairs = nodes.chunks_exact(2);
    if let [label] = pairs.remainder() {
        return Err(TechtreeError::MalformedMarkup {
            line: None,
            message: format!(
                "Section label {:?} has no content",
                label.text().unwrap_or_default()
            ),
        });
    }
    pairs
        .map(|pair| parse_pair(&pair[0], &pair[1]))
        .collect()
}

/// Read the document-wide defaults and return the per-section records.
///
/// Errors in the defaults surface here; errors inside a section surface
/// when the iterator reaches it.
pub fn normalize(doc: &Document) -> Result<TaskRecords<'_>> {
    let start = doc
        .children
        .iter()
        .position(|node| matches!(node, Node::Section(_)))
        .unwrap_or(doc.children.len());
    let (leading, rest) = doc.children.split_at(start);

    let mut globals = Attributes::new();
    for (attribute, value) in parse_pairs(leading)? {
        merge_value(&mut globals, attribute, value, "global defaults")?;
    }

    Ok(TaskRecords {
        globals,
        nodes: rest.iter(),
    })
}

/// Single-pass iterator over the task records of one document
pub struct TaskRecords<'a> {
    globals: Attributes,
    nodes: std::slice::Iter<'a, Node>,
}

impl TaskRecords<'_> {
    fn build(&self, children: &[Node]) -> Result<TaskRecord> {
        let (taskname, body) = match children.split_first() {
            Some((Node::Title(title), body)) => (title, body),
            _ => return Err(TechtreeError::MissingTitle),
        };

        let mut record = TaskRecord::new(taskname.clone(), self.globals.clone());
        for (attribute, value) in parse_pairs(body)? {
            record.merge(attribute, value)?;
        }
        log::debug!("{:?}", record);
        Ok(record)
    }
}

impl Iterator for TaskRecords<'_> {
    type Item = Result<TaskRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.nodes.next()?;
        Some(match node {
            Node::Section(children) => self.build(children),
            other => Err(TechtreeError::MalformedMarkup {
                line: None,
                message: format!("Content outside of any section: {:?}", other),
            }),
        })
    }
}
