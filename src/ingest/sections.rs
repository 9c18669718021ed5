//! Section dispatch: label paragraph + content block → typed attribute.

use super::rst::Node;
use crate::error::{Result, TechtreeError};
use serde::Serialize;
use std::fmt;

/// Marker every bullet-point line starts with
pub const BULLET_MARKER: char = '*';

/// Attribute sections a task description may contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    DependsOn,
    SynergyWith,
    Responsible,
    Ap,
    Description,
    SpinOff,
    Duration,
}

/// How the content block of a section is read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape {
    BulletList,
    FreeText,
}

impl Attribute {
    /// The complete section vocabulary
    pub const ALL: [Attribute; 7] = [
        Attribute::DependsOn,
        Attribute::SynergyWith,
        Attribute::Responsible,
        Attribute::Ap,
        Attribute::Description,
        Attribute::SpinOff,
        Attribute::Duration,
    ];

    /// Normalized label as written in documents
    pub fn key(self) -> &'static str {
        match self {
            Attribute::DependsOn => "depends_on",
            Attribute::SynergyWith => "synergy_with",
            Attribute::Responsible => "responsible",
            Attribute::Ap => "ap",
            Attribute::Description => "description",
            Attribute::SpinOff => "spin_off",
            Attribute::Duration => "duration",
        }
    }

    pub fn shape(self) -> ValueShape {
        match self {
            Attribute::DependsOn | Attribute::SynergyWith | Attribute::Responsible => {
                ValueShape::BulletList
            }
            Attribute::Ap | Attribute::Description | Attribute::SpinOff | Attribute::Duration => {
                ValueShape::FreeText
            }
        }
    }

    /// Look up an already normalized label
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.key() == key)
    }

    /// Parse a content block with the handler this section uses
    pub fn parse_content(self, text: &str) -> Result<AttributeValue> {
        match self.shape() {
            ValueShape::BulletList => parse_bullet_points(text).map(AttributeValue::BulletList),
            ValueShape::FreeText => Ok(AttributeValue::FreeText(text.to_string())),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Parsed content of one attribute section
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    BulletList(Vec<String>),
    FreeText(String),
}

impl AttributeValue {
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            AttributeValue::BulletList(items) => Some(items.as_slice()),
            AttributeValue::FreeText(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::FreeText(text) => Some(text.as_str()),
            AttributeValue::BulletList(_) => None,
        }
    }
}

/// Lowercase, underscore-joined label with trailing colons removed
pub fn normalize_label(label: &str) -> String {
    label
        .trim()
        .trim_end_matches(':')
        .trim_end()
        .to_lowercase()
        .replace(' ', "_")
}

/// One entry per `*` line, marker and surrounding whitespace stripped
pub fn parse_bullet_points(text: &str) -> Result<Vec<String>> {
    text.split('\n')
        .map(|line| match line.strip_prefix(BULLET_MARKER) {
            Some(value) => Ok(value.trim().to_string()),
            None => Err(TechtreeError::MalformedList(line.to_string())),
        })
        .collect()
}

/// Resolve a label/content node pair into its attribute
pub fn parse_pair(label: &Node, content: &Node) -> Result<(Attribute, AttributeValue)> {
    let label = match label {
        Node::Paragraph(text) => text,
        other => {
            return Err(TechtreeError::MalformedMarkup {
                line: None,
                message: format!("Section label must be a paragraph, found {:?}", other),
            })
        }
    };
    let text = match content {
        Node::LiteralBlock(text) | Node::Paragraph(text) => text,
        other => {
            return Err(TechtreeError::MalformedMarkup {
                line: None,
                message: format!("Content of {:?} must be a literal block, found {:?}", label, other),
            })
        }
    };

    let key = normalize_label(label);
    let attribute = Attribute::from_key(&key).ok_or(TechtreeError::UnknownSection(key))?;
    let value = attribute.parse_content(text)?;
    Ok((attribute, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(text: &str) -> Node {
        Node::Paragraph(text.to_string())
    }

    fn block(text: &str) -> Node {
        Node::LiteralBlock(text.to_string())
    }

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label("Depends On:"), "depends_on");
        assert_eq!(normalize_label("synergy_with"), "synergy_with");
        assert_eq!(normalize_label("  Spin off : "), "spin_off");
    }

    #[test]
    fn test_vocabulary_round_trips_keys() {
        for attribute in Attribute::ALL {
            assert_eq!(Attribute::from_key(attribute.key()), Some(attribute));
        }
        assert_eq!(Attribute::from_key("colour"), None);
    }

    #[test]
    fn test_bullet_points_strip_marker_and_whitespace() {
        let items = parse_bullet_points("* Sandbox\n*Emulator  \n*   Cloud lookup").unwrap();
        assert_eq!(items, vec!["Sandbox", "Emulator", "Cloud lookup"]);
    }

    #[test]
    fn test_bullet_points_reject_unmarked_line() {
        let err = parse_bullet_points("* Sandbox\nEmulator").unwrap_err();
        match err {
            TechtreeError::MalformedList(line) => assert_eq!(line, "Emulator"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_line_in_bullet_block_is_malformed() {
        assert!(matches!(
            parse_bullet_points("* A\n\n* B"),
            Err(TechtreeError::MalformedList(_))
        ));
    }

    #[test]
    fn test_parse_pair_dispatches_by_shape() {
        let (attribute, value) = parse_pair(&label("depends_on:"), &block("* A\n* B")).unwrap();
        assert_eq!(attribute, Attribute::DependsOn);
        assert_eq!(value, AttributeValue::BulletList(vec!["A".into(), "B".into()]));

        let (attribute, value) = parse_pair(&label("Duration:"), &block("* not a list")).unwrap();
        assert_eq!(attribute, Attribute::Duration);
        assert_eq!(value, AttributeValue::FreeText("* not a list".into()));
    }

    #[test]
    fn test_parse_pair_accepts_paragraph_content() {
        let (attribute, value) =
            parse_pair(&label("description:"), &Node::Paragraph("Scan files".into())).unwrap();
        assert_eq!(attribute, Attribute::Description);
        assert_eq!(value.as_text(), Some("Scan files"));
    }

    #[test]
    fn test_parse_pair_unknown_section() {
        let err = parse_pair(&label("Budget:"), &block("100")).unwrap_err();
        match err {
            TechtreeError::UnknownSection(key) => assert_eq!(key, "budget"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_pair_rejects_non_paragraph_label() {
        let err = parse_pair(&Node::Title("Task".into()), &block("x")).unwrap_err();
        assert!(matches!(err, TechtreeError::MalformedMarkup { .. }));

        let err = parse_pair(&label("ap:"), &Node::Section(vec![])).unwrap_err();
        assert!(matches!(err, TechtreeError::MalformedMarkup { .. }));
    }
}
