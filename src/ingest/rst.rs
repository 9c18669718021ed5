//! Minimal reStructuredText reader.
//!
//! Understands the subset task descriptions are written in: section titles
//! (underline with optional overline), paragraphs, `::` literal blocks and
//! comments. Every title opens a flat section regardless of its adornment
//! style. No semantic checks happen here.

use crate::error::{Result, TechtreeError};

/// A structural element of a parsed document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Section title text, always the first child of a section
    Title(String),
    /// Free paragraph text, lines joined with `\n`
    Paragraph(String),
    /// Dedented body of a `::` literal block
    LiteralBlock(String),
    /// A titled section and everything up to the next title
    Section(Vec<Node>),
}

impl Node {
    /// Text of a leaf node; `None` for sections.
    pub fn text(&self) -> Option<&str> {
        match self {
            Node::Title(t) | Node::Paragraph(t) | Node::LiteralBlock(t) => Some(t.as_str()),
            Node::Section(_) => None,
        }
    }
}

/// Node tree for one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Leading blocks followed by sections
    pub children: Vec<Node>,
}

impl Document {
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

const TAB_WIDTH: usize = 8;

/// Parse document source text into its node tree
pub fn parse_document(source: &str) -> Result<Document> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let lines: Vec<String> = source.lines().map(expand_tabs).collect();

    let mut builder = TreeBuilder::default();
    // 1-based line of a paragraph ending in `::` still waiting for its block
    let mut pending_literal: Option<usize> = None;
    let mut i = 0;

    while i < lines.len() {
        let line = &lines[i];
        if is_blank(line) {
            i += 1;
            continue;
        }

        if indent_of(line) > 0 {
            if pending_literal.take().is_none() {
                return Err(malformed(i + 1, "Unexpected indentation"));
            }
            let mut end = i;
            while end < lines.len() && (is_blank(&lines[end]) || indent_of(&lines[end]) > 0) {
                end += 1;
            }
            builder.push(Node::LiteralBlock(dedent(&lines[i..end])));
            i = end;
            continue;
        }

        if let Some(line_no) = pending_literal {
            return Err(malformed(line_no, "Literal block expected; none found"));
        }

        if is_comment(line) {
            i += 1;
            while i < lines.len() && (is_blank(&lines[i]) || indent_of(&lines[i]) > 0) {
                i += 1;
            }
            continue;
        }

        if adornment(line).is_some() {
            let title = lines.get(i + 1).filter(|l| !is_blank(l));
            match title {
                None => {
                    // A lone adornment line is a transition.
                    i += 1;
                }
                Some(title) => {
                    let title = title.trim();
                    let under = lines.get(i + 2).map(String::as_str).unwrap_or("");
                    if under.trim_end() != line.trim_end() {
                        return Err(malformed(i + 1, "Title overline & underline mismatch"));
                    }
                    if line.trim_end().chars().count() < title.chars().count() {
                        return Err(malformed(i + 1, "Title overline too short"));
                    }
                    builder.open_section(title);
                    i += 3;
                }
            }
            continue;
        }

        if let Some(next) = lines.get(i + 1) {
            if adornment(next).is_some() {
                let title = line.trim_end();
                if next.trim_end().chars().count() < title.chars().count() {
                    return Err(malformed(i + 2, "Title underline too short"));
                }
                builder.open_section(title);
                i += 2;
                continue;
            }
        }

        let mut end = i;
        while end < lines.len() && !is_blank(&lines[end]) && indent_of(&lines[end]) == 0 {
            end += 1;
        }
        let text = lines[i..end]
            .iter()
            .map(|l| l.trim_end())
            .collect::<Vec<_>>()
            .join("\n");

        match text.strip_suffix("::") {
            Some(head) => {
                pending_literal = Some(end);
                if head.is_empty() {
                    // bare `::` only announces the block
                } else if head.ends_with(char::is_whitespace) {
                    builder.push(Node::Paragraph(head.trim_end().to_string()));
                } else {
                    builder.push(Node::Paragraph(format!("{}:", head)));
                }
            }
            None => builder.push(Node::Paragraph(text)),
        }
        i = end;
    }

    if let Some(line_no) = pending_literal {
        return Err(malformed(line_no, "Literal block expected; none found"));
    }

    Ok(builder.finish())
}

/// Collects top-level blocks and flat sections
#[derive(Default)]
struct TreeBuilder {
    children: Vec<Node>,
    section: Option<Vec<Node>>,
}

impl TreeBuilder {
    fn push(&mut self, node: Node) {
        match self.section {
            Some(ref mut section) => section.push(node),
            None => self.children.push(node),
        }
    }

    fn open_section(&mut self, title: &str) {
        if let Some(section) = self.section.take() {
            self.children.push(Node::Section(section));
        }
        self.section = Some(vec![Node::Title(title.to_string())]);
    }

    fn finish(mut self) -> Document {
        if let Some(section) = self.section.take() {
            self.children.push(Node::Section(section));
        }
        Document {
            children: self.children,
        }
    }
}

fn malformed(line: usize, message: &str) -> TechtreeError {
    TechtreeError::MalformedMarkup {
        line: Some(line),
        message: message.to_string(),
    }
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

fn is_comment(line: &str) -> bool {
    match line.strip_prefix("..") {
        Some(rest) => rest.is_empty() || rest.starts_with(' '),
        None => false,
    }
}

/// The repeated punctuation character if `line` is a section adornment
fn adornment(line: &str) -> Option<char> {
    let line = line.trim_end();
    let mut chars = line.chars();
    let first = chars.next()?;
    if !first.is_ascii_punctuation() || !chars.all(|c| c == first) {
        return None;
    }
    // `::` on its own line is a literal block marker, not an underline
    if line == "::" {
        return None;
    }
    Some(first)
}

fn expand_tabs(line: &str) -> String {
    if !line.contains('\t') {
        return line.to_string();
    }
    let mut out = String::with_capacity(line.len() + TAB_WIDTH);
    let mut column = 0;
    for c in line.chars() {
        if c == '\t' {
            let spaces = TAB_WIDTH - column % TAB_WIDTH;
            out.extend(std::iter::repeat(' ').take(spaces));
            column += spaces;
        } else {
            out.push(c);
            column += 1;
        }
    }
    out
}

fn dedent(block: &[String]) -> String {
    let mut block = block;
    while let Some((last, rest)) = block.split_last() {
        if !is_blank(last) {
            break;
        }
        block = rest;
    }
    let margin = block
        .iter()
        .filter(|l| !is_blank(l))
        .map(|l| indent_of(l))
        .min()
        .unwrap_or(0);
    block
        .iter()
        .map(|l| if is_blank(l) { "" } else { l[margin..].trim_end() })
        .collect::<Vec<_>>()
        .join("\n")
}
