// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tracker rich-text documents.
//!
//! Remote descriptions are `{"type":"doc","version":1,"content":[...]}` node
//! trees. Only paragraphs, text, and hard breaks carry meaning here; every
//! other node is kept on read but contributes no text.

use serde::{Deserialize, Serialize};

const DOC: &str = "doc";
const PARAGRAPH: &str = "paragraph";
const TEXT: &str = "text";
const HARD_BREAK: &str = "hardBreak";

/// Root of a rich-text document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "type")]
    pub doc_type: String,
    pub version: u32,
    #[serde(default)]
    pub content: Vec<Node>,
}

/// A node in the document tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<Node>,
}

impl Node {
    fn text(text: &str) -> Self {
        Node {
            node_type: TEXT.to_string(),
            text: Some(text.to_string()),
            content: Vec::new(),
        }
    }

    fn hard_break() -> Self {
        Node {
            node_type: HARD_BREAK.to_string(),
            text: None,
            content: Vec::new(),
        }
    }

    fn paragraph(text: &str) -> Self {
        let mut content = Vec::new();
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                content.push(Node::hard_break());
            }
            // Empty text nodes are rejected by the tracker
            if !line.is_empty() {
                content.push(Node::text(line));
            }
        }
        Node {
            node_type: PARAGRAPH.to_string(),
            text: None,
            content,
        }
    }

    fn inline_text(&self, out: &mut String) {
        match self.node_type.as_str() {
            TEXT => out.push_str(self.text.as_deref().unwrap_or_default()),
            HARD_BREAK => out.push('\n'),
            _ => {
                for child in &self.content {
                    child.inline_text(out);
                }
            }
        }
    }

    fn collect_paragraphs(&self, out: &mut Vec<String>) {
        if self.node_type == PARAGRAPH {
            let mut text = String::new();
            for child in &self.content {
                child.inline_text(&mut text);
            }
            out.push(text);
        } else {
            for child in &self.content {
                child.collect_paragraphs(out);
            }
        }
    }
}

impl Document {
    /// Build a document from plain text. Blank lines separate paragraphs.
    pub fn from_plain_text(text: &str) -> Self {
        let normalized = text.replace("\r\n", "\n");
        let content = normalized
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(Node::paragraph)
            .collect();

        Document {
            doc_type: DOC.to_string(),
            version: 1,
            content,
        }
    }

    /// Plain text of the document: paragraph texts joined by blank lines, trimmed.
    pub fn plain_text(&self) -> String {
        let mut paragraphs = Vec::new();
        for node in &self.content {
            node.collect_paragraphs(&mut paragraphs);
        }
        paragraphs.join("\n\n").trim().to_string()
    }
}

/// Plain text of an optional remote description.
pub fn plain_text(document: Option<&Document>) -> String {
    document.map(Document::plain_text).unwrap_or_default()
}

/// Plain text as it reads back after a trip through a document.
///
/// Line endings, blank-line runs, and paragraph padding collapse the same way
/// `Document::from_plain_text` collapses them.
pub fn normalize(text: &str) -> String {
    Document::from_plain_text(text).plain_text()
}

#[cfg(test)]
#[path = "rich_text_tests.rs"]
mod tests;
