//! Document tree nodes and the append-only builder.

use serde::{Deserialize, Serialize};

use super::TableNode;

/// Inline content within a paragraph or heading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Inline {
    /// A plain text run
    Text(String),

    /// A hyperlink
    Link {
        /// Link text
        text: String,
        /// Link URL
        url: String,
    },
}

impl Inline {
    /// The text content of this inline, link or plain.
    pub fn text(&self) -> &str {
        match self {
            Inline::Text(t) => t,
            Inline::Link { text, .. } => text,
        }
    }
}

/// A node in the recovered document tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    /// A heading with its depth (1 = most prominent)
    Heading {
        /// Heading level, 1-6
        level: u8,
        /// Heading content
        content: Vec<Inline>,
    },

    /// A paragraph of body text
    Paragraph {
        /// Paragraph content
        content: Vec<Inline>,
    },

    /// A table
    Table(TableNode),

    /// An explicit line break
    LineBreak,
}

impl Node {
    /// Create a heading node from plain text.
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Node::Heading {
            level: level.clamp(1, 6),
            content: vec![Inline::Text(text.into())],
        }
    }

    /// Create a paragraph node from plain text.
    pub fn paragraph(text: impl Into<String>) -> Self {
        Node::Paragraph {
            content: vec![Inline::Text(text.into())],
        }
    }

    /// Plain text content of the node, links flattened.
    pub fn plain_text(&self) -> String {
        match self {
            Node::Heading { content, .. } | Node::Paragraph { content } => {
                content.iter().map(|i| i.text()).collect()
            }
            Node::Table(table) => table.plain_text(),
            Node::LineBreak => "\n".to_string(),
        }
    }

    /// Check if this node is a heading.
    pub fn is_heading(&self) -> bool {
        matches!(self, Node::Heading { .. })
    }

    /// Check if this node is a paragraph.
    pub fn is_paragraph(&self) -> bool {
        matches!(self, Node::Paragraph { .. })
    }

    /// Check if this node is a table.
    pub fn is_table(&self) -> bool {
        matches!(self, Node::Table(_))
    }
}

/// Append-only sink for recovered nodes.
///
/// Nodes are pushed in reading order and never mutated in place after
/// creation; `finish` yields the ordered sequence.
#[derive(Debug, Clone, Default)]
pub struct DocumentBuilder {
    nodes: Vec<Node>,
}

impl DocumentBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node.
    pub fn push(&mut self, node: Node) {
        self.nodes.push(node);
    }

    /// Append a heading with inline content. Empty content is dropped.
    pub fn push_heading(&mut self, level: u8, content: Vec<Inline>) {
        if content_is_blank(&content) {
            return;
        }
        self.nodes.push(Node::Heading {
            level: level.clamp(1, 6),
            content,
        });
    }

    /// Append a paragraph with inline content. Empty content is dropped.
    pub fn push_paragraph(&mut self, content: Vec<Inline>) {
        if content_is_blank(&content) {
            return;
        }
        self.nodes.push(Node::Paragraph { content });
    }

    /// Append a table. Empty tables are dropped.
    pub fn push_table(&mut self, table: TableNode) {
        if !table.is_empty() {
            self.nodes.push(Node::Table(table));
        }
    }

    /// Append a line break.
    pub fn push_line_break(&mut self) {
        self.nodes.push(Node::LineBreak);
    }

    /// Append every node of another builder, preserving order.
    pub fn extend(&mut self, other: DocumentBuilder) {
        self.nodes.extend(other.nodes);
    }

    /// Number of nodes appended so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if no nodes have been appended.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Consume the builder, yielding the ordered node sequence.
    pub fn finish(self) -> Vec<Node> {
        self.nodes
    }
}

fn content_is_blank(content: &[Inline]) -> bool {
    content.iter().all(|i| i.text().trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_plain_text() {
        let node = Node::Paragraph {
            content: vec![
                Inline::Text("See ".into()),
                Inline::Link {
                    text: "the docs".into(),
                    url: "https://example.com".into(),
                },
                Inline::Text(" for details.".into()),
            ],
        };
        assert_eq!(node.plain_text(), "See the docs for details.");
    }

    #[test]
    fn test_heading_level_clamped() {
        let node = Node::heading(9, "Deep");
        assert!(matches!(node, Node::Heading { level: 6, .. }));
    }

    #[test]
    fn test_builder_order_preserved() {
        let mut builder = DocumentBuilder::new();
        builder.push_heading(1, vec![Inline::Text("Title".into())]);
        builder.push_paragraph(vec![Inline::Text("Body".into())]);
        builder.push_line_break();

        let nodes = builder.finish();
        assert_eq!(nodes.len(), 3);
        assert!(nodes[0].is_heading());
        assert!(nodes[1].is_paragraph());
        assert_eq!(nodes[2], Node::LineBreak);
    }

    #[test]
    fn test_builder_drops_blank_content() {
        let mut builder = DocumentBuilder::new();
        builder.push_paragraph(vec![Inline::Text("   ".into())]);
        builder.push_heading(2, vec![]);
        assert!(builder.is_empty());
    }

    #[test]
    fn test_node_serialization() {
        let node = Node::heading(1, "Intro");
        let json = serde_json::to_string(&node).unwrap();
        assert!(json.contains("\"type\":\"heading\""));

        let back: Node = serde_json::from_str(&json).unwrap();
        assert_eq!(back, node);
    }
}
