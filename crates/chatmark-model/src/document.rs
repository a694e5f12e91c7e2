//! Document root.

use crate::error::StructureError;
use crate::node::{Mention, Node};

/// Root of a rich-text tree: an ordered sequence of block nodes.
///
/// A `Document` is immutable once built. Renderers only ever borrow it, so a
/// single document can be rendered to several dialects concurrently.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Document {
    blocks: Vec<Node>,
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Document from already validated blocks.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::InvalidChild`] if any top-level node is inline.
    pub fn from_blocks(blocks: Vec<Node>) -> Result<Self, StructureError> {
        if let Some(inline) = blocks.iter().find(|n| n.is_inline()) {
            return Err(StructureError::InvalidChild {
                container: "document",
                child: inline.kind_name(),
            });
        }
        Ok(Self { blocks })
    }

    pub(crate) fn from_parts(blocks: Vec<Node>) -> Self {
        Self { blocks }
    }

    #[must_use]
    pub fn blocks(&self) -> &[Node] {
        &self.blocks
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Mention nodes in document order.
    ///
    /// Code and code blocks are opaque text, so mention-like tokens inside them
    /// are never reported.
    #[must_use]
    pub fn mentions(&self) -> Vec<&Mention> {
        let mut found = Vec::new();
        for block in &self.blocks {
            collect_mentions(block, &mut found);
        }
        found
    }
}

fn collect_mentions<'a>(node: &'a Node, found: &mut Vec<&'a Mention>) {
    match node {
        Node::Mention(m) => found.push(m),
        Node::Styled(s) => collect_mentions(s.child(), found),
        Node::Heading(h) => collect_all(h.children(), found),
        Node::Paragraph(p) => collect_all(p.children(), found),
        Node::Quote(q) => collect_all(q.children(), found),
        Node::List(l) => {
            for item in l.items() {
                collect_all(item.children(), found);
            }
        }
        Node::Table(t) => {
            for cell in std::iter::once(t.header()).chain(t.rows()).flat_map(|r| r.cells()) {
                collect_all(cell.children(), found);
            }
        }
        Node::Text(_)
        | Node::Code(_)
        | Node::CodeBlock(_)
        | Node::Link(_)
        | Node::HorizontalRule => {}
    }
}

fn collect_all<'a>(children: &'a [Node], found: &mut Vec<&'a Mention>) {
    for child in children {
        collect_mentions(child, found);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::MentionKind::{Channel, Here, Role, User};
    use crate::node::{ListItem, Style};
    use crate::table::{Cell, Row, Table};

    #[test]
    fn test_top_level_inline_is_rejected() {
        let err = Document::from_blocks(vec![Node::text("loose")]).unwrap_err();
        assert_eq!(
            err,
            StructureError::InvalidChild {
                container: "document",
                child: "text"
            }
        );
    }

    #[test]
    fn test_mentions_in_document_order() {
        let para = Node::paragraph(vec![
            Node::mention("U1"),
            Node::styled(Style::Bold, Node::mention(Mention::channel("C1"))).unwrap(),
        ])
        .unwrap();
        let list = Node::unordered_list(vec![
            ListItem::new(vec![Node::mention(Mention::role("R1"))]).unwrap(),
        ]);
        let header = Row::new(vec![Cell::new(vec![Node::mention(Mention::here())]).unwrap()]);
        let table = Node::table(Table::new(header, vec![]).unwrap());
        let doc = Document::from_blocks(vec![para, list, table]).unwrap();

        let kinds: Vec<_> = doc.mentions().iter().map(|m| m.kind).collect();
        assert_eq!(kinds, vec![User, Channel, Role, Here]);
    }

    #[test]
    fn test_mentions_skip_code() {
        let doc = Document::from_blocks(vec![
            Node::paragraph(vec![Node::code("<@U1>")]).unwrap(),
            Node::code_block("<@U2>", None),
        ])
        .unwrap();
        assert!(doc.mentions().is_empty());
    }
}
