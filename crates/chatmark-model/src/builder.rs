//! Incremental document assembly.
//!
//! [`DocumentBuilder`] keeps an explicit cursor naming the block currently
//! open for inline content. Opening a block (paragraph, heading, quote, list,
//! table, code block, rule) closes the previous one. Inline calls made while
//! nothing is open start an implicit paragraph.
//!
//! ```
//! use chatmark_model::DocumentBuilder;
//!
//! let mut builder = DocumentBuilder::new();
//! builder.bold("Important").text(": check ").italic("this");
//! let doc = builder.build();
//! assert_eq!(doc.blocks().len(), 1);
//! ```

use crate::document::Document;
use crate::error::StructureError;
use crate::node::{
    Heading, HeadingLevel, List, ListItem, ListKind, Mention, Node, Paragraph, Quote, Style,
};
use crate::table::Table;

/// Observable state of the builder's insertion point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsertionPoint {
    /// No block is open; the next inline call opens a paragraph.
    Closed,
    Paragraph,
    Heading(HeadingLevel),
    Quote,
    /// Inline calls append to the trailing item of the open list.
    List(ListKind),
}

#[derive(Clone, Debug)]
enum Cursor {
    Closed,
    Paragraph(Vec<Node>),
    Heading(HeadingLevel, Vec<Node>),
    Quote(Vec<Node>),
    List(ListKind, Vec<Vec<Node>>),
}

impl Cursor {
    /// Materialize the open block. Empty paragraphs and quotes vanish.
    fn into_block(self) -> Option<Node> {
        match self {
            Self::Closed => None,
            Self::Paragraph(children) if children.is_empty() => None,
            Self::Quote(children) if children.is_empty() => None,
            Self::Paragraph(children) => Some(Node::Paragraph(Paragraph::from_parts(children))),
            Self::Heading(level, children) => {
                Some(Node::Heading(Heading::from_parts(level, children)))
            }
            Self::Quote(children) => Some(Node::Quote(Quote::from_parts(children))),
            Self::List(kind, items) => Some(Node::List(List::new(
                kind,
                items.into_iter().map(ListItem::from_parts).collect(),
            ))),
        }
    }
}

/// Single-writer, append-only document assembler.
///
/// Every node the builder creates satisfies the model's invariants, so only
/// operations taking caller-supplied levels, tables or nodes can fail.
#[derive(Clone, Debug)]
pub struct DocumentBuilder {
    blocks: Vec<Node>,
    cursor: Cursor,
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            blocks: Vec::new(),
            cursor: Cursor::Closed,
        }
    }

    /// Where the next inline call will land.
    #[must_use]
    pub fn insertion_point(&self) -> InsertionPoint {
        match &self.cursor {
            Cursor::Closed => InsertionPoint::Closed,
            Cursor::Paragraph(_) => InsertionPoint::Paragraph,
            Cursor::Heading(level, _) => InsertionPoint::Heading(*level),
            Cursor::Quote(_) => InsertionPoint::Quote,
            Cursor::List(kind, _) => InsertionPoint::List(*kind),
        }
    }

    /// Immutable copy of the tree as it stands, open block included.
    #[must_use]
    pub fn snapshot(&self) -> Document {
        let mut blocks = self.blocks.clone();
        blocks.extend(self.cursor.clone().into_block());
        Document::from_parts(blocks)
    }

    /// Close the open block and hand over the finished document.
    #[must_use]
    pub fn build(mut self) -> Document {
        self.close();
        Document::from_parts(self.blocks)
    }

    fn close(&mut self) {
        let cursor = std::mem::replace(&mut self.cursor, Cursor::Closed);
        self.blocks.extend(cursor.into_block());
    }

    fn open(&mut self, cursor: Cursor) {
        self.close();
        self.cursor = cursor;
    }

    /// Append a node known to be inline at the insertion point.
    fn push_inline(&mut self, node: Node) -> &mut Self {
        if matches!(self.cursor, Cursor::Closed) {
            self.cursor = Cursor::Paragraph(Vec::new());
        }
        match &mut self.cursor {
            Cursor::Paragraph(children)
            | Cursor::Heading(_, children)
            | Cursor::Quote(children) => children.push(node),
            Cursor::List(_, items) => match items.last_mut() {
                Some(item) => item.push(node),
                None => items.push(vec![node]),
            },
            Cursor::Closed => unreachable!("cursor opened above"),
        }
        self
    }

    fn push_block(&mut self, node: Node) -> &mut Self {
        self.close();
        self.blocks.push(node);
        self
    }

    pub fn text(&mut self, text: impl Into<String>) -> &mut Self {
        self.push_inline(Node::text(text))
    }

    pub fn styled(&mut self, style: Style, text: impl Into<String>) -> &mut Self {
        self.push_inline(Node::styled_text(style, text))
    }

    pub fn bold(&mut self, text: impl Into<String>) -> &mut Self {
        self.styled(Style::Bold, text)
    }

    pub fn italic(&mut self, text: impl Into<String>) -> &mut Self {
        self.styled(Style::Italic, text)
    }

    pub fn bold_italic(&mut self, text: impl Into<String>) -> &mut Self {
        self.styled(Style::BoldItalic, text)
    }

    pub fn strikethrough(&mut self, text: impl Into<String>) -> &mut Self {
        self.styled(Style::Strikethrough, text)
    }

    pub fn underline(&mut self, text: impl Into<String>) -> &mut Self {
        self.styled(Style::Underline, text)
    }

    pub fn code(&mut self, code: impl Into<String>) -> &mut Self {
        self.push_inline(Node::code(code))
    }

    pub fn link(&mut self, url: impl Into<String>, label: Option<&str>) -> &mut Self {
        self.push_inline(Node::link(url, label))
    }

    /// Mention a resolved identity (`&User`, `&Channel`), a prepared
    /// [`Mention`], or a bare user id string.
    pub fn mention(&mut self, target: impl Into<Mention>) -> &mut Self {
        self.push_inline(Node::mention(target))
    }

    pub fn everyone(&mut self) -> &mut Self {
        self.mention(Mention::everyone())
    }

    pub fn here(&mut self) -> &mut Self {
        self.mention(Mention::here())
    }

    /// Append any inline node.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::InvalidChild`] for block nodes.
    pub fn inline(&mut self, node: Node) -> Result<&mut Self, StructureError> {
        if !node.is_inline() {
            return Err(StructureError::InvalidChild {
                container: "inline content",
                child: node.kind_name(),
            });
        }
        Ok(self.push_inline(node))
    }

    /// Append any block node, closing the insertion point.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::InvalidChild`] for inline nodes.
    pub fn block(&mut self, node: Node) -> Result<&mut Self, StructureError> {
        if node.is_inline() {
            return Err(StructureError::InvalidChild {
                container: "document",
                child: node.kind_name(),
            });
        }
        Ok(self.push_block(node))
    }

    /// Open an empty paragraph.
    pub fn paragraph(&mut self) -> &mut Self {
        self.open(Cursor::Paragraph(Vec::new()));
        self
    }

    /// Open a heading holding `text`. Further inline calls extend the heading.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::HeadingLevel`] unless `level` is 1, 2 or 3.
    pub fn heading(
        &mut self,
        level: u8,
        text: impl Into<String>,
    ) -> Result<&mut Self, StructureError> {
        let level = HeadingLevel::try_from(level)?;
        let text = text.into();
        let children = if text.is_empty() {
            Vec::new()
        } else {
            vec![Node::Text(text)]
        };
        self.open(Cursor::Heading(level, children));
        Ok(self)
    }

    /// Open an empty quote.
    pub fn quote(&mut self) -> &mut Self {
        self.open(Cursor::Quote(Vec::new()));
        self
    }

    /// Open a bullet list with one text item per entry.
    pub fn unordered_list<I, S>(&mut self, items: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.open_list(ListKind::Unordered, items);
        self
    }

    /// Open a numbered list counting from 1.
    pub fn ordered_list<I, S>(&mut self, items: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.open_list(ListKind::Ordered { start: 1 }, items);
        self
    }

    fn open_list<I, S>(&mut self, kind: ListKind, items: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items = items.into_iter().map(|s| vec![Node::text(s)]).collect();
        self.open(Cursor::List(kind, items));
    }

    /// Start a new item in the open list.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::NoOpenList`] when no list is open.
    pub fn list_item(&mut self, text: impl Into<String>) -> Result<&mut Self, StructureError> {
        let Cursor::List(_, items) = &mut self.cursor else {
            return Err(StructureError::NoOpenList("a list item"));
        };
        items.push(vec![Node::text(text)]);
        Ok(self)
    }

    /// Nest a list of text items under the trailing item of the open list.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::NoOpenList`] when no list is open.
    pub fn nested_list<I, S>(&mut self, kind: ListKind, items: I) -> Result<&mut Self, StructureError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let Cursor::List(_, parent) = &mut self.cursor else {
            return Err(StructureError::NoOpenList("a nested list"));
        };
        let nested = Node::List(List::new(
            kind,
            items.into_iter().map(ListItem::text).collect(),
        ));
        match parent.last_mut() {
            Some(item) => item.push(nested),
            None => parent.push(vec![nested]),
        }
        Ok(self)
    }

    /// Append a table from row-major string data.
    ///
    /// # Errors
    ///
    /// Returns the [`Table`] construction error when a row does not match the
    /// header's column count.
    pub fn table<S: AsRef<str>>(
        &mut self,
        header: &[S],
        rows: &[Vec<S>],
    ) -> Result<&mut Self, StructureError> {
        let table = Table::from_strings(header, rows)?;
        Ok(self.push_block(Node::Table(table)))
    }

    pub fn code_block(&mut self, code: impl Into<String>, language: Option<&str>) -> &mut Self {
        self.push_block(Node::code_block(code, language))
    }

    pub fn horizontal_rule(&mut self) -> &mut Self {
        self.push_block(Node::HorizontalRule)
    }
}
