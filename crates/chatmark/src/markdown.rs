//! Markdown import.
//!
//! Turns CommonMark with GitHub extensions, as produced by bots and LLM
//! agents, into a validated [`Document`]. Text runs are scanned with the
//! mention extractor of the chosen dialect so native mention tokens become
//! mention nodes. Code spans and code blocks are kept verbatim.
//!
//! The node model is narrower than Markdown. Quotes hold inline content only
//! and list items hold inline content plus nested lists, so other blocks
//! nested in those containers are flattened to their inline text. Headings
//! deeper than level 3 become level 3.

use std::ops::Range;

use chatmark_mentions::extract;
use chatmark_model::{
    Alignment, Cell, Dialect, Document, ListItem, ListKind, Node, Row, StructureError, Style,
    Table,
};
use pulldown_cmark::{
    Alignment as MdAlignment, CodeBlockKind, Event, HeadingLevel as MdHeadingLevel, Options,
    Parser, Tag, TagEnd,
};

/// Parse `markdown` into a document, recognizing `dialect` mention tokens.
///
/// Mention tokens written with Markdown escapes (`\<@U1\>`) or entities
/// stay literal text.
///
/// # Errors
///
/// Returns [`StructureError`] if the parsed structure cannot be represented,
/// which the flattening rules make unreachable for well-formed parser output.
pub fn parse_markdown(markdown: &str, dialect: Dialect) -> Result<Document, StructureError> {
    let mut importer = Importer::new(markdown, dialect);
    for (event, range) in Parser::new_ext(markdown, parser_options()).into_offset_iter() {
        importer.event(event, range)?;
    }
    let document = importer.finish()?;
    tracing::debug!(%dialect, blocks = document.blocks().len(), "Parsed markdown");
    Ok(document)
}

fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_GFM
}

/// An open container on the import stack.
enum Frame {
    Paragraph(Vec<Node>),
    Heading(u8, Vec<Node>),
    Quote(Vec<Node>),
    List(ListKind, Vec<ListItem>),
    Item(Vec<Node>),
    Styled(Style, Vec<Node>),
    /// Superscript and subscript: content kept, markup dropped.
    Span(Vec<Node>),
    /// Link or image target with its label content.
    Link(String, Vec<Node>),
    CodeBlock(Option<String>, String),
    Table {
        alignments: Vec<Alignment>,
        header: Option<Row>,
        rows: Vec<Row>,
    },
    Row(Vec<Cell>),
    Cell(Vec<Node>),
}

struct Importer<'a> {
    source: &'a str,
    dialect: Dialect,
    blocks: Vec<Node>,
    stack: Vec<Frame>,
    /// Text not yet scanned for mentions.
    pending: String,
    /// Start of each queued run in `pending`, with its source offset when the
    /// run is a verbatim slice of the source.
    origins: Vec<(usize, Option<usize>)>,
}

impl<'a> Importer<'a> {
    fn new(source: &'a str, dialect: Dialect) -> Self {
        Self {
            source,
            dialect,
            blocks: Vec::new(),
            stack: Vec::new(),
            pending: String::new(),
            origins: Vec::new(),
        }
    }

    fn finish(mut self) -> Result<Document, StructureError> {
        self.flush_text()?;
        while let Some(frame) = self.stack.pop() {
            self.close(frame)?;
        }
        Document::from_blocks(self.blocks)
    }

    fn event(&mut self, event: Event<'_>, range: Range<usize>) -> Result<(), StructureError> {
        if let Some(Frame::CodeBlock(_, code)) = self.stack.last_mut()
            && let Event::Text(text) = &event
        {
            code.push_str(text);
            return Ok(());
        }
        match event {
            Event::Text(text) | Event::InlineHtml(text) | Event::Html(text) => {
                let origin =
                    (self.source.get(range.clone()) == Some(&*text)).then_some(range.start);
                self.queue_text(&text, origin);
            }
            Event::SoftBreak => self.queue_text(" ", None),
            Event::HardBreak => self.queue_text("\n", None),
            Event::TaskListMarker(checked) => {
                self.queue_text(if checked { "[x] " } else { "[ ] " }, None);
            }
            Event::FootnoteReference(label) => self.queue_text(&format!("[^{label}]"), None),
            Event::Code(code) | Event::InlineMath(code) | Event::DisplayMath(code) => {
                self.flush_text()?;
                self.push_inline(Node::code(code.into_string()))?;
            }
            Event::Rule => {
                self.flush_text()?;
                self.push_block(Node::horizontal_rule())?;
            }
            Event::Start(tag) => {
                self.flush_text()?;
                self.start(tag)?;
            }
            Event::End(tag) => {
                self.flush_text()?;
                self.end(tag)?;
            }
        }
        Ok(())
    }

    fn start(&mut self, tag: Tag<'_>) -> Result<(), StructureError> {
        let frame = match tag {
            Tag::Paragraph
            | Tag::HtmlBlock
            | Tag::DefinitionListTitle
            | Tag::DefinitionListDefinition => Frame::Paragraph(Vec::new()),
            Tag::Heading { level, .. } => Frame::Heading(heading_level(level), Vec::new()),
            Tag::BlockQuote(_) => Frame::Quote(Vec::new()),
            Tag::CodeBlock(kind) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(str::to_owned),
                    CodeBlockKind::Indented => None,
                };
                Frame::CodeBlock(lang, String::new())
            }
            Tag::List(start) => {
                let kind = match start {
                    Some(start) => ListKind::ordered_from(start.max(1))?,
                    None => ListKind::Unordered,
                };
                Frame::List(kind, Vec::new())
            }
            Tag::Item => Frame::Item(Vec::new()),
            Tag::Emphasis => Frame::Styled(Style::Italic, Vec::new()),
            Tag::Strong => Frame::Styled(Style::Bold, Vec::new()),
            Tag::Strikethrough => Frame::Styled(Style::Strikethrough, Vec::new()),
            Tag::Superscript | Tag::Subscript => Frame::Span(Vec::new()),
            Tag::Link { dest_url, .. } | Tag::Image { dest_url, .. } => {
                Frame::Link(dest_url.into_string(), Vec::new())
            }
            Tag::Table(alignments) => Frame::Table {
                alignments: alignments.into_iter().map(alignment).collect(),
                header: None,
                rows: Vec::new(),
            },
            Tag::TableHead | Tag::TableRow => Frame::Row(Vec::new()),
            Tag::TableCell => Frame::Cell(Vec::new()),
            // Not enabled in the parser options.
            Tag::FootnoteDefinition(_) | Tag::MetadataBlock(_) | Tag::DefinitionList => {
                return Ok(());
            }
        };
        self.stack.push(frame);
        Ok(())
    }

    fn end(&mut self, tag: TagEnd) -> Result<(), StructureError> {
        if matches!(
            tag,
            TagEnd::FootnoteDefinition | TagEnd::MetadataBlock(_) | TagEnd::DefinitionList
        ) {
            return Ok(());
        }
        match self.stack.pop() {
            Some(frame) => self.close(frame),
            None => Ok(()),
        }
    }

    /// Turn a finished frame into nodes and hand them to its parent.
    fn close(&mut self, frame: Frame) -> Result<(), StructureError> {
        match frame {
            Frame::Paragraph(mut children) => {
                trim_trailing_text(&mut children);
                if !children.is_empty() {
                    self.push_block(Node::paragraph(children)?)?;
                }
            }
            Frame::Heading(level, children) => self.push_block(Node::heading(level, children)?)?,
            Frame::Quote(children) => self.push_block(Node::quote(children)?)?,
            Frame::List(kind, items) => {
                self.push_block(Node::List(chatmark_model::List::new(kind, items)))?;
            }
            Frame::Item(children) => {
                let item = ListItem::new(children)?;
                if let Some(Frame::List(_, items)) = self.stack.last_mut() {
                    items.push(item);
                }
            }
            Frame::Styled(style, children) => {
                for node in apply_style(style, children)? {
                    self.push_inline(node)?;
                }
            }
            Frame::Span(children) => {
                for node in children {
                    self.push_inline(node)?;
                }
            }
            Frame::Link(url, children) => {
                let label = plain_text(&children);
                let label = (!label.is_empty() && label != url).then_some(label);
                self.push_inline(Node::link(url, label.as_deref()))?;
            }
            Frame::CodeBlock(lang, code) => {
                self.push_block(Node::code_block(code, lang.as_deref()))?;
            }
            Frame::Table {
                alignments,
                header,
                rows,
            } => {
                let header = header.unwrap_or_else(|| Row::new(Vec::new()));
                let columns = header.span_sum();
                let mut table = Table::new(header, rows)?;
                if alignments.len() == columns {
                    table = table.with_alignments(alignments)?;
                }
                self.push_block(Node::table(table))?;
            }
            Frame::Row(cells) => self.close_row(cells),
            Frame::Cell(children) => {
                let cell = Cell::new(children)?;
                if let Some(Frame::Row(cells)) = self.stack.last_mut() {
                    cells.push(cell);
                }
            }
        }
        Ok(())
    }

    /// The first row of a table is its header; body rows are fitted to it.
    fn close_row(&mut self, mut cells: Vec<Cell>) {
        let Some(Frame::Table { header, rows, .. }) = self.stack.last_mut() else {
            return;
        };
        match header.as_ref().map(Row::span_sum) {
            None => *header = Some(Row::new(cells)),
            Some(columns) => {
                cells.truncate(columns);
                cells.resize_with(columns, || Cell::text(""));
                rows.push(Row::new(cells));
            }
        }
    }

    fn queue_text(&mut self, text: &str, origin: Option<usize>) {
        self.origins.push((self.pending.len(), origin));
        self.pending.push_str(text);
    }

    /// Whether `span` of the queued text was written verbatim in the source.
    ///
    /// Backslash escapes and entities are decoded by the parser, so a token
    /// spelled with them reads differently in the source and is rejected.
    fn is_verbatim(
        &self,
        origins: &[(usize, Option<usize>)],
        text: &str,
        span: &Range<usize>,
    ) -> bool {
        let Some(&(run_start, Some(source_start))) =
            origins.iter().rev().find(|(start, _)| *start <= span.start)
        else {
            return false;
        };
        let from = source_start + (span.start - run_start);
        self.source.get(from..from + span.len()) == text.get(span.clone())
    }

    /// Emit queued text, splitting out mention tokens.
    fn flush_text(&mut self) -> Result<(), StructureError> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let text = std::mem::take(&mut self.pending);
        let origins = std::mem::take(&mut self.origins);
        let mut last = 0;
        for found in extract(&text, self.dialect) {
            let span = found.span.clone();
            if !self.is_verbatim(&origins, &text, &span) {
                continue;
            }
            if span.start > last {
                self.push_inline(Node::text(&text[last..span.start]))?;
            }
            self.push_inline(Node::mention(found.to_mention()))?;
            last = span.end;
        }
        if last < text.len() {
            self.push_inline(Node::text(&text[last..]))?;
        }
        Ok(())
    }

    fn push_inline(&mut self, node: Node) -> Result<(), StructureError> {
        match self.stack.last_mut() {
            Some(
                Frame::Paragraph(children)
                | Frame::Heading(_, children)
                | Frame::Quote(children)
                | Frame::Item(children)
                | Frame::Styled(_, children)
                | Frame::Span(children)
                | Frame::Link(_, children)
                | Frame::Cell(children),
            ) => {
                push_merged(children, node);
                Ok(())
            }
            Some(Frame::CodeBlock(_, code)) => {
                code.push_str(&plain_text(std::slice::from_ref(&node)));
                Ok(())
            }
            Some(Frame::List(..) | Frame::Table { .. } | Frame::Row(_)) => {
                tracing::trace!(kind = node.kind_name(), "Dropping stray inline content");
                Ok(())
            }
            None => {
                self.blocks.push(Node::paragraph(vec![node])?);
                Ok(())
            }
        }
    }

    fn push_block(&mut self, node: Node) -> Result<(), StructureError> {
        match self.stack.last_mut() {
            None => self.blocks.push(node),
            Some(Frame::Item(children)) => match node {
                Node::List(_) => children.push(node),
                block => {
                    if !children.is_empty() {
                        push_merged(children, Node::text("\n"));
                    }
                    for inline in flatten(block) {
                        push_merged(children, inline);
                    }
                }
            },
            Some(Frame::Quote(children)) => {
                if !children.is_empty() {
                    push_merged(children, Node::text("\n"));
                }
                for inline in flatten(node) {
                    push_merged(children, inline);
                }
            }
            Some(_) => {
                tracing::trace!(kind = node.kind_name(), "Flattening nested block");
                for inline in flatten(node) {
                    self.push_inline(inline)?;
                }
            }
        }
        Ok(())
    }
}

fn heading_level(level: MdHeadingLevel) -> u8 {
    match level {
        MdHeadingLevel::H1 => 1,
        MdHeadingLevel::H2 => 2,
        _ => 3,
    }
}

fn alignment(alignment: MdAlignment) -> Alignment {
    match alignment {
        MdAlignment::None | MdAlignment::Left => Alignment::Left,
        MdAlignment::Center => Alignment::Center,
        MdAlignment::Right => Alignment::Right,
    }
}

/// Append `node`, joining it onto a preceding text run.
fn push_merged(children: &mut Vec<Node>, node: Node) {
    if let (Some(Node::Text(last)), Node::Text(text)) = (children.last_mut(), &node) {
        last.push_str(text);
    } else {
        children.push(node);
    }
}

fn trim_trailing_text(children: &mut Vec<Node>) {
    if let Some(Node::Text(last)) = children.last_mut() {
        let trimmed = last.trim_end().len();
        last.truncate(trimmed);
        if last.is_empty() {
            children.pop();
        }
    }
}

/// Distribute a style over `children`. Italic over bold, or bold over
/// italic, merges into bold italic.
fn apply_style(style: Style, children: Vec<Node>) -> Result<Vec<Node>, StructureError> {
    children
        .into_iter()
        .map(|child| match (&child, style) {
            (Node::Styled(inner), Style::Italic) if inner.style() == Style::Bold => {
                Node::styled(Style::BoldItalic, inner.child().clone())
            }
            (Node::Styled(inner), Style::Bold) if inner.style() == Style::Italic => {
                Node::styled(Style::BoldItalic, inner.child().clone())
            }
            _ => Node::styled(style, child),
        })
        .collect()
}

/// Inline content of a block, for containers that cannot hold blocks.
fn flatten(node: Node) -> Vec<Node> {
    match node {
        Node::Paragraph(p) => p.children().to_vec(),
        Node::Heading(h) => h.children().to_vec(),
        Node::Quote(q) => q.children().to_vec(),
        Node::CodeBlock(block) => vec![Node::code(block.code.trim_end_matches('\n'))],
        Node::List(list) => {
            let mut out = Vec::new();
            for item in list.items() {
                if !out.is_empty() {
                    push_merged(&mut out, Node::text("\n"));
                }
                for child in item.children() {
                    for inline in flatten(child.clone()) {
                        push_merged(&mut out, inline);
                    }
                }
            }
            out
        }
        Node::Table(table) => {
            let lines: Vec<String> = std::iter::once(table.header())
                .chain(table.rows())
                .map(|row| {
                    row.cells()
                        .iter()
                        .map(|cell| plain_text(cell.children()))
                        .collect::<Vec<_>>()
                        .join(" | ")
                })
                .collect();
            vec![Node::text(lines.join("\n"))]
        }
        Node::HorizontalRule => Vec::new(),
        inline => vec![inline],
    }
}

/// Visible text of inline nodes, used for link labels.
fn plain_text(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        match node {
            Node::Text(text) | Node::Code(text) => out.push_str(text),
            Node::Styled(s) => out.push_str(&plain_text(std::slice::from_ref(s.child()))),
            Node::Link(link) => out.push_str(link.display()),
            Node::Mention(m) => out.push_str(m.label()),
            block => {
                for inline in flatten(block.clone()) {
                    out.push_str(&plain_text(std::slice::from_ref(&inline)));
                }
            }
        }
    }
    out
}
