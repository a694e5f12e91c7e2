//! Shared tree walk and dialect dispatch.

use std::marker::PhantomData;

use chatmark_config::Config;
use chatmark_model::{
    Dialect, Document, List, Mention, MentionKind, Node, Row, Style, Table,
    UnsupportedDialectError,
};

use crate::backend::{Backend, RenderedCell, RenderedItem, RenderedList, RenderedTable, TableMode};
use crate::layout::{LayoutCell, TableLayout};
use crate::{
    DiscordBackend, HtmlBackend, MarkdownBackend, PlainTextBackend, SlackBackend, SymphonyBackend,
};

/// Presentation knobs that do not change a dialect's syntax.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    /// Spaces per nesting level for text-layout lists.
    pub list_indent: usize,
    /// Wrap Symphony documents in `<messageML>`.
    pub message_ml_envelope: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            list_indent: 2,
            message_ml_envelope: false,
        }
    }
}

impl RenderOptions {
    /// Options from the `[render]` section of a loaded config.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            list_indent: config.render.list_indent,
            message_ml_envelope: config.render.message_ml_envelope,
        }
    }
}

/// Tree walker generic over the dialect backend.
///
/// Traversal is pre-order and identical for every dialect; the backend only
/// formats each piece, and [`Capabilities`](crate::Capabilities) decide the
/// fallbacks.
pub(crate) struct DocumentRenderer<'o, B: Backend> {
    options: &'o RenderOptions,
    _backend: PhantomData<B>,
}

impl<'o, B: Backend> DocumentRenderer<'o, B> {
    pub(crate) fn new(options: &'o RenderOptions) -> Self {
        Self {
            options,
            _backend: PhantomData,
        }
    }

    pub(crate) fn document(&self, doc: &Document) -> String {
        let body = self.blocks(doc.blocks());
        let mut out = String::with_capacity(body.len() + 32);
        B::document(&body, self.options, &mut out);
        out
    }

    /// Render blocks and join the non-empty ones.
    fn blocks(&self, blocks: &[Node]) -> String {
        blocks
            .iter()
            .map(|b| self.node_to_string(b))
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(B::CAPABILITIES.block_separator)
    }

    fn inlines(&self, children: &[Node]) -> String {
        let mut out = String::new();
        for child in children {
            self.node(child, &mut out);
        }
        out
    }

    pub(crate) fn node_to_string(&self, node: &Node) -> String {
        let mut out = String::new();
        self.node(node, &mut out);
        out
    }

    fn node(&self, node: &Node, out: &mut String) {
        let caps = B::CAPABILITIES;
        match node {
            Node::Text(text) => B::text(text, out),
            Node::Styled(styled) => {
                let inner = self.node_to_string(styled.child());
                if caps.supports_style(styled.style()) {
                    B::style(styled.style(), &inner, out);
                } else {
                    tracing::trace!(dialect = %B::DIALECT, style = styled.style().name(), "Style unsupported, rendering plain");
                    out.push_str(&inner);
                }
            }
            Node::Code(code) => B::inline_code(code, out),
            Node::CodeBlock(block) => B::code_block(block.language.as_deref(), &block.code, out),
            Node::Link(link) => B::link(link, out),
            Node::Mention(mention) => Self::mention(mention, out),
            Node::Heading(heading) => {
                let inner = self.inlines(heading.children());
                if caps.headings {
                    B::heading(heading.level(), &inner, out);
                } else if caps.supports_style(Style::Bold) {
                    tracing::trace!(dialect = %B::DIALECT, "No native headings, rendering bold");
                    B::style(Style::Bold, &inner, out);
                } else {
                    out.push_str(&inner);
                }
            }
            Node::Paragraph(paragraph) => B::paragraph(&self.inlines(paragraph.children()), out),
            Node::List(list) => self.list(list, out),
            Node::Quote(quote) => B::quote(&self.inlines(quote.children()), out),
            Node::HorizontalRule => {
                if caps.horizontal_rule {
                    B::horizontal_rule(out);
                } else {
                    tracing::trace!(dialect = %B::DIALECT, "No horizontal rule, rendering nothing");
                }
            }
            Node::Table(table) => self.table(table, out),
        }
    }

    fn mention(mention: &Mention, out: &mut String) {
        if mention.kind.is_special() && !B::CAPABILITIES.supports_broadcast(mention.kind) {
            tracing::trace!(dialect = %B::DIALECT, kind = ?mention.kind, "No broadcast token, rendering literal");
            let literal = match mention.kind {
                MentionKind::Here => "@here",
                _ => "@everyone",
            };
            B::text(literal, out);
            return;
        }
        B::mention(mention, out);
    }

    fn list(&self, list: &List, out: &mut String) {
        let items = list
            .items()
            .iter()
            .map(|item| {
                let mut rendered = RenderedItem::default();
                for child in item.children() {
                    match child {
                        Node::List(nested) => {
                            let mut nested_out = String::new();
                            self.list(nested, &mut nested_out);
                            rendered.nested.push(nested_out);
                        }
                        inline => self.node(inline, &mut rendered.body),
                    }
                }
                rendered
            })
            .collect();
        B::list(
            &RenderedList {
                kind: list.kind(),
                items,
                indent: self.options.list_indent,
            },
            out,
        );
    }

    fn table(&self, table: &Table, out: &mut String) {
        let caps = B::CAPABILITIES;
        let mode = match caps.tables {
            TableMode::Native if !caps.colspan && table.has_spans() => {
                tracing::trace!(dialect = %B::DIALECT, "Table spans unsupported, using grid");
                TableMode::CodeBlockGrid
            }
            mode => mode,
        };

        if mode == TableMode::Native {
            let cells = |row: &Row| {
                row.cells()
                    .iter()
                    .map(|cell| RenderedCell {
                        content: self.inlines(cell.children()),
                        span: cell.span(),
                    })
                    .collect::<Vec<_>>()
            };
            B::table(
                &RenderedTable {
                    caption: table.caption(),
                    alignments: table.alignments(),
                    header: cells(table.header()),
                    rows: table.rows().iter().map(cells).collect(),
                },
                out,
            );
            return;
        }

        if let Some(caption) = table.caption() {
            B::text(caption, out);
            out.push('\n');
        }
        let layout = plain_layout(table, self.options);
        match mode {
            TableMode::PlainGrid => out.push_str(&layout.render_plain()),
            _ => B::code_block(None, &layout.render_grid(), out),
        }
    }
}

/// Lay out a table with every cell projected to plain text.
fn plain_layout(table: &Table, options: &RenderOptions) -> TableLayout {
    let plain = DocumentRenderer::<PlainTextBackend>::new(options);
    let cells = |row: &Row| {
        row.cells()
            .iter()
            .map(|cell| LayoutCell::new(&plain.inlines(cell.children()), cell.span()))
            .collect::<Vec<_>>()
    };
    TableLayout::new(
        cells(table.header()),
        table.rows().iter().map(cells).collect(),
        table.alignments(),
    )
}

/// Run `$body` with `$r` bound to the walker for `$dialect`.
macro_rules! with_renderer {
    ($dialect:expr, $options:expr, |$r:ident| $body:expr) => {
        match $dialect {
            Dialect::PlainText => {
                let $r = DocumentRenderer::<PlainTextBackend>::new($options);
                $body
            }
            Dialect::GenericMarkdown => {
                let $r = DocumentRenderer::<MarkdownBackend>::new($options);
                $body
            }
            Dialect::SlackMrkdwn => {
                let $r = DocumentRenderer::<SlackBackend>::new($options);
                $body
            }
            Dialect::DiscordMarkdown => {
                let $r = DocumentRenderer::<DiscordBackend>::new($options);
                $body
            }
            Dialect::SymphonyMessageML => {
                let $r = DocumentRenderer::<SymphonyBackend>::new($options);
                $body
            }
            Dialect::Html => {
                let $r = DocumentRenderer::<HtmlBackend>::new($options);
                $body
            }
        }
    };
}

/// Render a document with default options.
///
/// ```
/// use chatmark_model::{Dialect, DocumentBuilder};
/// use chatmark_renderer::render;
///
/// let mut builder = DocumentBuilder::new();
/// builder.bold("Important").text(": check ").italic("this");
/// let doc = builder.build();
///
/// assert_eq!(render(&doc, Dialect::GenericMarkdown), "**Important**: check *this*");
/// assert_eq!(render(&doc, Dialect::PlainText), "Important: check this");
/// ```
#[must_use]
pub fn render(doc: &Document, dialect: Dialect) -> String {
    render_with(doc, dialect, &RenderOptions::default())
}

#[must_use]
pub fn render_with(doc: &Document, dialect: Dialect, options: &RenderOptions) -> String {
    tracing::debug!(%dialect, blocks = doc.blocks().len(), "Rendering document");
    with_renderer!(dialect, options, |r| r.document(doc))
}

/// Render any subtree, without document framing.
#[must_use]
pub fn render_node(node: &Node, dialect: Dialect) -> String {
    render_node_with(node, dialect, &RenderOptions::default())
}

fn render_node_with(node: &Node, dialect: Dialect, options: &RenderOptions) -> String {
    with_renderer!(dialect, options, |r| r.node_to_string(node))
}

/// Render to a dialect given by name.
///
/// # Errors
///
/// Returns [`UnsupportedDialectError`] when `name` names no dialect.
pub fn render_named(doc: &Document, name: &str) -> Result<String, UnsupportedDialectError> {
    let dialect = name.parse::<Dialect>()?;
    Ok(render(doc, dialect))
}

/// A dialect bound to its options.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Renderer {
    dialect: Dialect,
    options: RenderOptions,
}

impl Renderer {
    #[must_use]
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            options: RenderOptions::default(),
        }
    }

    /// Renderer for the configured default dialect and options.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            dialect: config.render.dialect,
            options: RenderOptions::from_config(config),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    #[must_use]
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    #[must_use]
    pub fn render(&self, doc: &Document) -> String {
        render_with(doc, self.dialect, &self.options)
    }

    #[must_use]
    pub fn render_node(&self, node: &Node) -> String {
        render_node_with(node, self.dialect, &self.options)
    }
}

#[cfg(test)]
mod tests {
    use chatmark_model::{Alignment, Cell, DocumentBuilder, HeadingLevel, ListItem, ListKind, User};
    use pretty_assertions::assert_eq;

    use super::*;

    fn sample() -> Document {
        let mut b = DocumentBuilder::new();
        b.heading(1, "Release").unwrap();
        b.paragraph()
            .text("Shipped by ")
            .mention(&User::new("U1").with_name("Ada"))
            .text(" ")
            .underline("today");
        b.unordered_list(["one", "two"]);
        b.quote().text("quoted");
        b.horizontal_rule();
        b.code_block("let x = 1;", Some("rust"));
        b.build()
    }

    #[test]
    fn test_every_dialect_renders_every_node() {
        let doc = sample();
        for dialect in Dialect::ALL {
            let out = render(&doc, dialect);
            assert!(out.contains("Release"), "{dialect}: {out}");
            assert!(out.contains("let x = 1;"), "{dialect}: {out}");
        }
    }

    #[test]
    fn test_unsupported_style_renders_child() {
        let node = Node::styled_text(Style::Underline, "u");
        assert_eq!(render_node(&node, Dialect::GenericMarkdown), "u");
        assert_eq!(render_node(&node, Dialect::SlackMrkdwn), "u");
        assert_eq!(render_node(&node, Dialect::DiscordMarkdown), "__u__");
        assert_eq!(render_node(&node, Dialect::Html), "<u>u</u>");
    }

    #[test]
    fn test_heading_falls_back_to_bold() {
        let node = Node::heading(2, vec![Node::text("Title")]).unwrap();
        assert_eq!(render_node(&node, Dialect::SlackMrkdwn), "*Title*");
        assert_eq!(render_node(&node, Dialect::GenericMarkdown), "## Title");
        assert_eq!(render_node(&node, Dialect::PlainText), "Title");
        assert_eq!(HeadingLevel::H2.get(), 2);
    }

    #[test]
    fn test_missing_broadcast_uses_literal() {
        let node = Node::mention(Mention::here());
        assert_eq!(render_node(&node, Dialect::SymphonyMessageML), "@here");
        assert_eq!(render_node(&node, Dialect::SlackMrkdwn), "<!here>");
    }

    #[test]
    fn test_markdown_spanned_table_falls_back_to_grid() {
        let header = Row::from_texts(["A", "B"]);
        let row = Row::new(vec![Cell::text("both").spanning(2).unwrap()]);
        let table = Table::new(header, vec![row]).unwrap();
        let out = render_node(&Node::table(table), Dialect::GenericMarkdown);
        assert_eq!(
            out,
            "\
```
+---+---+
| A | B |
+---+---+
| both  |
+---+---+
```"
        );
    }

    #[test]
    fn test_grid_table_caption_and_plain_cells() {
        let table = Table::new(
            Row::new(vec![Cell::new(vec![Node::styled_text(Style::Bold, "Who")]).unwrap()]),
            vec![Row::new(vec![Cell::new(vec![Node::mention(Mention::user("U1"))]).unwrap()])],
        )
        .unwrap()
        .with_alignments(vec![Alignment::Left])
        .unwrap()
        .with_caption("Owners");
        let out = render_node(&Node::table(table), Dialect::SlackMrkdwn);
        assert_eq!(out, "Owners\n```\n+-----+\n| Who |\n+-----+\n| @U1 |\n+-----+\n```");
    }

    #[test]
    fn test_list_indent_option() {
        let nested = Node::unordered_list(vec![ListItem::text("child")]);
        let list = Node::List(List::new(
            ListKind::Ordered { start: 1 },
            vec![ListItem::new(vec![Node::text("parent"), nested]).unwrap()],
        ));
        let doc = Document::from_blocks(vec![list]).unwrap();
        let options = RenderOptions {
            list_indent: 4,
            ..RenderOptions::default()
        };
        assert_eq!(
            render_with(&doc, Dialect::GenericMarkdown, &options),
            "1. parent\n    - child"
        );
    }

    #[test]
    fn test_render_named() {
        let doc = sample();
        assert_eq!(
            render_named(&doc, "mrkdwn").unwrap(),
            render(&doc, Dialect::SlackMrkdwn)
        );
        assert_eq!(render_named(&doc, "teams").unwrap_err().name, "teams");
    }

    #[test]
    fn test_renderer_from_config() {
        let mut config = Config::default();
        config.render.dialect = Dialect::SymphonyMessageML;
        config.render.message_ml_envelope = true;
        let renderer = Renderer::from_config(&config);
        assert_eq!(renderer.dialect(), Dialect::SymphonyMessageML);

        let mut b = DocumentBuilder::new();
        b.text("hi");
        assert_eq!(renderer.render(&b.build()), "<messageML><p>hi</p></messageML>");
    }

    #[test]
    fn test_empty_blocks_are_skipped() {
        let mut b = DocumentBuilder::new();
        b.text("a");
        b.horizontal_rule();
        b.paragraph().text("b");
        assert_eq!(render(&b.build(), Dialect::SlackMrkdwn), "a\nb");
    }
}
