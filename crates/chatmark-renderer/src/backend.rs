//! Backend trait for dialect-specific lowering.
//!
//! The tree walk in [`crate::renderer`] is shared by every dialect. A backend
//! only decides how one already-rendered piece is written, and declares in
//! [`Capabilities`] which constructs it lacks so the walker can degrade them in
//! one place.

use chatmark_model::{
    Alignment, Dialect, HeadingLevel, Link, ListKind, Mention, MentionKind, Style,
};

use crate::renderer::RenderOptions;

/// How a dialect lays out tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableMode {
    /// Native table markup via [`Backend::table`].
    Native,
    /// Bordered monospaced grid inside a code block.
    CodeBlockGrid,
    /// Borderless space-separated grid.
    PlainGrid,
}

/// Declared feature set of a dialect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capabilities {
    /// Styles with native syntax. Others render their child unstyled.
    pub styles: &'static [Style],
    /// Native headings. Without them headings fall back to bold text.
    pub headings: bool,
    /// Whether a horizontal rule produces any output.
    pub horizontal_rule: bool,
    pub tables: TableMode,
    /// Whether native tables can express column spans. Spanned tables in a
    /// dialect without them fall back to a code block grid.
    pub colspan: bool,
    /// Broadcast mention kinds with a native token. Others render as `@name`.
    pub broadcasts: &'static [MentionKind],
    /// Joins rendered blocks.
    pub block_separator: &'static str,
}

impl Capabilities {
    /// Capabilities of `dialect`.
    #[must_use]
    pub fn of(dialect: Dialect) -> Self {
        use crate::{
            DiscordBackend, HtmlBackend, MarkdownBackend, PlainTextBackend, SlackBackend,
            SymphonyBackend,
        };
        match dialect {
            Dialect::PlainText => PlainTextBackend::CAPABILITIES,
            Dialect::GenericMarkdown => MarkdownBackend::CAPABILITIES,
            Dialect::SlackMrkdwn => SlackBackend::CAPABILITIES,
            Dialect::DiscordMarkdown => DiscordBackend::CAPABILITIES,
            Dialect::SymphonyMessageML => SymphonyBackend::CAPABILITIES,
            Dialect::Html => HtmlBackend::CAPABILITIES,
        }
    }

    #[must_use]
    pub fn supports_style(&self, style: Style) -> bool {
        self.styles.contains(&style)
    }

    #[must_use]
    pub fn supports_broadcast(&self, kind: MentionKind) -> bool {
        self.broadcasts.contains(&kind)
    }
}

/// A rendered list item: inline body plus already rendered nested lists.
#[derive(Clone, Debug, Default)]
pub struct RenderedItem {
    pub body: String,
    pub nested: Vec<String>,
}

/// A list whose items are rendered and ready to be framed.
#[derive(Clone, Debug)]
pub struct RenderedList {
    pub kind: ListKind,
    pub items: Vec<RenderedItem>,
    /// Spaces per nesting level for text layouts.
    pub indent: usize,
}

/// A rendered table cell.
#[derive(Clone, Debug)]
pub struct RenderedCell {
    pub content: String,
    pub span: usize,
}

/// A table whose cells are rendered, handed to native table backends.
#[derive(Clone, Debug)]
pub struct RenderedTable<'a> {
    pub caption: Option<&'a str>,
    pub alignments: &'a [Alignment],
    pub header: Vec<RenderedCell>,
    pub rows: Vec<Vec<RenderedCell>>,
}

/// Dialect-specific writers.
///
/// Constructs every dialect has are required methods. The optional ones
/// ([`heading`](Self::heading), [`horizontal_rule`](Self::horizontal_rule) and
/// [`table`](Self::table)) are only called when [`Capabilities`] declares them,
/// so dialects without them keep the defaults.
pub trait Backend {
    const DIALECT: Dialect;
    const CAPABILITIES: Capabilities;

    /// Write a literal text run, escaped for the dialect.
    fn text(text: &str, out: &mut String);

    fn inline_code(code: &str, out: &mut String);

    fn code_block(lang: Option<&str>, code: &str, out: &mut String);

    /// Wrap rendered inline content in a style. Only called for styles listed
    /// in [`Capabilities::styles`].
    fn style(style: Style, inner: &str, out: &mut String);

    fn link(link: &Link, out: &mut String);

    /// Write a mention. Broadcast kinds missing from
    /// [`Capabilities::broadcasts`] never reach the backend.
    fn mention(mention: &Mention, out: &mut String);

    /// Only called when [`Capabilities::headings`] is set.
    fn heading(_level: HeadingLevel, inner: &str, out: &mut String) {
        out.push_str(inner);
    }

    fn paragraph(inner: &str, out: &mut String);

    fn quote(inner: &str, out: &mut String);

    fn list(list: &RenderedList, out: &mut String);

    /// Only called when [`Capabilities::horizontal_rule`] is set.
    fn horizontal_rule(_out: &mut String) {}

    /// Only called when [`Capabilities::tables`] is [`TableMode::Native`].
    /// Grid layouts are produced by the walker from plain cell text.
    fn table(_table: &RenderedTable<'_>, _out: &mut String) {}

    /// Frame the joined blocks of a whole document.
    fn document(body: &str, _options: &RenderOptions, out: &mut String) {
        out.push_str(body);
    }
}

/// Marker-and-indent list layout shared by the text dialects.
///
/// Nested lists sit on the lines after their item, shifted by `indent` spaces.
pub(crate) fn text_list(list: &RenderedList, bullet: &str, out: &mut String) {
    let pad = " ".repeat(list.indent);
    let mut lines = Vec::new();
    for (index, item) in list.items.iter().enumerate() {
        let marker = match list.kind.ordinal(index) {
            Some(n) => format!("{n}."),
            None => bullet.to_owned(),
        };
        let mut body = item.body.lines();
        match body.next() {
            Some(first) if !first.is_empty() => lines.push(format!("{marker} {first}")),
            _ => lines.push(marker),
        }
        lines.extend(body.map(|l| format!("{pad}{l}")));
        for nested in &item.nested {
            lines.extend(nested.lines().map(|l| format!("{pad}{l}")));
        }
    }
    out.push_str(&lines.join("\n"));
}

/// Prefix every line of `inner` with `marker`.
pub(crate) fn prefix_lines(inner: &str, marker: &str, out: &mut String) {
    let lines: Vec<String> = inner
        .split('\n')
        .map(|l| format!("{marker}{l}").trim_end().to_owned())
        .collect();
    out.push_str(&lines.join("\n"));
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn item(body: &str) -> RenderedItem {
        RenderedItem {
            body: body.to_owned(),
            nested: Vec::new(),
        }
    }

    #[test]
    fn test_text_list_counts_from_start() {
        let list = RenderedList {
            kind: ListKind::Ordered { start: 3 },
            items: vec![item("c"), item("d")],
            indent: 3,
        };
        let mut out = String::new();
        text_list(&list, "-", &mut out);
        assert_eq!(out, "3. c\n4. d");
    }

    #[test]
    fn test_text_list_indents_nested() {
        let list = RenderedList {
            kind: ListKind::Unordered,
            items: vec![RenderedItem {
                body: "parent".to_owned(),
                nested: vec!["- child\n  - grandchild".to_owned()],
            }],
            indent: 2,
        };
        let mut out = String::new();
        text_list(&list, "-", &mut out);
        assert_eq!(out, "- parent\n  - child\n    - grandchild");
    }

    #[test]
    fn test_text_list_keeps_trailing_space_in_items() {
        let list = RenderedList {
            kind: ListKind::Unordered,
            items: vec![item("`a ` "), item("")],
            indent: 2,
        };
        let mut out = String::new();
        text_list(&list, "-", &mut out);
        assert_eq!(out, "- `a ` \n-");
    }

    #[test]
    fn test_text_list_huge_start_does_not_overflow() {
        let list = RenderedList {
            kind: ListKind::Ordered { start: u64::MAX },
            items: vec![item("a"), item("b")],
            indent: 2,
        };
        let mut out = String::new();
        text_list(&list, "-", &mut out);
        assert_eq!(out, format!("{n}. a\n{n}. b", n = u64::MAX));
    }

    #[test]
    fn test_prefix_lines() {
        let mut out = String::new();
        prefix_lines("one\n\ntwo", "> ", &mut out);
        assert_eq!(out, "> one\n>\n> two");
    }

    #[test]
    fn test_capabilities_of_every_dialect() {
        for dialect in Dialect::ALL {
            let caps = Capabilities::of(dialect);
            assert_eq!(
                caps.tables == TableMode::Native,
                matches!(
                    dialect,
                    Dialect::GenericMarkdown | Dialect::SymphonyMessageML | Dialect::Html
                )
            );
        }
        assert!(!Capabilities::of(Dialect::GenericMarkdown).supports_style(Style::Underline));
        assert!(Capabilities::of(Dialect::DiscordMarkdown).supports_style(Style::Underline));
        assert!(!Capabilities::of(Dialect::SymphonyMessageML).supports_broadcast(MentionKind::Here));
    }
}
