//! HTML backend.
//!
//! Produces an HTML5 fragment: no `<html>` or `<body>` wrapper, blocks
//! concatenated without whitespace.

use std::fmt::Write;

use chatmark_model::{Alignment, Dialect, HeadingLevel, Link, ListKind, Mention, MentionKind, Style};

use crate::backend::{Backend, Capabilities, RenderedCell, RenderedList, RenderedTable, TableMode};
use crate::escape::escape_html;

/// HTML render backend.
///
/// Mentions become `<span class="mention">` elements carrying the kind and id
/// as data attributes, so a client can resolve them after delivery.
pub struct HtmlBackend;

impl Backend for HtmlBackend {
    const DIALECT: Dialect = Dialect::Html;
    const CAPABILITIES: Capabilities = Capabilities {
        styles: &Style::ALL,
        headings: true,
        horizontal_rule: true,
        tables: TableMode::Native,
        colspan: true,
        broadcasts: &[MentionKind::Everyone, MentionKind::Here],
        block_separator: "",
    };

    fn text(text: &str, out: &mut String) {
        out.push_str(&escape_html(text));
    }

    fn inline_code(code: &str, out: &mut String) {
        write!(out, "<code>{}</code>", escape_html(code)).unwrap();
    }

    fn code_block(lang: Option<&str>, code: &str, out: &mut String) {
        if let Some(lang) = lang {
            write!(
                out,
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                escape_html(lang),
                escape_html(code)
            )
            .unwrap();
        } else {
            write!(out, "<pre><code>{}</code></pre>", escape_html(code)).unwrap();
        }
    }

    fn style(style: Style, inner: &str, out: &mut String) {
        match style {
            Style::Bold => write!(out, "<strong>{inner}</strong>"),
            Style::Italic => write!(out, "<em>{inner}</em>"),
            Style::BoldItalic => write!(out, "<strong><em>{inner}</em></strong>"),
            Style::Strikethrough => write!(out, "<s>{inner}</s>"),
            Style::Underline => write!(out, "<u>{inner}</u>"),
        }
        .unwrap();
    }

    fn link(link: &Link, out: &mut String) {
        write!(
            out,
            r#"<a href="{}">{}</a>"#,
            escape_html(&link.url),
            escape_html(link.display())
        )
        .unwrap();
    }

    fn mention(mention: &Mention, out: &mut String) {
        let (kind, sigil) = match mention.kind {
            MentionKind::User => ("user", '@'),
            MentionKind::Channel => ("channel", '#'),
            MentionKind::Role => ("role", '@'),
            MentionKind::Everyone => ("everyone", '@'),
            MentionKind::Here => ("here", '@'),
        };
        let label = match mention.kind {
            MentionKind::Everyone => "everyone",
            MentionKind::Here => "here",
            _ => mention.label(),
        };
        write!(out, r#"<span class="mention" data-mention="{kind}""#).unwrap();
        if !mention.id.is_empty() {
            write!(out, r#" data-id="{}""#, escape_html(&mention.id)).unwrap();
        }
        if let Some(email) = &mention.email {
            write!(out, r#" data-email="{}""#, escape_html(email)).unwrap();
        }
        write!(out, ">{sigil}{}</span>", escape_html(label)).unwrap();
    }

    fn heading(level: HeadingLevel, inner: &str, out: &mut String) {
        let level = level.get();
        write!(out, "<h{level}>{inner}</h{level}>").unwrap();
    }

    fn paragraph(inner: &str, out: &mut String) {
        write!(out, "<p>{inner}</p>").unwrap();
    }

    fn quote(inner: &str, out: &mut String) {
        write!(out, "<blockquote>{inner}</blockquote>").unwrap();
    }

    fn list(list: &RenderedList, out: &mut String) {
        markup_list(list, out);
    }

    fn horizontal_rule(out: &mut String) {
        out.push_str("<hr>");
    }

    fn table(table: &RenderedTable<'_>, out: &mut String) {
        markup_table(table, escape_html, out);
    }
}

/// `<ul>` / `<ol>` markup shared with MessageML.
pub(crate) fn markup_list(list: &RenderedList, out: &mut String) {
    let tag = match list.kind {
        ListKind::Unordered => "ul",
        ListKind::Ordered { .. } => "ol",
    };
    out.push('<');
    out.push_str(tag);
    if let ListKind::Ordered { start } = list.kind
        && start != 1
    {
        write!(out, r#" start="{start}""#).unwrap();
    }
    out.push('>');
    for item in &list.items {
        out.push_str("<li>");
        out.push_str(&item.body);
        for nested in &item.nested {
            out.push_str(nested);
        }
        out.push_str("</li>");
    }
    write!(out, "</{tag}>").unwrap();
}

fn alignment_style(alignment: Alignment) -> &'static str {
    match alignment {
        Alignment::Left => r#" style="text-align:left""#,
        Alignment::Center => r#" style="text-align:center""#,
        Alignment::Right => r#" style="text-align:right""#,
    }
}

fn markup_row(cells: &[RenderedCell], tag: &str, alignments: &[Alignment], out: &mut String) {
    out.push_str("<tr>");
    let mut col = 0;
    for cell in cells {
        let style = alignments.get(col).copied().map_or("", alignment_style);
        write!(out, "<{tag}{style}").unwrap();
        if cell.span > 1 {
            write!(out, r#" colspan="{}""#, cell.span).unwrap();
        }
        write!(out, ">{}</{tag}>", cell.content).unwrap();
        col += cell.span;
    }
    out.push_str("</tr>");
}

/// Native table markup shared with MessageML.
pub(crate) fn markup_table(table: &RenderedTable<'_>, escape: fn(&str) -> String, out: &mut String) {
    out.push_str("<table>");
    if let Some(caption) = table.caption {
        write!(out, "<caption>{}</caption>", escape(caption)).unwrap();
    }
    out.push_str("<thead>");
    markup_row(&table.header, "th", table.alignments, out);
    out.push_str("</thead>");
    if !table.rows.is_empty() {
        out.push_str("<tbody>");
        for row in &table.rows {
            markup_row(row, "td", table.alignments, out);
        }
        out.push_str("</tbody>");
    }
    out.push_str("</table>");
}

#[cfg(test)]
mod tests {
    use chatmark_model::{Cell, Document, DocumentBuilder, ListItem, Node, Row, Table, User};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{render, render_node};

    fn html(node: &Node) -> String {
        render_node(node, Dialect::Html)
    }

    #[test]
    fn test_code_block_with_language() {
        let mut out = String::new();
        HtmlBackend::code_block(Some("rust"), "fn main() {}", &mut out);
        assert_eq!(
            out,
            r#"<pre><code class="language-rust">fn main() {}</code></pre>"#
        );
    }

    #[test]
    fn test_code_block_without_language() {
        let mut out = String::new();
        HtmlBackend::code_block(None, "a < b", &mut out);
        assert_eq!(out, "<pre><code>a &lt; b</code></pre>");
    }

    #[test]
    fn test_mentions() {
        let ada = User::new("U1").with_name("Ada");
        assert_eq!(
            html(&Node::mention(&ada)),
            r#"<span class="mention" data-mention="user" data-id="U1">@Ada</span>"#
        );
        assert_eq!(
            html(&Node::mention(Mention::here())),
            r#"<span class="mention" data-mention="here">@here</span>"#
        );
        assert_eq!(
            html(&Node::mention(Mention::email("a@b.c"))),
            r#"<span class="mention" data-mention="user" data-email="a@b.c">@a@b.c</span>"#
        );
    }

    #[test]
    fn test_text_and_link_escaping() {
        let para = Node::paragraph(vec![
            Node::text("Tom & 'Jerry' <3"),
            Node::link("https://a.io/?q=1&r=2", Some("<link>")),
        ])
        .unwrap();
        assert_eq!(
            html(&para),
            r#"<p>Tom &amp; &#x27;Jerry&#x27; &lt;3<a href="https://a.io/?q=1&amp;r=2">&lt;link&gt;</a></p>"#
        );
    }

    #[test]
    fn test_nested_ordered_list() {
        let nested = Node::unordered_list(vec![ListItem::text("b")]);
        let list = Node::List(chatmark_model::List::new(
            ListKind::ordered_from(3).unwrap(),
            vec![ListItem::new(vec![Node::text("a"), nested]).unwrap()],
        ));
        assert_eq!(
            html(&list),
            r#"<ol start="3"><li>a<ul><li>b</li></ul></li></ol>"#
        );
    }

    #[test]
    fn test_table_with_span_and_alignment() {
        let table = Table::new(
            Row::from_texts(["A", "B"]),
            vec![Row::new(vec![Cell::text("ab").spanning(2).unwrap()])],
        )
        .unwrap()
        .with_alignments(vec![Alignment::Center, Alignment::Right])
        .unwrap()
        .with_caption("T");
        assert_eq!(
            html(&Node::table(table)),
            concat!(
                "<table><caption>T</caption>",
                r#"<thead><tr><th style="text-align:center">A</th><th style="text-align:right">B</th></tr></thead>"#,
                r#"<tbody><tr><td style="text-align:center" colspan="2">ab</td></tr></tbody>"#,
                "</table>"
            )
        );
    }

    #[test]
    fn test_document_fragment() {
        let mut b = DocumentBuilder::new();
        b.heading(2, "Hi").unwrap();
        b.quote().bold("note");
        b.horizontal_rule();
        let doc: Document = b.build();
        assert_eq!(
            render(&doc, Dialect::Html),
            "<h2>Hi</h2><blockquote><strong>note</strong></blockquote><hr>"
        );
    }
}
