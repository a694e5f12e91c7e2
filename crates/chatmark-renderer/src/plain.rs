//! Plain text backend: the read-aloud projection.
//!
//! Nothing is escaped and every piece of markup is dropped. Inline runs are
//! concatenated as-is, blocks are joined by single newlines.

use std::fmt::Write;

use chatmark_model::{Dialect, Link, Mention, MentionKind, Style};

use crate::backend::{Backend, Capabilities, RenderedList, TableMode};

/// Plain text render backend.
pub struct PlainTextBackend;

impl Backend for PlainTextBackend {
    const DIALECT: Dialect = Dialect::PlainText;
    const CAPABILITIES: Capabilities = Capabilities {
        styles: &[],
        headings: false,
        horizontal_rule: false,
        tables: TableMode::PlainGrid,
        colspan: false,
        broadcasts: &[MentionKind::Everyone, MentionKind::Here],
        block_separator: "\n",
    };

    fn text(text: &str, out: &mut String) {
        out.push_str(text);
    }

    fn inline_code(code: &str, out: &mut String) {
        out.push_str(code);
    }

    fn code_block(_lang: Option<&str>, code: &str, out: &mut String) {
        out.push_str(code.strip_suffix('\n').unwrap_or(code));
    }

    fn style(_style: Style, inner: &str, out: &mut String) {
        out.push_str(inner);
    }

    /// `label (url)`, or just the URL when there is no distinct label.
    fn link(link: &Link, out: &mut String) {
        match &link.label {
            Some(label) if *label != link.url => write!(out, "{label} ({})", link.url).unwrap(),
            _ => out.push_str(&link.url),
        }
    }

    fn mention(mention: &Mention, out: &mut String) {
        match mention.kind {
            MentionKind::Everyone => out.push_str("@everyone"),
            MentionKind::Here => out.push_str("@here"),
            MentionKind::Channel => write!(out, "#{}", mention.label()).unwrap(),
            MentionKind::User | MentionKind::Role => write!(out, "@{}", mention.label()).unwrap(),
        }
    }

    fn paragraph(inner: &str, out: &mut String) {
        out.push_str(inner);
    }

    fn quote(inner: &str, out: &mut String) {
        out.push_str(inner);
    }

    /// One line per item, nested lists indented, no markers.
    fn list(list: &RenderedList, out: &mut String) {
        let pad = " ".repeat(list.indent);
        let mut lines: Vec<String> = Vec::new();
        for item in &list.items {
            lines.extend(item.body.lines().map(str::to_owned));
            for nested in &item.nested {
                lines.extend(nested.lines().map(|l| format!("{pad}{l}")));
            }
        }
        out.push_str(&lines.join("\n"));
    }
}

#[cfg(test)]
mod tests {
    use chatmark_model::{DocumentBuilder, ListKind, Node, Table, User};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{render, render_node};

    #[test]
    fn test_scenario_styles() {
        let mut b = DocumentBuilder::new();
        b.bold("Important").text(": check ").italic("this");
        assert_eq!(render(&b.build(), Dialect::PlainText), "Important: check this");
    }

    #[test]
    fn test_markup_is_stripped_not_escaped() {
        let mut b = DocumentBuilder::new();
        b.heading(1, "Title *").unwrap();
        b.quote().text("<quoted> & ").code("`x`");
        b.paragraph()
            .mention(&User::new("U1").with_name("Ada"))
            .text(" see ")
            .link("https://a.io", Some("docs"));
        b.code_block("raw\n", Some("sh"));
        assert_eq!(
            render(&b.build(), Dialect::PlainText),
            "Title *\n<quoted> & `x`\n@Ada see docs (https://a.io)\nraw"
        );
    }

    #[test]
    fn test_scenario_table() {
        let table = Table::from_strings(&["A", "B"], &[vec!["1", "2"]]).unwrap();
        assert_eq!(render_node(&Node::table(table), Dialect::PlainText), "A  B\n1  2");
    }

    #[test]
    fn test_lists_drop_markers() {
        let mut b = DocumentBuilder::new();
        b.ordered_list(["one", "two"])
            .nested_list(ListKind::Unordered, ["deep"])
            .unwrap();
        assert_eq!(render(&b.build(), Dialect::PlainText), "one\ntwo\n  deep");
    }

    #[test]
    fn test_link_without_label_is_url() {
        assert_eq!(
            render_node(&Node::link("https://a.io", None), Dialect::PlainText),
            "https://a.io"
        );
    }
}
