//! CommonMark backend with GitHub pipe tables.

use std::fmt::Write;

use chatmark_model::{Alignment, Dialect, HeadingLevel, Link, Mention, MentionKind, Style};

use crate::backend::{
    Backend, Capabilities, RenderedList, RenderedTable, TableMode, prefix_lines, text_list,
};
use crate::escape::{code_span, escape_markdown, fenced_block};

/// Generic Markdown render backend.
pub struct MarkdownBackend;

impl Backend for MarkdownBackend {
    const DIALECT: Dialect = Dialect::GenericMarkdown;
    const CAPABILITIES: Capabilities = Capabilities {
        styles: &[Style::Bold, Style::Italic, Style::BoldItalic, Style::Strikethrough],
        headings: true,
        horizontal_rule: true,
        tables: TableMode::Native,
        colspan: false,
        broadcasts: &[MentionKind::Everyone, MentionKind::Here],
        block_separator: "\n\n",
    };

    fn text(text: &str, out: &mut String) {
        out.push_str(&escape_markdown(text));
    }

    fn inline_code(code: &str, out: &mut String) {
        code_span(code, out);
    }

    fn code_block(lang: Option<&str>, code: &str, out: &mut String) {
        fenced_block(lang, code, out);
    }

    fn style(style: Style, inner: &str, out: &mut String) {
        let delimiter = match style {
            Style::Bold => "**",
            Style::Italic => "*",
            Style::BoldItalic => "***",
            Style::Strikethrough => "~~",
            Style::Underline => "",
        };
        write!(out, "{delimiter}{inner}{delimiter}").unwrap();
    }

    fn link(link: &Link, out: &mut String) {
        markdown_link(link, escape_markdown, out);
    }

    fn mention(mention: &Mention, out: &mut String) {
        match angle_mention(mention) {
            Some(token) => out.push_str(&token),
            None => Self::text(&format!("@{}", mention.label()), out),
        }
    }

    fn heading(level: HeadingLevel, inner: &str, out: &mut String) {
        markdown_heading(level, inner, out);
    }

    fn paragraph(inner: &str, out: &mut String) {
        out.push_str(inner);
    }

    fn quote(inner: &str, out: &mut String) {
        prefix_lines(inner, "> ", out);
    }

    fn list(list: &RenderedList, out: &mut String) {
        text_list(list, "-", out);
    }

    fn horizontal_rule(out: &mut String) {
        out.push_str("---");
    }

    fn table(table: &RenderedTable<'_>, out: &mut String) {
        if let Some(caption) = table.caption {
            out.push_str(&escape_markdown(caption));
            out.push_str("\n\n");
        }
        pipe_row(table.header.iter().map(|c| c.content.as_str()), out);
        out.push('\n');
        out.push('|');
        for alignment in table.alignments {
            out.push_str(match alignment {
                Alignment::Left => " :--- |",
                Alignment::Center => " :---: |",
                Alignment::Right => " ---: |",
            });
        }
        for row in &table.rows {
            out.push('\n');
            pipe_row(row.iter().map(|c| c.content.as_str()), out);
        }
    }
}

fn pipe_row<'a>(cells: impl Iterator<Item = &'a str>, out: &mut String) {
    out.push('|');
    for cell in cells {
        write!(out, " {} |", cell.replace('\n', " ")).unwrap();
    }
}

/// `[label](url)`, using the URL as label when none is given.
pub(crate) fn markdown_link(link: &Link, escape: fn(&str) -> String, out: &mut String) {
    let url = if link.url.contains([' ', '(', ')']) {
        format!("<{}>", link.url)
    } else {
        link.url.clone()
    };
    write!(out, "[{}]({url})", escape(link.display())).unwrap();
}

pub(crate) fn markdown_heading(level: HeadingLevel, inner: &str, out: &mut String) {
    for _ in 0..level.get() {
        out.push('#');
    }
    out.push(' ');
    out.push_str(inner);
}

/// Angle-bracket mention token, or `None` when the mention has no id.
///
/// Users are `<@id>`, channels `<#id>`, roles `<@&id>`, and broadcasts
/// `<!everyone>` / `<!here>`.
pub(crate) fn angle_mention(mention: &Mention) -> Option<String> {
    let token = match mention.kind {
        MentionKind::Everyone => "<!everyone>".to_owned(),
        MentionKind::Here => "<!here>".to_owned(),
        _ if mention.id.is_empty() => return None,
        MentionKind::User => format!("<@{}>", mention.id),
        MentionKind::Channel => format!("<#{}>", mention.id),
        MentionKind::Role => format!("<@&{}>", mention.id),
    };
    Some(token)
}

#[cfg(test)]
mod tests {
    use chatmark_model::{Document, DocumentBuilder, Node, Table};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{render, render_node};

    #[test]
    fn test_scenario_styles() {
        let mut b = DocumentBuilder::new();
        b.bold("Important").text(": check ").italic("this");
        assert_eq!(
            render(&b.build(), Dialect::GenericMarkdown),
            "**Important**: check *this*"
        );
    }

    #[test]
    fn test_mentions() {
        let r = |m: Mention| render_node(&Node::mention(m), Dialect::GenericMarkdown);
        assert_eq!(r(Mention::user("U1")), "<@U1>");
        assert_eq!(r(Mention::channel("C1")), "<#C1>");
        assert_eq!(r(Mention::role("R1")), "<@&R1>");
        assert_eq!(r(Mention::everyone()), "<!everyone>");
        assert_eq!(r(Mention::here()), "<!here>");
        assert_eq!(r(Mention::email("a_b@x.io")), r"@a\_b@x.io");
    }

    #[test]
    fn test_links() {
        let r = |url: &str, label: Option<&str>| {
            render_node(&Node::link(url, label), Dialect::GenericMarkdown)
        };
        assert_eq!(r("https://a.io", Some("A [x]")), r"[A \[x\]](https://a.io)");
        assert_eq!(r("https://a.io", None), "[https://a.io](https://a.io)");
        assert_eq!(r("https://a.io/a b", Some("s")), "[s](<https://a.io/a b>)");
    }

    #[test]
    fn test_blocks_are_separated_by_blank_line() {
        let mut b = DocumentBuilder::new();
        b.heading(1, "Title").unwrap();
        b.paragraph().text("Body");
        b.quote().text("line one\nline two");
        b.ordered_list(["a", "b"]);
        b.horizontal_rule();
        b.code_block("fn main() {}", Some("rust"));
        assert_eq!(
            render(&b.build(), Dialect::GenericMarkdown),
            "\
# Title

Body

> line one
> line two

1. a
2. b

---

```rust
fn main() {}
```"
        );
    }

    #[test]
    fn test_pipe_table_with_alignment() {
        let table = Table::from_strings(&["Name", "Qty"], &[vec!["a|b", "2"]])
            .unwrap()
            .with_alignments(vec![Alignment::Left, Alignment::Right])
            .unwrap();
        let doc = Document::from_blocks(vec![Node::table(table)]).unwrap();
        assert_eq!(
            render(&doc, Dialect::GenericMarkdown),
            "| Name | Qty |\n| :--- | ---: |\n| a\\|b | 2 |"
        );
    }

    #[test]
    fn test_inline_code_is_not_escaped() {
        let node = Node::paragraph(vec![Node::text("*a*"), Node::code("*a*")]).unwrap();
        assert_eq!(render_node(&node, Dialect::GenericMarkdown), r"\*a\*`*a*`");
    }
}
