//! Slack `mrkdwn` backend.
//!
//! mrkdwn has no headings, rules or tables: headings become bold lines and
//! tables become a monospaced grid in a code block.

use std::fmt::Write;

use chatmark_model::{Dialect, Link, Mention, MentionKind, Style};

use crate::backend::{Backend, Capabilities, RenderedList, TableMode, prefix_lines, text_list};
use crate::escape::{code_span, escape_slack, escape_slack_control, fenced_block};

/// Slack render backend.
pub struct SlackBackend;

impl Backend for SlackBackend {
    const DIALECT: Dialect = Dialect::SlackMrkdwn;
    const CAPABILITIES: Capabilities = Capabilities {
        styles: &[Style::Bold, Style::Italic, Style::BoldItalic, Style::Strikethrough],
        headings: false,
        horizontal_rule: false,
        tables: TableMode::CodeBlockGrid,
        colspan: false,
        broadcasts: &[MentionKind::Everyone, MentionKind::Here],
        block_separator: "\n",
    };

    fn text(text: &str, out: &mut String) {
        out.push_str(&escape_slack(text));
    }

    fn inline_code(code: &str, out: &mut String) {
        code_span(code, out);
    }

    /// Slack ignores fence info strings, so the language is dropped.
    fn code_block(_lang: Option<&str>, code: &str, out: &mut String) {
        fenced_block(None, code, out);
    }

    fn style(style: Style, inner: &str, out: &mut String) {
        match style {
            Style::Bold => write!(out, "*{inner}*"),
            Style::Italic => write!(out, "_{inner}_"),
            Style::BoldItalic => write!(out, "*_{inner}_*"),
            Style::Strikethrough => write!(out, "~{inner}~"),
            Style::Underline => write!(out, "{inner}"),
        }
        .unwrap();
    }

    /// `<url|label>`. A `|` in the URL is percent-encoded so it cannot end
    /// the URL part early.
    fn link(link: &Link, out: &mut String) {
        let url = escape_slack_control(&link.url).replace('|', "%7C");
        match &link.label {
            Some(label) => write!(out, "<{url}|{}>", escape_slack(label)).unwrap(),
            None => write!(out, "<{url}>").unwrap(),
        }
    }

    fn mention(mention: &Mention, out: &mut String) {
        let id = &mention.id;
        match mention.kind {
            MentionKind::Everyone => out.push_str("<!everyone>"),
            MentionKind::Here => out.push_str("<!here>"),
            _ if id.is_empty() => Self::text(&format!("@{}", mention.label()), out),
            MentionKind::User => write!(out, "<@{id}>").unwrap(),
            MentionKind::Channel => match &mention.name {
                Some(name) => write!(out, "<#{id}|{}>", escape_slack_control(name)).unwrap(),
                None => write!(out, "<#{id}>").unwrap(),
            },
            MentionKind::Role => write!(out, "<!subteam^{id}>").unwrap(),
        }
    }

    fn paragraph(inner: &str, out: &mut String) {
        out.push_str(inner);
    }

    fn quote(inner: &str, out: &mut String) {
        prefix_lines(inner, "> ", out);
    }

    fn list(list: &RenderedList, out: &mut String) {
        text_list(list, "•", out);
    }
}

#[cfg(test)]
mod tests {
    use chatmark_model::{Channel, DocumentBuilder, Node};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{render, render_node};

    fn slack(node: &Node) -> String {
        render_node(node, Dialect::SlackMrkdwn)
    }

    #[test]
    fn test_styles() {
        assert_eq!(slack(&Node::styled_text(Style::Bold, "b")), "*b*");
        assert_eq!(slack(&Node::styled_text(Style::Italic, "i")), "_i_");
        assert_eq!(slack(&Node::styled_text(Style::BoldItalic, "x")), "*_x_*");
        assert_eq!(slack(&Node::styled_text(Style::Strikethrough, "s")), "~s~");
    }

    #[test]
    fn test_mentions() {
        assert_eq!(slack(&Node::mention("U1")), "<@U1>");
        assert_eq!(slack(&Node::mention(Mention::channel("C1"))), "<#C1>");
        assert_eq!(
            slack(&Node::mention(&Channel::new("C1").with_name("general"))),
            "<#C1|general>"
        );
        assert_eq!(slack(&Node::mention(Mention::role("S1"))), "<!subteam^S1>");
        assert_eq!(slack(&Node::mention(Mention::everyone())), "<!everyone>");
        assert_eq!(slack(&Node::mention(Mention::here())), "<!here>");
    }

    #[test]
    fn test_links() {
        assert_eq!(
            slack(&Node::link("https://a.io", Some("A & B"))),
            "<https://a.io|A &amp; B>"
        );
        assert_eq!(slack(&Node::link("https://a.io", None)), "<https://a.io>");
        assert_eq!(
            slack(&Node::link("https://a.io/?a=1&b=<2>|3", Some("x"))),
            "<https://a.io/?a=1&amp;b=&lt;2&gt;%7C3|x>"
        );
    }

    #[test]
    fn test_channel_name_cannot_close_token() {
        assert_eq!(
            slack(&Node::mention(&Channel::new("C1").with_name("a>b & c"))),
            "<#C1|a&gt;b &amp; c>"
        );
    }

    #[test]
    fn test_text_cannot_forge_mentions() {
        assert_eq!(slack(&Node::text("<@U1> *hi*")), r"&lt;@U1&gt; \*hi\*");
    }

    #[test]
    fn test_document_layout() {
        let mut b = DocumentBuilder::new();
        b.heading(1, "Deploy").unwrap();
        b.unordered_list(["api", "web"]);
        b.quote().text("ship it");
        b.code_block("make deploy", Some("sh"));
        assert_eq!(
            render(&b.build(), Dialect::SlackMrkdwn),
            "*Deploy*\n• api\n• web\n> ship it\n```\nmake deploy\n```"
        );
    }
}
