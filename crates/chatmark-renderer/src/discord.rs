//! Discord markdown backend.

use std::fmt::Write;

use chatmark_model::{Dialect, HeadingLevel, Link, Mention, MentionKind, Style};

use crate::backend::{Backend, Capabilities, RenderedList, TableMode, prefix_lines, text_list};
use crate::escape::{code_span, escape_discord, fenced_block};
use crate::markdown::{angle_mention, markdown_heading, markdown_link};

/// Discord render backend.
pub struct DiscordBackend;

impl Backend for DiscordBackend {
    const DIALECT: Dialect = Dialect::DiscordMarkdown;
    const CAPABILITIES: Capabilities = Capabilities {
        styles: &Style::ALL,
        headings: true,
        horizontal_rule: false,
        tables: TableMode::CodeBlockGrid,
        colspan: false,
        broadcasts: &[MentionKind::Everyone, MentionKind::Here],
        block_separator: "\n",
    };

    fn text(text: &str, out: &mut String) {
        out.push_str(&escape_discord(text));
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
            Style::Underline => "__",
        };
        write!(out, "{delimiter}{inner}{delimiter}").unwrap();
    }

    fn link(link: &Link, out: &mut String) {
        markdown_link(link, escape_discord, out);
    }

    /// Broadcasts are the bare `@everyone` / `@here` words; the rest use the
    /// angle-bracket tokens.
    fn mention(mention: &Mention, out: &mut String) {
        match mention.kind {
            MentionKind::Everyone => out.push_str("@everyone"),
            MentionKind::Here => out.push_str("@here"),
            _ => match angle_mention(mention) {
                Some(token) => out.push_str(&token),
                None => Self::text(&format!("@{}", mention.label()), out),
            },
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
}
