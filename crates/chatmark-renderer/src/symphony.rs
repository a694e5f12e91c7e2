//! Symphony MessageML backend.
//!
//! MessageML is XML: every text run is entity-escaped and every element is
//! closed. User mentions are `<mention uid="..."/>` or, for users known only
//! by address, `<mention email="..."/>`. There is no channel or role mention
//! element, so those render as `#name` / `@name` text.

use std::fmt::Write;

use chatmark_model::{Dialect, HeadingLevel, Link, Mention, MentionKind, Style};

use crate::backend::{Backend, Capabilities, RenderedList, RenderedTable, TableMode};
use crate::escape::escape_xml;
use crate::html::{markup_list, markup_table};
use crate::renderer::RenderOptions;

/// Symphony render backend.
pub struct SymphonyBackend;

impl Backend for SymphonyBackend {
    const DIALECT: Dialect = Dialect::SymphonyMessageML;
    const CAPABILITIES: Capabilities = Capabilities {
        styles: &[Style::Bold, Style::Italic, Style::BoldItalic, Style::Underline],
        headings: true,
        horizontal_rule: true,
        tables: TableMode::Native,
        colspan: true,
        broadcasts: &[MentionKind::Everyone],
        block_separator: "",
    };

    fn text(text: &str, out: &mut String) {
        out.push_str(&escape_xml(text));
    }

    fn inline_code(code: &str, out: &mut String) {
        write!(out, "<code>{}</code>", escape_xml(code)).unwrap();
    }

    fn code_block(lang: Option<&str>, code: &str, out: &mut String) {
        match lang {
            Some(lang) => write!(
                out,
                r#"<code language="{}">{}</code>"#,
                escape_xml(lang),
                escape_xml(code)
            ),
            None => write!(out, "<pre>{}</pre>", escape_xml(code)),
        }
        .unwrap();
    }

    fn style(style: Style, inner: &str, out: &mut String) {
        match style {
            Style::Bold => write!(out, "<b>{inner}</b>"),
            Style::Italic => write!(out, "<i>{inner}</i>"),
            Style::BoldItalic => write!(out, "<b><i>{inner}</i></b>"),
            Style::Underline => write!(out, "<u>{inner}</u>"),
            Style::Strikethrough => write!(out, "{inner}"),
        }
        .unwrap();
    }

    fn link(link: &Link, out: &mut String) {
        write!(
            out,
            r#"<a href="{}">{}</a>"#,
            escape_xml(&link.url),
            escape_xml(link.display())
        )
        .unwrap();
    }

    fn mention(mention: &Mention, out: &mut String) {
        match (mention.kind, mention.id.is_empty(), &mention.email) {
            (MentionKind::Everyone, _, _) => out.push_str(r#"<mention uid="all"/>"#),
            (MentionKind::User, false, _) => {
                write!(out, r#"<mention uid="{}"/>"#, escape_xml(&mention.id)).unwrap();
            }
            (MentionKind::User, true, Some(email)) => {
                write!(out, r#"<mention email="{}"/>"#, escape_xml(email)).unwrap();
            }
            (MentionKind::Channel, _, _) => Self::text(&format!("#{}", mention.label()), out),
            (MentionKind::Here, _, _) => Self::text("@here", out),
            _ => Self::text(&format!("@{}", mention.label()), out),
        }
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
        out.push_str("<hr/>");
    }

    fn table(table: &RenderedTable<'_>, out: &mut String) {
        markup_table(table, escape_xml, out);
    }

    fn document(body: &str, options: &RenderOptions, out: &mut String) {
        if options.message_ml_envelope {
            write!(out, "<messageML>{body}</messageML>").unwrap();
        } else {
            out.push_str(body);
        }
    }
}
