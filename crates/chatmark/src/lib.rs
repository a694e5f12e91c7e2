//! Build a rich-text chat message once, render it for every platform.
//!
//! This crate re-exports the workspace crates behind one dependency:
//! - [`chatmark_model`]: the node tree, [`DocumentBuilder`] and [`Dialect`]
//! - [`chatmark_renderer`]: per-dialect lowering ([`render`], [`Renderer`])
//! - [`chatmark_mentions`]: mention extraction from rendered text
//! - [`chatmark_config`]: `chatmark.toml` defaults
//!
//! and adds [`parse_markdown`] for importing Markdown written by people or
//! bots.
//!
//! # Example
//!
//! ```
//! use chatmark::{Dialect, DocumentBuilder, User, extract_ids, render};
//!
//! let ada = User::new("U1").with_name("Ada");
//! let mut b = DocumentBuilder::new();
//! b.bold("Deploy finished").text(", thanks ").mention(&ada);
//! let doc = b.build();
//!
//! assert_eq!(render(&doc, Dialect::SlackMrkdwn), "*Deploy finished*, thanks <@U1>");
//! assert_eq!(render(&doc, Dialect::PlainText), "Deploy finished, thanks @Ada");
//!
//! let sent = render(&doc, Dialect::DiscordMarkdown);
//! assert_eq!(extract_ids(&sent, Dialect::DiscordMarkdown), ["U1"]);
//! ```

mod markdown;

pub use chatmark_config::{Config, ConfigError, MentionsConfig, RenderConfig};
pub use chatmark_mentions::{
    Identifier, MatchKind, MentionExtractor, MentionMatch, extract, extract_channel_ids,
    extract_ids, mentions_user,
};
pub use chatmark_model::{
    Alignment, Cell, Channel, CodeBlock, Dialect, Document, DocumentBuilder, Heading,
    HeadingLevel, InsertionPoint, Link, List, ListItem, ListKind, Mention, MentionKind,
    MentionTarget, Node, Paragraph, Quote, Row, StructureError, Style, Styled, Table,
    UnsupportedDialectError, User,
};
pub use chatmark_renderer::{
    Capabilities, LayoutCell, RenderOptions, Renderer, TableLayout, TableMode, render,
    render_named, render_node, render_with,
};
pub use markdown::parse_markdown;
