//! Lowering of [`chatmark_model`] documents to chat platform markup.
//!
//! # Architecture
//!
//! A single generic tree walk handles traversal, block joining and every
//! fallback. Each dialect contributes a [`Backend`]: static writers for the
//! pieces, plus [`Capabilities`] naming what the dialect lacks.
//!
//! - [`MarkdownBackend`]: CommonMark with pipe tables
//! - [`SlackBackend`]: Slack `mrkdwn`
//! - [`DiscordBackend`]: Discord markdown
//! - [`SymphonyBackend`]: Symphony MessageML
//! - [`HtmlBackend`]: HTML fragment
//! - [`PlainTextBackend`]: unstyled text
//!
//! Dialects without native tables go through [`TableLayout`].
//!
//! # Example
//!
//! ```
//! use chatmark_model::{Dialect, Mention, Node};
//! use chatmark_renderer::render_node;
//!
//! let mention = Node::mention(Mention::user("U1"));
//! assert_eq!(render_node(&mention, Dialect::SlackMrkdwn), "<@U1>");
//! assert_eq!(render_node(&mention, Dialect::SymphonyMessageML), r#"<mention uid="U1"/>"#);
//! ```

mod backend;
mod discord;
mod escape;
mod html;
mod layout;
mod markdown;
mod plain;
mod renderer;
mod slack;
mod symphony;

pub use backend::{
    Backend, Capabilities, RenderedCell, RenderedItem, RenderedList, RenderedTable, TableMode,
};
pub use discord::DiscordBackend;
pub use escape::{
    escape_discord, escape_html, escape_markdown, escape_slack, escape_slack_control, escape_xml,
};
pub use html::HtmlBackend;
pub use layout::{LayoutCell, TableLayout};
pub use markdown::MarkdownBackend;
pub use plain::PlainTextBackend;
pub use renderer::{RenderOptions, Renderer, render, render_named, render_node, render_with};
pub use slack::SlackBackend;
pub use symphony::SymphonyBackend;
