//! Platform-neutral rich-text document model.
//!
//! A [`Document`] is an immutable tree of [`Node`]s: inline nodes (text,
//! styles, code, links, mentions) nested inside block nodes (headings,
//! paragraphs, lists, quotes, tables, code blocks, rules). Every constructor
//! that could break a structural rule returns a [`StructureError`], so a tree
//! that exists is a tree every renderer can handle.
//!
//! # Example
//!
//! ```
//! use chatmark_model::{DocumentBuilder, User};
//!
//! let ada = User::new("U1").with_name("Ada");
//! let mut builder = DocumentBuilder::new();
//! builder.text("Hello ").mention(&ada).text("!");
//! builder.unordered_list(["first", "second"]);
//! let doc = builder.build();
//!
//! assert_eq!(doc.blocks().len(), 2);
//! assert_eq!(doc.mentions()[0].id, "U1");
//! ```

mod builder;
mod dialect;
mod document;
mod error;
mod identity;
mod node;
mod table;

pub use builder::{DocumentBuilder, InsertionPoint};
pub use dialect::Dialect;
pub use document::Document;
pub use error::{StructureError, UnsupportedDialectError};
pub use identity::{Channel, MentionTarget, User};
pub use node::{
    CodeBlock, Heading, HeadingLevel, Link, List, ListItem, ListKind, Mention, MentionKind, Node,
    Paragraph, Quote, Style, Styled,
};
pub use table::{Alignment, Cell, Row, Table};
