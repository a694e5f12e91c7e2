//! Rich-text node tree.
//!
//! [`Node`] is a closed set of variants. Variants that carry structural
//! invariants wrap a struct with private fields, so the only way to build
//! them is through the validated constructors below.

use crate::error::StructureError;
use crate::identity::MentionTarget;
use crate::table::Table;

/// Inline style wrapping exactly one child.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Style {
    Bold,
    Italic,
    BoldItalic,
    Strikethrough,
    Underline,
}

impl Style {
    pub const ALL: [Self; 5] = [
        Self::Bold,
        Self::Italic,
        Self::BoldItalic,
        Self::Strikethrough,
        Self::Underline,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::BoldItalic => "bold italic",
            Self::Strikethrough => "strikethrough",
            Self::Underline => "underline",
        }
    }
}

/// One element of a rich-text document.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Node {
    /// Literal text run.
    Text(String),
    /// Bold, italic, bold italic, strikethrough or underline span.
    Styled(Styled),
    /// Inline code.
    Code(String),
    /// Fenced code block.
    CodeBlock(CodeBlock),
    /// Hyperlink.
    Link(Link),
    /// Reference to a user, channel, role or broadcast target.
    Mention(Mention),
    /// Heading of level 1 to 3.
    Heading(Heading),
    /// Paragraph of inline content.
    Paragraph(Paragraph),
    /// Ordered or unordered list.
    List(List),
    /// Block quote of inline content.
    Quote(Quote),
    /// Thematic break.
    HorizontalRule,
    /// Table with a header row.
    Table(Table),
}

impl Node {
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    #[must_use]
    pub fn code(code: impl Into<String>) -> Self {
        Self::Code(code.into())
    }

    #[must_use]
    pub fn code_block(code: impl Into<String>, language: Option<&str>) -> Self {
        Self::CodeBlock(CodeBlock {
            code: code.into(),
            language: language.filter(|l| !l.is_empty()).map(str::to_owned),
        })
    }

    #[must_use]
    pub fn link(url: impl Into<String>, label: Option<&str>) -> Self {
        Self::Link(Link {
            url: url.into(),
            label: label.map(str::to_owned),
        })
    }

    #[must_use]
    pub fn mention(mention: impl Into<Mention>) -> Self {
        Self::Mention(mention.into())
    }

    /// Wrap an inline node in a style.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::InvalidChild`] if `child` is a block.
    pub fn styled(style: Style, child: Node) -> Result<Self, StructureError> {
        require_inline(style.name(), std::slice::from_ref(&child))?;
        Ok(Self::Styled(Styled {
            style,
            child: Box::new(child),
        }))
    }

    /// Styled text run. Never fails since text is always inline.
    #[must_use]
    pub fn styled_text(style: Style, text: impl Into<String>) -> Self {
        Self::Styled(Styled {
            style,
            child: Box::new(Self::text(text)),
        })
    }

    /// Heading of `level` 1, 2 or 3.
    pub fn heading(level: u8, children: Vec<Node>) -> Result<Self, StructureError> {
        let level = HeadingLevel::try_from(level)?;
        require_inline("heading", &children)?;
        Ok(Self::Heading(Heading { level, children }))
    }

    pub fn paragraph(children: Vec<Node>) -> Result<Self, StructureError> {
        require_inline("paragraph", &children)?;
        Ok(Self::Paragraph(Paragraph { children }))
    }

    pub fn quote(children: Vec<Node>) -> Result<Self, StructureError> {
        require_inline("quote", &children)?;
        Ok(Self::Quote(Quote { children }))
    }

    #[must_use]
    pub fn unordered_list(items: Vec<ListItem>) -> Self {
        Self::List(List {
            kind: ListKind::Unordered,
            items,
        })
    }

    #[must_use]
    pub fn ordered_list(items: Vec<ListItem>) -> Self {
        Self::List(List {
            kind: ListKind::Ordered { start: 1 },
            items,
        })
    }

    #[must_use]
    pub fn horizontal_rule() -> Self {
        Self::HorizontalRule
    }

    #[must_use]
    pub fn table(table: Table) -> Self {
        Self::Table(table)
    }

    /// Inline nodes may appear inside paragraphs, headings, quotes, cells and styles.
    #[must_use]
    pub fn is_inline(&self) -> bool {
        matches!(
            self,
            Self::Text(_) | Self::Styled(_) | Self::Code(_) | Self::Link(_) | Self::Mention(_)
        )
    }

    /// Short kind name used in error messages and logs.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Styled(s) => s.style.name(),
            Self::Code(_) => "code",
            Self::CodeBlock(_) => "code block",
            Self::Link(_) => "link",
            Self::Mention(_) => "mention",
            Self::Heading(_) => "heading",
            Self::Paragraph(_) => "paragraph",
            Self::List(_) => "list",
            Self::Quote(_) => "quote",
            Self::HorizontalRule => "horizontal rule",
            Self::Table(_) => "table",
        }
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Self::text(text)
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// Fail with [`StructureError::InvalidChild`] on the first block child.
pub(crate) fn require_inline(
    container: &'static str,
    children: &[Node],
) -> Result<(), StructureError> {
    match children.iter().find(|c| !c.is_inline()) {
        Some(child) => Err(StructureError::InvalidChild {
            container,
            child: child.kind_name(),
        }),
        None => Ok(()),
    }
}

/// A styled inline span.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Styled {
    style: Style,
    child: Box<Node>,
}

impl Styled {
    #[must_use]
    pub fn style(&self) -> Style {
        self.style
    }

    #[must_use]
    pub fn child(&self) -> &Node {
        &self.child
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CodeBlock {
    pub code: String,
    /// Info string such as `rust`. Never empty when present.
    pub language: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Link {
    pub url: String,
    pub label: Option<String>,
}

impl Link {
    /// Visible text: the label, or the URL when no label was given.
    #[must_use]
    pub fn display(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.url)
    }
}

/// What a mention points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MentionKind {
    User,
    Channel,
    Role,
    /// Everyone in the workspace or room.
    Everyone,
    /// Everyone currently online.
    Here,
}

impl MentionKind {
    /// Broadcast kinds carry no target id.
    #[must_use]
    pub fn is_special(self) -> bool {
        matches!(self, Self::Everyone | Self::Here)
    }
}

/// A mention node.
///
/// The id may be unresolved: renderers fall back to id-based syntax and never
/// require the name or email.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mention {
    pub kind: MentionKind,
    /// Platform id. Empty for broadcast mentions and email-only users.
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl Mention {
    fn bare(kind: MentionKind, id: String) -> Self {
        Self {
            kind,
            id,
            name: None,
            email: None,
        }
    }

    #[must_use]
    pub fn user(id: impl Into<String>) -> Self {
        Self::bare(MentionKind::User, id.into())
    }

    #[must_use]
    pub fn channel(id: impl Into<String>) -> Self {
        Self::bare(MentionKind::Channel, id.into())
    }

    #[must_use]
    pub fn role(id: impl Into<String>) -> Self {
        Self::bare(MentionKind::Role, id.into())
    }

    #[must_use]
    pub fn everyone() -> Self {
        Self::bare(MentionKind::Everyone, String::new())
    }

    #[must_use]
    pub fn here() -> Self {
        Self::bare(MentionKind::Here, String::new())
    }

    /// User known only by email address.
    #[must_use]
    pub fn email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Self::user(String::new())
        }
    }

    /// Mention a resolved identity.
    pub fn of<T: MentionTarget + ?Sized>(target: &T) -> Self {
        Self {
            kind: target.mention_kind(),
            id: target.id().to_owned(),
            name: target.display_name().map(str::to_owned),
            email: target.email().map(str::to_owned),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Best human readable label: name, then id, then email.
    #[must_use]
    pub fn label(&self) -> &str {
        match (&self.name, self.id.is_empty(), &self.email) {
            (Some(name), _, _) => name,
            (None, false, _) => &self.id,
            (None, true, Some(email)) => email,
            (None, true, None) => "",
        }
    }
}

impl From<&str> for Mention {
    fn from(id: &str) -> Self {
        Self::user(id)
    }
}

impl From<String> for Mention {
    fn from(id: String) -> Self {
        Self::user(id)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HeadingLevel {
    H1 = 1,
    H2 = 2,
    H3 = 3,
}

impl HeadingLevel {
    #[must_use]
    pub fn get(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for HeadingLevel {
    type Error = StructureError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            1 => Ok(Self::H1),
            2 => Ok(Self::H2),
            3 => Ok(Self::H3),
            n => Err(StructureError::HeadingLevel(n)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Heading {
    level: HeadingLevel,
    children: Vec<Node>,
}

impl Heading {
    pub(crate) fn from_parts(level: HeadingLevel, children: Vec<Node>) -> Self {
        Self { level, children }
    }

    #[must_use]
    pub fn level(&self) -> HeadingLevel {
        self.level
    }

    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Paragraph {
    children: Vec<Node>,
}

impl Paragraph {
    pub(crate) fn from_parts(children: Vec<Node>) -> Self {
        Self { children }
    }

    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Quote {
    children: Vec<Node>,
}

impl Quote {
    pub(crate) fn from_parts(children: Vec<Node>) -> Self {
        Self { children }
    }

    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }
}

/// Bullet or numbered list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ListKind {
    Unordered,
    /// Numbered from `start`, which is at least 1.
    Ordered { start: u64 },
}

impl ListKind {
    /// Largest start number; CommonMark list markers have at most nine digits.
    pub const MAX_START: u64 = 999_999_999;

    /// Ordered list kind starting at `start`.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::ListIndex`] when `start` is 0 or above
    /// [`Self::MAX_START`].
    pub fn ordered_from(start: u64) -> Result<Self, StructureError> {
        if !(1..=Self::MAX_START).contains(&start) {
            return Err(StructureError::ListIndex(start));
        }
        Ok(Self::Ordered { start })
    }

    /// Ordinal of the item at `index`, or `None` for bullets.
    #[must_use]
    pub fn ordinal(self, index: usize) -> Option<u64> {
        match self {
            Self::Unordered => None,
            Self::Ordered { start } => Some(start.saturating_add(index as u64)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct List {
    kind: ListKind,
    items: Vec<ListItem>,
}

impl List {
    #[must_use]
    pub fn new(kind: ListKind, items: Vec<ListItem>) -> Self {
        Self { kind, items }
    }

    #[must_use]
    pub fn kind(&self) -> ListKind {
        self.kind
    }

    #[must_use]
    pub fn items(&self) -> &[ListItem] {
        &self.items
    }
}

/// One list entry: inline content, optionally followed by nested lists.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ListItem {
    children: Vec<Node>,
}

impl ListItem {
    /// List item holding inline nodes and nested lists.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::InvalidChild`] for any other block.
    pub fn new(children: Vec<Node>) -> Result<Self, StructureError> {
        if let Some(child) = children
            .iter()
            .find(|c| !c.is_inline() && !matches!(c, Node::List(_)))
        {
            return Err(StructureError::InvalidChild {
                container: "list item",
                child: child.kind_name(),
            });
        }
        Ok(Self { children })
    }

    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            children: vec![Node::text(text)],
        }
    }

    pub(crate) fn from_parts(children: Vec<Node>) -> Self {
        Self { children }
    }

    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_styled_rejects_block_child() {
        let para = Node::paragraph(vec![Node::text("x")]).unwrap();
        let err = Node::styled(Style::Bold, para).unwrap_err();
        assert_eq!(
            err,
            StructureError::InvalidChild {
                container: "bold",
                child: "paragraph"
            }
        );
    }

    #[test]
    fn test_styled_accepts_nested_style() {
        let inner = Node::styled_text(Style::Italic, "x");
        let outer = Node::styled(Style::Bold, inner.clone()).unwrap();
        let Node::Styled(styled) = outer else {
            panic!("expected styled node");
        };
        assert_eq!(styled.style(), Style::Bold);
        assert_eq!(styled.child(), &inner);
    }

    #[test]
    fn test_heading_level_bounds() {
        assert_eq!(
            Node::heading(0, vec![]).unwrap_err(),
            StructureError::HeadingLevel(0)
        );
        assert_eq!(
            Node::heading(4, vec![]).unwrap_err(),
            StructureError::HeadingLevel(4)
        );
        assert!(Node::heading(3, vec![Node::text("ok")]).is_ok());
    }

    #[test]
    fn test_paragraph_rejects_table_child() {
        let quote = Node::quote(vec![]).unwrap();
        let err = Node::paragraph(vec![Node::text("a"), quote]).unwrap_err();
        assert!(matches!(
            err,
            StructureError::InvalidChild {
                container: "paragraph",
                child: "quote"
            }
        ));
    }

    #[test]
    fn test_list_item_allows_nested_list() {
        let nested = Node::unordered_list(vec![ListItem::text("child")]);
        assert!(ListItem::new(vec![Node::text("parent"), nested]).is_ok());
    }

    #[test]
    fn test_list_item_rejects_heading() {
        let heading = Node::heading(1, vec![]).unwrap();
        assert!(ListItem::new(vec![heading]).is_err());
    }

    #[test]
    fn test_ordered_list_start() {
        assert_eq!(
            ListKind::ordered_from(0).unwrap_err(),
            StructureError::ListIndex(0)
        );
        let kind = ListKind::ordered_from(3).unwrap();
        assert_eq!(kind.ordinal(0), Some(3));
        assert_eq!(kind.ordinal(2), Some(5));
        assert_eq!(ListKind::Unordered.ordinal(1), None);
    }

    #[test]
    fn test_ordered_list_start_is_bounded() {
        assert!(ListKind::ordered_from(ListKind::MAX_START).is_ok());
        assert_eq!(
            ListKind::ordered_from(u64::MAX).unwrap_err(),
            StructureError::ListIndex(u64::MAX)
        );
        let kind = ListKind::Ordered { start: u64::MAX };
        assert_eq!(kind.ordinal(1), Some(u64::MAX));
    }

    #[test]
    fn test_empty_language_is_dropped() {
        let Node::CodeBlock(block) = Node::code_block("x", Some("")) else {
            panic!("expected code block");
        };
        assert!(block.language.is_none());
    }

    #[test]
    fn test_mention_label_fallbacks() {
        assert_eq!(Mention::user("U1").label(), "U1");
        assert_eq!(Mention::user("U1").with_name("Ada").label(), "Ada");
        assert_eq!(Mention::email("a@b.c").label(), "a@b.c");
    }

    #[test]
    fn test_link_display_defaults_to_url() {
        let link = Link {
            url: "https://example.com".to_owned(),
            label: None,
        };
        assert_eq!(link.display(), "https://example.com");
    }

    #[test]
    fn test_structural_equality() {
        assert_eq!(
            Node::paragraph(vec![Node::text("a")]).unwrap(),
            Node::paragraph(vec![Node::from("a")]).unwrap()
        );
    }
}
