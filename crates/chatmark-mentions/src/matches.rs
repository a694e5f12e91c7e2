//! Extraction results.

use std::ops::Range;

use chatmark_model::{Mention, MentionKind};

/// Kind of a recognized mention token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MatchKind {
    User,
    Channel,
    /// User group or role.
    Group,
    /// Broadcast token such as `here` or `everyone`.
    Special,
}

/// What a mention token names.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Identifier {
    /// Platform id, or the broadcast keyword for [`MatchKind::Special`].
    Id(String),
    /// Email address, from MessageML `email` attributes.
    Email(String),
}

impl Identifier {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Id(s) | Self::Email(s) => s,
        }
    }
}

/// One mention token found in raw text.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MentionMatch {
    pub kind: MatchKind,
    pub identifier: Identifier,
    /// Byte range of the whole token in the scanned text.
    pub span: Range<usize>,
    /// Display suffix such as the `general` of `<#C1|general>`.
    pub label: Option<String>,
}

impl MentionMatch {
    /// The platform id, unless the token named an email.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        match &self.identifier {
            Identifier::Id(id) => Some(id),
            Identifier::Email(_) => None,
        }
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        match &self.identifier {
            Identifier::Email(email) => Some(email),
            Identifier::Id(_) => None,
        }
    }

    /// Model mention equivalent to this token.
    ///
    /// Broadcast keywords other than `here` (`everyone`, `channel`, `all`)
    /// map to [`MentionKind::Everyone`].
    #[must_use]
    pub fn to_mention(&self) -> Mention {
        let mention = match (&self.kind, &self.identifier) {
            (MatchKind::Special, Identifier::Id(word)) if word == "here" => Mention::here(),
            (MatchKind::Special, _) => Mention::everyone(),
            (_, Identifier::Email(email)) => Mention::email(email.clone()),
            (MatchKind::User, Identifier::Id(id)) => Mention::user(id.clone()),
            (MatchKind::Channel, Identifier::Id(id)) => Mention::channel(id.clone()),
            (MatchKind::Group, Identifier::Id(id)) => Mention::role(id.clone()),
        };
        match &self.label {
            Some(label) if !label.is_empty() && !mention.kind.is_special() => {
                mention.with_name(label.clone())
            }
            _ => mention,
        }
    }
}

/// Kind mapping used when comparing extracted tokens with model mentions.
impl From<MentionKind> for MatchKind {
    fn from(kind: MentionKind) -> Self {
        match kind {
            MentionKind::User => Self::User,
            MentionKind::Channel => Self::Channel,
            MentionKind::Role => Self::Group,
            MentionKind::Everyone | MentionKind::Here => Self::Special,
        }
    }
}
