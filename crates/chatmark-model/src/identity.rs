//! Identity objects supplied by chat platform clients.
//!
//! The document model never fetches identities; callers hand over whatever the
//! platform already resolved. Anything that can name a mention target implements
//! [`MentionTarget`], and [`User`] / [`Channel`] cover the common case.

use crate::node::{Mention, MentionKind};

/// Something a [`Mention`] can point at.
pub trait MentionTarget {
    /// Kind of mention this target produces.
    fn mention_kind(&self) -> MentionKind;

    /// Platform id. May be empty when only an email is known.
    fn id(&self) -> &str;

    /// Human readable name, if resolved.
    fn display_name(&self) -> Option<&str> {
        None
    }

    /// Email address, if known.
    fn email(&self) -> Option<&str> {
        None
    }
}

/// A chat platform user.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct User {
    /// Platform user id.
    pub id: String,
    /// Display name.
    pub name: Option<String>,
    /// Email address.
    pub email: Option<String>,
}

impl User {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

impl MentionTarget for User {
    fn mention_kind(&self) -> MentionKind {
        MentionKind::User
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}

/// A chat channel, room or stream.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Channel {
    /// Platform channel id.
    pub id: String,
    /// Channel name without the leading `#`.
    pub name: Option<String>,
}

impl Channel {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl MentionTarget for Channel {
    fn mention_kind(&self) -> MentionKind {
        MentionKind::Channel
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl From<&User> for Mention {
    fn from(user: &User) -> Self {
        Mention::of(user)
    }
}

impl From<&Channel> for Mention {
    fn from(channel: &Channel) -> Self {
        Mention::of(channel)
    }
}
