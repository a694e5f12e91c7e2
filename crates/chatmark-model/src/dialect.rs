//! Target dialect selector.

use std::fmt;
use std::str::FromStr;

use crate::error::UnsupportedDialectError;

/// Native markup dialect a document can be rendered to or mentions parsed from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Dialect {
    /// Unstyled text, the "read aloud" projection.
    PlainText,
    /// CommonMark with GitHub table extensions.
    GenericMarkdown,
    /// Slack `mrkdwn`.
    SlackMrkdwn,
    /// Discord's markdown flavour.
    DiscordMarkdown,
    /// Symphony MessageML (XML).
    SymphonyMessageML,
    /// HTML fragment.
    Html,
}

impl Dialect {
    /// Every dialect, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::PlainText,
        Self::GenericMarkdown,
        Self::SlackMrkdwn,
        Self::DiscordMarkdown,
        Self::SymphonyMessageML,
        Self::Html,
    ];

    /// Canonical lowercase name, accepted back by [`FromStr`].
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::PlainText => "plaintext",
            Self::GenericMarkdown => "markdown",
            Self::SlackMrkdwn => "slack",
            Self::DiscordMarkdown => "discord",
            Self::SymphonyMessageML => "symphony",
            Self::Html => "html",
        }
    }

    /// Dialect spoken by a chat platform backend.
    ///
    /// ```
    /// use chatmark_model::Dialect;
    ///
    /// assert_eq!(Dialect::for_platform("Slack").unwrap(), Dialect::SlackMrkdwn);
    /// assert_eq!(Dialect::for_platform("matrix").unwrap(), Dialect::Html);
    /// assert!(Dialect::for_platform("carrier-pigeon").is_err());
    /// ```
    pub fn for_platform(platform: &str) -> Result<Self, UnsupportedDialectError> {
        match platform.trim().to_ascii_lowercase().as_str() {
            "slack" => Ok(Self::SlackMrkdwn),
            "discord" => Ok(Self::DiscordMarkdown),
            "symphony" => Ok(Self::SymphonyMessageML),
            "matrix" | "email" | "telegram" => Ok(Self::Html),
            "irc" | "sms" => Ok(Self::PlainText),
            _ => Err(UnsupportedDialectError::new(platform)),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = UnsupportedDialectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plaintext" | "plain" | "text" => Ok(Self::PlainText),
            "markdown" | "md" | "commonmark" => Ok(Self::GenericMarkdown),
            "slack" | "mrkdwn" => Ok(Self::SlackMrkdwn),
            "discord" => Ok(Self::DiscordMarkdown),
            "symphony" | "messageml" => Ok(Self::SymphonyMessageML),
            "html" | "matrix" => Ok(Self::Html),
            _ => Err(UnsupportedDialectError::new(s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_round_trips() {
        for dialect in Dialect::ALL {
            assert_eq!(dialect.name().parse::<Dialect>().unwrap(), dialect);
        }
    }

    #[test]
    fn test_aliases() {
        assert_eq!("mrkdwn".parse::<Dialect>().unwrap(), Dialect::SlackMrkdwn);
        assert_eq!(
            " MessageML ".parse::<Dialect>().unwrap(),
            Dialect::SymphonyMessageML
        );
        assert_eq!("TEXT".parse::<Dialect>().unwrap(), Dialect::PlainText);
    }

    #[test]
    fn test_unknown_name_is_error() {
        let err = "teams".parse::<Dialect>().unwrap_err();
        assert_eq!(err.name, "teams");
    }
}
