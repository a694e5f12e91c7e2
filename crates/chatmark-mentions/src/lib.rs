//! Mention extraction from rendered chat markup.
//!
//! The reverse of rendering: given raw text in one dialect, report the
//! mention tokens it contains as [`MentionMatch`] values in left-to-right
//! order.
//!
//! ```
//! use chatmark_mentions::{extract, MatchKind};
//! use chatmark_model::Dialect;
//!
//! let found = extract("hi <@U1> and <@U2>", Dialect::GenericMarkdown);
//! let ids: Vec<_> = found.iter().filter_map(|m| m.id()).collect();
//! assert_eq!(ids, ["U1", "U2"]);
//! assert_eq!(found[0].kind, MatchKind::User);
//! ```
//!
//! Extraction never fails. Text without recognizable syntax yields an empty
//! list, and plain text has no mention syntax at all.

mod extract;
mod matches;

use chatmark_config::Config;
use chatmark_model::Dialect;

pub use extract::extract;
pub use matches::{Identifier, MatchKind, MentionMatch};

/// User ids mentioned in `text`, in order, duplicates kept.
#[must_use]
pub fn extract_ids(text: &str, dialect: Dialect) -> Vec<String> {
    ids_of_kind(text, dialect, MatchKind::User)
}

/// Channel ids mentioned in `text`, in order, duplicates kept.
#[must_use]
pub fn extract_channel_ids(text: &str, dialect: Dialect) -> Vec<String> {
    ids_of_kind(text, dialect, MatchKind::Channel)
}

/// Whether `text` mentions the user `user_id`.
#[must_use]
pub fn mentions_user(text: &str, dialect: Dialect, user_id: &str) -> bool {
    extract(text, dialect)
        .iter()
        .any(|m| m.kind == MatchKind::User && m.id() == Some(user_id))
}

fn ids_of_kind(text: &str, dialect: Dialect, kind: MatchKind) -> Vec<String> {
    extract(text, dialect)
        .into_iter()
        .filter(|m| m.kind == kind)
        .filter_map(|m| match m.identifier {
            Identifier::Id(id) => Some(id),
            Identifier::Email(_) => None,
        })
        .collect()
}

/// Extractor bound to one source dialect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MentionExtractor {
    dialect: Dialect,
}

impl MentionExtractor {
    #[must_use]
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    /// Extractor for the `[mentions]` dialect of a loaded configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.mentions.dialect)
    }

    #[must_use]
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    #[must_use]
    pub fn extract(&self, text: &str) -> Vec<MentionMatch> {
        extract(text, self.dialect)
    }

    #[must_use]
    pub fn extract_ids(&self, text: &str) -> Vec<String> {
        extract_ids(text, self.dialect)
    }

    #[must_use]
    pub fn mentions_user(&self, text: &str, user_id: &str) -> bool {
        mentions_user(text, self.dialect, user_id)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_extract_ids_filters_kinds() {
        let text = "<@U1> <#C1|ops> <!here> <@U2> <@U1>";
        assert_eq!(extract_ids(text, Dialect::SlackMrkdwn), ["U1", "U2", "U1"]);
        assert_eq!(extract_channel_ids(text, Dialect::SlackMrkdwn), ["C1"]);
    }

    #[test]
    fn test_email_mentions_have_no_id() {
        let text = r#"<mention email="a@b.c"/><mention uid="U7"/>"#;
        assert_eq!(extract_ids(text, Dialect::SymphonyMessageML), ["U7"]);
    }

    #[test]
    fn test_mentions_user() {
        assert!(mentions_user("ping <@U1>", Dialect::DiscordMarkdown, "U1"));
        assert!(!mentions_user("ping <@U1>", Dialect::DiscordMarkdown, "U2"));
        assert!(!mentions_user("ping <#U1>", Dialect::DiscordMarkdown, "U1"));
    }

    #[test]
    fn test_extractor_from_config() {
        let config = Config::from_toml("[mentions]\ndialect = \"symphony\"\n").unwrap();
        let extractor = MentionExtractor::from_config(&config);
        assert_eq!(extractor.dialect(), Dialect::SymphonyMessageML);
        assert_eq!(extractor.extract_ids(r#"<mention uid="U3"/>"#), ["U3"]);
        assert!(extractor.mentions_user(r#"<mention uid="U3"/>"#, "U3"));
    }
}
