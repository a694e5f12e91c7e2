//! Per-dialect mention scanners.
//!
//! Each dialect has one compiled pattern. The scan walks the text left to
//! right with [`Regex::captures_at`]. In the Markdown dialects, where a
//! backslash escapes the next character, a candidate preceded by an odd run
//! of backslashes was escaped by the renderer and is skipped. A candidate the
//! classifier rejects (`<!date^...>` and the like) is retried one byte further
//! on. Accepted matches resume the scan at their end, so results never
//! overlap.
//!
//! Discord pings `@everyone` and `@here` wherever they appear, so the literal
//! broadcasts need no word boundary.
//!
//! The scan is purely lexical: a mention token inside a code span or fenced
//! block of the raw text is reported like any other.

use std::borrow::Cow;
use std::sync::LazyLock;

use chatmark_model::Dialect;
use quick_xml::escape::unescape;
use regex::{Captures, Regex};

use crate::matches::{Identifier, MatchKind, MentionMatch};

/// `<@U1>`, `<@!U1>`, `<@&R1>`, `<#C1|name>`, `<!here>`, `<!subteam^S1>`.
const ANGLE: &str = r"<(?P<sigil>@[&!]?|#|!subteam\^|!)(?P<id>[^\s<>|]+)(?:\|(?P<label>[^<>]*))?>";

static ANGLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(ANGLE).unwrap());

static DISCORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"{ANGLE}|@(?P<literal>everyone|here)")).unwrap()
});

static MESSAGE_ML_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<mention\s+(?P<attr>uid|email)\s*=\s*"(?P<value>[^"]*)"\s*/>"#).unwrap()
});

static HTML_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"<span class="mention" data-mention="(?P<kind>user|channel|role|everyone|here)""#,
        r#"(?: data-id="(?P<id>[^"]*)")?(?: data-email="(?P<email>[^"]*)")?>"#,
        r"(?P<label>[^<]*)</span>"
    ))
    .unwrap()
});

/// Broadcast keywords accepted after a bare `!` sigil.
const BROADCASTS: [&str; 3] = ["here", "channel", "everyone"];

type Classified = (MatchKind, Identifier, Option<String>);

fn pattern(dialect: Dialect) -> Option<&'static Regex> {
    match dialect {
        Dialect::PlainText => None,
        Dialect::GenericMarkdown | Dialect::SlackMrkdwn => Some(&*ANGLE_RE),
        Dialect::DiscordMarkdown => Some(&*DISCORD_RE),
        Dialect::SymphonyMessageML => Some(&*MESSAGE_ML_RE),
        Dialect::Html => Some(&*HTML_RE),
    }
}

/// Find every mention token `dialect` would emit in `text`, in scan order.
#[must_use]
pub fn extract(text: &str, dialect: Dialect) -> Vec<MentionMatch> {
    let mut found = Vec::new();
    if let Some(re) = pattern(dialect) {
        let mut pos = 0;
        while pos < text.len() {
            let Some(caps) = re.captures_at(text, pos) else {
                break;
            };
            let Some(whole) = caps.get(0) else {
                break;
            };
            let classified = if backslash_escapes(dialect) && is_escaped(text, whole.start()) {
                None
            } else {
                classify(dialect, &caps)
            };
            match classified {
                Some((kind, identifier, label)) => {
                    found.push(MentionMatch {
                        kind,
                        identifier,
                        span: whole.range(),
                        label,
                    });
                    pos = whole.end();
                }
                // Every pattern starts with an ASCII byte.
                None => pos = whole.start() + 1,
            }
        }
    }
    tracing::debug!(%dialect, count = found.len(), "Extracted mentions");
    found
}

/// Whether a backslash escapes the next character in `dialect`'s text.
fn backslash_escapes(dialect: Dialect) -> bool {
    matches!(dialect, Dialect::GenericMarkdown | Dialect::DiscordMarkdown)
}

/// Whether the byte at `start` follows an odd number of backslashes.
fn is_escaped(text: &str, start: usize) -> bool {
    let backslashes = text.as_bytes()[..start]
        .iter()
        .rev()
        .take_while(|&&b| b == b'\\')
        .count();
    backslashes % 2 == 1
}

fn classify(dialect: Dialect, caps: &Captures<'_>) -> Option<Classified> {
    match dialect {
        Dialect::SymphonyMessageML => classify_message_ml(caps),
        Dialect::Html => classify_html(caps),
        _ => classify_angle(caps),
    }
}

fn classify_angle(caps: &Captures<'_>) -> Option<Classified> {
    if let Some(literal) = caps.name("literal") {
        return Some((
            MatchKind::Special,
            Identifier::Id(literal.as_str().to_owned()),
            None,
        ));
    }
    let sigil = caps.name("sigil")?.as_str();
    let id = caps.name("id")?.as_str();
    let label = caps.name("label").map(|l| xml_text(l.as_str()));
    let kind = match sigil {
        "@" | "@!" => MatchKind::User,
        "@&" | "!subteam^" => MatchKind::Group,
        "#" => MatchKind::Channel,
        "!" if BROADCASTS.contains(&id) => MatchKind::Special,
        _ => return None,
    };
    Some((kind, Identifier::Id(id.to_owned()), label))
}

fn classify_message_ml(caps: &Captures<'_>) -> Option<Classified> {
    let value = xml_text(caps.name("value")?.as_str());
    match caps.name("attr")?.as_str() {
        "email" => Some((MatchKind::User, Identifier::Email(value), None)),
        _ if value == "all" => Some((MatchKind::Special, Identifier::Id(value), None)),
        _ => Some((MatchKind::User, Identifier::Id(value), None)),
    }
}

fn classify_html(caps: &Captures<'_>) -> Option<Classified> {
    let word = caps.name("kind")?.as_str();
    let kind = match word {
        "user" => MatchKind::User,
        "channel" => MatchKind::Channel,
        "role" => MatchKind::Group,
        _ => {
            return Some((MatchKind::Special, Identifier::Id(word.to_owned()), None));
        }
    };
    let identifier = match (caps.name("id"), caps.name("email")) {
        (Some(id), _) => Identifier::Id(xml_text(id.as_str())),
        (None, Some(email)) => Identifier::Email(xml_text(email.as_str())),
        (None, None) => return None,
    };
    let text = xml_text(caps.name("label").map_or("", |l| l.as_str()));
    let shown = text
        .strip_prefix(['@', '#'])
        .unwrap_or(&text)
        .to_owned();
    let label = (shown != identifier.as_str() && !shown.is_empty()).then_some(shown);
    Some((kind, identifier, label))
}

/// Unescape an attribute or text value, keeping the raw text when it holds
/// a malformed entity.
fn xml_text(raw: &str) -> String {
    unescape(raw).map_or_else(|_| raw.to_owned(), Cow::into_owned)
}
