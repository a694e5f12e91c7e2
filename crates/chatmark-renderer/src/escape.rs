//! Per-dialect escaping of literal text and code delimiters.

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape XML-reserved characters for MessageML.
#[must_use]
pub fn escape_xml(s: &str) -> String {
    quick_xml::escape::escape(s).into_owned()
}

/// Backslash-escape every character of `reserved` found in `s`.
fn backslash(s: &str, reserved: &[char]) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        if reserved.contains(&c) {
            result.push('\\');
        }
        result.push(c);
    }
    result
}

const MARKDOWN_RESERVED: &[char] = &[
    '\\', '`', '*', '_', '[', ']', '<', '>', '#', '~', '|', '&',
];

/// CommonMark escaping for text runs.
///
/// Inline punctuation is backslash-escaped everywhere. A `-`, `+` or `=` and
/// the `.`/`)` after a leading number are escaped only at the start of a line,
/// where they would open a list or underline a heading.
#[must_use]
pub fn escape_markdown(s: &str) -> String {
    let lines: Vec<String> = s.split('\n').map(escape_markdown_line).collect();
    lines.join("\n")
}

fn escape_markdown_line(line: &str) -> String {
    let body = line.trim_start_matches([' ', '\t']);
    let (indent, body) = line.split_at(line.len() - body.len());
    let digits = body.len() - body.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    let marker = match body[digits..].chars().next() {
        Some('-' | '+' | '=') if digits == 0 => Some(0),
        Some('.' | ')') if digits > 0 => Some(digits),
        _ => None,
    };

    let mut result = String::with_capacity(line.len() + 2);
    result.push_str(indent);
    match marker {
        Some(at) => {
            result.push_str(&body[..at]);
            result.push('\\');
            result.push_str(&backslash(&body[at..], MARKDOWN_RESERVED));
        }
        None => result.push_str(&backslash(body, MARKDOWN_RESERVED)),
    }
    result
}

/// Discord markdown escaping for text runs. `@` is escaped so literal
/// `@everyone` in user text never pings.
#[must_use]
pub fn escape_discord(s: &str) -> String {
    backslash(s, &['\\', '*', '_', '~', '`', '|', '<', '>', '@'])
}

/// Slack mrkdwn escaping: the three control characters become entities, the
/// formatting characters are backslash-escaped.
#[must_use]
pub fn escape_slack(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '*' | '_' | '~' | '`' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }
    result
}

/// Entity-escape Slack's three control characters, for values placed inside
/// a `<...|...>` token where backslashes would show literally.
#[must_use]
pub fn escape_slack_control(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}

/// Longest run of consecutive `ch` in `s`.
fn longest_run(s: &str, ch: char) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for c in s.chars() {
        if c == ch {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// Write `code` as a backtick code span that its own content cannot close.
pub fn code_span(code: &str, out: &mut String) {
    let fence = "`".repeat(longest_run(code, '`') + 1);
    let pad = code.starts_with('`') || code.ends_with('`');
    out.push_str(&fence);
    if pad {
        out.push(' ');
    }
    out.push_str(code);
    if pad {
        out.push(' ');
    }
    out.push_str(&fence);
}

/// Write a fenced code block whose fence is longer than any backtick run in
/// the content.
pub fn fenced_block(lang: Option<&str>, code: &str, out: &mut String) {
    let fence = "`".repeat(longest_run(code, '`').max(2) + 1);
    out.push_str(&fence);
    if let Some(lang) = lang {
        out.push_str(lang);
    }
    out.push('\n');
    out.push_str(code);
    if !code.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&fence);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a < b & c"), "a &lt; b &amp; c");
        assert_eq!(escape_xml(r#""q""#), "&quot;q&quot;");
    }

    #[test]
    fn test_escape_markdown() {
        assert_eq!(escape_markdown("2*3_4 [x] #1"), r"2\*3\_4 \[x\] \#1");
        assert_eq!(escape_markdown("plain: text."), "plain: text.");
        assert_eq!(escape_markdown("AT&amp;T"), r"AT\&amp;T");
    }

    #[test]
    fn test_escape_markdown_line_start_markers() {
        assert_eq!(escape_markdown("- not a list"), r"\- not a list");
        assert_eq!(escape_markdown("+ plus"), r"\+ plus");
        assert_eq!(escape_markdown("12. twelve"), r"12\. twelve");
        assert_eq!(escape_markdown("3) three"), r"3\) three");
        assert_eq!(escape_markdown("title\n==="), "title\n\\===");
        assert_eq!(escape_markdown("a\n  - b"), "a\n  \\- b");
        assert_eq!(escape_markdown("1-2 + 3. x"), "1-2 + 3. x");
    }

    #[test]
    fn test_escape_slack() {
        assert_eq!(escape_slack("<@U1> & *x*"), r"&lt;@U1&gt; &amp; \*x\*");
    }

    #[test]
    fn test_escape_slack_control() {
        assert_eq!(escape_slack_control("a_b <c> & d"), "a_b &lt;c&gt; &amp; d");
    }

    #[test]
    fn test_escape_discord() {
        assert_eq!(escape_discord("<@1> ~~x~~"), r"\<\@1\> \~\~x\~\~");
        assert_eq!(escape_discord("@everyone"), r"\@everyone");
    }

    #[test]
    fn test_code_span_avoids_inner_backticks() {
        let mut out = String::new();
        code_span("a`b", &mut out);
        assert_eq!(out, "``a`b``");

        out.clear();
        code_span("`edge`", &mut out);
        assert_eq!(out, "`` `edge` ``");

        out.clear();
        code_span("*not bold*", &mut out);
        assert_eq!(out, "`*not bold*`");
    }

    #[test]
    fn test_fenced_block_grows_fence() {
        let mut out = String::new();
        fenced_block(Some("md"), "```\ninner\n```", &mut out);
        assert_eq!(out, "````md\n```\ninner\n```\n````");

        out.clear();
        fenced_block(None, "x\n", &mut out);
        assert_eq!(out, "```\nx\n```");
    }
}
