//! End-to-end scenarios across builder, renderer, extractor and config.

use chatmark::{
    Config, Dialect, DocumentBuilder, Mention, MentionExtractor, Node, Renderer, Table, User,
    extract, parse_markdown, render, render_named, render_node,
};
use pretty_assertions::assert_eq;

#[test]
fn test_styled_paragraph_in_markdown_and_plain_text() {
    let mut b = DocumentBuilder::new();
    b.bold("Important").text(": check ").italic("this");
    let doc = b.build();

    assert_eq!(render(&doc, Dialect::GenericMarkdown), "**Important**: check *this*");
    assert_eq!(render(&doc, Dialect::PlainText), "Important: check this");
}

#[test]
fn test_user_mention_in_markdown_and_message_ml() {
    let mention = Node::mention("U1");
    assert_eq!(render_node(&mention, Dialect::GenericMarkdown), "<@U1>");
    assert_eq!(
        render_node(&mention, Dialect::SymphonyMessageML),
        r#"<mention uid="U1"/>"#
    );
}

#[test]
fn test_plain_text_table_columns_align() {
    let table = Table::from_strings(&["A", "B"], &[vec!["1", "2"]]).unwrap();
    let out = render_node(&Node::table(table), Dialect::PlainText);
    assert_eq!(out, "A  B\n1  2");

    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0].find('B'), lines[1].find('2'));
}

#[test]
fn test_extract_two_users_in_order() {
    let text = "hi <@U1> and <@U2>";
    let found = extract(text, Dialect::GenericMarkdown);
    let ids: Vec<(&str, &str)> = found
        .iter()
        .map(|m| (m.id().unwrap(), &text[m.span.clone()]))
        .collect();
    assert_eq!(ids, [("U1", "<@U1>"), ("U2", "<@U2>")]);
    assert!(found[0].span.end <= found[1].span.start);
}

#[test]
fn test_same_document_for_every_platform() {
    let ada = User::new("U1").with_name("Ada");
    let mut b = DocumentBuilder::new();
    b.heading(1, "Release").unwrap();
    b.paragraph().text("Shipped by ").mention(&ada).text(" ").here();
    b.unordered_list(["api", "web"]);
    let doc = b.build();

    assert_eq!(
        render(&doc, Dialect::GenericMarkdown),
        "# Release\n\nShipped by <@U1> <!here>\n\n- api\n- web"
    );
    assert_eq!(
        render(&doc, Dialect::SlackMrkdwn),
        "*Release*\nShipped by <@U1> <!here>\n• api\n• web"
    );
    assert_eq!(
        render(&doc, Dialect::DiscordMarkdown),
        "# Release\nShipped by <@U1> @here\n- api\n- web"
    );
    assert_eq!(
        render(&doc, Dialect::SymphonyMessageML),
        r#"<h1>Release</h1><p>Shipped by <mention uid="U1"/> @here</p><ul><li>api</li><li>web</li></ul>"#
    );
    assert_eq!(
        render(&doc, Dialect::PlainText),
        "Release\nShipped by @Ada @here\napi\nweb"
    );
}

#[test]
fn test_render_named_rejects_unknown_dialect() {
    let doc = DocumentBuilder::new().build();
    assert_eq!(render_named(&doc, "mrkdwn").unwrap(), "");
    let err = render_named(&doc, "teams").unwrap_err();
    assert_eq!(err.name, "teams");
}

#[test]
fn test_markdown_import_renders_back() {
    let mut b = DocumentBuilder::new();
    b.heading(2, "Status").unwrap();
    b.paragraph()
        .bold("Done")
        .text(" by ")
        .mention("U1")
        .text(", see ")
        .link("https://a.io", Some("docs"));
    b.unordered_list(["one", "two"]);
    let doc = b.build();

    let markdown = render(&doc, Dialect::GenericMarkdown);
    let parsed = parse_markdown(&markdown, Dialect::GenericMarkdown).unwrap();
    assert_eq!(parsed, doc);
    assert_eq!(parsed.mentions(), [&Mention::user("U1")]);
}

#[test]
fn test_config_drives_renderer_and_extractor() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chatmark.toml");
    std::fs::write(
        &path,
        "[render]\ndialect = \"symphony\"\nmessage_ml_envelope = true\n\n[mentions]\ndialect = \"slack\"\n",
    )
    .unwrap();
    let config = Config::load(Some(path.as_path())).unwrap();

    let mut b = DocumentBuilder::new();
    b.mention("U9");
    let out = Renderer::from_config(&config).render(&b.build());
    assert_eq!(out, r#"<messageML><p><mention uid="U9"/></p></messageML>"#);

    let extractor = MentionExtractor::from_config(&config);
    assert_eq!(extractor.extract_ids("<@U9>"), ["U9"]);
}
