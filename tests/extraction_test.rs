use readably::{parse, parse_bytes, parse_with_options, text, Options};

#[test]
fn simple_article_keeps_main_and_drops_sidebar() {
    let html = r#"<html><body><div id="main"><h1>T</h1><p>A long paragraph of about one hundred and fifty characters, with commas, dots, and enough substance to score well.</p><p>Another equally long paragraph, also with several, commas, to trigger candidate scoring.</p></div><div class="sidebar"><p>short</p></div></body></html>"#;

    let result = parse(html);
    match result {
        Ok(article) => {
            assert_eq!(article.title.as_deref(), Some("T"));
            let content = article.content.unwrap_or_default();
            assert!(content.contains("one hundred and fifty"));
            assert!(content.contains("Another equally long paragraph"));
            assert!(!content.contains("short"));
            assert!(article.length > 200, "length {}", article.length);
        }
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    }
}

#[test]
fn br_runs_become_paragraphs() {
    let html = "<html><body><div>Line1<br><br>Line2<br><br>Line3</div></body></html>";

    let result = parse(html);
    match result {
        Ok(article) => {
            let content = article.content.unwrap_or_default();
            let doc = readably::dom::parse(&content);
            assert_eq!(doc.select("p").length(), 3, "content: {content}");
        }
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    }
}

#[test]
fn retry_loosening_recovers_unlikely_wrapped_content() {
    let paragraph = "<p>A long paragraph of about one hundred and fifty characters, with commas, dots, and enough substance to score well in the extractor.</p>";
    let html = format!(
        r#"<html><body><div class="sidebar">{}</div></body></html>"#,
        paragraph.repeat(6)
    );

    let result = parse(&html);
    match result {
        Ok(article) => {
            assert!(article.length >= 500, "length {}", article.length);
        }
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    }
}

#[test]
fn relative_uris_are_made_absolute() {
    let paragraph = "<p>A long paragraph of about one hundred and fifty characters, with commas, dots, and enough substance to score well in the extractor.</p>";
    let html = format!(
        r#"<html><body><div id="main">{}{}<img src="/img/a.png"></div></body></html>"#,
        paragraph, paragraph
    );
    let options = Options {
        url: Some("https://example.com/posts/1".to_string()),
        ..Options::default()
    };

    let result = parse_with_options(&html, &options);
    match result {
        Ok(article) => {
            let content = article.content.unwrap_or_default();
            assert!(
                content.contains(r#"src="https://example.com/img/a.png""#),
                "content: {content}"
            );
        }
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    }
}

#[test]
fn length_always_matches_text_content() {
    let paragraph = "<p>Paragraph content with a comma, long enough to be scored by the engine.</p>";
    let html = format!("<html><body><article>{}</article></body></html>", paragraph.repeat(4));

    let result = parse(&html);
    match result {
        Ok(article) => {
            let text_content = article.text_content.unwrap_or_default();
            assert_eq!(article.length, text::char_count(&text_content));
        }
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    }
}

#[test]
fn serialized_content_reparses_to_same_text() {
    let paragraph = "<p>Paragraph content with a comma, long enough to be scored by the engine.</p>";
    let html = format!("<html><body><article>{}</article></body></html>", paragraph.repeat(4));

    let result = parse(&html);
    match result {
        Ok(article) => {
            let content = article.content.unwrap_or_default();
            let text_content = article.text_content.unwrap_or_default();

            let doc = readably::dom::parse(&content);
            let reparsed = text::trim(&doc.select("body").text());
            assert_eq!(reparsed, text::trim(&text_content));
        }
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    }
}

#[test]
fn parse_is_deterministic() {
    let paragraph = "<p>Paragraph content with a comma, long enough to be scored by the engine.</p>";
    let html = format!("<html><body><article>{}</article></body></html>", paragraph.repeat(4));

    let first = parse(&html);
    let second = parse(&html);
    match (first, second) {
        (Ok(a), Ok(b)) => assert_eq!(a.content, b.content),
        other => panic!("expected two Ok results, got {other:?}"),
    }
}

#[test]
fn reparsing_own_output_preserves_text() {
    let paragraph = "<p>Paragraph content with a comma, long enough to be scored by the engine.</p>";
    let html = format!("<html><body><article>{}</article></body></html>", paragraph.repeat(4));

    let first = match parse(&html) {
        Ok(article) => article,
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    };
    let roundtrip = match parse(&first.content.clone().unwrap_or_default()) {
        Ok(article) => article,
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    };

    assert_eq!(
        text::trim(&roundtrip.text_content.unwrap_or_default()),
        text::trim(&first.text_content.unwrap_or_default())
    );
}

#[test]
fn bytes_entry_point_decodes_declared_charset() {
    let html = b"<html><head><meta charset=\"ISO-8859-1\"></head><body><article><p>Caf\xE9 culture, a paragraph long enough, with commas, to extract as content.</p></article></body></html>";

    let result = parse_bytes(html);
    match result {
        Ok(article) => {
            assert!(article
                .text_content
                .unwrap_or_default()
                .contains("Caf\u{e9}"));
        }
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    }
}

#[test]
fn lazy_images_are_promoted_in_content() {
    let paragraph = "<p>A long paragraph of about one hundred and fifty characters, with commas, dots, and enough substance to score well in the extractor.</p>";
    let html = format!(
        r#"<html><body><div id="main">{}{}<img data-src="https://example.com/real.jpg"></div></body></html>"#,
        paragraph, paragraph
    );

    let result = parse(&html);
    match result {
        Ok(article) => {
            let content = article.content.unwrap_or_default();
            assert!(content.contains(r#"src="https://example.com/real.jpg""#));
        }
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    }
}
