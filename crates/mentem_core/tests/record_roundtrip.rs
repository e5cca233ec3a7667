use mentem_core::{
    card_to_markdown, memory_to_markdown, parse_card_markdown, parse_memory_markdown,
    parse_tag_markdown, tag_to_markdown, Card, Memory, MemoryKind, MemoryPayload,
    RecordParseError, Tag, TagColor,
};

fn sample_memories() -> Vec<Memory> {
    let mut note = Memory::with_id(
        "note-1",
        MemoryPayload::Note {
            content: "# Heading\n\nSome *markdown* body.\n\n---\n\nafter a rule".to_string(),
        },
        1_700_000_000_000,
    );
    note.title = Some("Reading list: week #3".to_string());
    note.tldr = Some("short".to_string());
    note.tag_ids = vec!["t-1".to_string(), String::new(), "t2".to_string()];

    let mut image = Memory::with_id(
        "img-1",
        MemoryPayload::Image {
            url: "https://example.com/cat.png".to_string(),
            alt: Some("a cat".to_string()),
        },
        10,
    );
    image.updated_at = 20;

    let quote = Memory::with_id(
        "quote-1",
        MemoryPayload::Quote {
            text: "Stay hungry,\nstay foolish.".to_string(),
            author: Some("Someone Famous".to_string()),
            source_url: Some("https://example.com/speech".to_string()),
        },
        30,
    );

    let article = Memory::with_id(
        "article-1",
        MemoryPayload::Article {
            url: "https://example.com/post".to_string(),
            excerpt: Some("First line: the hook".to_string()),
            source: None,
        },
        40,
    );

    let product = Memory::with_id(
        "product-1",
        MemoryPayload::Product {
            url: None,
            price: Some("19.99".to_string()),
            currency: Some("EUR".to_string()),
        },
        50,
    );

    vec![note, image, quote, article, product]
}

#[test]
fn every_memory_kind_survives_a_roundtrip() {
    for memory in sample_memories() {
        let text = memory_to_markdown(&memory);
        let parsed = parse_memory_markdown(&text).unwrap();
        assert_eq!(parsed, memory, "record was:\n{text}");
    }
}

#[test]
fn empty_tag_ids_roundtrip_and_empty_optionals_read_back_absent() {
    let mut image = Memory::with_id(
        "img-empty",
        MemoryPayload::Image {
            url: "https://example.com/dog.png".to_string(),
            alt: Some(String::new()),
        },
        60,
    );
    image.tag_ids = vec![String::new(), "t1".to_string()];
    image.title = Some(String::new());

    let text = memory_to_markdown(&image);
    assert!(!text.contains("alt:"), "record was:\n{text}");
    assert!(!text.contains("title:"), "record was:\n{text}");

    let parsed = parse_memory_markdown(&text).unwrap();
    assert_eq!(parsed.tag_ids, vec![String::new(), "t1".to_string()]);
    assert_eq!(parsed.title, None);
    assert_eq!(
        parsed.payload,
        MemoryPayload::Image {
            url: "https://example.com/dog.png".to_string(),
            alt: None,
        }
    );

    let mut card = Card::with_id("card-empty", "front", "back");
    card.tag_ids = vec![String::new()];
    assert_eq!(parse_card_markdown(&card_to_markdown(&card)).unwrap(), card);
}

#[test]
fn note_record_matches_expected_text() {
    let mut memory = Memory::with_id(
        "abc",
        MemoryPayload::Note {
            content: "Hello world".to_string(),
        },
        1,
    );
    memory.updated_at = 2;
    memory.title = Some("Greeting".to_string());

    assert_eq!(
        memory_to_markdown(&memory),
        "---\nid: abc\nkind: note\ntitle: Greeting\ncreatedAt: 1\nupdatedAt: 2\ntagIds:\n---\n\nHello world"
    );
}

#[test]
fn tagged_note_matches_expected_text_and_parses_back() {
    let mut memory = Memory::with_id(
        "n1",
        MemoryPayload::Note {
            content: "Body\ntext".to_string(),
        },
        1000,
    );
    memory.title = Some("Hi".to_string());
    memory.tag_ids = vec!["tag1".to_string()];

    let text = memory_to_markdown(&memory);
    assert_eq!(
        text,
        "---\nid: n1\nkind: note\ntitle: Hi\ncreatedAt: 1000\nupdatedAt: 1000\ntagIds:\n  - tag1\n---\n\nBody\ntext"
    );
    assert_eq!(parse_memory_markdown(&text).unwrap(), memory);
}

#[test]
fn quote_record_dispatches_on_kind() {
    let text = "---\nid: q\nkind: quote\ncreatedAt: 1\nupdatedAt: 1\ntagIds:\nmeta:\n  author: Horace\n---\n\nCarpe diem";
    let memory = parse_memory_markdown(text).unwrap();

    assert_eq!(memory.kind(), MemoryKind::Quote);
    assert_eq!(
        memory.payload,
        MemoryPayload::Quote {
            text: "Carpe diem".to_string(),
            author: Some("Horace".to_string()),
            source_url: None,
        }
    );
}

#[test]
fn hand_written_note_without_optional_fields_parses() {
    let memory = parse_memory_markdown("---\nid: 'hand-made'\n---\n\njust text\n").unwrap();

    assert_eq!(memory.id, "hand-made");
    assert_eq!(memory.kind(), MemoryKind::Note);
    assert_eq!(memory.content(), Some("just text\n"));
    assert!(memory.tag_ids.is_empty());
    assert!(memory.title.is_none());
    assert!(memory.created_at > 0);
}

#[test]
fn malformed_records_are_rejected_with_a_reason() {
    assert_eq!(
        parse_memory_markdown("no front matter here").unwrap_err(),
        RecordParseError::MissingOpeningDelimiter
    );
    assert_eq!(
        parse_memory_markdown("---\nid: x\nkind: note\n").unwrap_err(),
        RecordParseError::MissingClosingDelimiter
    );
    assert_eq!(
        parse_memory_markdown("---\nid: x\nkind: video\n---\n").unwrap_err(),
        RecordParseError::UnknownKind("video".to_string())
    );
    assert_eq!(
        parse_memory_markdown("---\nkind: note\n---\n\nbody").unwrap_err(),
        RecordParseError::MissingField("id")
    );
    assert_eq!(
        parse_memory_markdown("---\nid: \"../../escaped\"\nkind: note\n---\n\nbody").unwrap_err(),
        RecordParseError::InvalidId("../../escaped".to_string())
    );
    assert_eq!(
        parse_tag_markdown("---\nid: \"a/b\"\nname: x\ncolor: default\n---\n").unwrap_err(),
        RecordParseError::InvalidId("a/b".to_string())
    );
}

#[test]
fn card_record_keeps_headings_layout() {
    let mut card = Card::with_id("c1", "What is 2 + 2?", "4");
    card.tag_ids = vec!["math".to_string()];

    let text = card_to_markdown(&card);
    assert_eq!(
        text,
        "---\nid: c1\ntagIds:\n  - math\n---\n\n# Front\n\nWhat is 2 + 2?\n\n---\n\n# Back\n\n4\n"
    );
    assert_eq!(parse_card_markdown(&text).unwrap(), card);
}

#[test]
fn card_without_back_heading_is_rejected() {
    let text = "---\nid: c1\n---\n\n# Front\n\nOnly a front\n";
    assert_eq!(
        parse_card_markdown(text).unwrap_err(),
        RecordParseError::MissingField("backSide")
    );
}

#[test]
fn tag_names_with_special_characters_roundtrip() {
    for name in ["a:b#c", "plain", "with - dash", "\"quoted\"", "multi\nline"] {
        let tag = Tag {
            id: "t1".to_string(),
            name: name.to_string(),
            color: TagColor::Secondary,
        };
        let parsed = parse_tag_markdown(&tag_to_markdown(&tag)).unwrap();
        assert_eq!(parsed, tag);
    }
}

#[test]
fn tag_with_unknown_color_falls_back_to_default() {
    let tag = parse_tag_markdown("---\nid: t9\nname: Later\ncolor: magenta\n---\n").unwrap();
    assert_eq!(tag.color, TagColor::Default);
    assert_eq!(tag.name, "Later");
}
