//! Memory record serializer and parser.
//!
//! # Responsibility
//! - Render a `Memory` as front matter + body.
//! - Rebuild a typed `Memory` from record text with permissive coercion.
//!
//! # Invariants
//! - Front-matter key order: `id`, `kind`, `title`, `tldr`, `createdAt`,
//!   `updatedAt`, `tagIds`, `meta`.
//! - Notes keep their content in the body and quotes keep their text in the
//!   body; every other payload field lives under the nested `meta` map.
//! - Missing or wrong-typed optional fields decode as `None`; missing
//!   timestamps decode as the current time; a missing `kind` means `note`.

use crate::codec::front_matter::{encode_front_matter, FrontMatter};
use crate::model::memory::{Memory, MemoryKind, MemoryPayload};
use crate::model::now_epoch_ms;
use crate::record::{join_record, required_id, split_record, RecordParseError, RecordParseResult};

/// Serializes one memory into record text.
///
/// Empty optional fields are left out, so they read back as `None`.
pub fn memory_to_markdown(memory: &Memory) -> String {
    let mut fm = FrontMatter::new();
    fm.insert_scalar("id", memory.id.as_str());
    fm.insert_scalar("kind", memory.kind().as_str());
    fm.insert_optional("title", non_empty(memory.title.as_deref()));
    fm.insert_optional("tldr", non_empty(memory.tldr.as_deref()));
    fm.insert_scalar("createdAt", memory.created_at);
    fm.insert_scalar("updatedAt", memory.updated_at);
    fm.insert_list("tagIds", memory.tag_ids.iter().map(String::as_str));

    let body = match &memory.payload {
        MemoryPayload::Note { content } => content.as_str(),
        MemoryPayload::Image { url, alt } => {
            let mut meta = FrontMatter::new();
            meta.insert_scalar("url", url.as_str());
            meta.insert_optional("alt", non_empty(alt.as_deref()));
            fm.insert_map("meta", meta);
            ""
        }
        MemoryPayload::Quote {
            text,
            author,
            source_url,
        } => {
            let mut meta = FrontMatter::new();
            meta.insert_optional("author", non_empty(author.as_deref()));
            meta.insert_optional("sourceUrl", non_empty(source_url.as_deref()));
            fm.insert_map("meta", meta);
            text.as_str()
        }
        MemoryPayload::Article {
            url,
            excerpt,
            source,
        } => {
            let mut meta = FrontMatter::new();
            meta.insert_scalar("url", url.as_str());
            meta.insert_optional("excerpt", non_empty(excerpt.as_deref()));
            meta.insert_optional("source", non_empty(source.as_deref()));
            fm.insert_map("meta", meta);
            ""
        }
        MemoryPayload::Product {
            url,
            price,
            currency,
        } => {
            let mut meta = FrontMatter::new();
            meta.insert_optional("url", non_empty(url.as_deref()));
            meta.insert_optional("price", non_empty(price.as_deref()));
            meta.insert_optional("currency", non_empty(currency.as_deref()));
            fm.insert_map("meta", meta);
            ""
        }
    };

    join_record(&encode_front_matter(&fm), body)
}

/// Parses record text into a memory.
///
/// # Errors
/// - Missing opening or closing delimiter.
/// - `kind` present but not one of the known kinds.
/// - No usable `id`.
pub fn parse_memory_markdown(text: &str) -> RecordParseResult<Memory> {
    let parts = split_record(text)?;
    let fm = &parts.front_matter;

    let kind = match fm.get("kind") {
        None => MemoryKind::Note,
        Some(_) => {
            let raw = fm.text("kind").unwrap_or_default();
            MemoryKind::parse(&raw).ok_or(RecordParseError::UnknownKind(raw))?
        }
    };

    let id = required_id(fm)?;
    let now = now_epoch_ms();
    let empty_meta = FrontMatter::new();
    let meta = fm.map("meta").unwrap_or(&empty_meta);
    let body = parts.body;

    let payload = match kind {
        MemoryKind::Note => MemoryPayload::Note {
            content: body.to_string(),
        },
        MemoryKind::Image => MemoryPayload::Image {
            url: meta.text("url").unwrap_or_default(),
            alt: meta.non_empty_text("alt"),
        },
        MemoryKind::Quote => MemoryPayload::Quote {
            text: body.to_string(),
            author: meta.non_empty_text("author"),
            source_url: meta.non_empty_text("sourceUrl"),
        },
        MemoryKind::Article => MemoryPayload::Article {
            url: meta.text("url").unwrap_or_default(),
            excerpt: meta.non_empty_text("excerpt"),
            source: meta.non_empty_text("source"),
        },
        MemoryKind::Product => MemoryPayload::Product {
            url: meta.non_empty_text("url"),
            price: meta.non_empty_text("price"),
            currency: meta.non_empty_text("currency"),
        },
    };

    Ok(Memory {
        id,
        title: fm.non_empty_text("title"),
        tldr: fm.non_empty_text("tldr"),
        created_at: fm.integer("createdAt").unwrap_or(now),
        updated_at: fm.integer("updatedAt").unwrap_or(now),
        tag_ids: fm.text_list("tagIds").unwrap_or_default(),
        payload,
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{memory_to_markdown, parse_memory_markdown};
    use crate::model::memory::{Memory, MemoryPayload};
    use crate::record::RecordParseError;

    #[test]
    fn note_layout_is_bit_exact() {
        let mut memory = Memory::with_id(
            "n1",
            MemoryPayload::Note {
                content: "Body\ntext".to_string(),
            },
            1000,
        );
        memory.title = Some("Hi".to_string());
        memory.tag_ids = vec!["tag1".to_string()];

        assert_eq!(
            memory_to_markdown(&memory),
            "---\nid: n1\nkind: note\ntitle: Hi\ncreatedAt: 1000\nupdatedAt: 1000\ntagIds:\n  - tag1\n---\n\nBody\ntext"
        );
    }

    #[test]
    fn empty_meta_still_emits_key() {
        let memory = Memory::with_id(
            "q1",
            MemoryPayload::Quote {
                text: "Carpe diem".to_string(),
                author: None,
                source_url: None,
            },
            5,
        );
        assert_eq!(
            memory_to_markdown(&memory),
            "---\nid: q1\nkind: quote\ncreatedAt: 5\nupdatedAt: 5\ntagIds:\nmeta:\n---\n\nCarpe diem"
        );
    }

    #[test]
    fn missing_kind_defaults_to_note() {
        let memory = parse_memory_markdown("---\nid: x\n---\n\nplain").unwrap();
        assert_eq!(memory.content(), Some("plain"));
        assert!(memory.tag_ids.is_empty());
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let err = parse_memory_markdown("---\nid: x\nkind: video\n---\n").unwrap_err();
        assert_eq!(err, RecordParseError::UnknownKind("video".to_string()));
    }

    #[test]
    fn missing_id_is_rejected() {
        let err = parse_memory_markdown("---\nkind: note\n---\n\nbody").unwrap_err();
        assert_eq!(err, RecordParseError::MissingField("id"));
    }

    #[test]
    fn non_numeric_timestamps_fall_back_to_now() {
        let memory =
            parse_memory_markdown("---\nid: x\ncreatedAt: yesterday\n---\n\nb").unwrap();
        assert!(memory.created_at > 1_600_000_000_000);
        assert!(memory.updated_at > 1_600_000_000_000);
    }
}
