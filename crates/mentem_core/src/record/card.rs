//! Flashcard record serializer and parser.
//!
//! Card records differ from memory records: front matter only
//! carries `id` and `tagIds`, written without any quoting, and the two sides
//! live in the body under literal `# Front` / `# Back` headings separated by
//! a `---` line. The layout is kept byte-for-byte compatible with existing
//! card files.

use crate::codec::front_matter::{encode_front_matter_with, FrontMatter};
use crate::codec::scalar::ScalarStyle;
use crate::model::card::Card;
use crate::record::{join_record, required_id, split_record, RecordParseError, RecordParseResult};

const FRONT_HEADING: &str = "# Front\n\n";
const BACK_SEPARATOR: &str = "\n\n---\n\n# Back\n\n";

/// Serializes one card into record text.
pub fn card_to_markdown(card: &Card) -> String {
    let mut fm = FrontMatter::new();
    fm.insert_scalar("id", card.id.as_str());
    fm.insert_list("tagIds", card.tag_ids.iter().map(String::as_str));

    let body = format!(
        "{FRONT_HEADING}{}{BACK_SEPARATOR}{}\n",
        card.front_side, card.back_side
    );
    join_record(&encode_front_matter_with(&fm, ScalarStyle::Verbatim), &body)
}

/// Parses record text into a card.
///
/// The first `# Back` separator after the front heading splits the sides;
/// one trailing newline is removed from the back side.
pub fn parse_card_markdown(text: &str) -> RecordParseResult<Card> {
    let parts = split_record(text)?;
    let fm = &parts.front_matter;

    let id = required_id(fm)?;
    let sides = parts
        .body
        .strip_prefix(FRONT_HEADING)
        .ok_or(RecordParseError::MissingField("frontSide"))?;
    let (front_side, back_side) = sides
        .split_once(BACK_SEPARATOR)
        .ok_or(RecordParseError::MissingField("backSide"))?;
    let back_side = back_side.strip_suffix('\n').unwrap_or(back_side);

    Ok(Card {
        id,
        front_side: front_side.to_string(),
        back_side: back_side.to_string(),
        tag_ids: fm.text_list("tagIds").unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::{card_to_markdown, parse_card_markdown};
    use crate::model::card::Card;
    use crate::record::RecordParseError;

    #[test]
    fn card_layout_is_bit_exact() {
        let mut card = Card::with_id("c1", "What is Rust?", "A language.");
        card.tag_ids = vec!["t-1".to_string()];

        assert_eq!(
            card_to_markdown(&card),
            "---\nid: c1\ntagIds:\n  - t-1\n---\n\n# Front\n\nWhat is Rust?\n\n---\n\n# Back\n\nA language.\n"
        );
    }

    #[test]
    fn card_without_back_heading_is_rejected() {
        let err = parse_card_markdown("---\nid: c1\n---\n\n# Front\n\nonly front\n").unwrap_err();
        assert_eq!(err, RecordParseError::MissingField("backSide"));
    }

    #[test]
    fn multi_line_sides_are_preserved() {
        let card = Card::with_id("c2", "line one\n\nline two", "answer\n");
        let parsed = parse_card_markdown(&card_to_markdown(&card)).unwrap();
        assert_eq!(parsed, card);
    }
}
