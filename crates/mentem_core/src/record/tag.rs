//! Tag record serializer and parser.
//!
//! Tag records are header-only: `---\nid: ..\nname: ..\ncolor: ..\n---\n`
//! with no body. Only `name` goes through the quoting rules; `id` and `color`
//! are written as-is.

use crate::codec::scalar::{encode_scalar, Scalar};
use crate::model::tag::{Tag, TagColor};
use crate::record::{required_id, split_record, RecordParseResult, DELIMITER};

/// Serializes one tag into record text.
pub fn tag_to_markdown(tag: &Tag) -> String {
    format!(
        "{DELIMITER}\nid: {}\nname: {}\ncolor: {}\n{DELIMITER}\n",
        tag.id,
        encode_scalar(&Scalar::from(tag.name.as_str())),
        tag.color
    )
}

/// Parses record text into a tag. Unknown colors become `default`.
pub fn parse_tag_markdown(text: &str) -> RecordParseResult<Tag> {
    let parts = split_record(text)?;
    let fm = &parts.front_matter;

    let id = required_id(fm)?;

    Ok(Tag {
        id,
        name: fm.text("name").unwrap_or_default(),
        color: fm
            .text("color")
            .map(|color| TagColor::parse_lossy(&color))
            .unwrap_or_default(),
    })
}
