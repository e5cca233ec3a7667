//! Record envelope: front matter + body, one entity per text file.
//!
//! # Responsibility
//! - Split raw file text into a decoded front-matter mapping and a body.
//! - Join a front-matter block and a body into the on-disk layout.
//! - Host the per-kind serializers/parsers (`memory`, `card`, `tag`).
//!
//! # Invariants
//! - Layout is `---\n<front matter>\n---\n\n<body>`; exactly one blank line
//!   separates the closing delimiter from the body.
//! - Parsing never panics; malformed input yields `RecordParseError`, which
//!   callers treat as "skip this record".
//!
//! # See also
//! - `codec::front_matter` for the header grammar.

pub mod card;
pub mod memory;
pub mod tag;

use crate::codec::front_matter::{decode_front_matter, FrontMatter};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Opening and closing line of the front-matter block.
pub const DELIMITER: &str = "---";

pub type RecordParseResult<T> = Result<T, RecordParseError>;

/// Reason a text file is not a usable record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordParseError {
    /// Text does not begin with `---`.
    MissingOpeningDelimiter,
    /// No `\n---` after the opening delimiter.
    MissingClosingDelimiter,
    /// `kind` holds a value outside the known memory kinds.
    UnknownKind(String),
    /// A field required to address or rebuild the entity is absent.
    MissingField(&'static str),
    /// `id` cannot name a file inside its collection directory.
    InvalidId(String),
}

impl Display for RecordParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingOpeningDelimiter => write!(f, "record does not start with `---`"),
            Self::MissingClosingDelimiter => write!(f, "record front matter is not closed"),
            Self::UnknownKind(kind) => write!(f, "unknown memory kind `{kind}`"),
            Self::MissingField(field) => write!(f, "record is missing `{field}`"),
            Self::InvalidId(id) => write!(f, "record id `{id}` is not a plain file name"),
        }
    }
}

impl Error for RecordParseError {}

/// Decoded envelope of one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordParts<'a> {
    pub front_matter: FrontMatter,
    /// Text after the closing delimiter with leading whitespace removed.
    pub body: &'a str,
}

/// Splits raw file text into front matter and body.
///
/// Leading whitespace before the opening delimiter is tolerated.
pub fn split_record(text: &str) -> RecordParseResult<RecordParts<'_>> {
    let trimmed = text.trim_start();
    let Some(after_open) = trimmed.strip_prefix(DELIMITER) else {
        return Err(RecordParseError::MissingOpeningDelimiter);
    };

    let closing = format!("\n{DELIMITER}");
    let Some(close_idx) = after_open.find(closing.as_str()) else {
        return Err(RecordParseError::MissingClosingDelimiter);
    };

    let block = after_open[..close_idx].trim();
    let body = after_open[close_idx + closing.len()..].trim_start();

    Ok(RecordParts {
        front_matter: decode_front_matter(block),
        body,
    })
}

/// Joins an encoded front-matter block and a body into record text.
pub fn join_record(front_matter_block: &str, body: &str) -> String {
    format!("{DELIMITER}\n{front_matter_block}\n{DELIMITER}\n\n{body}")
}

/// Whether `id` can be used as the stem of a file in a collection directory.
///
/// Accepted ids are one path component: non-empty, no separators, no NUL and
/// no leading `.` (which also rules out `.` and `..`).
pub fn is_valid_record_id(id: &str) -> bool {
    !id.is_empty()
        && !id.starts_with('.')
        && !id.contains(|ch: char| matches!(ch, '/' | '\\' | '\0'))
}

/// Builds the file name for an entity id, or `None` when the id is not a
/// single path component.
pub fn record_file_name(id: &str) -> Option<String> {
    is_valid_record_id(id).then(|| format!("{id}.{}", crate::config::RECORD_EXTENSION))
}

/// Reads the `id` key of a record and checks it can address a file.
pub(crate) fn required_id(front_matter: &FrontMatter) -> RecordParseResult<String> {
    let id = front_matter
        .non_empty_text("id")
        .ok_or(RecordParseError::MissingField("id"))?;
    if is_valid_record_id(&id) {
        Ok(id)
    } else {
        Err(RecordParseError::InvalidId(id))
    }
}

/// Returns the id encoded in a record file name, if it is one.
pub fn record_id_from_file_name(file_name: &str) -> Option<&str> {
    file_name
        .strip_suffix(crate::config::RECORD_EXTENSION)
        .and_then(|stem| stem.strip_suffix('.'))
        .filter(|stem| !stem.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{
        is_valid_record_id, join_record, record_file_name, record_id_from_file_name, split_record,
        RecordParseError,
    };

    #[test]
    fn split_separates_block_and_body() {
        let parts = split_record("---\nid: a\n---\n\nhello\n").unwrap();
        assert_eq!(parts.front_matter.text("id").as_deref(), Some("a"));
        assert_eq!(parts.body, "hello\n");
    }

    #[test]
    fn split_tolerates_leading_whitespace() {
        let parts = split_record("\n  ---\nid: a\n---\nbody").unwrap();
        assert_eq!(parts.body, "body");
    }

    #[test]
    fn split_rejects_missing_delimiters() {
        assert_eq!(
            split_record("id: a\n---\n").unwrap_err(),
            RecordParseError::MissingOpeningDelimiter
        );
        assert_eq!(
            split_record("---\nid: a\nbody").unwrap_err(),
            RecordParseError::MissingClosingDelimiter
        );
    }

    #[test]
    fn join_puts_one_blank_line_before_body() {
        assert_eq!(join_record("id: a", "x"), "---\nid: a\n---\n\nx");
    }

    #[test]
    fn file_names_map_to_ids() {
        assert_eq!(record_file_name("n1").as_deref(), Some("n1.md"));
        assert_eq!(record_id_from_file_name("n1.md"), Some("n1"));
        assert_eq!(record_id_from_file_name(".md"), None);
        assert_eq!(record_id_from_file_name("notes.txt"), None);
        assert_eq!(record_id_from_file_name("readme"), None);
    }

    #[test]
    fn ids_that_leave_the_collection_directory_have_no_file_name() {
        for id in ["", ".", "..", "../../escaped", "a/b", "a\\b", ".hidden", "nul\0byte"] {
            assert!(!is_valid_record_id(id), "{id:?} should be rejected");
            assert_eq!(record_file_name(id), None);
        }
        assert!(is_valid_record_id("4f0c9a2e1b7d4c1e8a3b5d6f7a8b9c0d"));
        assert!(is_valid_record_id("note-1.v2"));
    }
}
