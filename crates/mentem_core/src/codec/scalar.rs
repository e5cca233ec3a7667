//! Single-line scalar token codec.
//!
//! # Responsibility
//! - Render primitive front-matter values as one-line text tokens.
//! - Recover typed scalars from tokens without ever failing.
//!
//! # Invariants
//! - Quoted tokens use the JSON string literal form (double quotes,
//!   backslash escapes), so they never contain a raw newline.
//! - Strings containing `:`, `#`, `-` or a newline are always quoted.
//! - Decoding is total: unrecognized tokens come back as strings verbatim.
//! - Numbers keep their literal text, so `1.50` or `007` survive a
//!   decode/encode cycle unchanged.

use once_cell::sync::Lazy;
use regex::Regex;

static NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?[0-9]+(?:\.[0-9]+)?$").expect("valid number regex"));
static NEEDS_QUOTES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[:#\-\n]").expect("valid special char regex"));

/// One primitive front-matter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scalar {
    Bool(bool),
    /// Numeric literal matching `-?digits(.digits)?`, stored as written.
    Number(String),
    String(String),
}

/// Rendering policy for string scalars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScalarStyle {
    /// Quote strings that would not survive the decoder bare.
    #[default]
    Quoted,
    /// Write strings as-is. Used by card records, whose on-disk layout
    /// never quoted anything.
    Verbatim,
}

impl Scalar {
    /// Builds a number scalar from an integer.
    pub fn integer(value: i64) -> Self {
        Self::Number(value.to_string())
    }

    /// Coerces any scalar into its textual form.
    pub fn to_text(&self) -> String {
        match self {
            Self::Bool(value) => value.to_string(),
            Self::Number(raw) => raw.clone(),
            Self::String(value) => value.clone(),
        }
    }

    /// Coerces a scalar into an integer, if it looks numeric.
    ///
    /// Decimal literals are truncated toward zero.
    pub fn as_i64(&self) -> Option<i64> {
        let raw = match self {
            Self::Bool(_) => return None,
            Self::Number(raw) => raw.as_str(),
            Self::String(value) => value.trim(),
        };
        raw.parse::<i64>().ok().or_else(|| {
            raw.parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .map(|value| value.trunc() as i64)
        })
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::integer(value)
    }
}

/// Encodes one scalar with the default quoting policy.
pub fn encode_scalar(value: &Scalar) -> String {
    encode_scalar_with(value, ScalarStyle::Quoted)
}

/// Encodes one scalar with an explicit string rendering policy.
pub fn encode_scalar_with(value: &Scalar, style: ScalarStyle) -> String {
    match value {
        Scalar::Bool(flag) => flag.to_string(),
        Scalar::Number(raw) => raw.clone(),
        Scalar::String(text) => match style {
            ScalarStyle::Quoted if needs_quotes(text) => quote(text),
            _ => text.clone(),
        },
    }
}

/// Decodes one token. Never fails.
pub fn decode_scalar(token: &str) -> Scalar {
    match token {
        "true" => return Scalar::Bool(true),
        "false" => return Scalar::Bool(false),
        _ => {}
    }

    if NUMBER_RE.is_match(token) {
        return Scalar::Number(token.to_string());
    }

    if token.len() >= 2 && token.starts_with('"') && token.ends_with('"') {
        if let Ok(unquoted) = serde_json::from_str::<String>(token) {
            return Scalar::String(unquoted);
        }
        // Broken escapes fall through and are kept verbatim.
    } else if token.len() >= 2 && token.starts_with('\'') && token.ends_with('\'') {
        return Scalar::String(token[1..token.len() - 1].to_string());
    }

    Scalar::String(token.to_string())
}

fn needs_quotes(text: &str) -> bool {
    NEEDS_QUOTES_RE.is_match(text)
        || text.trim() != text
        || text.starts_with('"')
        || text.starts_with('\'')
}

fn quote(text: &str) -> String {
    serde_json::Value::String(text.to_string()).to_string()
}

#[cfg(test)]
mod tests {
    use super::{decode_scalar, encode_scalar, encode_scalar_with, Scalar, ScalarStyle};

    #[test]
    fn plain_strings_render_bare() {
        assert_eq!(encode_scalar(&Scalar::from("hello world")), "hello world");
        assert_eq!(encode_scalar(&Scalar::from("")), "");
    }

    #[test]
    fn special_characters_force_quotes() {
        assert_eq!(encode_scalar(&Scalar::from("a:b#c")), "\"a:b#c\"");
        assert_eq!(encode_scalar(&Scalar::from("x-y")), "\"x-y\"");
        assert_eq!(encode_scalar(&Scalar::from("one\ntwo")), "\"one\\ntwo\"");
        assert_eq!(encode_scalar(&Scalar::from(" padded")), "\" padded\"");
    }

    #[test]
    fn verbatim_style_never_quotes() {
        let encoded = encode_scalar_with(&Scalar::from("a-b"), ScalarStyle::Verbatim);
        assert_eq!(encoded, "a-b");
    }

    #[test]
    fn decode_recognizes_literals_and_numbers() {
        assert_eq!(decode_scalar("true"), Scalar::Bool(true));
        assert_eq!(decode_scalar("false"), Scalar::Bool(false));
        assert_eq!(decode_scalar("-12.50"), Scalar::Number("-12.50".to_string()));
        assert_eq!(decode_scalar("1.2.3"), Scalar::from("1.2.3"));
        assert_eq!(decode_scalar("True"), Scalar::from("True"));
    }

    #[test]
    fn decode_unescapes_quoted_tokens() {
        assert_eq!(decode_scalar("\"a:b#c\""), Scalar::from("a:b#c"));
        assert_eq!(decode_scalar("\"it's \\\"x\\\"\""), Scalar::from("it's \"x\""));
        assert_eq!(decode_scalar("'single: quoted'"), Scalar::from("single: quoted"));
    }

    #[test]
    fn decode_keeps_malformed_quotes_verbatim() {
        assert_eq!(decode_scalar("\"bad \\q\""), Scalar::from("\"bad \\q\""));
        assert_eq!(decode_scalar("\""), Scalar::from("\""));
    }

    #[test]
    fn quoted_strings_decode_back_exactly() {
        for value in ["a:b#c", "- dash", "line\nbreak", "tab\there", "\"lead", " x "] {
            let encoded = encode_scalar(&Scalar::from(value));
            assert_eq!(decode_scalar(&encoded), Scalar::from(value), "value {value:?}");
        }
    }

    #[test]
    fn numbers_coerce_to_integers() {
        assert_eq!(Scalar::integer(1000).as_i64(), Some(1000));
        assert_eq!(decode_scalar("12.9").as_i64(), Some(12));
        assert_eq!(Scalar::from(" 42 ").as_i64(), Some(42));
        assert_eq!(Scalar::from("soon").as_i64(), None);
        assert_eq!(Scalar::Bool(true).as_i64(), None);
    }
}
