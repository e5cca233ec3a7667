//! Front-matter block codec.
//!
//! # Responsibility
//! - Serialize an ordered key/value mapping into the header lines of a record.
//! - Parse those lines back with an indentation-driven, two-level reader.
//!
//! # Invariants
//! - Keys are emitted in insertion order; absent optional values are never
//!   emitted.
//! - Lists render as `key:` followed by `  - <scalar>` lines; nested maps as
//!   `key:` followed by `  <subkey>: <scalar>` lines.
//! - Parsing never fails. Lines it does not understand are skipped.
//!
//! Supported YAML subset: flat scalars, one level of lists or maps. No
//! anchors, comments or multi-line scalars.

use crate::codec::scalar::{decode_scalar, encode_scalar_with, Scalar, ScalarStyle};

/// Value stored under one front-matter key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrontMatterValue {
    Scalar(Scalar),
    List(Vec<Scalar>),
    Map(FrontMatter),
}

/// Ordered front-matter mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter {
    entries: Vec<(String, FrontMatterValue)>,
}

impl FrontMatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sets `key`, replacing an existing value in place so order is kept.
    pub fn insert(&mut self, key: impl Into<String>, value: FrontMatterValue) {
        let key = key.into();
        match self.entries.iter_mut().find(|(current, _)| *current == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn insert_scalar(&mut self, key: impl Into<String>, value: impl Into<Scalar>) {
        self.insert(key, FrontMatterValue::Scalar(value.into()));
    }

    /// Sets a string value only when it is present.
    pub fn insert_optional(&mut self, key: impl Into<String>, value: Option<&str>) {
        if let Some(value) = value {
            self.insert_scalar(key, value);
        }
    }

    pub fn insert_list<I, S>(&mut self, key: impl Into<String>, items: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<Scalar>,
    {
        let items = items.into_iter().map(Into::into).collect();
        self.insert(key, FrontMatterValue::List(items));
    }

    pub fn insert_map(&mut self, key: impl Into<String>, map: FrontMatter) {
        self.insert(key, FrontMatterValue::Map(map));
    }

    pub fn get(&self, key: &str) -> Option<&FrontMatterValue> {
        self.entries
            .iter()
            .find(|(current, _)| current == key)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FrontMatterValue)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value))
    }

    /// Returns the scalar under `key`, if the value is a scalar.
    pub fn scalar(&self, key: &str) -> Option<&Scalar> {
        match self.get(key)? {
            FrontMatterValue::Scalar(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the scalar under `key` coerced to text.
    pub fn text(&self, key: &str) -> Option<String> {
        self.scalar(key).map(Scalar::to_text)
    }

    /// Returns the scalar under `key` coerced to text, dropping empty values.
    pub fn non_empty_text(&self, key: &str) -> Option<String> {
        self.text(key).filter(|value| !value.is_empty())
    }

    /// Returns the scalar under `key` coerced to an integer.
    pub fn integer(&self, key: &str) -> Option<i64> {
        self.scalar(key).and_then(Scalar::as_i64)
    }

    /// Returns list items under `key` coerced to text.
    pub fn text_list(&self, key: &str) -> Option<Vec<String>> {
        match self.get(key)? {
            FrontMatterValue::List(items) => Some(items.iter().map(Scalar::to_text).collect()),
            _ => None,
        }
    }

    /// Returns the nested mapping under `key`.
    pub fn map(&self, key: &str) -> Option<&FrontMatter> {
        match self.get(key)? {
            FrontMatterValue::Map(map) => Some(map),
            _ => None,
        }
    }
}

/// Serializes a mapping with the default quoting policy.
pub fn encode_front_matter(front_matter: &FrontMatter) -> String {
    encode_front_matter_with(front_matter, ScalarStyle::Quoted)
}

/// Serializes a mapping, one line per key, with an explicit scalar style.
///
/// Nested maps only carry scalar entries; deeper values are dropped.
pub fn encode_front_matter_with(front_matter: &FrontMatter, style: ScalarStyle) -> String {
    let mut lines = Vec::with_capacity(front_matter.len());
    for (key, value) in front_matter.iter() {
        match value {
            FrontMatterValue::Scalar(scalar) => {
                lines.push(format!("{key}: {}", encode_scalar_with(scalar, style)));
            }
            FrontMatterValue::List(items) => {
                lines.push(format!("{key}:"));
                for item in items {
                    lines.push(format!("  - {}", encode_scalar_with(item, style)));
                }
            }
            FrontMatterValue::Map(map) => {
                lines.push(format!("{key}:"));
                for (sub_key, sub_value) in map.iter() {
                    if let FrontMatterValue::Scalar(scalar) = sub_value {
                        lines.push(format!("  {sub_key}: {}", encode_scalar_with(scalar, style)));
                    }
                }
            }
        }
    }
    lines.join("\n")
}

enum Context {
    Map(FrontMatter),
    List(Vec<Scalar>),
}

struct Frame {
    indent: usize,
    key: Option<String>,
    context: Context,
}

/// Parses a front-matter block (the text between the delimiters).
///
/// A `key:` line with nothing after the colon opens a nested context two
/// columns deeper; the first `- item` (or bare `-`) line inside it turns that
/// context into a list. Dedenting closes contexts. List items at the top level and keys
/// inside a list are ignored.
pub fn decode_front_matter(block: &str) -> FrontMatter {
    let mut stack = vec![Frame {
        indent: 0,
        key: None,
        context: Context::Map(FrontMatter::new()),
    }];

    for raw in block.split('\n') {
        let raw = raw.strip_suffix('\r').unwrap_or(raw);
        if raw.trim().is_empty() {
            continue;
        }
        let indent = raw.chars().take_while(|ch| ch.is_whitespace()).count();
        let line = raw.trim();

        while stack.len() > 1 && stack.last().is_some_and(|frame| indent < frame.indent) {
            close_frame(&mut stack);
        }

        let Some(frame) = stack.last_mut() else {
            break;
        };

        // A bare `-` is an empty item: the encoder writes `  - ` for "".
        let list_item = if line == "-" {
            Some("")
        } else {
            line.strip_prefix("- ")
        };
        if let Some(item) = list_item {
            if frame.key.is_none() {
                continue;
            }
            if let Context::Map(_) = frame.context {
                frame.context = Context::List(Vec::new());
            }
            if let Context::List(items) = &mut frame.context {
                items.push(decode_scalar(item.trim()));
            }
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();
        let Context::Map(map) = &mut frame.context else {
            continue;
        };

        if value.is_empty() {
            stack.push(Frame {
                indent: indent + 2,
                key: Some(key.to_string()),
                context: Context::Map(FrontMatter::new()),
            });
        } else {
            map.insert_scalar(key, decode_scalar(value));
        }
    }

    while stack.len() > 1 {
        close_frame(&mut stack);
    }

    match stack.pop() {
        Some(Frame {
            context: Context::Map(root),
            ..
        }) => root,
        _ => FrontMatter::new(),
    }
}

fn close_frame(stack: &mut Vec<Frame>) {
    let Some(frame) = stack.pop() else {
        return;
    };
    let Some(key) = frame.key else {
        return;
    };
    let value = match frame.context {
        Context::Map(map) => FrontMatterValue::Map(map),
        Context::List(items) => FrontMatterValue::List(items),
    };
    if let Some(Frame {
        context: Context::Map(parent),
        ..
    }) = stack.last_mut()
    {
        parent.insert(key, value);
    }
}
