//! Text codecs for the record format.
//!
//! # Responsibility
//! - Convert primitive values to and from single-line tokens (`scalar`).
//! - Convert the header mapping of a record to and from text (`front_matter`).
//!
//! # Invariants
//! - Decoding is total; malformed input degrades to strings or skipped lines.

pub mod front_matter;
pub mod scalar;

pub use front_matter::{
    decode_front_matter, encode_front_matter, encode_front_matter_with, FrontMatter,
    FrontMatterValue,
};
pub use scalar::{decode_scalar, encode_scalar, encode_scalar_with, Scalar, ScalarStyle};
