//! Pure helpers shared by the wire types.
//!
//! The WordPress API is loose about JSON types (numbers as strings, `false`
//! for "no value", empty strings for missing fields); these helpers normalize
//! that at the serde boundary so the typed structs stay strict.

pub mod aliases;
pub mod string;

pub use string::{lenient_string, lenient_vec, some_if_not_empty};
