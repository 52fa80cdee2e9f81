//! Backends write the grammars of a store to disk.
//!
//! - `text`: the flat-text format, one block per grammar
//! - `json`: an array of JSON objects

pub mod json;
pub mod text;
