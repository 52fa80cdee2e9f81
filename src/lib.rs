//! This library manages context-free grammars and runs the classic textbook algorithms on them.
//!
//! It consists of
//! - __grammar__: The grammar model, a builder for it and the [`GrammarStore`](grammar::GrammarStore) that owns grammars by ID.
//! - __algorithms__: Chomsky Normal Form check and conversion, CYK membership, emptiness and the
//!   language algebra (union, concatenation, Kleene star).
//! - __frontend__: Load grammars from flat-text or JSON files.
//! - __backend__: Write grammars back into one of these formats.
//!   Current backends are
//!   - `text`: The flat-text format, one `====` block per grammar
//!   - `json`: A list of grammar objects
//!
//! ## Getting Started
//! Grammars are created with [`Grammar::builder()`](grammar::Grammar::builder) or loaded from a file by a
//! [`Session`](session::Session). Every result of an algorithm lands in the store under a new ID:
//! ```
//! use cfg_workbench::{
//!     algorithms::{membership, normal_form},
//!     grammar::{Grammar, GrammarStore},
//! };
//!
//! // a^n b^n
//! let grammar = Grammar::builder("G1")
//!     .start_symbol('S')
//!     .terminals(['a', 'b'])
//!     .rule("r1", 'S', "aSb")
//!     .rule("r2", 'S', "ab")
//!     .build()
//!     .unwrap();
//!
//! let mut store = GrammarStore::new();
//! store.add(grammar);
//!
//! let cnf = normal_form::chomskify(&mut store, "G1").unwrap().unwrap();
//! assert!(membership::cyk(&store, &cnf, "aaabbb").unwrap().accepted());
//! assert!(!membership::cyk(&store, &cnf, "aab").unwrap().accepted());
//! ```
//! Then, you can write the store into one of the provided backends:
//! ```no_run
//! # use cfg_workbench::grammar::GrammarStore;
//! # let store = GrammarStore::new();
//! cfg_workbench::backends::text::TextGenerator::new().generate("grammars.txt", store.iter()).unwrap();
//! // or
//! cfg_workbench::backends::json::JsonGenerator::new().generate("grammars.json", store.iter()).unwrap();
//! ```
//! The `cfg-shell` binary wraps a [`Session`](session::Session) into an interactive command loop.

#![deny(missing_docs)]

pub(crate) mod parser;

pub mod algorithms;
pub mod backends;
pub mod error;
pub mod grammar;
pub mod session;

#[cfg(test)]
mod tests;
