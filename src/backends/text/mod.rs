//! Write grammars in the flat-text format.
//!
//! Every grammar becomes a block like this:
//! ```text
//! ====
//! Grammar ID: G1
//! Start Symbol: S
//! Variables: A, S
//! Terminals: a, b
//! r1: S -> aA
//! r2: A -> b
//! ```

mod generator;

pub use crate::parser::text::GRAMMAR_SEPARATOR;
pub use generator::TextGenerator;
