//! Write grammars in JSON format.
//!
//! Use it like so:
//! ```no_run
//! use cfg_workbench::{backends::json::JsonGenerator, grammar::GrammarStore};
//!
//! let store = GrammarStore::new();
//! JsonGenerator::new().generate("grammars.json", store.iter()).unwrap();
//! ```
//! The output is an array with one object per grammar:
//! `{"id": "G1", "start": "S", "variables": [...], "terminals": [...], "rules": [{"id": "r1", "lhs": "S", "rhs": "aA"}]}`.

mod generator;
mod record;

pub use generator::JsonGenerator;
pub(crate) use record::GrammarRecord;
