//! The in-memory representation of context-free grammars and the store that owns them.
//!
//! Use it like so:
//! ```
//! use cfg_workbench::grammar::{Grammar, GrammarStore, Symbol};
//!
//! let mut grammar = Grammar::new("G1", 'S');
//! grammar.add_terminal('a').unwrap();
//! grammar.add_rule("r1", 'S', "aS").unwrap();
//! grammar.add_rule("r2", 'S', "a").unwrap();
//!
//! // The class of a character depends on the grammar it is used in
//! for rule in grammar.sorted_rules() {
//!     for c in rule.rhs() {
//!         match grammar.symbol(*c) {
//!             Some(Symbol::Terminal(t)) => println!("terminal {}", t),
//!             Some(Symbol::Variable(v)) => println!("variable {}", v),
//!             None => unreachable!(),
//!         }
//!     }
//! }
//!
//! let mut store = GrammarStore::new();
//! store.add(grammar);
//! assert_eq!(store.next_generated_id(), "G2");
//! ```

mod builder;
mod cfg;
mod store;

pub use builder::*;
pub use cfg::*;
pub use store::{GrammarStore, GENERATED_ID_PREFIX};

pub(crate) use store::FreshVariables;
