//! Queries and transformations on grammars.
//!
//! Every transformation builds its result in isolation and only the store-level
//! entry points register it, so a failure never leaves a half-built grammar behind:
//! ```
//! use cfg_workbench::{
//!     algorithms::{algebra, membership, normal_form},
//!     grammar::{Grammar, GrammarStore},
//! };
//!
//! let mut store = GrammarStore::new();
//! for (id, terminal) in [("G1", 'a'), ("G2", 'b')] {
//!     let grammar = Grammar::builder(id)
//!         .start_symbol('S')
//!         .terminal(terminal)
//!         .rule("r1", 'S', terminal.to_string())
//!         .build()
//!         .unwrap();
//!     store.add(grammar);
//! }
//!
//! let union = algebra::union(&mut store, "G1", "G2").unwrap();
//! let cnf = normal_form::chomskify(&mut store, &union).unwrap().unwrap();
//! assert!(membership::cyk(&store, &cnf, "b").unwrap().accepted());
//! ```

pub mod algebra;
pub mod emptiness;
pub mod membership;
pub mod normal_form;

use std::collections::BTreeSet;

use crate::{
    error::GrammarError,
    grammar::{Grammar, RULE_ID_PREFIX},
};

/// The parts of a grammar under construction.
pub(crate) struct Draft {
    pub(crate) start: char,
    pub(crate) variables: BTreeSet<char>,
    pub(crate) terminals: BTreeSet<char>,
    pub(crate) rules: Vec<(char, Vec<char>)>,
}

impl Draft {
    /// Turn the draft into a grammar. Rules get the IDs `r1`, `r2`, ... in draft order.
    pub(crate) fn build<S: Into<String>>(self, id: S) -> Result<Grammar, GrammarError> {
        let mut grammar = Grammar::new(id, self.start);

        for variable in self.variables {
            grammar.add_variable(variable)?;
        }

        for terminal in self.terminals {
            grammar.add_terminal(terminal)?;
        }

        for (i, (lhs, rhs)) in self.rules.into_iter().enumerate() {
            let body: String = rhs.into_iter().collect();
            grammar.add_rule(format!("{}{}", RULE_ID_PREFIX, i + 1), lhs, body)?;
        }

        Ok(grammar)
    }
}
