//! Decide whether a word belongs to the language of a grammar in CNF, using the
//! Cocke–Younger–Kasami algorithm.
//!
//! Use it like so:
//! ```
//! use cfg_workbench::{algorithms::membership::CykParser, grammar::Grammar};
//!
//! let grammar = Grammar::builder("G1")
//!     .start_symbol('S')
//!     .variables(['A', 'B'])
//!     .terminals(['a', 'b'])
//!     .rule("r1", 'S', "AB")
//!     .rule("r2", 'A', "a")
//!     .rule("r3", 'B', "b")
//!     .build()
//!     .unwrap();
//!
//! let parser = CykParser::new(&grammar).unwrap();
//! assert!(parser.parse("ab").accepted());
//! assert!(!parser.parse("ba").accepted());
//! ```

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter, Result as FmtResult};

use ahash::AHashMap;
use itertools::Itertools;

use crate::{
    algorithms::normal_form::is_cnf,
    error::GrammarError,
    grammar::{Grammar, GrammarStore, EPSILON},
};

/// The triangular table of the CYK algorithm.
///
/// The cell `(i, j)` holds every variable that derives the characters `i..=j` of the word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CykTable {
    cells: Vec<Vec<BTreeSet<char>>>,
}

impl CykTable {
    fn new(len: usize) -> Self {
        Self {
            cells: (0..len).map(|i| vec![BTreeSet::new(); len - i]).collect(),
        }
    }

    /// Length of the parsed word.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the table is empty. This never happens for a table returned by [`CykParser`].
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The variables that derive the characters `i..=j` of the word.
    ///
    /// # Panics
    /// Panics unless `i <= j < len()`.
    pub fn cell(&self, i: usize, j: usize) -> &BTreeSet<char> {
        &self.cells[i][j - i]
    }

    fn cell_mut(&mut self, i: usize, j: usize) -> &mut BTreeSet<char> {
        &mut self.cells[i][j - i]
    }
}

impl Display for CykTable {
    /// Widest span first, so the cell of the whole word is on top.
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        let n = self.len();

        for span in (1..=n).rev() {
            let row = (0..=n - span).map(|i| format!("{{{}}}", self.cell(i, i + span - 1).iter().join(","))).join(" ");
            writeln!(f, "{}", row)?;
        }

        Ok(())
    }
}

/// Outcome of [`CykParser::parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CykOutcome {
    accepted: bool,
    table: Option<CykTable>,
}

impl CykOutcome {
    /// Whether the word is in the language.
    pub fn accepted(&self) -> bool {
        self.accepted
    }

    /// The filled table. `None` if the word was decided without one:
    /// the empty word, or a word with a character that is not a terminal.
    pub fn table(&self) -> Option<&CykTable> {
        self.table.as_ref()
    }
}

/// A CYK parser for one grammar in CNF.
pub struct CykParser<'a> {
    grammar: &'a Grammar,
    /// terminal -> variables `A` with `A -> terminal`
    unary: AHashMap<char, Vec<char>>,
    /// `(A, B, C)` for every rule `A -> BC`
    binary: Vec<(char, char, char)>,
}

impl<'a> CykParser<'a> {
    /// Create a parser. Fails with [`GrammarError::NotInCNF`] unless `grammar` is in CNF.
    pub fn new(grammar: &'a Grammar) -> Result<Self, GrammarError> {
        if !is_cnf(grammar) {
            return Err(GrammarError::NotInCNF(grammar.id().to_string()));
        }

        let mut unary = AHashMap::<char, Vec<char>>::new();
        let mut binary = Vec::new();

        for rule in grammar.rules() {
            match rule.rhs() {
                [a] => unary.entry(*a).or_default().push(rule.lhs()),
                [b, c] => binary.push((rule.lhs(), *b, *c)),
                _ => unreachable!(),
            }
        }

        Ok(Self {
            grammar,
            unary,
            binary,
        })
    }

    /// Decide whether `word` is in the language of the grammar.
    pub fn parse(&self, word: &str) -> CykOutcome {
        let start = self.grammar.start_symbol();
        let word: Vec<char> = word.chars().collect();

        if word.is_empty() {
            let accepted = self.unary.get(&EPSILON).is_some_and(|heads| heads.contains(&start));
            return CykOutcome {
                accepted,
                table: None,
            };
        }

        if let Some(c) = word.iter().find(|c| **c == EPSILON || !self.grammar.is_terminal(**c)) {
            tracing::debug!("'{}' is not a terminal of {}", c, self.grammar.id());
            return CykOutcome {
                accepted: false,
                table: None,
            };
        }

        let n = word.len();
        let mut table = CykTable::new(n);

        for (i, c) in word.iter().enumerate() {
            if let Some(heads) = self.unary.get(c) {
                table.cell_mut(i, i).extend(heads.iter().copied());
            }
        }

        for span in 2..=n {
            for i in 0..=n - span {
                let j = i + span - 1;

                for k in i..j {
                    for (a, b, c) in &self.binary {
                        if table.cell(i, k).contains(b) && table.cell(k + 1, j).contains(c) {
                            table.cell_mut(i, j).insert(*a);
                        }
                    }
                }
            }
        }

        let accepted = table.cell(0, n - 1).contains(&start);
        tracing::debug!("CYK table for a word of length {} in {}: accepted={}", n, self.grammar.id(), accepted);

        CykOutcome {
            accepted,
            table: Some(table),
        }
    }
}

/// Run the CYK algorithm for `word` on the grammar `id` of `store`.
pub fn cyk(store: &GrammarStore, id: &str, word: &str) -> Result<CykOutcome, GrammarError> {
    let parser = CykParser::new(store.grammar(id)?)?;
    Ok(parser.parse(word))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `a^n b^n` for `n >= 1`
    fn anbn() -> Grammar {
        Grammar::builder("G1")
            .start_symbol('S')
            .variables(['A', 'B', 'C'])
            .terminals(['a', 'b'])
            .rule("r1", 'A', "a")
            .rule("r2", 'B', "b")
            .rule("r3", 'S', "AC")
            .rule("r4", 'C', "SB")
            .rule("r5", 'S', "AB")
            .build()
            .unwrap()
    }

    #[test]
    fn test_anbn() {
        let grammar = anbn();
        let parser = CykParser::new(&grammar).unwrap();

        for word in ["ab", "aabb", "aaabbb"] {
            assert!(parser.parse(word).accepted(), "{}", word);
        }

        for word in ["a", "b", "ba", "abab", "aab", "abb"] {
            assert!(!parser.parse(word).accepted(), "{}", word);
        }
    }

    #[test]
    fn test_table_cells() {
        let grammar = anbn();
        let outcome = CykParser::new(&grammar).unwrap().parse("aabb");
        let table = outcome.table().unwrap();

        assert_eq!(table.len(), 4);
        assert_eq!(table.cell(0, 0), &BTreeSet::from(['A']));
        assert_eq!(table.cell(1, 2), &BTreeSet::from(['S']));
        assert_eq!(table.cell(1, 3), &BTreeSet::from(['C']));
        assert_eq!(table.cell(0, 3), &BTreeSet::from(['S']));
        assert_eq!(table.to_string(), "{S}\n{} {C}\n{} {S} {}\n{A} {A} {B} {B}\n");
    }

    #[test]
    fn test_unknown_symbol() {
        let grammar = anbn();
        let outcome = CykParser::new(&grammar).unwrap().parse("abc");

        assert!(!outcome.accepted());
        assert!(outcome.table().is_none());
    }

    #[test]
    fn test_empty_word() {
        let grammar = anbn();
        assert!(!CykParser::new(&grammar).unwrap().parse("").accepted());

        let with_epsilon = Grammar::builder("G2")
            .start_symbol('S')
            .variable('A')
            .terminals(['a', EPSILON])
            .rule("r1", 'S', "ε")
            .rule("r2", 'S', "AA")
            .rule("r3", 'A', "a")
            .build()
            .unwrap();
        let parser = CykParser::new(&with_epsilon).unwrap();

        assert!(parser.parse("").accepted());
        assert!(parser.parse("aa").accepted());
        assert!(!parser.parse("ε").accepted());
    }

    #[test]
    fn test_not_in_cnf() {
        let grammar = Grammar::builder("G3")
            .start_symbol('S')
            .terminal('a')
            .rule("r1", 'S', "aa")
            .build()
            .unwrap();

        assert_eq!(CykParser::new(&grammar).err(), Some(GrammarError::NotInCNF("G3".to_string())));
    }
}
