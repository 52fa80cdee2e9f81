//! Errors reported by the grammar operations and by the persistence layer.

use std::path::PathBuf;
use thiserror::Error;

/// A grammar file could not be read.
#[derive(Debug, Error)]
pub struct ParsingError {
    path: PathBuf,
    msg: String,
}

impl ParsingError {
    pub(crate) fn new<P: Into<PathBuf>, S: Into<String>>(path: P, msg: S) -> Self {
        Self {
            path: path.into(),
            msg: msg.into(),
        }
    }

    /// The file that failed to parse.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl std::fmt::Display for ParsingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ParsingError in {}: {}", self.path.display(), self.msg)
    }
}

/// Validation failures of grammar operations. None of them is fatal: the
/// operation that produced one left every grammar and the store untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GrammarError {
    /// No grammar with this ID is in the store
    #[error("Grammar with ID {0} not found")]
    GrammarNotFound(String),

    /// The grammar already has a rule with this ID
    #[error("Rule with ID {0} already exists")]
    DuplicateRuleId(String),

    /// The left side of a rule is not a variable of the grammar
    #[error("Left side '{0}' is not a defined variable")]
    UndefinedLeftSymbol(char),

    /// A symbol on the right side of a rule is undeclared
    #[error("Symbol '{0}' is not defined")]
    UndefinedRightSymbol(char),

    /// The grammar has no rule with this ID
    #[error("Rule with ID {0} not found")]
    RuleNotFound(String),

    /// A rule number outside of `1..=count`
    #[error("Rule number {number} out of range. There are {count} rule(s)")]
    InvalidRuleNumber {
        /// The 1-based rule number that was requested
        number: usize,
        /// How many rules the grammar has
        count: usize,
    },

    /// The operation needs a grammar in Chomsky Normal Form
    #[error("Grammar {0} is not in Chomsky Normal Form")]
    NotInCNF(String),

    /// No fresh variable is left in the variable alphabet
    #[error("Out of variable names: every symbol from 'A' to 'Z' is in use")]
    AlphabetExhausted,

    /// A rule without any symbol on its right side
    #[error("Rule {0} has an empty right side")]
    EmptyRightSide(String),

    /// A character would become a variable and a terminal at once
    #[error("Symbol '{0}' cannot be both a variable and a terminal")]
    SymbolClash(char),

    /// A grammar was built without a start symbol
    #[error("Grammar {0} does not declare a start symbol")]
    MissingStartSymbol(String),
}

/// Everything that can go wrong in a [`Session`](crate::session::Session).
#[derive(Debug, Error)]
pub enum Error {
    /// A grammar operation failed
    #[error(transparent)]
    Grammar(#[from] GrammarError),

    /// A grammar file is malformed
    #[error(transparent)]
    Parsing(#[from] ParsingError),

    /// Reading or writing a file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The operation needs an open file
    #[error("No file is currently open")]
    NoOpenFile,
}
