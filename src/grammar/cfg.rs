use std::collections::{BTreeSet, HashMap};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::ops::RangeInclusive;

use ahash::RandomState;
use itertools::Itertools;

use crate::{
    error::GrammarError,
    grammar::GrammarBuilder,
};

/// The terminal that stands for the empty string.
pub const EPSILON: char = 'ε';

/// The characters that may be minted as fresh variables.
pub const VARIABLE_ALPHABET: RangeInclusive<char> = 'A'..='Z';

/// Prefix of the generated rule IDs (`r1`, `r2`, ...).
pub const RULE_ID_PREFIX: char = 'r';

/// A character classified by the grammar it appears in.
#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
pub enum Symbol {
    /// A non-terminal of the grammar
    Variable(char),
    /// A terminal of the grammar, possibly [`EPSILON`]
    Terminal(char),
}

impl Symbol {
    /// The character behind this symbol.
    pub fn content(&self) -> char {
        match self {
            Symbol::Variable(c) | Symbol::Terminal(c) => *c,
        }
    }
}

/// A single production rule `lhs -> rhs`.
#[derive(Debug, Clone, Eq, Hash, PartialEq)]
pub struct Rule {
    id: String,
    lhs: char,
    rhs: Vec<char>,
}

impl Rule {
    pub(crate) fn new<S: Into<String>>(id: S, lhs: char, rhs: Vec<char>) -> Self {
        Self {
            id: id.into(),
            lhs,
            rhs,
        }
    }

    /// The identifier of this rule. It is only used for display and removal.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The variable on the left side.
    pub fn lhs(&self) -> char {
        self.lhs
    }

    /// The symbols on the right side. Never empty.
    pub fn rhs(&self) -> &[char] {
        &self.rhs
    }

    /// The right side as a string, e.g. `"aAB"`.
    pub fn body(&self) -> String {
        self.rhs.iter().collect()
    }

    /// Whether this is an `A -> ε` rule.
    pub fn is_epsilon(&self) -> bool {
        self.rhs == [EPSILON]
    }

    /// The numeric suffix of a generated ID like `r12`.
    pub fn number(&self) -> Option<usize> {
        numeric_suffix(&self.id)
    }
}

impl Display for Rule {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "{}: {} -> {}", self.id, self.lhs, self.body())
    }
}

fn numeric_suffix(id: &str) -> Option<usize> {
    let digits = id.strip_prefix(RULE_ID_PREFIX)?;

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    digits.parse().ok()
}

/// A context-free grammar over single-character symbols.
///
/// Every mutation checks the invariants of the grammar and leaves it
/// unchanged on failure:
/// - the start symbol is a variable
/// - no character is both a variable and a terminal
/// - every rule has a declared variable on the left and only declared symbols on the right
/// - rule IDs are unique
#[derive(Debug, Clone)]
pub struct Grammar {
    id: String,
    variables: BTreeSet<char>,
    terminals: BTreeSet<char>,
    rules: HashMap<String, Rule, RandomState>,
    start: char,
}

impl Grammar {
    /// Create an empty grammar whose only variable is `start`.
    pub fn new<S: Into<String>>(id: S, start: char) -> Self {
        Self {
            id: id.into(),
            variables: BTreeSet::from([start]),
            terminals: BTreeSet::new(),
            rules: HashMap::default(),
            start,
        }
    }

    /// Assemble a grammar field by field. See [`GrammarBuilder`].
    pub fn builder<S: Into<String>>(id: S) -> GrammarBuilder {
        GrammarBuilder::new(id)
    }

    /// The identifier of this grammar in its store.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The variables, sorted.
    pub fn variables(&self) -> &BTreeSet<char> {
        &self.variables
    }

    /// The terminals, sorted.
    pub fn terminals(&self) -> &BTreeSet<char> {
        &self.terminals
    }

    /// The start symbol. It is always a member of [`variables()`](Self::variables).
    pub fn start_symbol(&self) -> char {
        self.start
    }

    /// Classify `c`, or `None` if the grammar does not declare it.
    pub fn symbol(&self, c: char) -> Option<Symbol> {
        if self.variables.contains(&c) {
            Some(Symbol::Variable(c))
        } else if self.terminals.contains(&c) {
            Some(Symbol::Terminal(c))
        } else {
            None
        }
    }

    /// Whether `c` is a variable of this grammar.
    pub fn is_variable(&self, c: char) -> bool {
        self.variables.contains(&c)
    }

    /// Whether `c` is a terminal of this grammar.
    pub fn is_terminal(&self, c: char) -> bool {
        self.terminals.contains(&c)
    }

    /// Add a variable. Adding an existing variable does nothing.
    pub fn add_variable(&mut self, variable: char) -> Result<(), GrammarError> {
        if self.terminals.contains(&variable) {
            return Err(GrammarError::SymbolClash(variable));
        }

        self.variables.insert(variable);
        Ok(())
    }

    /// Add a terminal. Adding an existing terminal does nothing.
    pub fn add_terminal(&mut self, terminal: char) -> Result<(), GrammarError> {
        if self.variables.contains(&terminal) {
            return Err(GrammarError::SymbolClash(terminal));
        }

        self.terminals.insert(terminal);
        Ok(())
    }

    /// Replace the start symbol. It also becomes a variable.
    pub fn set_start_symbol(&mut self, start: char) -> Result<(), GrammarError> {
        self.add_variable(start)?;
        self.start = start;
        Ok(())
    }

    /// Add the rule `lhs -> rhs` under the identifier `id`.
    pub fn add_rule<S, R>(&mut self, id: S, lhs: char, rhs: R) -> Result<(), GrammarError>
    where
        S: Into<String>,
        R: AsRef<str>,
    {
        let id = id.into();

        if self.rules.contains_key(&id) {
            return Err(GrammarError::DuplicateRuleId(id));
        }

        if !self.variables.contains(&lhs) {
            return Err(GrammarError::UndefinedLeftSymbol(lhs));
        }

        let rhs: Vec<char> = rhs.as_ref().chars().collect();

        if rhs.is_empty() {
            return Err(GrammarError::EmptyRightSide(id));
        }

        if let Some(undefined) = rhs.iter().find(|c| self.symbol(**c).is_none()) {
            return Err(GrammarError::UndefinedRightSymbol(*undefined));
        }

        self.rules.insert(id.clone(), Rule::new(id, lhs, rhs));
        Ok(())
    }

    /// Remove the rule with identifier `id` and hand it back.
    pub fn remove_rule(&mut self, id: &str) -> Result<Rule, GrammarError> {
        self.rules.remove(id).ok_or_else(|| GrammarError::RuleNotFound(id.to_string()))
    }

    /// Look up a rule by its identifier.
    pub fn rule(&self, id: &str) -> Option<&Rule> {
        self.rules.get(id)
    }

    /// All rules in no particular order.
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.values()
    }

    /// All rules ordered by rule number. Rules whose ID has no numeric suffix come last.
    pub fn sorted_rules(&self) -> Vec<&Rule> {
        self.rules
            .values()
            .sorted_by(|a, b| {
                let a_key = a.number().unwrap_or(usize::MAX);
                let b_key = b.number().unwrap_or(usize::MAX);
                a_key.cmp(&b_key).then_with(|| a.id().cmp(b.id()))
            })
            .collect()
    }

    /// The rule at 1-based position `number` of [`sorted_rules()`](Self::sorted_rules).
    pub fn rule_by_number(&self, number: usize) -> Result<&Rule, GrammarError> {
        let count = self.rules.len();

        if number == 0 || number > count {
            return Err(GrammarError::InvalidRuleNumber {
                number,
                count,
            });
        }

        Ok(self.sorted_rules()[number - 1])
    }

    /// Number of rules.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// A rule ID that is not used yet: one past the largest generated ID.
    ///
    /// If the largest number cannot be incremented, the smallest unused `r<n>` is returned instead.
    pub fn next_rule_id(&self) -> String {
        let max = self.rules.values().filter_map(Rule::number).max().unwrap_or(0);

        if let Some(next) = max.checked_add(1) {
            return format!("{}{}", RULE_ID_PREFIX, next);
        }

        let mut n = 1usize;
        while self.rules.contains_key(&format!("{}{}", RULE_ID_PREFIX, n)) {
            n += 1;
        }
        format!("{}{}", RULE_ID_PREFIX, n)
    }
}

impl Display for Grammar {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        writeln!(f, "Grammar ID: {}", self.id)?;
        writeln!(f, "Start Symbol: {}", self.start)?;
        writeln!(f, "Variables: {}", self.variables.iter().join(", "))?;
        writeln!(f, "Terminals: {}", self.terminals.iter().join(", "))?;
        writeln!(f, "Rules:")?;

        for (i, rule) in self.sorted_rules().iter().enumerate() {
            writeln!(f, "{}. {}", i + 1, rule)?;
        }

        Ok(())
    }
}
