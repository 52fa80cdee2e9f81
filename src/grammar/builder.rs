use crate::{
    error::GrammarError,
    grammar::Grammar,
};

/// The GrammarBuilder assembles a [`Grammar`] from its parts, the way a grammar file lists them.
///
/// Use it like so:
/// ```
/// use cfg_workbench::grammar::Grammar;
///
/// let grammar = Grammar::builder("G1")
///     .start_symbol('S')
///     .variables(['S', 'A'])
///     .terminals(['a', 'b'])
///     .rule("r1", 'S', "aA")
///     .rule("r2", 'A', "b")
///     .build()
///     .unwrap();
/// assert_eq!(grammar.rule_count(), 2);
/// ```
pub struct GrammarBuilder {
    id: String,
    start: Option<char>,
    variables: Vec<char>,
    terminals: Vec<char>,
    rules: Vec<(String, char, String)>,
}

impl GrammarBuilder {
    pub(crate) fn new<S: Into<String>>(id: S) -> Self {
        Self {
            id: id.into(),
            start: None,
            variables: Vec::new(),
            terminals: Vec::new(),
            rules: Vec::new(),
        }
    }
}

impl GrammarBuilder {
    /// Set the start symbol of the grammar. The last call wins.
    pub fn start_symbol(mut self, start: char) -> Self {
        self.start = Some(start);
        self
    }

    /// Declare a single variable.
    pub fn variable(mut self, variable: char) -> Self {
        self.variables.push(variable);
        self
    }

    /// Declare several variables.
    pub fn variables<I: IntoIterator<Item = char>>(mut self, variables: I) -> Self {
        self.variables.extend(variables);
        self
    }

    /// Declare a single terminal.
    pub fn terminal(mut self, terminal: char) -> Self {
        self.terminals.push(terminal);
        self
    }

    /// Declare several terminals.
    pub fn terminals<I: IntoIterator<Item = char>>(mut self, terminals: I) -> Self {
        self.terminals.extend(terminals);
        self
    }

    /// Add the rule `lhs -> rhs`. Rules are checked in [`build()`](Self::build) after all symbols are declared.
    pub fn rule<S: Into<String>, R: Into<String>>(mut self, id: S, lhs: char, rhs: R) -> Self {
        self.rules.push((id.into(), lhs, rhs.into()));
        self
    }

    /// Create the [`Grammar`], checking every invariant.
    pub fn build(self) -> Result<Grammar, GrammarError> {
        let start = match self.start {
            Some(start) => start,
            None => return Err(GrammarError::MissingStartSymbol(self.id)),
        };

        let mut grammar = Grammar::new(self.id, start);

        for variable in self.variables {
            grammar.add_variable(variable)?;
        }

        for terminal in self.terminals {
            grammar.add_terminal(terminal)?;
        }

        for (id, lhs, rhs) in self.rules {
            grammar.add_rule(id, lhs, rhs)?;
        }

        Ok(grammar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_start_symbol() {
        let result = Grammar::builder("G1").variable('S').build();
        assert_eq!(result.unwrap_err(), GrammarError::MissingStartSymbol("G1".to_string()));
    }

    #[test]
    fn test_rules_after_symbols() {
        // rules may be listed before the symbols they use
        let grammar = Grammar::builder("G1")
            .rule("r1", 'S', "aB")
            .start_symbol('S')
            .variable('B')
            .terminal('a')
            .rule("r2", 'B', "a")
            .build()
            .unwrap();

        assert_eq!(grammar.rule_count(), 2);
        assert!(grammar.is_variable('B'));
    }

    #[test]
    fn test_clash_between_sections() {
        let result = Grammar::builder("G1").start_symbol('S').terminal('S').build();
        assert_eq!(result.unwrap_err(), GrammarError::SymbolClash('S'));
    }
}
