//! Union, concatenation and Kleene star of context-free languages.
//!
//! The result is always a new grammar with a fresh start symbol that is glued
//! to the start symbols of the operands. The variables of the second operand
//! that are also used by the first one are renamed to fresh variables
//! first, so the rules of the two operands cannot interfere.

use std::collections::BTreeSet;

use ahash::AHashMap;

use crate::{
    algorithms::Draft,
    error::GrammarError,
    grammar::{FreshVariables, Grammar, GrammarStore, EPSILON},
};

/// Renames the variables of one operand while its rules are copied.
struct Renaming(AHashMap<char, char>);

impl Renaming {
    fn apply(&self, c: char) -> char {
        self.0.get(&c).copied().unwrap_or(c)
    }

    fn copy_into(&self, grammar: &Grammar, draft: &mut Draft) {
        draft.variables.extend(grammar.variables().iter().map(|v| self.apply(*v)));
        draft.terminals.extend(grammar.terminals().iter().copied());

        for rule in grammar.sorted_rules() {
            let body = rule.rhs().iter().map(|c| self.apply(*c)).collect();
            draft.rules.push((self.apply(rule.lhs()), body));
        }
    }
}

/// Plan the renamings for two operands and allocate the new start symbol.
fn rename_apart(first: &Grammar, second: &Grammar) -> Result<(Renaming, Renaming, char), GrammarError> {
    let symbols = |g: &Grammar| -> BTreeSet<char> { g.variables().union(g.terminals()).copied().collect() };
    let mut fresh = FreshVariables::new(symbols(first).union(&symbols(second)).copied());

    // a variable of the first operand that is a terminal of the second one has to move
    let mut first_map = AHashMap::new();
    for variable in first.variables() {
        if second.is_terminal(*variable) {
            first_map.insert(*variable, fresh.mint()?);
        }
    }

    let mut second_map = AHashMap::new();
    for variable in second.variables() {
        if first.variables().contains(variable) || first.is_terminal(*variable) {
            second_map.insert(*variable, fresh.mint()?);
        }
    }

    let start = fresh.mint()?;
    tracing::debug!(
        "Renamed {} variable(s) of {} and {} of {}, new start symbol {}",
        first_map.len(),
        first.id(),
        second_map.len(),
        second.id(),
        start
    );

    Ok((Renaming(first_map), Renaming(second_map), start))
}

fn binary_operation<F>(first: &Grammar, second: &Grammar, glue: F) -> Result<Draft, GrammarError>
where
    F: FnOnce(char, char, char) -> Vec<(char, Vec<char>)>,
{
    let (first_renaming, second_renaming, start) = rename_apart(first, second)?;
    let mut draft = Draft {
        start,
        variables: BTreeSet::from([start]),
        terminals: BTreeSet::new(),
        rules: Vec::new(),
    };

    first_renaming.copy_into(first, &mut draft);
    second_renaming.copy_into(second, &mut draft);

    let first_start = first_renaming.apply(first.start_symbol());
    let second_start = second_renaming.apply(second.start_symbol());
    draft.rules.extend(glue(start, first_start, second_start));

    Ok(draft)
}

/// A grammar for `L(first) ∪ L(second)` with the rules `S' -> S1` and `S' -> S2`.
pub fn union_of<S: Into<String>>(first: &Grammar, second: &Grammar, id: S) -> Result<Grammar, GrammarError> {
    let draft = binary_operation(first, second, |start, s1, s2| vec![(start, vec![s1]), (start, vec![s2])])?;
    draft.build(id)
}

/// A grammar for `L(first) · L(second)` with the rule `S' -> S1 S2`.
pub fn concat_of<S: Into<String>>(first: &Grammar, second: &Grammar, id: S) -> Result<Grammar, GrammarError> {
    let draft = binary_operation(first, second, |start, s1, s2| vec![(start, vec![s1, s2])])?;
    draft.build(id)
}

/// A grammar for `L(grammar)*` with the rules `S' -> ε` and `S' -> S S'`.
pub fn kleene_star_of<S: Into<String>>(grammar: &Grammar, id: S) -> Result<Grammar, GrammarError> {
    let mut fresh = FreshVariables::new(grammar.variables().union(grammar.terminals()).copied());
    let start = fresh.mint()?;

    let mut draft = Draft {
        start,
        variables: BTreeSet::from([start]),
        terminals: BTreeSet::from([EPSILON]),
        rules: Vec::new(),
    };

    Renaming(AHashMap::new()).copy_into(grammar, &mut draft);
    draft.rules.push((start, vec![EPSILON]));
    draft.rules.push((start, vec![grammar.start_symbol(), start]));

    draft.build(id)
}

/// Register the union of the grammars `first` and `second` and return its ID.
pub fn union(store: &mut GrammarStore, first: &str, second: &str) -> Result<String, GrammarError> {
    let id = store.next_generated_id();
    let grammar = union_of(store.grammar(first)?, store.grammar(second)?, id.clone())?;
    store.add(grammar);
    Ok(id)
}

/// Register the concatenation of the grammars `first` and `second` and return its ID.
pub fn concat(store: &mut GrammarStore, first: &str, second: &str) -> Result<String, GrammarError> {
    let id = store.next_generated_id();
    let grammar = concat_of(store.grammar(first)?, store.grammar(second)?, id.clone())?;
    store.add(grammar);
    Ok(id)
}

/// Register the Kleene star of the grammar `id` and return the new ID.
pub fn kleene_star(store: &mut GrammarStore, id: &str) -> Result<String, GrammarError> {
    let new_id = store.next_generated_id();
    let grammar = kleene_star_of(store.grammar(id)?, new_id.clone())?;
    store.add(grammar);
    Ok(new_id)
}
