//! Emptiness of the generated language and related symbol analyses.

use std::collections::BTreeSet;

use petgraph::{graphmap::DiGraphMap, visit::Dfs};

use crate::{
    error::GrammarError,
    grammar::{Grammar, GrammarStore},
};

/// The variables that derive at least one string of terminals.
///
/// A variable is productive if one of its rules has only terminals and productive
/// variables on the right side. The set grows until a full pass over the rules adds nothing.
pub fn productive_variables(grammar: &Grammar) -> BTreeSet<char> {
    let mut productive = BTreeSet::new();
    let mut passes = 0;

    loop {
        passes += 1;
        let mut changed = false;

        for rule in grammar.rules() {
            if productive.contains(&rule.lhs()) {
                continue;
            }

            if rule.rhs().iter().all(|c| grammar.is_terminal(*c) || productive.contains(c)) {
                productive.insert(rule.lhs());
                changed = true;
            }
        }

        if !changed {
            break;
        }
    }

    tracing::debug!("{} productive variable(s) in {} after {} pass(es)", productive.len(), grammar.id(), passes);
    productive
}

/// Whether the language of `grammar` is empty, i.e. its start symbol is not productive.
pub fn is_empty(grammar: &Grammar) -> bool {
    !productive_variables(grammar).contains(&grammar.start_symbol())
}

/// The variables that occur in some sentential form derived from the start symbol.
pub fn reachable_variables(grammar: &Grammar) -> BTreeSet<char> {
    let mut graph = DiGraphMap::<char, ()>::new();
    graph.add_node(grammar.start_symbol());

    for rule in grammar.rules() {
        for c in rule.rhs() {
            if grammar.is_variable(*c) {
                graph.add_edge(rule.lhs(), *c, ());
            }
        }
    }

    let mut reachable = BTreeSet::new();
    let mut dfs = Dfs::new(&graph, grammar.start_symbol());

    while let Some(variable) = dfs.next(&graph) {
        reachable.insert(variable);
    }

    reachable
}

/// The variables that can never take part in deriving a word: unproductive or unreachable ones.
pub fn useless_variables(grammar: &Grammar) -> BTreeSet<char> {
    let productive = productive_variables(grammar);
    let reachable = reachable_variables(grammar);

    grammar
        .variables()
        .iter()
        .filter(|v| !productive.contains(*v) || !reachable.contains(*v))
        .copied()
        .collect()
}

/// Check whether the language of the grammar `id` in `store` is empty.
pub fn empty(store: &GrammarStore, id: &str) -> Result<bool, GrammarError> {
    Ok(is_empty(store.grammar(id)?))
}
