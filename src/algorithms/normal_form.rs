//! Chomsky Normal Form: the membership check and the conversion into it.
//!
//! A grammar is in CNF if every rule is `A -> a` or `A -> BC`. The empty string
//! is allowed only as `S -> ε` for the start symbol `S`, and only as long as `S`
//! never occurs on a right side.

use std::collections::BTreeSet;

use ahash::{AHashMap, AHashSet};
use itertools::Itertools;

use crate::{
    algorithms::Draft,
    error::GrammarError,
    grammar::{FreshVariables, Grammar, GrammarStore, EPSILON},
};

/// Result of [`to_cnf`].
#[derive(Debug)]
pub enum Conversion {
    /// The input already was in CNF. No grammar was created.
    AlreadyCnf,
    /// A new grammar in CNF that generates the same language.
    Converted(Grammar),
}

/// Check whether `grammar` is in Chomsky Normal Form.
pub fn is_cnf(grammar: &Grammar) -> bool {
    let start = grammar.start_symbol();
    let start_on_right = grammar.rules().any(|rule| rule.rhs().contains(&start));

    grammar.rules().all(|rule| match rule.rhs() {
        [EPSILON] => rule.lhs() == start && !start_on_right,
        [a] => grammar.is_terminal(*a),
        [b, c] => grammar.is_variable(*b) && grammar.is_variable(*c),
        _ => false,
    })
}

/// Convert `grammar` into an equivalent grammar in CNF with the ID `id`.
///
/// New variables are taken from the variable alphabet. If it runs out,
/// [`GrammarError::AlphabetExhausted`] is returned.
pub fn to_cnf<S: Into<String>>(grammar: &Grammar, id: S) -> Result<Conversion, GrammarError> {
    if is_cnf(grammar) {
        return Ok(Conversion::AlreadyCnf);
    }

    let draft = ChomskyConverter::new(grammar).convert()?;
    Ok(Conversion::Converted(draft.build(id)?))
}

/// Check whether the grammar `id` in `store` is in CNF.
pub fn chomsky(store: &GrammarStore, id: &str) -> Result<bool, GrammarError> {
    Ok(is_cnf(store.grammar(id)?))
}

/// Convert the grammar `id` into CNF and register the result under a generated ID.
///
/// Returns the new ID, or `None` if the grammar already is in CNF.
pub fn chomskify(store: &mut GrammarStore, id: &str) -> Result<Option<String>, GrammarError> {
    let grammar = store.grammar(id)?;
    let new_id = store.next_generated_id();

    match to_cnf(grammar, new_id.clone())? {
        Conversion::AlreadyCnf => {
            tracing::info!("Grammar {} is already in CNF", id);
            Ok(None)
        },
        Conversion::Converted(cnf) => {
            store.add(cnf);
            Ok(Some(new_id))
        },
    }
}

type Production = (char, Vec<char>);

struct ChomskyConverter<'a> {
    source: &'a Grammar,
    fresh: FreshVariables,
    variables: BTreeSet<char>,
    productions: Vec<Production>,
    start: char,
}

impl<'a> ChomskyConverter<'a> {
    fn new(source: &'a Grammar) -> Self {
        let fresh = FreshVariables::new(source.variables().iter().chain(source.terminals()).copied());

        // ε inside a longer body derives nothing, so drop it right away
        let productions: Vec<Production> = source
            .sorted_rules()
            .into_iter()
            .map(|rule| (rule.lhs(), rule.rhs().iter().copied().filter(|c| *c != EPSILON).collect::<Vec<char>>()))
            .collect();

        Self {
            source,
            fresh,
            variables: source.variables().clone(),
            productions,
            start: source.start_symbol(),
        }
    }

    fn convert(mut self) -> Result<Draft, GrammarError> {
        let nullable = self.nullable_variables();
        self.isolate_start(&nullable)?;
        self.eliminate_epsilon(&nullable)?;
        self.eliminate_units();
        self.binarize()?;

        let rules = self.productions.into_iter().unique().collect();

        Ok(Draft {
            start: self.start,
            variables: self.variables,
            terminals: self.source.terminals().clone(),
            rules,
        })
    }

    fn mint(&mut self) -> Result<char, GrammarError> {
        let variable = self.fresh.mint()?;
        self.variables.insert(variable);
        Ok(variable)
    }

    fn is_unit(&self, body: &[char]) -> bool {
        matches!(body, [c] if self.variables.contains(c))
    }

    fn nullable_variables(&self) -> AHashSet<char> {
        let mut nullable = AHashSet::new();

        loop {
            let before = nullable.len();

            for (lhs, body) in &self.productions {
                if body.iter().all(|c| nullable.contains(c)) {
                    nullable.insert(*lhs);
                }
            }

            if nullable.len() == before {
                break;
            }
        }

        nullable
    }

    /// A nullable start symbol that is used on a right side gets replaced by `S0 -> S`
    /// so that `S0 -> ε` can stay.
    fn isolate_start(&mut self, nullable: &AHashSet<char>) -> Result<(), GrammarError> {
        let start = self.start;

        if !nullable.contains(&start) || !self.productions.iter().any(|(_, body)| body.contains(&start)) {
            return Ok(());
        }

        let new_start = self.mint()?;
        tracing::debug!("New start symbol {} -> {}", new_start, start);
        self.productions.insert(0, (new_start, vec![start]));
        self.start = new_start;
        Ok(())
    }

    /// Expand every nullable occurrence into a variant with and one without it.
    ///
    /// Each variant longer than two symbols gets its own chain variables in [`binarize()`](Self::binarize),
    /// so the expansion stops with [`GrammarError::AlphabetExhausted`] as soon as that demand
    /// exceeds the free part of the alphabet.
    fn eliminate_epsilon(&mut self, nullable: &AHashSet<char>) -> Result<(), GrammarError> {
        let budget = self.fresh.remaining();
        let mut demand = 0usize;
        let mut productions = Vec::with_capacity(self.productions.len());

        for (lhs, body) in &self.productions {
            let positions: Vec<usize> = body.iter().positions(|c| nullable.contains(c)).collect();

            // subsets come in order of size, so the longest variants are checked first
            for dropped in positions.into_iter().powerset() {
                let variant: Vec<char> = body
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| !dropped.contains(i))
                    .map(|(_, c)| *c)
                    .collect();

                demand += variant.len().saturating_sub(2);
                if demand > budget {
                    tracing::debug!("Binarizing needs more than {} fresh variable(s)", budget);
                    return Err(GrammarError::AlphabetExhausted);
                }

                if !variant.is_empty() {
                    productions.push((*lhs, variant));
                }
            }
        }

        if nullable.contains(&self.start) || nullable.contains(&self.source.start_symbol()) {
            productions.push((self.start, vec![EPSILON]));
        }

        tracing::debug!("{} production(s) after removing ε-rules", productions.len());
        self.productions = productions;
        Ok(())
    }

    fn eliminate_units(&mut self) {
        let mut unit_edges: AHashMap<char, Vec<char>> = AHashMap::new();

        for (lhs, body) in &self.productions {
            if self.is_unit(body) {
                unit_edges.entry(*lhs).or_default().push(body[0]);
            }
        }

        if unit_edges.is_empty() {
            return;
        }

        let heads: Vec<char> = self.productions.iter().map(|(lhs, _)| *lhs).unique().collect();
        let mut productions = Vec::new();

        for head in heads {
            let mut closure = vec![head];
            let mut stack = vec![head];

            while let Some(current) = stack.pop() {
                for next in unit_edges.get(&current).into_iter().flatten() {
                    if !closure.contains(next) {
                        closure.push(*next);
                        stack.push(*next);
                    }
                }
            }

            for member in closure {
                for (lhs, body) in &self.productions {
                    if *lhs == member && !self.is_unit(body) {
                        productions.push((head, body.clone()));
                    }
                }
            }
        }

        tracing::debug!("{} production(s) after removing unit rules", productions.len());
        self.productions = productions;
    }

    fn binarize(&mut self) -> Result<(), GrammarError> {
        let mut substitutes = AHashMap::<char, char>::new();
        let mut productions = Vec::with_capacity(self.productions.len());

        for (lhs, body) in std::mem::take(&mut self.productions) {
            if body.len() == 1 {
                productions.push((lhs, body));
                continue;
            }

            let mut symbols = Vec::with_capacity(body.len());

            for c in body {
                if !self.source.is_terminal(c) {
                    symbols.push(c);
                    continue;
                }

                let variable = match substitutes.get(&c) {
                    Some(variable) => *variable,
                    None => {
                        let variable = self.mint()?;
                        substitutes.insert(c, variable);
                        productions.push((variable, vec![c]));
                        variable
                    },
                };
                symbols.push(variable);
            }

            let mut head = lhs;

            for symbol in &symbols[..symbols.len() - 2] {
                let next = self.mint()?;
                productions.push((head, vec![*symbol, next]));
                head = next;
            }

            productions.push((head, symbols[symbols.len() - 2..].to_vec()));
        }

        self.productions = productions;
        Ok(())
    }
}
