use std::collections::{BTreeMap, BTreeSet};

use crate::{
    error::GrammarError,
    grammar::{Grammar, VARIABLE_ALPHABET},
};

/// Prefix of generated grammar IDs (`G1`, `G2`, ...).
pub const GENERATED_ID_PREFIX: char = 'G';

/// Owns every grammar of a session, keyed by grammar ID.
///
/// Iteration is sorted by ID so listings are deterministic.
#[derive(Debug, Default, Clone)]
pub struct GrammarStore {
    grammars: BTreeMap<String, Grammar>,
}

impl GrammarStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `grammar` under its ID. A grammar with the same ID is replaced and returned.
    pub fn add(&mut self, grammar: Grammar) -> Option<Grammar> {
        tracing::info!("Registering grammar {}", grammar.id());
        self.grammars.insert(grammar.id().to_string(), grammar)
    }

    /// Look up a grammar.
    pub fn get(&self, id: &str) -> Option<&Grammar> {
        self.grammars.get(id)
    }

    /// Look up a grammar, failing with [`GrammarError::GrammarNotFound`].
    pub fn grammar(&self, id: &str) -> Result<&Grammar, GrammarError> {
        self.grammars.get(id).ok_or_else(|| GrammarError::GrammarNotFound(id.to_string()))
    }

    /// Look up a grammar for editing, failing with [`GrammarError::GrammarNotFound`].
    pub fn grammar_mut(&mut self, id: &str) -> Result<&mut Grammar, GrammarError> {
        self.grammars.get_mut(id).ok_or_else(|| GrammarError::GrammarNotFound(id.to_string()))
    }

    /// Remove a grammar and hand it back.
    pub fn remove(&mut self, id: &str) -> Result<Grammar, GrammarError> {
        self.grammars.remove(id).ok_or_else(|| GrammarError::GrammarNotFound(id.to_string()))
    }

    /// Remove all grammars.
    pub fn clear(&mut self) {
        self.grammars.clear();
    }

    /// Whether the store holds no grammar.
    pub fn is_empty(&self) -> bool {
        self.grammars.is_empty()
    }

    /// Number of grammars in the store.
    pub fn len(&self) -> usize {
        self.grammars.len()
    }

    /// The grammar IDs, sorted.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.grammars.keys().map(String::as_str)
    }

    /// The grammars, sorted by ID.
    pub fn iter(&self) -> impl Iterator<Item = &Grammar> {
        self.grammars.values()
    }

    /// The ID for the next derived grammar: `G<n+1>` where `n` is the largest number
    /// among IDs of the form `G<digits>`. Other IDs are ignored.
    ///
    /// If the largest number cannot be incremented, the smallest unused `G<n>` is returned instead.
    pub fn next_generated_id(&self) -> String {
        let max = self.grammars.keys().filter_map(|id| generated_number(id)).max().unwrap_or(0);

        if let Some(next) = max.checked_add(1) {
            return format!("{}{}", GENERATED_ID_PREFIX, next);
        }

        let mut n = 1u64;
        while self.grammars.contains_key(&format!("{}{}", GENERATED_ID_PREFIX, n)) {
            n += 1;
        }
        format!("{}{}", GENERATED_ID_PREFIX, n)
    }

    /// The first symbol of the variable alphabet that is not in `excluding`.
    pub fn next_free_variable(excluding: &BTreeSet<char>) -> Result<char, GrammarError> {
        VARIABLE_ALPHABET.into_iter().find(|c| !excluding.contains(c)).ok_or(GrammarError::AlphabetExhausted)
    }
}

fn generated_number(id: &str) -> Option<u64> {
    let digits = id.strip_prefix(GENERATED_ID_PREFIX)?;

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    digits.parse().ok()
}

/// Hands out fresh variables for a single transformation.
///
/// Every minted symbol is recorded as used, so the pool shrinks monotonically.
pub(crate) struct FreshVariables {
    used: BTreeSet<char>,
}

impl FreshVariables {
    pub(crate) fn new<I: IntoIterator<Item = char>>(used: I) -> Self {
        Self {
            used: used.into_iter().collect(),
        }
    }

    /// How many variables can still be minted.
    pub(crate) fn remaining(&self) -> usize {
        VARIABLE_ALPHABET.filter(|c| !self.used.contains(c)).count()
    }

    pub(crate) fn mint(&mut self) -> Result<char, GrammarError> {
        let c = GrammarStore::next_free_variable(&self.used)?;
        self.used.insert(c);
        tracing::debug!("Minted fresh variable {}", c);
        Ok(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_generated_id() {
        let mut store = GrammarStore::new();
        assert_eq!(store.next_generated_id(), "G1");

        store.add(Grammar::new("foo", 'S'));
        assert_eq!(store.next_generated_id(), "G1");

        store.add(Grammar::new("G1", 'S'));
        store.add(Grammar::new("G3", 'S'));
        assert_eq!(store.next_generated_id(), "G4");

        store.add(Grammar::new("G+7", 'S'));
        store.add(Grammar::new("G", 'S'));
        assert_eq!(store.next_generated_id(), "G4");
    }

    #[test]
    fn test_next_generated_id_after_largest_number() {
        let mut store = GrammarStore::new();
        store.add(Grammar::new(format!("G{}", u64::MAX), 'S'));
        assert_eq!(store.next_generated_id(), "G1");

        store.add(Grammar::new("G1", 'S'));
        store.add(Grammar::new("G3", 'S'));
        assert_eq!(store.next_generated_id(), "G2");
    }

    #[test]
    fn test_add_replaces() {
        let mut store = GrammarStore::new();
        assert!(store.add(Grammar::new("G1", 'S')).is_none());

        let old = store.add(Grammar::new("G1", 'T')).unwrap();
        assert_eq!(old.start_symbol(), 'S');
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("G1").unwrap().start_symbol(), 'T');
    }

    #[test]
    fn test_remove_and_clear() {
        let mut store = GrammarStore::new();
        store.add(Grammar::new("G1", 'S'));
        store.add(Grammar::new("G2", 'S'));

        assert!(store.remove("G1").is_ok());
        assert_eq!(store.remove("G1").unwrap_err(), GrammarError::GrammarNotFound("G1".to_string()));
        assert_eq!(store.ids().collect::<Vec<_>>(), ["G2"]);

        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_next_free_variable() {
        assert_eq!(GrammarStore::next_free_variable(&BTreeSet::new()), Ok('A'));
        assert_eq!(GrammarStore::next_free_variable(&BTreeSet::from(['A', 'B', 'D'])), Ok('C'));

        let all: BTreeSet<char> = VARIABLE_ALPHABET.collect();
        assert_eq!(GrammarStore::next_free_variable(&all), Err(GrammarError::AlphabetExhausted));
    }

    #[test]
    fn test_fresh_variables_are_monotone() {
        let mut fresh = FreshVariables::new(['A', 'C', 'S']);

        assert_eq!(fresh.remaining(), 23);
        assert_eq!(fresh.mint(), Ok('B'));
        assert_eq!(fresh.mint(), Ok('D'));
        assert_eq!(fresh.remaining(), 21);
    }
}
