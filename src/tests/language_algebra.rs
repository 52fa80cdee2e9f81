use crate::{
    algorithms::{algebra, emptiness, membership, normal_form},
    error::GrammarError,
    grammar::{Grammar, GrammarStore, VARIABLE_ALPHABET},
};

fn single(id: &str, terminal: char) -> Grammar {
    Grammar::builder(id)
        .start_symbol('S')
        .terminal(terminal)
        .rule("r1", 'S', terminal.to_string())
        .build()
        .unwrap()
}

fn store_of<I: IntoIterator<Item = Grammar>>(grammars: I) -> GrammarStore {
    let mut store = GrammarStore::new();
    for grammar in grammars {
        store.add(grammar);
    }
    store
}

/// ID of a CNF grammar for the language of `id`.
fn cnf(store: &mut GrammarStore, id: &str) -> String {
    normal_form::chomskify(store, id).unwrap().unwrap_or_else(|| id.to_string())
}

fn accepts(store: &GrammarStore, id: &str, word: &str) -> bool {
    membership::cyk(store, id, word).unwrap().accepted()
}

#[test]
fn test_union_language() {
    let mut store = store_of([single("G1", 'a'), single("G2", 'b')]);
    let union = algebra::union(&mut store, "G1", "G2").unwrap();
    let id = cnf(&mut store, &union);

    assert!(accepts(&store, &id, "a"));
    assert!(accepts(&store, &id, "b"));
    assert!(!accepts(&store, &id, "c"));
    assert!(!accepts(&store, &id, "ab"));
    assert!(!accepts(&store, &id, ""));
}

#[test]
fn test_concat_language() {
    let mut store = store_of([single("G1", 'a'), single("G2", 'b')]);
    let concat = algebra::concat(&mut store, "G1", "G2").unwrap();
    let id = cnf(&mut store, &concat);

    assert!(accepts(&store, &id, "ab"));
    for word in ["a", "b", "ba", "abab", ""] {
        assert!(!accepts(&store, &id, word), "{} must be rejected", word);
    }
}

#[test]
fn test_kleene_star_language() {
    let mut store = store_of([single("G1", 'a')]);
    let star = algebra::kleene_star(&mut store, "G1").unwrap();
    let id = cnf(&mut store, &star);

    for word in ["", "a", "aa", "aaa"] {
        assert!(accepts(&store, &id, word), "{} must be accepted", word);
    }
    assert!(!accepts(&store, &id, "ab"));
}

#[test]
fn test_nested_operations() {
    let mut store = store_of([single("G1", 'a'), single("G2", 'b')]);
    let union = algebra::union(&mut store, "G1", "G2").unwrap();
    let star = algebra::kleene_star(&mut store, &union).unwrap();
    let id = cnf(&mut store, &star);

    for word in ["", "ab", "ba", "bbab"] {
        assert!(accepts(&store, &id, word), "{} must be accepted", word);
    }
    assert!(!accepts(&store, &id, "abc"));
}

#[test]
fn test_cnf_conversion_keeps_language() {
    // a^n b^n for n >= 0
    let grammar = Grammar::builder("G1")
        .start_symbol('S')
        .terminals(['a', 'b', 'ε'])
        .rule("r1", 'S', "aSb")
        .rule("r2", 'S', "ε")
        .build()
        .unwrap();
    let mut store = store_of([grammar]);

    let id = normal_form::chomskify(&mut store, "G1").unwrap().unwrap();
    assert!(normal_form::chomsky(&store, &id).unwrap());
    assert_eq!(normal_form::chomskify(&mut store, &id).unwrap(), None);
    assert_eq!(store.len(), 2);

    for word in ["", "ab", "aabb", "aaabbb"] {
        assert!(accepts(&store, &id, word), "{} must be accepted", word);
    }
    for word in ["a", "ba", "aab", "abab"] {
        assert!(!accepts(&store, &id, word), "{} must be rejected", word);
    }
}

#[test]
fn test_cyk_requires_cnf() {
    let grammar = Grammar::builder("G1")
        .start_symbol('S')
        .variable('A')
        .terminal('a')
        .rule("r1", 'S', "A")
        .rule("r2", 'A', "a")
        .build()
        .unwrap();
    let store = store_of([grammar]);

    assert_eq!(membership::cyk(&store, "G1", "a"), Err(GrammarError::NotInCNF("G1".to_string())));
}

#[test]
fn test_emptiness() {
    let looping = Grammar::builder("G1").start_symbol('S').rule("r1", 'S', "S").build().unwrap();
    let store = store_of([looping, single("G2", 'a')]);

    assert!(emptiness::empty(&store, "G1").unwrap());
    assert!(!emptiness::empty(&store, "G2").unwrap());
    assert_eq!(emptiness::empty(&store, "G3"), Err(GrammarError::GrammarNotFound("G3".to_string())));
}

#[test]
fn test_generated_ids() {
    let store = store_of([single("G1", 'a'), single("G3", 'a'), single("foo", 'a')]);
    assert_eq!(store.next_generated_id(), "G4");
}

#[test]
fn test_exhausted_alphabet_registers_nothing() {
    let crowded = Grammar::builder("G1")
        .start_symbol('S')
        .variables(VARIABLE_ALPHABET)
        .terminal('a')
        .rule("r1", 'S', "a")
        .build()
        .unwrap();
    let mut store = store_of([crowded, single("G2", 'b')]);

    assert_eq!(algebra::kleene_star(&mut store, "G1"), Err(GrammarError::AlphabetExhausted));
    assert_eq!(algebra::union(&mut store, "G2", "G1"), Err(GrammarError::AlphabetExhausted));
    assert_eq!(store.ids().collect::<Vec<_>>(), ["G1", "G2"]);
}
