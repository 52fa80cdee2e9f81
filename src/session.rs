//! A working session: the grammar store plus the file it was loaded from.
//!
//! Every command of the shell maps to one method here. The methods take the
//! already tokenized arguments and return a value or an [`Error`]; they never
//! print anything.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use crate::{
    algorithms::{algebra, emptiness, membership, membership::CykOutcome, normal_form},
    backends::{json::JsonGenerator, text::TextGenerator},
    error::Error,
    grammar::{Grammar, GrammarStore, Rule},
    parser,
};

/// What [`Session::empty`] found out about a grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptinessReport {
    /// Whether the language is empty
    pub empty: bool,
    /// Variables that are unproductive or unreachable
    pub useless: Vec<char>,
}

/// The grammars of one interactive session.
#[derive(Debug, Default)]
pub struct Session {
    store: GrammarStore,
    path: Option<PathBuf>,
}

impl Session {
    /// Create a session without any grammar or open file.
    pub fn new() -> Self {
        Self::default()
    }

    /// The grammars of this session.
    pub fn store(&self) -> &GrammarStore {
        &self.store
    }

    /// The grammars of this session, for editing.
    pub fn store_mut(&mut self) -> &mut GrammarStore {
        &mut self.store
    }

    /// The file that [`save()`](Self::save) writes to.
    pub fn current_file(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Load every grammar of `path` into the store and make it the current file.
    ///
    /// A file that does not exist is created empty. An empty file loads no grammar.
    /// Returns the number of loaded grammars.
    pub fn open<P: AsRef<Path>>(&mut self, path: P) -> Result<usize, Error> {
        let path = path.as_ref();

        if !path.exists() {
            OpenOptions::new().write(true).create_new(true).open(path)?;
            tracing::info!("Created empty grammar file {}", path.display());
        }

        // an empty file holds no grammar in either format
        let grammars = if path.metadata()?.len() == 0 {
            Vec::new()
        } else {
            parser::parse_file(path)?
        };
        let count = grammars.len();

        for grammar in grammars {
            self.store.add(grammar);
        }

        tracing::info!("Loaded {} grammar(s) from {}", count, path.display());
        self.path = Some(path.to_path_buf());
        Ok(count)
    }

    /// Drop all grammars and forget the current file.
    pub fn close(&mut self) -> Result<PathBuf, Error> {
        let path = self.path.take().ok_or(Error::NoOpenFile)?;
        self.store.clear();
        Ok(path)
    }

    /// Write all grammars to the current file.
    pub fn save(&self) -> Result<&Path, Error> {
        let path = self.path.as_deref().ok_or(Error::NoOpenFile)?;
        write_grammars(path, self.store.iter())?;
        Ok(path)
    }

    /// Write all grammars to `path` and make it the current file.
    pub fn save_as<P: AsRef<Path>>(&mut self, path: P) -> Result<(), Error> {
        let path = path.as_ref();
        write_grammars(path, self.store.iter())?;
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    /// Write the single grammar `id` to `path`.
    pub fn save_grammar<P: AsRef<Path>>(&self, id: &str, path: P) -> Result<(), Error> {
        let grammar = self.store.grammar(id)?;
        write_grammars(path.as_ref(), [grammar])?;
        Ok(())
    }

    /// The IDs of all grammars, sorted.
    pub fn list(&self) -> Vec<&str> {
        self.store.ids().collect()
    }

    /// The grammar `id`, for display.
    pub fn print(&self, id: &str) -> Result<&Grammar, Error> {
        Ok(self.store.grammar(id)?)
    }

    /// Add the rule `lhs -> rhs` to the grammar `id` under a fresh rule ID, which is returned.
    pub fn add_rule(&mut self, id: &str, lhs: char, rhs: &str) -> Result<String, Error> {
        let grammar = self.store.grammar_mut(id)?;
        let rule_id = grammar.next_rule_id();
        grammar.add_rule(rule_id.clone(), lhs, rhs)?;
        Ok(rule_id)
    }

    /// Remove the rule with the 1-based rule number `number` from the grammar `id`.
    pub fn remove_rule(&mut self, id: &str, number: usize) -> Result<Rule, Error> {
        let grammar = self.store.grammar_mut(id)?;
        let rule_id = grammar.rule_by_number(number)?.id().to_string();
        Ok(grammar.remove_rule(&rule_id)?)
    }

    /// Whether the grammar `id` is in Chomsky Normal Form.
    pub fn chomsky(&self, id: &str) -> Result<bool, Error> {
        Ok(normal_form::chomsky(&self.store, id)?)
    }

    /// Convert the grammar `id` to CNF. Returns the new ID or `None` if it already is in CNF.
    pub fn chomskify(&mut self, id: &str) -> Result<Option<String>, Error> {
        Ok(normal_form::chomskify(&mut self.store, id)?)
    }

    /// Run the CYK algorithm for `word` on the grammar `id`.
    pub fn cyk(&self, id: &str, word: &str) -> Result<CykOutcome, Error> {
        Ok(membership::cyk(&self.store, id, word)?)
    }

    /// Create the union of two grammars and return its ID.
    pub fn union(&mut self, first: &str, second: &str) -> Result<String, Error> {
        Ok(algebra::union(&mut self.store, first, second)?)
    }

    /// Create the concatenation of two grammars and return its ID.
    pub fn concat(&mut self, first: &str, second: &str) -> Result<String, Error> {
        Ok(algebra::concat(&mut self.store, first, second)?)
    }

    /// Create the Kleene star of a grammar and return its ID.
    pub fn iter(&mut self, id: &str) -> Result<String, Error> {
        Ok(algebra::kleene_star(&mut self.store, id)?)
    }

    /// Check whether the language of the grammar `id` is empty.
    pub fn empty(&self, id: &str) -> Result<EmptinessReport, Error> {
        let grammar = self.store.grammar(id)?;

        Ok(EmptinessReport {
            empty: emptiness::is_empty(grammar),
            useless: emptiness::useless_variables(grammar).into_iter().collect(),
        })
    }
}

fn write_grammars<'a, I>(path: &Path, grammars: I) -> Result<(), Error>
where
    I: IntoIterator<Item = &'a Grammar>,
{
    if parser::is_json(path) {
        JsonGenerator::new().generate(path, grammars)?;
    } else {
        TextGenerator::new().generate(path, grammars)?;
    }

    tracing::info!("Saved grammars to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GrammarError;
    use std::fs;

    fn temp_copy(name: &str, fixture: &str) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        fs::copy(fixture, &path).unwrap();
        path
    }

    #[test]
    fn test_open_and_list() {
        let path = temp_copy("cfg-workbench-session-open.txt", "test-data/grammars/sample.txt");
        let mut session = Session::new();

        assert_eq!(session.open(&path).unwrap(), 2);
        assert_eq!(session.list(), ["G1", "G2"]);
        assert_eq!(session.current_file(), Some(path.as_path()));
    }

    #[test]
    fn test_open_missing_file_creates_it() {
        let path = std::env::temp_dir().join("cfg-workbench-session-missing.txt");
        let _ = fs::remove_file(&path);

        let mut session = Session::new();
        assert_eq!(session.open(&path).unwrap(), 0);
        assert!(path.exists());
    }

    #[test]
    fn test_open_missing_json_file() {
        let path = std::env::temp_dir().join("cfg-workbench-session-missing.json");
        let _ = fs::remove_file(&path);

        let mut session = Session::new();
        assert_eq!(session.open(&path).unwrap(), 0);
        assert!(path.exists());
        assert_eq!(session.current_file(), Some(path.as_path()));

        // opening it again still works, and saving makes it a real JSON file
        assert_eq!(Session::new().open(&path).unwrap(), 0);
        session.save().unwrap();
        assert_eq!(Session::new().open(&path).unwrap(), 0);
    }

    #[test]
    fn test_close() {
        let mut session = Session::new();
        assert!(matches!(session.close(), Err(Error::NoOpenFile)));
        assert!(matches!(session.save(), Err(Error::NoOpenFile)));

        let path = temp_copy("cfg-workbench-session-close.txt", "test-data/grammars/sample.txt");
        session.open(&path).unwrap();
        assert_eq!(session.close().unwrap(), path);
        assert!(session.list().is_empty());
        assert!(session.current_file().is_none());
    }

    #[test]
    fn test_rule_editing() {
        let path = temp_copy("cfg-workbench-session-rules.txt", "test-data/grammars/sample.txt");
        let mut session = Session::new();
        session.open(&path).unwrap();

        assert_eq!(session.add_rule("G1", 'A', "ab").unwrap(), "r4");
        assert!(matches!(
            session.add_rule("G1", 'A', "x"),
            Err(Error::Grammar(GrammarError::UndefinedRightSymbol('x')))
        ));

        let removed = session.remove_rule("G1", 2).unwrap();
        assert_eq!(removed.id(), "r2");
        assert!(matches!(
            session.remove_rule("G1", 4),
            Err(Error::Grammar(GrammarError::InvalidRuleNumber { number: 4, count: 3 }))
        ));

        // numbering never hands out an ID twice
        assert_eq!(session.add_rule("G1", 'A', "b").unwrap(), "r5");
    }

    #[test]
    fn test_save_as_json_and_reopen() {
        let path = temp_copy("cfg-workbench-session-save.txt", "test-data/grammars/sample.txt");
        let json = std::env::temp_dir().join("cfg-workbench-session-save.json");

        let mut session = Session::new();
        session.open(&path).unwrap();
        let star = session.iter("G2").unwrap();
        session.save_as(&json).unwrap();
        assert_eq!(session.current_file(), Some(json.as_path()));

        let mut reopened = Session::new();
        assert_eq!(reopened.open(&json).unwrap(), 3);
        assert_eq!(reopened.print(&star).unwrap().to_string(), session.print(&star).unwrap().to_string());
    }

    #[test]
    fn test_operations() {
        let path = temp_copy("cfg-workbench-session-ops.txt", "test-data/grammars/sample.txt");
        let mut session = Session::new();
        session.open(&path).unwrap();

        assert!(!session.chomsky("G1").unwrap());
        let cnf = session.chomskify("G1").unwrap().unwrap();
        assert_eq!(cnf, "G3");
        assert!(session.chomsky(&cnf).unwrap());
        assert_eq!(session.chomskify(&cnf).unwrap(), None);

        assert!(session.cyk(&cnf, "aabb").unwrap().accepted());
        assert!(!session.cyk(&cnf, "abab").unwrap().accepted());
        assert!(matches!(session.cyk("G1", "ab"), Err(Error::Grammar(GrammarError::NotInCNF(_)))));

        let report = session.empty("G1").unwrap();
        assert!(!report.empty);
        assert!(report.useless.is_empty());

        assert_eq!(session.union("G1", "G2").unwrap(), "G4");
        assert_eq!(session.concat("G1", "G2").unwrap(), "G5");
        assert!(matches!(session.union("G1", "nope"), Err(Error::Grammar(GrammarError::GrammarNotFound(_)))));
    }
}
