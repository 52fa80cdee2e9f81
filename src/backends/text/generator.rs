use itertools::Itertools;
use std::{
    fmt::Write as _,
    fs::File,
    io::{self, ErrorKind, Write},
    path::Path,
};

use crate::{
    backends::text::GRAMMAR_SEPARATOR,
    grammar::Grammar,
};

/// This is the main struct of the [`text`](crate::backends::text) backend.
pub struct TextGenerator {}

impl TextGenerator {
    /// Create a new TextGenerator.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {}
    }

    /// Render `grammars` as flat text. Rules are listed in rule-number order.
    ///
    /// Symbol lists are comma-separated and whitespace is insignificant, so a grammar
    /// that declares `,` or a whitespace character as a symbol is rejected with
    /// [`ErrorKind::InvalidData`].
    pub fn render<'a, I>(&self, grammars: I) -> io::Result<String>
    where
        I: IntoIterator<Item = &'a Grammar>,
    {
        let mut out = String::new();

        for grammar in grammars {
            check_symbols(grammar)?;

            // writing into a String cannot fail
            let _ = writeln!(out, "{}", GRAMMAR_SEPARATOR);
            let _ = writeln!(out, "Grammar ID: {}", grammar.id());
            let _ = writeln!(out, "Start Symbol: {}", grammar.start_symbol());
            let _ = writeln!(out, "Variables: {}", grammar.variables().iter().join(", "));
            let _ = writeln!(out, "Terminals: {}", grammar.terminals().iter().join(", "));

            for rule in grammar.sorted_rules() {
                let _ = writeln!(out, "{}", rule);
            }
        }

        Ok(out)
    }

    /// Write `grammars` into the output file `path`, replacing its contents.
    ///
    /// Nothing is written if one of the grammars cannot be rendered.
    pub fn generate<'a, P, I>(self, path: P, grammars: I) -> io::Result<()>
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = &'a Grammar>,
    {
        let out = self.render(grammars)?;
        let mut file = File::create(path)?;
        file.write_all(out.as_bytes())
    }
}

fn check_symbols(grammar: &Grammar) -> io::Result<()> {
    let unreadable = grammar.variables().iter().chain(grammar.terminals()).find(|c| **c == ',' || c.is_whitespace());

    match unreadable {
        Some(c) => Err(io::Error::new(
            ErrorKind::InvalidData,
            format!("Grammar {} uses the symbol {:?}, which the text format cannot store", grammar.id(), c),
        )),
        None => Ok(()),
    }
}
