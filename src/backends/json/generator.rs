use serde::ser::Serialize;
use serde_json::{
    ser::PrettyFormatter,
    Serializer,
};
use std::{
    fs::File,
    io::Write,
    path::Path,
};

use crate::{
    backends::json::GrammarRecord,
    grammar::Grammar,
};

/// This is the main struct of the [`json`](crate::backends::json) backend.
pub struct JsonGenerator {}

impl JsonGenerator {
    /// Create a new JsonGenerator.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {}
    }

    /// Render `grammars` as pretty-printed JSON.
    pub fn render<'a, I>(&self, grammars: I) -> serde_json::Result<Vec<u8>>
    where
        I: IntoIterator<Item = &'a Grammar>,
    {
        let records: Vec<GrammarRecord> = grammars.into_iter().map(GrammarRecord::from).collect();

        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut ser = Serializer::with_formatter(&mut buf, formatter);
        records.serialize(&mut ser)?;

        Ok(buf)
    }

    /// Write `grammars` into the output file `path`, replacing its contents.
    pub fn generate<'a, P, I>(self, path: P, grammars: I) -> std::io::Result<()>
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = &'a Grammar>,
    {
        let buf = self.render(grammars)?;
        let mut file = File::create(path)?;
        file.write_all(&buf)
    }
}
