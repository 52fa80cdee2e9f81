use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use json_comments::{CommentSettings, StripComments};
use serde_json as json;

use crate::{
    backends::json::GrammarRecord,
    error::ParsingError,
    grammar::Grammar,
};

fn parse_records(records: Vec<GrammarRecord>) -> Result<Vec<Grammar>, String> {
    let mut grammars = Vec::with_capacity(records.len());

    for (i, record) in records.into_iter().enumerate() {
        let grammar = Grammar::try_from(record).map_err(|e| format!("grammar #{}: {}", i + 1, e))?;
        grammars.push(grammar);
    }

    Ok(grammars)
}

/// Load every grammar of a JSON file. C-style comments are stripped first.
pub fn parse_json(path: &Path) -> Result<Vec<Grammar>, ParsingError> {
    let file = File::open(path).map_err(|e| ParsingError::new(path, e.to_string()))?;
    let reader = BufReader::new(file);
    let reader = StripComments::with_settings(CommentSettings::c_style(), reader);

    let records: Vec<GrammarRecord> = match json::from_reader(reader) {
        Ok(records) => records,
        Err(e) => {
            return Err(ParsingError::new(path, format!("Invalid JSON: {}", e)));
        },
    };

    parse_records(records).map_err(|e| ParsingError::new(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_file() {
        let grammars = parse_json(Path::new("test-data/grammars/sample.json")).unwrap();
        assert_eq!(grammars.len(), 2);

        let star = &grammars[1];
        assert_eq!(star.id(), "star");
        assert_eq!(star.start_symbol(), 'T');
        assert_eq!(star.rule("r3").unwrap().to_string(), "r3: T -> ST");
    }

    #[test]
    fn test_invalid_grammar() {
        let records: Vec<GrammarRecord> =
            json::from_str(r#"[{"id": "G1", "start": "S", "variables": [], "terminals": [], "rules": [{"id": "r1", "lhs": "A", "rhs": "S"}]}]"#)
                .unwrap();

        assert_eq!(parse_records(records).unwrap_err(), "grammar #1: Left side 'A' is not a defined variable");
    }
}
