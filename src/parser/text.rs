use std::fs;
use std::path::Path;

use crate::{
    error::ParsingError,
    grammar::{Grammar, GrammarBuilder},
};

/// Line that starts a new grammar block in the flat-text format.
pub const GRAMMAR_SEPARATOR: &str = "====";

const ID_PREFIX: &str = "Grammar ID:";
const START_PREFIX: &str = "Start Symbol:";
const VARIABLES_PREFIX: &str = "Variables:";
const TERMINALS_PREFIX: &str = "Terminals:";

fn single_char(token: &str) -> Result<char, String> {
    let mut chars = token.chars();

    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(format!("'{}' is not a single character", token)),
    }
}

fn parse_symbol_list(list: &str) -> Result<Vec<char>, String> {
    list.split(',').map(str::trim).filter(|token| !token.is_empty()).map(single_char).collect()
}

/// Parse a rule line of the form `r1: S -> aB`.
fn parse_rule(line: &str) -> Result<(String, char, String), String> {
    let (id, rule) = line.split_once(':').ok_or_else(|| format!("'{}' is not a rule", line))?;
    let (lhs, rhs) = rule.split_once("->").ok_or_else(|| format!("Rule '{}' has no '->'", line))?;

    let id = id.trim();
    if id.is_empty() {
        return Err(format!("Rule '{}' has no ID", line));
    }

    let lhs = single_char(lhs.trim())?;
    let rhs: String = rhs.chars().filter(|c| !c.is_whitespace()).collect();

    Ok((id.to_string(), lhs, rhs))
}

fn finish(builder: Option<GrammarBuilder>, grammars: &mut Vec<Grammar>) -> Result<(), String> {
    if let Some(builder) = builder {
        grammars.push(builder.build().map_err(|e| e.to_string())?);
    }

    Ok(())
}

pub(crate) fn parse_grammars(content: &str) -> Result<Vec<Grammar>, String> {
    let mut grammars = Vec::new();
    let mut current: Option<GrammarBuilder> = None;

    for (number, line) in content.lines().enumerate() {
        let line = line.trim();
        let at = |msg: String| format!("line {}: {}", number + 1, msg);

        if line.is_empty() {
            continue;
        }

        if line.starts_with(GRAMMAR_SEPARATOR) {
            finish(current.take(), &mut grammars).map_err(at)?;
            continue;
        }

        if let Some(id) = line.strip_prefix(ID_PREFIX) {
            finish(current.take(), &mut grammars).map_err(at)?;
            current = Some(Grammar::builder(id.trim()));
            continue;
        }

        let builder = match current.take() {
            Some(builder) => builder,
            None => return Err(at(format!("'{}' is outside of a grammar block", line))),
        };

        let builder = if let Some(start) = line.strip_prefix(START_PREFIX) {
            builder.start_symbol(single_char(start.trim()).map_err(at)?)
        } else if let Some(variables) = line.strip_prefix(VARIABLES_PREFIX) {
            builder.variables(parse_symbol_list(variables).map_err(at)?)
        } else if let Some(terminals) = line.strip_prefix(TERMINALS_PREFIX) {
            builder.terminals(parse_symbol_list(terminals).map_err(at)?)
        } else {
            let (id, lhs, rhs) = parse_rule(line).map_err(at)?;
            builder.rule(id, lhs, rhs)
        };

        current = Some(builder);
    }

    finish(current, &mut grammars).map_err(|e| format!("end of file: {}", e))?;
    Ok(grammars)
}

/// Load every grammar of a file in flat-text format.
pub fn parse_text(path: &Path) -> Result<Vec<Grammar>, ParsingError> {
    let content = fs::read_to_string(path).map_err(|e| ParsingError::new(path, e.to_string()))?;
    parse_grammars(&content).map_err(|e| ParsingError::new(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_file() {
        let grammars = parse_text(Path::new("test-data/grammars/sample.txt")).unwrap();
        assert_eq!(grammars.len(), 2);

        let g = &grammars[0];
        assert_eq!(g.id(), "G1");
        assert_eq!(g.start_symbol(), 'S');
        assert_eq!(g.variables().iter().collect::<String>(), "AS");
        assert_eq!(g.terminals().iter().collect::<String>(), "ab");
        assert_eq!(g.rule("r1").unwrap().to_string(), "r1: S -> aA");
    }

    #[test]
    fn test_rule_whitespace() {
        let grammars = parse_grammars("====\nGrammar ID: G1\nStart Symbol: S\nTerminals: a, b\nr1: S -> a b S\n").unwrap();
        assert_eq!(grammars[0].rule("r1").unwrap().body(), "abS");
    }

    #[test]
    fn test_undefined_symbol() {
        let err = parse_grammars("====\nGrammar ID: G1\nStart Symbol: S\nr1: S -> x\n").unwrap_err();
        assert_eq!(err, "end of file: Symbol 'x' is not defined");

        let err = parse_grammars("====\nGrammar ID: G1\nStart Symbol: S\nr1: S -> x\n====\n").unwrap_err();
        assert_eq!(err, "line 5: Symbol 'x' is not defined");
    }

    #[test]
    fn test_malformed_lines() {
        assert_eq!(parse_grammars("Start Symbol: S").unwrap_err(), "line 1: 'Start Symbol: S' is outside of a grammar block");
        assert_eq!(parse_grammars("Grammar ID: G1\nStart Symbol: ST").unwrap_err(), "line 2: 'ST' is not a single character");
        assert_eq!(parse_grammars("Grammar ID: G1\nr1 S -> a").unwrap_err(), "line 2: 'r1 S -> a' is not a rule");
        assert_eq!(parse_grammars("Grammar ID: G1\nr1: S a").unwrap_err(), "line 2: Rule 'r1: S a' has no '->'");
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_grammars("").unwrap().is_empty());
        assert!(parse_grammars("====\n\n").unwrap().is_empty());
    }
}
