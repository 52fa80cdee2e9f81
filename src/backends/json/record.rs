use serde::{Deserialize, Serialize};

use crate::{
    error::GrammarError,
    grammar::Grammar,
};

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct RuleRecord {
    id: String,
    lhs: char,
    rhs: String,
}

/// The JSON shape of one grammar.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct GrammarRecord {
    id: String,
    start: char,
    variables: Vec<char>,
    terminals: Vec<char>,
    rules: Vec<RuleRecord>,
}

impl From<&Grammar> for GrammarRecord {
    fn from(grammar: &Grammar) -> Self {
        Self {
            id: grammar.id().to_string(),
            start: grammar.start_symbol(),
            variables: grammar.variables().iter().copied().collect(),
            terminals: grammar.terminals().iter().copied().collect(),
            rules: grammar
                .sorted_rules()
                .into_iter()
                .map(|rule| RuleRecord {
                    id: rule.id().to_string(),
                    lhs: rule.lhs(),
                    rhs: rule.body(),
                })
                .collect(),
        }
    }
}

impl TryFrom<GrammarRecord> for Grammar {
    type Error = GrammarError;

    fn try_from(record: GrammarRecord) -> Result<Self, Self::Error> {
        let mut builder = Grammar::builder(record.id)
            .start_symbol(record.start)
            .variables(record.variables)
            .terminals(record.terminals);

        for rule in record.rules {
            builder = builder.rule(rule.id, rule.lhs, rule.rhs);
        }

        builder.build()
    }
}
