pub(crate) mod json;
pub(crate) mod text;

use std::path::Path;

use crate::{
    error::ParsingError,
    grammar::Grammar,
};

/// Whether `path` is stored in JSON format instead of the flat-text format.
pub(crate) fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Load every grammar of `path`, choosing the format by file extension.
pub(crate) fn parse_file(path: &Path) -> Result<Vec<Grammar>, ParsingError> {
    if is_json(path) {
        json::parse_json(path)
    } else {
        text::parse_text(path)
    }
}
