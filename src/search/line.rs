use std::path::Path;

use super::files::file_item;
use super::SearchEngine;
use crate::error::SearchError;
use crate::query::SearchRequest;
use crate::types::{Location, Position, Range, ResultItem};

/// Parse `<line>[:<column>]` (1-based) into a zero-based position.
/// Missing or non-numeric parts become 0.
pub fn parse_line_target(text: &str) -> Position {
    let mut parts = text.split(':');
    let line = parts.next().map_or(0, parse_coordinate);
    let character = parts.next().map_or(0, parse_coordinate);
    Position::new(line, character)
}

fn parse_coordinate(part: &str) -> u32 {
    part.trim()
        .parse::<u32>()
        .map_or(0, |n| n.saturating_sub(1))
}

/// Line: one row for the focus file pointing at the parsed position
pub(super) fn execute(
    engine: &SearchEngine,
    request: &SearchRequest,
    focus: Option<&Path>,
) -> Result<Vec<ResultItem>, SearchError> {
    let file = focus.ok_or(SearchError::NoActiveFile)?;
    let position = parse_line_target(&request.symbol_filter);

    let mut item = file_item(engine, file);
    item.description = Some(format!(
        "Line {}, column {}",
        position.line + 1,
        position.character + 1
    ));
    item.target = Some(Location::with_range(file.to_path_buf(), Range::at(position)));
    Ok(vec![item])
}
