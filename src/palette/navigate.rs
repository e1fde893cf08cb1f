use crate::host::Workbench;
use crate::types::{Location, Position, Range};

/// Narrow `range` to the first occurrence of `symbol` on its first line.
///
/// `first_line` is the full text of line `range.start.line`. The search starts
/// at `range.start.character` and stops at the range end when the range is a
/// single line. Without a symbol or a match the range is returned unchanged.
pub fn refine_selection(range: Range, symbol: Option<&str>, first_line: Option<&str>) -> Range {
    let (Some(symbol), Some(line)) = (symbol, first_line) else {
        return range;
    };
    if symbol.is_empty() {
        return range;
    }

    let start = range.start.character as usize;
    let span: String = if range.end.line == range.start.line {
        let len = (range.end.character as usize).saturating_sub(start);
        line.chars().skip(start).take(len).collect()
    } else {
        line.chars().skip(start).collect()
    };

    match span.find(symbol) {
        Some(byte_idx) => {
            let offset = span[..byte_idx].chars().count() as u32;
            let width = symbol.chars().count() as u32;
            let line_no = range.start.line;
            let first = range.start.character + offset;
            Range::new(Position::new(line_no, first), Position::new(line_no, first + width))
        }
        None => range,
    }
}

/// Selection to use when showing `location`, narrowed to the symbol name when
/// the host can supply the line text.
pub async fn resolve_selection(
    workbench: &dyn Workbench,
    location: &Location,
    symbol: Option<&str>,
) -> Option<Range> {
    let range = location.range?;
    if symbol.is_none() {
        return Some(range);
    }

    let line = match workbench.line_text(&location.file, range.start.line).await {
        Ok(line) => line,
        Err(e) => {
            tracing::debug!("No line text for {}: {}", location.file.display(), e);
            None
        }
    };
    Some(refine_selection(range, symbol, line.as_deref()))
}
