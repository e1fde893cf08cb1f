use crate::query::{PrefixTable, SearchKind};
use crate::types::ResultItem;

/// Help: one shortcut row per enabled prefix, numbered from 1 in table order,
/// then the free-text row numbered 0.
pub fn help_items(table: &PrefixTable) -> Vec<ResultItem> {
    let help = table.prefix(SearchKind::Help);

    let mut items: Vec<ResultItem> = table
        .active_entries()
        .filter(|entry| entry.kind != SearchKind::Help)
        .enumerate()
        .map(|(i, entry)| {
            ResultItem::shortcut(
                format!("{}{help}\t{}", i + 1, entry.label),
                entry.prefix.clone(),
            )
        })
        .collect();

    items.push(ResultItem::shortcut(
        format!("0{help}\tType anything in the input box to find files or filter by file path"),
        "",
    ));
    items
}
