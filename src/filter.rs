//! Narrowing items to a page category and its type facets.

use indexmap::IndexSet;

use crate::Item;

/// Items whose affiliation contains `label`, compared trimmed and
/// case-insensitively. Containment lets one label cover several affiliation
/// spellings.
pub fn select_category(items: &[Item], label: &str) -> Vec<Item> {
    let label = label.trim().to_lowercase();
    items
        .iter()
        .filter(|item| item.affiliation.trim().to_lowercase().contains(&label))
        .cloned()
        .collect()
}

/// Distinct non-empty types in order of first appearance.
pub fn facet_types(items: &[Item]) -> IndexSet<String> {
    items
        .iter()
        .map(|item| item.kind.as_str())
        .filter(|kind| !kind.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Items whose type is any of `selected`. An empty selection keeps everything.
pub fn apply_type_filter<S: AsRef<str>>(items: &[Item], selected: &[S]) -> Vec<Item> {
    if selected.is_empty() {
        return items.to_vec();
    }
    items
        .iter()
        .filter(|item| selected.iter().any(|kind| kind.as_ref() == item.kind))
        .cloned()
        .collect()
}

/// The items of one page category together with its type facets.
#[derive(Debug, Clone, Default)]
pub struct CategoryView {
    pub label: String,
    pub items: Vec<Item>,
    pub types: IndexSet<String>,
}

impl CategoryView {
    pub fn new(all: &[Item], label: &str) -> Self {
        let items = select_category(all, label);
        let types = facet_types(&items);
        Self {
            label: label.to_owned(),
            items,
            types,
        }
    }

    pub fn filter<S: AsRef<str>>(&self, selected: &[S]) -> Vec<Item> {
        apply_type_filter(&self.items, selected)
    }
}
