use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, warn};

use super::normalize::NormalizedTable;

/// Separators between group names inside one cell.
static DELIMITERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[,\n/]").expect("group delimiter pattern should parse"));

/// Sorted, deduplicated group names offered for selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GroupCatalog(Vec<String>);

impl GroupCatalog {
    pub fn groups(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl FromIterator<String> for GroupCatalog {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let set: BTreeSet<String> = iter.into_iter().collect();
        GroupCatalog(set.into_iter().collect())
    }
}

/// Group names in one cell: split on the delimiters, trimmed, without blanks
/// and `nan` placeholders.
pub fn split_groups(cell: &str) -> impl Iterator<Item = &str> {
    DELIMITERS
        .split(cell)
        .map(str::trim)
        .filter(|token| !token.is_empty() && !token.eq_ignore_ascii_case("nan"))
}

/// Collect every group mentioned in `target_column` across the table.
pub fn build_catalog(table: &NormalizedTable, target_column: &str) -> GroupCatalog {
    let Some(idx) = table.column_index(target_column) else {
        warn!(column = target_column, "target column not in table; empty catalog");
        return GroupCatalog::default();
    };

    let catalog: GroupCatalog = table
        .records()
        .flat_map(|record| split_groups(record.value(idx)))
        .map(str::to_string)
        .collect();

    debug!(groups = catalog.len(), rows = table.len(), "built group catalog");
    catalog
}
