use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::{debug, instrument};

use super::columns::{ColumnMap, Role};
use super::normalize::{NormalizedTable, Record};

/// One projected value, relabeled for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewField {
    pub role: Role,
    pub label: &'static str,
    pub value: String,
}

/// A matching row projected to the resolved display columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewRecord {
    pub fields: Vec<ViewField>,
}

impl ViewRecord {
    pub fn get(&self, role: Role) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.role == role)
            .map(|f| f.value.as_str())
    }
}

/// Serialized as `{label: value}` in display order.
impl Serialize for ViewRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for field in &self.fields {
            map.serialize_entry(field.label, &field.value)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct FilteredView {
    pub selected: String,
    pub records: Vec<ViewRecord>,
}

impl FilteredView {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Rows whose `target_column` contains `selected` verbatim, in table order.
/// No regex, no case folding, no token boundaries.
pub fn matching_rows<'a>(
    table: &'a NormalizedTable,
    target_column: &str,
    selected: &'a str,
) -> impl Iterator<Item = Record<'a>> + 'a {
    let idx = table.column_index(target_column);
    table
        .records()
        .filter(move |record| idx.is_some_and(|i| record.value(i).contains(selected)))
}

/// Select the rows for `selected` and project them onto the resolved roles.
/// An empty selection means nothing is selected and yields an empty view.
#[instrument(level = "debug", skip(table, columns), fields(rows = table.len()))]
pub fn filter(table: &NormalizedTable, columns: &ColumnMap, selected: &str) -> FilteredView {
    let records: Vec<ViewRecord> = if selected.is_empty() {
        Vec::new()
    } else {
        matching_rows(table, &columns.target.name, selected)
            .map(|record| ViewRecord {
                fields: columns
                    .display_columns()
                    .map(|(role, column)| ViewField {
                        role,
                        label: role.display_name(),
                        value: record.value(column.index).to_string(),
                    })
                    .collect(),
            })
            .collect()
    };

    debug!(matched = records.len(), "filtered rows");
    FilteredView {
        selected: selected.to_string(),
        records,
    }
}
