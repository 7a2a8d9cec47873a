use tracing::{debug, instrument};

use super::columns::ColumnMap;
use super::raw_table::RawSheet;

/// Rows below the header as display-ready strings, one column per header cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// One row of a [`NormalizedTable`], addressable by column name or index.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    columns: &'a [String],
    values: &'a [String],
}

impl<'a> Record<'a> {
    /// Value of the first column called `name`.
    pub fn get(&self, name: &str) -> Option<&'a str> {
        self.columns
            .iter()
            .position(|c| c == name)
            .map(|idx| self.value(idx))
    }

    /// Value at `idx`, `""` past the end of the row.
    pub fn value(&self, idx: usize) -> &'a str {
        self.values.get(idx).map(String::as_str).unwrap_or("")
    }
}

impl NormalizedTable {
    /// Every row is padded or cut to the number of columns.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.rows.iter().map(move |row| Record {
            columns: &self.columns,
            values: row,
        })
    }

    pub fn record(&self, idx: usize) -> Option<Record<'_>> {
        self.rows.get(idx).map(|row| Record {
            columns: &self.columns,
            values: row,
        })
    }
}

/// Trimmed header names, padded with `""` to the full sheet width.
pub fn header_names(sheet: &RawSheet, header_index: usize) -> Vec<String> {
    let mut names: Vec<String> = sheet
        .row(header_index)
        .unwrap_or(&[])
        .iter()
        .map(|cell| cell.as_str().trim().to_string())
        .collect();
    names.resize(names.len().max(sheet.width()), String::new());
    names
}

/// Carry the last non-empty value down over empty cells of column `idx`.
/// Rows before the first value stay empty.
pub fn forward_fill(rows: &mut [Vec<String>], idx: usize) -> usize {
    let mut last: Option<String> = None;
    let mut filled = 0;
    for row in rows.iter_mut() {
        let Some(value) = row.get_mut(idx) else {
            continue;
        };
        if value.is_empty() {
            if let Some(prev) = &last {
                value.clone_from(prev);
                filled += 1;
            }
        } else {
            last = Some(value.clone());
        }
    }
    filled
}

/// Take every row after `header_index`, name the columns from the header row
/// and forward-fill the week column when one was resolved.
#[instrument(level = "debug", skip(sheet, columns), fields(rows = sheet.len()))]
pub fn normalize(sheet: &RawSheet, header_index: usize, columns: &ColumnMap) -> NormalizedTable {
    let names = header_names(sheet, header_index);
    let rows: Vec<Vec<String>> = sheet
        .rows()
        .iter()
        .skip(header_index + 1)
        .map(|row| row.iter().map(|cell| cell.as_str().to_string()).collect())
        .collect();

    let mut table = NormalizedTable::new(names, rows);
    if let Some(week) = &columns.week {
        let filled = forward_fill(&mut table.rows, week.index);
        debug!(column = %week.name, filled, "forward-filled week column");
    }
    table
}
