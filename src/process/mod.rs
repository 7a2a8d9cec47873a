// src/process/mod.rs
//! Header detection, column resolution, normalisation, group indexing and
//! filtering. Everything here is pure: a [`RawSheet`] goes in, a [`Board`]
//! comes out, and a [`FilteredView`] is produced per selection.

pub mod columns;
pub mod filter;
pub mod groups;
pub mod header;
pub mod normalize;
pub mod raw_table;

pub use columns::{Column, ColumnMap, Role};
pub use filter::{FilteredView, ViewField, ViewRecord};
pub use groups::GroupCatalog;
pub use normalize::{NormalizedTable, Record};
pub use raw_table::{Cell, RawSheet};

use tracing::{info, instrument};

use crate::error::Result;

/// Everything derived from one sheet for one render cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    header_index: usize,
    columns: ColumnMap,
    table: NormalizedTable,
    catalog: GroupCatalog,
}

impl Board {
    /// Run header location, column resolution, normalisation and indexing.
    /// Stops at the first failure; a missing target column means the catalog
    /// is never built.
    #[instrument(level = "info", skip(sheet), fields(rows = sheet.len()))]
    pub fn prepare(sheet: &RawSheet, marker: &str) -> Result<Self> {
        let header_index = header::locate(sheet, marker)?;
        let names = normalize::header_names(sheet, header_index);
        let columns = columns::resolve(&names)?;
        let table = normalize::normalize(sheet, header_index, &columns);
        let catalog = groups::build_catalog(&table, &columns.target.name);

        info!(
            header_index,
            events = table.len(),
            groups = catalog.len(),
            "board ready"
        );
        Ok(Self {
            header_index,
            columns,
            table,
            catalog,
        })
    }

    pub fn header_index(&self) -> usize {
        self.header_index
    }

    pub fn columns(&self) -> &ColumnMap {
        &self.columns
    }

    pub fn catalog(&self) -> &GroupCatalog {
        &self.catalog
    }

    pub fn select(&self, group: &str) -> FilteredView {
        filter::filter(&self.table, &self.columns, group)
    }
}
