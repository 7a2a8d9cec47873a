use calamine::{Data, Reader, Xlsx};
use chrono::{NaiveDateTime, Timelike};
use std::{fs, io::Cursor, path::Path};
use tracing::{debug, instrument};

use crate::error::{CalendarError, Result};

/// Whole-cell texts that spreadsheet exports use for a missing value. Matched
/// exactly, without trimming or case folding.
pub const MISSING_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// A spreadsheet cell after ingestion. Blanks, empty strings and the
/// [`MISSING_MARKERS`] all collapse to `Empty`, so nothing downstream has to
/// tell them apart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.is_empty() || MISSING_MARKERS.contains(&s.as_str()) {
            Cell::Empty
        } else {
            Cell::Text(s)
        }
    }

    /// Display form; `""` for `Empty`.
    pub fn as_str(&self) -> &str {
        match self {
            Cell::Empty => "",
            Cell::Text(s) => s,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::text(s)
    }
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty | Data::Error(_) => Cell::Empty,
            Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::text(s.as_str()),
            Data::Int(i) => Cell::Text(i.to_string()),
            Data::Float(f) => format_float(*f).map_or(Cell::Empty, Cell::Text),
            Data::Bool(b) => Cell::Text(if *b { "True" } else { "False" }.to_string()),
            Data::DateTime(dt) => match dt.as_datetime() {
                Some(ndt) => Cell::Text(format_datetime(&ndt)),
                None => format_float(dt.as_f64()).map_or(Cell::Empty, Cell::Text),
            },
        }
    }
}

/// Integral floats lose their `.0`; NaN is treated as blank.
fn format_float(f: f64) -> Option<String> {
    if f.is_nan() {
        None
    } else if f.fract() == 0.0 && f.abs() < 1e15 {
        Some(format!("{}", f as i64))
    } else {
        Some(f.to_string())
    }
}

fn format_datetime(dt: &NaiveDateTime) -> String {
    if dt.num_seconds_from_midnight() == 0 {
        dt.format("%Y-%m-%d").to_string()
    } else {
        dt.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Rows × columns of cells with no header assumed. Indices are absolute sheet
/// coordinates: leading blank rows and columns are kept as empty cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSheet {
    rows: Vec<Vec<Cell>>,
}

impl RawSheet {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// Build a sheet from plain strings, applying the usual cell ingestion rules.
    pub fn from_strings<R, S>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(
            rows.into_iter()
                .map(|row| row.into_iter().map(|s| Cell::from(s.as_ref())).collect())
                .collect(),
        )
    }

    /// Read the first worksheet of an `.xlsx` payload.
    #[instrument(level = "debug", skip(bytes), fields(len = bytes.len()))]
    pub fn from_xlsx(bytes: &[u8]) -> Result<Self> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or(CalendarError::NoWorksheet)??;

        let (row0, col0) = range
            .start()
            .map(|(r, c)| (r as usize, c as usize))
            .unwrap_or((0, 0));

        let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); row0];
        for row in range.rows() {
            let mut cells = vec![Cell::Empty; col0];
            cells.extend(row.iter().map(Cell::from));
            rows.push(cells);
        }

        debug!(rows = rows.len(), first_row = row0, first_col = col0, "read worksheet");
        Ok(Self { rows })
    }

    /// Read a locally saved `.xlsx` export.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| CalendarError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_xlsx(&bytes)
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row(&self, idx: usize) -> Option<&[Cell]> {
        self.rows.get(idx).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Length of the longest row.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}
