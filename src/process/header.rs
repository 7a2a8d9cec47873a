use tracing::{debug, instrument};

use super::raw_table::RawSheet;
use crate::error::{CalendarError, Result};

/// Index of the first row holding a cell that contains `marker`.
#[instrument(level = "debug", skip(sheet), fields(rows = sheet.len()))]
pub fn locate(sheet: &RawSheet, marker: &str) -> Result<usize> {
    let idx = sheet
        .rows()
        .iter()
        .position(|row| row.iter().any(|cell| cell.as_str().contains(marker)))
        .ok_or_else(|| CalendarError::HeaderNotFound {
            marker: marker.to_string(),
        })?;
    debug!(header_row = idx, "located header");
    Ok(idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKER: &str = "קבוצות משתתפות";

    #[test]
    fn finds_first_matching_row() {
        let sheet = RawSheet::from_strings(vec![
            vec!["לוח אירועים"],
            vec![""],
            vec!["x", "קבוצות משתתפות (כולל צוות)", "שבוע"],
            vec!["", "קבוצות משתתפות", ""],
        ]);
        assert_eq!(locate(&sheet, MARKER).unwrap(), 2);
    }

    #[test]
    fn marker_may_sit_in_any_column() {
        let sheet = RawSheet::from_strings(vec![vec!["a", "b"], vec!["", "", "", MARKER]]);
        assert_eq!(locate(&sheet, MARKER).unwrap(), 1);
    }

    #[test]
    fn absent_marker_is_an_error() {
        let sheet = RawSheet::from_strings(vec![vec!["a", "b"], vec!["c"]]);
        match locate(&sheet, MARKER) {
            Err(CalendarError::HeaderNotFound { marker }) => assert_eq!(marker, MARKER),
            other => panic!("expected HeaderNotFound, got {:?}", other),
        }
    }

    #[test]
    fn empty_sheet_has_no_header() {
        assert!(locate(&RawSheet::default(), MARKER).is_err());
    }
}
