// src/error.rs
use thiserror::Error;

use crate::process::columns::Role;

pub type Result<T> = std::result::Result<T, CalendarError>;

/// Everything that can end a render cycle. None of these are retried by the
/// pipeline; the caller turns them into a single message via [`user_message`].
///
/// [`user_message`]: CalendarError::user_message
#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("GET {url} failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("GET {url} returned {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("could not parse spreadsheet: {0}")]
    Parse(#[from] calamine::XlsxError),

    #[error("could not read spreadsheet file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("spreadsheet has no worksheets")]
    NoWorksheet,

    #[error("no row contains the header marker {marker:?}")]
    HeaderNotFound { marker: String },

    #[error("header has no column for required role `{role}`")]
    MissingRequiredColumn { role: Role },
}

impl CalendarError {
    /// True when the sheet could not be obtained or read at all, as opposed to
    /// a sheet whose layout the pipeline does not recognise.
    pub fn is_source_failure(&self) -> bool {
        matches!(
            self,
            CalendarError::Fetch { .. }
                | CalendarError::Status { .. }
                | CalendarError::Parse(_)
                | CalendarError::Io { .. }
                | CalendarError::NoWorksheet
        )
    }

    /// The one line shown to the end user in place of the calendar.
    pub fn user_message(&self) -> String {
        match self {
            CalendarError::HeaderNotFound { marker } => {
                format!("שגיאה: לא נמצאה עמודת '{}'.", marker)
            }
            CalendarError::MissingRequiredColumn { role } => {
                let name = role.candidates().first().copied().unwrap_or(role.as_str());
                format!("שגיאה: לא נמצאה עמודת '{}'.", name)
            }
            other => format!("שגיאה בטעינת הנתונים: {}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_message_names_the_marker() {
        let err = CalendarError::HeaderNotFound {
            marker: "קבוצות משתתפות".into(),
        };
        assert_eq!(err.user_message(), "שגיאה: לא נמצאה עמודת 'קבוצות משתתפות'.");
        assert!(!err.is_source_failure());
    }

    #[test]
    fn missing_target_uses_its_first_candidate() {
        let err = CalendarError::MissingRequiredColumn { role: Role::Target };
        assert!(err.user_message().contains("קבוצות משתתפות"));
    }

    #[test]
    fn source_failures_are_prefixed() {
        let err = CalendarError::NoWorksheet;
        assert!(err.is_source_failure());
        assert!(err.user_message().starts_with("שגיאה בטעינת הנתונים"));
    }
}
