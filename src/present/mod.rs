//! Presentation of a [`GroupCatalog`](crate::process::GroupCatalog) and a
//! [`FilteredView`](crate::process::FilteredView). Nothing here feeds back into
//! the pipeline except the selected group string.

pub mod html;
pub mod text;

pub const PAGE_TITLE: &str = "לוח אירועים - בני הרצליה";
pub const INTRO: &str = "בחר קבוצה כדי לראות את כל האירועים הרלוונטיים עבורה.";
pub const SELECT_LABEL: &str = "חיפוש קבוצה:";
pub const NO_EVENT_NAME: &str = "ללא שם אירוע";
pub const LOCATION_LABEL: &str = "מיקום:";
pub const DATE_LABEL: &str = "תאריך:";
pub const GROUPS_LABEL: &str = "קבוצות:";

/// Summary line shown above the results.
pub fn found_message(count: usize, group: &str) -> String {
    format!("נמצאו {} אירועים עבור: {}", count, group)
}
