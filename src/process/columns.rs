use std::fmt;
use tracing::debug;

use crate::error::{CalendarError, Result};

/// The four things the pipeline needs to find in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    /// Participating groups.
    Target,
    /// Week or date of the event.
    Week,
    /// Event name.
    Event,
    /// Hall or location.
    Loc,
}

/// Resolution order and candidate substrings for each role.
pub static ROLE_CANDIDATES: &[(Role, &[&str])] = &[
    (Role::Target, &["קבוצות משתתפות"]),
    (Role::Week, &["שבוע", "תאריך"]),
    (Role::Event, &["אירוע"]),
    (Role::Loc, &["אולם", "מיקום"]),
];

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Target => "target",
            Role::Week => "week",
            Role::Event => "event",
            Role::Loc => "loc",
        }
    }

    pub fn candidates(&self) -> &'static [&'static str] {
        ROLE_CANDIDATES
            .iter()
            .find(|(role, _)| role == self)
            .map(|(_, c)| *c)
            .unwrap_or(&[])
    }

    /// Label used once the column is handed to a presenter.
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Target => "קבוצות משתתפות",
            Role::Loc => "מיקום",
            Role::Week => "שבוע/תאריך",
            Role::Event => "אירוע",
        }
    }

    fn matches(&self, header: &str) -> bool {
        let header = header.trim();
        self.candidates().iter().any(|c| header.contains(c))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A header column picked for a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub index: usize,
    /// Trimmed header text.
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    pub target: Column,
    pub week: Option<Column>,
    pub event: Option<Column>,
    pub loc: Option<Column>,
}

impl ColumnMap {
    pub fn get(&self, role: Role) -> Option<&Column> {
        match role {
            Role::Target => Some(&self.target),
            Role::Week => self.week.as_ref(),
            Role::Event => self.event.as_ref(),
            Role::Loc => self.loc.as_ref(),
        }
    }

    /// Resolved columns in presentation order: target, loc, week, event.
    pub fn display_columns(&self) -> impl Iterator<Item = (Role, &Column)> + '_ {
        [Role::Target, Role::Loc, Role::Week, Role::Event]
            .into_iter()
            .filter_map(move |role| self.get(role).map(|c| (role, c)))
    }
}

fn find_column<S: AsRef<str>>(header: &[S], role: Role) -> Option<Column> {
    header
        .iter()
        .enumerate()
        .find(|(_, h)| role.matches(h.as_ref()))
        .map(|(index, h)| Column {
            index,
            name: h.as_ref().trim().to_string(),
        })
}

/// Map every role to the left-most header column containing one of its
/// candidates. Fails only when no column qualifies for `Target`.
pub fn resolve<S: AsRef<str>>(header: &[S]) -> Result<ColumnMap> {
    let target = find_column(header, Role::Target).ok_or(CalendarError::MissingRequiredColumn {
        role: Role::Target,
    })?;
    let map = ColumnMap {
        target,
        week: find_column(header, Role::Week),
        event: find_column(header, Role::Event),
        loc: find_column(header, Role::Loc),
    };

    debug!(
        target = %map.target.name,
        week = ?map.week.as_ref().map(|c| &c.name),
        event = ?map.event.as_ref().map(|c| &c.name),
        loc = ?map.loc.as_ref().map(|c| &c.name),
        "resolved columns"
    );
    Ok(map)
}
