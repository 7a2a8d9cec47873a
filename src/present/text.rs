use std::io::{self, Write};

use super::{found_message, DATE_LABEL, GROUPS_LABEL, LOCATION_LABEL, NO_EVENT_NAME};
use crate::process::{FilteredView, GroupCatalog, Role};

pub fn render_catalog<W: Write>(out: &mut W, catalog: &GroupCatalog) -> io::Result<()> {
    for group in catalog.iter() {
        writeln!(out, "{}", group)?;
    }
    Ok(())
}

/// One block per event: name, then location, date and groups.
pub fn render_view<W: Write>(out: &mut W, view: &FilteredView) -> io::Result<()> {
    writeln!(out, "{}", found_message(view.len(), &view.selected))?;
    writeln!(out, "---")?;
    for record in &view.records {
        let event = record
            .get(Role::Event)
            .filter(|e| !e.is_empty())
            .unwrap_or(NO_EVENT_NAME);
        writeln!(out, "{}", event)?;
        writeln!(
            out,
            "  {} {}",
            LOCATION_LABEL,
            record.get(Role::Loc).unwrap_or_default()
        )?;
        writeln!(
            out,
            "  {} {}",
            DATE_LABEL,
            record.get(Role::Week).unwrap_or_default()
        )?;
        writeln!(
            out,
            "  {} {}",
            GROUPS_LABEL,
            record.get(Role::Target).unwrap_or_default()
        )?;
        writeln!(out)?;
    }
    Ok(())
}
