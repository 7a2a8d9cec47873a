use std::fmt::Write;

use super::{
    found_message, DATE_LABEL, GROUPS_LABEL, INTRO, LOCATION_LABEL, NO_EVENT_NAME, PAGE_TITLE,
    SELECT_LABEL,
};
use crate::process::{FilteredView, GroupCatalog, Role, ViewRecord};

const STYLE: &str = r#"<style>
body { direction: rtl; text-align: right; font-family: sans-serif; max-width: 46rem; margin: 0 auto; padding: 2rem 1rem; }
select { direction: rtl; width: 100%; padding: .4rem; }
.found { background: #e8f5e9; padding: .6rem; border-radius: .3rem; }
.error { background: #fdecea; padding: .6rem; border-radius: .3rem; }
.event h3 { margin-bottom: .3rem; }
.event .details { display: flex; gap: 2rem; }
.event hr { margin-top: 5px; margin-bottom: 15px; border: 0; border-top: 1px solid #e6e6e6; }
@media (max-width: 768px) { body { font-size: 14px; padding: 1.5rem 1rem; } }
</style>"#;

/// What the page body shows.
pub enum Page<'a> {
    /// Selection control, plus results when a group was picked.
    Board {
        catalog: &'a GroupCatalog,
        view: Option<&'a FilteredView>,
    },
    /// The single message for a failed render cycle.
    Error(String),
}

/// Escape text for element content and double-quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn render_select(html: &mut String, catalog: &GroupCatalog, selected: &str) {
    let _ = write!(
        html,
        r#"<form method="get" action="/"><label for="group">{}</label>"#,
        SELECT_LABEL
    );
    html.push_str(r#"<select id="group" name="group" onchange="this.form.submit()">"#);
    // empty sentinel = no selection
    html.push_str(r#"<option value=""></option>"#);
    for group in catalog.iter() {
        let escaped = escape_html(group);
        let marker = if group == selected { " selected" } else { "" };
        let _ = write!(
            html,
            r#"<option value="{}"{}>{}</option>"#,
            escaped, marker, escaped
        );
    }
    html.push_str("</select><noscript><button type=\"submit\">OK</button></noscript></form>");
}

fn render_record(html: &mut String, record: &ViewRecord) {
    let event = record
        .get(Role::Event)
        .filter(|e| !e.is_empty())
        .unwrap_or(NO_EVENT_NAME);
    let _ = write!(
        html,
        r#"<div class="event"><h3>{}</h3><div class="details"><span><b>{}</b> {}</span><span><b>{}</b> {}</span></div><p><b>{}</b> {}</p><hr></div>"#,
        escape_html(event),
        LOCATION_LABEL,
        escape_html(record.get(Role::Loc).unwrap_or_default()),
        DATE_LABEL,
        escape_html(record.get(Role::Week).unwrap_or_default()),
        GROUPS_LABEL,
        escape_html(record.get(Role::Target).unwrap_or_default()),
    );
}

pub fn render_page(page: &Page<'_>) -> String {
    let mut html = String::with_capacity(8 * 1024);
    let _ = write!(
        html,
        r#"<!DOCTYPE html><html lang="he" dir="rtl"><head><meta charset="utf-8"><meta name="viewport" content="width=device-width, initial-scale=1"><title>{}</title>{}</head><body>"#,
        PAGE_TITLE, STYLE
    );
    let _ = write!(html, "<h1>🏊 {}</h1><p>{}</p>", PAGE_TITLE, INTRO);

    match page {
        Page::Error(message) => {
            let _ = write!(html, r#"<p class="error">{}</p>"#, escape_html(message));
        }
        Page::Board { catalog, view } => {
            let view = *view;
            let selected = view.map(|v| v.selected.as_str()).unwrap_or("");
            render_select(&mut html, catalog, selected);
            if let Some(view) = view.filter(|v| !v.selected.is_empty()) {
                let _ = write!(
                    html,
                    r#"<p class="found">{}</p><hr>"#,
                    escape_html(&found_message(view.len(), &view.selected))
                );
                for record in &view.records {
                    render_record(&mut html, record);
                }
            }
        }
    }

    html.push_str("</body></html>");
    html
}
