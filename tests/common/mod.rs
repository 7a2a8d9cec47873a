#![allow(dead_code)]

use std::fmt::Write as _;
use std::io::{Cursor, Write};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use url::Url;
use warp::{http::Response, Filter};
use zip::{write::SimpleFileOptions, CompressionMethod, ZipWriter};

/// A cell in a generated worksheet.
#[derive(Clone, Copy, Debug)]
pub enum Fx<'a> {
    Blank,
    Text(&'a str),
    Num(f64),
    /// Excel serial date, written with the built-in `m/d/yyyy` format.
    Date(f64),
}

pub const HEADER_MARKER: &str = "קבוצות משתתפות";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
<Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>
</Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets><sheet name="לוח" sheetId="1" r:id="rId1"/></sheets>
</workbook>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts>
<fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills>
<borders count="1"><border/></borders>
<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>
<cellXfs count="2"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/><xf numFmtId="14" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/></cellXfs>
</styleSheet>"#;

fn column_letter(col: usize) -> String {
    let mut result = String::new();
    let mut n = col;
    loop {
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    result
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn sheet_xml(rows: &[Vec<Fx<'_>>]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );
    for (r, row) in rows.iter().enumerate() {
        if row.iter().all(|c| matches!(c, Fx::Blank)) {
            continue;
        }
        let _ = write!(xml, r#"<row r="{}">"#, r + 1);
        for (c, cell) in row.iter().enumerate() {
            let reference = format!("{}{}", column_letter(c), r + 1);
            let _ = match cell {
                Fx::Blank => Ok(()),
                Fx::Text(s) => write!(
                    xml,
                    r#"<c r="{}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
                    reference,
                    escape_xml(s)
                ),
                Fx::Num(n) => write!(xml, r#"<c r="{}"><v>{}</v></c>"#, reference, n),
                Fx::Date(n) => write!(xml, r#"<c r="{}" s="1"><v>{}</v></c>"#, reference, n),
            };
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}

/// Minimal single-sheet `.xlsx` holding `rows`. Fully blank rows are omitted
/// from the XML, like a real export.
pub fn xlsx(rows: &[Vec<Fx<'_>>]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let parts = [
        ("[Content_Types].xml", CONTENT_TYPES.to_string()),
        ("_rels/.rels", ROOT_RELS.to_string()),
        ("xl/workbook.xml", WORKBOOK.to_string()),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS.to_string()),
        ("xl/styles.xml", STYLES.to_string()),
        ("xl/worksheets/sheet1.xml", sheet_xml(rows)),
    ];
    for (name, body) in parts {
        zip.start_file(name, options).expect("start zip entry");
        zip.write_all(body.as_bytes()).expect("write zip entry");
    }
    zip.finish().expect("finish zip").into_inner()
}

/// Text-only variant; `""` becomes a blank cell.
pub fn xlsx_from_strings(rows: &[&[&str]]) -> Vec<u8> {
    let rows: Vec<Vec<Fx<'_>>> = rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|s| if s.is_empty() { Fx::Blank } else { Fx::Text(*s) })
                .collect()
        })
        .collect();
    xlsx(&rows)
}

/// The sheet from the end-to-end scenario: title rows, header at index 2,
/// one event row.
pub fn scenario_rows() -> Vec<Vec<&'static str>> {
    vec![
        vec!["לוח אירועים עונה 2024"],
        vec![""],
        vec!["x", "קבוצות משתתפות", "שבוע", "אירוע", "אולם"],
        vec!["", "קבוצה1, קבוצה2", "2024-01-01", "מפגש", "אולם א"],
    ]
}

/// `scenario_rows` as workbook bytes.
pub fn scenario_bytes() -> Vec<u8> {
    let rows = scenario_rows();
    let rows: Vec<&[&str]> = rows.iter().map(Vec::as_slice).collect();
    xlsx_from_strings(&rows)
}

/// Serve `/export` from a local warp server. Requests numbered below
/// `fail_first` get a 500; `body` is returned otherwise. The counter tracks
/// every request the host saw.
pub async fn spawn_sheet_host(body: Vec<u8>, fail_first: usize) -> (Url, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    let route = warp::path("export").map(move || {
        let n = counter.fetch_add(1, Ordering::SeqCst);
        let status = if n < fail_first { 500 } else { 200 };
        Response::builder()
            .status(status)
            .body(body.clone())
            .expect("response should build")
    });

    let (addr, server) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    let url = Url::parse(&format!("http://{}/export?format=xlsx&gid=0", addr)).unwrap();
    (url, hits)
}
