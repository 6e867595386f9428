//! Workbook sheets as string-typed frames.
//!
//! The first row of the sheet is the header. Every other cell is kept as
//! optional text so numeric AUC columns come through unchanged.

use std::collections::HashSet;
use std::path::Path;

use calamine::{open_workbook_auto, DataType as Ct, Range, Reader};
use polars::prelude::*;
use tracing::debug;

use crate::error::polars_err;

/// Text of a non-empty cell.
fn cell_text(cell: &Ct) -> Option<String> {
    let text = match cell {
        Ct::Empty => return None,
        Ct::String(s) | Ct::DateTimeIso(s) | Ct::DurationIso(s) => s.clone(),
        Ct::Float(n) | Ct::Duration(n) | Ct::DateTime(n) => n.to_string(),
        Ct::Int(i) => i.to_string(),
        Ct::Bool(b) => b.to_string(),
        Ct::Error(e) => format!("ERR({e:?})"),
    };
    Some(text)
}

/// Unique column names for a header row.
///
/// Blank headers become `Unnamed: <idx>`; a repeated header gets a `.<n>`
/// suffix, the way spreadsheet tooling usually labels them.
pub fn header_names(raw: &[Option<String>]) -> Vec<String> {
    let mut seen = HashSet::with_capacity(raw.len());
    raw.iter()
        .enumerate()
        .map(|(idx, cell)| {
            let base = match cell.as_deref() {
                Some(h) if !h.trim().is_empty() => h.to_string(),
                _ => format!("Unnamed: {idx}"),
            };
            let mut name = base.clone();
            let mut dup = 0;
            while !seen.insert(name.clone()) {
                dup += 1;
                name = format!("{base}.{dup}");
            }
            name
        })
        .collect()
}

fn range_to_frame(range: &Range<Ct>) -> PolarsResult<Option<DataFrame>> {
    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(None);
    };
    let headers = header_names(&header_row.iter().map(cell_text).collect::<Vec<_>>());

    let body: Vec<&[Ct]> = rows.collect();
    let columns: Vec<Column> = headers
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let values: Vec<Option<String>> =
                body.iter().map(|row| row.get(idx).and_then(cell_text)).collect();
            Series::new(PlSmallStr::from(name.as_str()), values).into()
        })
        .collect();
    DataFrame::new(columns).map(Some)
}

/// Reads worksheet `sheet_idx` of any workbook calamine understands.
///
/// Returns `Ok(None)` when the sheet has no header row at all.
pub fn read_excel(path: &Path, sheet_idx: usize) -> PolarsResult<Option<DataFrame>> {
    let mut wb = open_workbook_auto(path).map_err(|e| polars_err(Box::new(e)))?;
    let range = wb
        .worksheet_range_at(sheet_idx)
        .ok_or_else(|| polars_err(format!("worksheet {sheet_idx} missing").into()))?
        .map_err(|e| polars_err(Box::new(e)))?;

    let df = range_to_frame(&range)?;
    if let Some(df) = &df {
        debug!("{} sheet {}: columns {:?}", path.display(), sheet_idx, df.get_column_names());
    }
    Ok(df)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;

    /// Minimal single-sheet xlsx with inline strings; `None` leaves a cell out.
    pub(crate) fn write_xlsx(path: &Path, rows: &[Vec<Option<&str>>]) {
        use ::zip::write::SimpleFileOptions;

        let col_ref = |idx: usize| char::from(b'A' + idx as u8);
        let mut sheet = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
        );
        for (r, row) in rows.iter().enumerate() {
            sheet.push_str(&format!(r#"<row r="{}">"#, r + 1));
            for (c, cell) in row.iter().enumerate() {
                if let Some(text) = cell {
                    sheet.push_str(&format!(
                        r#"<c r="{}{}" t="inlineStr"><is><t>{}</t></is></c>"#,
                        col_ref(c),
                        r + 1,
                        text
                    ));
                }
            }
            sheet.push_str("</row>");
        }
        sheet.push_str("</sheetData></worksheet>");

        let parts = [
            (
                "[Content_Types].xml",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#.to_string(),
            ),
            (
                "_rels/.rels",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#.to_string(),
            ),
            (
                "xl/workbook.xml",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Sheet1" sheetId="1" r:id="rId1"/></sheets></workbook>"#.to_string(),
            ),
            (
                "xl/_rels/workbook.xml.rels",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#.to_string(),
            ),
            ("xl/worksheets/sheet1.xml", sheet),
        ];

        let mut zip = ::zip::ZipWriter::new(std::fs::File::create(path).unwrap());
        let options = SimpleFileOptions::default().compression_method(::zip::CompressionMethod::Stored);
        for (name, body) in parts {
            zip.start_file(name, options).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn cells_render_as_plain_text() {
        assert_eq!(cell_text(&Ct::Float(2.5)).as_deref(), Some("2.5"));
        assert_eq!(cell_text(&Ct::Int(7)).as_deref(), Some("7"));
        assert_eq!(cell_text(&Ct::String("CYP3A4".into())).as_deref(), Some("CYP3A4"));
        assert_eq!(cell_text(&Ct::Empty), None);
    }

    #[test]
    fn blank_and_repeated_headers_get_unique_names() {
        let raw = vec![
            Some("Compound name".to_string()),
            None,
            Some("  ".to_string()),
            Some("Reference".to_string()),
            Some("Reference".to_string()),
            Some("Unnamed: 1".to_string()),
        ];
        assert_eq!(
            header_names(&raw),
            vec!["Compound name", "Unnamed: 1", "Unnamed: 2", "Reference", "Reference.1", "Unnamed: 1.1"]
        );
    }

    #[test]
    fn sheet_with_unlabeled_note_columns_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ddiTable.xlsx");
        write_xlsx(
            &path,
            &[
                vec![Some("Compound name"), Some("Interacting gene name"), Some("Compound Gene Relation")],
                vec![Some("Midazolam"), Some("CYP3A4"), Some("substrate"), None, Some("checked"), Some("2021")],
                vec![Some("Ketoconazole"), Some("CYP3A4"), Some("inhibitor"), None, Some("see PMID")],
            ],
        );

        let df = read_excel(&path, 0).unwrap().unwrap();
        assert_eq!(df.height(), 2);
        let names: Vec<&str> = df.get_column_names().iter().map(|c| c.as_str()).collect();
        assert_eq!(&names[..3], &["Compound name", "Interacting gene name", "Compound Gene Relation"]);
        assert!(names.contains(&"Unnamed: 4"));
        assert!(names.contains(&"Unnamed: 5"));
    }

    #[test]
    fn unreadable_workbook_is_an_error() {
        let mut file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        file.write_all(b"not a zip archive").unwrap();
        assert!(read_excel(file.path(), 0).is_err());
    }
}
