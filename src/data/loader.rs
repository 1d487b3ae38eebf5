use std::collections::HashMap;

use csv::StringRecord;
use thiserror::Error;

use super::model::{CellValue, Column, ColumnKind, ListingTable};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Field spellings read as missing values.
const NULL_MARKERS: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null", "NULL"];

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no columns to parse from file")]
    Empty,

    #[error("failed to read CSV header")]
    Header(#[source] csv::Error),

    #[error("failed to parse CSV row {row}")]
    Record {
        row: usize,
        #[source]
        source: csv::Error,
    },

    #[error("CSV row {row}: expected {expected} fields, saw {found}")]
    TooManyFields {
        row: usize,
        expected: usize,
        found: usize,
    },
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Parse comma-separated bytes with a header row into a [`ListingTable`].
///
/// * A leading UTF-8 byte-order mark is ignored.
/// * Rows shorter than the header are padded with nulls; longer rows fail.
/// * Each column gets one [`ColumnKind`] inferred from all of its non-null
///   fields, and every cell is converted to that kind.
///
/// The result is a pure function of `bytes`.
pub fn load_csv_bytes(bytes: &[u8]) -> Result<ListingTable, LoadError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let raw_headers = reader.headers().map_err(LoadError::Header)?.clone();
    if raw_headers.is_empty() {
        return Err(LoadError::Empty);
    }
    let names = normalize_headers(&raw_headers);
    let width = names.len();

    let mut raw_rows: Vec<StringRecord> = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let row = i + 1;
        let record = result.map_err(|source| LoadError::Record { row, source })?;
        if record.len() > width {
            return Err(LoadError::TooManyFields {
                row,
                expected: width,
                found: record.len(),
            });
        }
        raw_rows.push(record);
    }

    let kinds: Vec<ColumnKind> = (0..width)
        .map(|col| infer_kind(raw_rows.iter().filter_map(|r| non_null(r.get(col)))))
        .collect();

    let rows = raw_rows
        .iter()
        .map(|record| {
            kinds
                .iter()
                .enumerate()
                .map(|(col, kind)| convert(non_null(record.get(col)), *kind))
                .collect()
        })
        .collect();

    let columns = names
        .into_iter()
        .zip(kinds)
        .map(|(name, kind)| Column { name, kind })
        .collect();

    Ok(ListingTable::new(columns, rows))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Empty names become `Unnamed: {i}`; repeats get `.1`, `.2`, ... suffixes.
fn normalize_headers(raw: &StringRecord) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    raw.iter()
        .enumerate()
        .map(|(i, h)| {
            let base = if h.is_empty() {
                format!("Unnamed: {i}")
            } else {
                h.to_string()
            };
            let n = seen.entry(base.clone()).or_insert(0);
            let name = if *n == 0 {
                base
            } else {
                format!("{base}.{n}")
            };
            *n += 1;
            name
        })
        .collect()
}

fn non_null(field: Option<&str>) -> Option<&str> {
    field.filter(|s| !NULL_MARKERS.contains(s))
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

fn infer_kind<'a>(fields: impl Iterator<Item = &'a str>) -> ColumnKind {
    let mut any = false;
    let mut all_int = true;
    let mut all_num = true;
    let mut all_bool = true;

    for s in fields {
        any = true;
        let s = s.trim();
        let is_int = s.parse::<i64>().is_ok();
        all_int &= is_int;
        all_num &= is_int || s.parse::<f64>().is_ok();
        all_bool &= parse_bool(s).is_some();
        if !all_num && !all_bool {
            return ColumnKind::Text;
        }
    }

    match (any, all_int, all_num, all_bool) {
        (false, ..) => ColumnKind::Float,
        (_, true, ..) => ColumnKind::Integer,
        (_, _, true, _) => ColumnKind::Float,
        (_, _, _, true) => ColumnKind::Bool,
        _ => ColumnKind::Text,
    }
}

fn convert(field: Option<&str>, kind: ColumnKind) -> CellValue {
    let Some(s) = field else {
        return CellValue::Null;
    };
    // Numbers and booleans tolerate surrounding spaces; text keeps them.
    let t = s.trim();
    match kind {
        ColumnKind::Integer => t.parse().map(CellValue::Integer).unwrap_or(CellValue::Null),
        ColumnKind::Float => t
            .parse::<f64>()
            .ok()
            .filter(|v| !v.is_nan())
            .map(CellValue::Float)
            .unwrap_or(CellValue::Null),
        ColumnKind::Bool => parse_bool(t).map(CellValue::Bool).unwrap_or(CellValue::Null),
        ColumnKind::Text => CellValue::Text(s.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUSES: &[u8] = b"city,rooms,rent amount (R$),furniture\n\
SP,2,1000,furnished\n\
SP,3,2000,not furnished\n\
RJ,2,1500,furnished\n";

    #[test]
    fn parses_header_and_rows_with_inferred_kinds() {
        let table = load_csv_bytes(HOUSES).unwrap();
        assert_eq!(table.len(), 3);
        let kinds: Vec<_> = table.columns.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ColumnKind::Text,
                ColumnKind::Integer,
                ColumnKind::Integer,
                ColumnKind::Text
            ]
        );
        assert_eq!(table.cell(2, 0), &CellValue::Text("RJ".into()));
        assert_eq!(table.cell(1, 2), &CellValue::Integer(2000));
    }

    #[test]
    fn same_bytes_give_identical_tables() {
        assert_eq!(load_csv_bytes(HOUSES).unwrap(), load_csv_bytes(HOUSES).unwrap());
    }

    #[test]
    fn mixed_int_and_float_widens_to_float_and_nulls_are_kept() {
        let table = load_csv_bytes(b"city,rent amount (R$)\nSP,1000\nRJ,1500.5\nBH,\nPOA,NaN\n").unwrap();
        assert_eq!(table.columns[1].kind, ColumnKind::Float);
        assert_eq!(table.cell(0, 1), &CellValue::Float(1000.0));
        assert_eq!(table.cell(1, 1), &CellValue::Float(1500.5));
        assert!(table.cell(2, 1).is_null());
        assert!(table.cell(3, 1).is_null());
    }

    #[test]
    fn space_padded_numbers_are_still_numbers() {
        let csv = b"city,rooms,rent amount (R$),animal\nSP, 2, 1000 , True\nSP, 3,2000.5,false\n RJ,2 , 1500,False\n";
        let table = load_csv_bytes(csv).unwrap();
        let kinds: Vec<_> = table.columns.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![ColumnKind::Text, ColumnKind::Integer, ColumnKind::Float, ColumnKind::Bool]
        );
        assert_eq!(table.cell(0, 1), &CellValue::Integer(2));
        assert_eq!(table.cell(0, 2), &CellValue::Float(1000.0));
        assert_eq!(table.cell(0, 3), &CellValue::Bool(true));
        assert_eq!(table.cell(2, 0), &CellValue::Text(" RJ".into()));
    }

    #[test]
    fn numbers_in_a_text_column_stay_text() {
        let table = load_csv_bytes(b"floor\n3\n-\n10\n").unwrap();
        assert_eq!(table.columns[0].kind, ColumnKind::Text);
        assert_eq!(table.cell(0, 0), &CellValue::Text("3".into()));
    }

    #[test]
    fn bool_and_all_null_columns() {
        let table = load_csv_bytes(b"animal,note\nTrue,\nfalse,\n").unwrap();
        assert_eq!(table.columns[0].kind, ColumnKind::Bool);
        assert_eq!(table.cell(1, 0), &CellValue::Bool(false));
        assert_eq!(table.columns[1].kind, ColumnKind::Float);
    }

    #[test]
    fn headers_are_deduplicated_and_unnamed_filled() {
        let table = load_csv_bytes(b",city,city,city\n0,SP,RJ,BH\n").unwrap();
        let names: Vec<_> = table.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Unnamed: 0", "city", "city.1", "city.2"]);
    }

    #[test]
    fn byte_order_mark_is_stripped() {
        let table = load_csv_bytes(b"\xEF\xBB\xBFcity\nSP\n").unwrap();
        assert_eq!(table.column_index("city"), Some(0));
    }

    #[test]
    fn header_only_gives_empty_table() {
        let table = load_csv_bytes(b"city,rooms,rent amount (R$)\n").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.columns.len(), 3);
    }

    #[test]
    fn short_rows_are_padded_with_nulls() {
        let table = load_csv_bytes(b"city,rooms\nSP\n").unwrap();
        assert!(table.cell(0, 1).is_null());
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(load_csv_bytes(b""), Err(LoadError::Empty)));
    }

    #[test]
    fn long_row_is_rejected_with_its_number() {
        let err = load_csv_bytes(b"city,rooms\nSP,2\nRJ,3,extra\n").unwrap_err();
        assert!(matches!(
            err,
            LoadError::TooManyFields { row: 2, expected: 2, found: 3 }
        ));
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let err = load_csv_bytes(b"city\nS\xFF\xFEP\n").unwrap_err();
        assert!(matches!(err, LoadError::Record { row: 1, .. }));
    }
}
