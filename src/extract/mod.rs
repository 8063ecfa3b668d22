//! Generic workbook table to record conversion.
//!
//! A [`Record`] is a JSON object mapping normalized column names to raw
//! cell values. The conversion is pure: it never fails on missing tables
//! or odd rows, it only drops rows that are entirely blank.

pub mod columns;
pub mod workbook;

use std::collections::HashSet;

use calamine::{Data, Table};
use serde_json::{Map, Number, Value};

/// One table row: normalized column name -> raw cell value.
pub type Record = Map<String, Value>;

// =============================================================================
// Cell conversion
// =============================================================================

/// Convert a spreadsheet cell to a JSON value.
///
/// Whole floats become integers (the workbook stores every count and code
/// as a float), error cells read as null.
pub fn cell_to_value(cell: &Data) -> Value {
    match cell {
        Data::Empty | Data::Error(_) => Value::Null,
        Data::String(s) => Value::String(s.clone()),
        Data::Int(i) => Value::Number((*i).into()),
        Data::Float(f) => {
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                Value::Number((*f as i64).into())
            } else {
                Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null)
            }
        }
        Data::Bool(b) => Value::Bool(*b),
        Data::DateTime(_) => Value::String(cell.to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::String(s.clone()),
    }
}

/// Stringify a record value the way the exports expect: null reads as the
/// empty string, everything else as its plain text form.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// A value is blank when its text form is empty after trimming.
pub fn is_blank(value: &Value) -> bool {
    value_text(value).trim().is_empty()
}

/// Trimmed, non-blank text of a record field.
pub fn field_text(record: &Record, key: &str) -> Option<String> {
    let value = record.get(key)?;
    let text = value_text(value);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Whether a record's validity-check field carries an affirmative value.
pub fn is_checked(record: &Record, key: &str) -> bool {
    match record.get(key) {
        Some(value) => {
            let text = value_text(value).trim().to_lowercase();
            matches!(text.as_str(), "1" | "true")
        }
        None => false,
    }
}

// =============================================================================
// Rows to records
// =============================================================================

/// Convert a header row plus data rows into records.
///
/// Headers are trimmed (blank headers normalize to an empty-string key).
/// A row where every cell is blank after stringification produces nothing.
/// When `wanted` is given, only those columns are copied.
pub fn rows_to_records<'a, I>(
    headers: &[String],
    rows: I,
    wanted: Option<&HashSet<&str>>,
) -> Vec<Record>
where
    I: IntoIterator<Item = &'a [Data]>,
{
    let headers: Vec<String> = headers.iter().map(|h| h.trim().to_string()).collect();
    let mut out = Vec::new();

    for row in rows {
        let values: Vec<Value> = row.iter().map(cell_to_value).collect();
        if values.iter().all(is_blank) {
            continue;
        }

        let mut record = Record::new();
        for (i, header) in headers.iter().enumerate() {
            if let Some(wanted) = wanted {
                if !wanted.contains(header.as_str()) {
                    continue;
                }
            }
            let value = values.get(i).cloned().unwrap_or(Value::Null);
            record.insert(header.clone(), value);
        }
        out.push(record);
    }

    out
}

/// Convert a named workbook table into records.
pub fn table_records(table: &Table<Data>, wanted: Option<&HashSet<&str>>) -> Vec<Record> {
    let rows: Vec<&[Data]> = table.data().rows().collect();
    rows_to_records(table.columns(), rows, wanted)
}
