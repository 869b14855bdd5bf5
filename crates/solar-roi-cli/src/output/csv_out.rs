use serde_json::Value;
use std::io;

use super::{result_of, scalar_text};

/// Write output as CSV to stdout.
///
/// A yearly series (bare array or a `yearly` field) is written one row per
/// year; anything else becomes two-column `field,value` rows.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    if let Err(e) = write_csv(stdout.lock(), value) {
        eprintln!("CSV output error: {}", e);
    }
}

fn write_csv<W: io::Write>(out: W, value: &Value) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(out);

    match result_of(value) {
        Value::Array(rows) => write_rows(&mut wtr, rows)?,
        Value::Object(map) => {
            wtr.write_record(["field", "value"])?;
            for (key, val) in map.iter().filter(|(_, v)| !v.is_array()) {
                wtr.write_record([key.as_str(), &scalar_text(val)])?;
            }
        }
        other => wtr.write_record([scalar_text(other)])?,
    }

    wtr.flush()?;
    Ok(())
}

fn write_rows<W: io::Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) -> Result<(), csv::Error> {
    let Some(Value::Object(first)) = rows.first() else {
        for row in rows {
            wtr.write_record([scalar_text(row)])?;
        }
        return Ok(());
    };

    let headers: Vec<&str> = first.keys().map(String::as_str).collect();
    wtr.write_record(&headers)?;
    for row in rows.iter().filter_map(Value::as_object) {
        let record: Vec<String> = headers
            .iter()
            .map(|h| row.get(*h).map(scalar_text).unwrap_or_default())
            .collect();
        wtr.write_record(&record)?;
    }
    Ok(())
}
