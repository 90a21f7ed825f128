//! Delimited-Text Boundary
//!
//! Reads a headed CSV into a [`Table`] and writes released tables back out.
//! Cell typing on read:
//! - empty or a recognised missing marker → [`Value::Null`]
//! - identifier columns (see [`ColumnClassifier::mask_format`]) → [`Value::Text`],
//!   verbatim, so leading zeros, `+` prefixes and long digit runs survive
//! - parses as `f64` → [`Value::Number`]
//! - anything else → [`Value::Text`]

use crate::classifier::ColumnClassifier;
use crate::table::{Column, Table, Value};
use crate::taxonomy::Category;
use crate::ReleaseError;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Cell contents read as missing values
pub const MISSING_MARKERS: &[&str] = &["NA", "N/A", "NaN", "nan", "null", "NULL", "None"];

fn is_missing(trimmed: &str) -> bool {
    trimmed.is_empty() || MISSING_MARKERS.contains(&trimmed)
}

/// Type a raw cell
pub fn parse_cell(raw: &str) -> Value {
    let trimmed = raw.trim();
    if is_missing(trimmed) {
        return Value::Null;
    }
    match trimmed.parse::<f64>() {
        Ok(n) => Value::Number(n),
        Err(_) => Value::Text(raw.to_string()),
    }
}

/// Type a raw identifier cell: never numeric
pub fn parse_identifier_cell(raw: &str) -> Value {
    if is_missing(raw.trim()) {
        return Value::Null;
    }
    Value::Text(raw.to_string())
}

/// Read a headed CSV into a table
pub fn read_table<R: Read>(reader: R) -> Result<Table, ReleaseError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
    let parsers: Vec<fn(&str) -> Value> = headers
        .iter()
        .map(|name| match ColumnClassifier::mask_format(name) {
            Some(_) => parse_identifier_cell as fn(&str) -> Value,
            None => parse_cell,
        })
        .collect();
    let mut cells: Vec<Vec<Value>> = vec![Vec::new(); headers.len()];

    for record in csv_reader.records() {
        let record = record?;
        for ((column, parse), raw) in cells.iter_mut().zip(&parsers).zip(record.iter()) {
            column.push(parse(raw));
        }
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, values)| Column::new(name, values))
        .collect();

    let table = Table::new(columns)?;
    tracing::debug!(
        rows = table.row_count(),
        columns = table.column_count(),
        "table read"
    );
    Ok(table)
}

/// Read a table from a CSV file
pub fn read_table_from_path(path: impl AsRef<Path>) -> Result<Table, ReleaseError> {
    read_table(File::open(path)?)
}

/// Write a table as headed CSV; nulls become empty cells
pub fn write_table<W: Write>(table: &Table, writer: W) -> Result<(), ReleaseError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(table.column_names())?;
    for row in table.rows() {
        csv_writer.write_record(row.iter().map(|cell| cell.to_string()))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write a released table into `dir` under the category's output file name
pub fn write_release(
    dir: impl AsRef<Path>,
    category: Category,
    table: &Table,
) -> Result<PathBuf, ReleaseError> {
    let path = dir.as_ref().join(category.output_file_name());
    let file = File::create(&path)?;
    write_table(table, file)?;

    tracing::info!(category = %category, path = %path.display(), "release written");
    Ok(path)
}
