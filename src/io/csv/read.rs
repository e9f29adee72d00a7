//! CSV reading operations.

use std::{fs::File, path::Path};

use polars::{frame::DataFrame, io::SerReader, prelude::CsvReadOptions};
use tracing::{debug, warn};

use crate::{
    config::StatisticsConfig,
    error::{Error, Result},
    types::{Category, ClassificationCount, Gender},
};

/// Header row, every column read as a string.
fn read_options(separator: u8) -> CsvReadOptions {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .map_parse_options(|po| po.with_separator(separator))
}

/// Reads a delimited file from `path` into a DataFrame of string columns.
pub(crate) fn read_csv(path: &Path, separator: u8) -> Result<DataFrame> {
    let file = File::open(path)
        .map_err(|e| Error::unavailable(path, e))?;
    read_options(separator)
        .into_reader_with_file_handle(file)
        .finish()
        .map_err(|e| Error::unavailable(path, e))
}

/// Read the statistics file at `path` into long-form counts.
pub(crate) fn read_counts(path: &Path, layout: &StatisticsConfig) -> Result<Vec<ClassificationCount>> {
    let df = read_csv(path, layout.delimiter as u8)?;
    counts_from_frame(&df, layout).map_err(|reason| Error::unavailable(path, reason))
}

/// One string column as a vector of optional cells.
fn string_column<'a>(df: &'a DataFrame, name: &str) -> std::result::Result<Vec<Option<&'a str>>, String> {
    let column = df.column(name)
        .map_err(|_| format!("missing column {name:?}"))?;
    let values = column.str()
        .map_err(|e| format!("column {name:?} is not text: {e}"))?;
    Ok(values.into_iter().collect())
}

/// Parse a count cell. `-` is the census convention for zero; a blank cell is missing.
fn parse_count(cell: Option<&str>) -> std::result::Result<Option<u64>, String> {
    let Some(cell) = cell.map(str::trim).filter(|cell| !cell.is_empty()) else { return Ok(None) };
    if cell == "-" { return Ok(Some(0)) }
    cell.replace(',', "").parse::<u64>()
        .map(Some)
        .map_err(|_| format!("count {cell:?} is not a non-negative integer"))
}

/// Turn the wide statistics frame (one row per region and gender) into long-form counts.
pub(crate) fn counts_from_frame(df: &DataFrame, layout: &StatisticsConfig) -> std::result::Result<Vec<ClassificationCount>, String> {
    if layout.category_columns.len() != Category::ALL.len() {
        return Err(format!(
            "expected {} category columns, got {}", Category::ALL.len(), layout.category_columns.len()
        ))
    }
    let names = string_column(df, &layout.name_column)?;
    let genders = string_column(df, &layout.gender_column)?;
    let categories = Category::ALL.iter()
        .zip(&layout.category_columns)
        .map(|(&category, header)| Ok((category, string_column(df, header)?)))
        .collect::<std::result::Result<Vec<_>, String>>()?;

    let mut rows = Vec::with_capacity(df.height() * categories.len());
    let mut skipped = 0;

    for (row, (name, gender)) in names.iter().zip(&genders).enumerate() {
        let Some(name) = name.map(str::trim).filter(|name| !name.is_empty()) else {
            skipped += 1;
            continue;
        };
        let Some(gender) = gender.and_then(Gender::parse) else {
            warn!(row, region = name, gender = ?gender, "unrecognised gender label; skipping row");
            skipped += 1;
            continue;
        };

        for (category, cells) in &categories {
            let count = parse_count(cells[row])
                .map_err(|reason| format!("row {row} ({name}), {category}: {reason}"))?;
            if let Some(count) = count {
                rows.push(ClassificationCount { region: name.to_string(), category: *category, gender, count });
            }
        }
    }

    debug!(rows = df.height(), counts = rows.len(), skipped, "read statistics table");
    Ok(rows)
}
