//! CSV writing operations.

use std::{fs::File, path::Path};

use polars::{frame::DataFrame, io::SerWriter, prelude::{CsvWriter, NamedFrom}, series::Series};

use crate::{error::Result, join::PointMatch, score::ScoreTable};

/// Write a DataFrame to a CSV file.
pub(crate) fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    CsvWriter::new(file).finish(df)?;
    Ok(())
}

/// Write the score table: `name` then one `gap_Cn` column per category, blanks where undefined.
pub(crate) fn write_scores(table: &ScoreTable, path: &Path) -> Result<()> {
    write_csv(&mut table.to_dataframe()?, path)
}

/// Point-in-polygon results as a table: x, y, then the matched region's attributes.
pub(crate) fn point_matches_frame(matches: &[PointMatch]) -> Result<DataFrame> {
    let xs = matches.iter().map(|m| m.point.x()).collect::<Vec<_>>();
    let ys = matches.iter().map(|m| m.point.y()).collect::<Vec<_>>();
    let names = matches.iter()
        .map(|m| m.region.as_ref().map(|region| region.name.clone()))
        .collect::<Vec<_>>();
    let councils = matches.iter()
        .map(|m| m.region.as_ref().and_then(|region| region.council.clone()))
        .collect::<Vec<_>>();

    Ok(DataFrame::new(vec![
        Series::new("x".into(), xs).into(),
        Series::new("y".into(), ys).into(),
        Series::new("name".into(), names).into(),
        Series::new("council".into(), councils).into(),
    ])?)
}

pub(crate) fn write_point_matches(matches: &[PointMatch], path: &Path) -> Result<()> {
    write_csv(&mut point_matches_frame(matches)?, path)
}
