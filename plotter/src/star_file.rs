//! Airmass tables exported by an airmass planner: a header row, then
//! whitespace-separated rows of `<n> <date> <time> <airmass> ...`.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use log::debug;

use crate::error::PlotterError;
use crate::time::parse_star_time;

const DATE_COLUMN: usize = 1;
const TIME_COLUMN: usize = 2;
const AIRMASS_COLUMN: usize = 3;

pub fn read_star_file(path: &Path) -> Result<Vec<(DateTime<Utc>, f64)>, PlotterError> {
    let contents = fs::read_to_string(path).map_err(|source| PlotterError::StarFileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let points = parse_star_table(path, &contents)?;
    debug!("Read {} airmasses from {}", points.len(), path.display());
    Ok(points)
}

pub fn parse_star_table(
    path: &Path,
    contents: &str,
) -> Result<Vec<(DateTime<Utc>, f64)>, PlotterError> {
    let mut points = vec![];
    // line numbers are 1-based and the header is line 1
    for (line, row) in contents.lines().enumerate().skip(1).map(|(i, r)| (i + 1, r)) {
        let columns: Vec<&str> = row.split_whitespace().collect();
        if columns.is_empty() {
            continue;
        }
        if columns.len() <= AIRMASS_COLUMN {
            return Err(PlotterError::StarFileColumns {
                path: path.to_path_buf(),
                line,
                found: columns.len(),
            });
        }

        let t = parse_star_time(columns[DATE_COLUMN], columns[TIME_COLUMN]).ok_or_else(|| {
            PlotterError::StarFileTimestamp {
                path: path.to_path_buf(),
                line,
                value: format!("{} {}", columns[DATE_COLUMN], columns[TIME_COLUMN]),
            }
        })?;
        let airmass = columns[AIRMASS_COLUMN].parse::<f64>().map_err(|_| {
            PlotterError::StarFileAirmass {
                path: path.to_path_buf(),
                line,
                value: columns[AIRMASS_COLUMN].to_string(),
            }
        })?;

        points.push((t, airmass));
    }

    Ok(points)
}
