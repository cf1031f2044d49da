use chrono::{DateTime, NaiveDateTime, Utc};

use crate::HorizonsError;

/// Layout of the `Date__(UT)__HR:MN` column, e.g. `2023-Mar-01 21:55`.
pub const HORIZONS_DATETIME_FORMAT: &str = "%Y-%b-%d %H:%M";

const START_OF_EPHEMERIS: &str = "$$SOE";
const END_OF_EPHEMERIS: &str = "$$EOE";
const DATE_COLUMN: &str = "Date__(UT)__HR:MN";
const AIRMASS_COLUMN: &str = "a-mass";

#[derive(Debug, Clone, PartialEq)]
pub struct EphemerisRecord {
    pub datetime_str: String,
    pub datetime: DateTime<Utc>,
    /// `None` while the body is below the horizon.
    pub airmass: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ephemerides(pub Vec<EphemerisRecord>);

impl Ephemerides {
    /// Reads the CSV observer table out of a Horizons result text.
    pub fn parse(result: &str) -> Result<Self, HorizonsError> {
        let lines: Vec<&str> = result.lines().collect();
        let soe = lines
            .iter()
            .position(|l| l.trim() == START_OF_EPHEMERIS)
            .ok_or(HorizonsError::MissingTable(START_OF_EPHEMERIS))?;
        let eoe = lines[soe..]
            .iter()
            .position(|l| l.trim() == END_OF_EPHEMERIS)
            .map(|i| soe + i)
            .ok_or(HorizonsError::MissingTable(END_OF_EPHEMERIS))?;

        // the header is separated from the table by a line of asterisks
        let header = lines[..soe]
            .iter()
            .rev()
            .map(|l| l.trim())
            .find(|l| !l.is_empty() && !l.starts_with('*'))
            .ok_or(HorizonsError::MissingColumn(DATE_COLUMN))?;
        let columns: Vec<&str> = header.split(',').map(str::trim).collect();
        let date_idx = column_index(&columns, DATE_COLUMN)?;
        let airmass_idx = column_index(&columns, AIRMASS_COLUMN)?;

        let mut records = Vec::with_capacity(eoe - soe - 1);
        for (row, line) in lines[soe + 1..eoe].iter().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            if fields.len() <= date_idx.max(airmass_idx) {
                return Err(HorizonsError::ShortRow {
                    row,
                    line: line.to_string(),
                });
            }

            records.push(EphemerisRecord {
                datetime_str: fields[date_idx].to_string(),
                datetime: parse_datetime(fields[date_idx])?,
                airmass: parse_airmass(fields[airmass_idx])?,
            });
        }

        Ok(Ephemerides(records))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EphemerisRecord> {
        self.0.iter()
    }
}

fn column_index(columns: &[&str], name: &'static str) -> Result<usize, HorizonsError> {
    columns
        .iter()
        .position(|c| *c == name)
        .ok_or(HorizonsError::MissingColumn(name))
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, HorizonsError> {
    NaiveDateTime::parse_from_str(s, HORIZONS_DATETIME_FORMAT)
        .map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc))
        .map_err(|_| HorizonsError::Timestamp(s.to_string()))
}

fn parse_airmass(s: &str) -> Result<Option<f64>, HorizonsError> {
    match s {
        "n.a." => Ok(None),
        _ => s
            .parse()
            .map(Some)
            .map_err(|_| HorizonsError::Airmass(s.to_string())),
    }
}
