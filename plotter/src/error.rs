use std::path::PathBuf;

use horizons_client::HorizonsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlotterError {
    #[error("Invalid timestamp '{0}', expected the layout {1}")]
    Timestamp(String, &'static str),

    #[error("Observation window start {start} is not before its stop {stop}")]
    EmptyWindow { start: String, stop: String },

    #[error("Observation window step must be a positive number of minutes")]
    ZeroStep,

    #[error("Invalid sky coordinate '{0}'")]
    Coordinate(String),

    #[error("Body '{label}': {reason}")]
    InvalidBody { label: String, reason: &'static str },

    #[error("Couldn't read star file '{path}': {source}")]
    StarFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{path}:{line}: expected at least 4 columns, found {found}")]
    StarFileColumns {
        path: PathBuf,
        line: usize,
        found: usize,
    },

    #[error("{path}:{line}: invalid airmass '{value}'")]
    StarFileAirmass {
        path: PathBuf,
        line: usize,
        value: String,
    },

    #[error("{path}:{line}: invalid timestamp '{value}'")]
    StarFileTimestamp {
        path: PathBuf,
        line: usize,
        value: String,
    },

    #[error("Couldn't set up the Horizons client for '{url}': {source}")]
    Client { url: String, source: HorizonsError },

    #[error("Ephemeris lookup for '{id}' failed: {source}")]
    Ephemeris { id: String, source: HorizonsError },

    #[error("Error from the plotters library: {0}")]
    Draw(String),
}
