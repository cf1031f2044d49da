use thiserror::Error;

#[derive(Error, Debug)]
pub enum HorizonsError {
    #[error("Horizons request failed: {0}")]
    Rest(#[from] restson::Error),

    #[error("Horizons rejected the query: {0}")]
    Api(String),

    #[error("Horizons response has no result text")]
    EmptyResult,

    #[error("Horizons result has no ephemeris table (missing {0} marker)")]
    MissingTable(&'static str),

    #[error("Horizons ephemeris table has no '{0}' column")]
    MissingColumn(&'static str),

    #[error("Horizons ephemeris row {row} is too short: '{line}'")]
    ShortRow { row: usize, line: String },

    #[error("Couldn't parse Horizons timestamp '{0}'")]
    Timestamp(String),

    #[error("Couldn't parse Horizons airmass '{0}'")]
    Airmass(String),
}
