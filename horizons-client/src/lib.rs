//! Blocking client for the JPL Horizons ephemeris API.

mod client;
mod ephemerides;
mod error;
mod query;

pub use crate::client::{Client, DEFAULT_URL};
pub use crate::ephemerides::{Ephemerides, EphemerisRecord, HORIZONS_DATETIME_FORMAT};
pub use crate::error::HorizonsError;
pub use crate::query::EphemerisQuery;
