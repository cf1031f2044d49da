//! Equatorial to horizontal coordinates for fixed-position reference stars.

use std::f64::consts::TAU;

use chrono::{DateTime, Datelike, Timelike, Utc};
use hifitime::{Duration, Epoch, Unit};
use marlu::{precession::precess_time, RADec};

use crate::error::PlotterError;
use crate::series::{AirmassSeries, LineStyle};
use crate::site::Site;

/// ICRS (J2000) right ascension and declination, both in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyCoord {
    pub ra_deg: f64,
    pub dec_deg: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AltAz {
    pub alt_deg: f64,
    pub az_deg: f64,
}

impl SkyCoord {
    /// Accepts `02h15m28.3s`/`-09d27m56s`, `02:15:28.3`/`-09:27:56` or plain
    /// degrees.
    pub fn parse(ra: &str, dec: &str) -> Result<Self, PlotterError> {
        let ra_deg = if is_sexagesimal(ra) {
            parse_sexagesimal(ra).map(|hours| hours * 15.0)
        } else {
            ra.trim().parse().ok()
        }
        .filter(|ra| (0.0..360.0).contains(ra))
        .ok_or_else(|| PlotterError::Coordinate(ra.to_string()))?;

        let dec_deg = if is_sexagesimal(dec) {
            parse_sexagesimal(dec)
        } else {
            dec.trim().parse().ok()
        }
        .filter(|dec| (-90.0..=90.0).contains(dec))
        .ok_or_else(|| PlotterError::Coordinate(dec.to_string()))?;

        Ok(SkyCoord { ra_deg, dec_deg })
    }

    pub fn to_radec(&self) -> RADec {
        RADec::new_degrees(self.ra_deg, self.dec_deg)
    }

    /// Horizon coordinates at `site` and `t`. The site is precessed back to
    /// J2000 (precession, nutation and aberration), which puts the star where
    /// it stands on the date of observation.
    pub fn alt_az(&self, site: &Site, t: DateTime<Utc>) -> AltAz {
        let radec = self.to_radec();
        let info = precess_time(
            site.longitude_deg.to_radians(),
            site.latitude_deg.to_radians(),
            radec,
            epoch(t),
            Duration::from_f64(0.0, Unit::Second),
        );
        let azel = radec
            .to_hadec(info.lmst_j2000)
            .to_azel(info.array_latitude_j2000);

        AltAz {
            alt_deg: azel.el.to_degrees(),
            az_deg: azel.az.rem_euclid(TAU).to_degrees(),
        }
    }
}

impl AltAz {
    pub fn zenith_angle_deg(&self) -> f64 {
        90.0 - self.alt_deg
    }

    /// Secant of the zenith angle. NaN once the body has set.
    pub fn airmass(&self) -> f64 {
        if self.alt_deg <= 0.0 {
            return f64::NAN;
        }
        1.0 / self.zenith_angle_deg().to_radians().cos()
    }
}

/// UTC instant as a hifitime epoch.
pub fn epoch(t: DateTime<Utc>) -> Epoch {
    Epoch::from_gregorian_utc(
        t.year(),
        t.month() as u8,
        t.day() as u8,
        t.hour() as u8,
        t.minute() as u8,
        t.second() as u8,
        t.nanosecond(),
    )
}

/// Airmass of a fixed star at every instant of `grid`.
pub fn reference_star_series(
    label: &str,
    coord: &SkyCoord,
    site: &Site,
    grid: &[DateTime<Utc>],
    style: LineStyle,
    line_width: u32,
) -> AirmassSeries {
    let points = grid
        .iter()
        .map(|&t| (t, coord.alt_az(site, t).airmass()))
        .collect();
    AirmassSeries::new(label, style, line_width, points)
}

fn is_sexagesimal(s: &str) -> bool {
    s.trim()
        .contains(|c: char| matches!(c, 'h' | 'd' | 'm' | 's' | ':' | ' '))
}

fn parse_sexagesimal(s: &str) -> Option<f64> {
    let s = s.trim();
    let negative = s.starts_with('-');
    let parts = s
        .trim_start_matches(|c: char| c == '+' || c == '-')
        .split(|c: char| matches!(c, 'h' | 'd' | 'm' | 's' | ':' | ' '))
        .filter(|p| !p.is_empty())
        .map(str::parse::<f64>)
        .collect::<Result<Vec<_>, _>>()
        .ok()?;
    if parts.is_empty() || parts.len() > 3 {
        return None;
    }

    let value = parts.iter().rev().fold(0.0, |acc, p| p + acc / 60.0);
    Some(if negative { -value } else { value })
}
