use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde_derive::Deserialize;

use crate::sky::SkyCoord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    Solid,
    Dashed,
}

impl Default for LineStyle {
    fn default() -> Self {
        LineStyle::Solid
    }
}

/// Where a body's airmass comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum BodySource {
    /// Looked up by catalog code, e.g. `599` for Jupiter.
    Horizons { id: String },
    /// Fixed sky position; airmass is computed locally.
    Fixed { coord: SkyCoord },
    /// Precomputed airmass table on disk.
    File { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub label: String,
    pub source: BodySource,
    pub style: LineStyle,
    pub line_width: u32,
}

/// One body's airmass over the observing window. NaN marks instants where
/// the airmass is undefined (body below the horizon).
#[derive(Debug, Clone, PartialEq)]
pub struct AirmassSeries {
    pub label: String,
    pub style: LineStyle,
    pub line_width: u32,
    pub points: Vec<(DateTime<Utc>, f64)>,
}

impl AirmassSeries {
    pub fn new(
        label: &str,
        style: LineStyle,
        line_width: u32,
        points: Vec<(DateTime<Utc>, f64)>,
    ) -> Self {
        AirmassSeries {
            label: label.to_string(),
            style,
            line_width,
            points,
        }
    }

    /// Runs of consecutive defined samples.
    pub fn segments(&self) -> Vec<&[(DateTime<Utc>, f64)]> {
        self.points
            .split(|(_, airmass)| !airmass.is_finite())
            .filter(|run| !run.is_empty())
            .collect()
    }
}
