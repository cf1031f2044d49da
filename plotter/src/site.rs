use serde_derive::Deserialize;

/// A fixed observing location. `code` is the observatory code Horizons knows
/// the site by; the coordinates drive the alt-az transform.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Site {
    pub code: String,
    pub latitude_deg: f64,
    /// East positive.
    pub longitude_deg: f64,
    pub elevation_m: f64,
}

impl Site {
    /// The IRTF on Maunakea.
    pub fn maunakea() -> Self {
        Site {
            code: "568".to_string(),
            latitude_deg: dms(19.0, 49.0, 34.38594),
            longitude_deg: -dms(155.0, 28.0, 19.19564),
            elevation_m: 4168.0,
        }
    }
}

fn dms(degrees: f64, minutes: f64, seconds: f64) -> f64 {
    degrees + minutes / 60.0 + seconds / 3600.0
}
