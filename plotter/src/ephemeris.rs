use horizons_client::{Client, EphemerisQuery};
use log::{debug, info};

use crate::error::PlotterError;
use crate::series::{AirmassSeries, Body, BodySource};
use crate::site::Site;
use crate::window::ObservationWindow;

/// Source of airmass tables for bodies known by catalog code.
pub trait EphemerisProvider {
    /// Airmass of `body` seen from `site` at each step of `window`. Any
    /// failure is fatal to the run.
    fn airmass_series(
        &mut self,
        body: &Body,
        site: &Site,
        window: &ObservationWindow,
    ) -> Result<AirmassSeries, PlotterError>;
}

/// Catalog code of a body looked up remotely.
pub fn horizons_id(body: &Body) -> Result<&str, PlotterError> {
    match &body.source {
        BodySource::Horizons { id } => Ok(id),
        _ => Err(PlotterError::InvalidBody {
            label: body.label.clone(),
            reason: "has no horizons_id",
        }),
    }
}

pub struct HorizonsProvider {
    client: Client,
}

impl HorizonsProvider {
    pub fn new(url: &str) -> Result<Self, PlotterError> {
        let client = Client::new(url).map_err(|source| PlotterError::Client {
            url: url.to_string(),
            source,
        })?;
        Ok(HorizonsProvider { client })
    }
}

impl EphemerisProvider for HorizonsProvider {
    fn airmass_series(
        &mut self,
        body: &Body,
        site: &Site,
        window: &ObservationWindow,
    ) -> Result<AirmassSeries, PlotterError> {
        let id = horizons_id(body)?;
        let query = EphemerisQuery::new(id)
            .center(&site.code)
            .start(window.start())
            .stop(window.stop())
            .step(window.step_minutes());

        info!("Querying Horizons for {} ({}) at site {}", body.label, id, site.code);
        let eph = self
            .client
            .ephemerides(&query)
            .map_err(|source| PlotterError::Ephemeris {
                id: id.to_string(),
                source,
            })?;
        debug!("Horizons returned {} records for {}", eph.len(), id);

        let points = eph
            .iter()
            .map(|r| (r.datetime, r.airmass.unwrap_or(f64::NAN)))
            .collect();
        Ok(AirmassSeries::new(&body.label, body.style, body.line_width, points))
    }
}
