use chrono::Duration;
use log::{debug, info, warn};

use crate::chart::Chart;
use crate::ephemeris::EphemerisProvider;
use crate::error::PlotterError;
use crate::series::{AirmassSeries, BodySource};
use crate::settings::Settings;
use crate::sky::reference_star_series;
use crate::star_file::read_star_file;
use crate::time::parse_window_time;
use crate::window::ObservationWindow;

pub fn observation_window(settings: &Settings) -> Result<ObservationWindow, PlotterError> {
    ObservationWindow::new(
        parse_window_time(&settings.window.start)?,
        parse_window_time(&settings.window.stop)?,
        Duration::minutes(i64::from(settings.window.step_minutes)),
    )
}

/// Collects the airmass of every configured body, in configuration order.
/// Bodies are looked up one after the other; the first failure aborts.
pub fn build_chart<P: EphemerisProvider>(
    settings: &Settings,
    provider: &mut P,
) -> Result<Chart, PlotterError> {
    let window = observation_window(settings)?;
    let grid = window.samples();
    let bodies = settings.bodies()?;
    let site = &settings.site;
    info!(
        "Site {}: lat {:.5}, lon {:.5}, {} m",
        site.code, site.latitude_deg, site.longitude_deg, site.elevation_m
    );

    let mut chart = Chart::new(&window)
        .threshold(settings.chart.threshold())
        .y_range(settings.chart.y_min, settings.chart.y_max)
        .size(settings.chart.width, settings.chart.height);

    for body in &bodies {
        let series = match &body.source {
            BodySource::Horizons { .. } => provider.airmass_series(body, site, &window)?,
            BodySource::Fixed { coord } => {
                let first = coord.alt_az(site, window.start());
                debug!(
                    "{} at window start: alt {:.1}, az {:.1}",
                    body.label, first.alt_deg, first.az_deg
                );
                reference_star_series(&body.label, coord, site, &grid, body.style, body.line_width)
            }
            BodySource::File { path } => {
                let points = read_star_file(path)?;
                AirmassSeries::new(&body.label, body.style, body.line_width, points)
            }
        };

        if series.segments().is_empty() {
            warn!("{} is below the horizon for the whole window", body.label);
        }
        info!("{}: {} samples", body.label, series.points.len());
        chart.add_series(series);
    }

    Ok(chart)
}
