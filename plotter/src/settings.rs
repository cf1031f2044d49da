use std::path::PathBuf;

use config::{Config, ConfigError, File};
use directories::ProjectDirs;
use serde_derive::Deserialize;

use crate::error::PlotterError;
use crate::series::{Body, BodySource, LineStyle};
use crate::site::Site;
use crate::sky::SkyCoord;

/// One entry of the `bodies` list. Exactly one of `horizons_id`,
/// `ra`/`dec` or `file` says where the airmass comes from.
#[derive(Debug, Clone, Deserialize)]
pub struct BodyConfig {
    pub label: String,
    pub horizons_id: Option<String>,
    pub ra: Option<String>,
    pub dec: Option<String>,
    pub file: Option<String>,
    #[serde(default)]
    pub style: LineStyle,
    pub line_width: Option<u32>,
}

impl BodyConfig {
    pub fn horizons(id: &str, label: &str) -> Self {
        BodyConfig {
            label: label.to_string(),
            horizons_id: Some(id.to_string()),
            ra: None,
            dec: None,
            file: None,
            style: LineStyle::Solid,
            line_width: None,
        }
    }

    pub fn to_body(&self) -> Result<Body, PlotterError> {
        let invalid = |reason| PlotterError::InvalidBody {
            label: self.label.clone(),
            reason,
        };

        let source = match (&self.horizons_id, &self.ra, &self.dec, &self.file) {
            (Some(id), None, None, None) => BodySource::Horizons { id: id.clone() },
            (None, Some(ra), Some(dec), None) => BodySource::Fixed {
                coord: SkyCoord::parse(ra, dec)?,
            },
            (None, None, None, Some(path)) => BodySource::File {
                path: PathBuf::from(path),
            },
            (None, None, None, None) => return Err(invalid("no horizons_id, ra/dec or file given")),
            (None, Some(_), None, None) | (None, None, Some(_), None) => {
                return Err(invalid("ra and dec must be given together"))
            }
            _ => return Err(invalid("only one of horizons_id, ra/dec or file may be given")),
        };

        let line_width = self.line_width.unwrap_or(1);
        if line_width == 0 {
            return Err(invalid("line_width must be at least 1"));
        }

        Ok(Body {
            label: self.label.clone(),
            source,
            style: self.style,
            line_width,
        })
    }
}

fn default_bodies() -> Vec<BodyConfig> {
    let mut jupiter = BodyConfig::horizons("599", "Jupiter");
    jupiter.line_width = Some(2);
    vec![
        jupiter,
        BodyConfig::horizons("699", "Saturn"),
        BodyConfig::horizons("799", "Uranus"),
        BodyConfig::horizons("899", "Neptune"),
    ]
}

#[derive(Debug, Deserialize)]
pub struct WindowConfig {
    /// UTC, `%Y-%m-%d %H:%M:%S`
    pub start: String,
    pub stop: String,
    pub step_minutes: u32,
}

#[derive(Debug, Deserialize)]
pub struct ChartConfig {
    pub output: String,
    pub draw_threshold: bool,
    pub threshold: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub width: u32,
    pub height: u32,
}

impl ChartConfig {
    pub fn threshold(&self) -> Option<f64> {
        if self.draw_threshold {
            Some(self.threshold)
        } else {
            None
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub log_level: Option<u64>,
    pub api_endpoint: String,
    pub utc_offset_hours: i64,
    pub site: Site,
    pub window: WindowConfig,
    pub chart: ChartConfig,
    #[serde(default = "default_bodies")]
    pub bodies: Vec<BodyConfig>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let mut settings = defaults()?;

        if let Some(project_dirs) = ProjectDirs::from("", "", "airmass-plotter") {
            let file = File::with_name(
                project_dirs
                    .config_dir()
                    .join("config.toml")
                    .to_str()
                    .ok_or(ConfigError::Message("Invalid project dir".to_string()))?,
            );
            settings.merge(file.required(false))?;
        }

        settings.try_into()
    }

    pub fn from_file(file: &str) -> Result<Self, ConfigError> {
        let mut settings = defaults()?;

        settings.merge(File::with_name(file))?;
        settings.try_into()
    }

    pub fn bodies(&self) -> Result<Vec<Body>, PlotterError> {
        self.bodies.iter().map(BodyConfig::to_body).collect()
    }
}

fn defaults() -> Result<Config, ConfigError> {
    let site = Site::maunakea();

    let mut settings = Config::new();
    settings.set_default("log_level", 0)?;
    settings.set_default("api_endpoint", horizons_client::DEFAULT_URL)?;
    settings.set_default("utc_offset_hours", 10)?;
    settings.set_default("site.code", site.code)?;
    settings.set_default("site.latitude_deg", site.latitude_deg)?;
    settings.set_default("site.longitude_deg", site.longitude_deg)?;
    settings.set_default("site.elevation_m", site.elevation_m)?;
    settings.set_default("window.start", "2023-03-01 21:55:00")?;
    settings.set_default("window.stop", "2023-03-02 04:25:00")?;
    settings.set_default("window.step_minutes", 10)?;
    settings.set_default("chart.output", "./airmass_plot.png")?;
    settings.set_default("chart.draw_threshold", true)?;
    settings.set_default("chart.threshold", 1.5)?;
    settings.set_default("chart.y_min", 0.9)?;
    settings.set_default("chart.y_max", 2.0)?;
    settings.set_default("chart.width", 700)?;
    settings.set_default("chart.height", 500)?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn body_sources() {
        let planet = BodyConfig::horizons("699", "Saturn").to_body().unwrap();
        assert_eq!(planet.source, BodySource::Horizons { id: "699".to_string() });
        assert_eq!(planet.line_width, 1);

        let mut star = BodyConfig::horizons("x", "HD 12846 (G2V)");
        star.horizons_id = None;
        star.ra = Some("02h06m30.2s".to_string());
        star.dec = Some("+24d20m02.4s".to_string());
        star.style = LineStyle::Dashed;
        let body = star.to_body().unwrap();
        assert!(matches!(body.source, BodySource::Fixed { .. }));
        assert_eq!(body.style, LineStyle::Dashed);

        star.dec = None;
        assert!(matches!(star.to_body(), Err(PlotterError::InvalidBody { .. })));

        star.ra = None;
        assert!(matches!(star.to_body(), Err(PlotterError::InvalidBody { .. })));

        star.file = Some("HD219833".to_string());
        star.horizons_id = Some("599".to_string());
        assert!(matches!(star.to_body(), Err(PlotterError::InvalidBody { .. })));
    }

    #[test]
    fn defaults_are_the_march_run() {
        let settings: Settings = defaults().unwrap().try_into().unwrap();
        assert_eq!(settings.utc_offset_hours, 10);
        assert_eq!(settings.site, Site::maunakea());
        assert_eq!(settings.window.step_minutes, 10);
        assert_eq!(settings.chart.threshold(), Some(1.5));
        assert_eq!((settings.chart.width, settings.chart.height), (700, 500));

        let labels: Vec<_> = settings.bodies.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["Jupiter", "Saturn", "Uranus", "Neptune"]);
        assert_eq!(settings.bodies[0].line_width, Some(2));
    }

    #[test]
    fn config_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(
            file,
            r#"
log_level = 2

[window]
start = "2023-10-14 10:00:00"
stop = "2023-10-14 16:00:00"

[chart]
y_max = 3.0
draw_threshold = false

[[bodies]]
label = "Jupiter"
horizons_id = "599"

[[bodies]]
label = "HD 13936 (A0V)"
ra = "02h15m28.3s"
dec = "-09d27m56s"
style = "dashed"
"#
        )
        .unwrap();

        let settings = Settings::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(settings.log_level, Some(2));
        assert_eq!(settings.window.start, "2023-10-14 10:00:00");
        assert_eq!(settings.window.step_minutes, 10);
        assert_eq!(settings.chart.y_max, 3.0);
        assert_eq!(settings.chart.threshold(), None);

        let bodies = settings.bodies().unwrap();
        assert_eq!(bodies.len(), 2);
        assert_eq!(bodies[1].style, LineStyle::Dashed);
        assert!(matches!(bodies[1].source, BodySource::Fixed { .. }));
    }
}
