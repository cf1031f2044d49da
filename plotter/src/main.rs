use std::path::Path;

use anyhow::{bail, Result};
use clap::Parser;

mod chart;
mod ephemeris;
mod error;
mod logger;
mod pipeline;
mod series;
mod settings;
mod site;
mod sky;
mod star_file;
mod time;
mod window;

use self::ephemeris::HorizonsProvider;
use self::settings::Settings;
use self::time::LocalClock;

/// Plots the airmass of planets and reference stars over an observing night.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None, max_term_width = 100)]
struct Cli {
    /// Sets custom config file
    #[arg(short, long = "config", value_name = "FILE")]
    config: Option<String>,

    /// Sets the Horizons api url
    #[arg(long = "api", value_name = "URL")]
    api_url: Option<String>,

    /// Start of the observing window (UTC, "YYYY-MM-DD HH:MM:SS")
    #[arg(long, value_name = "TIME")]
    start: Option<String>,

    /// End of the observing window (UTC, "YYYY-MM-DD HH:MM:SS")
    #[arg(long, value_name = "TIME")]
    stop: Option<String>,

    /// Samples the window every MINUTES
    #[arg(long, value_name = "MINUTES", value_parser = clap::value_parser!(u32).range(1..))]
    step: Option<u32>,

    /// Writes the chart to this PNG file
    #[arg(short, long, value_name = "FILE")]
    output: Option<String>,

    /// Draws the airmass limit of the observing program at AIRMASS
    #[arg(long, value_name = "AIRMASS", conflicts_with = "no_threshold")]
    threshold: Option<f64>,

    /// Leaves out the airmass limit line
    #[arg(long)]
    no_threshold: bool,

    /// Sets the largest airmass shown
    #[arg(long, value_name = "AIRMASS")]
    y_max: Option<f64>,

    /// Hours the local clock runs behind UTC
    #[arg(long = "utc-offset", value_name = "HOURS", allow_negative_numbers = true)]
    utc_offset: Option<i64>,

    /// Sets the level of log verbosity
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    verbosity: u8,
}

fn main() -> Result<()> {
    run()
}

fn run() -> Result<()> {
    let settings = settings()?;
    log::set_boxed_logger(Box::new(logger::Logger::new()))?;

    let mut provider = HorizonsProvider::new(&settings.api_endpoint)?;
    let chart = pipeline::build_chart(&settings, &mut provider)?;
    log::info!("Plotting {} series", chart.series().len());

    let clock = LocalClock::new(settings.utc_offset_hours);
    let output = Path::new(&settings.chart.output);
    chart.render(&clock, output)?;
    log::info!("Wrote {}", output.display());

    Ok(())
}

/// Generates the internal settings representation for the app. CLI options will
/// override the options loaded from config files.
fn settings() -> Result<Settings> {
    let cli = Cli::parse();

    let mut settings = match cli.config {
        Some(path) => Settings::from_file(&path)?,
        None => Settings::new()?,
    };

    let log_level = std::cmp::max(cli.verbosity as u64, settings.log_level.unwrap_or(0));

    let log_filter = match log_level {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    log::set_max_level(log_filter);

    if let Some(api_endpoint) = cli.api_url {
        settings.api_endpoint = api_endpoint;
    }

    if let Some(start) = cli.start {
        settings.window.start = start;
    }

    if let Some(stop) = cli.stop {
        settings.window.stop = stop;
    }

    if let Some(step) = cli.step {
        settings.window.step_minutes = step;
    }

    if let Some(output) = cli.output {
        settings.chart.output = output;
    }

    if let Some(threshold) = cli.threshold {
        settings.chart.threshold = threshold;
        settings.chart.draw_threshold = true;
    }

    if cli.no_threshold {
        settings.chart.draw_threshold = false;
    }

    if let Some(y_max) = cli.y_max {
        settings.chart.y_max = y_max;
    }

    if let Some(offset) = cli.utc_offset {
        settings.utc_offset_hours = offset;
    }

    if settings.bodies.is_empty() {
        bail!("no bodies to plot");
    }

    if settings.window.step_minutes == 0 {
        bail!("the sampling step must be at least one minute");
    }

    if settings.chart.y_min >= settings.chart.y_max {
        bail!(
            "invalid airmass range: {} >= {}",
            settings.chart.y_min,
            settings.chart.y_max
        );
    }

    if settings.chart.width == 0 || settings.chart.height == 0 {
        bail!(
            "invalid chart size: {}x{}",
            settings.chart.width,
            settings.chart.height
        );
    }

    Ok(settings)
}
