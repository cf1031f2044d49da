//! Airmass chart: series are collected into a [`Chart`], laid out against the
//! local clock, and only drawn once at the end.

use std::mem;
use std::path::Path;

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;

use crate::error::PlotterError;
use crate::series::{AirmassSeries, LineStyle};
use crate::time::LocalClock;
use crate::window::ObservationWindow;

pub const X_LABEL: &str = "Date, hour (local)";
pub const Y_LABEL: &str = "Airmass";

const DEFAULT_THRESHOLD: f64 = 1.5;
const DEFAULT_Y_RANGE: (f64, f64) = (0.9, 2.0);
/// 7x5 inches at 100 dpi.
const DEFAULT_SIZE: (u32, u32) = (700, 500);
/// Dash length and gap, in pixels.
const DASH: (u32, u32) = (6, 4);

const PALETTE: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

/// Horizontal limit marking the worst acceptable airmass.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdLine {
    pub airmass: f64,
    pub from: NaiveDateTime,
    pub to: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedSeries {
    pub label: String,
    pub style: LineStyle,
    pub line_width: u32,
    /// Index into the colour cycle.
    pub colour: usize,
    pub segments: Vec<Vec<(NaiveDateTime, f64)>>,
}

/// Everything needed to draw the chart. Two charts built from the same input
/// produce equal layouts.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x_range: (NaiveDateTime, NaiveDateTime),
    /// Airmass at the top edge; the axis is inverted so this is the smaller one.
    pub y_top: f64,
    pub y_bottom: f64,
    pub threshold: Option<ThresholdLine>,
    pub series: Vec<PlacedSeries>,
    pub size: (u32, u32),
}

impl ChartLayout {
    pub fn legend(&self) -> Vec<&str> {
        self.series.iter().map(|s| s.label.as_str()).collect()
    }
}

pub struct Chart {
    title: String,
    start: DateTime<Utc>,
    stop: DateTime<Utc>,
    threshold: Option<f64>,
    y_range: (f64, f64),
    size: (u32, u32),
    series: Vec<AirmassSeries>,
}

impl Chart {
    /// An empty chart spanning `window`, titled with its UTC start date.
    pub fn new(window: &ObservationWindow) -> Self {
        Chart {
            title: window.start().date_naive().to_string(),
            start: window.start(),
            stop: window.stop(),
            threshold: Some(DEFAULT_THRESHOLD),
            y_range: DEFAULT_Y_RANGE,
            size: DEFAULT_SIZE,
            series: vec![],
        }
    }

    pub fn threshold(mut self, threshold: Option<f64>) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn y_range(mut self, y_min: f64, y_max: f64) -> Self {
        self.y_range = (y_min, y_max);
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    pub fn add_series(&mut self, series: AirmassSeries) {
        self.series.push(series);
    }

    pub fn series(&self) -> &[AirmassSeries] {
        &self.series
    }

    pub fn layout(&self, clock: &LocalClock) -> ChartLayout {
        let x_range = (clock.to_local(self.start), clock.to_local(self.stop));
        let series = self
            .series
            .iter()
            .enumerate()
            .map(|(colour, s)| PlacedSeries {
                label: s.label.clone(),
                style: s.style,
                line_width: s.line_width,
                colour,
                segments: s
                    .segments()
                    .iter()
                    .map(|run| run.iter().map(|(t, a)| (clock.to_local(*t), *a)).collect())
                    .collect(),
            })
            .collect();

        ChartLayout {
            title: self.title.clone(),
            x_label: X_LABEL.to_string(),
            y_label: Y_LABEL.to_string(),
            x_range,
            y_top: self.y_range.0,
            y_bottom: self.y_range.1,
            threshold: self.threshold.map(|airmass| ThresholdLine {
                airmass,
                from: x_range.0,
                to: x_range.1,
            }),
            series,
            size: self.size,
        }
    }

    /// Draws the chart to a PNG at `path`.
    pub fn render(&self, clock: &LocalClock, path: &Path) -> Result<(), PlotterError> {
        let layout = self.layout(clock);
        log::debug!("Drawing {:?} to {}", layout.legend(), path.display());
        let root = BitMapBackend::new(path, layout.size).into_drawing_area();
        draw(&layout, &root)
    }
}

fn plotters_error<E: std::fmt::Display>(e: E) -> PlotterError {
    PlotterError::Draw(e.to_string())
}

fn hours_since(origin: NaiveDateTime, t: NaiveDateTime) -> f64 {
    (t - origin).num_seconds() as f64 / 3600.0
}

/// Plots airmass negated so that the y axis reads downwards.
fn draw<DB: DrawingBackend>(
    layout: &ChartLayout,
    root: &DrawingArea<DB, Shift>,
) -> Result<(), PlotterError> {
    root.fill(&WHITE).map_err(plotters_error)?;

    let origin = layout.x_range.0;
    let x_end = hours_since(origin, layout.x_range.1);
    let x_bounds = (0.0, x_end);
    let y_bounds = (-layout.y_bottom, -layout.y_top);

    let mut cc = ChartBuilder::on(root)
        .caption(&layout.title, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_bounds.0..x_bounds.1, y_bounds.0..y_bounds.1)
        .map_err(plotters_error)?;

    let x_formatter = |x: &f64| {
        (origin + Duration::seconds((x * 3600.0).round() as i64))
            .format("%m-%d %H:%M")
            .to_string()
    };
    let y_formatter = |y: &f64| format!("{:.1}", -y);
    cc.configure_mesh()
        .x_desc(layout.x_label.as_str())
        .y_desc(layout.y_label.as_str())
        .x_labels(7)
        .x_label_formatter(&x_formatter)
        .y_label_formatter(&y_formatter)
        .light_line_style(&WHITE)
        .draw()
        .map_err(plotters_error)?;

    for placed in &layout.series {
        let colour = PALETTE[placed.colour % PALETTE.len()];
        let style = ShapeStyle::from(&colour).stroke_width(placed.line_width);

        // empty series carrying the legend entry, so a body that never rises
        // is still listed
        cc.draw_series(LineSeries::new(Vec::<(f64, f64)>::new(), style))
            .map_err(plotters_error)?
            .label(placed.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));

        for segment in &placed.segments {
            let points: Vec<(f64, f64)> = segment
                .iter()
                .map(|(t, airmass)| (hours_since(origin, *t), -airmass))
                .collect();
            for visible in clip_polyline(&points, x_bounds, y_bounds) {
                match placed.style {
                    LineStyle::Solid => cc.draw_series(LineSeries::new(visible, style)),
                    LineStyle::Dashed => {
                        cc.draw_series(DashedLineSeries::new(visible, DASH.0, DASH.1, style))
                    }
                }
                .map_err(plotters_error)?;
            }
        }
    }

    if let Some(threshold) = &layout.threshold {
        // next colour in the cycle after the series
        let colour = PALETTE[layout.series.len() % PALETTE.len()];
        let style = ShapeStyle::from(&colour);
        let line = [
            (hours_since(origin, threshold.from), -threshold.airmass),
            (hours_since(origin, threshold.to), -threshold.airmass),
        ];
        for visible in clip_polyline(&line, x_bounds, y_bounds) {
            cc.draw_series(DashedLineSeries::new(visible, DASH.0, DASH.1, style))
                .map_err(plotters_error)?;
        }
    }

    cc.configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(plotters_error)?;

    root.present().map_err(plotters_error)?;
    Ok(())
}

/// Cuts a polyline down to the parts inside the `x` by `y` box.
fn clip_polyline(points: &[(f64, f64)], x: (f64, f64), y: (f64, f64)) -> Vec<Vec<(f64, f64)>> {
    let mut pieces = vec![];
    let mut current: Vec<(f64, f64)> = vec![];
    for pair in points.windows(2) {
        match clip_segment(pair[0], pair[1], x, y) {
            Some((a, b)) => {
                if current.last() != Some(&a) {
                    if current.len() > 1 {
                        pieces.push(mem::take(&mut current));
                    }
                    current = vec![a];
                }
                current.push(b);
            }
            None => {
                if current.len() > 1 {
                    pieces.push(mem::take(&mut current));
                }
                current.clear();
            }
        }
    }
    if current.len() > 1 {
        pieces.push(current);
    }
    pieces
}

/// Liang-Barsky. Unclipped ends are returned unchanged.
fn clip_segment(
    p0: (f64, f64),
    p1: (f64, f64),
    (x_min, x_max): (f64, f64),
    (y_min, y_max): (f64, f64),
) -> Option<((f64, f64), (f64, f64))> {
    let (dx, dy) = (p1.0 - p0.0, p1.1 - p0.1);
    let mut t0: f64 = 0.0;
    let mut t1: f64 = 1.0;
    for (p, q) in [
        (-dx, p0.0 - x_min),
        (dx, x_max - p0.0),
        (-dy, p0.1 - y_min),
        (dy, y_max - p0.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
        }
    }
    if t0 >= t1 {
        return None;
    }

    let at = |t: f64| (p0.0 + t * dx, p0.1 + t * dy);
    let a = if t0 == 0.0 { p0 } else { at(t0) };
    let b = if t1 == 1.0 { p1 } else { at(t1) };
    Some((a, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::TimeZone;

    fn night() -> ObservationWindow {
        ObservationWindow::new(
            Utc.with_ymd_and_hms(2023, 3, 1, 21, 55, 0).unwrap(),
            Utc.with_ymd_and_hms(2023, 3, 2, 4, 25, 0).unwrap(),
            Duration::minutes(10),
        )
        .unwrap()
    }

    fn curve(label: &str, window: &ObservationWindow, f: impl Fn(usize) -> f64) -> AirmassSeries {
        let points = window
            .samples()
            .into_iter()
            .enumerate()
            .map(|(i, t)| (t, f(i)))
            .collect();
        AirmassSeries::new(label, LineStyle::Solid, 1, points)
    }

    fn local(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn layout_of_an_observing_night() {
        let window = night();
        let mut chart = Chart::new(&window);
        chart.add_series(curve("Jupiter", &window, |i| 1.0 + 0.02 * i as f64));
        chart.add_series(curve("Saturn", &window, |i| 2.5 - 0.02 * i as f64));

        let layout = chart.layout(&LocalClock::new(10));
        assert_eq!(layout.title, "2023-03-01");
        assert_eq!(layout.x_label, "Date, hour (local)");
        assert_eq!(layout.y_label, "Airmass");
        assert_eq!(
            layout.x_range,
            (local("2023-03-01 11:55:00"), local("2023-03-01 17:25:00"))
        );
        assert_eq!((layout.y_top, layout.y_bottom), (0.9, 2.0));
        assert!(layout.y_top < layout.y_bottom);
        assert_eq!(layout.legend(), vec!["Jupiter", "Saturn"]);
        assert_eq!(layout.size, (700, 500));

        let threshold = layout.threshold.as_ref().unwrap();
        assert_eq!(threshold.airmass, 1.5);
        assert_eq!((threshold.from, threshold.to), layout.x_range);

        let jupiter = &layout.series[0];
        assert_eq!(jupiter.segments.len(), 1);
        assert_eq!(jupiter.segments[0].len(), 40);
        assert_eq!(jupiter.segments[0][0].0, local("2023-03-01 11:55:00"));
        assert_eq!(jupiter.segments[0][39].0, local("2023-03-01 17:25:00"));
        assert_eq!(layout.series[1].colour, 1);
    }

    #[test]
    fn same_input_same_layout() {
        let build = || {
            let window = night();
            let mut chart = Chart::new(&window).y_range(0.9, 3.0).threshold(None);
            chart.add_series(curve("Uranus", &window, |i| 1.2 + 0.01 * i as f64));
            chart.add_series(curve("Neptune", &window, |i| {
                if i > 30 {
                    f64::NAN
                } else {
                    1.4 + 0.03 * i as f64
                }
            }));
            chart.layout(&LocalClock::default())
        };

        let first = build();
        assert_eq!(first, build());
        assert!(first.threshold.is_none());
        assert_eq!(first.y_bottom, 3.0);
        assert_eq!(first.series[1].segments[0].len(), 31);
    }

    #[test]
    fn clip_to_plot_box() {
        // leaves the plot through the bottom (airmass 2.0) halfway along
        let clipped = clip_polyline(&[(0.0, -1.0), (1.0, -3.0)], (0.0, 6.5), (-2.0, -0.9));
        assert_eq!(clipped.len(), 1);
        assert_eq!(clipped[0][0], (0.0, -1.0));
        assert_abs_diff_eq!(clipped[0][1].0, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(clipped[0][1].1, -2.0, epsilon = 1e-12);

        // dips out and comes back
        let clipped = clip_polyline(
            &[(0.0, -1.5), (1.0, -1.6), (2.0, -2.4), (3.0, -2.4), (4.0, -1.2)],
            (0.0, 6.5),
            (-2.0, -0.9),
        );
        assert_eq!(clipped.len(), 2);
        assert_eq!(clipped[0][0], (0.0, -1.5));
        assert_eq!(clipped[0][1], (1.0, -1.6));
        assert_abs_diff_eq!(clipped[0][2].1, -2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(clipped[1][0].1, -2.0, epsilon = 1e-12);
        assert_eq!(*clipped[1].last().unwrap(), (4.0, -1.2));

        // entirely off the chart
        assert!(clip_polyline(&[(0.0, -2.5), (1.0, -2.8)], (0.0, 6.5), (-2.0, -0.9)).is_empty());
    }

    fn bitmap(layout: &ChartLayout) -> Vec<u8> {
        let (width, height) = layout.size;
        let mut buf = vec![0u8; (width * height * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buf, layout.size).into_drawing_area();
            draw(layout, &root).unwrap();
        }
        buf
    }

    fn pixels_of(buf: &[u8], colour: RGBColor) -> usize {
        buf.chunks_exact(3)
            .filter(|px| *px == [colour.0, colour.1, colour.2])
            .count()
    }

    #[test]
    fn same_layout_same_pixels() {
        let window = night();
        let mut chart = Chart::new(&window);
        chart.add_series(curve("Jupiter", &window, |i| 1.0 + 0.02 * i as f64));
        let layout = chart.layout(&LocalClock::default());

        let first = bitmap(&layout);
        assert_eq!(first, bitmap(&layout));
        assert!(first.chunks_exact(3).any(|px| px != [255, 255, 255]));
        assert!(pixels_of(&first, PALETTE[0]) > 0);
    }

    #[test]
    fn threshold_is_drawn_in_next_colour() {
        let window = night();
        let mut chart = Chart::new(&window);
        chart.add_series(curve("Jupiter", &window, |i| 1.0 + 0.02 * i as f64));

        let with = bitmap(&chart.layout(&LocalClock::default()));
        let chart = chart.threshold(None);
        let without = bitmap(&chart.layout(&LocalClock::default()));

        assert!(pixels_of(&with, PALETTE[1]) > 0);
        assert_eq!(pixels_of(&without, PALETTE[1]), 0);
    }

    #[test]
    fn dashed_curve_leaves_gaps() {
        let window = night();
        let solid = {
            let mut chart = Chart::new(&window).threshold(None);
            chart.add_series(curve("HD 13936", &window, |_| 1.5));
            bitmap(&chart.layout(&LocalClock::default()))
        };
        let dashed = {
            let mut chart = Chart::new(&window).threshold(None);
            let mut series = curve("HD 13936", &window, |_| 1.5);
            series.style = LineStyle::Dashed;
            chart.add_series(series);
            bitmap(&chart.layout(&LocalClock::default()))
        };
        let legend_only = {
            let mut chart = Chart::new(&window).threshold(None);
            chart.add_series(curve("HD 13936", &window, |_| f64::NAN));
            bitmap(&chart.layout(&LocalClock::default()))
        };

        let legend = pixels_of(&legend_only, PALETTE[0]);
        let solid = pixels_of(&solid, PALETTE[0]) - legend;
        let dashed = pixels_of(&dashed, PALETTE[0]) - legend;
        assert!(dashed > 0);
        assert!(dashed < solid, "dashed {} solid {}", dashed, solid);
    }
}
