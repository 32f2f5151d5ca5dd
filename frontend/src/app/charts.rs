use anyhow::{anyhow, Result};
use chrono::{Duration, NaiveDateTime};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;

use openweather::ForecastPoint;
use visualcrossing::WeatherRecord;

use crate::app::stats;
use crate::app::temp_scale::TempBand;
use crate::app::utils::rgb_buffer_to_image;

const FORECAST_SIZE: (u32, u32) = (640, 480);
const PANEL_SIZE: (u32, u32) = (880, 1040);

const ORANGE: RGBColor = RGBColor(255, 165, 0);
const PURPLE: RGBColor = RGBColor(128, 0, 128);

/// Parallel per-metric series over one fetched record sequence.
pub struct WeatherSeries {
    pub times: Vec<NaiveDateTime>,
    pub temperature: Vec<f64>,
    pub pressure: Vec<f64>,
    pub humidity: Vec<f64>,
    pub windspeed: Vec<f64>,
}

impl WeatherSeries {
    pub fn from_records(records: &[WeatherRecord]) -> Self {
        Self {
            times: records.iter().map(|r| r.timestamp).collect(),
            temperature: records.iter().map(|r| r.temperature).collect(),
            pressure: records.iter().map(|r| r.pressure).collect(),
            humidity: records.iter().map(|r| r.humidity).collect(),
            windspeed: records.iter().map(|r| r.windspeed).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

/// Per-metric lines of a deviation panel: the raw values shifted up and down
/// by the series' population standard deviation, plus the flat mean.
pub struct DeviationLines {
    pub upper: Vec<f64>,
    pub lower: Vec<f64>,
    pub mean: f64,
    pub std: f64,
}

pub fn deviation_lines(values: &[f64]) -> DeviationLines {
    let mean = stats::mean(values);
    let std = stats::std_dev(values);
    DeviationLines {
        upper: values.iter().map(|v| v + std).collect(),
        lower: values.iter().map(|v| v - std).collect(),
        mean,
        std,
    }
}

/// Vertical range of the forecast bars: data min/max extended by 5 on each side.
pub fn forecast_y_range(bars: &[ForecastPoint]) -> (f64, f64) {
    let min = bars.iter().map(|p| p.temp_c).min().unwrap_or(0);
    let max = bars.iter().map(|p| p.temp_c).max().unwrap_or(0);
    ((min - 5) as f64, (max + 5) as f64)
}

/// Value range covering every plotted line of one panel, padded so the
/// outermost points do not sit on the frame.
fn padded_value_range(lines: &[&[f64]]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for series in lines {
        for v in *series {
            min = min.min(*v);
            max = max.max(*v);
        }
    }
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    let pad = if max > min { (max - min) * 0.05 } else { 1.0 };
    (min - pad, max + pad)
}

/// Time range of a series; widened by an hour for single-point series so the
/// axis never collapses.
fn time_range(times: &[NaiveDateTime]) -> (NaiveDateTime, NaiveDateTime) {
    let start = times[0];
    let end = *times.last().unwrap();
    if end > start {
        (start, end)
    } else {
        (start, start + Duration::hours(1))
    }
}

/// A renderable chart artifact. It owns the data it plots, so the same value
/// can be drawn into the window now and exported to a file later.
pub enum Chart {
    Forecast(Vec<ForecastPoint>),
    Deviation(WeatherSeries),
    Average(WeatherSeries),
}

impl Chart {
    pub fn size(&self) -> (u32, u32) {
        match self {
            Chart::Forecast(_) => FORECAST_SIZE,
            Chart::Deviation(_) | Chart::Average(_) => PANEL_SIZE,
        }
    }

    /// Draw onto any plotters backend.
    pub fn draw<DB>(&self, root: &DrawingArea<DB, Shift>) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        match self {
            Chart::Forecast(bars) => draw_forecast(root, bars),
            Chart::Deviation(series) => draw_deviation_panels(root, series),
            Chart::Average(series) => draw_average_panels(root, series),
        }
    }

    /// Render into an RGB buffer and hand it to the window as an image.
    pub fn to_image(&self) -> Result<slint::Image> {
        let (width, height) = self.size();
        let mut pixels = vec![0u8; (width * height * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut pixels, (width, height)).into_drawing_area();
            self.draw(&root)?;
            root.present()?;
        }
        Ok(rgb_buffer_to_image(&pixels, width, height))
    }

    /// Render to an image file at a user-chosen path; the extension picks the
    /// format (PNG or JPEG).
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let (width, height) = self.size();
        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        self.draw(&root)?;
        root.present()
            .map_err(|e| anyhow!("failed to write chart to {}: {}", path.display(), e))?;
        Ok(())
    }
}

/// Colored bar chart over the next 8 forecast slots, one bar per 3-hour slot,
/// fill color from the shared temperature classifier.
fn draw_forecast<DB>(root: &DrawingArea<DB, Shift>, bars: &[ForecastPoint]) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    if bars.is_empty() {
        return Err(anyhow!("forecast series is empty"));
    }

    root.fill(&WHITE)?;

    let (y_lower, y_upper) = forecast_y_range(bars);
    let labels: Vec<String> = bars.iter().map(|p| format!("{:02}", p.hour)).collect();

    let mut chart = ChartBuilder::on(root)
        .caption("Temperature over the next 24 hours", ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(45)
        .y_label_area_size(50)
        .build_cartesian_2d((0..bars.len()).into_segmented(), y_lower..y_upper)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc("Time")
        .y_desc("Temperature (°C)")
        .x_labels(bars.len())
        .x_label_formatter(&|segment| match segment {
            SegmentValue::CenterOf(i) => labels.get(*i).cloned().unwrap_or_default(),
            _ => String::new(),
        })
        .x_label_style(
            ("sans-serif", 14)
                .into_font()
                .transform(FontTransform::Rotate90),
        )
        .y_labels(((y_upper - y_lower) / 5.0).round() as usize + 1)
        .draw()?;

    chart.draw_series(bars.iter().enumerate().map(|(i, point)| {
        let color = TempBand::classify(point.temp_c as f64).rgb();
        let mut bar = Rectangle::new(
            [
                (SegmentValue::Exact(i), 0.0),
                (SegmentValue::Exact(i + 1), point.temp_c as f64),
            ],
            color.filled(),
        );
        bar.set_margin(0, 0, 5, 5);
        bar
    }))?;

    // freezing-point reference
    chart
        .draw_series(DashedLineSeries::new(
            [
                (SegmentValue::Exact(0), 0.0),
                (SegmentValue::Exact(bars.len()), 0.0),
            ],
            8,
            4,
            BLACK.stroke_width(2),
        ))?
        .label("0°C")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    Ok(())
}

/// Four stacked panels, each with the raw line, dashed ±σ offsets and a
/// dashed mean reference.
fn draw_deviation_panels<DB>(root: &DrawingArea<DB, Shift>, series: &WeatherSeries) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    if series.is_empty() {
        return Err(anyhow!("weather series is empty"));
    }

    root.fill(&WHITE)?;
    let panels = root.split_evenly((4, 1));

    draw_deviation_panel(
        &panels[0],
        &series.times,
        &series.temperature,
        "Temperature",
        BLUE,
        "Temperature (°C)",
    )?;
    draw_deviation_panel(
        &panels[1],
        &series.times,
        &series.pressure,
        "Pressure",
        GREEN,
        "Pressure (mmHg)",
    )?;
    draw_deviation_panel(
        &panels[2],
        &series.times,
        &series.humidity,
        "Humidity",
        ORANGE,
        "Humidity (%)",
    )?;
    draw_deviation_panel(
        &panels[3],
        &series.times,
        &series.windspeed,
        "Wind speed",
        PURPLE,
        "Wind speed (m/s)",
    )?;

    Ok(())
}

fn draw_deviation_panel<DB>(
    area: &DrawingArea<DB, Shift>,
    times: &[NaiveDateTime],
    values: &[f64],
    label: &str,
    color: RGBColor,
    y_desc: &str,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let lines = deviation_lines(values);
    let (t0, t1) = time_range(times);
    let (y_min, y_max) = padded_value_range(&[values, &lines.upper, &lines.lower]);

    let mut chart = ChartBuilder::on(area)
        .margin(8)
        .x_label_area_size(28)
        .y_label_area_size(55)
        .build_cartesian_2d(RangedDateTime::from(t0..t1), y_min..y_max)?;

    chart
        .configure_mesh()
        .y_desc(y_desc)
        .x_labels(6)
        .x_label_formatter(&|t| t.format("%m-%d %H:%M").to_string())
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            times.iter().copied().zip(values.iter().copied()),
            color.stroke_width(2),
        ))?
        .label(label.to_string())
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    chart.draw_series(
        times
            .iter()
            .zip(values.iter())
            .map(|(t, v)| Circle::new((*t, *v), 3, color.filled())),
    )?;

    chart
        .draw_series(DashedLineSeries::new(
            times.iter().copied().zip(lines.upper.iter().copied()),
            6,
            4,
            color.mix(0.6).stroke_width(1),
        ))?
        .label(format!("+σ={:.2}", lines.std))
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.mix(0.6)));
    chart
        .draw_series(DashedLineSeries::new(
            times.iter().copied().zip(lines.lower.iter().copied()),
            6,
            4,
            color.mix(0.6).stroke_width(1),
        ))?
        .label(format!("-σ={:.2}", lines.std))
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.mix(0.6)));

    chart
        .draw_series(DashedLineSeries::new(
            [(t0, lines.mean), (t1, lines.mean)],
            6,
            4,
            RED.stroke_width(2),
        ))?
        .label(format!("Mean: {:.2}", lines.mean))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    Ok(())
}

/// Four stacked panels, raw line plus a flat dashed mean per metric.
fn draw_average_panels<DB>(root: &DrawingArea<DB, Shift>, series: &WeatherSeries) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    if series.is_empty() {
        return Err(anyhow!("weather series is empty"));
    }

    root.fill(&WHITE)?;
    let panels = root.split_evenly((4, 1));

    draw_average_panel(
        &panels[0],
        &series.times,
        &series.temperature,
        "Temperature",
        "Mean temperature",
        BLUE,
        "°F",
    )?;
    draw_average_panel(
        &panels[1],
        &series.times,
        &series.pressure,
        "Pressure",
        "Mean pressure",
        ORANGE,
        "hPa",
    )?;
    draw_average_panel(
        &panels[2],
        &series.times,
        &series.humidity,
        "Humidity",
        "Mean humidity",
        GREEN,
        "%",
    )?;
    draw_average_panel(
        &panels[3],
        &series.times,
        &series.windspeed,
        "Wind speed",
        "Mean wind speed",
        RED,
        "m/s",
    )?;

    Ok(())
}

fn draw_average_panel<DB>(
    area: &DrawingArea<DB, Shift>,
    times: &[NaiveDateTime],
    values: &[f64],
    title: &str,
    mean_label: &str,
    color: RGBColor,
    y_desc: &str,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let mean = stats::mean(values);
    let (t0, t1) = time_range(times);
    let (y_min, y_max) = padded_value_range(&[values, &[mean]]);

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 16))
        .margin(8)
        .x_label_area_size(28)
        .y_label_area_size(55)
        .build_cartesian_2d(RangedDateTime::from(t0..t1), y_min..y_max)?;

    chart
        .configure_mesh()
        .y_desc(y_desc)
        .x_labels(6)
        .x_label_formatter(&|t| t.format("%m-%d %H:%M").to_string())
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            times.iter().copied().zip(values.iter().copied()),
            color.stroke_width(2),
        ))?
        .label(title.to_string())
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    chart.draw_series(
        times
            .iter()
            .zip(values.iter())
            .map(|(t, v)| Circle::new((*t, *v), 3, color.filled())),
    )?;

    chart
        .draw_series(DashedLineSeries::new(
            [(t0, mean), (t1, mean)],
            6,
            4,
            RED.stroke_width(2),
        ))?
        .label(mean_label.to_string())
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    Ok(())
}
