//! Plotters-powered SVG chart of every series in the dataset.
//!
//! The x axis is "days since the first observation" (plain `f64`) with a tick
//! formatter that turns offsets back into dates. This keeps the coordinate
//! system identical to the terminal preview.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, TimeDelta};
use log::info;
use plotters::prelude::*;
use plotters::style::FontStyle;

use crate::domain::{Dataset, ISO_DATE_FORMAT};
use crate::error::AppError;
use crate::plot::{ChartRenderer, plot_value};

const DEFAULT_TITLE: &str = "Tipo de cambio Pesos por dólar E.U.A.";
const DEFAULT_Y_LABEL: &str = "Pesos por dólar";
const SOURCE_LABEL: &str = "Source: https://www.banxico.org.mx/SieAPIRest/service/v1";

const PALETTE: [RGBColor; 7] = [
    RGBColor(255, 0, 0),
    RGBColor(24, 123, 58),
    RGBColor(149, 201, 136),
    RGBColor(1, 62, 29),
    RGBColor(81, 176, 86),
    RGBColor(0, 55, 122),
    RGBColor(0, 92, 165),
];

type DrawResult<T> = Result<T, Box<dyn std::error::Error>>;

pub struct SvgChart {
    path: PathBuf,
    width: u32,
    height: u32,
    y_label: String,
}

impl SvgChart {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            width: 1920,
            height: 1080,
            y_label: DEFAULT_Y_LABEL.to_string(),
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn draw(&self, dataset: &Dataset) -> DrawResult<()> {
        let lines = collect_lines(dataset);
        let start = lines
            .iter()
            .flat_map(|line| line.points.iter().map(|&(d, _)| d))
            .min()
            .ok_or("no plottable observations")?;
        let end = lines
            .iter()
            .flat_map(|line| line.points.iter().map(|&(d, _)| d))
            .max()
            .unwrap_or(start);
        let (y0, y1) = value_bounds(&lines).ok_or("no plottable observations")?;

        let x1 = ((end - start).num_days() as f64).max(1.0);
        let offset = |d: NaiveDate| (d - start).num_days() as f64;
        let fmt_x = |v: &f64| {
            start
                .checked_add_signed(TimeDelta::days(v.round() as i64))
                .unwrap_or(start)
                .format(ISO_DATE_FORMAT)
                .to_string()
        };

        let title = dataset
            .series
            .first()
            .map(|s| s.title.trim())
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_TITLE);
        let ids: Vec<&str> = lines.iter().map(|l| l.id).collect();
        let subtitle = format!("{SOURCE_LABEL} | Serie: {}", ids.join(", "));

        let root = SVGBackend::new(&self.path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;
        let root = root.titled(
            title,
            ("sans-serif", 28).into_font().style(FontStyle::Bold).color(&BLACK),
        )?;

        {
            let mut chart = ChartBuilder::on(&root)
                .caption(subtitle, ("sans-serif", 22).into_font().color(&BLACK))
                .margin(20)
                .set_label_area_size(LabelAreaPosition::Left, 90)
                .set_label_area_size(LabelAreaPosition::Bottom, 60)
                .build_cartesian_2d(0f64..x1, y0..y1)?;

            chart
                .configure_mesh()
                .x_labels(10)
                .y_labels(10)
                .x_label_formatter(&fmt_x)
                .y_label_formatter(&|v| format!("{v:.2}"))
                .y_desc(self.y_label.as_str())
                .label_style(("sans-serif", 16).into_font().color(&BLACK))
                .axis_desc_style(("sans-serif", 18).into_font().color(&BLACK))
                .draw()?;

            for (idx, line) in lines.iter().enumerate() {
                let color = PALETTE[idx % PALETTE.len()];
                chart
                    .draw_series(LineSeries::new(
                        line.points.iter().map(|&(d, v)| (offset(d), v)),
                        color.stroke_width(3),
                    ))?
                    .label(line.label.clone())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(3)));
            }

            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperLeft)
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()?;
        }

        root.present()?;
        Ok(())
    }
}

impl ChartRenderer for SvgChart {
    fn render(&self, dataset: &Dataset) -> Result<(), AppError> {
        info!("Starting chart generation");
        self.draw(dataset).map_err(|e| {
            AppError::local(format!(
                "Failed to write chart '{}': {e}",
                self.path.display()
            ))
        })?;
        info!("Chart generated at '{}'", self.path.display());
        Ok(())
    }
}

struct Line<'a> {
    id: &'a str,
    label: String,
    points: Vec<(NaiveDate, f64)>,
}

fn collect_lines(dataset: &Dataset) -> Vec<Line<'_>> {
    dataset
        .series
        .iter()
        .map(|s| Line {
            id: s.id.as_str(),
            label: if s.title.trim().is_empty() {
                s.id.clone()
            } else {
                s.title.trim().to_string()
            },
            points: s
                .observations
                .iter()
                .filter_map(|o| plot_value(&o.value).map(|v| (o.date, v)))
                .collect(),
        })
        .filter(|line| !line.points.is_empty())
        .collect()
}

fn value_bounds(lines: &[Line<'_>]) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &(_, v) in lines.iter().flat_map(|l| l.points.iter()) {
        min = min.min(v);
        max = max.max(v);
    }
    if !(min.is_finite() && max.is_finite()) {
        return None;
    }
    let span = max - min;
    let pad = if span > 0.0 {
        span * 0.05
    } else {
        (max.abs() * 0.01).max(1e-6)
    };
    Some((min - pad, max + pad))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::domain::{Observation, Series};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn writes_svg_file() {
        let dir = tempfile::tempdir().unwrap();
        let chart = SvgChart::new(dir.path().join("chart.svg")).with_size(800, 450);
        let dataset = Dataset::new(vec![Series::new(
            "SF43718",
            "Tipo de cambio FIX",
            vec![
                Observation::new(d(2024, 1, 1), "17.05"),
                Observation::new(d(2024, 1, 2), "17.10"),
                Observation::new(d(2024, 1, 3), "16.98"),
            ],
        )]);

        chart.render(&dataset).unwrap();

        let svg = fs::read_to_string(chart.path()).unwrap();
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn dataset_without_numeric_values_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let chart = SvgChart::new(dir.path().join("chart.svg"));
        let dataset = Dataset::new(vec![Series::new(
            "A",
            "a",
            vec![Observation::new(d(2024, 1, 1), "N/E")],
        )]);

        assert!(chart.render(&dataset).is_err());
    }

    #[test]
    fn flat_series_still_gets_a_value_range() {
        let dataset = Dataset::new(vec![Series::new(
            "A",
            "a",
            vec![Observation::new(d(2024, 1, 1), "17.00")],
        )]);
        let (lo, hi) = value_bounds(&collect_lines(&dataset)).unwrap();
        assert!(lo < 17.0 && hi > 17.0);
    }
}
