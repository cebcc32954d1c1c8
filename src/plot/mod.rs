//! Chart output.
//!
//! - SVG chart artifact written after every run (`svg`)
//! - ASCII preview for the terminal (`ascii`)

pub mod ascii;
pub mod svg;

pub use ascii::render_ascii_plot;
pub use svg::SvgChart;

use crate::domain::Dataset;
use crate::error::AppError;

/// Consumer of the merged dataset at the end of a run.
pub trait ChartRenderer {
    fn render(&self, dataset: &Dataset) -> Result<(), AppError>;
}

/// Parse a stored value for plotting. Non-numeric values are not plotted.
pub(crate) fn plot_value(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
