//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - a quick visual sanity check after a sync
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - observations: `o`
//! - line between consecutive observations: `-`

use chrono::NaiveDate;

use crate::domain::Series;
use crate::plot::plot_value;

/// Render one series as a `width` x `height` character plot with a header line.
pub fn render_ascii_plot(series: &Series, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let points: Vec<(NaiveDate, f64)> = series
        .observations
        .iter()
        .filter_map(|o| plot_value(&o.value).map(|v| (o.date, v)))
        .collect();

    let Some(start) = points.iter().map(|&(d, _)| d).min() else {
        return format!("Plot: {} | no numeric observations\n", series.id);
    };
    let end = points.iter().map(|&(d, _)| d).max().unwrap_or(start);

    let t_max = ((end - start).num_days() as f64).max(1.0);
    let xy: Vec<(f64, f64)> = points
        .iter()
        .map(|&(d, v)| ((d - start).num_days() as f64, v))
        .collect();

    let (y_min, y_max) = y_range(&xy);
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Line first so the observation markers overlay it.
    let cells: Vec<(usize, usize)> = xy
        .iter()
        .map(|&(t, y)| (map_x(t, 0.0, t_max, width), map_y(y, y_min, y_max, height)))
        .collect();
    for pair in cells.windows(2) {
        draw_line(&mut grid, pair[0].0, pair[0].1, pair[1].0, pair[1].1, '-');
    }
    // Dense series would turn solid; only mark observations when they are sparse.
    if cells.len() <= width / 2 {
        for &(x, y) in &cells {
            grid[y][x] = 'o';
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: {} | dates=[{start}, {end}] | y=[{y_min:.2}, {y_max:.2}]\n",
        series.id
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

fn y_range(points: &[(f64, f64)]) -> (f64, f64) {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for &(_, y) in points {
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    if max_y > min_y {
        (min_y, max_y)
    } else {
        (min_y - 1.0, max_y + 1.0)
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(t: f64, t_min: f64, t_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((t - t_min) / (t_max - t_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Observation;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn plot_golden_snapshot_small() {
        let series = Series::new(
            "A",
            "a",
            vec![Observation::new(d(1), "100"), Observation::new(d(10), "110")],
        );

        let txt = render_ascii_plot(&series, 10, 5);
        let expected = concat!(
            "Plot: A | dates=[2024-01-01, 2024-01-10] | y=[99.50, 110.50]\n",
            "        -o\n",
            "      --  \n",
            "    --    \n",
            "  --      \n",
            "o-        \n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn series_without_numbers_renders_placeholder() {
        let series = Series::new("A", "a", vec![Observation::new(d(1), "N/E")]);
        assert_eq!(
            render_ascii_plot(&series, 10, 5),
            "Plot: A | no numeric observations\n"
        );
    }
}
