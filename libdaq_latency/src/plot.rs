//! Minimal PNG plotting for latency distributions and time series.
//!
//! Plots are drawn straight into an RGBA buffer and written as PNG. Axis text is not
//! rasterized. Both axes carry tick marks at every grid line, and every PNG gets a YAML
//! sidecar with the title, the axis labels, the data ranges and the value at each tick,
//! so that the image can be read (or re-rendered) later.

use image::{Rgba, RgbaImage};
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::error::PlotError;

const IMAGE_WIDTH: u32 = 1280;
const IMAGE_HEIGHT: u32 = 960;
const MARGIN: u32 = 80;
const GRID_DIVISIONS: u32 = 10;
const TICK_LENGTH: u32 = 8;
const SCATTER_SIZE: u32 = 2;

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
const FRAME: Rgba<u8> = Rgba([0, 0, 0, 255]);
const GRID: Rgba<u8> = Rgba([220, 220, 220, 255]);
const DATA: Rgba<u8> = Rgba([31, 119, 180, 255]);

/// Equal width binning of a set of values.
///
/// The bins span the minimum to the maximum value, and the last bin includes its right
/// edge. If every value is the same, the range is widened by 0.5 on either side.
/// Non-finite values are not counted.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<u64>,
}

impl Histogram {
    pub fn new(values: &[f64], bins: usize) -> Self {
        let bins = bins.max(1);
        let (low, high) = match value_range(values) {
            Some((low, high)) if low < high => (low, high),
            Some((value, _)) => (value - 0.5, value + 0.5),
            None => (0.0, 1.0),
        };
        let width = (high - low) / bins as f64;
        let edges = (0..=bins).map(|idx| low + width * idx as f64).collect();

        let mut counts = vec![0; bins];
        for value in values.iter().filter(|v| v.is_finite()) {
            let bin = (((value - low) / width) as usize).min(bins - 1);
            counts[bin] += 1;
        }

        Self { edges, counts }
    }

    pub fn entries(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn max_count(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

/// The text that goes with a plot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotLabels {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
}

impl PlotLabels {
    pub fn new(title: &str, x_label: &str, y_label: &str) -> Self {
        Self {
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum PlotKind {
    Histogram,
    Line,
    Scatter,
}

/// Contents of the YAML sidecar written next to every image
#[derive(Debug, Clone, Serialize)]
struct PlotInfo<'a> {
    kind: PlotKind,
    #[serde(flatten)]
    labels: &'a PlotLabels,
    entries: usize,
    x_range: (f64, f64),
    y_range: (f64, f64),
    x_ticks: Vec<f64>,
    y_ticks: Vec<f64>,
    bins: Option<usize>,
}

/// PlotWriter renders plots into an existing directory.
#[derive(Debug, Clone)]
pub struct PlotWriter {
    directory: PathBuf,
}

impl PlotWriter {
    /// Create a writer for a directory. The directory is not created; it must exist.
    pub fn new(directory: &Path) -> Result<Self, PlotError> {
        if !directory.is_dir() {
            return Err(PlotError::MissingDirectory(directory.to_path_buf()));
        }
        Ok(Self {
            directory: directory.to_path_buf(),
        })
    }

    /// Write a frequency histogram of the values.
    ///
    /// Returns the path of the image, or None if there was nothing to plot.
    pub fn write_histogram(
        &self,
        name: &str,
        labels: &PlotLabels,
        values: &[f64],
        bins: usize,
    ) -> Result<Option<PathBuf>, PlotError> {
        if values.is_empty() {
            log::warn!("No data for histogram '{}'; skipping {name}", labels.title);
            return Ok(None);
        }

        let hist = Histogram::new(values, bins);
        let x_range = (hist.edges[0], hist.edges[hist.edges.len() - 1]);
        let y_range = (0.0, hist.max_count().max(1) as f64);

        let mut canvas = Canvas::new();
        let n_bins = hist.counts.len();
        for (idx, count) in hist.counts.iter().enumerate() {
            if *count == 0 {
                continue;
            }
            let x0 = canvas.map_x(idx as f64 / n_bins as f64);
            let x1 = canvas.map_x((idx + 1) as f64 / n_bins as f64);
            let y = canvas.map_y(*count as f64 / y_range.1);
            canvas.fill_rect(x0, y, x1, canvas.bottom, DATA);
        }
        canvas.draw_frame();

        let path = self.directory.join(name);
        canvas.save(&path)?;
        self.write_info(
            &path,
            &PlotInfo {
                kind: PlotKind::Histogram,
                labels,
                entries: hist.entries() as usize,
                x_range,
                y_range,
                x_ticks: tick_values(x_range),
                y_ticks: tick_values(y_range),
                bins: Some(n_bins),
            },
        )?;
        log::info!("Wrote histogram {}", path.to_string_lossy());
        Ok(Some(path))
    }

    /// Write a line plot connecting the points in the order given
    pub fn write_line(
        &self,
        name: &str,
        labels: &PlotLabels,
        xs: &[f64],
        ys: &[f64],
    ) -> Result<Option<PathBuf>, PlotError> {
        self.write_points(name, labels, xs, ys, PlotKind::Line)
    }

    /// Write a scatter plot of the points
    pub fn write_scatter(
        &self,
        name: &str,
        labels: &PlotLabels,
        xs: &[f64],
        ys: &[f64],
    ) -> Result<Option<PathBuf>, PlotError> {
        self.write_points(name, labels, xs, ys, PlotKind::Scatter)
    }

    fn write_points(
        &self,
        name: &str,
        labels: &PlotLabels,
        xs: &[f64],
        ys: &[f64],
        kind: PlotKind,
    ) -> Result<Option<PathBuf>, PlotError> {
        let n_points = xs.len().min(ys.len());
        if xs.len() != ys.len() {
            log::warn!(
                "Plot '{}' was given {} x values and {} y values; only {n_points} points are drawn",
                labels.title,
                xs.len(),
                ys.len()
            );
        }
        let (Some(x_range), Some(y_range)) = (
            value_range(&xs[..n_points]).map(widen),
            value_range(&ys[..n_points]).map(widen),
        ) else {
            log::warn!("No data for plot '{}'; skipping {name}", labels.title);
            return Ok(None);
        };

        let mut canvas = Canvas::new();
        let mut previous: Option<(u32, u32)> = None;
        for (x, y) in xs.iter().zip(ys.iter()) {
            if !x.is_finite() || !y.is_finite() {
                previous = None;
                continue;
            }
            let px = canvas.map_x((x - x_range.0) / (x_range.1 - x_range.0));
            let py = canvas.map_y((y - y_range.0) / (y_range.1 - y_range.0));
            match kind {
                PlotKind::Line => {
                    if let Some((prev_x, prev_y)) = previous {
                        draw_line(&mut canvas.image, prev_x, prev_y, px, py, DATA);
                    } else {
                        canvas.image.put_pixel(px, py, DATA);
                    }
                }
                _ => canvas.fill_rect(
                    px.saturating_sub(SCATTER_SIZE / 2),
                    py.saturating_sub(SCATTER_SIZE / 2),
                    px + SCATTER_SIZE / 2,
                    py + SCATTER_SIZE / 2,
                    DATA,
                ),
            }
            previous = Some((px, py));
        }
        canvas.draw_frame();

        let path = self.directory.join(name);
        canvas.save(&path)?;
        self.write_info(
            &path,
            &PlotInfo {
                kind,
                labels,
                entries: n_points,
                x_range,
                y_range,
                x_ticks: tick_values(x_range),
                y_ticks: tick_values(y_range),
                bins: None,
            },
        )?;
        log::info!("Wrote plot {}", path.to_string_lossy());
        Ok(Some(path))
    }

    fn write_info(&self, image_path: &Path, info: &PlotInfo) -> Result<(), PlotError> {
        let yaml_str = serde_yaml::to_string(info)?;
        std::fs::write(image_path.with_extension("yml"), yaml_str)?;
        Ok(())
    }
}

/// Smallest and largest finite value
fn value_range(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .filter(|v| v.is_finite())
        .fold(None, |range, &v| match range {
            None => Some((v, v)),
            Some((low, high)) => Some((low.min(v), high.max(v))),
        })
}

/// Make sure a range has some extent so it can be drawn
fn widen((low, high): (f64, f64)) -> (f64, f64) {
    if (high - low).abs() < f64::EPSILON {
        (low - 0.5, high + 0.5)
    } else {
        (low, high)
    }
}

/// The axis value at each tick mark, from the low end of the range to the high end
fn tick_values((low, high): (f64, f64)) -> Vec<f64> {
    (0..=GRID_DIVISIONS)
        .map(|div| low + (high - low) * div as f64 / GRID_DIVISIONS as f64)
        .collect()
}

/// An image with a chart area framed by a margin
struct Canvas {
    image: RgbaImage,
    left: u32,
    right: u32,
    top: u32,
    bottom: u32,
}

impl Canvas {
    fn new() -> Self {
        let mut canvas = Self {
            image: RgbaImage::from_pixel(IMAGE_WIDTH, IMAGE_HEIGHT, BACKGROUND),
            left: MARGIN,
            right: IMAGE_WIDTH - MARGIN,
            top: MARGIN,
            bottom: IMAGE_HEIGHT - MARGIN,
        };
        canvas.draw_grid();
        canvas
    }

    /// Pixel column of a ratio (0 to 1) across the chart
    fn map_x(&self, ratio: f64) -> u32 {
        let width = (self.right - self.left) as f64;
        self.left + (ratio.clamp(0.0, 1.0) * width) as u32
    }

    /// Pixel row of a ratio (0 to 1) up the chart
    fn map_y(&self, ratio: f64) -> u32 {
        let height = (self.bottom - self.top) as f64;
        self.bottom - (ratio.clamp(0.0, 1.0) * height) as u32
    }

    fn draw_grid(&mut self) {
        for div in 1..GRID_DIVISIONS {
            let x = self.map_x(div as f64 / GRID_DIVISIONS as f64);
            let y = self.map_y(div as f64 / GRID_DIVISIONS as f64);
            draw_line(&mut self.image, x, self.top, x, self.bottom, GRID);
            draw_line(&mut self.image, self.left, y, self.right, y, GRID);
        }
    }

    fn draw_frame(&mut self) {
        let (left, right, top, bottom) = (self.left, self.right, self.top, self.bottom);
        draw_line(&mut self.image, left, top, right, top, FRAME);
        draw_line(&mut self.image, right, top, right, bottom, FRAME);
        draw_line(&mut self.image, right, bottom, left, bottom, FRAME);
        draw_line(&mut self.image, left, bottom, left, top, FRAME);
        self.draw_ticks();
    }

    /// Tick marks outside the chart, one per grid line including the corners
    fn draw_ticks(&mut self) {
        for div in 0..=GRID_DIVISIONS {
            let x = self.map_x(div as f64 / GRID_DIVISIONS as f64);
            let y = self.map_y(div as f64 / GRID_DIVISIONS as f64);
            draw_line(
                &mut self.image,
                x,
                self.bottom,
                x,
                self.bottom + TICK_LENGTH,
                FRAME,
            );
            draw_line(
                &mut self.image,
                self.left - TICK_LENGTH,
                y,
                self.left,
                y,
                FRAME,
            );
        }
    }

    /// Fill the rectangle between two corners (inclusive)
    fn fill_rect(&mut self, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgba<u8>) {
        let (width, height) = self.image.dimensions();
        for y in y0.min(y1)..=y0.max(y1).min(height - 1) {
            for x in x0.min(x1)..=x0.max(x1).min(width - 1) {
                self.image.put_pixel(x, y, color);
            }
        }
    }

    fn save(&self, path: &Path) -> Result<(), PlotError> {
        self.image.save(path)?;
        Ok(())
    }
}

/// Bresenham line between two pixels, clipped to the image
fn draw_line(img: &mut RgbaImage, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgba<u8>) {
    let dx = (x1 as i32 - x0 as i32).abs();
    let dy = -(y1 as i32 - y0 as i32).abs();
    let sx: i32 = if x0 < x1 { 1 } else { -1 };
    let sy: i32 = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut x = x0 as i32;
    let mut y = y0 as i32;

    let (width, height) = img.dimensions();

    loop {
        if x >= 0 && x < width as i32 && y >= 0 && y < height as i32 {
            img.put_pixel(x as u32, y as u32, color);
        }

        if x == x1 as i32 && y == y1 as i32 {
            break;
        }

        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}
