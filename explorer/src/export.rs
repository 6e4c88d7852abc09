//! PNG export of a chart configuration.
//!
//! Rasterizes the plot frame, decade/step grid lines and one marker per film.
//! Text is not drawn; the file name carries the chart identity.

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::api::SeriesKind;
use crate::services::{AxisScale, ChartViewModel};

/// Logical pixels between the canvas edge and the plot frame.
const MARGIN: u32 = 24;
const MARKER_RADIUS: u32 = 3;
const LINEAR_STEPS: u32 = 5;

const FRAME_COLOR: Rgba<u8> = Rgba([110, 112, 121, 255]);
const GRID_COLOR: Rgba<u8> = Rgba([224, 230, 241, 255]);
const BUDGET_COLOR: Rgba<u8> = Rgba([84, 112, 198, 255]);
const RATING_COLOR: Rgba<u8> = Rgba([145, 204, 117, 255]);

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Canvas of {width}x{height} pixels is too small to hold a chart")]
    InvalidSize { width: u32, height: u32 },

    #[error("Failed to encode PNG: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    /// Logical width; the image is `width * pixel_ratio` pixels wide.
    pub width: u32,
    pub height: u32,
    pub pixel_ratio: u32,
    pub background: [u8; 4],
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            width: 960,
            height: 540,
            pixel_ratio: 2,
            background: [255, 255, 255, 255],
        }
    }
}

struct PlotArea {
    left: u32,
    top: u32,
    right: u32,
    bottom: u32,
}

impl PlotArea {
    fn x(&self, t: f64) -> i64 {
        (self.left as f64 + t * (self.right - self.left) as f64).round() as i64
    }

    fn y(&self, t: f64) -> i64 {
        (self.bottom as f64 - t * (self.bottom - self.top) as f64).round() as i64
    }
}

fn put(canvas: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < canvas.width() && (y as u32) < canvas.height() {
        canvas.put_pixel(x as u32, y as u32, color);
    }
}

/// Normalized positions of the grid lines along one axis.
fn grid_positions(scale: &AxisScale, data_max: f64) -> Vec<f64> {
    match *scale {
        AxisScale::Log { base, min } => {
            let first = min.log(base).ceil() as i32;
            let last = data_max.max(min * base).log(base).floor() as i32;
            (first..=last)
                .map(|k| scale.normalize(base.powi(k), data_max))
                .collect()
        }
        AxisScale::Linear { min, max } => (0..=LINEAR_STEPS)
            .map(|i| min + (max - min) * i as f64 / LINEAR_STEPS as f64)
            .map(|v| scale.normalize(v, data_max))
            .collect(),
    }
}

/// Draw `view` into an RGBA canvas.
pub fn render(view: &ChartViewModel, options: &ExportOptions) -> Result<RgbaImage, ExportError> {
    let ratio = options.pixel_ratio.max(1);
    let width = options.width.saturating_mul(ratio);
    let height = options.height.saturating_mul(ratio);
    let margin = MARGIN * ratio;
    if width <= 2 * margin || height <= 2 * margin {
        return Err(ExportError::InvalidSize { width, height });
    }

    let mut canvas = RgbaImage::from_pixel(width, height, Rgba(options.background));
    let plot = PlotArea {
        left: margin,
        top: margin,
        right: width - margin,
        bottom: height - margin,
    };

    let x_max = view.points.iter().map(|p| p.value[0]).fold(f64::MIN, f64::max);
    let y_max = view.points.iter().map(|p| p.value[1]).fold(f64::MIN, f64::max);

    for t in grid_positions(&view.x_axis.scale, x_max) {
        let x = plot.x(t);
        for y in plot.top..=plot.bottom {
            put(&mut canvas, x, y as i64, GRID_COLOR);
        }
    }
    for t in grid_positions(&view.y_axis.scale, y_max) {
        let y = plot.y(t);
        for x in plot.left..=plot.right {
            put(&mut canvas, x as i64, y, GRID_COLOR);
        }
    }

    for x in plot.left..=plot.right {
        put(&mut canvas, x as i64, plot.top as i64, FRAME_COLOR);
        put(&mut canvas, x as i64, plot.bottom as i64, FRAME_COLOR);
    }
    for y in plot.top..=plot.bottom {
        put(&mut canvas, plot.left as i64, y as i64, FRAME_COLOR);
        put(&mut canvas, plot.right as i64, y as i64, FRAME_COLOR);
    }

    let color = match view.kind {
        SeriesKind::Budget => BUDGET_COLOR,
        SeriesKind::Rating => RATING_COLOR,
    };
    let radius = (MARKER_RADIUS * ratio) as i64;
    for point in &view.points {
        let cx = plot.x(view.x_axis.scale.normalize(point.value[0], x_max));
        let cy = plot.y(view.y_axis.scale.normalize(point.value[1], y_max));
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= radius * radius {
                    put(&mut canvas, cx + dx, cy + dy, color);
                }
            }
        }
    }

    Ok(canvas)
}

/// Encode `view` as PNG bytes.
pub fn render_png(view: &ChartViewModel, options: &ExportOptions) -> Result<Vec<u8>, ExportError> {
    let canvas = render(view, options)?;
    let mut bytes = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(canvas).write_to(&mut bytes, ImageFormat::Png)?;
    Ok(bytes.into_inner())
}

/// Write `view` to `dir/<export_name>` and return the path.
pub fn save_png(view: &ChartViewModel, dir: &Path, options: &ExportOptions) -> Result<PathBuf, ExportError> {
    let bytes = render_png(view, options)?;
    fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(&view.export_name);
    fs::write(&path, bytes).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;
    info!("Saved chart to {:?}", path);
    Ok(path)
}
