//! Rasterization of the 2D ring pattern.
//!
//! Each pixel's distance from the image centre is scaled so that the largest
//! inscribed circle maps to `r_max`, and the brightness at that radius becomes
//! the pixel's gray level. Every call recomputes every pixel.

use indicatif::ProgressBar;
use ndarray::{Array2, ArrayViewMut1, Axis};
use rayon::prelude::*;

use crate::brightness::Model;
use crate::params::OpticalParams;


/// Grayscale ring image, row-major with `pixels[[y, x]]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RingImage {
    pixels: Array2<u8>,
}

impl RingImage {
    pub fn width(&self) -> usize {
        self.pixels.len_of(Axis(1))
    }

    pub fn height(&self) -> usize {
        self.pixels.len_of(Axis(0))
    }

    pub fn pixels(&self) -> &Array2<u8> {
        &self.pixels
    }

    /// Gray level at column `x`, row `y`.
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        self.pixels.get([y, x]).copied()
    }

    /// Raw gray levels in row-major order.
    pub fn to_luma(&self) -> Vec<u8> {
        self.pixels.iter().copied().collect()
    }

    /// Expands to opaque RGBA with equal channels.
    pub fn to_rgba(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|&gray| [gray, gray, gray, 255])
            .collect()
    }
}

/// Mapping from pixel coordinates to physical radius.
#[derive(Debug, Clone, Copy)]
struct PixelScale {
    cx: f64,
    cy: f64,
    max_radius_px: f64,
    r_max: f64,
}

impl PixelScale {
    fn new(r_max: f64, width: usize, height: usize) -> Self {
        let cx = width as f64 / 2.0;
        let cy = height as f64 / 2.0;
        // never divide by less than one pixel
        let max_radius_px = cx.min(cy).max(1.0);
        Self {
            cx,
            cy,
            max_radius_px,
            r_max,
        }
    }

    fn radius(&self, x: usize, y: usize) -> f64 {
        let dx = x as f64 - self.cx;
        let dy = y as f64 - self.cy;
        let radius_px = (dx * dx + dy * dy).sqrt();
        radius_px / self.max_radius_px * self.r_max
    }
}

/// Converts a brightness to an 8-bit gray level, rounding to nearest.
pub fn to_gray(brightness: f64) -> u8 {
    if brightness.is_nan() {
        return 0;
    }
    (brightness * 255.0).round().clamp(0.0, 255.0) as u8
}

fn shade_row(
    model: Model,
    params: &OpticalParams,
    scale: &PixelScale,
    y: usize,
    mut row: ArrayViewMut1<u8>,
) {
    for (x, pixel) in row.iter_mut().enumerate() {
        *pixel = to_gray(model.evaluate(params, scale.radius(x, y)));
    }
}

/// Renders the Fresnel ring pattern into a `width × height` image.
///
/// # Example
/// ```rust
/// use fringes::{params::OpticalParams, ring};
///
/// let image = ring::render_ring(&OpticalParams::reference(), 1.0, 32, 32);
/// assert_eq!(image.width(), 32);
/// ```
pub fn render_ring(params: &OpticalParams, r_max: f64, width: usize, height: usize) -> RingImage {
    render_ring_with(Model::Fresnel, params, r_max, width, height)
}

/// Renders the ring pattern of `model` on the calling thread.
pub fn render_ring_with(
    model: Model,
    params: &OpticalParams,
    r_max: f64,
    width: usize,
    height: usize,
) -> RingImage {
    let scale = PixelScale::new(r_max, width, height);
    let mut pixels = Array2::<u8>::zeros((height, width));
    for (y, row) in pixels.axis_iter_mut(Axis(0)).enumerate() {
        shade_row(model, params, &scale, y, row);
    }
    RingImage { pixels }
}

/// Renders the ring pattern of `model` with one rayon task per row.
///
/// Produces exactly the same image as [`render_ring_with`].
pub fn render_ring_par(
    model: Model,
    params: &OpticalParams,
    r_max: f64,
    width: usize,
    height: usize,
) -> RingImage {
    render_rows_par(model, params, r_max, width, height, || {})
}

/// Like [`render_ring_par`], ticking `pb` once per finished row.
pub fn render_ring_par_progress(
    model: Model,
    params: &OpticalParams,
    r_max: f64,
    width: usize,
    height: usize,
    pb: &ProgressBar,
) -> RingImage {
    render_rows_par(model, params, r_max, width, height, || pb.inc(1))
}

fn render_rows_par<F>(
    model: Model,
    params: &OpticalParams,
    r_max: f64,
    width: usize,
    height: usize,
    on_row: F,
) -> RingImage
where
    F: Fn() + Sync,
{
    let scale = PixelScale::new(r_max, width, height);
    let mut pixels = Array2::<u8>::zeros((height, width));
    pixels
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(y, row)| {
            shade_row(model, params, &scale, y, row);
            on_row();
        });
    RingImage { pixels }
}
