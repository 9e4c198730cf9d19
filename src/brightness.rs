//! Two-beam interference brightness at a radius from the optical axis.
//!
//! A ray from the focal point meets the gap at incidence angle
//! `i = atan(r / F)`. Part of it reflects off the top of the gap, the rest is
//! refracted into the gap at angle `j`, reflects off the substrate and comes
//! back out. The two reflected beams differ in optical path by
//! `2 E n2 cos(j) / n1`, plus half a wavelength when exactly one of the two
//! reflections is off a denser medium.
//!
//! # Models
//!
//! - [`Model::Fresnel`]: beam intensities from the Fresnel reflectances at both
//!   interfaces, combined as `sqrt(I1 + I2 + 2 sqrt(I1 I2) cos(phase))`. The
//!   outer square root is part of the calibrated output and is kept.
//! - [`Model::CosineSquared`]: equal-amplitude approximation, `cos²(phase / 2)`.
//!
//! Both models share the focal-length guard, the entry TIR short-circuit and
//! the phase term.

use std::f64::consts::PI;
use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::fresnel::reflectance;
use crate::params::OpticalParams;


/// Brightness model used to turn the interference phase into a value in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Model {
    /// Fresnel reflectances at both interfaces.
    #[default]
    Fresnel,
    /// Equal-amplitude approximation.
    CosineSquared,
}

impl Model {
    /// Evaluates the brightness at `radius` with this model.
    pub fn evaluate(&self, params: &OpticalParams, radius: f64) -> f64 {
        match self {
            Model::Fresnel => evaluate(params, radius),
            Model::CosineSquared => evaluate_cosine_squared(params, radius),
        }
    }

    /// The other model.
    pub fn toggled(&self) -> Self {
        match self {
            Model::Fresnel => Model::CosineSquared,
            Model::CosineSquared => Model::Fresnel,
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Model::Fresnel => write!(f, "fresnel"),
            Model::CosineSquared => write!(f, "cosine-squared"),
        }
    }
}

/// Clamps to `[0, 1]`, mapping NaN to `0.0`.
///
/// `f64::clamp` passes NaN through, which would otherwise reach the renderers.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Angles of the ray at `radius`: incidence on the gap, and refraction into it.
///
/// `None` when the ray is totally internally reflected at the entry interface.
fn ray_angles(params: &OpticalParams, radius: f64) -> Option<(f64, f64)> {
    let i = (radius / params.focal_length).atan();
    if i.sin() > params.n2 / params.n1 {
        return None;
    }
    let j = (i.sin() * params.n1 / params.n2).asin();
    Some((i, j))
}

/// Phase difference between the two reflected beams for refraction angle `j`.
fn phase_at(params: &OpticalParams, j: f64) -> f64 {
    let optical_path_diff = 2.0 * params.gap_thickness * params.n2 * j.cos() / params.n1;
    let mut phase = optical_path_diff * 2.0 * PI / params.wavelength;

    // an odd number of reflections off a denser medium inverts one beam
    if (params.n1 < params.n2) != (params.n2 < params.n3) {
        phase += PI;
    }
    phase
}

/// Phase difference at `radius`, or NaN under entry TIR.
pub fn phase(params: &OpticalParams, radius: f64) -> f64 {
    match ray_angles(params, radius) {
        Some((_, j)) => phase_at(params, j),
        None => f64::NAN,
    }
}

/// Intensities of the beam reflected at the top of the gap and of the beam
/// reflected at the substrate, for incidence angle `i` and refraction angle `j`.
fn beam_intensities(params: &OpticalParams, i: f64, j: f64) -> (f64, f64) {
    let i1 = reflectance(params.n1, params.n2, i);
    let i2 = (1.0 - i1)
        * reflectance(params.n2, params.n3, j)
        * (1.0 - reflectance(params.n2, params.n1, j));
    (i1, i2)
}

/// Evaluates the Fresnel interference brightness at `radius` from the axis.
///
/// Returns `0.0` for a non-positive focal length and `1.0` when the ray is
/// totally internally reflected at the entry interface. Otherwise the result
/// is clamped to `[0, 1]`, with NaN mapped to `0.0`.
///
/// # Example
/// ```rust
/// use fringes::{brightness, params::OpticalParams};
///
/// let b = brightness::evaluate(&OpticalParams::reference(), 0.0);
/// assert!((0.0..=1.0).contains(&b));
/// ```
pub fn evaluate(params: &OpticalParams, radius: f64) -> f64 {
    if params.focal_length <= 0.0 {
        return 0.0;
    }
    let Some((i, j)) = ray_angles(params, radius) else {
        return 1.0;
    };
    let phase = phase_at(params, j);
    let (i1, i2) = beam_intensities(params, i, j);

    let bright = (i1 + i2 + 2.0 * (i1 * i2).sqrt() * phase.cos()).sqrt();
    clamp_unit(bright)
}

/// Evaluates the equal-amplitude approximation `cos²(phase / 2)`.
pub fn evaluate_cosine_squared(params: &OpticalParams, radius: f64) -> f64 {
    if params.focal_length <= 0.0 {
        return 0.0;
    }
    let Some((_, j)) = ray_angles(params, radius) else {
        return 1.0;
    };
    let phase = phase_at(params, j);
    clamp_unit((0.5 * phase).cos().powi(2))
}
