//! Fresnel equations for reflection at the gap interfaces.
//!
//! This module implements the Fresnel amplitude coefficients for a planar
//! boundary between two non-absorbing media and the unpolarized reflectance
//! built from them. The interference model uses the reflectance at both faces
//! of the gap, so this is where polarization is averaged out.
//!
//! Amplitude matrices are diagonal with the parallel (p) component at `(0, 0)`
//! and the perpendicular (s) component at `(1, 1)`.

use nalgebra::{Matrix2, Vector2};

use crate::snell;


/// Computes Fresnel amplitude reflection coefficients.
///
/// Returns a diagonal matrix with `r_p` at `(0, 0)` and `r_s` at `(1, 1)`.
/// `theta_t` should come from [`snell::get_theta_t`].
pub fn refl(n1: f64, n2: f64, theta_i: f64, theta_t: f64) -> Matrix2<f64> {
    let cti = theta_i.cos();
    let ctt = theta_t.cos();
    let f11 = (n2 * cti - n1 * ctt) / (n2 * cti + n1 * ctt);
    let f22 = (n1 * cti - n2 * ctt) / (n1 * cti + n2 * ctt);
    Matrix2::from_diagonal(&Vector2::new(f11, f22))
}

/// Computes Fresnel amplitude transmission coefficients.
///
/// Same layout as [`refl`].
pub fn refr(n1: f64, n2: f64, theta_i: f64, theta_t: f64) -> Matrix2<f64> {
    let cti = theta_i.cos();
    let ctt = theta_t.cos();
    let f11 = (2.0 * n1 * cti) / (n1 * ctt + n2 * cti);
    let f22 = (2.0 * n1 * cti) / (n1 * cti + n2 * ctt);
    Matrix2::from_diagonal(&Vector2::new(f11, f22))
}

/// Unpolarized reflectance at the interface from `n_from` into `n_to`.
///
/// `theta_i` is measured from the interface normal on the `n_from` side.
/// Returns exactly `1.0` under total internal reflection. Otherwise the
/// result is the mean of the s and p power reflectances, which is NaN if the
/// inputs are not physical (eg. a non-positive index).
///
/// # Example
/// ```rust
/// let r = fringes::fresnel::reflectance(1.0, 1.5, 0.0);
/// assert!((r - 0.04).abs() < 1e-12);
/// ```
pub fn reflectance(n_from: f64, n_to: f64, theta_i: f64) -> f64 {
    if snell::is_tir(n_from, n_to, theta_i) {
        return 1.0;
    }

    let theta_t = snell::get_theta_t(theta_i, n_from, n_to);
    let r = refl(n_from, n_to, theta_i, theta_t);
    let rs = r[(1, 1)].powi(2);
    let rp = r[(0, 0)].powi(2);
    0.5 * (rs + rp)
}
