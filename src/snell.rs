//! Snell's law for real refractive indices.
//!
//! This module provides the refraction angle and the total internal reflection
//! test used at both interfaces of the gap. Indices are real: the media in the
//! interference model are assumed non-absorbing.
//!
//! Neither function validates its inputs. An index that is zero or negative,
//! or an incidence angle past the critical angle, produces NaN from `asin`
//! rather than an error.


/// Returns true if light travelling from `n1` into `n2` at `theta_i` (radians
/// from the normal) is totally internally reflected.
///
/// Only possible when going from a denser to a rarer medium, ie. `n1 > n2`.
pub fn is_tir(n1: f64, n2: f64, theta_i: f64) -> bool {
    n1 > n2 && theta_i.sin() > n2 / n1
}

/// Computes the transmitted angle at a planar interface.
///
/// `sin(theta_t) = n1 * sin(theta_i) / n2`. The result is NaN when no
/// transmitted wave exists, so callers should check [`is_tir`] first.
/// Matched indices return `theta_i` unchanged, so that an index-matched
/// interface reflects exactly nothing.
///
/// # Example
/// ```rust
/// let theta_t = fringes::snell::get_theta_t(0.3, 1.0, 1.5);
/// assert!(theta_t < 0.3);
/// ```
pub fn get_theta_t(theta_i: f64, n1: f64, n2: f64) -> f64 {
    if n1 == n2 {
        return theta_i;
    }

    let sin_t = n1 * theta_i.sin() / n2;
    sin_t.asin()
}
