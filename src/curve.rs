//! Brightness-versus-radius sampling for the 1D plot.

use log::warn;
use ndarray::Array1;
use serde::Serialize;

use crate::brightness::Model;
use crate::params::OpticalParams;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brightness::evaluate;

    #[test]
    fn eleven_samples_over_unit_range() {
        let params = OpticalParams::reference();
        let samples: Vec<_> = sample_curve(&params, 1.0, 0.1).collect();
        assert_eq!(samples.len(), 11);
        for (k, sample) in samples.iter().enumerate() {
            assert!((sample.radius - k as f64 * 0.1).abs() < 1e-12);
        }
        assert_eq!(samples[0].radius, 0.0);
        assert!((samples[10].radius - 1.0).abs() < 1e-12);
    }

    #[test]
    fn count_matches_floor_rule() {
        let params = OpticalParams::reference();
        assert_eq!(sample_curve(&params, 1.0, 0.001).len(), 1001);
        assert_eq!(sample_curve(&params, 0.25, 0.1).len(), 3);
        assert_eq!(sample_curve(&params, 0.0, 0.1).len(), 1);
    }

    #[test]
    fn degenerate_inputs_are_empty() {
        let params = OpticalParams::reference();
        assert_eq!(sample_curve(&params, 1.0, 0.0).count(), 0);
        assert_eq!(sample_curve(&params, 1.0, -0.1).count(), 0);
        assert_eq!(sample_curve(&params, -1.0, 0.1).count(), 0);
        assert_eq!(sample_curve(&params, f64::INFINITY, 0.1).count(), 0);
        assert_eq!(sample_curve(&params, 1.0, f64::NAN).count(), 0);
    }

    #[test]
    fn overflowing_sample_count_is_empty() {
        let params = OpticalParams::reference();
        assert_eq!(sample_count(1e300, 1e-300), 0);
        assert_eq!(sample_count(f64::MAX, f64::MIN_POSITIVE), 0);
        assert_eq!(sample_count(1e20, 1.0), 0);
        assert_eq!(sample_curve(&params, 1e300, 1e-300).count(), 0);
        assert_eq!(sample_count(1e6, 1.0), 1_000_001);
    }

    #[test]
    fn samples_match_model() {
        let params = OpticalParams::reference();
        for sample in sample_curve(&params, 0.5, 0.05) {
            assert_eq!(sample.brightness, evaluate(&params, sample.radius));
        }
        for sample in sample_curve_with(Model::CosineSquared, &params, 0.5, 0.05) {
            assert_eq!(
                sample.brightness,
                Model::CosineSquared.evaluate(&params, sample.radius)
            );
        }
    }

    #[test]
    fn restartable() {
        let params = OpticalParams::reference();
        let samples = sample_curve(&params, 1.0, 0.01);
        let first: Vec<_> = samples.clone().collect();
        let second: Vec<_> = samples.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn size_hint_tracks_progress() {
        let params = OpticalParams::reference();
        let mut samples = sample_curve(&params, 1.0, 0.1);
        samples.next();
        samples.next();
        assert_eq!(samples.len(), 9);
    }

    #[test]
    fn arrays_line_up() {
        let params = OpticalParams::reference();
        let (r, b) = sample_curve(&params, 1.0, 0.1).into_arrays();
        assert_eq!(r.len(), 11);
        assert_eq!(b.len(), 11);
        assert_eq!(b[0], evaluate(&params, 0.0));
    }
}

/// One point of the brightness curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RadiusSample {
    pub radius: f64,
    pub brightness: f64,
}

/// Lazy sequence of [`RadiusSample`]s at `r = k * step` for `r <= r_max`.
///
/// Cloning gives an independent sequence from the current position, so a
/// fresh clone of a new sampler replays the whole curve.
#[derive(Debug, Clone)]
pub struct CurveSamples {
    model: Model,
    params: OpticalParams,
    step: f64,
    index: usize,
    count: usize,
}

impl CurveSamples {
    pub fn new(model: Model, params: &OpticalParams, r_max: f64, step: f64) -> Self {
        let count = sample_count(r_max, step);
        Self {
            model,
            params: *params,
            step,
            index: 0,
            count,
        }
    }

    /// Collects the remaining samples into radius and brightness arrays.
    pub fn into_arrays(self) -> (Array1<f64>, Array1<f64>) {
        let (radii, brightness): (Vec<f64>, Vec<f64>) =
            self.map(|s| (s.radius, s.brightness)).unzip();
        (Array1::from(radii), Array1::from(brightness))
    }
}

impl Iterator for CurveSamples {
    type Item = RadiusSample;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.count {
            return None;
        }
        // multiply rather than accumulate so radii do not drift
        let radius = self.index as f64 * self.step;
        self.index += 1;
        Some(RadiusSample {
            radius,
            brightness: self.model.evaluate(&self.params, radius),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for CurveSamples {}

/// Number of samples in `[0, r_max]` at spacing `step`: `floor(r_max / step) + 1`.
///
/// Zero for a non-positive step, a negative range or non-finite input, and
/// when the count itself does not fit in a `usize`.
pub fn sample_count(r_max: f64, step: f64) -> usize {
    let valid = step.is_finite() && r_max.is_finite() && step > 0.0 && r_max >= 0.0;
    if !valid {
        warn!(
            "Cannot sample brightness curve with r_max {} and step {}",
            r_max, step
        );
        return 0;
    }

    // finite inputs can still overflow the ratio, eg. 1e300 / 1e-300
    let ratio = (r_max / step).floor();
    if !ratio.is_finite() || ratio >= usize::MAX as f64 {
        warn!(
            "Brightness curve with r_max {} and step {} has too many samples",
            r_max, step
        );
        return 0;
    }
    (ratio as usize).checked_add(1).unwrap_or(0)
}

/// Samples the Fresnel brightness curve over `[0, r_max]`.
pub fn sample_curve(params: &OpticalParams, r_max: f64, step: f64) -> CurveSamples {
    CurveSamples::new(Model::Fresnel, params, r_max, step)
}

/// Samples the brightness curve of `model` over `[0, r_max]`.
pub fn sample_curve_with(
    model: Model,
    params: &OpticalParams,
    r_max: f64,
    step: f64,
) -> CurveSamples {
    CurveSamples::new(model, params, r_max, step)
}
