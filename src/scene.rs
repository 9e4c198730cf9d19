//! Current curve and ring image for one parameter snapshot.
//!
//! A [`Scene`] owns the current [`OpticalParams`] and the two views computed
//! from it. Each kind of change recomputes exactly the views it affects:
//!
//! - new parameters or a new radial range: curve and ring
//! - new image size: ring only
//!
//! Recomputation always runs to completion before the setter returns.

use std::time::Instant;

use log::debug;

use crate::brightness::Model;
use crate::curve::{sample_curve_with, RadiusSample};
use crate::params::OpticalParams;
use crate::ring::{render_ring_with, RingImage};
use crate::settings::Settings;

/// Smallest visible radial range.
pub const MIN_R_MAX: f64 = 0.1;
/// The brightness axis is fixed.
pub const Y_RANGE: (f64, f64) = (0.0, 1.0);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brightness::evaluate;

    fn scene() -> Scene {
        Scene::new(Model::Fresnel, OpticalParams::reference(), 1.0, 0.1, 40, 30)
    }

    #[test]
    fn clamps_visible_range() {
        assert_eq!(clamp_r_max(0.0), MIN_R_MAX);
        assert_eq!(clamp_r_max(-3.0), MIN_R_MAX);
        assert_eq!(clamp_r_max(0.05), MIN_R_MAX);
        assert_eq!(clamp_r_max(f64::NAN), MIN_R_MAX);
        assert_eq!(clamp_r_max(2.5), 2.5);
    }

    #[test]
    fn new_scene_is_computed() {
        let scene = scene();
        assert_eq!(scene.curve().len(), 11);
        assert_eq!(scene.ring().width(), 40);
        assert_eq!(scene.ring().height(), 30);
    }

    #[test]
    fn params_change_updates_both_views() {
        let mut scene = scene();
        let params = OpticalParams::new(300.0, 1.0, 1.5, 1.2, 500.0, 1.0);
        scene.set_params(params);
        assert_eq!(scene.curve()[3].brightness, evaluate(&params, scene.curve()[3].radius));
        assert_eq!(scene.ring(), &render_ring_with(Model::Fresnel, &params, 1.0, 40, 30));
    }

    #[test]
    fn resize_only_touches_ring() {
        let mut scene = scene();
        let curve = scene.curve().to_vec();
        scene.resize(10, 20);
        assert_eq!(scene.ring().width(), 10);
        assert_eq!(scene.ring().height(), 20);
        assert_eq!(scene.curve(), curve.as_slice());
    }

    #[test]
    fn range_change_is_clamped_and_resamples() {
        let mut scene = scene();
        scene.set_x_range(-1.0);
        assert_eq!(scene.r_max(), MIN_R_MAX);
        assert_eq!(scene.curve().len(), 2);

        scene.set_x_range(2.0);
        assert_eq!(scene.curve().len(), 21);
    }

    #[test]
    fn model_change_recomputes() {
        let mut scene = scene();
        scene.set_model(Model::CosineSquared);
        let params = OpticalParams::reference();
        assert_eq!(
            scene.curve()[5].brightness,
            Model::CosineSquared.evaluate(&params, scene.curve()[5].radius)
        );
    }
}

/// Clamps the upper end of the radial axis to at least [`MIN_R_MAX`].
pub fn clamp_r_max(upper: f64) -> f64 {
    if upper.is_nan() {
        return MIN_R_MAX;
    }
    upper.max(MIN_R_MAX)
}

/// Curve and ring image for the current parameters, recomputed on every change.
#[derive(Debug, Clone)]
pub struct Scene {
    model: Model,
    params: OpticalParams,
    r_max: f64,
    curve_step: f64,
    width: usize,
    height: usize,
    curve: Vec<RadiusSample>,
    ring: RingImage,
}

impl Scene {
    pub fn new(
        model: Model,
        params: OpticalParams,
        r_max: f64,
        curve_step: f64,
        width: usize,
        height: usize,
    ) -> Self {
        let r_max = clamp_r_max(r_max);
        let curve = sample_curve_with(model, &params, r_max, curve_step).collect();
        let ring = render_ring_with(model, &params, r_max, width, height);
        Self {
            model,
            params,
            r_max,
            curve_step,
            width,
            height,
            curve,
            ring,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.model,
            settings.params,
            settings.r_max,
            settings.curve_step,
            settings.width,
            settings.height,
        )
    }

    pub fn model(&self) -> Model {
        self.model
    }

    pub fn params(&self) -> &OpticalParams {
        &self.params
    }

    pub fn r_max(&self) -> f64 {
        self.r_max
    }

    pub fn curve(&self) -> &[RadiusSample] {
        &self.curve
    }

    pub fn ring(&self) -> &RingImage {
        &self.ring
    }

    pub fn set_params(&mut self, params: OpticalParams) {
        self.params = params;
        self.update_curve();
        self.update_ring();
    }

    pub fn set_model(&mut self, model: Model) {
        self.model = model;
        self.update_curve();
        self.update_ring();
    }

    /// Sets the upper end of the radial axis. The lower end is always 0.
    pub fn set_x_range(&mut self, upper: f64) {
        self.r_max = clamp_r_max(upper);
        self.update_curve();
        self.update_ring();
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.update_ring();
    }

    fn update_curve(&mut self) {
        let start = Instant::now();
        self.curve = sample_curve_with(self.model, &self.params, self.r_max, self.curve_step)
            .collect();
        debug!(
            "Sampled {} curve points in {:.2?}",
            self.curve.len(),
            start.elapsed()
        );
    }

    fn update_ring(&mut self) {
        let start = Instant::now();
        self.ring = render_ring_with(self.model, &self.params, self.r_max, self.width, self.height);
        debug!(
            "Rendered {}x{} rings in {:.2?}",
            self.width,
            self.height,
            start.elapsed()
        );
    }
}
