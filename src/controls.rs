//! Bounded integer controls for the interactive parameters.
//!
//! A control is an integer slider position; its physical value is
//! `position / scale + offset`. Positions are clamped to `[min, max]`, so a
//! control whose range maps to valid values can never hand the model an
//! invalid parameter.

use std::fmt;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::params::OpticalParams;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_from_position() {
        let spec = ControlSpec::new(100.0, 0.0, 1, 2000);
        let control = Control::new("n1", spec, 300);
        assert_eq!(control.value(), 3.0);

        let spec = ControlSpec::new(10.0, 5.0, 0, 100);
        let control = Control::new("x", spec, 25);
        assert_eq!(control.value(), 7.5);
    }

    #[test]
    fn zero_scale_gives_zero() {
        let spec = ControlSpec::new(0.0, 3.0, 0, 100);
        let control = Control::new("broken", spec, 50);
        assert_eq!(control.value(), 0.0);
    }

    #[test]
    fn step_is_clamped() {
        let spec = ControlSpec::new(1.0, 0.0, 10, 20);
        let mut control = Control::new("lambda", spec, 15);
        assert!(control.step(3));
        assert_eq!(control.position(), 18);
        assert!(control.step(100));
        assert_eq!(control.position(), 20);
        assert!(!control.step(1));
        assert!(control.step(-100));
        assert_eq!(control.position(), 10);
    }

    #[test]
    fn position_round_trips_through_value() {
        let spec = ControlSpec::new(10.0, 0.0, 0, 20000);
        let control = Control::from_value("thickness", spec, 744.0);
        assert_eq!(control.position(), 7440);
        assert_eq!(control.value(), 744.0);
    }

    #[test]
    fn from_value_clamps() {
        let spec = ControlSpec::new(100.0, 0.0, 1, 2000);
        let control = Control::from_value("n2", spec, 50.0);
        assert_eq!(control.position(), 2000);
    }

    #[test]
    fn panel_rebuilds_params() {
        let params = OpticalParams::reference();
        let panel = ControlPanel::new(&ControlScales::default(), &params);
        assert_eq!(panel.to_params(), params);
    }

    #[test]
    fn panel_selection_drives_params() {
        let params = OpticalParams::reference();
        let mut panel = ControlPanel::new(&ControlScales::default(), &params);
        panel.select(1);
        assert_eq!(panel.selected().name(), "n1");
        assert!(panel.step_selected(10));
        assert!((panel.to_params().n1 - 3.1).abs() < 1e-12);
        assert_eq!(panel.to_params().n2, params.n2);
    }

    #[test]
    fn default_scales_are_valid() {
        assert!(ControlScales::default().validate().is_ok());
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let mut scales = ControlScales::default();
        scales.n1 = ControlSpec::new(100.0, 0.0, 10, 5);
        let err = scales.validate().unwrap_err();
        assert!(err.to_string().contains("n1"), "{}", err);
    }

    #[test]
    fn vanishing_scale_is_rejected() {
        let mut scales = ControlScales::default();
        scales.n2.scale = 0.0;
        assert!(scales.validate().is_err());

        let mut scales = ControlScales::default();
        scales.gap_thickness.scale = f64::NAN;
        assert!(scales.validate().is_err());
    }

    #[test]
    fn positive_controls_cannot_reach_zero() {
        let mut scales = ControlScales::default();
        scales.wavelength.min = 0;
        assert!(scales.validate().is_err());

        let mut scales = ControlScales::default();
        scales.n3 = ControlSpec::new(-100.0, 0.0, 1, 2000);
        assert!(scales.validate().is_err());

        // thickness and focal length may be zero
        let mut scales = ControlScales::default();
        scales.focal_length.min = 0;
        scales.gap_thickness.min = 0;
        assert!(scales.validate().is_ok());
    }

    #[test]
    fn validated_panel_stays_valid() {
        let scales = ControlScales::default();
        scales.validate().unwrap();
        let mut panel = ControlPanel::new(&scales, &OpticalParams::reference());
        for index in 0..6 {
            panel.select(index);
            panel.step_selected(-100_000);
            assert!(panel.to_params().validate().is_ok());
        }
    }

    #[test]
    fn label_has_two_decimals() {
        let spec = ControlSpec::new(100.0, 0.0, 1, 2000);
        let control = Control::new("n3", spec, 1000);
        assert_eq!(control.to_string(), "n3: 10.00");
    }
}

/// Mapping and bounds for one control.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlSpec {
    pub scale: f64,
    #[serde(default)]
    pub offset: f64,
    pub min: i32,
    pub max: i32,
}

impl ControlSpec {
    pub fn new(scale: f64, offset: f64, min: i32, max: i32) -> Self {
        Self {
            scale,
            offset,
            min,
            max,
        }
    }

    /// Physical value at `position`. Zero for a vanishing scale.
    pub fn to_value(&self, position: i32) -> f64 {
        if self.scale.abs() <= f64::EPSILON {
            return 0.0;
        }
        position as f64 / self.scale + self.offset
    }

    /// Checks that the bounds are ordered and the scale is usable.
    ///
    /// With `positive`, every position in `[min, max]` must also map to a
    /// value greater than zero.
    pub fn validate(&self, name: &str, positive: bool) -> Result<()> {
        if self.min > self.max {
            return Err(anyhow!(
                "Control {} has min {} greater than max {}",
                name,
                self.min,
                self.max
            ));
        }
        if !self.scale.is_finite() || self.scale.abs() <= f64::EPSILON {
            return Err(anyhow!(
                "Control {} must have a finite non-zero scale, got {}",
                name,
                self.scale
            ));
        }
        if !self.offset.is_finite() {
            return Err(anyhow!(
                "Control {} must have a finite offset, got {}",
                name,
                self.offset
            ));
        }
        // value is monotonic in position, so the ends bound the range
        let lowest = self.to_value(self.min).min(self.to_value(self.max));
        if positive && lowest <= 0.0 {
            return Err(anyhow!(
                "Control {} must stay greater than 0, but can reach {}",
                name,
                lowest
            ));
        }
        Ok(())
    }

    /// Nearest in-range position for a physical value.
    pub fn to_position(&self, value: f64) -> i32 {
        let position = ((value - self.offset) * self.scale).round();
        (position as i32).clamp(self.min, self.max)
    }
}

/// Control specs for the six parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlScales {
    pub gap_thickness: ControlSpec,
    pub n1: ControlSpec,
    pub n2: ControlSpec,
    pub n3: ControlSpec,
    pub wavelength: ControlSpec,
    pub focal_length: ControlSpec,
}

impl ControlScales {
    /// Validates every control. Indices and wavelength must stay positive.
    pub fn validate(&self) -> Result<()> {
        self.gap_thickness.validate("gap_thickness", false)?;
        self.n1.validate("n1", true)?;
        self.n2.validate("n2", true)?;
        self.n3.validate("n3", true)?;
        self.wavelength.validate("wavelength", true)?;
        self.focal_length.validate("focal_length", false)?;
        Ok(())
    }
}

impl Default for ControlScales {
    fn default() -> Self {
        Self {
            gap_thickness: ControlSpec::new(10.0, 0.0, 0, 20000),
            n1: ControlSpec::new(100.0, 0.0, 1, 2000),
            n2: ControlSpec::new(100.0, 0.0, 1, 2000),
            n3: ControlSpec::new(100.0, 0.0, 1, 2000),
            wavelength: ControlSpec::new(1.0, 0.0, 1, 1000),
            focal_length: ControlSpec::new(100.0, 0.0, 0, 1000),
        }
    }
}

/// A named control at a position.
#[derive(Debug, Clone, PartialEq)]
pub struct Control {
    name: &'static str,
    spec: ControlSpec,
    position: i32,
}

impl Control {
    pub fn new(name: &'static str, spec: ControlSpec, position: i32) -> Self {
        Self {
            name,
            spec,
            position: position.clamp(spec.min, spec.max),
        }
    }

    pub fn from_value(name: &'static str, spec: ControlSpec, value: f64) -> Self {
        Self::new(name, spec, spec.to_position(value))
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn position(&self) -> i32 {
        self.position
    }

    pub fn value(&self) -> f64 {
        self.spec.to_value(self.position)
    }

    /// Moves the position by `delta`, clamped. Returns true if it changed.
    pub fn step(&mut self, delta: i32) -> bool {
        let position = self
            .position
            .saturating_add(delta)
            .clamp(self.spec.min, self.spec.max);
        let changed = position != self.position;
        self.position = position;
        changed
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:.2}", self.name, self.value())
    }
}

/// The six controls, in display order, with one selected for editing.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlPanel {
    controls: [Control; 6],
    selected: usize,
}

impl ControlPanel {
    pub fn new(scales: &ControlScales, params: &OpticalParams) -> Self {
        let controls = [
            Control::from_value("E", scales.gap_thickness, params.gap_thickness),
            Control::from_value("n1", scales.n1, params.n1),
            Control::from_value("n2", scales.n2, params.n2),
            Control::from_value("n3", scales.n3, params.n3),
            Control::from_value("lambda", scales.wavelength, params.wavelength),
            Control::from_value("F", scales.focal_length, params.focal_length),
        ];
        Self {
            controls,
            selected: 0,
        }
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> &Control {
        &self.controls[self.selected]
    }

    /// Selects control `index`, ignoring out-of-range indices.
    pub fn select(&mut self, index: usize) {
        if index < self.controls.len() {
            self.selected = index;
        }
    }

    pub fn step_selected(&mut self, delta: i32) -> bool {
        self.controls[self.selected].step(delta)
    }

    /// A fresh parameter snapshot from the current positions.
    pub fn to_params(&self) -> OpticalParams {
        let [e, n1, n2, n3, wavelength, focal_length] = &self.controls;
        OpticalParams::new(
            e.value(),
            n1.value(),
            n2.value(),
            n3.value(),
            wavelength.value(),
            focal_length.value(),
        )
    }
}
