//! Physical parameters of the interference setup.
//!
//! A light ray leaves the focal point, crosses the entry medium (`n1`), is
//! partly reflected at the top of the gap, crosses the gap/film (`n2`) of
//! thickness `gap_thickness`, and is partly reflected at the substrate (`n3`).
//! The two reflected beams interfere.
//!
//! [`OpticalParams`] is a plain value. Every parameter change produces a new
//! snapshot and nothing holds on to an old one, so evaluation never observes a
//! half-updated setup.

use std::fmt;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};


/// Parameters for one evaluation of the brightness model.
///
/// The model itself does not check these. Indices and wavelength must be
/// positive and finite, otherwise `asin` and the divisions in the model
/// produce NaN. Use [`OpticalParams::validate`] where values enter the program.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpticalParams {
    /// Gap (film) thickness, in the same units as `wavelength`.
    pub gap_thickness: f64,
    /// Refractive index of the entry medium.
    pub n1: f64,
    /// Refractive index of the gap.
    pub n2: f64,
    /// Refractive index of the substrate.
    pub n3: f64,
    pub wavelength: f64,
    /// Distance from the focal point to the gap. Brightness is zero everywhere if this is not positive.
    pub focal_length: f64,
}

impl OpticalParams {
    pub fn new(
        gap_thickness: f64,
        n1: f64,
        n2: f64,
        n3: f64,
        wavelength: f64,
        focal_length: f64,
    ) -> Self {
        Self {
            gap_thickness,
            n1,
            n2,
            n3,
            wavelength,
            focal_length,
        }
    }

    /// The setup the application starts with.
    pub fn reference() -> Self {
        Self::new(744.0, 3.0, 5.0, 10.0, 163.0, 1.0)
    }

    /// Checks that the parameters are safe to hand to the model.
    ///
    /// A non-positive focal length passes, since the model defines it as a
    /// dark setup.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("gap_thickness", self.gap_thickness),
            ("n1", self.n1),
            ("n2", self.n2),
            ("n3", self.n3),
            ("wavelength", self.wavelength),
            ("focal_length", self.focal_length),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, value)| !value.is_finite()) {
            return Err(anyhow!("{} must be finite, got {}", name, value));
        }

        for (name, value) in [("n1", self.n1), ("n2", self.n2), ("n3", self.n3)] {
            if value <= 0.0 {
                return Err(anyhow!(
                    "Refractive index {} must be greater than 0, got {}",
                    name,
                    value
                ));
            }
        }
        if self.wavelength <= 0.0 {
            return Err(anyhow!(
                "Wavelength must be greater than 0, got {}",
                self.wavelength
            ));
        }

        Ok(())
    }
}

impl Default for OpticalParams {
    fn default() -> Self {
        Self::reference()
    }
}

impl fmt::Display for OpticalParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "gap_thickness={} n1={} n2={} n3={} wavelength={} focal_length={}",
            self.gap_thickness, self.n1, self.n2, self.n3, self.wavelength, self.focal_length,
        )
    }
}
