//! Newton's rings: brightness of thin-film interference around an optical axis.
//!
//! The core is [`brightness::evaluate`], which maps an [`params::OpticalParams`]
//! snapshot and a radius to a brightness in `[0, 1]`. [`curve`] samples it
//! along the radius and [`ring`] rasterizes it into a grayscale ring image.

pub mod brightness;
pub mod controls;
pub mod curve;
pub mod fresnel;
#[cfg(feature = "visualization")]
pub mod helpers;
pub mod output;
pub mod params;
pub mod ring;
pub mod scene;
pub mod settings;
pub mod snell;
#[cfg(feature = "visualization")]
pub mod viewer;
