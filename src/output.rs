use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use itertools::Itertools;
use log::info;

use crate::curve::{sample_curve_with, RadiusSample};
use crate::params::OpticalParams;
use crate::ring::{render_ring_par_progress, render_ring_with, RingImage};
use crate::settings::Settings;

pub const CURVE_FILE: &str = "brightness_curve";
pub const RING_FILE: &str = "rings.png";
pub const PARAMS_FILE: &str = "params.json";
pub const SETTINGS_FILE: &str = "settings.toml";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::sample_curve;
    use crate::ring::render_ring;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("fringes-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn curve_survives_text_format() {
        let dir = scratch_dir("curve");
        let path = dir.join(CURVE_FILE);
        let params = OpticalParams::reference();
        let samples: Vec<_> = sample_curve(&params, 1.0, 0.01).collect();

        write_curve(&path, &params, &samples).unwrap();
        let read = read_curve(&path).unwrap();

        assert_eq!(read, samples);
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("# gap_thickness=744 n1=3"));
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn malformed_curve_line_is_an_error() {
        let dir = scratch_dir("malformed");
        let path = dir.join(CURVE_FILE);
        fs::write(&path, "# header\n0.0 0.5\n0.1\n").unwrap();
        assert!(read_curve(&path).is_err());
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn ring_png_has_image_size() {
        let dir = scratch_dir("png");
        let path = dir.join(RING_FILE);
        let ring = render_ring(&OpticalParams::reference(), 1.0, 24, 16);

        write_ring_png(&path, &ring).unwrap();

        let decoded = image::open(&path).unwrap().to_luma8();
        assert_eq!(decoded.dimensions(), (24, 16));
        assert_eq!(decoded.get_pixel(12, 8)[0], ring.get(12, 8).unwrap());
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn empty_ring_is_not_written() {
        let dir = scratch_dir("empty");
        let ring = render_ring(&OpticalParams::reference(), 1.0, 0, 16);
        assert!(write_ring_png(dir.join(RING_FILE), &ring).is_err());
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn params_json_round_trip() {
        let dir = scratch_dir("json");
        let path = dir.join(PARAMS_FILE);
        let params = OpticalParams::new(100.0, 1.0, 1.33, 1.5, 550.0, 2.0);
        write_params(&path, &params).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let read: OpticalParams = serde_json::from_str(&text).unwrap();
        assert_eq!(read, params);
        fs::remove_dir_all(dir).unwrap();
    }
}

/// Write the brightness curve as `radius brightness` lines under a parameter header.
pub fn write_curve<P: AsRef<Path>>(
    path: P,
    params: &OpticalParams,
    samples: &[RadiusSample],
) -> Result<()> {
    let file = File::create(path.as_ref())
        .with_context(|| format!("Failed to create {:?}", path.as_ref()))?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "# {}", params)?;
    for sample in samples {
        writeln!(writer, "{} {}", sample.radius, sample.brightness)?;
    }
    writer.flush()?;

    Ok(())
}

/// Read a curve written by [`write_curve`]. Lines starting with `#` and blank lines are skipped.
pub fn read_curve<P: AsRef<Path>>(path: P) -> Result<Vec<RadiusSample>> {
    let file = File::open(path.as_ref())
        .with_context(|| format!("Failed to open {:?}", path.as_ref()))?;
    let reader = BufReader::new(file);
    let mut samples = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let values: Vec<f64> = line
            .split_whitespace()
            .map(str::parse::<f64>)
            .collect::<Result<_, _>>()
            .with_context(|| format!("Invalid number on line {}", index + 1))?;
        match values[..] {
            [radius, brightness] => samples.push(RadiusSample { radius, brightness }),
            _ => {
                return Err(anyhow!(
                    "Expected 2 values on line {}, got {}",
                    index + 1,
                    values.len()
                ))
            }
        }
    }

    Ok(samples)
}

/// Save the ring image as an 8-bit grayscale PNG.
pub fn write_ring_png<P: AsRef<Path>>(path: P, ring: &RingImage) -> Result<()> {
    let (width, height) = (ring.width(), ring.height());
    if width == 0 || height == 0 {
        return Err(anyhow!("Invalid dimensions: {}x{}", width, height));
    }

    let buffer = image::GrayImage::from_raw(width as u32, height as u32, ring.to_luma())
        .ok_or_else(|| anyhow!("Failed to create image buffer from ring image"))?;
    buffer
        .save(path.as_ref())
        .with_context(|| format!("Failed to save image {:?}", path.as_ref()))?;

    Ok(())
}

/// Write the parameter snapshot as JSON.
pub fn write_params<P: AsRef<Path>>(path: P, params: &OpticalParams) -> Result<()> {
    let file = File::create(path.as_ref())
        .with_context(|| format!("Failed to create {:?}", path.as_ref()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, params)?;
    writer.flush()?;
    Ok(())
}

/// Write the effective settings as TOML, loadable as `config/local.toml`.
pub fn write_settings<P: AsRef<Path>>(path: P, settings: &Settings) -> Result<()> {
    let text = toml::to_string(settings).context("Failed to serialize settings")?;
    fs::write(path.as_ref(), text)
        .with_context(|| format!("Failed to write {:?}", path.as_ref()))?;
    Ok(())
}

/// Compute the curve and ring image for `settings` and write all output files.
///
/// Returns the output directory.
pub fn writeup(settings: &Settings, parallel: bool) -> Result<PathBuf> {
    let dir = PathBuf::from(&settings.output_dir);
    fs::create_dir_all(&dir).with_context(|| format!("Failed to create {:?}", dir))?;
    let params = &settings.params;

    let start = Instant::now();
    let samples: Vec<_> =
        sample_curve_with(settings.model, params, settings.r_max, settings.curve_step).collect();
    info!(
        "Sampled {} curve points in {:.2?}",
        samples.len(),
        start.elapsed()
    );

    let start = Instant::now();
    let ring = if parallel {
        let pb = ProgressBar::new(settings.height as u64);
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] {bar:40.green/blue} {pos:>5}/{len:5} {msg} ETA: {eta_precise}",
            )?
            .progress_chars("█▇▆▅▄▃▂▁"),
        );
        pb.set_message("rows".to_string());
        let ring = render_ring_par_progress(
            settings.model,
            params,
            settings.r_max,
            settings.width,
            settings.height,
            &pb,
        );
        pb.finish_and_clear();
        ring
    } else {
        render_ring_with(
            settings.model,
            params,
            settings.r_max,
            settings.width,
            settings.height,
        )
    };
    info!(
        "Rendered {}x{} rings in {:.2?}",
        settings.width,
        settings.height,
        start.elapsed()
    );

    write_curve(dir.join(CURVE_FILE), params, &samples)?;
    write_ring_png(dir.join(RING_FILE), &ring)?;
    write_params(dir.join(PARAMS_FILE), params)?;
    write_settings(dir.join(SETTINGS_FILE), settings)?;

    info!(
        "Wrote {}",
        [CURVE_FILE, RING_FILE, PARAMS_FILE, SETTINGS_FILE]
            .iter()
            .map(|name| dir.join(name).display().to_string())
            .join(", ")
    );

    Ok(dir)
}
