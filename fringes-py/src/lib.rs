use fringes::{brightness::Model, curve, params::OpticalParams, ring};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

/// Physical parameters of the interference setup.
#[pyclass(name = "Params")]
#[derive(Debug, Clone, Copy)]
struct PyParams {
    inner: OpticalParams,
}

#[pymethods]
impl PyParams {
    #[new]
    #[pyo3(signature = (gap_thickness=744.0, n1=3.0, n2=5.0, n3=10.0, wavelength=163.0, focal_length=1.0))]
    fn py_new(
        gap_thickness: f64,
        n1: f64,
        n2: f64,
        n3: f64,
        wavelength: f64,
        focal_length: f64,
    ) -> PyResult<Self> {
        let inner = OpticalParams::new(gap_thickness, n1, n2, n3, wavelength, focal_length);
        inner
            .validate()
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(Self { inner })
    }

    #[getter]
    fn gap_thickness(&self) -> f64 {
        self.inner.gap_thickness
    }

    #[getter]
    fn n1(&self) -> f64 {
        self.inner.n1
    }

    #[getter]
    fn n2(&self) -> f64 {
        self.inner.n2
    }

    #[getter]
    fn n3(&self) -> f64 {
        self.inner.n3
    }

    #[getter]
    fn wavelength(&self) -> f64 {
        self.inner.wavelength
    }

    #[getter]
    fn focal_length(&self) -> f64 {
        self.inner.focal_length
    }

    fn __repr__(&self) -> String {
        format!("Params({})", self.inner)
    }
}

fn parse_model(name: &str) -> PyResult<Model> {
    match name {
        "fresnel" => Ok(Model::Fresnel),
        "cosine-squared" => Ok(Model::CosineSquared),
        _ => Err(PyValueError::new_err(format!(
            "Unknown model '{}', expected 'fresnel' or 'cosine-squared'",
            name
        ))),
    }
}

/// Brightness in [0, 1] at `radius` from the optical axis.
#[pyfunction]
#[pyo3(signature = (params, radius, model="fresnel"))]
fn evaluate_brightness(params: &PyParams, radius: f64, model: &str) -> PyResult<f64> {
    Ok(parse_model(model)?.evaluate(&params.inner, radius))
}

/// List of (radius, brightness) pairs for r = 0, step, 2 step, ... <= r_max.
#[pyfunction]
#[pyo3(signature = (params, r_max, step, model="fresnel"))]
fn sample_curve(params: &PyParams, r_max: f64, step: f64, model: &str) -> PyResult<Vec<(f64, f64)>> {
    let model = parse_model(model)?;
    Ok(curve::sample_curve_with(model, &params.inner, r_max, step)
        .map(|s| (s.radius, s.brightness))
        .collect())
}

/// Row-major grayscale bytes of a width x height ring image.
#[pyfunction]
#[pyo3(signature = (params, r_max, width, height, model="fresnel"))]
fn render_ring(
    py: Python<'_>,
    params: &PyParams,
    r_max: f64,
    width: usize,
    height: usize,
    model: &str,
) -> PyResult<Vec<u8>> {
    let model = parse_model(model)?;
    let inner = params.inner;
    let image = py.allow_threads(|| ring::render_ring_par(model, &inner, r_max, width, height));
    Ok(image.to_luma())
}

/// Newton's rings interference brightness.
#[pymodule]
fn fringes_py(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyParams>()?;
    m.add_function(wrap_pyfunction!(evaluate_brightness, m)?)?;
    m.add_function(wrap_pyfunction!(sample_curve, m)?)?;
    m.add_function(wrap_pyfunction!(render_ring, m)?)?;
    Ok(())
}
