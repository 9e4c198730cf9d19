use fringes::{
    brightness::{self, Model},
    fresnel,
    params::OpticalParams,
    ring::{render_ring_par, render_ring_with},
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::f64::consts::FRAC_PI_2;

fn random_params(rng: &mut StdRng) -> OpticalParams {
    OpticalParams::new(
        rng.random_range(0.0..2000.0),
        rng.random_range(0.5..4.0),
        rng.random_range(0.5..4.0),
        rng.random_range(0.5..4.0),
        rng.random_range(100.0..1000.0),
        rng.random_range(0.01..5.0),
    )
}

#[test]
fn brightness_stays_in_unit_interval() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..2000 {
        let params = random_params(&mut rng);
        let radius = rng.random_range(0.0..10.0);
        for model in [Model::Fresnel, Model::CosineSquared] {
            let b = model.evaluate(&params, radius);
            assert!(
                (0.0..=1.0).contains(&b),
                "{:?} {} r={}: {}",
                model,
                params,
                radius,
                b
            );
        }
    }
}

#[test]
fn dark_for_any_radius_without_focus() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let mut params = random_params(&mut rng);
        params.focal_length = -rng.random_range(0.0..5.0);
        let radius = rng.random_range(0.0..10.0);
        assert_eq!(brightness::evaluate(&params, radius), 0.0);
    }
}

#[test]
fn total_internal_reflection_is_full() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..500 {
        let n_to: f64 = rng.random_range(0.5..2.0);
        let n_from = n_to + rng.random_range(0.1..2.0);
        let critical = (n_to / n_from).asin();
        let angle = rng.random_range(critical + 1e-9..FRAC_PI_2);
        if angle.sin() > n_to / n_from {
            assert_eq!(fresnel::reflectance(n_from, n_to, angle), 1.0);
        }
    }
}

#[test]
fn matched_indices_never_reflect() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..500 {
        let n = rng.random_range(0.5..5.0);
        let angle = rng.random_range(1e-6..FRAC_PI_2);
        assert_eq!(fresnel::reflectance(n, n, angle), 0.0);
    }
}

#[test]
fn parallel_rendering_is_identical() {
    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..5 {
        let params = random_params(&mut rng);
        let width = rng.random_range(1..80);
        let height = rng.random_range(1..80);
        for model in [Model::Fresnel, Model::CosineSquared] {
            assert_eq!(
                render_ring_with(model, &params, 1.5, width, height),
                render_ring_par(model, &params, 1.5, width, height)
            );
        }
    }
}
