//! Shared testing utilities: seeded synthetic screening data and
//! assertion helpers.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A synthetic virtual screen: true activities, noisy model predictions and
/// a per-sample stratification label.
#[derive(Debug, Clone)]
pub struct ScreenFixture {
    pub y_true: Vec<f64>,
    pub y_pred: Vec<f64>,
    pub labels: Vec<u32>,
}

/// Uniform true values in `[0, 1)`, predictions equal to the truth plus
/// uniform noise in `[-noise, noise)`, and labels uniform in `0..num_labels`.
///
/// The same seed always yields the same screen.
pub fn synthetic_screen(n: usize, noise: f64, num_labels: u32, seed: u64) -> ScreenFixture {
    let mut rng = StdRng::seed_from_u64(seed);

    let y_true: Vec<f64> = (0..n).map(|_| rng.gen_range(0.0..1.0)).collect();
    let y_pred: Vec<f64> = y_true
        .iter()
        .map(|&t| if noise > 0.0 { t + rng.gen_range(-noise..noise) } else { t })
        .collect();
    let labels: Vec<u32> = (0..n).map(|_| rng.gen_range(0..num_labels.max(1))).collect();

    ScreenFixture { y_true, y_pred, labels }
}

/// Screen whose predictions carry no information about the truth.
pub fn random_screen(n: usize, seed: u64) -> ScreenFixture {
    let mut rng = StdRng::seed_from_u64(seed);
    let y_true: Vec<f64> = (0..n).map(|_| rng.gen_range(0.0..1.0)).collect();
    let y_pred: Vec<f64> = (0..n).map(|_| rng.gen_range(0.0..1.0)).collect();
    ScreenFixture { y_true, y_pred, labels: vec![0; n] }
}

/// Install a test subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Assert two float sequences agree within `tol`, showing a diff on failure.
pub fn assert_close(actual: &[f64], expected: &[f64], tol: f64) {
    let within = actual.len() == expected.len()
        && actual.iter().zip(expected).all(|(a, e)| (a - e).abs() <= tol);
    if !within {
        pretty_assertions::assert_eq!(actual, expected, "values differ by more than {tol}");
    }
}
