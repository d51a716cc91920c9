//! Common test utilities and data generators.

#![allow(dead_code)]

use faer::{Col, Mat};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// Generate simple linear data: y = x * beta + intercept + noise, beta_j = j + 1.
pub fn generate_linear_data(
    n_samples: usize,
    n_features: usize,
    intercept: f64,
    noise_std: f64,
    seed: u64,
) -> (Mat<f64>, Col<f64>, Col<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, noise_std).expect("valid noise std");

    let true_coefficients = Col::from_fn(n_features, |j| (j + 1) as f64);
    let mut x = Mat::zeros(n_samples, n_features);
    let mut y = Col::zeros(n_samples);

    for i in 0..n_samples {
        let mut yi = intercept;
        for j in 0..n_features {
            x[(i, j)] = rng.gen_range(-1.0..1.0);
            yi += x[(i, j)] * true_coefficients[j];
        }
        y[i] = yi + noise.sample(&mut rng);
    }

    (x, y, true_coefficients)
}

/// One predictor on [1, 10] with noise whose spread grows with it.
pub fn generate_heteroscedastic_data(n_samples: usize, seed: u64) -> (Mat<f64>, Col<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 1.0).expect("valid noise std");

    let mut x = Mat::zeros(n_samples, 1);
    let mut y = Col::zeros(n_samples);
    for i in 0..n_samples {
        let xi: f64 = rng.gen_range(1.0..10.0);
        x[(i, 0)] = xi;
        y[i] = 1.0 + 2.0 * xi + 0.8 * xi * xi * noise.sample(&mut rng);
    }
    (x, y)
}

/// Generate data with collinear features: x1 = 2 * x0.
pub fn generate_collinear_data(n_samples: usize) -> (Mat<f64>, Col<f64>) {
    let x = Mat::from_fn(n_samples, 3, |i, j| match j {
        0 => i as f64,
        1 => 2.0 * i as f64,
        _ => (i as f64 * 0.7).sin(),
    });
    let y = Col::from_fn(n_samples, |i| 1.0 + 2.0 * x[(i, 0)] + 3.0 * x[(i, 2)]);
    (x, y)
}

/// Shape of a simulated hardware benchmark file.
#[derive(Debug, Clone)]
pub struct HardwareProfile {
    pub n_rows: usize,
    pub seed: u64,
    /// Added to every response time; a large negative value makes them all non-positive.
    pub target_offset: f64,
    /// Blank out a cell every this many rows.
    pub missing_every: Option<usize>,
    /// Noise spread grows with latency when set.
    pub heteroscedastic: bool,
}

impl Default for HardwareProfile {
    fn default() -> Self {
        Self {
            n_rows: 200,
            seed: 42,
            target_offset: 0.0,
            missing_every: Some(25),
            heteroscedastic: false,
        }
    }
}

pub const HARDWARE_HEADER: &str = "cpu_cores,ram_gb,latencia_ms,armazenamento_tb,\
sistema_operacional,tipo_hd,tipo_processador,tempo_resposta";

/// Simulated hardware dataset as CSV text.
///
/// Response time depends on cores, RAM, latency, OS and disk type. Storage and
/// processor type carry no effect.
pub fn hardware_csv(profile: &HardwareProfile) -> String {
    let mut rng = StdRng::seed_from_u64(profile.seed);
    let noise = Normal::new(0.0, 1.0).expect("valid noise std");

    let cores = [2.0, 4.0, 8.0, 16.0];
    let ram = [4.0, 8.0, 16.0, 32.0];
    let systems = ["Linux", "Windows", "MacOS"];
    let disks = ["HDD", "SSD", "NVMe"];
    let processors = ["x86", "ARM"];

    let mut out = String::from(HARDWARE_HEADER);
    out.push('\n');

    for i in 0..profile.n_rows {
        let cpu = cores[rng.gen_range(0..cores.len())];
        let mem = ram[rng.gen_range(0..ram.len())];
        let latency: f64 = rng.gen_range(1.0..50.0);
        let storage: f64 = rng.gen_range(0.5..4.0);
        let os = systems[rng.gen_range(0..systems.len())];
        let disk = disks[rng.gen_range(0..disks.len())];
        let processor = processors[rng.gen_range(0..processors.len())];

        let os_effect = match os {
            "Windows" => 6.0,
            "MacOS" => 3.0,
            _ => 0.0,
        };
        let disk_effect = match disk {
            "HDD" => 12.0,
            "SSD" => 4.0,
            _ => 0.0,
        };
        let spread = if profile.heteroscedastic {
            0.4 * latency
        } else {
            2.0
        };
        let response = 120.0 - 1.5 * cpu - 0.6 * mem + 1.2 * latency + os_effect + disk_effect
            + spread * noise.sample(&mut rng)
            + profile.target_offset;

        let blank = profile.missing_every.is_some_and(|k| i % k == k - 1);
        let latency_cell = if blank {
            String::new()
        } else {
            format!("{latency:.3}")
        };

        let _ = writeln!(
            out,
            "{cpu},{mem},{latency_cell},{storage:.2},{os},{disk},{processor},{response:.3}"
        );
    }
    out
}

/// Write `contents` as `name` inside `dir` and return the path.
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write test file");
    path
}

/// Approximate equality check for floating point values.
pub fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}
