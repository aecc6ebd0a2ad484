use serde::{Deserialize, Serialize};

/// Running summary of a series with missing values.
///
/// Mean and variance are updated with Welford's method.
pub struct Accumulator {
    n_vals: usize,
    n_missing: usize,
    mean: f64,
    diff_2_sum: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AccumulatorReport {
    pub n_obs: usize,
    pub n_missing: usize,
    pub mean: f64,
    pub std_dev: f64,
}

impl Accumulator {
    pub fn new() -> Self {
        Self {
            n_vals: 0,
            n_missing: 0,
            mean: 0.0,
            diff_2_sum: 0.0,
        }
    }

    pub fn add(&mut self, val: Option<f64>) {
        let Some(val) = val else {
            self.n_missing += 1;
            return;
        };

        self.n_vals += 1;

        let diff_a = val - self.mean;
        self.mean += diff_a / self.n_vals as f64;

        let diff_b = val - self.mean;
        self.diff_2_sum += diff_a * diff_b;
    }

    pub fn report(&self) -> AccumulatorReport {
        AccumulatorReport {
            n_obs: self.n_vals + self.n_missing,
            n_missing: self.n_missing,
            mean: if self.n_vals > 0 { self.mean } else { f64::NAN },
            std_dev: if self.n_vals > 1 {
                (self.diff_2_sum / (self.n_vals as f64 - 1.0)).sqrt()
            } else {
                f64::NAN
            },
        }
    }
}

impl Default for Accumulator {
    fn default() -> Self {
        Self::new()
    }
}
