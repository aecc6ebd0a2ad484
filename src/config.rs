use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, fs, ops::RangeBounds, path::Path};

/// Adjustment parameters.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct AdjustConfig {
    /// Weight of each grouping dimension.
    pub weights: Vec<f64>,

    /// Compute dimensions and row chunks concurrently.
    #[serde(default)]
    pub parallel: bool,
    /// Minimum number of rows accumulated per parallel task.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

/// Synthetic batch parameters.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct GenerateConfig {
    /// Number of observations.
    pub n_obs: usize,
    /// Number of distinct labels of each grouping dimension.
    pub n_labels: Vec<usize>,

    /// Probability of an observation being missing.
    pub prob_missing: f64,
    /// Standard deviation of the noise added to the group effects.
    pub std_dev_noise: f64,

    /// Seed of the random number generator (OS entropy if absent).
    pub seed: Option<u64>,
}

/// Work directory configuration.
///
/// Loaded from a TOML file and validated before use.
/// See [`Config::from_file`] for loading.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Config {
    pub adjust: AdjustConfig,
    pub generate: GenerateConfig,
}

fn default_chunk_size() -> usize {
    1 << 16
}

impl Config {
    /// Load a [`Config`] from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, deserialized,
    /// or if the configuration values are invalid.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let contents =
            fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;

        let config: Config = toml::from_str(&contents).context("failed to deserialize config")?;

        config.validate().context("failed to validate config")?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let n_groups = self.adjust.weights.len();
        check_num(n_groups, 1..100).context("invalid number of weights")?;
        if let Some(weight) = self.adjust.weights.iter().find(|weight| !weight.is_finite()) {
            bail!("weights must be finite, but one is {weight}");
        }
        check_num(self.adjust.chunk_size, 1..=(1 << 30)).context("invalid chunk size")?;

        check_num(self.generate.n_obs, 1..100_000_000)
            .context("invalid number of observations")?;
        check_vec(&self.generate.n_labels, n_groups, 1..1_000_000)
            .context("invalid numbers of labels")?;
        check_num(self.generate.prob_missing, 0.0..1.0)
            .context("invalid missing probability")?;
        check_num(self.generate.std_dev_noise, 0.0..100.0)
            .context("invalid noise standard deviation")?;

        Ok(())
    }
}

fn check_num<T, R>(num: T, range: R) -> Result<()>
where
    T: PartialOrd + Debug,
    R: RangeBounds<T> + Debug,
{
    if !range.contains(&num) {
        bail!("number must be in the range {range:?}, but is {num:?}");
    }
    Ok(())
}

fn check_vec<T, R>(vec: &[T], exp_len: usize, range: R) -> Result<()>
where
    T: PartialOrd + Debug + Copy,
    R: RangeBounds<T> + Debug + Clone,
{
    // Ensure vector has one element per grouping dimension.
    let len = vec.len();
    if len != exp_len {
        bail!("vector length must be {exp_len}, but is {len}");
    }
    for (idx, &ele) in vec.iter().enumerate() {
        check_num(ele, range.clone()).with_context(|| format!("invalid element {idx}"))?;
    }
    Ok(())
}
