use crate::config::GenerateConfig;
use crate::model::Batch;
use anyhow::{Context, Result};
use rand::prelude::*;
use rand_chacha::ChaCha12Rng;
use rand_distr::{Bernoulli, Normal, Uniform};

/// Draw a synthetic batch with additive group effects.
///
/// Every label of every dimension gets a random effect. Each observation
/// draws one label per dimension and its value is the sum of the effects of
/// its labels plus normal noise. Observations are then dropped as missing
/// with probability `prob_missing`.
pub fn generate_batch(cfg: &GenerateConfig) -> Result<Batch> {
    let mut rng = match cfg.seed {
        Some(seed) => ChaCha12Rng::seed_from_u64(seed),
        None => ChaCha12Rng::try_from_os_rng()?,
    };

    let effect_dist = Uniform::new(-10.0, 10.0)?;
    let noise_dist = Normal::new(0.0, cfg.std_dev_noise).context("invalid noise distribution")?;
    let missing_dist = Bernoulli::new(cfg.prob_missing).context("invalid missing distribution")?;

    let mut effects = Vec::with_capacity(cfg.n_labels.len());
    let mut label_dists = Vec::with_capacity(cfg.n_labels.len());
    for &n_labels in &cfg.n_labels {
        let dim_effects: Vec<f64> = (0..n_labels)
            .map(|_| effect_dist.sample(&mut rng))
            .collect();
        effects.push(dim_effects);
        label_dists.push(Uniform::new(0, n_labels)?);
    }

    let mut vals = Vec::with_capacity(cfg.n_obs);
    let mut groups = vec![Vec::with_capacity(cfg.n_obs); cfg.n_labels.len()];
    for _ in 0..cfg.n_obs {
        let mut val = noise_dist.sample(&mut rng);
        for (i_dim, label_dist) in label_dists.iter().enumerate() {
            let label = label_dist.sample(&mut rng);
            val += effects[i_dim][label];
            groups[i_dim].push(format!("{i_dim}-{label:06}"));
        }

        let missing = missing_dist.sample(&mut rng);
        vals.push(if missing { None } else { Some(val) });
    }

    Ok(Batch { vals, groups })
}
