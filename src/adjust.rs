//! Group adjustment: removal of a weighted blend of group means from a series.
//!
//! For every grouping dimension the mean of the values is computed per label,
//! the per-dimension means are combined with one weight per dimension, and
//! the combined mean is subtracted from each value. Missing values (`None`)
//! contribute to no mean and stay missing in the output.

use crate::combine::weighted_means;
use crate::error::AdjustError;
use crate::means::group_means_per_obs;
use crate::validate::check_inputs;
use rayon::prelude::*;
use std::hash::Hash;

/// Numeric observation that is promoted to `f64` before accumulation.
pub trait AsF64: Copy {
    fn as_f64(self) -> f64;
}

macro_rules! impl_as_f64 {
    ($($ty:ty),*) => {
        $(
            impl AsF64 for $ty {
                fn as_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_as_f64!(f64, f32, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// Execution strategy of a group adjustment.
///
/// Results do not depend on the strategy beyond floating-point rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdjustOptions {
    /// Compute dimensions and row chunks concurrently.
    pub parallel: bool,

    /// Minimum number of rows accumulated per task in parallel mode.
    pub chunk_size: usize,
}

impl Default for AdjustOptions {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 1 << 16,
        }
    }
}

/// Demean `vals` by the weighted group means of `groups`.
///
/// Runs sequentially; see [`group_adjust_with`] for the parallel strategy.
///
/// # Errors
/// Returns [`AdjustError::GroupLengthMismatch`] if a group does not have one
/// label per value and [`AdjustError::WeightCountMismatch`] if the number of
/// weights differs from the number of groups.
pub fn group_adjust<T, G, L>(
    vals: &[Option<T>],
    groups: &[G],
    weights: &[f64],
) -> Result<Vec<Option<f64>>, AdjustError>
where
    T: AsF64 + Sync,
    G: AsRef<[L]> + Sync,
    L: Eq + Hash + Sync,
{
    group_adjust_with(vals, groups, weights, &AdjustOptions::default())
}

/// Demean `vals` by the weighted group means of `groups` using the given options.
pub fn group_adjust_with<T, G, L>(
    vals: &[Option<T>],
    groups: &[G],
    weights: &[f64],
    opts: &AdjustOptions,
) -> Result<Vec<Option<f64>>, AdjustError>
where
    T: AsF64 + Sync,
    G: AsRef<[L]> + Sync,
    L: Eq + Hash + Sync,
{
    let n_vals = vals.len();
    check_inputs(n_vals, groups, weights.len())?;
    log::debug!("adjusting {n_vals} values over {} groups", groups.len());

    let vals: Vec<Option<f64>> = vals.iter().map(|val| val.map(AsF64::as_f64)).collect();

    let per_group = |group: &G| group_means_per_obs(&vals, group.as_ref(), opts);
    let means: Vec<_> = if opts.parallel {
        groups.par_iter().map(per_group).collect()
    } else {
        groups.iter().map(per_group).collect()
    };

    let weighted = weighted_means(&means, weights, n_vals, opts.parallel);

    Ok(demean(&vals, &weighted))
}

/// Subtract the weighted means from the values.
///
/// Missing values stay missing. A present value always has a known weighted
/// mean, since it contributes to the mean of its own group in every dimension.
pub fn demean(vals: &[Option<f64>], weighted: &[Option<f64>]) -> Vec<Option<f64>> {
    debug_assert_eq!(vals.len(), weighted.len(), "one weighted mean per value");
    vals.iter()
        .zip(weighted)
        .map(|(val, mean)| Some(val.as_ref()? - mean.as_ref()?))
        .collect()
}
