use rayon::prelude::*;

/// Weighted sum of the per-dimension group means at every observation.
///
/// `group_means[d][i]` is the mean of the group of observation `i` in
/// dimension `d`, and `weights[d]` its weight. Weights are applied as given,
/// without normalization. An observation whose mean is unknown in any
/// dimension gets `None`.
pub fn weighted_means(
    group_means: &[Vec<Option<f64>>],
    weights: &[f64],
    n_vals: usize,
    parallel: bool,
) -> Vec<Option<f64>> {
    debug_assert_eq!(group_means.len(), weights.len(), "one weight per group");
    debug_assert!(
        group_means.iter().all(|means| means.len() == n_vals),
        "every group needs one mean per value"
    );

    let weighted_mean = |i_val: usize| {
        group_means
            .iter()
            .zip(weights)
            .try_fold(0.0, |acc, (means, &weight)| {
                means[i_val].map(|mean| acc + weight * mean)
            })
    };

    if parallel {
        (0..n_vals).into_par_iter().map(weighted_mean).collect()
    } else {
        (0..n_vals).map(weighted_mean).collect()
    }
}
