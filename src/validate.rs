use crate::error::AdjustError;

/// Check the shapes of the adjustment inputs.
///
/// Every grouping dimension must have one label per value and there must be
/// exactly one weight per dimension. Lengths are checked before weights.
pub fn check_inputs<G: AsRef<[L]>, L>(
    n_vals: usize,
    groups: &[G],
    n_weights: usize,
) -> Result<(), AdjustError> {
    for (dim, group) in groups.iter().enumerate() {
        let len = group.as_ref().len();
        if len != n_vals {
            return Err(AdjustError::GroupLengthMismatch {
                dim,
                len,
                expected: n_vals,
            });
        }
    }

    let n_groups = groups.len();
    if n_groups != n_weights {
        return Err(AdjustError::WeightCountMismatch {
            n_groups,
            n_weights,
        });
    }

    Ok(())
}
