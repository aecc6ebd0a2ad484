//! Error kinds reported by the group adjustment and filtering routines.

/// Validation failure raised before any numeric work starts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdjustError {
    #[error(
        "all groups need to be the same length as vals: group {dim} has length {len}, but vals has length {expected}"
    )]
    GroupLengthMismatch {
        dim: usize,
        len: usize,
        expected: usize,
    },

    #[error("each group-list needs its own weight: got {n_groups} groups and {n_weights} weights")]
    WeightCountMismatch { n_groups: usize, n_weights: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error("sequence index {seq_idx} is out of range for {n_seqs} sequences")]
    SequenceOutOfRange { seq_idx: usize, n_seqs: usize },
}
