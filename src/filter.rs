use crate::error::FilterError;
use std::collections::HashSet;

/// Copy `seq` without the elements at the given positions.
///
/// Relative order is preserved. Positions past the end are ignored.
pub fn remove_at<T: Clone>(seq: &[T], idxs: &[usize]) -> Vec<T> {
    let idxs: HashSet<_> = idxs.iter().copied().collect();
    seq.iter()
        .enumerate()
        .filter(|(idx, _)| !idxs.contains(idx))
        .map(|(_, ele)| ele.clone())
        .collect()
}

/// Remove elements from several sequences at once.
///
/// Each pair is `(sequence index, element index)`. The pairs are grouped by
/// sequence and [`remove_at`] is applied to every sequence; sequences that no
/// pair names are copied unchanged.
///
/// # Errors
/// Returns [`FilterError::SequenceOutOfRange`] if a pair names a sequence
/// that does not exist.
pub fn remove_at_many<T, S>(
    seqs: &[S],
    pairs: &[(usize, usize)],
) -> Result<Vec<Vec<T>>, FilterError>
where
    T: Clone,
    S: AsRef<[T]>,
{
    let n_seqs = seqs.len();
    let mut idxs_by_seq = vec![Vec::new(); n_seqs];
    for &(seq_idx, ele_idx) in pairs {
        idxs_by_seq
            .get_mut(seq_idx)
            .ok_or(FilterError::SequenceOutOfRange { seq_idx, n_seqs })?
            .push(ele_idx);
    }

    Ok(seqs
        .iter()
        .zip(&idxs_by_seq)
        .map(|(seq, idxs)| remove_at(seq.as_ref(), idxs))
        .collect())
}
