//! Per-label group means for a single grouping dimension.
//!
//! Labels are interned to dense ids once per dimension, so accumulation runs
//! over plain arrays instead of hashing every label on every pass. Missing
//! values are skipped during accumulation but still receive the mean of their
//! group when it is broadcast back onto the observations.

use crate::adjust::AdjustOptions;
use rayon::prelude::*;
use std::{collections::HashMap, hash::Hash};

/// Running sum and count of the non-missing values carrying one label.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct LabelSum {
    sum: f64,
    count: usize,
}

impl LabelSum {
    fn add(&mut self, val: f64) {
        self.sum += val;
        self.count += 1;
    }

    fn merge(&mut self, other: &LabelSum) {
        self.sum += other.sum;
        self.count += other.count;
    }

    /// `None` when every occurrence of the label was missing.
    fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        Some(self.sum / self.count as f64)
    }
}

/// Mapping from label to the mean of the non-missing values carrying it.
///
/// Labels whose every occurrence is missing have no entry.
#[derive(Debug, Clone)]
pub struct GroupMeanTable<'a, L> {
    means: HashMap<&'a L, f64>,
}

impl<'a, L: Eq + Hash> GroupMeanTable<'a, L> {
    /// Get the mean of the given label, if it has one.
    pub fn get(&self, label: &L) -> Option<f64> {
        self.means.get(label).copied()
    }

    /// Number of labels with a computable mean.
    pub fn len(&self) -> usize {
        self.means.len()
    }

    pub fn is_empty(&self) -> bool {
        self.means.is_empty()
    }
}

/// Group means of one dimension, as a table and broadcast onto every observation.
#[derive(Debug, Clone)]
pub struct GroupMeans<'a, L> {
    /// Mean of every label with at least one non-missing value.
    pub table: GroupMeanTable<'a, L>,

    /// Mean of the group of each observation, aligned with the values.
    pub per_obs: Vec<Option<f64>>,
}

/// Compute the group means of `vals` for the labels in `group`.
///
/// `vals` and `group` must have the same length.
pub fn group_means<'a, L>(
    vals: &[Option<f64>],
    group: &'a [L],
    opts: &AdjustOptions,
) -> GroupMeans<'a, L>
where
    L: Eq + Hash,
{
    let (labels, ids) = intern_labels(group);
    let mean_by_id = label_means(vals, &ids, labels.len(), opts);

    let means = labels
        .into_iter()
        .zip(&mean_by_id)
        .filter_map(|(label, mean)| mean.map(|mean| (label, mean)))
        .collect();
    let table = GroupMeanTable { means };

    let per_obs = broadcast(&ids, &mean_by_id);

    GroupMeans { table, per_obs }
}

/// Compute the mean of the group of each observation, without building a table.
///
/// Equal to the `per_obs` field of [`group_means`].
pub fn group_means_per_obs<L>(
    vals: &[Option<f64>],
    group: &[L],
    opts: &AdjustOptions,
) -> Vec<Option<f64>>
where
    L: Eq + Hash,
{
    let (labels, ids) = intern_labels(group);
    let mean_by_id = label_means(vals, &ids, labels.len(), opts);
    broadcast(&ids, &mean_by_id)
}

fn label_means(
    vals: &[Option<f64>],
    ids: &[usize],
    n_labels: usize,
    opts: &AdjustOptions,
) -> Vec<Option<f64>> {
    let sums = if opts.parallel {
        accumulate_parallel(vals, ids, n_labels, opts.chunk_size.max(1))
    } else {
        accumulate(vals, ids, n_labels)
    };
    let mean_by_id: Vec<_> = sums.iter().map(LabelSum::mean).collect();

    log::debug!(
        "computed means for {} of {n_labels} labels",
        mean_by_id.iter().flatten().count()
    );

    mean_by_id
}

fn broadcast(ids: &[usize], mean_by_id: &[Option<f64>]) -> Vec<Option<f64>> {
    ids.iter().map(|&id| mean_by_id[id]).collect()
}

/// Assign each distinct label a dense id in order of first occurrence.
fn intern_labels<L: Eq + Hash>(group: &[L]) -> (Vec<&L>, Vec<usize>) {
    let mut id_map = HashMap::new();
    let mut labels = Vec::new();
    let ids = group
        .iter()
        .map(|label| {
            *id_map.entry(label).or_insert_with(|| {
                labels.push(label);
                labels.len() - 1
            })
        })
        .collect();
    (labels, ids)
}

fn accumulate(vals: &[Option<f64>], ids: &[usize], n_labels: usize) -> Vec<LabelSum> {
    let mut sums = vec![LabelSum::default(); n_labels];
    for (val, &id) in vals.iter().zip(ids) {
        if let Some(val) = val {
            sums[id].add(*val);
        }
    }
    sums
}

/// Accumulate rows in parallel, then merge the partial sums per label.
///
/// Every rayon split owns one dense accumulator; `min_len` bounds how finely
/// the rows are split, so the number of partial tables follows the number of
/// splits rather than the number of rows.
fn accumulate_parallel(
    vals: &[Option<f64>],
    ids: &[usize],
    n_labels: usize,
    min_len: usize,
) -> Vec<LabelSum> {
    vals.par_iter()
        .zip(ids.par_iter())
        .with_min_len(min_len)
        .fold(
            || vec![LabelSum::default(); n_labels],
            |mut sums, (val, &id)| {
                if let Some(val) = val {
                    sums[id].add(*val);
                }
                sums
            },
        )
        .reduce(
            || vec![LabelSum::default(); n_labels],
            |mut sums, part| {
                for (sum, part) in sums.iter_mut().zip(&part) {
                    sum.merge(part);
                }
                sums
            },
        )
}
