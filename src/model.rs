use serde::{Deserialize, Serialize};

/// Batch of observations to adjust.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    /// Observed values, `None` where missing.
    pub vals: Vec<Option<f64>>,

    /// Grouping dimensions, each with one label per value.
    pub groups: Vec<Vec<String>>,
}

/// Result of adjusting a [`Batch`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustedBatch {
    /// Demeaned values, `None` where the input was missing.
    pub vals: Vec<Option<f64>>,

    /// Weights the batch was adjusted with.
    pub weights: Vec<f64>,
}
