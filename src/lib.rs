//! Weighted multi-dimensional group adjustment.
//!
//! [`group_adjust`] removes from every observation a weighted blend of the
//! means of the groups it belongs to, one group per grouping dimension.
//! Missing observations are excluded from every mean and stay missing.
//!
//! ```
//! let vals = [Some(1.0), Some(2.0), Some(3.0)];
//! let country = ["USA", "USA", "USA"];
//! let state = ["MA", "MA", "CT"];
//!
//! let adjusted = grpadj::group_adjust(&vals, &[country, state], &[0.35, 0.65]).unwrap();
//! assert!((adjusted[0].unwrap() + 0.675).abs() < 1e-9);
//! ```

pub mod adjust;
pub mod combine;
pub mod config;
pub mod error;
pub mod filter;
pub mod generate;
pub mod manager;
pub mod means;
pub mod model;
pub mod stats;
pub mod validate;

pub use adjust::{AdjustOptions, AsF64, group_adjust, group_adjust_with};
pub use error::{AdjustError, FilterError};
pub use filter::{remove_at, remove_at_many};
