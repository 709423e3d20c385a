use serde::{Serialize, Deserialize};

use crate::math::matrix::Matrix;

/// Which constant the vectorized loss subtracts from the score matrix before
/// exponentiating.
///
/// - `Global` — one scalar, the max over the whole (N, C) score matrix.
///   Rows whose scores sit far below the global max underflow to
///   `exp(..) = 0` and yield a `NaN` loss.
/// - `PerRow` — each row's own max, the same shift the naive loss applies
///   per example. Always leaves at least one `exp(0) = 1` per row.
///
/// Softmax is shift-invariant, so both give the same result whenever neither
/// underflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StabilityShift {
    #[default]
    Global,
    PerRow,
}

impl StabilityShift {
    /// Subtracts the shift from `scores` in place.
    pub fn apply(self, scores: &mut Matrix) {
        match self {
            StabilityShift::Global => {
                let max = scores.max();
                for row in scores.data.iter_mut() {
                    row.iter_mut().for_each(|s| *s -= max);
                }
            }
            StabilityShift::PerRow => {
                let maxes = scores.row_max();
                for (row, max) in scores.data.iter_mut().zip(maxes) {
                    row.iter_mut().for_each(|s| *s -= max);
                }
            }
        }
    }
}
