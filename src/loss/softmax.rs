use crate::config::{validate_reg, SoftmaxConfig};
use crate::error::{Result, SoftmaxError};
use crate::loss::shift::StabilityShift;
use crate::math::matrix::Matrix;

/// Softmax (multinomial logistic) loss of a linear classifier with L2
/// regularization.
///
/// For weights `W` (D, C), a batch `X` (N, D) and labels `y` (N):
///
///   L  = 1/N · Σᵢ −log(exp(sᵢ,yᵢ) / Σⱼ exp(sᵢ,ⱼ)) + reg · Σ W²
///   dW = 1/N · Xᵀ · (P − onehot(y)) + 2 · reg · W
///
/// where `s = X·W` and `P = softmax(s)` row-wise.
///
/// `naive` and `vectorized` compute the same function; the first walks the
/// batch one example at a time, the second works on the whole score matrix.
#[derive(Debug, Clone, Copy, Default)]
pub struct SoftmaxLoss {
    pub config: SoftmaxConfig,
}

impl SoftmaxLoss {
    pub fn new(config: SoftmaxConfig) -> Self {
        SoftmaxLoss { config }
    }

    /// Explicit-loop loss and gradient. Returns `(loss, dW)`.
    pub fn naive(&self, w: &Matrix, x: &Matrix, y: &[usize]) -> Result<(f64, Matrix)> {
        validate(w, x, y, self.config.reg)?;
        let num_train = x.rows;
        let num_classes = w.cols;

        let mut loss = 0.0;
        let mut dw = Matrix::zeros(w.rows, w.cols);

        for (i, (xi, &label)) in x.data.iter().zip(y.iter()).enumerate() {
            // scores = X[i] · W
            let mut scores: Vec<f64> = (0..num_classes)
                .map(|j| xi.iter().zip(w.data.iter()).map(|(a, w_row)| a * w_row[j]).sum::<f64>())
                .collect();
            let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            scores.iter_mut().for_each(|s| *s -= max);

            let exp_scores: Vec<f64> = scores.iter().map(|s| s.exp()).collect();
            let exp_sum: f64 = exp_scores.iter().sum();
            let correct_exp = exp_scores[label];

            for j in 0..num_classes {
                let coeff = if j == label {
                    -((exp_sum - correct_exp) / exp_sum)
                } else {
                    exp_scores[j] / exp_sum
                };
                for (grad_row, &feature) in dw.data.iter_mut().zip(xi.iter()) {
                    grad_row[j] += coeff * feature;
                }
            }

            let example_loss = -(correct_exp / exp_sum).ln();
            log::trace!("example {i}: label {label}, loss {example_loss}");
            loss += example_loss;
        }

        let n = num_train as f64;
        loss /= n;
        loss += self.config.reg * w.sum_squares();
        let dw = dw.scale(1.0 / n) + w.scale(2.0 * self.config.reg);

        log::debug!("naive softmax loss over {num_train} examples: {loss}");
        Ok((loss, dw))
    }

    /// Whole-matrix loss and gradient. Returns `(loss, dW)`.
    ///
    /// Subtracts `self.config.shift` from the scores before exponentiating.
    pub fn vectorized(&self, w: &Matrix, x: &Matrix, y: &[usize]) -> Result<(f64, Matrix)> {
        validate(w, x, y, self.config.reg)?;
        let num_train = x.rows;
        let n = num_train as f64;

        let mut scores = x.dot(w);
        self.config.shift.apply(&mut scores);
        let exp_scores = scores.map(f64::exp);

        let row_sums = exp_scores.row_sums();
        let correct: Vec<f64> = exp_scores.data.iter()
            .zip(y.iter())
            .map(|(row, &label)| row[label])
            .collect();

        let data_loss: f64 = correct.iter()
            .zip(row_sums.iter())
            .map(|(c, s)| -(c / s).ln())
            .sum();
        let loss = data_loss / n + self.config.reg * w.sum_squares();

        // P with the true-class entry replaced by P[i, yᵢ] − 1.
        let mut probs = exp_scores;
        for (i, row) in probs.data.iter_mut().enumerate() {
            let sum = row_sums[i];
            row.iter_mut().for_each(|p| *p /= sum);
            row[y[i]] = -(sum - correct[i]) / sum;
        }

        let dw = x.transpose().dot(&probs).scale(1.0 / n) + w.scale(2.0 * self.config.reg);

        log::debug!(
            "vectorized softmax loss over {num_train} examples ({:?} shift): {loss}",
            self.config.shift
        );
        Ok((loss, dw))
    }

    /// Predicted class for each row of `x`: argmax of `x · w`. Ties go to
    /// the lowest class index.
    pub fn predict(w: &Matrix, x: &Matrix) -> Result<Vec<usize>> {
        check_shapes(w, x)?;
        Ok(x.dot(w).data.iter().map(|row| argmax(row)).collect())
    }
}

/// Loop-based softmax loss and gradient, `(loss, dW)`.
pub fn softmax_loss_naive(w: &Matrix, x: &Matrix, y: &[usize], reg: f64) -> Result<(f64, Matrix)> {
    SoftmaxLoss::new(SoftmaxConfig::new(reg)).naive(w, x, y)
}

/// Vectorized softmax loss and gradient, `(loss, dW)`, with a global max shift.
pub fn softmax_loss_vectorized(w: &Matrix, x: &Matrix, y: &[usize], reg: f64) -> Result<(f64, Matrix)> {
    SoftmaxLoss::new(SoftmaxConfig::new(reg).with_shift(StabilityShift::Global)).vectorized(w, x, y)
}

fn check_shapes(w: &Matrix, x: &Matrix) -> Result<()> {
    w.check_rectangular()?;
    x.check_rectangular()?;
    if w.rows != x.cols {
        return Err(SoftmaxError::ShapeMismatch {
            what: "W rows vs X cols",
            expected: x.cols,
            got: w.rows,
        });
    }
    Ok(())
}

/// Runs every precondition check so that a computation, once started,
/// always finishes.
fn validate(w: &Matrix, x: &Matrix, y: &[usize], reg: f64) -> Result<()> {
    validate_reg(reg)?;
    check_shapes(w, x)?;
    if x.rows == 0 {
        return Err(SoftmaxError::EmptyBatch);
    }
    if y.len() != x.rows {
        return Err(SoftmaxError::ShapeMismatch {
            what: "y length vs X rows",
            expected: x.rows,
            got: y.len(),
        });
    }
    if let Some((index, &label)) = y.iter().enumerate().find(|(_, &l)| l >= w.cols) {
        return Err(SoftmaxError::InvalidLabel { index, label, classes: w.cols });
    }
    Ok(())
}

fn argmax(v: &[f64]) -> usize {
    v.iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |(best, best_v), (j, &s)| {
            if s > best_v { (j, s) } else { (best, best_v) }
        })
        .0
}
