//! Finite-difference gradient checking.
//!
//! The analytic gradient of a loss is compared against the centred
//! difference
//!
//!   ∂f/∂wᵢⱼ ≈ (f(w + h·eᵢⱼ) − f(w − h·eᵢⱼ)) / 2h
//!
//! either over every coordinate ([`eval_numerical_gradient`]) or over a
//! random sample of coordinates ([`grad_check_sparse`]).

use rand::Rng;

use crate::math::matrix::Matrix;

/// Default step for centred differences on `f64`.
pub const DEFAULT_STEP: f64 = 1e-5;

/// Floor for the denominator of [`relative_error`].
const DENOM_FLOOR: f64 = 1e-12;

/// One sampled coordinate of a sparse gradient check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradCheckSample {
    pub row: usize,
    pub col: usize,
    pub numerical: f64,
    pub analytic: f64,
    pub rel_error: f64,
}

/// |a − b| / max(|a| + |b|, 1e-12)
pub fn relative_error(a: f64, b: f64) -> f64 {
    (a - b).abs() / (a.abs() + b.abs()).max(DENOM_FLOOR)
}

/// Full numerical gradient of `f` at `x`, one centred difference per entry.
///
/// `x` is left untouched; a working copy is perturbed and restored.
pub fn eval_numerical_gradient<F>(mut f: F, x: &Matrix, h: f64) -> Matrix
where
    F: FnMut(&Matrix) -> f64,
{
    let mut probe = x.clone();
    let mut grad = Matrix::zeros(x.rows, x.cols);

    for i in 0..x.rows {
        for j in 0..x.cols {
            grad.data[i][j] = centred_difference(&mut f, &mut probe, i, j, h);
        }
    }

    grad
}

/// Compares `analytic` against centred differences at `num_checks` randomly
/// chosen coordinates of `x`.
///
/// # Panics
/// Panics if `analytic` and `x` differ in shape.
pub fn grad_check_sparse<F, R>(
    mut f: F,
    x: &Matrix,
    analytic: &Matrix,
    num_checks: usize,
    h: f64,
    rng: &mut R,
) -> Vec<GradCheckSample>
where
    F: FnMut(&Matrix) -> f64,
    R: Rng + ?Sized,
{
    assert_eq!(x.shape(), analytic.shape(), "gradient shape must match x");
    if x.rows == 0 || x.cols == 0 {
        return Vec::new();
    }

    let mut probe = x.clone();
    (0..num_checks)
        .map(|_| {
            let row = rng.gen_range(0..x.rows);
            let col = rng.gen_range(0..x.cols);
            let numerical = centred_difference(&mut f, &mut probe, row, col, h);
            let analytic = analytic.data[row][col];
            let rel_error = relative_error(numerical, analytic);
            log::debug!(
                "grad check ({row}, {col}): numerical {numerical:e} analytic {analytic:e}, relative error {rel_error:e}"
            );
            GradCheckSample { row, col, numerical, analytic, rel_error }
        })
        .collect()
}

fn centred_difference<F>(f: &mut F, probe: &mut Matrix, i: usize, j: usize, h: f64) -> f64
where
    F: FnMut(&Matrix) -> f64,
{
    let old = probe.data[i][j];
    probe.data[i][j] = old + h;
    let f_plus = f(probe);
    probe.data[i][j] = old - h;
    let f_minus = f(probe);
    probe.data[i][j] = old;
    (f_plus - f_minus) / (2.0 * h)
}
