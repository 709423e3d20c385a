use rand::prelude::*;
use serde::{Serialize, Deserialize};
use std::f64::consts::PI;
use std::ops::{Add, Sub, Mul};

use crate::error::{Result, SoftmaxError};

/// Dense row-major matrix of `f64`.
///
/// Weights are stored as (D, C), feature batches as (N, D), score and
/// probability matrices as (N, C).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix{
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>
}

impl Matrix{
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix{
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows]
        }
    }

    /// Builds a matrix with an explicit shape, rejecting data that does not fit it.
    ///
    /// Unlike `from_data` this keeps the column count of a matrix with zero
    /// rows, so an empty (0, D) batch still reports D features.
    pub fn new(rows: usize, cols: usize, data: Vec<Vec<f64>>) -> Result<Matrix> {
        let m = Matrix { rows, cols, data };
        m.check_rectangular()?;
        Ok(m)
    }

    pub fn from_data(data: Vec<Vec<f64>>) -> Matrix {
        Matrix {
            rows: data.len(),
            cols: data.first().map_or(0, |row| row.len()),
            data
        }
    }

    /// Uniform samples in [-1, 1).
    pub fn random_with<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);

        for i in 0..rows {
            for j in 0..cols {
                res.data[i][j] = rng.gen::<f64>() * 2.0 - 1.0;
            }
        }

        res
    }

    /// Samples a single value from N(0, 1) using the Box-Muller transform.
    fn sample_standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
        // u1, u2 in (0, 1] so that ln(u1) is finite.
        let u1: f64 = 1.0 - rng.gen::<f64>();
        let u2: f64 = 1.0 - rng.gen::<f64>();
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }

    /// Samples from N(0, std_dev²).
    ///
    /// Small `std_dev` (e.g. 1e-4) gives the near-uniform initial weights a
    /// softmax classifier usually starts from, with loss close to ln(C).
    pub fn randn<R: Rng + ?Sized>(rows: usize, cols: usize, std_dev: f64, rng: &mut R) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);
        for i in 0..rows {
            for j in 0..cols {
                res.data[i][j] = Matrix::sample_standard_normal(rng) * std_dev;
            }
        }
        res
    }

    /// Verifies `data` holds exactly `rows` rows of `cols` entries each.
    pub fn check_rectangular(&self) -> Result<()> {
        if self.data.len() != self.rows {
            return Err(SoftmaxError::ShapeMismatch {
                what: "matrix row count",
                expected: self.rows,
                got: self.data.len(),
            });
        }
        if let Some((row, r)) = self.data.iter().enumerate().find(|(_, r)| r.len() != self.cols) {
            return Err(SoftmaxError::RaggedMatrix {
                row,
                expected: self.cols,
                got: r.len(),
            });
        }
        Ok(())
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = self.data[j][i];
            }
        }

        res
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data
                .iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect(),
        }
    }

    pub fn scale(&self, factor: f64) -> Matrix {
        self.map(|x| x * factor)
    }

    /// Matrix product `self · rhs` without consuming either operand.
    ///
    /// # Panics
    /// Panics if `self.cols != rhs.rows`. Callers validate shapes first.
    pub fn dot(&self, rhs: &Matrix) -> Matrix {
        if self.cols != rhs.rows {
            panic!("Matrices are of incorrect sizes")
        }

        let mut res = Matrix::zeros(self.rows, rhs.cols);

        // i-k-j order walks both operands row-wise.
        for i in 0..self.rows {
            let out = &mut res.data[i];
            for (k, &a) in self.data[i].iter().enumerate() {
                for (o, &b) in out.iter_mut().zip(rhs.data[k].iter()) {
                    *o += a * b;
                }
            }
        }

        res
    }

    /// Largest entry, or `-inf` for an empty matrix.
    pub fn max(&self) -> f64 {
        self.data
            .iter()
            .flat_map(|row| row.iter().copied())
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Largest entry of each row.
    pub fn row_max(&self) -> Vec<f64> {
        self.data
            .iter()
            .map(|row| row.iter().copied().fold(f64::NEG_INFINITY, f64::max))
            .collect()
    }

    pub fn row_sums(&self) -> Vec<f64> {
        self.data.iter().map(|row| row.iter().sum()).collect()
    }

    /// Σ xᵢⱼ², the squared Frobenius norm.
    pub fn sum_squares(&self) -> f64 {
        self.data.iter().flat_map(|row| row.iter()).map(|x| x * x).sum()
    }

    /// Largest absolute element-wise difference to `other`.
    pub fn max_abs_diff(&self, other: &Matrix) -> f64 {
        assert_eq!(self.shape(), other.shape(), "Matrices are of incorrect sizes");
        self.data
            .iter()
            .zip(other.data.iter())
            .flat_map(|(a, b)| a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()))
            .fold(0.0, f64::max)
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}

impl Add for Matrix {
    type Output = Matrix;

    fn add(self, rhs: Self) -> Self::Output {
        if self.rows != rhs.rows || self.cols != rhs.cols {
            panic!("Matrices are of incorrect sizes")
        }

        let mut res = self;

        for (row, rhs_row) in res.data.iter_mut().zip(rhs.data.iter()) {
            for (x, y) in row.iter_mut().zip(rhs_row.iter()) {
                *x += y;
            }
        }

        res
    }
}

impl Sub for Matrix {
    type Output = Matrix;

    fn sub(self, rhs: Self) -> Self::Output {
        if self.rows != rhs.rows || self.cols != rhs.cols {
            panic!("Matrices are of incorrect sizes")
        }

        let mut res = self;

        for (row, rhs_row) in res.data.iter_mut().zip(rhs.data.iter()) {
            for (x, y) in row.iter_mut().zip(rhs_row.iter()) {
                *x -= y;
            }
        }

        res
    }
}

impl Mul for Matrix {
    type Output = Matrix;

    fn mul(self, rhs: Self) -> Self::Output {
        self.dot(&rhs)
    }
}
