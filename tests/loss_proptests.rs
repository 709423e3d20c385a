//! Randomised properties over arbitrary well-formed (W, X, y, reg).

use proptest::collection::vec;
use proptest::prelude::*;
use softmax_linear::{
    softmax_loss_naive, softmax_loss_vectorized, Matrix, SoftmaxConfig, SoftmaxError, SoftmaxLoss,
    StabilityShift,
};

type LossFn = fn(&Matrix, &Matrix, &[usize], f64) -> Result<(f64, Matrix), SoftmaxError>;

const TOL: f64 = 1e-7;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= TOL * a.abs().max(b.abs()).max(1.0)
}

/// W (D, C), X (N, D), labels in 0..C and reg in [0, 2) for D, C, N >= 1.
fn batch() -> impl Strategy<Value = (Matrix, Matrix, Vec<usize>, f64)> {
    (1_usize..6, 1_usize..6, 1_usize..10)
        .prop_flat_map(|(d, c, n)| {
            (
                vec(vec(-3.0..3.0_f64, c), d),
                vec(vec(-3.0..3.0_f64, d), n),
                vec(0..c, n),
                0.0..2.0_f64,
            )
        })
        .prop_map(|(w, x, y, reg)| (Matrix::from_data(w), Matrix::from_data(x), y, reg))
}

proptest! {
    #[test]
    fn naive_and_vectorized_agree((w, x, y, reg) in batch()) {
        let (loss_naive, grad_naive) = softmax_loss_naive(&w, &x, &y, reg).unwrap();
        prop_assert!(loss_naive >= 0.0);
        prop_assert_eq!(grad_naive.shape(), w.shape());

        for shift in [StabilityShift::Global, StabilityShift::PerRow] {
            let evaluator = SoftmaxLoss::new(SoftmaxConfig::new(reg).with_shift(shift));
            let (loss, grad) = evaluator.vectorized(&w, &x, &y).unwrap();
            prop_assert!(close(loss_naive, loss), "{:?}: naive={}, vectorized={}", shift, loss_naive, loss);
            for (rn, rv) in grad_naive.data.iter().zip(grad.data.iter()) {
                for (a, b) in rn.iter().zip(rv.iter()) {
                    prop_assert!(close(*a, *b), "{:?}: naive dW={}, vectorized dW={}", shift, a, b);
                }
            }
        }
    }

    #[test]
    fn reg_adds_penalty_and_twice_reg_w((w, x, y, reg) in batch()) {
        let (loss0, grad0) = softmax_loss_vectorized(&w, &x, &y, 0.0).unwrap();
        let (loss_r, grad_r) = softmax_loss_vectorized(&w, &x, &y, reg).unwrap();

        let penalty = reg * w.sum_squares();
        prop_assert!(loss_r >= loss0);
        prop_assert!(((loss_r - loss0) - penalty).abs() <= 1e-9 * penalty.max(1.0));
        prop_assert!((grad_r - grad0).max_abs_diff(&w.scale(2.0 * reg)) <= 1e-9);
    }

    #[test]
    fn repeated_calls_are_bit_identical((w, x, y, reg) in batch()) {
        let (w0, x0, y0) = (w.clone(), x.clone(), y.clone());
        let variants: [LossFn; 2] = [softmax_loss_naive, softmax_loss_vectorized];
        for f in variants {
            let (l1, g1) = f(&w, &x, &y, reg).unwrap();
            let (l2, g2) = f(&w, &x, &y, reg).unwrap();
            prop_assert_eq!(l1.to_bits(), l2.to_bits());
            prop_assert_eq!(g1, g2);
        }
        prop_assert_eq!(w, w0);
        prop_assert_eq!(x, x0);
        prop_assert_eq!(y, y0);
    }
}
