pub mod gradient;

pub use gradient::{eval_numerical_gradient, grad_check_sparse, relative_error, GradCheckSample};
