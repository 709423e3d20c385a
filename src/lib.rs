pub mod math;
pub mod error;
pub mod config;
pub mod loss;
pub mod check;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use error::SoftmaxError;
pub use config::SoftmaxConfig;
pub use loss::shift::StabilityShift;
pub use loss::softmax::{SoftmaxLoss, softmax_loss_naive, softmax_loss_vectorized};
