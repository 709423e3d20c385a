pub mod shift;
pub mod softmax;

pub use shift::StabilityShift;
pub use softmax::{SoftmaxLoss, softmax_loss_naive, softmax_loss_vectorized};
