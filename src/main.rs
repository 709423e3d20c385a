// Small demo: evaluates both loss variants on a random batch and reports
// how far apart they are. All logic lives in the library.
//   cargo run -- [config.json]
use std::time::Instant;

use rand::{rngs::StdRng, Rng, SeedableRng};
use softmax_linear::{Matrix, SoftmaxConfig, SoftmaxError, SoftmaxLoss};

const NUM_TRAIN: usize = 500;
const NUM_FEATURES: usize = 64;
const NUM_CLASSES: usize = 10;

fn main() -> Result<(), SoftmaxError> {
    let config = match std::env::args().nth(1) {
        Some(path) => SoftmaxConfig::load_json(&path)?,
        None => SoftmaxConfig::new(5e-4),
    };
    let evaluator = SoftmaxLoss::new(config);

    let mut rng = StdRng::seed_from_u64(231);
    let w = Matrix::randn(NUM_FEATURES, NUM_CLASSES, 1e-4, &mut rng);
    let x = Matrix::random_with(NUM_TRAIN, NUM_FEATURES, &mut rng);
    let y: Vec<usize> = (0..NUM_TRAIN).map(|_| rng.gen_range(0..NUM_CLASSES)).collect();

    let t = Instant::now();
    let (loss_naive, grad_naive) = evaluator.naive(&w, &x, &y)?;
    let naive_ms = t.elapsed().as_secs_f64() * 1e3;

    let t = Instant::now();
    let (loss_vec, grad_vec) = evaluator.vectorized(&w, &x, &y)?;
    let vec_ms = t.elapsed().as_secs_f64() * 1e3;

    println!("config: reg = {}, shift = {:?}", config.reg, config.shift);
    println!("naive loss:      {loss_naive:.6} ({naive_ms:.2} ms)");
    println!("vectorized loss: {loss_vec:.6} ({vec_ms:.2} ms)");
    println!("sanity check:    ln({NUM_CLASSES}) = {:.6}", (NUM_CLASSES as f64).ln());
    println!("loss difference: {:e}", (loss_naive - loss_vec).abs());
    println!("grad difference: {:e}", grad_naive.max_abs_diff(&grad_vec));

    Ok(())
}
