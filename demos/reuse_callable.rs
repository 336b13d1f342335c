//! Build a specialized callable once and reuse it for many pairs.
//!
//! Nearest-neighbour search of a template against a bank of candidates,
//! first with one-shot calls and then with a single factory-built callable.
//!
//! Run with: cargo run --release --example reuse_callable

use std::time::Instant;

use ndarray::Array2;
use tsdist::{distance, distance_factory, MetricConfig, WdtwConfig};

fn main() {
    env_logger::init();

    let len = 128;
    let template = Array2::from_shape_fn((3, len), |(c, t)| (t as f64 * 0.15 + c as f64).sin());
    let candidates: Vec<Array2<f64>> = (0..500)
        .map(|k| {
            let freq = 0.1 + 0.0002 * k as f64;
            let len = len - 10 + k % 20;
            Array2::from_shape_fn((3, len), |(c, t)| (t as f64 * freq + c as f64).sin())
        })
        .collect();

    let cfg = MetricConfig::Wdtw(WdtwConfig::default().with_g(0.1).with_window(0.2));

    let start = Instant::now();
    let one_shot: Vec<f64> = candidates
        .iter()
        .map(|c| distance(&template, c, &cfg))
        .collect::<Result<_, _>>()
        .unwrap_or_else(|e| panic!("one-shot distance failed: {e}"));
    let one_shot_time = start.elapsed();

    let start = Instant::now();
    let callable = distance_factory(&template, &candidates[0], &cfg)
        .unwrap_or_else(|e| panic!("specialization failed: {e}"));
    let pairs: Vec<_> = candidates
        .iter()
        .map(|c| (template.view(), c.view()))
        .collect();
    let reused = callable.call_many(&pairs);
    let reused_time = start.elapsed();

    let (best, best_d) = reused
        .iter()
        .copied()
        .enumerate()
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .unwrap_or((0, f64::NAN));
    let max_diff = one_shot
        .iter()
        .zip(&reused)
        .map(|(a, b)| (a - b).abs())
        .fold(0.0_f64, f64::max);

    println!("Reusing a specialized callable");
    println!("==============================");
    println!("Callable:        {callable:?}");
    println!("Candidates:      {}", candidates.len());
    println!("One-shot:        {one_shot_time:?}");
    println!("Factory + reuse: {reused_time:?}");
    println!("Max difference:  {max_diff:.3e}");
    println!("Nearest:         candidate {best} at distance {best_d:.6}");
}
