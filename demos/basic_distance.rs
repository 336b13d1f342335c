//! Basic distance computation between two multichannel series.
//!
//! Computes every metric with its default parameters, then shows a few
//! misuse cases and the errors they produce.
//!
//! Run with: RUST_LOG=debug cargo run --release --example basic_distance

use ndarray::{arr1, Array2};
use tsdist::{distance, DtwConfig, Metric, MetricConfig};

fn main() {
    env_logger::init();

    let n = 60;
    let x = Array2::from_shape_fn((2, n), |(c, t)| (t as f64 * 0.2 + c as f64).sin());
    // Same shape, shifted by three samples
    let y = Array2::from_shape_fn((2, n), |(c, t)| ((t as f64 - 3.0) * 0.2 + c as f64).sin());

    println!("Distances between a 2-channel sine and its shifted copy");
    println!("=======================================================");
    println!("{:>10}  {:>14}", "Metric", "Distance");
    println!("{:-<26}", "");
    for metric in Metric::ALL {
        match distance(&x, &y, &metric.default_config()) {
            Ok(d) => println!("{:>10}  {d:>14.6}", metric.name()),
            Err(e) => println!("{:>10}  error: {e}", metric.name()),
        }
    }

    println!("\nDTW with a Sakoe-Chiba band");
    for window in [0.0, 0.05, 0.1, 1.0] {
        let cfg = MetricConfig::Dtw(DtwConfig::default().with_window(window));
        match distance(&x, &y, &cfg) {
            Ok(d) => println!("  window {window:>4}: {d:.6}"),
            Err(e) => println!("  window {window:>4}: error: {e}"),
        }
    }

    println!("\nMisuse");
    let flat = arr1(&[0.0, 1.0, 2.0]);
    if let Err(e) = distance(&flat, &y, &MetricConfig::Euclidean) {
        println!("  1-D input:         {e}");
    }
    let short = Array2::<f64>::zeros((2, n / 2));
    if let Err(e) = distance(&x, &short, &MetricConfig::Euclidean) {
        println!("  unequal lengths:   {e}");
    }
    let cfg = MetricConfig::Dtw(DtwConfig::default().with_window(2.0));
    if let Err(e) = distance(&x, &y, &cfg) {
        println!("  bad window:        {e}");
    }
}
