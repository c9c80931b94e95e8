//! Estimates the expected absorption time for a range of population sizes.
//!
//! Each size runs the default Monte-Carlo estimate: trials start from a
//! uniformly drawn transient state and step a zero-mistake ring simulation
//! until every agent is happy.
//!
//! Run with: `cargo run --release -p schelling-stats --example absorption_time`

use schelling_stats::{EstimatorConfig, estimate_absorption_time};

fn main() {
    let config = EstimatorConfig {
        repetitions: 500,
        ..EstimatorConfig::default()
    };

    for size in 4..=8usize {
        match estimate_absorption_time(size, &config) {
            Ok(mean) => println!("size {size}: mean absorption time {mean:.2} steps"),
            Err(err) => println!("size {size}: {err}"),
        }
    }
}
