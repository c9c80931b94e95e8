//! Prints the transient (non-absorbing) balanced configurations for a
//! five-agent ring, one per line as a 0/1 string.
//!
//! Run with: `cargo run -p schelling-stats --example print_transient_states`

use schelling_stats::enumerate_transient_states;

fn main() {
    let size = 5;
    let states = enumerate_transient_states(size).expect("size is non-zero");

    println!("{} transient states of size {size}:", states.len());
    for state in &states {
        let rendered: String = state.iter().map(|&l| if l { '1' } else { '0' }).collect();
        println!("  {rendered}");
    }
}
