//! Prints the work-width heuristic's curve across a spread of tensor
//! sizes, for a device with 8 allocated workers and the default tunables.

use tensorpool_core::constants::{DEFAULT_GROWTH_SCALE, DEFAULT_NUMEL_THRESHOLD};
use tensorpool_runtime::width_for;

fn main() {
    let allocated = 8;
    let sizes = [1, 1_000, 100_000, DEFAULT_NUMEL_THRESHOLD, DEFAULT_NUMEL_THRESHOLD + 1, 300_000, 1_000_000, 10_000_000, 1_000_000_000];

    println!(
        "allocated={allocated} growth_scale={DEFAULT_GROWTH_SCALE} numel_threshold={DEFAULT_NUMEL_THRESHOLD}"
    );
    for numel in sizes {
        let width = width_for(numel, allocated, DEFAULT_GROWTH_SCALE, DEFAULT_NUMEL_THRESHOLD);
        println!("{numel:>12} elements -> {width} workers");
    }
}
