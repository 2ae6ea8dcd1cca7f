//! Logarithmic work-width heuristic.
//!
//! Parallel overhead dominates for small tensors, so width grows slowly
//! (logarithmically) past the threshold rather than linearly with size.

/// Number of workers that should participate in an op over `numel`
/// output elements, given `allocated` workers and tunables `growth_scale`
/// and `numel_threshold`.
///
/// `numel < numel_threshold` (including equality) always returns 1.
pub fn width_for(numel: usize, allocated: usize, growth_scale: f64, numel_threshold: usize) -> usize {
    if allocated <= 1 || numel <= numel_threshold {
        return 1;
    }
    let over = (numel - numel_threshold) as f64;
    let raw = (growth_scale * over.log2()).ceil();
    if raw.is_nan() || raw < 1.0 {
        1
    } else if raw as usize > allocated {
        allocated
    } else {
        raw as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: usize = 250_000;

    #[test]
    fn below_threshold_is_single_threaded() {
        assert_eq!(width_for(1, 8, 0.3, T), 1);
        assert_eq!(width_for(T, 8, 0.3, T), 1);
    }

    #[test]
    fn just_above_threshold_rounds_up_to_one() {
        assert_eq!(width_for(T + 1, 8, 0.3, T), 1);
    }

    #[test]
    fn scales_logarithmically() {
        assert_eq!(width_for(300_000, 8, 0.3, T), 5);
        assert_eq!(width_for(10_000_000, 8, 0.3, T), 7);
    }

    #[test]
    fn clamps_to_allocated_worker_count() {
        assert_eq!(width_for(50_000_000_000, 8, 0.3, T), 8);
    }

    #[test]
    fn no_pool_or_single_allocated_worker_forces_width_one() {
        assert_eq!(width_for(50_000_000, 1, 0.3, T), 1);
        assert_eq!(width_for(50_000_000, 0, 0.3, T), 1);
    }

    #[test]
    fn monotonic_non_decreasing() {
        let mut prev = 0;
        for numel in (0..5_000_000).step_by(97_000) {
            let w = width_for(numel, 16, 0.3, T);
            assert!(w >= prev, "width decreased at numel={numel}: {w} < {prev}");
            prev = w;
        }
    }
}
