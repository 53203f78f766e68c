//! Segment-swap mutation.
//!
//! Two segments of `swap_size + 1` points, one starting in the first half of
//! the route and ending before the midpoint, the other starting in the second
//! half, exchange places verbatim. The segments never overlap.

use crate::heuristics::genetic::GAConfig;
use crate::instance::Instance;
use crate::tour::Tour;
use rand::Rng;

/// `floor(route_len * fraction / 2)`, capped so that both segments fit in
/// their half.
pub fn swap_size(route_len: usize, fraction: f64) -> usize {
    let half = route_len / 2;
    let size = (route_len as f64 * fraction / 2.0).floor() as usize;
    size.min(half.saturating_sub(1))
}

/// Exchange `[begin1, begin1 + swap_size]` with `[begin2, begin2 + swap_size]`.
///
/// Panics if the segments overlap or run past the end of the route.
pub fn swap_segments(route: &[usize], begin1: usize, begin2: usize, swap_size: usize) -> Vec<usize> {
    assert!(begin1 + swap_size < begin2, "segments overlap");
    assert!(begin2 + swap_size < route.len(), "segment out of bounds");

    let mut mutated = route.to_vec();
    for k in 0..=swap_size {
        mutated.swap(begin1 + k, begin2 + k);
    }
    mutated
}

/// Return a mutated copy of `tour`; the original is left untouched.
pub fn mutate<R: Rng + ?Sized>(
    instance: &Instance,
    tour: &Tour,
    config: &GAConfig,
    rng: &mut R,
) -> Tour {
    let n = tour.len();
    if n < 2 {
        return tour.clone();
    }

    let half = n / 2;
    let size = swap_size(n, config.mutation_swap_fraction);
    let begin1 = rng.gen_range(0..half - size);
    let begin2 = rng.gen_range(half..n - size);

    Tour::new(instance, swap_segments(tour.route(), begin1, begin2, size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::{DistanceMetric, Point};
    use rand::seq::SliceRandom;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn ring(n: usize) -> Instance {
        let points = (0..n)
            .map(|i| {
                let a = i as f64 * 2.0 * std::f64::consts::PI / n as f64;
                Point::new(i, 50.0 * a.cos(), 50.0 * a.sin())
            })
            .collect();
        Instance::new("ring", points, &DistanceMetric::Euclidean).unwrap()
    }

    #[test]
    fn test_swap_segments_fixed_positions() {
        let route: Vec<usize> = (0..8).collect();

        let mutated = swap_segments(&route, 1, 5, 1);

        assert_eq!(mutated, vec![0, 5, 6, 3, 4, 1, 2, 7]);
        for i in [0, 3, 4, 7] {
            assert_eq!(mutated[i], route[i]);
        }
    }

    #[test]
    fn test_swap_size() {
        assert_eq!(swap_size(8, 0.25), 1);
        assert_eq!(swap_size(10, 0.2), 1);
        assert_eq!(swap_size(8, 1.0), 3);
        assert_eq!(swap_size(3, 1.0), 0);
        assert_eq!(swap_size(2, 0.5), 0);
    }

    #[test]
    fn test_mutation_leaves_original_untouched() {
        let instance = ring(8);
        let config = GAConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let tour = Tour::new(&instance, (0..8).collect());

        let mutated = mutate(&instance, &tour, &config, &mut rng);

        assert_eq!(tour.route(), &[0, 1, 2, 3, 4, 5, 6, 7]);
        assert_ne!(mutated.route(), tour.route());
        assert!(mutated.is_permutation_of(8));
    }

    #[test]
    fn test_mutation_preserves_permutation() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        for n in [2usize, 3, 5, 6, 9, 16] {
            let instance = ring(n);
            for fraction in [0.0, 0.2, 0.5, 1.0] {
                let config = GAConfig {
                    mutation_swap_fraction: fraction,
                    ..Default::default()
                };
                let mut route: Vec<usize> = (0..n).collect();
                let calls = if n == 6 { 1000 } else { 50 };
                for _ in 0..calls {
                    route.shuffle(&mut rng);
                    let tour = Tour::new(&instance, route.clone());
                    let mutated = mutate(&instance, &tour, &config, &mut rng);

                    assert!(mutated.is_permutation_of(n));
                    assert!((mutated.cost() - mutated.recompute_cost(&instance)).abs() < 1e-9);
                }
            }
        }
    }
}
